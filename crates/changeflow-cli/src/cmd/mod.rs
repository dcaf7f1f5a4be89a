pub mod change;
pub mod init;
pub mod list;
pub mod next;
pub mod show;
pub mod suggest;
pub mod task;
