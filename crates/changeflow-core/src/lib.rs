pub mod cache;
pub mod change;
pub mod checklist;
pub mod config;
pub mod error;
pub mod io;
pub mod markdown;
pub mod paths;
pub mod prioritize;
pub mod status;
pub mod structure;
pub mod task_id;

pub use error::{ChangeflowError, Result};
