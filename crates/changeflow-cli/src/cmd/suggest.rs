use changeflow_core::cache::CompletionCache;
use changeflow_core::{change, prioritize};
use clap::Subcommand;
use std::path::Path;
use std::sync::{Mutex, OnceLock};

#[derive(Subcommand)]
pub enum SuggestSubcommand {
    /// All change ids
    Changes,
    /// Change ids with actionable work, highest priority first
    Active,
}

/// Shared suggestion cache. Shell completion fires these queries in rapid
/// bursts; within one burst the workspace scan is reused instead of
/// re-reading every task file.
fn cache() -> &'static Mutex<CompletionCache> {
    static CACHE: OnceLock<Mutex<CompletionCache>> = OnceLock::new();
    CACHE.get_or_init(|| Mutex::new(CompletionCache::new()))
}

pub fn run(root: &Path, subcmd: SuggestSubcommand) -> anyhow::Result<()> {
    let mut cache = cache().lock().expect("suggestion cache poisoned");

    let ids = match subcmd {
        SuggestSubcommand::Changes => cache
            .all_changes
            .get_or_insert_with(|| change::list_change_ids(root)),
        SuggestSubcommand::Active => cache.active_changes.get_or_insert_with(|| {
            prioritize::prioritized_changes(root)
                .into_iter()
                .map(|c| c.id)
                .collect()
        }),
    };

    for id in ids {
        println!("{id}");
    }
    Ok(())
}
