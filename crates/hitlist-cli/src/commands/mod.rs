pub mod cache;
pub mod config;
pub mod run;

pub use cache::{clear_cache, show_cache_stats};
pub use run::{run_snapshot, RunOverrides};
