//! Persisted view settings: storage seam, debounced writes and restoration.

mod config;
mod debounce;
mod scroll;
mod storage;
mod view_state;

pub use config::PersistenceConfig;
pub use debounce::DebouncedTask;
pub use scroll::{ScrollPositionManager, ScrollRestore};
pub use storage::{
    KeyValueStore, MemoryStore, WriteOutcome, prune_stale_keys, write_with_quota_recovery,
};
pub use view_state::{TimelineViewState, ViewMode, ViewStatePersistence, WallClock};
