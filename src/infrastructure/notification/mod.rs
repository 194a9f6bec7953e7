pub mod storage_watcher;

pub use storage_watcher::{StorageWatcher, StorageWatcherHandle};
