//! Policy constants for the history store.

/// Maximum number of history items that may be pinned at once.
pub const MAX_PINNED_ITEMS: usize = 7;

/// Age in milliseconds after which an unpinned history item is evicted.
pub const RETENTION_WINDOW_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Name of the default data directory under the user's home.
pub const DATA_DIR_NAME: &str = ".verdant";

/// Current version of the persisted history envelope.
pub const HISTORY_FORMAT_VERSION: u32 = 1;
