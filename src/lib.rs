pub mod config;
pub mod episode;
pub mod error;
pub mod feed;
pub mod http;
pub mod import;
pub mod markdown;
pub mod progress;
pub mod render;
pub mod store;

// Re-export main types for convenience
pub use config::{Category, FeedConfig, Host, PageConfig};
pub use error::{
    DownloadError, FeedError, GenerateError, ImportError, MarkdownError, StoreError,
};
pub use http::{HttpClient, HttpResponse, ReqwestClient};
pub use import::{ImportOptions, ImportResult, import_podcast};
pub use markdown::{DEFAULT_AUDIO_DIR, parse_episode_markdown};
pub use progress::{NoopReporter, ProgressEvent, ProgressReporter, SharedProgressReporter};
pub use render::{
    DEFAULT_FEED_FILENAME, FeedSummary, PageOutcome, default_page_filename, generate_feed,
    generate_page,
};
pub use store::{DEFAULT_STORE_FILENAME, EpisodeRecord, StoreDocument};
