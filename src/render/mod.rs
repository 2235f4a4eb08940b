mod feed;
mod page;
mod text;

pub use feed::{
    DEFAULT_FEED_FILENAME, FeedSummary, enclosure, episode_guid, generate_feed, render_feed,
    strip_boilerplate,
};
pub use page::{PageOutcome, default_page_filename, generate_page, render_page};
pub use text::{
    SUBTITLE_MAX_CHARS, SUMMARY_MAX_CHARS, cdata, format_display_date, plain_summary, strip_tags,
    subtitle,
};
