mod episode;
mod html;
mod sections;

pub use episode::{DEFAULT_AUDIO_DIR, parse_episode_markdown};
pub use html::{BREAK, block_to_html, build_description, inline_to_html};
pub use sections::{
    Metadata, REQUIRED_FIELDS, REQUIRED_SECTIONS, Sections, parse_metadata, parse_sections,
};
