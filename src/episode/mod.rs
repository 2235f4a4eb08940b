mod download;
mod filename;

pub use download::{DownloadContext, download_audio, partial_path};
pub use filename::{audio_filename, get_audio_extension};
