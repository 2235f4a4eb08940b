// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use serde_json::Map;

use crate::error::MarkdownError;
use crate::store::EpisodeRecord;

use super::html::build_description;
use super::sections::{Metadata, parse_metadata, parse_sections};

/// Directory audio files live in, relative to the store
pub const DEFAULT_AUDIO_DIR: &str = "audio";

/// Turn an episode markdown document into a new store record.
///
/// The record has no source URL and no hosting URL yet; its `local_file`
/// points at `<audio_dir>/<Audio File>`.
pub fn parse_episode_markdown(text: &str, audio_dir: &str) -> Result<EpisodeRecord, MarkdownError> {
    let sections = parse_sections(text);
    sections.require()?;

    let section = |name: &str| sections.get(name).unwrap_or_default();

    let metadata = parse_metadata(section("Metadata"));
    metadata.require()?;

    let field = |key: &str| metadata.get(key).unwrap_or_default().to_string();

    let audio_dir = audio_dir.trim_end_matches('/');
    let local_file = if audio_dir.is_empty() {
        field("Audio File")
    } else {
        format!("{}/{}", audio_dir, field("Audio File"))
    };

    Ok(EpisodeRecord {
        season: positive_number(&metadata, "Season")?,
        number: positive_number(&metadata, "Episode")?,
        title: field("Title"),
        description: build_description(
            section("Description"),
            section("Links"),
            section("Footer"),
        ),
        published: field("Published"),
        duration: field("Duration"),
        original_audio_url: Some(String::new()),
        local_file: Some(local_file),
        archive_url: Some(String::new()),
        extra: Map::new(),
    })
}

fn positive_number(metadata: &Metadata, key: &str) -> Result<u32, MarkdownError> {
    let value = metadata.get(key).unwrap_or_default();
    value
        .parse::<u32>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| MarkdownError::InvalidNumber {
            field: key.to_string(),
            value: value.to_string(),
        })
}
