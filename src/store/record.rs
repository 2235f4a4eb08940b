// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

fn default_season() -> u32 {
    1
}

/// One podcast episode as persisted in the episode store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    #[serde(default = "default_season")]
    pub season: u32,
    pub number: u32,
    pub title: String,
    /// Rendered HTML, never markdown
    #[serde(default)]
    pub description: String,
    /// RFC 2822 style, e.g. `Wed, 04 Feb 2026 12:00:00 +0000`
    #[serde(default)]
    pub published: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub original_audio_url: Option<String>,
    /// Path relative to the working directory, usually under `audio/`
    #[serde(default)]
    pub local_file: Option<String>,
    #[serde(default)]
    pub archive_url: Option<String>,
    /// Fields this version does not know about, kept across load/save
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EpisodeRecord {
    /// Hosting URL, if one has been recorded
    pub fn archive_url(&self) -> Option<&str> {
        non_empty(&self.archive_url)
    }

    /// Local audio path, if one has been recorded
    pub fn local_file(&self) -> Option<&str> {
        non_empty(&self.local_file)
    }

    /// `S02E03` style label
    pub fn label(&self) -> String {
        format!("S{:02}E{:02}", self.season, self.number)
    }

    fn references_audio_file(&self, audio_file: &Path) -> bool {
        let Some(local_file) = self.local_file() else {
            return false;
        };

        let local_file = Path::new(local_file);
        if local_file == audio_file {
            return true;
        }

        audio_file
            .file_name()
            .is_some_and(|name| local_file.file_name() == Some(name))
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// The whole episode store: podcast-level text plus episodes, newest first.
///
/// The order of `episodes` is part of the contract: [`StoreDocument::insert`]
/// prepends, and the RSS feed is emitted in exactly this order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreDocument {
    #[serde(default)]
    pub podcast_title: String,
    #[serde(default)]
    pub podcast_description: String,
    #[serde(default)]
    pub episodes: Vec<EpisodeRecord>,
}

impl StoreDocument {
    pub fn new(podcast_title: impl Into<String>, podcast_description: impl Into<String>) -> Self {
        Self {
            podcast_title: podcast_title.into(),
            podcast_description: podcast_description.into(),
            episodes: Vec::new(),
        }
    }

    pub fn contains(&self, season: u32, number: u32) -> bool {
        self.episodes
            .iter()
            .any(|ep| ep.season == season && ep.number == number)
    }

    /// Insert a new episode at the front (newest first).
    ///
    /// Fails without modifying the document if the season/number pair is taken.
    pub fn insert(&mut self, episode: EpisodeRecord) -> Result<(), StoreError> {
        self.check_free(&episode)?;
        self.episodes.insert(0, episode);
        Ok(())
    }

    /// Append an episode at the back, used when seeding a store in feed order
    pub fn push(&mut self, episode: EpisodeRecord) -> Result<(), StoreError> {
        self.check_free(&episode)?;
        self.episodes.push(episode);
        Ok(())
    }

    fn check_free(&self, episode: &EpisodeRecord) -> Result<(), StoreError> {
        if self.contains(episode.season, episode.number) {
            return Err(StoreError::DuplicateEpisode {
                season: episode.season,
                number: episode.number,
            });
        }
        Ok(())
    }

    /// Check the season/number uniqueness invariant over the whole document
    pub fn validate(&self) -> Result<(), StoreError> {
        for (index, episode) in self.episodes.iter().enumerate() {
            if self.episodes[..index]
                .iter()
                .any(|ep| ep.season == episode.season && ep.number == episode.number)
            {
                return Err(StoreError::DuplicateEpisode {
                    season: episode.season,
                    number: episode.number,
                });
            }
        }
        Ok(())
    }

    /// Episodes of one season, ascending by episode number
    pub fn season(&self, season: u32) -> Vec<&EpisodeRecord> {
        let mut episodes: Vec<_> = self
            .episodes
            .iter()
            .filter(|ep| ep.season == season)
            .collect();
        episodes.sort_by_key(|ep| ep.number);
        episodes
    }

    /// Find the episode whose `local_file` is `audio_file`, or ends with its file name
    pub fn find_by_audio_file_mut(&mut self, audio_file: &Path) -> Option<&mut EpisodeRecord> {
        self.episodes
            .iter_mut()
            .find(|ep| ep.references_audio_file(audio_file))
    }
}
