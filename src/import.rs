// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Seeding a new episode store from an existing podcast feed.

use std::path::{Path, PathBuf};

use serde_json::Map;

use crate::episode::{DownloadContext, audio_filename, download_audio};
use crate::error::{FeedError, ImportError, StoreError};
use crate::feed::{Episode, load_feed};
use crate::http::HttpClient;
use crate::progress::{ProgressEvent, SharedProgressReporter};
use crate::store::{self, EpisodeRecord, StoreDocument};

/// Options for the import step
#[derive(Debug, Clone)]
pub struct ImportOptions {
    /// Directory audio files are downloaded into
    pub audio_dir: PathBuf,
    /// Maximum number of episodes to download (None = all); the rest are
    /// still recorded, without audio
    pub limit: Option<usize>,
    /// Replace an existing episode store
    pub overwrite: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            audio_dir: PathBuf::from(crate::markdown::DEFAULT_AUDIO_DIR),
            limit: None,
            overwrite: false,
        }
    }
}

/// Result of an import
#[derive(Debug, Clone, Default)]
pub struct ImportResult {
    pub episodes: usize,
    pub downloaded: usize,
    /// Audio already on disk from an earlier run
    pub already_present: usize,
    pub without_audio: usize,
    /// Details of failed downloads (title, error message)
    pub failed_episodes: Vec<(String, String)>,
}

/// Import a feed: download its audio and write a new episode store.
///
/// Episodes are numbered from 1 in feed order and stored in that order.
/// Individual download failures are reported and the episode is stored
/// without a local file.
pub async fn import_podcast<C: HttpClient>(
    client: &C,
    feed_source: &str,
    store_path: &Path,
    options: &ImportOptions,
    reporter: SharedProgressReporter,
) -> Result<ImportResult, ImportError> {
    if store_path.exists() && !options.overwrite {
        return Err(StoreError::AlreadyExists(store_path.to_path_buf()).into());
    }

    reporter.report(ProgressEvent::LoadingFeed {
        source: feed_source.to_string(),
    });
    let podcast = load_feed(client, feed_source).await?;
    if podcast.episodes.is_empty() {
        return Err(FeedError::NoEpisodes.into());
    }

    let total_episodes = podcast.episodes.len();
    reporter.report(ProgressEvent::FeedParsed {
        podcast_title: podcast.title.clone(),
        total_episodes,
    });

    std::fs::create_dir_all(&options.audio_dir).map_err(|e| {
        ImportError::CreateDirectoryFailed {
            path: options.audio_dir.clone(),
            source: e,
        }
    })?;

    let mut document = StoreDocument::new(podcast.title.clone(), podcast.description.clone());
    let mut result = ImportResult {
        episodes: total_episodes,
        ..Default::default()
    };
    let mut download_budget = options.limit.unwrap_or(usize::MAX);

    for (episode_index, episode) in podcast.episodes.iter().enumerate() {
        let number = episode_index as u32 + 1;

        let local_file = match &episode.enclosure {
            None => {
                reporter.report(ProgressEvent::NoAudio {
                    episode_title: episode.title.clone(),
                });
                result.without_audio += 1;
                None
            }
            Some(enclosure) => {
                let filename = audio_filename(number, &episode.title, enclosure);
                let audio_path = options.audio_dir.join(&filename);

                if audio_path.exists() {
                    reporter.report(ProgressEvent::AlreadyPresent {
                        episode_title: episode.title.clone(),
                        filename,
                    });
                    result.already_present += 1;
                    Some(audio_path)
                } else if download_budget == 0 {
                    result.without_audio += 1;
                    None
                } else {
                    download_budget -= 1;
                    let context = DownloadContext {
                        episode_index,
                        total_episodes,
                        episode_title: episode.title.clone(),
                    };

                    match download_audio(
                        client,
                        enclosure.url.as_str(),
                        &audio_path,
                        &context,
                        &reporter,
                    )
                    .await
                    {
                        Ok(_) => {
                            result.downloaded += 1;
                            Some(audio_path)
                        }
                        Err(e) => {
                            reporter.report(ProgressEvent::DownloadFailed {
                                episode_title: episode.title.clone(),
                                error: e.to_string(),
                            });
                            result
                                .failed_episodes
                                .push((episode.title.clone(), e.to_string()));
                            None
                        }
                    }
                }
            }
        };

        document.push(episode_record(episode, number, local_file.as_deref()))?;
    }

    store::create(store_path, &document, options.overwrite)?;
    reporter.report(ProgressEvent::StoreWritten {
        path: store_path.display().to_string(),
        episodes: document.episodes.len(),
    });

    Ok(result)
}

fn episode_record(episode: &Episode, number: u32, local_file: Option<&Path>) -> EpisodeRecord {
    EpisodeRecord {
        season: episode.season_number.filter(|s| *s > 0).unwrap_or(1),
        number,
        title: episode.title.clone(),
        description: episode.description.clone().unwrap_or_default(),
        published: episode.pub_date.clone().unwrap_or_default(),
        duration: episode.duration.clone().unwrap_or_default(),
        original_audio_url: episode.enclosure.as_ref().map(|e| e.url.to_string()),
        local_file: local_file.map(|path| path.to_string_lossy().into_owned()),
        archive_url: None,
        extra: Map::new(),
    }
}
