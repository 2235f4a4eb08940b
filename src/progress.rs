// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::sync::Arc;

/// Events emitted while importing a feed
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Feed is being fetched or read
    LoadingFeed { source: String },

    /// Feed has been parsed successfully
    FeedParsed {
        podcast_title: String,
        total_episodes: usize,
    },

    /// The audio file is already on disk and will not be downloaded again
    AlreadyPresent { episode_title: String, filename: String },

    /// The feed item has no usable audio enclosure
    NoAudio { episode_title: String },

    DownloadStarting {
        episode_title: String,
        /// Index of this episode in the feed
        episode_index: usize,
        total_episodes: usize,
        /// Expected content length in bytes, if known
        content_length: Option<u64>,
    },

    DownloadProgress {
        bytes_downloaded: u64,
        total_bytes: Option<u64>,
    },

    DownloadCompleted {
        episode_title: String,
        bytes_downloaded: u64,
    },

    DownloadFailed { episode_title: String, error: String },

    /// The new episode store has been written
    StoreWritten { path: String, episodes: usize },
}

/// Receives progress events from library code, which never prints itself
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: ProgressEvent);
}

/// A shared reference to a progress reporter
pub type SharedProgressReporter = Arc<dyn ProgressReporter>;

/// Reporter for tests and quiet mode
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn report(&self, _event: ProgressEvent) {}
}

impl NoopReporter {
    pub fn shared() -> SharedProgressReporter {
        Arc::new(Self)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Records every event for later assertions
    #[derive(Default)]
    pub struct RecordingReporter {
        pub events: Mutex<Vec<ProgressEvent>>,
    }

    impl ProgressReporter for RecordingReporter {
        fn report(&self, event: ProgressEvent) {
            self.events.lock().unwrap().push(event);
        }
    }
}
