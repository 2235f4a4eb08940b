// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading an episode markdown document
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MarkdownError {
    #[error("Missing sections in markdown: {}", names.join(", "))]
    MissingSection { names: Vec<String> },

    #[error("Missing metadata fields: {}", names.join(", "))]
    MissingField { names: Vec<String> },

    #[error("Metadata field '{field}' must be a positive integer, got '{value}'")]
    InvalidNumber { field: String, value: String },
}

/// Errors raised by the episode record store
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Episode store not found: {0}")]
    NotFound(PathBuf),

    #[error("Episode store already exists: {0} (use --force to replace it)")]
    AlreadyExists(PathBuf),

    #[error("Failed to read episode store {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write episode store {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse episode store JSON in {path}: {source}")]
    JsonParseFailed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize episode store: {0}")]
    JsonSerializeFailed(#[from] serde_json::Error),

    #[error("Season {season} Episode {number} already exists in the episode store")]
    DuplicateEpisode { season: u32, number: u32 },

    #[error("No episode in the store references audio file '{file}'")]
    EpisodeNotFound { file: String },
}

/// Errors raised while generating the archive page or the RSS feed
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Generated feed is not valid RSS: {0}")]
    InvalidFeed(#[from] rss::Error),
}

/// Errors that can occur when fetching or parsing an upstream RSS feed
#[derive(Error, Debug)]
pub enum FeedError {
    #[error("Failed to fetch feed from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to read feed file {path}: {source}")]
    FileReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse RSS feed: {0}")]
    ParseFailed(#[from] rss::Error),

    #[error("Invalid feed URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Feed contains no episodes")]
    NoEpisodes,
}

/// Errors that can occur during episode downloads
#[derive(Error, Debug)]
pub enum DownloadError {
    #[error("HTTP request failed for {url}: {source}")]
    HttpFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP error {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to create file {path}: {source}")]
    FileCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write to file {path}: {source}")]
    FileWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Stream error while downloading {url}: {source}")]
    StreamFailed {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Top-level errors for the import step
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("Feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to create audio directory {path}: {source}")]
    CreateDirectoryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
