// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::error::DownloadError;
use crate::http::{ByteStream, HttpClient};
use crate::progress::{ProgressEvent, SharedProgressReporter};

/// Position of a download within the import run
#[derive(Debug, Clone)]
pub struct DownloadContext {
    pub episode_index: usize,
    pub total_episodes: usize,
    pub episode_title: String,
}

/// Path a download is streamed to before it is complete
pub fn partial_path(output_path: &Path) -> PathBuf {
    let mut name = output_path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".partial");
    output_path.with_file_name(name)
}

/// Download `url` to `output_path`
///
/// The body is streamed into a `.partial` sibling which is renamed into place
/// once complete, so an interrupted run never leaves a truncated audio file.
/// Returns the number of bytes downloaded.
pub async fn download_audio<C: HttpClient>(
    client: &C,
    url: &str,
    output_path: &Path,
    context: &DownloadContext,
    reporter: &SharedProgressReporter,
) -> Result<u64, DownloadError> {
    let response = client
        .get_stream(url)
        .await
        .map_err(|e| DownloadError::HttpFailed {
            url: url.to_string(),
            source: e,
        })?;

    if response.status >= 400 {
        return Err(DownloadError::HttpStatus {
            url: url.to_string(),
            status: response.status,
        });
    }

    reporter.report(ProgressEvent::DownloadStarting {
        episode_title: context.episode_title.clone(),
        episode_index: context.episode_index,
        total_episodes: context.total_episodes,
        content_length: response.content_length,
    });

    let partial = partial_path(output_path);
    let result = stream_to_file(
        url,
        response.body,
        &partial,
        response.content_length,
        reporter,
    )
    .await;

    let bytes_downloaded = match result {
        Ok(bytes) => bytes,
        Err(e) => {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }
    };

    tokio::fs::rename(&partial, output_path)
        .await
        .map_err(|e| DownloadError::FileWriteFailed {
            path: output_path.to_path_buf(),
            source: e,
        })?;

    reporter.report(ProgressEvent::DownloadCompleted {
        episode_title: context.episode_title.clone(),
        bytes_downloaded,
    });

    Ok(bytes_downloaded)
}

async fn stream_to_file(
    url: &str,
    mut body: ByteStream,
    path: &Path,
    content_length: Option<u64>,
    reporter: &SharedProgressReporter,
) -> Result<u64, DownloadError> {
    let mut file = File::create(path)
        .await
        .map_err(|e| DownloadError::FileCreateFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    let mut bytes_downloaded: u64 = 0;

    while let Some(chunk_result) = body.next().await {
        let chunk = chunk_result.map_err(|e| DownloadError::StreamFailed {
            url: url.to_string(),
            source: e,
        })?;

        file.write_all(&chunk)
            .await
            .map_err(|e| DownloadError::FileWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;

        bytes_downloaded += chunk.len() as u64;

        reporter.report(ProgressEvent::DownloadProgress {
            bytes_downloaded,
            total_bytes: content_length,
        });
    }

    file.flush()
        .await
        .map_err(|e| DownloadError::FileWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(bytes_downloaded)
}
