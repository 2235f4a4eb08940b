// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Static archive page for one season.

use std::path::Path;

use html_escape::{encode_double_quoted_attribute, encode_text};

use crate::config::PageConfig;
use crate::error::GenerateError;
use crate::store::{self, EpisodeRecord, StoreDocument};

use super::text::{SUMMARY_MAX_CHARS, format_display_date, plain_summary};

const NEW_BADGE: &str = r#"<span class="new-badge">NEW</span>"#;

/// Result of a page generation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageOutcome {
    Written {
        season: u32,
        /// Episode labels in page order, newest first
        episodes: Vec<String>,
    },
    /// The season has no episodes, so nothing was written
    Skipped { season: u32 },
}

/// Default file name of a season's archive page
pub fn default_page_filename(season: u32) -> String {
    format!("season{season}.html")
}

/// Load the store and write the archive page for `season` to `output`
pub fn generate_page(
    store_path: &Path,
    season: u32,
    output: &Path,
    config: &PageConfig,
) -> Result<PageOutcome, GenerateError> {
    let document = store::load(store_path)?;

    let Some(html) = render_page(&document, season, config) else {
        return Ok(PageOutcome::Skipped { season });
    };

    store::write_replacing(output, html).map_err(|e| GenerateError::WriteFailed {
        path: output.to_path_buf(),
        source: e,
    })?;

    let episodes = document
        .season(season)
        .iter()
        .rev()
        .map(|ep| format!("{}: {}", ep.label(), ep.title))
        .collect();

    Ok(PageOutcome::Written { season, episodes })
}

/// Render the archive page, or `None` if the season has no episodes
pub fn render_page(document: &StoreDocument, season: u32, config: &PageConfig) -> Option<String> {
    let episodes = document.season(season);
    let newest = episodes.iter().map(|ep| ep.number).max()?;

    let blocks: String = episodes
        .iter()
        .rev()
        .map(|ep| episode_block(ep, ep.number == newest))
        .collect();

    Some(page_shell(season, config, &blocks))
}

fn episode_block(episode: &EpisodeRecord, is_newest: bool) -> String {
    let badge = if is_newest { NEW_BADGE } else { "" };

    let listen = episode
        .archive_url()
        .map(|url| {
            format!(
                "\n                    <a href=\"{}\" class=\"listen-link\">&#127911; Listen</a>",
                encode_double_quoted_attribute(url)
            )
        })
        .unwrap_or_default();

    format!(
        r#"
                <div class="episode">
                    <h3>Episode {number}: {title} {badge}</h3>
                    <div class="episode-meta">Published: {date} | Duration: {duration}</div>
                    <div class="episode-description">
                        <p>{summary}</p>
                    </div>{listen}
                </div>"#,
        number = episode.number,
        title = encode_text(&episode.title),
        date = encode_text(&format_display_date(&episode.published)),
        duration = encode_text(&episode.duration),
        summary = plain_summary(&episode.description, SUMMARY_MAX_CHARS),
    )
}

fn hosts_block(config: &PageConfig) -> String {
    let names = config
        .hosts
        .iter()
        .map(|host| format!("<strong>{}</strong>", encode_text(&host.name)))
        .collect::<Vec<_>>()
        .join(" and ");

    let links = config
        .hosts
        .iter()
        .map(|host| {
            format!(
                "\n                    <a href=\"{}\" style=\"color: #667eea;\">{}</a>",
                encode_double_quoted_attribute(&host.profile_url),
                encode_text(&host.short_name)
            )
        })
        .collect::<Vec<_>>()
        .join(" |");

    let mut block = format!("                <p>{names}</p>\n");
    if !config.hosts.is_empty() {
        block.push_str(&format!(
            "                <p>Follow them on LinkedIn:{links}\n                </p>\n"
        ));
    }
    block
}

fn page_shell(season: u32, config: &PageConfig, blocks: &str) -> String {
    let podcast = encode_text(&config.podcast_name);
    let hosts = hosts_block(config);
    let home = encode_double_quoted_attribute(&config.home_link);
    let footer = &config.footer;

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Season {season} - {podcast}</title>
    <style>
{STYLE}    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <a href="{home}" class="back-link">&larr; Back to Home</a>
            <h1>Season {season} {NEW_BADGE}</h1>
            <p class="tagline">{podcast}</p>
        </div>

        <div class="content">
            <div class="hosts-info">
                <h2>Season {season} Hosts</h2>
{hosts}            </div>

            <div class="episode-list">
                <h2 style="color: #667eea; margin-bottom: 20px;">All Episodes</h2>
{blocks}
            </div>
        </div>

        <div class="footer">
            <p>{footer}</p>
        </div>
    </div>
</body>
</html>
"#
    )
}

const STYLE: &str = r#"        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            line-height: 1.6;
            color: #333;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            padding: 20px;
        }

        .container {
            max-width: 900px;
            margin: 0 auto;
            background: white;
            border-radius: 20px;
            box-shadow: 0 20px 60px rgba(0,0,0,0.3);
            overflow: hidden;
        }

        .header {
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            padding: 40px;
            text-align: center;
        }

        h1 {
            font-size: 2.5em;
            margin-bottom: 10px;
        }

        .tagline {
            font-size: 1.2em;
            opacity: 0.9;
        }

        .back-link {
            display: inline-block;
            color: white;
            text-decoration: none;
            margin-bottom: 20px;
            padding: 10px 20px;
            background: rgba(255,255,255,0.2);
            border-radius: 5px;
            transition: background 0.2s;
        }

        .back-link:hover {
            background: rgba(255,255,255,0.3);
        }

        .content {
            padding: 40px;
        }

        .hosts-info {
            background: #f8f9fa;
            padding: 20px;
            border-radius: 10px;
            margin-bottom: 30px;
        }

        .hosts-info h2 {
            color: #667eea;
            margin-bottom: 10px;
        }

        .new-badge {
            display: inline-block;
            background: #ff6b6b;
            color: white;
            padding: 4px 12px;
            border-radius: 12px;
            font-size: 0.8em;
            font-weight: bold;
            margin-left: 10px;
        }

        .episode-list {
            margin-top: 30px;
        }

        .episode {
            background: #f8f9fa;
            padding: 20px;
            border-radius: 10px;
            margin-bottom: 15px;
            border-left: 4px solid #667eea;
        }

        .episode h3 {
            color: #667eea;
            margin-bottom: 10px;
        }

        .episode-meta {
            font-size: 0.9em;
            color: #666;
            margin-bottom: 10px;
        }

        .episode-description {
            color: #555;
            line-height: 1.6;
        }

        .listen-link {
            display: inline-block;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            color: white;
            padding: 8px 16px;
            text-decoration: none;
            border-radius: 5px;
            font-size: 0.9em;
            margin-top: 10px;
            transition: transform 0.2s;
        }

        .listen-link:hover {
            transform: translateY(-2px);
        }

        .footer {
            text-align: center;
            padding: 20px;
            color: #999;
            border-top: 1px solid #eee;
        }
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use serde_json::Map;
    use tempfile::tempdir;

    fn make_episode(number: u32, title: &str, archive_url: &str) -> EpisodeRecord {
        EpisodeRecord {
            season: 2,
            number,
            title: title.to_string(),
            description: "<p>Hello <b>world</b></p>".to_string(),
            published: "Wed, 04 Feb 2026 12:00:00 +0000".to_string(),
            duration: "00:45:10".to_string(),
            original_audio_url: Some(String::new()),
            local_file: Some(format!("audio/e{number}.mp3")),
            archive_url: Some(archive_url.to_string()),
            extra: Map::new(),
        }
    }

    fn make_store() -> StoreDocument {
        let mut doc = StoreDocument::new("A Coffee with CompBio", "About");
        doc.insert(make_episode(1, "Kickoff", "")).unwrap();
        doc.insert(make_episode(
            3,
            "CRISPR Basics",
            "https://archive.org/download/x/e3.mp3",
        ))
        .unwrap();
        doc.insert(make_episode(2, "Tools & Tricks", "")).unwrap();
        doc
    }

    #[test]
    fn renders_display_date_and_listen_link() {
        let html = render_page(&make_store(), 2, &PageConfig::default()).unwrap();

        assert!(html.contains("Published: Feb 04, 2026 | Duration: 00:45:10"));
        assert!(html.contains(
            r#"<a href="https://archive.org/download/x/e3.mp3" class="listen-link">&#127911; Listen</a>"#
        ));
    }

    #[test]
    fn listen_link_omitted_without_archive_url() {
        let mut doc = StoreDocument::new("P", "D");
        doc.insert(make_episode(1, "Kickoff", "")).unwrap();

        let html = render_page(&doc, 2, &PageConfig::default()).unwrap();
        assert!(!html.contains("class=\"listen-link\""));
    }

    #[test]
    fn episodes_listed_newest_first_with_single_badge() {
        let html = render_page(&make_store(), 2, &PageConfig::default()).unwrap();

        let third = html.find("Episode 3: CRISPR Basics").unwrap();
        let second = html.find("Episode 2: Tools &amp; Tricks").unwrap();
        let first = html.find("Episode 1: Kickoff").unwrap();
        assert!(third < second && second < first);

        assert!(html.contains(&format!("Episode 3: CRISPR Basics {NEW_BADGE}</h3>")));
        assert!(html.contains("Episode 1: Kickoff </h3>"));
        // One badge in the page header, one on the newest episode
        assert_eq!(html.matches(NEW_BADGE).count(), 2);
    }

    #[test]
    fn summary_is_plain_text() {
        let html = render_page(&make_store(), 2, &PageConfig::default()).unwrap();
        assert!(html.contains("<p>Hello world</p>"));
    }

    #[test]
    fn bad_date_is_shown_verbatim() {
        let mut doc = StoreDocument::new("P", "D");
        let mut episode = make_episode(1, "Kickoff", "");
        episode.published = "early February".to_string();
        doc.insert(episode).unwrap();

        let html = render_page(&doc, 2, &PageConfig::default()).unwrap();
        assert!(html.contains("Published: early February |"));
    }

    #[test]
    fn other_seasons_are_excluded() {
        let mut doc = make_store();
        let mut old = make_episode(9, "Season one finale", "");
        old.season = 1;
        doc.insert(old).unwrap();

        let html = render_page(&doc, 2, &PageConfig::default()).unwrap();
        assert!(!html.contains("Season one finale"));
    }

    #[test]
    fn empty_season_renders_nothing() {
        assert!(render_page(&make_store(), 5, &PageConfig::default()).is_none());
    }

    #[test]
    fn rendering_is_idempotent() {
        let doc = make_store();
        let config = PageConfig::default();
        assert_eq!(render_page(&doc, 2, &config), render_page(&doc, 2, &config));
    }

    #[test]
    fn hosts_are_listed_with_profile_links() {
        let html = render_page(&make_store(), 2, &PageConfig::default()).unwrap();

        assert!(html.contains("<strong>Sharvari Narendra</strong> and <strong>Saba Nafees</strong>"));
        assert!(html.contains("<p>Follow them on LinkedIn:"));
        assert!(html.contains(
            r#"<a href="https://www.linkedin.com/in/saba-nafees/" style="color: #667eea;">Saba</a>"#
        ));
    }

    #[test]
    fn generate_writes_identical_files_on_rerun() {
        let dir = tempdir().unwrap();
        let store_path = dir.path().join("episode_metadata.json");
        let output = dir.path().join("season2.html");
        store::save(&store_path, &make_store()).unwrap();

        let outcome = generate_page(&store_path, 2, &output, &PageConfig::default()).unwrap();
        let first = std::fs::read(&output).unwrap();
        generate_page(&store_path, 2, &output, &PageConfig::default()).unwrap();
        let second = std::fs::read(&output).unwrap();

        assert_eq!(first, second);
        assert!(!dir.path().join("season2.html.partial").exists());
        assert_eq!(
            outcome,
            PageOutcome::Written {
                season: 2,
                episodes: vec![
                    "S02E03: CRISPR Basics".to_string(),
                    "S02E02: Tools & Tricks".to_string(),
                    "S02E01: Kickoff".to_string(),
                ]
            }
        );
    }

    #[test]
    fn generate_skips_empty_season_without_writing() {
        let dir = tempdir().unwrap();
        let store_path = dir.path().join("episode_metadata.json");
        let output = dir.path().join("season7.html");
        store::save(&store_path, &make_store()).unwrap();

        let outcome = generate_page(&store_path, 7, &output, &PageConfig::default()).unwrap();

        assert_eq!(outcome, PageOutcome::Skipped { season: 7 });
        assert!(!output.exists());
    }

    #[test]
    fn generate_fails_on_missing_store() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("season2.html");

        let err = generate_page(
            &dir.path().join("missing.json"),
            2,
            &output,
            &PageConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, GenerateError::Store(StoreError::NotFound(_))));
        assert!(!output.exists());
    }
}
