// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! RSS 2.0 feed with iTunes, Google Play, Spotify and Podcasting 2.0 extensions.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};
use sha2::{Digest, Sha256};

use crate::config::FeedConfig;
use crate::error::GenerateError;
use crate::store::{self, EpisodeRecord, StoreDocument};

use super::text::{SUBTITLE_MAX_CHARS, cdata, subtitle};

/// Default output file of the feed generator
pub const DEFAULT_FEED_FILENAME: &str = "feed.xml";

const RSS_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S +0000";

const RSS_HEADER: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<?xml-stylesheet type="text/xsl" href="rss.xslt" ?>
<rss
    xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd"
    xmlns:googleplay="http://www.google.com/schemas/play-podcasts/1.0"
    xmlns:content="http://purl.org/rss/1.0/modules/content/"
    xmlns:atom="http://www.w3.org/2005/Atom"
    xmlns:spotify="http://www.spotify.com/ns/rss"
    xmlns:podcast="https://podcastindex.org/namespace/1.0"
    version="2.0">
"#;

/// What a feed generation run produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedSummary {
    pub output: PathBuf,
    pub episodes: usize,
}

/// Load the store and write the feed to `output`.
///
/// The rendered document is parsed back before anything is written, so an
/// invalid feed never replaces a good one.
pub fn generate_feed(
    store_path: &Path,
    output: &Path,
    config: &FeedConfig,
) -> Result<FeedSummary, GenerateError> {
    let document = store::load(store_path)?;
    let xml = render_feed(&document, config, Utc::now());

    rss::Channel::read_from(xml.as_bytes())?;

    store::write_replacing(output, xml).map_err(|e| GenerateError::WriteFailed {
        path: output.to_path_buf(),
        source: e,
    })?;

    Ok(FeedSummary {
        output: output.to_path_buf(),
        episodes: document.episodes.len(),
    })
}

/// Render the whole feed, items in store order
pub fn render_feed(document: &StoreDocument, config: &FeedConfig, built_at: DateTime<Utc>) -> String {
    let mut xml = String::from(RSS_HEADER);
    xml.push_str(&channel_header(document, config, built_at));

    for episode in &document.episodes {
        xml.push_str(&episode_item(episode, config));
    }

    xml.push_str("    </channel>\n</rss>");
    xml
}

/// Stable item identifier: hex SHA-256 of the title
pub fn episode_guid(title: &str) -> String {
    let digest = Sha256::digest(title.as_bytes());
    digest.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Remove the hosting attribution sentence, then trim
pub fn strip_boilerplate(description: &str, boilerplate: &str) -> String {
    if boilerplate.is_empty() {
        return description.trim().to_string();
    }
    description.replace(boilerplate, "").trim().to_string()
}

/// URL and byte length of an episode's audio enclosure
pub fn enclosure(episode: &EpisodeRecord, config: &FeedConfig) -> (String, u64) {
    let local = episode
        .local_file()
        .map(|file| config.base_dir.join(file))
        .and_then(|path| std::fs::metadata(&path).ok().map(|meta| (path, meta.len())));

    let length = local.as_ref().map_or(0, |(_, len)| *len);

    if let Some(url) = episode.archive_url() {
        return (url.to_string(), length);
    }

    let filename = local
        .as_ref()
        .and_then(|(path, _)| path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| format!("episode_{:02}.mp3", episode.number));

    let base = config.audio_base_url.trim_end_matches('/');
    (format!("{base}/{filename}"), length)
}

fn channel_header(document: &StoreDocument, config: &FeedConfig, built_at: DateTime<Utc>) -> String {
    let description = strip_boilerplate(&document.podcast_description, &config.boilerplate);
    let description = text(&description);
    let now = built_at.format(RSS_DATE_FORMAT).to_string();
    let title = text(&config.title);
    let link = text(&config.link);
    let author = text(&config.author);
    let email = text(&config.email);
    let artwork = attr(config.artwork_url());

    let mut xml = format!(
        r#"    <channel>
        <title>{title}</title>
        <link>{link}</link>
        <atom:link rel="self" type="application/rss+xml" href="{feed_url}"/>
        <description>{description}</description>
        <language>{language}</language>
        <copyright>{copyright}</copyright>
        <lastBuildDate>{now}</lastBuildDate>
        <pubDate>{now}</pubDate>
        <generator>{generator}</generator>
        <spotify:countryOfOrigin>{country}</spotify:countryOfOrigin>

        <itunes:author>{author}</itunes:author>
        <itunes:owner>
            <itunes:name>{author}</itunes:name>
            <itunes:email>{email}</itunes:email>
        </itunes:owner>
        <itunes:summary>{description}</itunes:summary>
        <itunes:explicit>false</itunes:explicit>
        <itunes:block>no</itunes:block>
        <podcast:block>no</podcast:block>
        <itunes:type>episodic</itunes:type>

        <googleplay:author>{author}</googleplay:author>
        <googleplay:email>{email}</googleplay:email>
        <googleplay:description>{description}</googleplay:description>
        <googleplay:explicit>false</googleplay:explicit>

"#,
        feed_url = attr(&config.feed_url),
        language = text(&config.language),
        copyright = text(&config.copyright),
        generator = text(&config.generator),
        country = text(&config.country),
    );

    for category in &config.categories {
        let name = text(&category.name);
        xml.push_str(&format!("        <category>{name}</category>\n"));
        match &category.subcategory {
            Some(sub) => xml.push_str(&format!(
                "        <itunes:category text=\"{}\">\n            <itunes:category text=\"{}\"/>\n        </itunes:category>\n",
                attr(&category.name),
                attr(sub)
            )),
            None => xml.push_str(&format!(
                "        <itunes:category text=\"{}\"/>\n",
                attr(&category.name)
            )),
        }
    }

    xml.push_str(&format!(
        r#"
        <image>
            <url>{artwork}</url>
            <title>{title}</title>
            <link>{link}</link>
        </image>
        <itunes:image href="{artwork}"/>
        <googleplay:image href="{artwork}"/>

"#
    ));

    xml
}

fn episode_item(episode: &EpisodeRecord, config: &FeedConfig) -> String {
    let description = strip_boilerplate(&episode.description, &config.boilerplate);
    let body = cdata(&description);
    let (audio_url, length) = enclosure(episode, config);
    let author = text(&config.author);
    let artwork = attr(config.artwork_url());

    format!(
        r#"        <item>
            <title>{title}</title>
            <guid isPermaLink="false">{guid}</guid>
            <description>{body}</description>
            <content:encoded>{body}</content:encoded>
            <pubDate>{pub_date}</pubDate>
            <enclosure url="{audio_url}" length="{length}" type="audio/mpeg"/>
            <link>{link}</link>

            <itunes:author>{author}</itunes:author>
            <itunes:explicit>false</itunes:explicit>
            <itunes:keywords>{keywords}</itunes:keywords>
            <itunes:duration>{duration}</itunes:duration>
            <itunes:episodeType>full</itunes:episodeType>
            <itunes:season>{season}</itunes:season>
            <podcast:season>{season}</podcast:season>
            <itunes:episode>{number}</itunes:episode>
            <podcast:episode>{number}</podcast:episode>
            <itunes:subtitle>{subtitle}</itunes:subtitle>

            <googleplay:author>{author}</googleplay:author>
            <googleplay:explicit>false</googleplay:explicit>

            <itunes:image href="{artwork}"/>
            <googleplay:image href="{artwork}"/>
        </item>
"#,
        title = text(&episode.title),
        guid = episode_guid(&episode.title),
        pub_date = text(&episode.published),
        audio_url = attr(&audio_url),
        link = text(&config.link),
        keywords = text(&config.keywords),
        duration = text(&episode.duration),
        season = episode.season,
        number = episode.number,
        subtitle = text(&subtitle(&description, SUBTITLE_MAX_CHARS)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::Map;
    use tempfile::tempdir;

    fn built_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 10, 8, 30, 0).unwrap()
    }

    fn crispr() -> EpisodeRecord {
        EpisodeRecord {
            season: 2,
            number: 3,
            title: "CRISPR Basics".to_string(),
            description: "<p>Hello <b>world</b></p>".to_string(),
            published: "Wed, 04 Feb 2026 12:00:00 +0000".to_string(),
            duration: "00:45:10".to_string(),
            original_audio_url: Some(String::new()),
            local_file: Some("audio/e3.mp3".to_string()),
            archive_url: Some("https://archive.org/download/x/e3.mp3".to_string()),
            extra: Map::new(),
        }
    }

    fn make_store() -> StoreDocument {
        let mut doc = StoreDocument::new(
            "A Coffee with CompBio",
            "Science & careers. Hosted on Ausha. See ausha.co/privacy-policy for more information.",
        );
        let mut older = crispr();
        older.number = 2;
        older.title = "Lab Life".to_string();
        older.archive_url = None;
        older.local_file = None;
        doc.insert(older).unwrap();
        doc.insert(crispr()).unwrap();
        doc
    }

    #[test]
    fn item_matches_crispr_episode() {
        let xml = render_feed(&make_store(), &FeedConfig::default(), built_at());

        assert!(xml.contains("<pubDate>Wed, 04 Feb 2026 12:00:00 +0000</pubDate>"));
        assert!(xml.contains(
            r#"<enclosure url="https://archive.org/download/x/e3.mp3" length="0" type="audio/mpeg"/>"#
        ));
        assert!(xml.contains("<itunes:season>2</itunes:season>"));
        assert!(xml.contains("<itunes:episode>3</itunes:episode>"));
        assert!(xml.contains("<podcast:season>2</podcast:season>"));
        assert!(xml.contains("<podcast:episode>3</podcast:episode>"));
        assert!(xml.contains("<description><![CDATA[<p>Hello <b>world</b></p>]]></description>"));
        assert!(xml.contains("<itunes:subtitle>Hello world</itunes:subtitle>"));
    }

    #[test]
    fn items_follow_store_order() {
        let xml = render_feed(&make_store(), &FeedConfig::default(), built_at());

        let newest = xml.find("<title>CRISPR Basics</title>").unwrap();
        let older = xml.find("<title>Lab Life</title>").unwrap();
        assert!(newest < older);
    }

    #[test]
    fn guid_is_stable_per_title() {
        assert_eq!(episode_guid("CRISPR Basics"), episode_guid("CRISPR Basics"));
        assert_ne!(episode_guid("CRISPR Basics"), episode_guid("CRISPR basics"));
        assert_eq!(episode_guid("").len(), 64);
        assert_eq!(
            episode_guid(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn boilerplate_is_stripped_case_sensitively() {
        let config = FeedConfig::default();
        assert_eq!(
            strip_boilerplate(
                "<p>Intro</p> Hosted on Ausha. See ausha.co/privacy-policy for more information.",
                &config.boilerplate
            ),
            "<p>Intro</p>"
        );
        let lower = "hosted on ausha. see ausha.co/privacy-policy for more information.";
        assert_eq!(strip_boilerplate(lower, &config.boilerplate), lower);
    }

    #[test]
    fn channel_uses_configured_constants() {
        let xml = render_feed(&make_store(), &FeedConfig::default(), built_at());

        assert!(xml.contains("<lastBuildDate>Tue, 10 Feb 2026 08:30:00 +0000</lastBuildDate>"));
        assert!(xml.contains("<description>Science &amp; careers.</description>"));
        assert!(xml.contains(
            "<itunes:category text=\"Science\">\n            <itunes:category text=\"Life Sciences\"/>"
        ));
        assert!(xml.contains(
            r#"<itunes:image href="https://podcast.boston-wib.org/podcast-artwork-2026.jpg"/>"#
        ));
        for ns in ["itunes", "googleplay", "content", "atom", "spotify", "podcast"] {
            assert!(xml.contains(&format!("xmlns:{ns}=")));
        }
    }

    #[test]
    fn relative_mode_switches_artwork() {
        let config = FeedConfig {
            use_relative_urls: true,
            ..FeedConfig::default()
        };
        let xml = render_feed(&make_store(), &config, built_at());

        assert!(xml.contains(r#"<itunes:image href="podcast-artwork-2026.jpg"/>"#));
        assert!(!xml.contains("https://podcast.boston-wib.org/podcast-artwork-2026.jpg"));
    }

    #[test]
    fn enclosure_falls_back_to_synthesized_name() {
        let mut episode = crispr();
        episode.archive_url = Some(String::new());
        episode.local_file = Some("audio/not-there.mp3".to_string());

        let (url, length) = enclosure(&episode, &FeedConfig::default());
        assert_eq!(url, "https://archive.org/download/acoffeewithcompbio/episode_03.mp3");
        assert_eq!(length, 0);
    }

    #[test]
    fn enclosure_uses_existing_local_file() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("audio")).unwrap();
        std::fs::write(dir.path().join("audio/S02E03.m4a"), vec![0u8; 1234]).unwrap();

        let config = FeedConfig {
            base_dir: dir.path().to_path_buf(),
            ..FeedConfig::default()
        };
        let mut episode = crispr();
        episode.archive_url = None;
        episode.local_file = Some("audio/S02E03.m4a".to_string());

        let (url, length) = enclosure(&episode, &config);
        assert_eq!(url, "https://archive.org/download/acoffeewithcompbio/S02E03.m4a");
        assert_eq!(length, 1234);

        episode.archive_url = Some("https://cdn.example/e3.m4a".to_string());
        assert_eq!(
            enclosure(&episode, &config),
            ("https://cdn.example/e3.m4a".to_string(), 1234)
        );
    }

    #[test]
    fn special_characters_are_escaped() {
        let mut doc = StoreDocument::new("P", "D");
        let mut episode = crispr();
        episode.title = "Tools & <Tricks>".to_string();
        episode.description = "<p>A & B</p> ]]> tail".to_string();
        doc.insert(episode).unwrap();

        let xml = render_feed(&doc, &FeedConfig::default(), built_at());
        assert!(xml.contains("<title>Tools &amp; &lt;Tricks&gt;</title>"));

        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let item = &channel.items()[0];
        assert_eq!(item.title(), Some("Tools & <Tricks>"));
        assert_eq!(item.description(), Some("<p>A & B</p> ]]> tail"));
    }

    #[test]
    fn subtitle_entities_are_not_double_escaped() {
        let mut doc = StoreDocument::new("P", "D");
        let mut episode = crispr();
        episode.description = "<p>Q&amp;A with Dr. O&#39;Neil</p>".to_string();
        doc.insert(episode).unwrap();

        let xml = render_feed(&doc, &FeedConfig::default(), built_at());
        assert!(xml.contains("<itunes:subtitle>Q&amp;A with Dr. O'Neil</itunes:subtitle>"));

        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let itunes = channel.items()[0].itunes_ext().unwrap();
        assert_eq!(itunes.subtitle(), Some("Q&A with Dr. O'Neil"));
    }

    #[test]
    fn rendered_feed_parses_as_rss() {
        let xml = render_feed(&make_store(), &FeedConfig::default(), built_at());
        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();

        assert_eq!(channel.title(), "A Coffee with CompBio");
        assert_eq!(channel.items().len(), 2);

        let item = &channel.items()[0];
        assert_eq!(
            item.guid().map(|g| g.value()),
            Some(episode_guid("CRISPR Basics").as_str())
        );
        assert_eq!(item.content(), Some("<p>Hello <b>world</b></p>"));

        let itunes = item.itunes_ext().unwrap();
        assert_eq!(itunes.season(), Some("2"));
        assert_eq!(itunes.episode(), Some("3"));
        assert_eq!(itunes.duration(), Some("00:45:10"));
    }

    #[test]
    fn generate_writes_feed() {
        let dir = tempdir().unwrap();
        let store_path = dir.path().join("episode_metadata.json");
        let output = dir.path().join("feed.xml");
        store::save(&store_path, &make_store()).unwrap();

        let summary = generate_feed(&store_path, &output, &FeedConfig::default()).unwrap();

        assert_eq!(summary.episodes, 2);
        let xml = std::fs::read_to_string(&output).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.ends_with("    </channel>\n</rss>"));
        assert!(!dir.path().join("feed.xml.partial").exists());
    }

    #[test]
    fn generate_fails_without_store_and_writes_nothing() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("feed.xml");

        let err = generate_feed(
            &dir.path().join("missing.json"),
            &output,
            &FeedConfig::default(),
        )
        .unwrap_err();

        assert!(matches!(err, GenerateError::Store(_)));
        assert!(!output.exists());
    }
}
