// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use url::Url;

use crate::error::FeedError;

/// An upstream podcast feed, as needed to seed the episode store
#[derive(Debug, Clone)]
pub struct Podcast {
    pub title: String,
    pub description: String,
    pub episodes: Vec<Episode>,
}

/// A single upstream episode, in feed order
#[derive(Debug, Clone)]
pub struct Episode {
    pub title: String,
    pub description: Option<String>,
    /// `pubDate` exactly as it appears in the feed
    pub pub_date: Option<String>,
    pub enclosure: Option<Enclosure>,
    pub duration: Option<String>,
    pub season_number: Option<u32>,
}

/// The audio file attached to an episode
#[derive(Debug, Clone)]
pub struct Enclosure {
    pub url: Url,
    pub mime_type: Option<String>,
}

/// Parse RSS feed XML bytes into a Podcast.
///
/// Items are kept even when they lack a usable enclosure; they are imported
/// without audio.
pub fn parse_feed(xml_bytes: &[u8]) -> Result<Podcast, FeedError> {
    let channel = rss::Channel::read_from(xml_bytes)?;

    let episodes = channel.items().iter().map(parse_episode).collect();

    Ok(Podcast {
        title: channel.title().to_string(),
        description: channel.description().to_string(),
        episodes,
    })
}

fn parse_episode(item: &rss::Item) -> Episode {
    let enclosure = item.enclosure().and_then(|enclosure| {
        Url::parse(enclosure.url()).ok().map(|url| Enclosure {
            url,
            mime_type: Some(enclosure.mime_type().to_string()).filter(|s| !s.is_empty()),
        })
    });

    let itunes = item.itunes_ext();

    Episode {
        title: item.title().unwrap_or_default().to_string(),
        description: item.description().map(String::from),
        pub_date: item.pub_date().map(String::from),
        enclosure,
        duration: itunes.and_then(|ext| ext.duration().map(String::from)),
        season_number: itunes.and_then(|ext| ext.season().and_then(|s| s.parse().ok())),
    }
}
