// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::path::{Path, PathBuf};

/// An Apple Podcasts category with its subcategory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub subcategory: Option<String>,
}

impl Category {
    pub fn new(name: &str, subcategory: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            subcategory: subcategory.map(String::from),
        }
    }
}

/// Channel-level constants for the generated RSS feed
#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub title: String,
    pub link: String,
    pub feed_url: String,
    pub artwork_url_absolute: String,
    pub artwork_url_relative: String,
    /// Use the relative artwork URL, for local previews and same-origin hosting
    pub use_relative_urls: bool,
    /// Base for placeholder enclosure URLs of episodes not yet uploaded
    pub audio_base_url: String,
    /// Base of uploaded files on the hosting service
    pub archive_base_url: String,
    pub author: String,
    pub email: String,
    pub copyright: String,
    pub language: String,
    pub country: String,
    pub generator: String,
    pub keywords: String,
    pub categories: Vec<Category>,
    /// Attribution sentence removed from descriptions before publishing
    pub boilerplate: String,
    /// Directory that `local_file` paths are relative to
    pub base_dir: PathBuf,
}

impl FeedConfig {
    pub fn artwork_url(&self) -> &str {
        if self.use_relative_urls {
            &self.artwork_url_relative
        } else {
            &self.artwork_url_absolute
        }
    }

    /// Hosting URL of an uploaded audio file, by file name
    pub fn archive_url_for(&self, audio_file: &Path) -> Option<String> {
        let name = audio_file.file_name()?.to_str()?;
        Some(format!(
            "{}/{}",
            self.archive_base_url.trim_end_matches('/'),
            name
        ))
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: "A Coffee with CompBio".to_string(),
            link: "https://podcast.boston-wib.org".to_string(),
            feed_url: "https://podcast.boston-wib.org/feed.xml".to_string(),
            artwork_url_absolute: "https://podcast.boston-wib.org/podcast-artwork-2026.jpg"
                .to_string(),
            artwork_url_relative: "podcast-artwork-2026.jpg".to_string(),
            use_relative_urls: false,
            audio_base_url: "https://archive.org/download/acoffeewithcompbio".to_string(),
            archive_base_url: "https://archive.org/download/acoffeewithcompbio".to_string(),
            author: "Lorena Pantano".to_string(),
            email: "lorena.pantano@gmail.com".to_string(),
            copyright: "Lorena Pantano".to_string(),
            language: "en".to_string(),
            country: "us".to_string(),
            generator: "Self-hosted podcast feed".to_string(),
            keywords: "life science,data science,bioinformatics,computational biology"
                .to_string(),
            categories: vec![
                Category::new("Science", Some("Life Sciences")),
                Category::new("Business", Some("Careers")),
            ],
            boilerplate: "Hosted on Ausha. See ausha.co/privacy-policy for more information."
                .to_string(),
            base_dir: PathBuf::from("."),
        }
    }
}

/// A season host shown on the archive page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Host {
    pub name: String,
    pub short_name: String,
    pub profile_url: String,
}

/// Fixed text of the static archive page
#[derive(Debug, Clone)]
pub struct PageConfig {
    pub podcast_name: String,
    pub home_link: String,
    pub hosts: Vec<Host>,
    pub footer: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            podcast_name: "A Coffee with CompBio".to_string(),
            home_link: "index.html".to_string(),
            hosts: vec![
                Host {
                    name: "Sharvari Narendra".to_string(),
                    short_name: "Sharvari".to_string(),
                    profile_url: "https://www.linkedin.com/in/sharvarinarendra/".to_string(),
                },
                Host {
                    name: "Saba Nafees".to_string(),
                    short_name: "Saba".to_string(),
                    profile_url: "https://www.linkedin.com/in/saba-nafees/".to_string(),
                },
            ],
            footer: "&copy; 2026 A Coffee with CompBio &bull; Hosted independently".to_string(),
        }
    }
}
