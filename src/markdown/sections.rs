// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::MarkdownError;

/// Sections every episode document must contain, in reporting order
pub const REQUIRED_SECTIONS: [&str; 4] = ["Metadata", "Description", "Links", "Footer"];

/// Metadata keys every episode document must define, in reporting order
pub const REQUIRED_FIELDS: [&str; 6] = [
    "Season",
    "Episode",
    "Title",
    "Published",
    "Duration",
    "Audio File",
];

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^## (.+)").unwrap());

static METADATA_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-\s+\*\*(.+?):\*\*\s*(.+)").unwrap());

/// A markdown document split on `## Heading` lines
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    bodies: HashMap<String, String>,
}

impl Sections {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.bodies.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Fail with every required section that is absent
    pub fn require(&self) -> Result<(), MarkdownError> {
        let names = missing(&REQUIRED_SECTIONS, |name| self.bodies.contains_key(name));
        if names.is_empty() {
            Ok(())
        } else {
            Err(MarkdownError::MissingSection { names })
        }
    }
}

/// Split a document into sections.
///
/// Lines before the first heading are dropped, as are `---` separator lines.
/// Each body is trimmed.
pub fn parse_sections(text: &str) -> Sections {
    let mut bodies = HashMap::new();
    let mut current: Option<String> = None;
    let mut lines: Vec<&str> = Vec::new();

    for line in text.lines() {
        if let Some(caps) = HEADING.captures(line) {
            if let Some(name) = current.take() {
                bodies.insert(name, lines.join("\n").trim().to_string());
            }
            current = Some(caps[1].trim().to_string());
            lines.clear();
        } else if line.trim() == "---" {
            continue;
        } else if current.is_some() {
            lines.push(line);
        }
    }

    if let Some(name) = current {
        bodies.insert(name, lines.join("\n").trim().to_string());
    }

    Sections { bodies }
}

/// `- **Key:** Value` pairs from the Metadata section
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    fields: HashMap<String, String>,
}

impl Metadata {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }

    /// Fail with every required field that is absent
    pub fn require(&self) -> Result<(), MarkdownError> {
        let names = missing(&REQUIRED_FIELDS, |name| self.fields.contains_key(name));
        if names.is_empty() {
            Ok(())
        } else {
            Err(MarkdownError::MissingField { names })
        }
    }
}

pub fn parse_metadata(text: &str) -> Metadata {
    let fields = text
        .lines()
        .filter_map(|line| METADATA_LINE.captures(line))
        .map(|caps| (caps[1].trim().to_string(), caps[2].trim().to_string()))
        .collect();

    Metadata { fields }
}

fn missing(required: &[&str], present: impl Fn(&str) -> bool) -> Vec<String> {
    required
        .iter()
        .filter(|name| !present(name))
        .map(|name| name.to_string())
        .collect()
}
