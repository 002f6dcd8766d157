//! Filename templates assembled from user-picked tags

use super::format::FormatType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const SEPARATOR: &str = " - ";
const FALLBACK_TEMPLATE: &str = "%(title)s.%(ext)s";

/// A piece of metadata that can appear in the output filename
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilenameTag {
    Title,
    Uploader,
    Quality,
    Format,
    Website,
    Id,
    UploadDate,
    DownloadDate,
    Duration,
    Ext,
}

impl FilenameTag {
    pub const ALL: [FilenameTag; 10] = [
        FilenameTag::Title,
        FilenameTag::Uploader,
        FilenameTag::Quality,
        FilenameTag::Format,
        FilenameTag::Website,
        FilenameTag::Id,
        FilenameTag::UploadDate,
        FilenameTag::DownloadDate,
        FilenameTag::Duration,
        FilenameTag::Ext,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilenameTag::Title => "title",
            FilenameTag::Uploader => "uploader",
            FilenameTag::Quality => "quality",
            FilenameTag::Format => "format",
            FilenameTag::Website => "website",
            FilenameTag::Id => "id",
            FilenameTag::UploadDate => "upload_date",
            FilenameTag::DownloadDate => "download_date",
            FilenameTag::Duration => "duration",
            FilenameTag::Ext => "ext",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FilenameTag::Title => "Title",
            FilenameTag::Uploader => "Uploader",
            FilenameTag::Quality => "Quality",
            FilenameTag::Format => "Format",
            FilenameTag::Website => "Website",
            FilenameTag::Id => "Video ID",
            FilenameTag::UploadDate => "Upload Date",
            FilenameTag::DownloadDate => "Download Date",
            FilenameTag::Duration => "Duration",
            FilenameTag::Ext => "Extension",
        }
    }

    /// yt-dlp output template field for this tag
    pub fn field(&self, format_type: FormatType) -> &'static str {
        match self {
            FilenameTag::Title => "%(title)s",
            FilenameTag::Uploader => "%(uploader)s",
            FilenameTag::Quality => match format_type {
                FormatType::Video => "%(height)sp",
                FormatType::Audio => "%(abr)skbps",
            },
            FilenameTag::Format => "%(format_id)s",
            FilenameTag::Website => "%(extractor)s",
            FilenameTag::Id => "%(id)s",
            FilenameTag::UploadDate => "%(upload_date)s",
            FilenameTag::DownloadDate => "%(epoch>%Y%m%d)s",
            FilenameTag::Duration => "%(duration_string)s",
            FilenameTag::Ext => "%(ext)s",
        }
    }

    /// Sample value shown in the filename preview
    pub fn example(&self) -> &'static str {
        match self {
            FilenameTag::Title => "Example Video Title",
            FilenameTag::Uploader => "Channel Name",
            FilenameTag::Quality => "1080p",
            FilenameTag::Format => "mp4",
            FilenameTag::Website => "YouTube",
            FilenameTag::Id => "dQw4w9WgXcQ",
            FilenameTag::UploadDate => "20260115",
            FilenameTag::DownloadDate => "20260202",
            FilenameTag::Duration => "03-45-20",
            FilenameTag::Ext => "mp4",
        }
    }
}

impl fmt::Display for FilenameTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FilenameTag {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        FilenameTag::ALL
            .iter()
            .copied()
            .find(|tag| tag.as_str() == wanted || tag.label().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown filename tag: {}", s))
    }
}

/// Ordered, duplicate-free list of tags making up the output filename
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilenameTemplate {
    tags: Vec<FilenameTag>,
}

impl Default for FilenameTemplate {
    fn default() -> Self {
        Self {
            tags: vec![
                FilenameTag::Title,
                FilenameTag::Quality,
                FilenameTag::Uploader,
            ],
        }
    }
}

impl FilenameTemplate {
    pub fn new(tags: impl IntoIterator<Item = FilenameTag>) -> Self {
        let mut template = Self { tags: Vec::new() };
        for tag in tags {
            template.add(tag);
        }
        template
    }

    pub fn tags(&self) -> &[FilenameTag] {
        &self.tags
    }

    pub fn contains(&self, tag: FilenameTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Tags not yet selected, in canonical order
    pub fn available(&self) -> Vec<FilenameTag> {
        FilenameTag::ALL
            .iter()
            .copied()
            .filter(|tag| !self.contains(*tag))
            .collect()
    }

    /// Append a tag; returns false if it was already present
    pub fn add(&mut self, tag: FilenameTag) -> bool {
        if self.contains(tag) {
            return false;
        }
        self.tags.push(tag);
        true
    }

    /// Remove a tag; returns false if it was not selected
    pub fn remove(&mut self, tag: FilenameTag) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| *t != tag);
        self.tags.len() != before
    }

    /// yt-dlp output template, relative to the output directory
    pub fn build(&self, format_type: FormatType) -> String {
        if self.tags.is_empty() {
            return FALLBACK_TEMPLATE.to_string();
        }
        let parts: Vec<&str> = self.tags.iter().map(|t| t.field(format_type)).collect();
        format!("{}.%(ext)s", parts.join(SEPARATOR))
    }

    /// Filename the current selection would produce for sample metadata
    pub fn preview(&self) -> String {
        let parts: Vec<&str> = self.tags.iter().map(|t| t.example()).collect();
        format!("{}.mp4", parts.join(SEPARATOR))
    }
}

impl fmt::Display for FilenameTemplate {
    /// Comma separated tag keys, the form stored in settings
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.tags.iter().map(|t| t.as_str()).collect();
        f.write_str(&keys.join(","))
    }
}

impl FromStr for FilenameTemplate {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tags = s
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<FilenameTag>, _>>()?;
        Ok(Self::new(tags))
    }
}
