//! Front-matter posts written into the Hugo content tree.
//!
//! Both post kinds share one stencil and differ only in the `type` field:
//!
//! ```text
//! ---
//! title: Hawaii Trip
//! date: "2022-05-30"
//! type: "gallery"
//! cover: "IMG_0001.jpg"
//! ---
//! ```

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{ImportError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";
const FRONT_MATTER_DELIMITER: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostKind {
    Gallery,
    Collection,
}

impl PostKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PostKind::Gallery => "gallery",
            PostKind::Collection => "collection",
        }
    }
}

impl FromStr for PostKind {
    type Err = PostParseError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "gallery" => Ok(PostKind::Gallery),
            "collection" => Ok(PostKind::Collection),
            other => Err(PostParseError::InvalidType(other.to_string())),
        }
    }
}

impl fmt::Display for PostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostRecord {
    pub kind: PostKind,
    pub title: String,
    pub date: NaiveDate,
    /// Bare file name for galleries, asset-relative path for collections
    pub cover: String,
}

impl PostRecord {
    pub fn render(&self) -> String {
        format!(
            "{delim}\ntitle: {}\ndate: \"{}\"\ntype: \"{}\"\ncover: \"{}\"\n{delim}\n",
            self.title,
            self.date.format(DATE_FORMAT),
            self.kind,
            self.cover,
            delim = FRONT_MATTER_DELIMITER,
        )
    }

    /// Read a post back from its markdown text.
    ///
    /// The stencil is not escaped, so fields are read line by line: `title`
    /// is taken verbatim and the quoted fields lose exactly one pair of quotes.
    pub fn parse(markdown: &str) -> std::result::Result<Self, PostParseError> {
        let body = markdown
            .strip_prefix(FRONT_MATTER_DELIMITER)
            .and_then(|rest| rest.strip_prefix('\n'))
            .ok_or(PostParseError::MissingFrontMatter)?;

        let mut title = None;
        let mut date = None;
        let mut kind = None;
        let mut cover = None;

        let mut closed = false;
        for line in body.lines() {
            if line == FRONT_MATTER_DELIMITER {
                closed = true;
                break;
            }
            let (key, value) = line
                .split_once(": ")
                .or_else(|| line.strip_suffix(':').map(|key| (key, "")))
                .ok_or_else(|| PostParseError::MalformedLine(line.to_string()))?;

            match key {
                "title" => title = Some(value.to_string()),
                "date" => date = Some(unquote("date", value)?),
                "type" => kind = Some(unquote("type", value)?.parse::<PostKind>()?),
                "cover" => cover = Some(unquote("cover", value)?.to_string()),
                _ => {}
            }
        }
        if !closed {
            return Err(PostParseError::MissingFrontMatter);
        }

        let date = date.ok_or(PostParseError::MissingField("date"))?;
        let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| PostParseError::InvalidDate(date.to_string()))?;

        Ok(PostRecord {
            kind: kind.ok_or(PostParseError::MissingField("type"))?,
            title: title.ok_or(PostParseError::MissingField("title"))?,
            date,
            cover: cover.ok_or(PostParseError::MissingField("cover"))?,
        })
    }

    /// Create or truncate `path` and write the post, synced to disk before returning
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| ImportError::write(path, e))?;
        let mut writer = BufWriter::new(file);
        writer
            .write_all(self.render().as_bytes())
            .map_err(|e| ImportError::write(path, e))?;

        let file = writer
            .into_inner()
            .map_err(|e| ImportError::write(path, e.into_error()))?;
        file.sync_all().map_err(|e| ImportError::write(path, e))?;

        Ok(())
    }
}

fn unquote<'a>(key: &'static str, value: &'a str) -> std::result::Result<&'a str, PostParseError> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(PostParseError::Unquoted(key))
}

#[derive(Debug, thiserror::Error)]
pub enum PostParseError {
    #[error("no front matter block")]
    MissingFrontMatter,

    #[error("malformed front matter line {0:?}")]
    MalformedLine(String),

    #[error("missing field {0}")]
    MissingField(&'static str),

    #[error("field {0} is not quoted")]
    Unquoted(&'static str),

    #[error("unknown post type {0:?}")]
    InvalidType(String),

    #[error("invalid date {0:?}")]
    InvalidDate(String),
}
