//! Video link parsing.
//!
//! Accepts full watch links, short links, embed links and bare 11-character
//! video ids.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static LINK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://)?(www\.)?(youtube\.com|youtu\.?be)/.+$").expect("valid link pattern")
});

static ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:v=|/embed/|/v/|/e/|youtu\.be/)([A-Za-z0-9_-]{11})").expect("valid id pattern")
});

static BARE_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid bare id pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaLinkError {
    #[error("'{0}' is not a recognised video link")]
    Unrecognised(String),

    #[error("no video id found in '{0}'")]
    MissingId(String),
}

/// Extract the media id from a link or a bare id.
pub fn parse_media_link(input: &str) -> Result<String, MediaLinkError> {
    let input = input.trim();

    if BARE_ID_REGEX.is_match(input) {
        return Ok(input.to_string());
    }

    if !LINK_REGEX.is_match(input) {
        return Err(MediaLinkError::Unrecognised(input.to_string()));
    }

    ID_REGEX
        .captures(input)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| MediaLinkError::MissingId(input.to_string()))
}
