//! Marker-based extraction of slogans and hashtags from generated copy.
//!
//! The upstream model is only *asked* to emit "Slogans:" and "Hashtags:"
//! sections; nothing enforces that it does. The split/trim/truncate
//! sequence below is the load-bearing behavior and must stay exactly as
//! is: a missing "Hashtags:" marker is an error, a missing "Slogans:"
//! marker silently yields whatever lines precede the hashtag section.

use studio_core::types::ParsedContent;
use thiserror::Error;

/// Slogans shown per campaign.
pub const MAX_SLOGANS: usize = 3;

/// Hashtags kept per campaign.
pub const MAX_HASHTAGS: usize = 5;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("generated text is missing the '{0}' marker")]
    MissingMarker(&'static str),
}

/// Split generated text into slogans and hashtags.
///
/// Mirrors the original split indexing: the hashtag section is the text
/// between the first "Hashtags:" occurrence and the next one (if any);
/// the slogan section is everything after the *last* "Slogans:"
/// occurrence before it.
pub fn parse_campaign_text(text: &str) -> Result<ParsedContent, ParseError> {
    let sections: Vec<&str> = text.split("Hashtags:").collect();
    if sections.len() < 2 {
        return Err(ParseError::MissingMarker("Hashtags:"));
    }
    let head = sections[0];
    let tail = sections[1];

    let slogan_block = head.rsplit("Slogans:").next().unwrap_or(head);
    let mut slogans = non_empty_lines(slogan_block);
    slogans.truncate(MAX_SLOGANS);

    let mut hashtags = non_empty_lines(tail);
    hashtags.truncate(MAX_HASHTAGS);

    Ok(ParsedContent { slogans, hashtags })
}

fn non_empty_lines(block: &str) -> Vec<String> {
    block
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}
