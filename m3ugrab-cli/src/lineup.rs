//! Lineup-file parsing.
//!
//! The file interleaves channel metadata lines with the stream URLs that
//! belong to them:
//!
//! ```text
//! ## comment
//! News 24 || news24.my || News || https://img.example/news24.png
//! https://www.youtube.com/watch?v=abc123
//! ```
//!
//! The whole file is parsed up front so malformed config fails the run
//! before any network traffic.

use stream_resolvers::ChannelIdentity;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LineupError {
    #[error("line {line}: channel metadata needs four '||'-delimited fields, got {got}")]
    ShortMetadata { line: usize, got: usize },
    #[error("line {line}: stream URL before any channel metadata line")]
    UrlBeforeMetadata { line: usize },
}

/// A channel metadata line: the resolver-facing identity plus the playlist
/// logo, which only the `#EXTINF` line uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMeta {
    pub identity: ChannelIdentity,
    pub logo: String,
}

/// One metadata line and the stream URLs declared under it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelBlock {
    pub meta: ChannelMeta,
    pub urls: Vec<String>,
}

pub fn parse_lineup(content: &str) -> Result<Vec<ChannelBlock>, LineupError> {
    let mut blocks: Vec<ChannelBlock> = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        let number = idx + 1;

        if line.is_empty() || line.starts_with("##") {
            continue;
        }

        if line.starts_with("https:") || line.starts_with("http:") {
            let Some(block) = blocks.last_mut() else {
                return Err(LineupError::UrlBeforeMetadata { line: number });
            };
            block.urls.push(line.to_string());
            continue;
        }

        let fields: Vec<&str> = line.split("||").map(str::trim).collect();
        if fields.len() < 4 {
            return Err(LineupError::ShortMetadata {
                line: number,
                got: fields.len(),
            });
        }

        blocks.push(ChannelBlock {
            meta: ChannelMeta {
                identity: ChannelIdentity {
                    name: fields[0].to_string(),
                    id: fields[1].to_string(),
                    category: fields[2].to_string(),
                },
                logo: fields[3].to_string(),
            },
            urls: Vec::new(),
        });
    }

    Ok(blocks)
}
