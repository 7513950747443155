//! Wire types for the profile store API.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    pub results: Vec<CandidateDto>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateDto {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileDto {
    pub id: String,
    pub display_name: String,
    /// Portrait section rendered to plain text by the store.
    #[serde(default)]
    pub portrait: String,
}

/// Append-blocks request for the summary write.
#[derive(Debug, Serialize)]
pub struct AppendBlocksRequest {
    pub children: Vec<Block>,
}

/// One content block on a profile page.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { text: String },
    Paragraph { text: String },
    Divider,
}

impl AppendBlocksRequest {
    /// The summary layout: heading, body paragraph, trailing divider.
    pub fn summary(summary: &str) -> Self {
        Self {
            children: vec![
                Block::Heading {
                    text: "Discussion summary".to_string(),
                },
                Block::Paragraph {
                    text: summary.to_string(),
                },
                Block::Divider,
            ],
        }
    }
}
