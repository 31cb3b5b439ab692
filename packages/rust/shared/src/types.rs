//! Records handed to the rendering frontend.
//!
//! Everything here is built fresh per request and serialized as camelCase JSON.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// The parent page: only its title is exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub title: String,
}

// ---------------------------------------------------------------------------
// Posts
// ---------------------------------------------------------------------------

/// A tag from the `Categories` multi-select.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// One row of the posts listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    /// Object kind reported by the service (`"page"` for database rows).
    #[serde(rename = "type")]
    pub object: String,
    pub id: String,
    pub title: String,
    /// Start of the `CreatedAt` date range, as sent by the service.
    pub created_at: String,
    pub categories: Vec<Category>,
}

/// Metadata for a single post page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    pub site_title: String,
    pub created_at: String,
    pub categories: Vec<Category>,
    /// Empty when the page has no thumbnail.
    pub thumbnail: String,
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// Formatting flags of a rich-text run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotations {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
    #[serde(default)]
    pub strikethrough: bool,
    #[serde(default)]
    pub underline: bool,
    #[serde(default)]
    pub code: bool,
    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Annotations {
    fn default() -> Self {
        Self {
            bold: false,
            italic: false,
            strikethrough: false,
            underline: false,
            code: false,
            color: default_color(),
        }
    }
}

fn default_color() -> String {
    "default".into()
}

/// Content shared by every text-bearing block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextBlock {
    pub id: String,
    /// Plain text of the first run, or empty.
    pub text: String,
    /// Link of the first run, or empty.
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub annotations: Option<Annotations>,
}

/// A flattened content block, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    #[serde(rename = "heading_1")]
    Heading1(TextBlock),
    #[serde(rename = "heading_2")]
    Heading2(TextBlock),
    #[serde(rename = "heading_3")]
    Heading3(TextBlock),
    Paragraph(TextBlock),
    BulletedListItem(TextBlock),
    NumberedListItem(TextBlock),
    /// Any block type the frontend does not render.
    Unsupported { id: String },
}

impl Block {
    /// Identifier of the source block.
    pub fn id(&self) -> &str {
        match self {
            Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::Paragraph(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b) => &b.id,
            Self::Unsupported { id } => id,
        }
    }

    /// The `type` discriminator as serialized.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Heading1(_) => "heading_1",
            Self::Heading2(_) => "heading_2",
            Self::Heading3(_) => "heading_3",
            Self::Paragraph(_) => "paragraph",
            Self::BulletedListItem(_) => "bulleted_list_item",
            Self::NumberedListItem(_) => "numbered_list_item",
            Self::Unsupported { .. } => "unsupported",
        }
    }

    /// Text content, if this block carries any.
    pub fn text_block(&self) -> Option<&TextBlock> {
        match self {
            Self::Heading1(b)
            | Self::Heading2(b)
            | Self::Heading3(b)
            | Self::Paragraph(b)
            | Self::BulletedListItem(b)
            | Self::NumberedListItem(b) => Some(b),
            Self::Unsupported { .. } => None,
        }
    }
}
