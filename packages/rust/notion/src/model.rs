//! Typed view of the Notion REST responses postfeed reads.
//!
//! Property values and blocks are tagged unions over the `type` field. Kinds
//! postfeed never reads collapse into an `Unsupported` catch-all so new remote
//! types never break decoding.

use std::collections::HashMap;

use postfeed_shared::{Annotations, Category};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Pages & properties
// ---------------------------------------------------------------------------

/// A page object, either standalone or a database row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Page {
    /// Object kind, `"page"` for pages and database rows.
    pub object: String,
    pub id: String,
    #[serde(default)]
    pub created_time: Option<String>,
    #[serde(default)]
    pub last_edited_time: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// A property value, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    Title { title: Vec<RichText> },
    RichText { rich_text: Vec<RichText> },
    Date { date: Option<DateValue> },
    MultiSelect { multi_select: Vec<Category> },
    Select { select: Option<Category> },
    Checkbox { checkbox: bool },
    Url { url: Option<String> },
    Files { files: Vec<FileObject> },
    Number { number: Option<f64> },
    #[serde(other)]
    Unsupported,
}

impl PropertyValue {
    /// The `type` tag as the service names it.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Title { .. } => "title",
            Self::RichText { .. } => "rich_text",
            Self::Date { .. } => "date",
            Self::MultiSelect { .. } => "multi_select",
            Self::Select { .. } => "select",
            Self::Checkbox { .. } => "checkbox",
            Self::Url { .. } => "url",
            Self::Files { .. } => "files",
            Self::Number { .. } => "number",
            Self::Unsupported => "unsupported",
        }
    }
}

/// One styled run of text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RichText {
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: Option<Annotations>,
}

/// Value of a date property.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DateValue {
    pub start: String,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub time_zone: Option<String>,
}

/// Entry of a files property: either uploaded or external.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileObject {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub external: Option<FileUrl>,
    #[serde(default)]
    pub file: Option<FileUrl>,
}

impl FileObject {
    pub fn url(&self) -> Option<&str> {
        self.external
            .as_ref()
            .or(self.file.as_ref())
            .map(|f| f.url.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileUrl {
    pub url: String,
}

// ---------------------------------------------------------------------------
// Blocks
// ---------------------------------------------------------------------------

/// A child block of a page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Block {
    #[serde(default = "default_block_object")]
    pub object: String,
    pub id: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(flatten)]
    pub kind: BlockKind,
}

fn default_block_object() -> String {
    "block".into()
}

/// Block payload, discriminated by `type`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockKind {
    #[serde(rename = "heading_1")]
    Heading1 { heading_1: TextContent },
    #[serde(rename = "heading_2")]
    Heading2 { heading_2: TextContent },
    #[serde(rename = "heading_3")]
    Heading3 { heading_3: TextContent },
    Paragraph { paragraph: TextContent },
    BulletedListItem { bulleted_list_item: TextContent },
    NumberedListItem { numbered_list_item: TextContent },
    #[serde(other)]
    Unsupported,
}

/// Rich text of a text-bearing block.
///
/// API versions before 2022-02-22 name the array `text`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TextContent {
    #[serde(default, alias = "text")]
    pub rich_text: Vec<RichText>,
}

impl TextContent {
    pub fn first_run(&self) -> Option<&RichText> {
        self.rich_text.first()
    }
}

// ---------------------------------------------------------------------------
// Lists & queries
// ---------------------------------------------------------------------------

/// One page of a cursor-paginated list endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PaginatedList<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

/// Body of a database query request.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatabaseQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

/// A single-property filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Filter {
    pub property: String,
    #[serde(flatten)]
    pub condition: FilterCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterCondition {
    Checkbox { equals: bool },
}

impl Filter {
    pub fn checkbox_equals(property: impl Into<String>, value: bool) -> Self {
        Self {
            property: property.into(),
            condition: FilterCondition::Checkbox { equals: value },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sort {
    pub property: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Descending,
}

impl Sort {
    pub fn descending(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: SortDirection::Descending,
        }
    }
}

/// Error object returned with non-2xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub status: u16,
    pub code: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn page_properties_decode_by_type() {
        let page: Page = serde_json::from_value(json!({
            "object": "page",
            "id": "p1",
            "properties": {
                "Post": { "id": "title", "type": "title", "title": [
                    { "type": "text", "plain_text": "Hello", "href": null }
                ]},
                "CreatedAt": { "id": "a", "type": "date", "date": { "start": "2021-09-01", "end": null } },
                "Published": { "id": "b", "type": "checkbox", "checkbox": true },
                "Rollup": { "id": "c", "type": "rollup", "rollup": { "type": "number", "number": 3 } }
            }
        }))
        .expect("decode page");

        assert!(matches!(
            page.properties.get("Post"),
            Some(PropertyValue::Title { title }) if title[0].plain_text == "Hello"
        ));
        assert!(matches!(
            page.properties.get("CreatedAt"),
            Some(PropertyValue::Date { date: Some(d) }) if d.start == "2021-09-01"
        ));
        assert_eq!(
            page.properties.get("Published"),
            Some(&PropertyValue::Checkbox { checkbox: true })
        );
        assert_eq!(
            page.properties.get("Rollup"),
            Some(&PropertyValue::Unsupported)
        );
    }

    #[test]
    fn unknown_block_type_decodes_as_unsupported() {
        let block: Block = serde_json::from_value(json!({
            "object": "block",
            "id": "b1",
            "type": "image",
            "has_children": false,
            "image": { "type": "external", "external": { "url": "https://example.com/a.png" } }
        }))
        .expect("decode block");

        assert_eq!(block.id, "b1");
        assert_eq!(block.kind, BlockKind::Unsupported);
    }

    #[test]
    fn legacy_text_field_is_accepted() {
        let block: Block = serde_json::from_value(json!({
            "id": "b2",
            "type": "paragraph",
            "paragraph": { "text": [ { "plain_text": "old api" } ] }
        }))
        .expect("decode legacy block");

        match block.kind {
            BlockKind::Paragraph { paragraph } => {
                assert_eq!(paragraph.rich_text[0].plain_text, "old api");
            }
            other => panic!("expected paragraph, got {other:?}"),
        }
    }

    #[test]
    fn block_without_id_is_rejected() {
        let result: std::result::Result<Block, _> = serde_json::from_value(json!({
            "type": "paragraph",
            "paragraph": { "rich_text": [] }
        }));
        assert!(result.is_err());
    }

    #[test]
    fn files_property_exposes_first_url() {
        let value: PropertyValue = serde_json::from_value(json!({
            "type": "files",
            "files": [
                { "name": "cover", "type": "external", "external": { "url": "https://example.com/cover.png" } }
            ]
        }))
        .expect("decode files");

        match value {
            PropertyValue::Files { files } => {
                assert_eq!(files[0].url(), Some("https://example.com/cover.png"));
            }
            other => panic!("expected files, got {other:?}"),
        }
    }

    #[test]
    fn query_body_matches_api_shape() {
        let query = DatabaseQuery {
            filter: Some(Filter::checkbox_equals("Published", true)),
            sorts: vec![Sort::descending("CreatedAt")],
            ..Default::default()
        };

        assert_eq!(
            serde_json::to_value(&query).expect("serialize"),
            json!({
                "filter": { "property": "Published", "checkbox": { "equals": true } },
                "sorts": [ { "property": "CreatedAt", "direction": "descending" } ]
            })
        );
    }
}
