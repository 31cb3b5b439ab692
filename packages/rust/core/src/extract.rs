//! Narrowing of page properties into post records.
//!
//! Every accessor pattern-matches on [`PropertyValue`] and reports a
//! structured [`ExtractionKind`] naming the page and property on failure.

use postfeed_notion::{Page as NotionPage, PropertyValue};
use postfeed_shared::{
    Category, ExtractionKind, Page, PostMeta, PostSummary, PostfeedError, Result,
};

/// Title property of the parent page.
pub const PAGE_TITLE_PROPERTY: &str = "title";
/// Title property of a post row.
pub const POST_PROPERTY: &str = "Post";
pub const CREATED_AT_PROPERTY: &str = "CreatedAt";
pub const CATEGORIES_PROPERTY: &str = "Categories";
pub const THUMBNAIL_PROPERTY: &str = "Thumbnail";
pub const PUBLISHED_PROPERTY: &str = "Published";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The parent page's title.
pub fn page(page: &NotionPage) -> Result<Page> {
    Ok(Page {
        title: title_text(page, PAGE_TITLE_PROPERTY)?,
    })
}

/// A database row as listed on the index.
pub fn post_summary(row: &NotionPage) -> Result<PostSummary> {
    Ok(PostSummary {
        object: row.object.clone(),
        id: row.id.clone(),
        title: title_text(row, POST_PROPERTY)?,
        created_at: date_start(row, CREATED_AT_PROPERTY)?,
        categories: multi_select(row, CATEGORIES_PROPERTY)?,
    })
}

/// A post page's metadata.
pub fn post_meta(page: &NotionPage) -> Result<PostMeta> {
    Ok(PostMeta {
        site_title: title_text(page, POST_PROPERTY)?,
        created_at: date_start(page, CREATED_AT_PROPERTY)?,
        categories: multi_select(page, CATEGORIES_PROPERTY)?,
        thumbnail: thumbnail(page, THUMBNAIL_PROPERTY),
    })
}

// ---------------------------------------------------------------------------
// Property accessors
// ---------------------------------------------------------------------------

fn property<'a>(page: &'a NotionPage, name: &str) -> Result<&'a PropertyValue> {
    page.properties
        .get(name)
        .ok_or_else(|| PostfeedError::extraction(&page.id, name, ExtractionKind::Missing))
}

fn wrong_type(
    page: &NotionPage,
    name: &str,
    expected: &str,
    found: &PropertyValue,
) -> PostfeedError {
    PostfeedError::extraction(
        &page.id,
        name,
        ExtractionKind::WrongType {
            expected: expected.into(),
            found: found.type_name().into(),
        },
    )
}

/// Plain text of the first run of a title property.
pub fn title_text(page: &NotionPage, name: &str) -> Result<String> {
    match property(page, name)? {
        PropertyValue::Title { title } => title
            .first()
            .map(|run| run.plain_text.clone())
            .ok_or_else(|| PostfeedError::extraction(&page.id, name, ExtractionKind::Empty)),
        other => Err(wrong_type(page, name, "title", other)),
    }
}

/// Start of a date property's range.
pub fn date_start(page: &NotionPage, name: &str) -> Result<String> {
    match property(page, name)? {
        PropertyValue::Date { date: Some(date) } => Ok(date.start.clone()),
        PropertyValue::Date { date: None } => Err(PostfeedError::extraction(
            &page.id,
            name,
            ExtractionKind::Empty,
        )),
        other => Err(wrong_type(page, name, "date", other)),
    }
}

/// Options of a multi-select property, in source order. An empty selection is valid.
pub fn multi_select(page: &NotionPage, name: &str) -> Result<Vec<Category>> {
    match property(page, name)? {
        PropertyValue::MultiSelect { multi_select } => Ok(multi_select.clone()),
        other => Err(wrong_type(page, name, "multi_select", other)),
    }
}

/// URL of an optional thumbnail, or empty. Never fails.
///
/// Accepts a url property or, failing that, the first entry of a files property.
pub fn thumbnail(page: &NotionPage, name: &str) -> String {
    let url = match page.properties.get(name) {
        Some(PropertyValue::Url { url }) => url.as_deref(),
        Some(PropertyValue::Files { files }) => files.first().and_then(|f| f.url()),
        _ => None,
    };
    url.unwrap_or_default().to_string()
}
