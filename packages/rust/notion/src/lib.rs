//! Notion API access for postfeed.
//!
//! A small, read-only client over `reqwest` for the endpoints postfeed needs
//! (page retrieval, database query, block children), plus the typed response
//! model those endpoints decode into.

pub mod client;
pub mod model;

pub use client::{ClientOptions, NotionClient};
pub use model::{
    Block, BlockKind, DatabaseQuery, DateValue, FileObject, Filter, Page, PaginatedList,
    PropertyValue, RichText, Sort, SortDirection, TextContent,
};
pub use postfeed_shared::{DEFAULT_BASE_URL, DEFAULT_NOTION_VERSION};
