//! Content adapter for postfeed.
//!
//! Reads the site title, the published post list, post metadata and page
//! content from the document service and reshapes them for the frontend.

pub mod adapter;
pub mod blocks;
pub mod extract;

pub use adapter::{AdapterSettings, ContentAdapter, published_posts_query};
