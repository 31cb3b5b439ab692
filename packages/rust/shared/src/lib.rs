//! Shared types, error model, and configuration for postfeed.
//!
//! This crate is the foundation depended on by all other postfeed crates.
//! It provides:
//! - [`PostfeedError`] — the unified error type
//! - Output records ([`Page`], [`PostSummary`], [`PostMeta`], [`Block`])
//! - Configuration ([`AppConfig`], config loading, token resolution)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DATABASE_ID_ENV, DEFAULT_BASE_URL, DEFAULT_NOTION_VERSION, FetchConfig,
    NotionConfig, PARENT_PAGE_ID_ENV, RowPolicy, config_dir, config_file_path, init_config,
    load_config, load_config_from, resolve_token,
};
pub use error::{ExtractionKind, PostfeedError, Result};
pub use types::{Annotations, Block, Category, Page, PostMeta, PostSummary, TextBlock};
