//! The content adapter: the four read operations the frontend calls.
//!
//! Each operation fetches from the document service and narrows the
//! response into a plain record. No state is kept between calls.

use postfeed_notion::{ClientOptions, DatabaseQuery, Filter, NotionClient, Sort};
use postfeed_shared::{
    AppConfig, Block, FetchConfig, Page, PostMeta, PostSummary, PostfeedError, Result, RowPolicy,
};
use tracing::{info, instrument, warn};

use crate::blocks;
use crate::extract::{self, CREATED_AT_PROPERTY, PUBLISHED_PROPERTY};

/// Identifiers the adapter reads from.
#[derive(Debug, Clone, Default)]
pub struct AdapterSettings {
    /// Page whose title is the site title.
    pub parent_page_id: String,
    /// Database holding the post rows.
    pub database_id: String,
    /// Pagination and row-failure behaviour.
    pub fetch: FetchConfig,
}

impl From<&AppConfig> for AdapterSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            parent_page_id: config.notion.parent_page_id.clone(),
            database_id: config.notion.database_id.clone(),
            fetch: config.fetch.clone(),
        }
    }
}

/// Read-only adapter over a [`NotionClient`].
#[derive(Debug, Clone)]
pub struct ContentAdapter {
    client: NotionClient,
    settings: AdapterSettings,
}

impl ContentAdapter {
    pub fn new(client: NotionClient, settings: AdapterSettings) -> Self {
        Self { client, settings }
    }

    /// Build the client and adapter from loaded config and a resolved token.
    pub fn from_config(config: &AppConfig, token: impl Into<String>) -> Result<Self> {
        let opts = ClientOptions::from_config(&config.notion, token)?;
        let client = NotionClient::new(&opts)?;
        Ok(Self::new(client, AdapterSettings::from(config)))
    }

    /// Title of the configured parent page.
    #[instrument(skip_all, fields(page_id = %self.settings.parent_page_id))]
    pub async fn get_page_data(&self) -> Result<Page> {
        let page = self
            .client
            .retrieve_page(&self.settings.parent_page_id)
            .await?;
        extract::page(&page)
    }

    /// Metadata of a single post page.
    #[instrument(skip(self))]
    pub async fn get_child_page_data(&self, page_id: &str) -> Result<PostMeta> {
        if page_id.trim().is_empty() {
            return Err(PostfeedError::validation("page id must not be empty"));
        }
        let page = self.client.retrieve_page(page_id).await?;
        extract::post_meta(&page)
    }

    /// Published posts, newest first, in the order the service returns them.
    #[instrument(skip_all, fields(database_id = %self.settings.database_id))]
    pub async fn get_database_data(&self) -> Result<Vec<PostSummary>> {
        let query = published_posts_query();
        let rows = if self.settings.fetch.follow_cursors {
            self.client
                .query_database_all(&self.settings.database_id, &query)
                .await?
        } else {
            self.client
                .query_database(&self.settings.database_id, &query)
                .await?
                .results
        };

        let mut posts = Vec::with_capacity(rows.len());
        for row in &rows {
            match extract::post_summary(row) {
                Ok(post) => posts.push(post),
                Err(e) if self.settings.fetch.row_policy == RowPolicy::Skip => {
                    warn!(row_id = %row.id, error = %e, "skipping malformed post row");
                }
                Err(e) => return Err(e),
            }
        }

        info!(rows = rows.len(), posts = posts.len(), "posts listed");
        Ok(posts)
    }

    /// Flattened content blocks of a page, in document order.
    #[instrument(skip(self))]
    pub async fn get_blocks_data(&self, page_id: &str) -> Result<Vec<Block>> {
        if page_id.trim().is_empty() {
            return Err(PostfeedError::validation("page id must not be empty"));
        }
        let children = if self.settings.fetch.follow_cursors {
            self.client.list_all_block_children(page_id).await?
        } else {
            self.client.list_block_children(page_id, None).await?.results
        };

        let blocks = blocks::flatten_all(&children);
        info!(blocks = blocks.len(), "blocks flattened");
        Ok(blocks)
    }
}

/// Published rows only, newest `CreatedAt` first.
pub fn published_posts_query() -> DatabaseQuery {
    DatabaseQuery {
        filter: Some(Filter::checkbox_equals(PUBLISHED_PROPERTY, true)),
        sorts: vec![Sort::descending(CREATED_AT_PROPERTY)],
        ..Default::default()
    }
}
