//! Read-only HTTP client for the three Notion endpoints postfeed uses.

use std::time::Duration;

use postfeed_shared::{
    DEFAULT_BASE_URL, DEFAULT_NOTION_VERSION, ExtractionKind, NotionConfig, PostfeedError, Result,
};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use crate::model::{Block, DatabaseQuery, ErrorBody, Page, PaginatedList};

/// User-Agent string for API requests.
const USER_AGENT: &str = concat!("postfeed/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API version.
const NOTION_VERSION_HEADER: &str = "Notion-Version";

/// Property name used in extraction errors about the response body itself.
const RESPONSE_PROPERTY: &str = "<response>";

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Connection settings for [`NotionClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Integration token, sent as a bearer credential.
    pub token: String,
    /// API root including the version segment (e.g. `https://api.notion.com/v1`).
    pub base_url: Url,
    /// `Notion-Version` header value.
    pub notion_version: String,
    /// Request timeout; `None` keeps the transport default.
    pub timeout_secs: Option<u64>,
}

impl ClientOptions {
    /// Options pointing at the public API.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            token: token.into(),
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            notion_version: DEFAULT_NOTION_VERSION.into(),
            timeout_secs: None,
        })
    }

    /// Build options from the `[notion]` config section.
    pub fn from_config(config: &NotionConfig, token: impl Into<String>) -> Result<Self> {
        Ok(Self {
            token: token.into(),
            base_url: parse_base_url(&config.base_url)?,
            notion_version: config.notion_version.clone(),
            timeout_secs: config.timeout_secs,
        })
    }

    /// Replace the API root (mock servers, proxies).
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| PostfeedError::config(format!("invalid base URL '{raw}': {e}")))?;
    if url.cannot_be_a_base() {
        return Err(PostfeedError::config(format!(
            "base URL '{raw}' cannot carry a path"
        )));
    }
    Ok(url)
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Notion API client. Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: Client,
    base_url: Url,
}

impl NotionClient {
    /// Create a client with auth and version headers preset.
    pub fn new(opts: &ClientOptions) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", opts.token))
            .map_err(|_| PostfeedError::config("token contains invalid header characters"))?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);

        let version = HeaderValue::from_str(&opts.notion_version).map_err(|_| {
            PostfeedError::config(format!("invalid Notion-Version '{}'", opts.notion_version))
        })?;
        headers.insert(NOTION_VERSION_HEADER, version);

        let mut builder = Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers);
        if let Some(secs) = opts.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        let http = builder
            .build()
            .map_err(|e| PostfeedError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: opts.base_url.clone(),
        })
    }

    /// `GET /pages/{page_id}`
    #[instrument(skip_all, fields(page_id = %page_id))]
    pub async fn retrieve_page(&self, page_id: &str) -> Result<Page> {
        let url = self.endpoint(&["pages", page_id]);
        debug!(%url, "retrieving page");
        self.send(self.http.get(url.clone()), &url, page_id).await
    }

    /// `POST /databases/{database_id}/query` — one page of results.
    #[instrument(skip_all, fields(database_id = %database_id))]
    pub async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<PaginatedList<Page>> {
        let url = self.endpoint(&["databases", database_id, "query"]);
        debug!(%url, cursor = ?query.start_cursor, "querying database");
        let list: PaginatedList<Page> = self
            .send(self.http.post(url.clone()).json(query), &url, database_id)
            .await?;
        debug!(rows = list.results.len(), has_more = list.has_more, "query page received");
        Ok(list)
    }

    /// Run `query` and follow `next_cursor` until the result set is exhausted.
    pub async fn query_database_all(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<Vec<Page>> {
        let mut query = query.clone();
        let mut rows = Vec::new();
        loop {
            let list = self.query_database(database_id, &query).await?;
            rows.extend(list.results);
            match list.next_cursor {
                Some(next) if list.has_more => {
                    if query.start_cursor.as_deref() == Some(next.as_str()) {
                        return Err(repeated_cursor(database_id, &next));
                    }
                    query.start_cursor = Some(next);
                }
                _ => break,
            }
        }
        Ok(rows)
    }

    /// `GET /blocks/{block_id}/children` — one page of children.
    #[instrument(skip_all, fields(block_id = %block_id))]
    pub async fn list_block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<PaginatedList<Block>> {
        let mut url = self.endpoint(&["blocks", block_id, "children"]);
        if let Some(cursor) = start_cursor {
            url.query_pairs_mut().append_pair("start_cursor", cursor);
        }
        debug!(%url, "listing block children");
        let list: PaginatedList<Block> =
            self.send(self.http.get(url.clone()), &url, block_id).await?;
        debug!(blocks = list.results.len(), has_more = list.has_more, "children page received");
        Ok(list)
    }

    /// List every child of `block_id`, following `next_cursor`.
    pub async fn list_all_block_children(&self, block_id: &str) -> Result<Vec<Block>> {
        let mut cursor: Option<String> = None;
        let mut blocks = Vec::new();
        loop {
            let list = self.list_block_children(block_id, cursor.as_deref()).await?;
            blocks.extend(list.results);
            match list.next_cursor {
                Some(next) if list.has_more => {
                    if cursor.as_deref() == Some(next.as_str()) {
                        return Err(repeated_cursor(block_id, &next));
                    }
                    cursor = Some(next);
                }
                _ => break,
            }
        }
        Ok(blocks)
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    /// Append percent-encoded path segments to the API root.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url rejects cannot-be-a-base URLs, so this always succeeds.
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Send a request and decode a JSON body, mapping failures onto the error taxonomy.
    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
        object_id: &str,
    ) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| PostfeedError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PostfeedError::Network(format!("{url}: failed to read body: {e}")))?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            PostfeedError::extraction(
                object_id,
                RESPONSE_PROPERTY,
                ExtractionKind::Malformed(e.to_string()),
            )
        })
    }
}

/// A `next_cursor` equal to the one just sent would repeat the same page forever.
fn repeated_cursor(object_id: &str, cursor: &str) -> PostfeedError {
    PostfeedError::extraction(
        object_id,
        RESPONSE_PROPERTY,
        ExtractionKind::Malformed(format!("next_cursor `{cursor}` repeats the previous cursor")),
    )
}

/// Turn a non-2xx response into [`PostfeedError::Api`], keeping the service's own wording.
fn api_error(status: StatusCode, body: &str) -> PostfeedError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(err) => PostfeedError::Api {
            status: err.status,
            code: err.code,
            message: err.message,
        },
        Err(_) => PostfeedError::Api {
            status: status.as_u16(),
            code: "unknown".into(),
            message: body.trim().to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Filter, Sort};
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> NotionClient {
        let opts = ClientOptions::new("secret-token")
            .and_then(|o| o.with_base_url(&format!("{}/v1", server.uri())))
            .expect("options");
        NotionClient::new(&opts).expect("client")
    }

    #[test]
    fn endpoint_appends_segments() {
        let opts = ClientOptions::new("t").expect("options");
        let client = NotionClient::new(&opts).expect("client");
        let url = client.endpoint(&["blocks", "abc", "children"]);
        assert_eq!(url.as_str(), "https://api.notion.com/v1/blocks/abc/children");
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let opts = ClientOptions::new("t")
            .and_then(|o| o.with_base_url("http://localhost:9000/v1/"))
            .expect("options");
        let client = NotionClient::new(&opts).expect("client");
        assert_eq!(
            client.endpoint(&["pages", "p1"]).as_str(),
            "http://localhost:9000/v1/pages/p1"
        );
    }

    #[test]
    fn invalid_base_url_is_config_error() {
        let err = ClientOptions::new("t")
            .and_then(|o| o.with_base_url("not a url"))
            .unwrap_err();
        assert!(matches!(err, PostfeedError::Config { .. }));
    }

    #[tokio::test]
    async fn retrieve_page_sends_auth_and_version() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/pages/p1"))
            .and(header("authorization", "Bearer secret-token"))
            .and(header("notion-version", DEFAULT_NOTION_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "page",
                "id": "p1",
                "properties": {}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let page = client.retrieve_page("p1").await.unwrap();
        assert_eq!(page.id, "p1");
        assert!(page.properties.is_empty());
    }

    #[tokio::test]
    async fn api_error_is_surfaced_verbatim() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/pages/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "object": "error",
                "status": 404,
                "code": "object_not_found",
                "message": "Could not find page with ID: missing."
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.retrieve_page("missing").await.unwrap_err();
        match err {
            PostfeedError::Api {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 404);
                assert_eq!(code, "object_not_found");
                assert_eq!(message, "Could not find page with ID: missing.");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_error_body_keeps_http_status() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/pages/p1"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.retrieve_page("p1").await.unwrap_err();
        assert!(err.is_transport());
        assert!(err.to_string().contains("502"));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[tokio::test]
    async fn malformed_body_is_extraction_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/blocks/p1/children"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "results": [ { "type": "paragraph", "paragraph": { "rich_text": [] } } ]
            })))
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.list_block_children("p1", None).await.unwrap_err();
        match err {
            PostfeedError::Extraction {
                object_id,
                property,
                kind: ExtractionKind::Malformed(_),
            } => {
                assert_eq!(object_id, "p1");
                assert_eq!(property, RESPONSE_PROPERTY);
            }
            other => panic!("expected malformed extraction error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn query_database_posts_filter_and_sort() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/databases/db1/query"))
            .and(body_json(json!({
                "filter": { "property": "Published", "checkbox": { "equals": true } },
                "sorts": [ { "property": "CreatedAt", "direction": "descending" } ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "results": [ { "object": "page", "id": "r1", "properties": {} } ],
                "next_cursor": null,
                "has_more": false
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let query = DatabaseQuery {
            filter: Some(Filter::checkbox_equals("Published", true)),
            sorts: vec![Sort::descending("CreatedAt")],
            ..Default::default()
        };
        let list = client.query_database("db1", &query).await.unwrap();
        assert_eq!(list.results.len(), 1);
        assert!(!list.has_more);
    }

    #[tokio::test]
    async fn list_all_children_follows_cursors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/blocks/p1/children"))
            .and(query_param("start_cursor", "c2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [ { "id": "b3", "type": "divider", "divider": {} } ],
                "next_cursor": null,
                "has_more": false
            })))
            .with_priority(1)
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/v1/blocks/p1/children"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    { "id": "b1", "type": "divider", "divider": {} },
                    { "id": "b2", "type": "divider", "divider": {} }
                ],
                "next_cursor": "c2",
                "has_more": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let blocks = client.list_all_block_children("p1").await.unwrap();
        let ids: Vec<&str> = blocks.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, ["b1", "b2", "b3"]);
    }

    #[tokio::test]
    async fn repeated_cursor_stops_block_listing() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/blocks/p1/children"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [ { "id": "b1", "type": "divider", "divider": {} } ],
                "next_cursor": "stuck",
                "has_more": true
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client.list_all_block_children("p1").await.unwrap_err();
        match err {
            PostfeedError::Extraction {
                object_id,
                kind: ExtractionKind::Malformed(reason),
                ..
            } => {
                assert_eq!(object_id, "p1");
                assert!(reason.contains("stuck"));
            }
            other => panic!("expected malformed extraction error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn repeated_cursor_stops_database_query() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/databases/db1/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "object": "list",
                "results": [ { "object": "page", "id": "r1", "properties": {} } ],
                "next_cursor": "stuck",
                "has_more": true
            })))
            .expect(2)
            .mount(&server)
            .await;

        let client = client_for(&server).await;
        let err = client
            .query_database_all("db1", &DatabaseQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PostfeedError::Extraction { kind: ExtractionKind::Malformed(_), .. }
        ));
    }
}
