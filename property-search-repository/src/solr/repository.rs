//! Solr repository implementation.
//!
//! Single reader/writer of the search index. Every mutation is followed by
//! an explicit commit so a successful write is visible to the next read.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{debug, error};

use property_search_shared::{Property, SearchRequest};

use crate::errors::SearchIndexError;
use crate::interfaces::SearchIndexRepository;
use crate::solr::document::{decode_document, SolrDocument};
use crate::solr::query::build_select_params;

/// Client timeout for every engine call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Search index repository backed by a single Solr core.
pub struct SolrRepository {
    base_url: String,
    client: reqwest::Client,
}

/// Shape of a Solr `select` response.
#[derive(Debug, Deserialize)]
struct SolrSelectResponse {
    response: SolrResponseBody,
}

#[derive(Debug, Deserialize)]
struct SolrResponseBody {
    #[serde(rename = "numFound")]
    num_found: u64,
    docs: Vec<Map<String, Value>>,
}

impl SolrRepository {
    /// Create a repository for the given core URL
    /// (e.g. `http://localhost:8983/solr/properties`).
    pub fn new(solr_url: &str) -> Result<Self, SearchIndexError> {
        let client = reqwest::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        Ok(Self {
            base_url: solr_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Commit pending changes so subsequent reads observe them.
    async fn commit(&self) -> Result<(), SearchIndexError> {
        let response = self
            .client
            .post(format!("{}/update", self.base_url))
            .json(&json!({"commit": {}}))
            .send()
            .await
            .map_err(|e| SearchIndexError::commit(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = body_excerpt(response).await;
            return Err(SearchIndexError::commit(format!(
                "commit failed with status {status}: {body}"
            )));
        }
        Ok(())
    }
}

/// Truncated response body for error messages.
async fn body_excerpt(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    body.chars().take(256).collect()
}

#[async_trait]
impl SearchIndexRepository for SolrRepository {
    async fn ping(&self) -> Result<(), SearchIndexError> {
        let params = [("q", "*:*"), ("rows", "0"), ("wt", "json")];
        let response = self
            .client
            .get(format!("{}/select", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchIndexError::connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = body_excerpt(response).await;
            return Err(SearchIndexError::connection(format!(
                "ping failed with status {status}: {body}"
            )));
        }
        Ok(())
    }

    async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<(Vec<Property>, usize), SearchIndexError> {
        let params = build_select_params(request);

        let response = self
            .client
            .get(format!("{}/select", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| SearchIndexError::query(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = body_excerpt(response).await;
            return Err(SearchIndexError::query(format!(
                "select failed with status {status}: {body}"
            )));
        }

        let decoded: SolrSelectResponse = response
            .json()
            .await
            .map_err(|e| SearchIndexError::parse(e.to_string()))?;

        // Documents that fail to decode are dropped individually; the rest
        // of the page is still served.
        let properties: Vec<Property> = decoded
            .response
            .docs
            .iter()
            .filter_map(decode_document)
            .collect();

        debug!(
            total = decoded.response.num_found,
            returned = properties.len(),
            "search executed"
        );

        Ok((properties, decoded.response.num_found as usize))
    }

    async fn index(&self, property: &Property) -> Result<(), SearchIndexError> {
        let document = SolrDocument::from_property(property);
        debug!(id = %property.id, title = %property.title, "indexing property");

        let response = self
            .client
            .post(format!("{}/update/json/docs", self.base_url))
            .json(&document)
            .send()
            .await
            .map_err(|e| SearchIndexError::index(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = body_excerpt(response).await;
            error!(id = %property.id, status = %status, body = %body, "index request failed");
            return Err(SearchIndexError::index(format!(
                "index failed with status {status}: {body}"
            )));
        }

        self.commit().await
    }

    async fn update(&self, property: &Property) -> Result<(), SearchIndexError> {
        // Re-indexing the same id replaces the whole document.
        self.index(property).await
    }

    async fn delete(&self, property_id: &str) -> Result<(), SearchIndexError> {
        let body = json!({"delete": {"id": property_id}});

        let response = self
            .client
            .post(format!("{}/update", self.base_url))
            .json(&body)
            .send()
            .await
            .map_err(|e| SearchIndexError::delete(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = body_excerpt(response).await;
            error!(id = %property_id, status = %status, body = %body, "delete request failed");
            return Err(SearchIndexError::delete(format!(
                "delete failed with status {status}: {body}"
            )));
        }

        self.commit().await
    }
}
