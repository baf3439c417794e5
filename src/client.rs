use reqwest::{Client, StatusCode};
use tracing::warn;

use crate::catalog::{Area, Location};
use crate::error::{Error, Result};
use crate::store::{BulkOutcome, DynamicPage, PageCandidate};

/// Typed client for the deskhaven HTTP API, used by the operator CLI.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub async fn locations(&self) -> Result<Vec<Location>> {
        let url = format!("{}/api/locations", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(format!("location list failed with {status}")));
        }
        Ok(response.json().await?)
    }

    /// Area fetches are best-effort: any transport failure or non-2xx status
    /// degrades to an empty list so the operator can simply retry the toggle.
    pub async fn areas(&self, location_id: i64) -> Vec<Area> {
        let url = format!("{}/api/locations/{}/areas", self.base_url, location_id);
        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => match response.json().await {
                Ok(areas) => areas,
                Err(err) => {
                    warn!(location_id, ?err, "area response did not parse; treating as empty");
                    Vec::new()
                }
            },
            Ok(response) => {
                warn!(location_id, status = %response.status(), "area fetch rejected; treating as empty");
                Vec::new()
            }
            Err(err) => {
                warn!(location_id, ?err, "area fetch failed; treating as empty");
                Vec::new()
            }
        }
    }

    /// Submits a candidate batch. A transport or server failure surfaces as
    /// one error and the caller's selections stay intact for a retry.
    pub async fn submit_bulk(&self, candidates: &[PageCandidate]) -> Result<BulkOutcome> {
        let url = format!("{}/api/admin/dynamic-pages/bulk", self.base_url);
        let response = self.http.post(&url).json(candidates).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api(format!("bulk submit failed with {status}: {body}")));
        }
        Ok(response.json().await?)
    }

    pub async fn list_pages(&self) -> Result<Vec<DynamicPage>> {
        let url = format!("{}/api/dynamic-pages", self.base_url);
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api(format!("page list failed with {status}")));
        }
        Ok(response.json().await?)
    }

    pub async fn page_by_slug(&self, slug: &str) -> Result<Option<DynamicPage>> {
        let url = format!("{}/api/dynamic-pages/slug/{}", self.base_url, slug);
        let response = self.http.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.json().await?)),
            status => Err(Error::Api(format!("slug lookup failed with {status}"))),
        }
    }
}
