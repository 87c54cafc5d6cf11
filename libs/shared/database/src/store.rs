use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::StoreError;

/// Thin JSON client for the document store. One collection per entity lives
/// at `/rest/v1/{collection}` with `field=eq.value` filter parameters.
pub struct DocumentStore {
    client: Client,
    base_url: String,
    api_key: String,
}

impl DocumentStore {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.store_url.clone(),
            api_key: config.store_api_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>, representation: bool) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(key) = HeaderValue::from_str(&self.api_key) {
            headers.insert("apikey", key);
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if representation {
            headers.insert("Prefer", HeaderValue::from_static("return=representation"));
        }

        if let Some(token) = auth_token {
            if let Ok(bearer) = HeaderValue::from_str(&format!("Bearer {}", token)) {
                headers.insert(AUTHORIZATION, bearer);
            }
        }

        headers
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        self.request_inner(method, path, auth_token, body, false).await
    }

    async fn request_inner<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        body: Option<Value>,
        representation: bool,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        debug!("Store request {} {}", method, url);

        let headers = self.get_headers(auth_token, representation);

        let mut req = self.client.request(method, &url).headers(headers);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Store error ({}): {}", status, error_text);

            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => StoreError::Auth(error_text),
                StatusCode::NOT_FOUND => StoreError::NotFound(error_text),
                StatusCode::CONFLICT => StoreError::Conflict(error_text),
                _ => StoreError::Unavailable(format!("status {}: {}", status, error_text)),
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::Payload(e.to_string()))
    }

    /// Fetch every document in `collection` matching the given filter
    /// parameters (already in `field=eq.value` form).
    pub async fn find<T>(
        &self,
        collection: &str,
        filters: &[String],
        auth_token: Option<&str>,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = if filters.is_empty() {
            format!("/rest/v1/{}", collection)
        } else {
            format!("/rest/v1/{}?{}", collection, filters.join("&"))
        };

        self.request(Method::GET, &path, auth_token, None).await
    }

    /// Fetch at most one matching document.
    pub async fn find_one<T>(
        &self,
        collection: &str,
        filters: &[String],
        auth_token: Option<&str>,
    ) -> Result<Option<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let mut query = filters.to_vec();
        query.push("limit=1".to_string());

        let mut rows: Vec<T> = self.find(collection, &query, auth_token).await?;
        Ok(if rows.is_empty() {
            None
        } else {
            Some(rows.swap_remove(0))
        })
    }

    /// Insert a document and return the stored representation. Unique-index
    /// violations come back as `StoreError::Conflict`.
    pub async fn insert<T>(
        &self,
        collection: &str,
        body: Value,
        auth_token: Option<&str>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}", collection);
        let mut rows: Vec<T> = self
            .request_inner(Method::POST, &path, auth_token, Some(body), true)
            .await?;

        if rows.is_empty() {
            return Err(StoreError::Payload(format!(
                "insert into {} returned no representation",
                collection
            )));
        }
        Ok(rows.swap_remove(0))
    }

    /// Patch the document with the given id and return the stored result.
    pub async fn update_by_id<T>(
        &self,
        collection: &str,
        id: &str,
        patch: Value,
        auth_token: Option<&str>,
    ) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        let path = format!("/rest/v1/{}?id=eq.{}", collection, id);
        let mut rows: Vec<T> = self
            .request_inner(Method::PATCH, &path, auth_token, Some(patch), true)
            .await?;

        if rows.is_empty() {
            return Err(StoreError::NotFound(format!(
                "no {} row with id {}",
                collection, id
            )));
        }
        Ok(rows.swap_remove(0))
    }
}
