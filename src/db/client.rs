/// REST client for the hosted PostgREST-style data service
///
/// Every operation composes `<service>/rest/v1/<collection>?<query>`, attaches the API-key
/// headers, disables caching and performs one independent request. Non-2xx answers become
/// `DbError::Remote` carrying the response body. No retries, no extra timeouts.

use crate::config::DatabaseConfig;
use crate::db::error::{DbError, DbResult};
use crate::db::query::{append_pairs, Filters, Query, TextSearch};
use reqwest::header::{
    HeaderMap, HeaderValue, AUTHORIZATION, CACHE_CONTROL, CONTENT_RANGE, CONTENT_TYPE,
};
use reqwest::{Method, RequestBuilder, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

const RETURN_REPRESENTATION: &str = "return=representation";
const COUNT_EXACT: &str = "count=exact";

/// Query-builder client over named collections
#[derive(Debug, Clone)]
pub struct DataClient {
    http: reqwest::Client,
    /// Service root without trailing slash
    base_url: String,
    key: ServiceKey,
}

/// Pre-validated `apikey` and `Authorization` header values
#[derive(Debug, Clone)]
pub(crate) struct ServiceKey {
    apikey: HeaderValue,
    bearer: HeaderValue,
}

impl ServiceKey {
    pub(crate) fn parse(api_key: &str) -> DbResult<Self> {
        let apikey = HeaderValue::from_str(api_key).map_err(|_| DbError::InvalidApiKey)?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", api_key))
            .map_err(|_| DbError::InvalidApiKey)?;
        Ok(Self { apikey, bearer })
    }

    pub(crate) fn apikey(&self) -> &HeaderValue {
        &self.apikey
    }
}

impl DataClient {
    /// Create a client for the service described by `config`
    pub fn new(config: &DatabaseConfig) -> DbResult<Self> {
        Self::with_http(reqwest::Client::new(), config)
    }

    /// Create a client sharing an existing HTTP client
    pub fn with_http(http: reqwest::Client, config: &DatabaseConfig) -> DbResult<Self> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|_| DbError::InvalidUrl(config.url.clone()))?;
        let key = ServiceKey::parse(&config.anon_key)?;

        Ok(Self {
            http,
            base_url,
            key,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Read rows: `select=<columns>` plus one `<field>=eq.<value>` per filter
    pub async fn select<R: DeserializeOwned>(
        &self,
        collection: &str,
        columns: &str,
        filters: &Filters,
    ) -> DbResult<Vec<R>> {
        let query = Query::new(columns).filters(filters.clone());
        self.select_query(collection, &query).await
    }

    /// Read rows with ordering and limit
    pub async fn select_query<R: DeserializeOwned>(
        &self,
        collection: &str,
        query: &Query,
    ) -> DbResult<Vec<R>> {
        let url = self.endpoint(collection, &query.to_pairs())?;
        self.execute(self.request(Method::GET, url, RETURN_REPRESENTATION))
            .await
    }

    /// Exact row count of the filtered collection, read from `Content-Range`
    pub async fn count(&self, collection: &str, filters: &Filters) -> DbResult<u64> {
        let url = self.endpoint(collection, &Query::new("*").filters(filters.clone()).to_pairs())?;
        let response = self
            .request(Method::HEAD, url, COUNT_EXACT)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            return Err(remote_error(status, body));
        }

        let total = parse_total(
            response
                .headers()
                .get(CONTENT_RANGE)
                .and_then(|value| value.to_str().ok()),
        );
        tracing::debug!("🔢 {} rows counted in '{}'", total, collection);
        Ok(total)
    }

    /// OR-combined case-insensitive partial match over several fields
    pub async fn search<R: DeserializeOwned>(
        &self,
        collection: &str,
        search: &TextSearch,
        limit: Option<usize>,
    ) -> DbResult<Vec<R>> {
        let mut pairs = vec![
            ("select".to_string(), "*".to_string()),
            ("or".to_string(), search.render()),
        ];
        if let Some(limit) = limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        let url = self.endpoint(collection, &pairs)?;
        self.execute(self.request(Method::GET, url, RETURN_REPRESENTATION))
            .await
    }

    /// Insert one record; the body is always sent as a one-element array
    pub async fn insert<B, R>(&self, collection: &str, record: &B) -> DbResult<Vec<R>>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        self.insert_many(collection, std::slice::from_ref(record))
            .await
    }

    /// Insert several records in one request
    pub async fn insert_many<B, R>(&self, collection: &str, records: &[B]) -> DbResult<Vec<R>>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.endpoint(collection, &[])?;
        self.execute(
            self.request(Method::POST, url, RETURN_REPRESENTATION)
                .json(records),
        )
        .await
    }

    /// Partially update every row matching `filters`
    pub async fn update<B, R>(
        &self,
        collection: &str,
        patch: &B,
        filters: &Filters,
    ) -> DbResult<Vec<R>>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.endpoint(collection, &filters.to_pairs())?;
        self.execute(
            self.request(Method::PATCH, url, RETURN_REPRESENTATION)
                .json(patch),
        )
        .await
    }

    /// Delete every row matching `filters`; a 204 answer yields no rows
    pub async fn delete<R: DeserializeOwned>(
        &self,
        collection: &str,
        filters: &Filters,
    ) -> DbResult<Vec<R>> {
        let url = self.endpoint(collection, &filters.to_pairs())?;
        self.execute(self.request(Method::DELETE, url, RETURN_REPRESENTATION))
            .await
    }

    fn endpoint(&self, collection: &str, pairs: &[(String, String)]) -> DbResult<Url> {
        validate_collection(collection)?;
        let raw = format!("{}/rest/v1/{}", self.base_url, collection);
        let mut url = Url::parse(&raw).map_err(|_| DbError::InvalidUrl(raw.clone()))?;
        append_pairs(&mut url, pairs);
        Ok(url)
    }

    fn request(&self, method: Method, url: Url, prefer: &'static str) -> RequestBuilder {
        tracing::debug!("🌍 Data service request: {} {}", method, url);
        self.http
            .request(method, url)
            .headers(service_headers(&self.key, prefer))
    }

    async fn execute<R: DeserializeOwned>(&self, builder: RequestBuilder) -> DbResult<Vec<R>> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(remote_error(status, body));
        }

        decode_rows(status, &body)
    }
}

/// Headers every data service request carries
fn service_headers(key: &ServiceKey, prefer: &'static str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert("apikey", key.apikey.clone());
    headers.insert(AUTHORIZATION, key.bearer.clone());
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert("prefer", HeaderValue::from_static(prefer));
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
    headers
}

fn validate_collection(collection: &str) -> DbResult<()> {
    let valid = !collection.is_empty()
        && collection
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if valid {
        Ok(())
    } else {
        Err(DbError::InvalidCollection(collection.to_string()))
    }
}

fn remote_error(status: StatusCode, body: String) -> DbError {
    tracing::warn!("❌ Data service answered {}: {}", status, body);
    DbError::Remote {
        status: status.as_u16(),
        body,
    }
}

/// Normalise a successful body into rows
///
/// 204 and empty bodies are never parsed. A lone JSON object becomes one row.
pub(crate) fn decode_rows<R: DeserializeOwned>(status: StatusCode, body: &str) -> DbResult<Vec<R>> {
    if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(body)? {
        Value::Array(rows) => rows
            .into_iter()
            .map(|row| serde_json::from_value(row).map_err(DbError::from))
            .collect(),
        row => Ok(vec![serde_json::from_value(row)?]),
    }
}

/// Total from a `Content-Range` value such as `0-24/3573` or `*/0`
pub(crate) fn parse_total(content_range: Option<&str>) -> u64 {
    content_range
        .and_then(|range| range.rsplit_once('/'))
        .and_then(|(_, total)| total.trim().parse().ok())
        .unwrap_or(0)
}
