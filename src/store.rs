//! Credential-scoped row store over a PostgREST-style API (Supabase).
//!
//! Every request carries the project `apikey` plus a bearer token. By
//! default the bearer is the anon key; passing a user's access token
//! scopes the call to that user's row-level permissions instead. No
//! session or cookie management lives here.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

const ENV_URL: &str = "SUPABASE_URL";
const ENV_ANON_KEY: &str = "SUPABASE_ANON_KEY";
const CLIENT_INFO: &str = "smartstocks-server";

/// Error raised by the row store client.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required environment variable is unset or blank.
    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    /// Non-success HTTP status from the store API.
    #[error("store API returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request never produced a status.
    #[error("store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body could not be decoded.
    #[error("malformed store response: {0}")]
    Malformed(String),
}

/// REST client for row reads and writes against `/rest/v1/{table}`.
pub struct SessionStore {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl SessionStore {
    /// Builds a store from `SUPABASE_URL` and `SUPABASE_ANON_KEY`.
    pub fn from_env() -> Result<Self, StoreError> {
        let (base_url, anon_key) = credentials(
            std::env::var(ENV_URL).ok(),
            std::env::var(ENV_ANON_KEY).ok(),
        )?;
        Ok(Self::new(base_url, anon_key))
    }

    pub fn new(base_url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
        }
    }

    /// Rows from `table`, shaped by a PostgREST `select` column list and
    /// `{column}={operator}.{value}` filter pairs.
    pub async fn select<T>(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, &str)],
        access_token: Option<&str>,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
    {
        let response = self
            .select_request(table, columns, filters, access_token)
            .send()
            .await
            .map_err(StoreError::Transport)?;
        let body = Self::read_body(response).await?;
        parse_rows(&body)
    }

    /// Inserts `rows` into `table` and returns the stored representation.
    pub async fn insert<T, R>(
        &self,
        table: &str,
        rows: &R,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
        R: Serialize + ?Sized,
    {
        let response = self
            .insert_request(table, rows, access_token)
            .send()
            .await
            .map_err(StoreError::Transport)?;
        let body = Self::read_body(response).await?;
        parse_rows(&body)
    }

    /// Inserts `rows`, merging into existing rows on conflict. When
    /// `on_conflict` names a column, that column decides row identity;
    /// otherwise the primary key does.
    pub async fn upsert<T, R>(
        &self,
        table: &str,
        rows: &R,
        on_conflict: Option<&str>,
        access_token: Option<&str>,
    ) -> Result<Vec<T>, StoreError>
    where
        T: DeserializeOwned,
        R: Serialize + ?Sized,
    {
        let response = self
            .upsert_request(table, rows, on_conflict, access_token)
            .send()
            .await
            .map_err(StoreError::Transport)?;
        let body = Self::read_body(response).await?;
        parse_rows(&body)
    }

    fn request(
        &self,
        method: Method,
        table: &str,
        access_token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let bearer = access_token.unwrap_or(&self.anon_key);
        self.client
            .request(method, format!("{}/rest/v1/{}", self.base_url, table))
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
            .header("X-Client-Info", CLIENT_INFO)
    }

    fn select_request(
        &self,
        table: &str,
        columns: &str,
        filters: &[(&str, &str)],
        access_token: Option<&str>,
    ) -> reqwest::RequestBuilder {
        self.request(Method::GET, table, access_token)
            .query(&[("select", columns)])
            .query(filters)
    }

    fn insert_request<R>(
        &self,
        table: &str,
        rows: &R,
        access_token: Option<&str>,
    ) -> reqwest::RequestBuilder
    where
        R: Serialize + ?Sized,
    {
        self.request(Method::POST, table, access_token)
            .header("Prefer", "return=representation")
            .json(rows)
    }

    fn upsert_request<R>(
        &self,
        table: &str,
        rows: &R,
        on_conflict: Option<&str>,
        access_token: Option<&str>,
    ) -> reqwest::RequestBuilder
    where
        R: Serialize + ?Sized,
    {
        let mut request = self
            .request(Method::POST, table, access_token)
            .header("Prefer", "resolution=merge-duplicates,return=representation");
        if let Some(column) = on_conflict {
            request = request.query(&[("on_conflict", column)]);
        }
        request.json(rows)
    }

    async fn read_body(response: reqwest::Response) -> Result<String, StoreError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(StoreError::Http {
                status: status.as_u16(),
                body,
            });
        }
        response.text().await.map_err(StoreError::Transport)
    }
}

fn credentials(
    url: Option<String>,
    anon_key: Option<String>,
) -> Result<(String, String), StoreError> {
    let url = url
        .filter(|v| !v.is_empty())
        .ok_or(StoreError::MissingEnv(ENV_URL))?;
    let anon_key = anon_key
        .filter(|v| !v.is_empty())
        .ok_or(StoreError::MissingEnv(ENV_ANON_KEY))?;
    Ok((url, anon_key))
}

fn parse_rows<T: DeserializeOwned>(body: &str) -> Result<Vec<T>, StoreError> {
    serde_json::from_str(body).map_err(|e| StoreError::Malformed(e.to_string()))
}
