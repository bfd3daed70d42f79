//! Client construction and the encrypted request/response pipeline.

use reqwest::Method;
use reqwest::header::AUTHORIZATION;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use dietdash_core::envelope::{self, EnvelopeKey};
use dietdash_core::session::SessionStore;

use crate::form::FormPayload;
use crate::{ApiClient, ApiConfig, ApiError};

/// The single-field object a sealed JSON body travels in.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SealedPayload {
    pub payload: String,
}

/// Response and error bodies are envelopes, sent either raw or as a JSON
/// string literal. Unwrap the literal when present.
fn envelope_in(body: &str) -> String {
    serde_json::from_str::<String>(body).unwrap_or_else(|_| body.to_owned())
}

impl ApiClient {
    /// Create a client with the default configuration and the given secret.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the secret is empty or the HTTP
    /// client cannot be built.
    pub fn new(secret_key: impl Into<String>, session: SessionStore) -> Result<Self, ApiError> {
        Self::with_config(
            ApiConfig {
                secret_key: secret_key.into(),
                ..ApiConfig::default()
            },
            session,
        )
    }

    /// Create a client from full configuration plus an injected session
    /// store. The store is the only authentication state the client reads.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the secret is empty or the HTTP
    /// client cannot be built.
    pub fn with_config(config: ApiConfig, session: SessionStore) -> Result<Self, ApiError> {
        if config.secret_key.is_empty() {
            return Err(ApiError::Config(
                "missing secret key for the payload envelope".to_owned(),
            ));
        }
        let key = EnvelopeKey::derive(&config.secret_key)
            .map_err(|e| ApiError::Config(e.to_string()))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| ApiError::Config(format!("failed to build http client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            excluded_routes: config.excluded_routes,
            key,
            http,
            session,
        })
    }

    /// The injected session store.
    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// GET `path` with query parameters; opens the response envelope as `T`.
    ///
    /// Query parameters are never encrypted.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] variant except `Config`.
    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<T, ApiError> {
        let mut builder = self.request_builder(Method::GET, path).await;
        if !query.is_empty() {
            builder = builder.query(query);
        }
        self.send(builder, Method::GET, path).await
    }

    /// POST `path` with a sealed JSON body (an empty object when `None`).
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] variant except `Config`.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let payload = self.seal_body(body)?;
        let builder = self.request_builder(Method::POST, path).await.json(&payload);
        self.send(builder, Method::POST, path).await
    }

    /// POST `path` with a multipart form: text fields sealed one by one,
    /// file fields untouched.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] variant except `Config`.
    pub async fn post_form<T: DeserializeOwned>(
        &self,
        path: &str,
        form: FormPayload,
    ) -> Result<T, ApiError> {
        let sealed = form.sealed(&self.key)?;
        let builder = self
            .request_builder(Method::POST, path)
            .await
            .multipart(sealed.into_multipart()?);
        self.send(builder, Method::POST, path).await
    }

    /// PUT `path` with a sealed JSON body (an empty object when `None`).
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] variant except `Config`.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let payload = self.seal_body(body)?;
        let builder = self.request_builder(Method::PUT, path).await.json(&payload);
        self.send(builder, Method::PUT, path).await
    }

    /// PATCH `path` with a sealed JSON body (an empty object when `None`).
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] variant except `Config`.
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let payload = self.seal_body(body)?;
        let builder = self
            .request_builder(Method::PATCH, path)
            .await
            .json(&payload);
        self.send(builder, Method::PATCH, path).await
    }

    /// DELETE `path`; no body.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`] variant except `Config`.
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let builder = self.request_builder(Method::DELETE, path).await;
        self.send(builder, Method::DELETE, path).await
    }

    // ── Request path ─────────────────────────────────────────────────

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Whether `path` is on the excluded-route list (no bearer token).
    fn is_excluded(&self, path: &str) -> bool {
        self.excluded_routes
            .iter()
            .any(|route| path.starts_with(route.as_str()))
    }

    /// Base request: bearer token attached unless the route is excluded or
    /// no live session exists.
    async fn request_builder(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut builder = self.http.request(method, self.url(path));
        if !self.is_excluded(path) {
            if let Some(token) = self.session.token().await {
                builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }
        builder
    }

    /// Seal a JSON body into the single-field payload object. An absent
    /// body is sent as a sealed empty object so the server always receives
    /// a valid envelope.
    fn seal_body<B: Serialize>(&self, body: Option<&B>) -> Result<SealedPayload, ApiError> {
        let payload = match body {
            Some(value) => envelope::seal_json(&self.key, value)?,
            None => envelope::seal_str(&self.key, "{}")?,
        };
        Ok(SealedPayload { payload })
    }

    // ── Response path ────────────────────────────────────────────────

    async fn send<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        method: Method,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                if e.is_timeout() {
                    error!(%method, path, "request timed out");
                    return Err(ApiError::Timeout);
                }
                if e.is_builder() {
                    error!(%method, path, error = %e, "request construction failed");
                    return Err(ApiError::Request(e.to_string()));
                }
                error!(%method, path, error = %e, "no response from server");
                return Err(ApiError::Network(e));
            }
        };

        let status = response.status();
        if status.is_success() {
            let body = response.text().await.map_err(ApiError::Network)?;
            let opened = envelope::open_json::<T>(&self.key, &envelope_in(&body)).map_err(|e| {
                error!(%method, path, error = %e, "response payload failed to open");
                e
            })?;
            debug!(%method, path, status = status.as_u16(), "request succeeded");
            Ok(opened)
        } else {
            // Error bodies are envelopes when the server produced them
            // itself; anything else (proxies, crashes) comes through raw.
            let raw = response.text().await.unwrap_or_default();
            let message = match envelope::open_str(&self.key, &envelope_in(&raw)) {
                Ok(message) => message,
                Err(_) if raw.is_empty() => format!("HTTP {}", status.as_u16()),
                Err(_) => raw,
            };
            error!(%method, path, status = status.as_u16(), %message, "http error");
            Err(ApiError::Http {
                status: status.as_u16(),
                message,
            })
        }
    }
}
