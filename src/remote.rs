//! HTTP engagement adapter.
//!
//! Turns overlay actions into POST requests against a configured API:
//!
//! | action   | request                                           |
//! |----------|---------------------------------------------------|
//! | like     | `POST {base}/articles/{id}/like`                  |
//! | favorite | `POST {base}/articles/{id}/favorite`              |
//! | comment  | `POST {base}/articles/{id}/comments` `{"text":…}` |
//!
//! Any non-2xx answer is [`CallbackError::Rejected`]. The bearer token, when
//! configured, is kept in a [`SecretString`] and only exposed while building
//! the `Authorization` header.

use crate::article::ArticleId;
use crate::callbacks::{ArticleCallbacks, CallbackError};
use crate::util::{validate_api_base_url, UrlValidationError};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Per-request timeout.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Serialize)]
struct CommentBody<'a> {
    text: &'a str,
}

struct Inner {
    client: reqwest::Client,
    base: Url,
    token: Option<SecretString>,
}

/// Cheaply cloneable client for the engagement API.
#[derive(Clone)]
pub struct HttpCallbacks {
    inner: Arc<Inner>,
}

impl HttpCallbacks {
    /// Build an adapter for `base_url`.
    ///
    /// The URL must be HTTPS (plain HTTP is accepted for loopback hosts only).
    pub fn new(base_url: &str, token: Option<SecretString>) -> Result<Self, UrlValidationError> {
        let base = validate_api_base_url(base_url)?;

        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        tracing::info!(base_url = %base, authenticated = token.is_some(), "Engagement API configured");

        Ok(Self {
            inner: Arc::new(Inner {
                client,
                base,
                token,
            }),
        })
    }

    /// `{base}/articles/{id}/{action}`, with the id escaped as one path segment.
    fn endpoint(&self, id: &ArticleId, action: &str) -> Url {
        let mut url = self.inner.base.clone();
        // http(s) URLs always have a path that can take segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["articles", id.as_str(), action]);
        }
        url
    }

    async fn post(
        &self,
        id: &ArticleId,
        action: &str,
        body: Option<CommentBody<'_>>,
    ) -> Result<(), CallbackError> {
        let url = self.endpoint(id, action);
        let mut request = self.inner.client.post(url.clone());

        if let Some(token) = &self.inner.token {
            request = request.bearer_auth(token.expose_secret());
        }
        if let Some(body) = body {
            request = request.json(&body);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!(url = %url, status = status.as_u16(), "Engagement request finished");

        if status.is_success() {
            Ok(())
        } else {
            Err(CallbackError::Rejected {
                status: status.as_u16(),
            })
        }
    }

    pub async fn like(&self, id: ArticleId) -> Result<(), CallbackError> {
        self.post(&id, "like", None).await
    }

    pub async fn favorite(&self, id: ArticleId) -> Result<(), CallbackError> {
        self.post(&id, "favorite", None).await
    }

    /// Post a comment; `text` is sent exactly as given.
    pub async fn comment(&self, id: ArticleId, text: String) -> Result<(), CallbackError> {
        self.post(&id, "comments", Some(CommentBody { text: &text }))
            .await
    }

    /// Wire every overlay handler to this adapter.
    pub fn into_callbacks(self) -> ArticleCallbacks {
        let like = self.clone();
        let favorite = self.clone();
        let comment = self;
        ArticleCallbacks::new()
            .with_like(move |id| {
                let api = like.clone();
                async move { api.like(id).await }
            })
            .with_favorite(move |id| {
                let api = favorite.clone();
                async move { api.favorite(id).await }
            })
            .with_comment(move |id, text| {
                let api = comment.clone();
                async move { api.comment(id, text).await }
            })
    }
}
