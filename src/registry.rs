// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
//! Image registry lookups used to decide whether a branch tag was pushed.

use crate::config::RegistryConfig;
use crate::error::{EmmieError, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::instrument;
use url::Url;

/// Answers whether an image tag exists in the registry
#[async_trait]
pub trait TagRegistry: Send + Sync {
    async fn tag_exists(&self, repository: &str, tag: &str) -> Result<bool>;
}

/// Registry client speaking the Docker Registry HTTP API v2
pub struct HttpTagRegistry {
    http: reqwest::Client,
    base: Url,
}

#[derive(Deserialize)]
struct TagList {
    tags: Option<Vec<String>>,
}

impl HttpTagRegistry {
    pub fn new(config: &RegistryConfig) -> Result<Self> {
        let endpoint = format!(
            "https://{}.dkr.ecr.{}.amazonaws.com",
            config.account_id, config.region
        );
        let base = Url::parse(&endpoint)
            .map_err(|e| EmmieError::RegistryError(format!("invalid registry endpoint: {}", e)))?;
        Ok(Self::with_endpoint(base))
    }

    /// Build a client against an explicit endpoint instead of the
    /// configured registry coordinates
    pub fn with_endpoint(base: Url) -> Self {
        HttpTagRegistry {
            http: reqwest::Client::new(),
            base,
        }
    }
}

#[async_trait]
impl TagRegistry for HttpTagRegistry {
    #[instrument(skip(self))]
    async fn tag_exists(&self, repository: &str, tag: &str) -> Result<bool> {
        if repository.is_empty() || tag.is_empty() {
            return Err(EmmieError::RegistryError(
                "repository and tag must not be empty".to_string(),
            ));
        }
        let url = self
            .base
            .join(&format!("/v2/{}/tags/list", repository))
            .map_err(|e| EmmieError::RegistryError(format!("invalid repository path: {}", e)))?;
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| EmmieError::RegistryError(format!("registry unreachable: {}", e)))?;
        if !response.status().is_success() {
            return Err(EmmieError::RegistryError(format!(
                "registry returned {} for {}",
                response.status(),
                repository
            )));
        }
        let tag_list: TagList = response
            .json()
            .await
            .map_err(|e| EmmieError::RegistryError(format!("malformed tag list: {}", e)))?;
        Ok(tag_list
            .tags
            .map(|tags| tags.iter().any(|t| t == tag))
            .unwrap_or(false))
    }
}
