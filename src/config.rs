// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::{bail, Context, Result};
use std::env;
use std::path::PathBuf;

/// Service configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Port the HTTP API listens on
    pub listen_port: u16,
    /// Registry host prefixed onto branch image references; empty keeps
    /// references registry-less
    pub docker_registry: String,
    /// Namespace whose resources are cloned for every branch
    pub template_namespace: String,
    /// Domain appended to branch names when rewriting ingress hosts;
    /// required, since an empty domain would yield unusable hosts
    pub subdomain: String,
    /// Replica count forced onto every cloned workload
    pub default_replicas: i32,
    /// File with one API token per line; unset disables authentication
    pub token_file: Option<PathBuf>,
    /// Registry coordinates enabling branch tag verification; unset means
    /// branch tags are assumed to exist
    pub registry: Option<RegistryConfig>,
}

/// Coordinates of the image registry used for tag verification
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    pub region: String,
    pub account_id: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let listen_port = env_or("EMMIE_LISTEN_PORT", "9080")
            .parse()
            .context("EMMIE_LISTEN_PORT must be a port number")?;
        let docker_registry = env::var("EMMIE_DOCKER_REGISTRY").unwrap_or_default();
        let template_namespace = env_or("EMMIE_TEMPLATE_NAMESPACE", "template");
        let subdomain = env::var("EMMIE_SUBDOMAIN")
            .ok()
            .filter(|v| !v.is_empty())
            .context("EMMIE_SUBDOMAIN environment variable not set")?;
        let default_replicas = env_or("EMMIE_DEFAULT_REPLICAS", "1")
            .parse()
            .context("EMMIE_DEFAULT_REPLICAS must be an integer")?;
        let token_file = env::var("EMMIE_TOKEN_FILE")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from);

        let region = env::var("EMMIE_REGISTRY_REGION").ok().filter(|v| !v.is_empty());
        let account_id = env::var("EMMIE_REGISTRY_ACCOUNT").ok().filter(|v| !v.is_empty());
        let registry = match (region, account_id) {
            (Some(region), Some(account_id)) => Some(RegistryConfig { region, account_id }),
            (None, None) => None,
            _ => bail!("EMMIE_REGISTRY_REGION and EMMIE_REGISTRY_ACCOUNT must be set together"),
        };

        Ok(Config {
            listen_port,
            docker_registry,
            template_namespace,
            subdomain,
            default_replicas,
            token_file,
            registry,
        })
    }

    /// Prefix for branch image references; carries a trailing slash whenever a
    /// registry host is configured
    pub fn registry_prefix(&self) -> String {
        if self.docker_registry.is_empty() {
            String::new()
        } else {
            format!("{}/", self.docker_registry.trim_end_matches('/'))
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}
