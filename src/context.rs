// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
//! Per-request deployment context derived from the branch name.

use crate::config::Config;

/// Make a raw branch name usable as a namespace name and image tag.
/// Underscores are valid in git branches but not in either of those.
pub fn sanitize_branch_name(raw: &str) -> String {
    raw.replace('_', "-")
}

/// Everything a single deploy, refresh or teardown needs to know about
/// the branch it operates on
#[derive(Debug, Clone)]
pub struct BranchContext {
    /// Sanitized branch name, doubling as the target namespace
    pub branch_name: String,
    /// Registry namespace the branch images were pushed under
    pub image_namespace: String,
    /// Namespace the resources are cloned from
    pub template_namespace: String,
    /// Prefix for image references, empty or ending in a slash
    pub registry_prefix: String,
    /// Domain appended to the branch name for ingress hosts
    pub subdomain: String,
    /// Replica count forced onto cloned workloads
    pub default_replicas: i32,
}

impl BranchContext {
    pub fn new(config: &Config, image_namespace: &str, raw_branch_name: &str) -> Self {
        BranchContext {
            branch_name: sanitize_branch_name(raw_branch_name),
            image_namespace: image_namespace.to_string(),
            template_namespace: config.template_namespace.clone(),
            registry_prefix: config.registry_prefix(),
            subdomain: config.subdomain.clone(),
            default_replicas: config.default_replicas,
        }
    }

    /// Namespace the branch environment lives in
    pub fn namespace(&self) -> &str {
        &self.branch_name
    }

    /// Full image reference for a retagged container
    pub fn branch_image(&self, resource_name: &str) -> String {
        format!(
            "{}{}/{}:{}",
            self.registry_prefix, self.image_namespace, resource_name, self.branch_name
        )
    }

    /// Repository path used when querying the registry for the branch tag
    pub fn repository_path(&self, resource_name: &str) -> String {
        format!("{}/{}", self.image_namespace, resource_name)
    }

    /// Hostname the branch environment is served under
    pub fn ingress_host(&self) -> String {
        format!("{}.{}", self.branch_name, self.subdomain)
    }
}
