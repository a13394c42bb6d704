// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Record of what was cloned into a branch namespace.
//!
//! Written onto the namespace as an annotation at creation time so that
//! teardown can target exactly the cloned set even after the template
//! namespace has drifted.

use crate::constants::annotations;
use crate::error::{EmmieError, Result};
use crate::lifecycle::report::ResourceKind;
use k8s_openapi::api::core::v1::Namespace;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Names of the resources cloned into a branch namespace, per kind
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CloneManifest {
    #[serde(default)]
    pub config_maps: Vec<String>,
    #[serde(default)]
    pub secrets: Vec<String>,
    #[serde(default)]
    pub services: Vec<String>,
    #[serde(default)]
    pub replication_controllers: Vec<String>,
    #[serde(default)]
    pub deployments: Vec<String>,
    #[serde(default)]
    pub ingresses: Vec<String>,
}

impl CloneManifest {
    pub fn record(&mut self, kind: ResourceKind, name: &str) {
        let names = match kind {
            ResourceKind::ConfigMap => &mut self.config_maps,
            ResourceKind::Secret => &mut self.secrets,
            ResourceKind::Service => &mut self.services,
            ResourceKind::ReplicationController => &mut self.replication_controllers,
            ResourceKind::Deployment => &mut self.deployments,
            ResourceKind::Ingress => &mut self.ingresses,
        };
        names.push(name.to_string());
    }

    pub fn names(&self, kind: ResourceKind) -> &[String] {
        match kind {
            ResourceKind::ConfigMap => &self.config_maps,
            ResourceKind::Secret => &self.secrets,
            ResourceKind::Service => &self.services,
            ResourceKind::ReplicationController => &self.replication_controllers,
            ResourceKind::Deployment => &self.deployments,
            ResourceKind::Ingress => &self.ingresses,
        }
    }

    /// Read the manifest recorded on a namespace, None when missing or
    /// unparseable
    pub fn from_namespace(namespace: &Namespace) -> Option<Self> {
        let value = namespace
            .metadata
            .annotations
            .as_ref()
            .and_then(|a| a.get(annotations::CLONE_MANIFEST))?;
        match serde_json::from_str(value) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                warn!("Ignoring malformed clone manifest annotation: {}", e);
                None
            }
        }
    }

    /// Serialize for storage as a namespace annotation
    pub fn annotation_value(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| EmmieError::NamespaceError(format!("Failed to encode clone manifest: {}", e)))
    }
}
