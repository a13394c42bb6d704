// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Directory of active branch environments

use crate::error::Result;
use crate::kubernetes::list_branch_namespaces;
use kube::{Client, ResourceExt};
use serde::Serialize;

/// One deployed branch environment, as reported by the listing API
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EnvironmentSummary {
    pub branch: String,
    /// RFC 3339 creation time of the branch namespace
    pub created: Option<String>,
}

/// List every branch environment this system deployed
pub async fn list_environments(client: &Client) -> Result<Vec<EnvironmentSummary>> {
    let namespaces = list_branch_namespaces(client).await?;
    Ok(namespaces
        .iter()
        .map(|ns| EnvironmentSummary {
            branch: ns.name_any(),
            created: ns
                .metadata
                .creation_timestamp
                .as_ref()
                .map(|t| t.0.to_rfc3339()),
        })
        .collect())
}
