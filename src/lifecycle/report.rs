// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Per-resource outcome accumulation for clone and teardown fan-out

use std::fmt;

/// Resource kinds cloned from the template namespace, in clone order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    ConfigMap,
    Secret,
    Service,
    ReplicationController,
    Deployment,
    Ingress,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ResourceKind::ConfigMap => "ConfigMap",
            ResourceKind::Secret => "Secret",
            ResourceKind::Service => "Service",
            ResourceKind::ReplicationController => "ReplicationController",
            ResourceKind::Deployment => "Deployment",
            ResourceKind::Ingress => "Ingress",
        };
        f.write_str(kind)
    }
}

/// What happened to one resource during a fan-out operation
#[derive(Debug, Clone)]
pub struct ResourceOutcome {
    pub kind: ResourceKind,
    pub name: String,
    pub error: Option<String>,
}

/// Accumulated outcomes of cloning a template set into a branch namespace
#[derive(Debug, Default)]
pub struct CloneReport {
    pub outcomes: Vec<ResourceOutcome>,
}

impl CloneReport {
    pub fn record_ok(&mut self, kind: ResourceKind, name: &str) {
        self.outcomes.push(ResourceOutcome {
            kind,
            name: name.to_string(),
            error: None,
        });
    }

    pub fn record_err(&mut self, kind: ResourceKind, name: &str, error: String) {
        self.outcomes.push(ResourceOutcome {
            kind,
            name: name.to_string(),
            error: Some(error),
        });
    }

    /// Resources that failed to clone
    pub fn failures(&self) -> Vec<&ResourceOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some()).collect()
    }

    /// Number of resources created
    pub fn created(&self) -> usize {
        self.outcomes.iter().filter(|o| o.error.is_none()).count()
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(|o| o.error.is_none())
    }
}

/// Accumulated outcomes of tearing a branch namespace down
#[derive(Debug, Default)]
pub struct TeardownReport {
    pub outcomes: Vec<ResourceOutcome>,
    pub namespace_deleted: bool,
}

impl TeardownReport {
    pub fn record_ok(&mut self, kind: ResourceKind, name: &str) {
        self.outcomes.push(ResourceOutcome {
            kind,
            name: name.to_string(),
            error: None,
        });
    }

    pub fn record_err(&mut self, kind: ResourceKind, name: &str, error: String) {
        self.outcomes.push(ResourceOutcome {
            kind,
            name: name.to_string(),
            error: Some(error),
        });
    }

    pub fn failures(&self) -> Vec<&ResourceOutcome> {
        self.outcomes.iter().filter(|o| o.error.is_some()).collect()
    }
}

/// Result of a deploy request: either a brand-new environment or a
/// refresh of one that already existed
#[derive(Debug)]
pub enum DeployOutcome {
    Created(CloneReport),
    Refreshed { pods_recycled: usize },
}
