// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

/// Kubernetes annotation keys used by emmie
pub mod annotations {
    /// Names the container within a workload whose image is retagged per branch
    pub const UPDATE_TARGET: &str = "emmie-update";
    /// JSON record of the resource names cloned into a branch namespace,
    /// written at creation time and consulted by teardown
    pub const CLONE_MANIFEST: &str = "emmie.io/clone-manifest";
}

/// Provenance labeling of branch namespaces
pub mod labels {
    pub const PROVENANCE_KEY: &str = "deployedBy";
    pub const PROVENANCE_VALUE: &str = "emmie";

    /// Label selector matching every namespace this system deployed
    pub fn provenance_selector() -> String {
        format!("{}={}", PROVENANCE_KEY, PROVENANCE_VALUE)
    }
}

/// Secret type minted by the platform for service accounts; never cloned
pub const SERVICE_ACCOUNT_TOKEN_TYPE: &str = "kubernetes.io/service-account-token";

/// Branch tags are mutable, so cloned containers must always re-pull
pub const PULL_POLICY_ALWAYS: &str = "Always";
