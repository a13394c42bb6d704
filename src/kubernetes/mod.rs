// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Kubernetes cluster plumbing shared by the lifecycle operations

mod namespaces;
mod pods;

pub use namespaces::{
    branch_namespace_state, create_branch_namespace, delete_namespace, list_branch_namespaces,
    NamespaceState,
};
pub use pods::recycle_pods;
