// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pure transforms turning template resources into their branch copies.
//!
//! Each transform rebuilds metadata from scratch so that platform-owned
//! fields (uid, resourceVersion, creationTimestamp) never leak into the
//! create call for the branch namespace.

mod config_map;
mod ingress;
mod secret;
mod service;
mod workload;

pub use config_map::clone_config_map;
pub use ingress::clone_ingress;
pub use secret::{clone_secret, is_service_account_token};
pub use service::clone_service;
pub use workload::{clone_deployment, clone_replication_controller, update_target};

use crate::context::BranchContext;
use kube::api::ObjectMeta;

/// Rebuild metadata for a cloned resource: same name, labels and
/// annotations, target namespace swapped in, everything platform-owned
/// dropped
pub fn branch_meta(template: &ObjectMeta, ctx: &BranchContext) -> ObjectMeta {
    ObjectMeta {
        name: template.name.clone(),
        namespace: Some(ctx.namespace().to_string()),
        labels: template.labels.clone(),
        annotations: template.annotations.clone(),
        ..Default::default()
    }
}
