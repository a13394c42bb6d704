// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Pod recycling for branch refreshes

use crate::error::Result;
use k8s_openapi::api::core::v1::Pod;
use kube::{
    api::{DeleteParams, ListParams},
    Api, Client, ResourceExt,
};
use tracing::{info, instrument, warn};

/// Delete every pod in a namespace so its workload controllers recreate
/// them with freshly pulled images. Returns how many pods were deleted;
/// per-pod failures are logged and skipped.
#[instrument(skip(client))]
pub async fn recycle_pods(client: &Client, namespace: &str) -> Result<usize> {
    let pods: Api<Pod> = Api::namespaced(client.clone(), namespace);
    let pod_list = pods.list(&ListParams::default()).await?;

    let mut deleted = 0;
    for pod in &pod_list.items {
        let name = pod.name_any();
        match pods.delete(&name, &DeleteParams::default()).await {
            Ok(_) => {
                info!("Deleted pod {}/{}", namespace, name);
                deleted += 1;
            }
            Err(e) => {
                warn!("Failed to delete pod {}/{}: {}", namespace, name, e);
            }
        }
    }

    Ok(deleted)
}
