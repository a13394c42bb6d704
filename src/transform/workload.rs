// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Workload cloning with per-branch image retagging.
//!
//! ReplicationControllers and Deployments share the same pod template
//! rewrite: the container named by the update annotation gets the branch
//! image (when the registry confirms the tag, or unconditionally without
//! a registry) and every container is forced to re-pull.

use crate::constants::{annotations, PULL_POLICY_ALWAYS};
use crate::context::BranchContext;
use crate::error::{EmmieError, Result};
use crate::registry::TagRegistry;
use crate::transform::branch_meta;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{PodTemplateSpec, ReplicationController};
use kube::api::ObjectMeta;
use tracing::{info, warn};

/// Name of the container to retag, read from the workload's annotations
pub fn update_target(meta: &ObjectMeta) -> Option<&str> {
    meta.annotations
        .as_ref()
        .and_then(|a| a.get(annotations::UPDATE_TARGET))
        .map(|s| s.as_str())
}

/// Compute the branch image for a workload, or None when the template
/// image should be kept. Registry failures degrade to None so an
/// unreachable registry never blocks a clone.
async fn resolve_branch_image(
    ctx: &BranchContext,
    resource_name: &str,
    registry: Option<&dyn TagRegistry>,
) -> Option<String> {
    let candidate = ctx.branch_image(resource_name);
    let Some(registry) = registry else {
        return Some(candidate);
    };
    match registry
        .tag_exists(&ctx.repository_path(resource_name), &ctx.branch_name)
        .await
    {
        Ok(true) => Some(candidate),
        Ok(false) => {
            info!(
                "No {} tag for {}, keeping template image",
                ctx.branch_name, resource_name
            );
            None
        }
        Err(e) => {
            warn!(
                "Registry check failed for {}, keeping template image: {}",
                resource_name, e
            );
            None
        }
    }
}

/// Rewrite a pod template for the branch: retag the annotated container
/// and force every container to pull on start
async fn retag_pod_template(
    template: &PodTemplateSpec,
    workload_meta: &ObjectMeta,
    resource_name: &str,
    ctx: &BranchContext,
    registry: Option<&dyn TagRegistry>,
) -> Result<PodTemplateSpec> {
    let mut pod_template = template.clone();
    let target = update_target(workload_meta);

    if let Some(spec) = pod_template.spec.as_mut() {
        if let Some(target) = target {
            let matches = spec.containers.iter().filter(|c| c.name == target).count();
            if matches > 1 {
                return Err(EmmieError::InvalidAnnotation(format!(
                    "{} containers in {} are named {}",
                    matches, resource_name, target
                )));
            }
            if matches == 0 {
                warn!(
                    "No container named {} in {}, nothing to retag",
                    target, resource_name
                );
            } else if let Some(image) = resolve_branch_image(ctx, resource_name, registry).await {
                for container in spec.containers.iter_mut().filter(|c| c.name == target) {
                    info!(
                        "Retagging container {} in {} to {}",
                        container.name, resource_name, image
                    );
                    container.image = Some(image.clone());
                }
            }
        }
        for container in spec.containers.iter_mut() {
            container.image_pull_policy = Some(PULL_POLICY_ALWAYS.to_string());
        }
    }

    Ok(pod_template)
}

/// Clone a template replication controller into the branch namespace
pub async fn clone_replication_controller(
    template: &ReplicationController,
    ctx: &BranchContext,
    registry: Option<&dyn TagRegistry>,
) -> Result<ReplicationController> {
    let name = template.metadata.name.clone().unwrap_or_default();
    let mut spec = template.spec.clone().unwrap_or_default();
    spec.replicas = Some(ctx.default_replicas);
    if let Some(pod_template) = spec.template.take() {
        let retagged =
            retag_pod_template(&pod_template, &template.metadata, &name, ctx, registry).await?;
        spec.template = Some(retagged);
    }

    Ok(ReplicationController {
        metadata: branch_meta(&template.metadata, ctx),
        spec: Some(spec),
        ..Default::default()
    })
}

/// Clone a template deployment into the branch namespace
pub async fn clone_deployment(
    template: &Deployment,
    ctx: &BranchContext,
    registry: Option<&dyn TagRegistry>,
) -> Result<Deployment> {
    let name = template.metadata.name.clone().unwrap_or_default();
    let mut spec = template.spec.clone().unwrap_or_default();
    spec.replicas = Some(ctx.default_replicas);
    let retagged =
        retag_pod_template(&spec.template, &template.metadata, &name, ctx, registry).await?;
    spec.template = retagged;

    Ok(Deployment {
        metadata: branch_meta(&template.metadata, ctx),
        spec: Some(spec),
        ..Default::default()
    })
}
