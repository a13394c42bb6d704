// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Branch environment lifecycle: deploy, refresh, teardown and lookups.
//!
//! All state of record lives in the cluster. Each operation is a single
//! ordered sequence of API calls against the injected client; per-resource
//! failures during fan-out are accumulated instead of aborting siblings.

use crate::config::Config;
use crate::constants::annotations;
use crate::context::{sanitize_branch_name, BranchContext};
use crate::error::Result;
use crate::kubernetes::{
    branch_namespace_state, create_branch_namespace, delete_namespace, recycle_pods,
    NamespaceState,
};
use crate::lifecycle::directory::{list_environments, EnvironmentSummary};
use crate::lifecycle::manifest::CloneManifest;
use crate::lifecycle::report::{CloneReport, DeployOutcome, ResourceKind, TeardownReport};
use crate::registry::TagRegistry;
use crate::transform::{
    clone_config_map, clone_deployment, clone_ingress, clone_replication_controller, clone_secret,
    clone_service, is_service_account_token,
};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{ConfigMap, ReplicationController, Secret, Service};
use k8s_openapi::api::networking::v1::Ingress;
use kube::api::{DeleteParams, ListParams, PostParams};
use kube::{Api, Client, Resource, ResourceExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Drives branch environments through their lifecycle against a cluster
pub struct LifecycleManager {
    client: Client,
    config: Config,
    registry: Option<Arc<dyn TagRegistry>>,
}

/// Snapshot of the template namespace taken at the start of a clone
struct TemplateSet {
    config_maps: Vec<ConfigMap>,
    secrets: Vec<Secret>,
    services: Vec<Service>,
    replication_controllers: Vec<ReplicationController>,
    deployments: Vec<Deployment>,
    ingresses: Vec<Ingress>,
}

impl TemplateSet {
    fn manifest(&self) -> CloneManifest {
        let mut manifest = CloneManifest::default();
        for cm in &self.config_maps {
            manifest.record(ResourceKind::ConfigMap, &cm.name_any());
        }
        for secret in &self.secrets {
            manifest.record(ResourceKind::Secret, &secret.name_any());
        }
        for service in &self.services {
            manifest.record(ResourceKind::Service, &service.name_any());
        }
        for rc in &self.replication_controllers {
            manifest.record(ResourceKind::ReplicationController, &rc.name_any());
        }
        for deployment in &self.deployments {
            manifest.record(ResourceKind::Deployment, &deployment.name_any());
        }
        for ingress in &self.ingresses {
            manifest.record(ResourceKind::Ingress, &ingress.name_any());
        }
        manifest
    }
}

impl LifecycleManager {
    pub fn new(client: Client, config: Config, registry: Option<Arc<dyn TagRegistry>>) -> Self {
        LifecycleManager {
            client,
            config,
            registry,
        }
    }

    fn context(&self, image_namespace: &str, raw_branch_name: &str) -> BranchContext {
        BranchContext::new(&self.config, image_namespace, raw_branch_name)
    }

    /// Deploy a branch: clone the template namespace when the branch is
    /// new, recycle its pods when it is already deployed
    #[instrument(skip(self))]
    pub async fn deploy(&self, image_namespace: &str, raw_branch_name: &str) -> Result<DeployOutcome> {
        let ctx = self.context(image_namespace, raw_branch_name);
        match branch_namespace_state(&self.client, ctx.namespace()).await? {
            NamespaceState::Active(_) => {
                info!("Branch {} already deployed, refreshing", ctx.namespace());
                let pods_recycled = recycle_pods(&self.client, ctx.namespace()).await?;
                Ok(DeployOutcome::Refreshed { pods_recycled })
            }
            NamespaceState::Absent => self.clone_template(&ctx).await,
        }
    }

    /// Recycle every pod of a deployed branch so its workloads restart
    /// with freshly pulled images
    #[instrument(skip(self))]
    pub async fn refresh(&self, raw_branch_name: &str) -> Result<usize> {
        let branch = sanitize_branch_name(raw_branch_name);
        let pods_recycled = recycle_pods(&self.client, &branch).await?;
        info!("Recycled {} pods in {}", pods_recycled, branch);
        Ok(pods_recycled)
    }

    /// Delete everything that was cloned for a branch, then the namespace
    /// itself. Tearing down a branch that is not deployed is a no-op.
    #[instrument(skip(self))]
    pub async fn teardown(&self, raw_branch_name: &str) -> Result<TeardownReport> {
        let branch = sanitize_branch_name(raw_branch_name);
        let namespace = match branch_namespace_state(&self.client, &branch).await? {
            NamespaceState::Absent => {
                info!("Branch {} is not deployed, nothing to tear down", branch);
                return Ok(TeardownReport::default());
            }
            NamespaceState::Active(ns) => ns,
        };

        let manifest = match CloneManifest::from_namespace(&namespace) {
            Some(manifest) => manifest,
            None => self.recovered_manifest().await,
        };

        let mut report = TeardownReport::default();

        // Workloads go first so nothing is recreated while the resources
        // it mounts disappear underneath it
        let rcs: Api<ReplicationController> = Api::namespaced(self.client.clone(), &branch);
        for name in manifest.names(ResourceKind::ReplicationController) {
            record_delete(&rcs, ResourceKind::ReplicationController, &branch, name, &mut report)
                .await;
        }
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), &branch);
        for name in manifest.names(ResourceKind::Deployment) {
            record_delete(&deployments, ResourceKind::Deployment, &branch, name, &mut report).await;
        }
        let services: Api<Service> = Api::namespaced(self.client.clone(), &branch);
        for name in manifest.names(ResourceKind::Service) {
            record_delete(&services, ResourceKind::Service, &branch, name, &mut report).await;
        }
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), &branch);
        for name in manifest.names(ResourceKind::Secret) {
            record_delete(&secrets, ResourceKind::Secret, &branch, name, &mut report).await;
        }
        let config_maps: Api<ConfigMap> = Api::namespaced(self.client.clone(), &branch);
        for name in manifest.names(ResourceKind::ConfigMap) {
            record_delete(&config_maps, ResourceKind::ConfigMap, &branch, name, &mut report).await;
        }
        let ingresses: Api<Ingress> = Api::namespaced(self.client.clone(), &branch);
        for name in manifest.names(ResourceKind::Ingress) {
            record_delete(&ingresses, ResourceKind::Ingress, &branch, name, &mut report).await;
        }

        delete_namespace(&self.client, &branch).await?;
        report.namespace_deleted = true;
        info!("Tore down branch {}", branch);
        Ok(report)
    }

    /// Every branch environment this system deployed
    pub async fn environments(&self) -> Result<Vec<EnvironmentSummary>> {
        list_environments(&self.client).await
    }

    /// Look up one deployment in a branch namespace
    pub async fn deployment(&self, namespace: &str, name: &str) -> Result<Option<Deployment>> {
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), namespace);
        match deployments.get(name).await {
            Ok(deployment) => Ok(Some(deployment)),
            Err(kube::Error::Api(err)) if err.code == 404 => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn clone_template(&self, ctx: &BranchContext) -> Result<DeployOutcome> {
        // Listing failures abort here, before anything has been created
        let set = self.read_template_set().await?;
        let manifest = set.manifest();
        let ns_annotations = BTreeMap::from([(
            annotations::CLONE_MANIFEST.to_string(),
            manifest.annotation_value()?,
        )]);

        match create_branch_namespace(&self.client, ctx.namespace(), Some(ns_annotations)).await {
            Ok(_) => {}
            Err(e) if e.is_already_exists() => {
                // Lost the race against a concurrent deploy of the same branch
                info!(
                    "Namespace {} appeared concurrently, refreshing instead",
                    ctx.namespace()
                );
                let pods_recycled = recycle_pods(&self.client, ctx.namespace()).await?;
                return Ok(DeployOutcome::Refreshed { pods_recycled });
            }
            Err(e) => return Err(e),
        }

        let report = self.apply_template_set(ctx, &set).await;
        if report.is_complete() {
            info!(
                "Deployed branch {} with {} resources",
                ctx.namespace(),
                report.created()
            );
        } else {
            warn!(
                "Deployed branch {} with {} of {} resources",
                ctx.namespace(),
                report.created(),
                report.outcomes.len()
            );
        }
        Ok(DeployOutcome::Created(report))
    }

    #[instrument(skip(self))]
    async fn read_template_set(&self) -> Result<TemplateSet> {
        let ns = &self.config.template_namespace;
        let lp = ListParams::default();
        let config_maps: Api<ConfigMap> = Api::namespaced(self.client.clone(), ns);
        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), ns);
        let services: Api<Service> = Api::namespaced(self.client.clone(), ns);
        let rcs: Api<ReplicationController> = Api::namespaced(self.client.clone(), ns);
        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), ns);
        let ingresses: Api<Ingress> = Api::namespaced(self.client.clone(), ns);

        Ok(TemplateSet {
            config_maps: config_maps.list(&lp).await?.items,
            secrets: secrets
                .list(&lp)
                .await?
                .items
                .into_iter()
                .filter(|s| !is_service_account_token(s))
                .collect(),
            services: services.list(&lp).await?.items,
            replication_controllers: rcs.list(&lp).await?.items,
            deployments: deployments.list(&lp).await?.items,
            ingresses: ingresses.list(&lp).await?.items,
        })
    }

    async fn apply_template_set(&self, ctx: &BranchContext, set: &TemplateSet) -> CloneReport {
        let mut report = CloneReport::default();
        let ns = ctx.namespace();
        let registry = self.registry.as_deref();

        let config_maps: Api<ConfigMap> = Api::namespaced(self.client.clone(), ns);
        for template in &set.config_maps {
            let cloned = clone_config_map(template, ctx);
            record_create(&config_maps, ResourceKind::ConfigMap, ns, &cloned, &mut report).await;
        }

        let secrets: Api<Secret> = Api::namespaced(self.client.clone(), ns);
        for template in &set.secrets {
            let cloned = clone_secret(template, ctx);
            record_create(&secrets, ResourceKind::Secret, ns, &cloned, &mut report).await;
        }

        let services: Api<Service> = Api::namespaced(self.client.clone(), ns);
        for template in &set.services {
            let cloned = clone_service(template, ctx);
            record_create(&services, ResourceKind::Service, ns, &cloned, &mut report).await;
        }

        let rcs: Api<ReplicationController> = Api::namespaced(self.client.clone(), ns);
        for template in &set.replication_controllers {
            match clone_replication_controller(template, ctx, registry).await {
                Ok(cloned) => {
                    record_create(&rcs, ResourceKind::ReplicationController, ns, &cloned, &mut report)
                        .await
                }
                Err(e) => {
                    let name = template.name_any();
                    warn!("Failed to transform ReplicationController {}: {}", name, e);
                    report.record_err(ResourceKind::ReplicationController, &name, e.to_string());
                }
            }
        }

        let deployments: Api<Deployment> = Api::namespaced(self.client.clone(), ns);
        for template in &set.deployments {
            match clone_deployment(template, ctx, registry).await {
                Ok(cloned) => {
                    record_create(&deployments, ResourceKind::Deployment, ns, &cloned, &mut report)
                        .await
                }
                Err(e) => {
                    let name = template.name_any();
                    warn!("Failed to transform Deployment {}: {}", name, e);
                    report.record_err(ResourceKind::Deployment, &name, e.to_string());
                }
            }
        }

        let ingresses: Api<Ingress> = Api::namespaced(self.client.clone(), ns);
        for template in &set.ingresses {
            let cloned = clone_ingress(template, ctx);
            record_create(&ingresses, ResourceKind::Ingress, ns, &cloned, &mut report).await;
        }

        report
    }

    /// Recover the clone set from the current template contents, for
    /// namespaces that predate manifest recording or carry a corrupt one
    async fn recovered_manifest(&self) -> CloneManifest {
        match self.read_template_set().await {
            Ok(set) => set.manifest(),
            Err(e) => {
                warn!("Could not recover clone set from template namespace: {}", e);
                CloneManifest::default()
            }
        }
    }
}

async fn record_create<K>(
    api: &Api<K>,
    kind: ResourceKind,
    namespace: &str,
    resource: &K,
    report: &mut CloneReport,
) where
    K: Resource + Clone + DeserializeOwned + Serialize + Debug,
{
    let name = resource.meta().name.clone().unwrap_or_default();
    match api.create(&PostParams::default(), resource).await {
        Ok(_) => {
            info!("Created {} {}/{}", kind, namespace, name);
            report.record_ok(kind, &name);
        }
        Err(e) => {
            warn!("Failed to create {} {}/{}: {}", kind, namespace, name, e);
            report.record_err(kind, &name, e.to_string());
        }
    }
}

async fn record_delete<K>(
    api: &Api<K>,
    kind: ResourceKind,
    namespace: &str,
    name: &str,
    report: &mut TeardownReport,
) where
    K: Clone + DeserializeOwned + Debug,
{
    match api.delete(name, &DeleteParams::default()).await {
        Ok(_) => {
            info!("Deleted {} {}/{}", kind, namespace, name);
            report.record_ok(kind, name);
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            debug!("{} {}/{} already gone", kind, namespace, name);
            report.record_ok(kind, name);
        }
        Err(e) => {
            warn!("Failed to delete {} {}/{}: {}", kind, namespace, name, e);
            report.record_err(kind, name, e.to_string());
        }
    }
}
