// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Branch namespace management utilities

use crate::constants::labels;
use crate::error::{EmmieError, Result};
use k8s_openapi::api::core::v1::Namespace;
use kube::{
    api::{DeleteParams, ListParams, ObjectMeta, PostParams},
    Api, Client,
};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Whether a branch namespace exists in the cluster
#[derive(Debug)]
pub enum NamespaceState {
    Absent,
    Active(Box<Namespace>),
}

/// Look up a branch namespace without treating absence as an error
#[instrument(skip(client))]
pub async fn branch_namespace_state(client: &Client, namespace: &str) -> Result<NamespaceState> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.get(namespace).await {
        Ok(ns) => {
            debug!("Namespace {} is active", namespace);
            Ok(NamespaceState::Active(Box::new(ns)))
        }
        Err(kube::Error::Api(err)) if err.code == 404 => Ok(NamespaceState::Absent),
        Err(e) => Err(EmmieError::NamespaceError(format!(
            "Failed to check namespace {}: {}",
            namespace, e
        ))),
    }
}

/// Create a branch namespace carrying the provenance label and the given
/// annotations
#[instrument(skip(client, annotations))]
pub async fn create_branch_namespace(
    client: &Client,
    namespace: &str,
    annotations: Option<BTreeMap<String, String>>,
) -> Result<Namespace> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    info!("Creating namespace {}", namespace);
    let ns = Namespace {
        metadata: ObjectMeta {
            name: Some(namespace.to_string()),
            labels: Some(BTreeMap::from([(
                labels::PROVENANCE_KEY.to_string(),
                labels::PROVENANCE_VALUE.to_string(),
            )])),
            annotations,
            ..Default::default()
        },
        ..Default::default()
    };
    let created = namespaces.create(&PostParams::default(), &ns).await?;
    info!("Namespace {} created successfully", namespace);
    Ok(created)
}

/// List every namespace this system deployed
#[instrument(skip(client))]
pub async fn list_branch_namespaces(client: &Client) -> Result<Vec<Namespace>> {
    let namespaces: Api<Namespace> = Api::all(client.clone());
    let lp = ListParams::default().labels(&labels::provenance_selector());
    let list = namespaces.list(&lp).await?;
    Ok(list.items)
}

/// Delete a namespace, tolerating one that is already gone
#[instrument(skip(client))]
pub async fn delete_namespace(client: &Client, namespace: &str) -> Result<()> {
    let namespaces: Api<Namespace> = Api::all(client.clone());

    match namespaces.delete(namespace, &DeleteParams::default()).await {
        Ok(_) => {
            info!("Namespace {} deleted", namespace);
            Ok(())
        }
        Err(kube::Error::Api(err)) if err.code == 404 => {
            debug!("Namespace {} already gone", namespace);
            Ok(())
        }
        Err(e) => Err(e.into()),
    }
}
