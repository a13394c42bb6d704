// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use crate::context::BranchContext;
use crate::transform::branch_meta;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};

/// Clone a template service into the branch namespace.
///
/// Ports are rebuilt without their node ports: a node port is allocated
/// cluster-wide and carrying the template's over would collide on create.
pub fn clone_service(template: &Service, ctx: &BranchContext) -> Service {
    let spec = template.spec.as_ref().map(|spec| ServiceSpec {
        selector: spec.selector.clone(),
        type_: spec.type_.clone(),
        ports: spec.ports.as_ref().map(|ports| {
            ports
                .iter()
                .map(|p| ServicePort {
                    name: p.name.clone(),
                    protocol: p.protocol.clone(),
                    port: p.port,
                    target_port: p.target_port.clone(),
                    ..Default::default()
                })
                .collect()
        }),
        ..Default::default()
    });

    Service {
        metadata: branch_meta(&template.metadata, ctx),
        spec,
        ..Default::default()
    }
}
