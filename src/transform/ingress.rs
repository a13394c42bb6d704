// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use crate::context::BranchContext;
use crate::transform::branch_meta;
use k8s_openapi::api::networking::v1::{Ingress, IngressSpec};

/// Clone a template ingress into the branch namespace.
///
/// The first rule's host is rewritten to the branch hostname; additional
/// rules keep their template hosts. TLS blocks are not carried since the
/// template's certificates cannot match branch hosts.
pub fn clone_ingress(template: &Ingress, ctx: &BranchContext) -> Ingress {
    let spec = template.spec.as_ref().map(|spec| {
        let rules = spec.rules.as_ref().map(|rules| {
            rules
                .iter()
                .enumerate()
                .map(|(i, rule)| {
                    let mut rule = rule.clone();
                    if i == 0 {
                        rule.host = Some(ctx.ingress_host());
                    }
                    rule
                })
                .collect()
        });
        IngressSpec {
            ingress_class_name: spec.ingress_class_name.clone(),
            default_backend: spec.default_backend.clone(),
            rules,
            ..Default::default()
        }
    });

    Ingress {
        metadata: branch_meta(&template.metadata, ctx),
        spec,
        ..Default::default()
    }
}
