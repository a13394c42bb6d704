// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use crate::context::BranchContext;
use crate::transform::branch_meta;
use k8s_openapi::api::core::v1::ConfigMap;

/// Clone a template config map into the branch namespace
pub fn clone_config_map(template: &ConfigMap, ctx: &BranchContext) -> ConfigMap {
    ConfigMap {
        metadata: branch_meta(&template.metadata, ctx),
        data: template.data.clone(),
        binary_data: template.binary_data.clone(),
        immutable: template.immutable,
    }
}
