// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

use crate::constants::SERVICE_ACCOUNT_TOKEN_TYPE;
use crate::context::BranchContext;
use crate::transform::branch_meta;
use k8s_openapi::api::core::v1::Secret;

/// Check whether a secret is a platform-minted service account token.
/// Those are bound to their namespace and must not be cloned.
pub fn is_service_account_token(secret: &Secret) -> bool {
    secret
        .type_
        .as_deref()
        .is_some_and(|t| t == SERVICE_ACCOUNT_TOKEN_TYPE)
}

/// Clone a template secret into the branch namespace
pub fn clone_secret(template: &Secret, ctx: &BranchContext) -> Secret {
    Secret {
        metadata: branch_meta(&template.metadata, ctx),
        data: template.data.clone(),
        string_data: template.string_data.clone(),
        type_: template.type_.clone(),
        immutable: template.immutable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::tests::make_context;
    use k8s_openapi::ByteString;
    use kube::api::ObjectMeta;
    use std::collections::BTreeMap;

    fn make_secret(name: &str, type_: &str) -> Secret {
        Secret {
            metadata: ObjectMeta {
                name: Some(name.to_string()),
                namespace: Some("template".to_string()),
                ..Default::default()
            },
            data: Some(BTreeMap::from([(
                "password".to_string(),
                ByteString("secret123".as_bytes().to_vec()),
            )])),
            type_: Some(type_.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_service_account_token_is_detected() {
        let secret = make_secret("default-token-abcde", SERVICE_ACCOUNT_TOKEN_TYPE);
        assert!(is_service_account_token(&secret));
    }

    #[test]
    fn test_opaque_secret_is_not_a_token() {
        let secret = make_secret("db-credentials", "Opaque");
        assert!(!is_service_account_token(&secret));
    }

    #[test]
    fn test_untyped_secret_is_not_a_token() {
        let mut secret = make_secret("db-credentials", "Opaque");
        secret.type_ = None;
        assert!(!is_service_account_token(&secret));
    }

    #[test]
    fn test_clone_preserves_data_and_type() {
        let template = make_secret("db-credentials", "Opaque");

        let cloned = clone_secret(&template, &make_context());

        assert_eq!(cloned.data, template.data);
        assert_eq!(cloned.type_.unwrap(), "Opaque");
        assert_eq!(cloned.metadata.namespace.unwrap(), "feature-login");
    }
}
