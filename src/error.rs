// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmmieError {
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    #[error("Registry query failed: {0}")]
    RegistryError(String),

    #[error("Invalid annotation: {0}")]
    InvalidAnnotation(String),

    #[error("Namespace operation failed: {0}")]
    NamespaceError(String),

    #[error("Token file error: {0}")]
    TokenError(String),
}

impl EmmieError {
    /// True when the underlying Kubernetes API call answered 404.
    pub fn is_not_found(&self) -> bool {
        matches!(self, EmmieError::KubeError(kube::Error::Api(err)) if err.code == 404)
    }

    /// True when the underlying Kubernetes API call answered 409.
    pub fn is_already_exists(&self) -> bool {
        matches!(self, EmmieError::KubeError(kube::Error::Api(err)) if err.code == 409)
    }
}

pub type Result<T> = std::result::Result<T, EmmieError>;
