// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Branch environment lifecycle management

mod directory;
mod manager;
mod manifest;
mod report;

pub use directory::{list_environments, EnvironmentSummary};
pub use manager::LifecycleManager;
pub use manifest::CloneManifest;
pub use report::{CloneReport, DeployOutcome, ResourceKind, ResourceOutcome, TeardownReport};
