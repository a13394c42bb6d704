// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! HTTP boundary of the service

mod auth;
mod routes;

pub use auth::TokenStore;
pub use routes::{router, AppState};
