// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0

//! Static API token checking.
//!
//! Tokens are loaded once at startup from a plain text file, one token
//! per line. Blank lines and lines starting with # are ignored.

use crate::error::{EmmieError, Result};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Set of tokens accepted on authenticated routes
#[derive(Debug, Clone)]
pub struct TokenStore {
    tokens: HashSet<String>,
}

impl TokenStore {
    pub fn new(tokens: impl IntoIterator<Item = String>) -> Self {
        TokenStore {
            tokens: tokens.into_iter().collect(),
        }
    }

    /// Load tokens from a file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            EmmieError::TokenError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        let tokens = contents
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .map(str::to_string)
            .collect();
        Ok(TokenStore { tokens })
    }

    pub fn is_valid(&self, token: &str) -> bool {
        self.tokens.contains(token)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}
