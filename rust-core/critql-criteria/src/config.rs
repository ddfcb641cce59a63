// SPDX-License-Identifier: PMPL-1.0-or-later
//! Compiler configuration.
//!
//! Defaults:
//! - value/default strategy options: `["exact"]`
//! - value/default strategy weight: 1.0
//! - wildcard marker: `*`
//! - unregistered entities compile with JSON addressing
//! - projections extract hierarchically

use serde::{Deserialize, Serialize};

use critql_query::{DocumentFormat, SelectedMode};

/// Configuration for the criteria compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Options used by fields with no declared strategy.
    pub default_value_options: Vec<String>,
    /// Weight used by fields with no declared strategy.
    pub default_weight: f64,
    /// Wildcard marker recognized and added by the term tokenizer.
    pub wildcard: char,
    /// Format used when the entity has no registered format.
    pub default_format: DocumentFormat,
    /// Shape of projected results.
    pub extract_mode: SelectedMode,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            default_value_options: vec!["exact".to_string()],
            default_weight: 1.0,
            wildcard: '*',
            default_format: DocumentFormat::Json,
            extract_mode: SelectedMode::Hierarchical,
        }
    }
}

impl CompilerConfig {
    /// Load a configuration from JSON; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
