// SPDX-License-Identifier: PMPL-1.0-or-later
//! Executor configuration.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutorConfig {
    /// Page length used by unpaged lookups.
    pub default_page_size: usize,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            default_page_size: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_page_size() {
        assert_eq!(ExecutorConfig::default().default_page_size, 10);
        let parsed: ExecutorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, ExecutorConfig::default());
    }
}
