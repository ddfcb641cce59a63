// SPDX-License-Identifier: PMPL-1.0-or-later
//! Free-text term tokenizing for word predicates.
//!
//! Whitespace tokenization only: input is lower-cased and split on single
//! spaces. Scripts without space-delimited words are not segmented; use the
//! free-text control field for those.

use crate::value::CriteriaValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermTokenizer {
    wildcard: char,
}

impl Default for TermTokenizer {
    fn default() -> Self {
        Self { wildcard: '*' }
    }
}

impl TermTokenizer {
    pub fn new(wildcard: char) -> Self {
        Self { wildcard }
    }

    pub fn wildcard(&self) -> char {
        self.wildcard
    }

    /// Terms for a criteria value; lists are joined with a space first.
    pub fn tokenize(&self, value: &CriteriaValue) -> Vec<String> {
        self.terms(&value.to_text())
    }

    /// `"Fast Runner"` becomes `["*fast*", "*runner*"]`; `"run*"` stays `["run*"]`.
    pub fn terms(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(' ')
            .filter(|token| !token.trim().is_empty())
            .map(|token| {
                if token.contains(self.wildcard) {
                    token.to_string()
                } else {
                    format!("{w}{token}{w}", w = self.wildcard)
                }
            })
            .collect()
    }
}
