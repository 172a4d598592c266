// SPDX-License-Identifier: MIT OR Apache-2.0
//! Case-folding rules for key comparison and hashing.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// How keys are folded before they are hashed or compared.
///
/// Two keys are equivalent iff their folded forms are identical. Folding is
/// independent of the process locale.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CaseFold {
    /// Uppercase ASCII letters only; other characters compare exactly.
    #[default]
    Ascii,
    /// Full Unicode uppercase mapping (`ß` folds to `SS`).
    Unicode,
}

impl CaseFold {
    /// Stable `snake_case` name of the rule.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ascii => "ascii",
            Self::Unicode => "unicode",
        }
    }

    /// The folded form of `key`, borrowed when folding changes nothing.
    pub fn fold(self, key: &str) -> Cow<'_, str> {
        match self {
            Self::Ascii => {
                if key.bytes().any(|b| b.is_ascii_lowercase()) {
                    Cow::Owned(key.to_ascii_uppercase())
                } else {
                    Cow::Borrowed(key)
                }
            }
            Self::Unicode => {
                if key.chars().all(|c| c.to_uppercase().eq([c])) {
                    Cow::Borrowed(key)
                } else {
                    Cow::Owned(key.to_uppercase())
                }
            }
        }
    }

    /// Returns `true` if `a` and `b` fold to the same string.
    pub fn keys_equal(self, a: &str, b: &str) -> bool {
        match self {
            Self::Ascii => a.eq_ignore_ascii_case(b),
            Self::Unicode => a
                .chars()
                .flat_map(char::to_uppercase)
                .eq(b.chars().flat_map(char::to_uppercase)),
        }
    }

    /// Feed the folded form of `key` into `state`.
    ///
    /// Equivalent keys always produce the same hash.
    pub fn hash_key<H: Hasher>(self, key: &str, state: &mut H) {
        self.fold(key).hash(state);
    }
}

impl fmt::Display for CaseFold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
