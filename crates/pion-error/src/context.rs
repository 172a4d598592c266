// SPDX-License-Identifier: MIT OR Apache-2.0
//! Named context fields and the typed values attached under them.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Context attached to a failure, keyed by field.
///
/// Attaching a field twice keeps the most recent value.
pub type Context = BTreeMap<ContextField, ContextValue>;

// ---------------------------------------------------------------------------
// ContextField
// ---------------------------------------------------------------------------

/// Closed set of context fields a failure can carry.
///
/// Every field has its own identity; no two fields alias each other.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ContextField {
    /// Free-form message appended by the base renderer.
    Message,
    /// Name of an unrecognized configuration argument or option.
    ArgName,
    /// File name or path.
    FileName,
    /// Directory name or path.
    DirName,
    /// Plugin identifier.
    PluginName,
    /// Plugin symbol name.
    SymbolName,
}

impl ContextField {
    /// Every field, in declaration order.
    pub const ALL: [ContextField; 6] = [
        Self::Message,
        Self::ArgName,
        Self::FileName,
        Self::DirName,
        Self::PluginName,
        Self::SymbolName,
    ];

    /// Stable `snake_case` name of the field.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::ArgName => "arg_name",
            Self::FileName => "file_name",
            Self::DirName => "dir_name",
            Self::PluginName => "plugin_name",
            Self::SymbolName => "symbol_name",
        }
    }
}

impl fmt::Display for ContextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known [`ContextField`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown context field: {0:?}")]
pub struct ParseFieldError(pub String);

impl FromStr for ContextField {
    type Err = ParseFieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| ParseFieldError(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// ContextValue
// ---------------------------------------------------------------------------

/// A typed value stored under a [`ContextField`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum ContextValue {
    /// Boolean flag.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Unsigned integer too large for [`ContextValue::Int`].
    UInt(u64),
    /// Text, including rendered paths.
    Text(String),
}

impl ContextValue {
    /// Returns the text if this is a [`ContextValue::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ContextValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::UInt(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for ContextValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for ContextValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&String> for ContextValue {
    fn from(s: &String) -> Self {
        Self::Text(s.clone())
    }
}

impl From<&Path> for ContextValue {
    fn from(p: &Path) -> Self {
        Self::Text(p.display().to_string())
    }
}

impl From<PathBuf> for ContextValue {
    fn from(p: PathBuf) -> Self {
        Self::from(p.as_path())
    }
}

impl From<bool> for ContextValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<i32> for ContextValue {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}

impl From<i64> for ContextValue {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<u32> for ContextValue {
    fn from(n: u32) -> Self {
        Self::Int(n.into())
    }
}

impl From<u64> for ContextValue {
    fn from(n: u64) -> Self {
        match i64::try_from(n) {
            Ok(n) => Self::Int(n),
            Err(_) => Self::UInt(n),
        }
    }
}

impl From<usize> for ContextValue {
    fn from(n: usize) -> Self {
        Self::from(n as u64)
    }
}
