// SPDX-License-Identifier: MIT OR Apache-2.0
//! The fixed catalog of failure kinds and the table-driven renderer.

use crate::context::{Context, ContextField};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// ErrorCategory
// ---------------------------------------------------------------------------

/// Broad family that an [`ErrorKind`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Arguments and configuration files.
    Config,
    /// Files and directories.
    Filesystem,
    /// Plugin discovery and loading.
    Plugin,
    /// Credentials.
    Security,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Config => "config",
            Self::Filesystem => "filesystem",
            Self::Plugin => "plugin",
            Self::Security => "security",
        };
        f.write_str(s)
    }
}

// ---------------------------------------------------------------------------
// ErrorKind
// ---------------------------------------------------------------------------

/// The named failure kinds.
///
/// Each kind renders as its prefix, followed by `": <value>"` when its
/// expected context field is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Invalid configuration argument or option.
    BadArg,
    /// Error while parsing a configuration file.
    BadConfig,
    /// A file could not be opened.
    OpenFile,
    /// A plugin could not be opened.
    OpenPlugin,
    /// Data could not be read from a file.
    ReadFile,
    /// A file does not exist.
    FileNotFound,
    /// A required directory does not exist.
    DirectoryNotFound,
    /// A plugin could not be found.
    PluginNotFound,
    /// A plugin was added or loaded twice.
    DuplicatePlugin,
    /// A plugin lacks a required symbol.
    PluginMissingSymbol,
    /// A plugin is in an undefined state.
    PluginUndefined,
    /// A malformed password hash was supplied.
    BadPasswordHash,
}

struct KindRow {
    name: &'static str,
    prefix: &'static str,
    expected: Option<ContextField>,
    category: ErrorCategory,
}

const fn row(
    name: &'static str,
    prefix: &'static str,
    expected: Option<ContextField>,
    category: ErrorCategory,
) -> KindRow {
    KindRow {
        name,
        prefix,
        expected,
        category,
    }
}

// Indexed by `ErrorKind as usize`; order must follow the enum declaration.
#[rustfmt::skip]
static KIND_TABLE: [KindRow; 12] = [
    row("bad_arg", "bad argument", Some(ContextField::ArgName), ErrorCategory::Config),
    row("bad_config", "config parser error", Some(ContextField::FileName), ErrorCategory::Config),
    row("open_file", "unable to open file", Some(ContextField::FileName), ErrorCategory::Filesystem),
    row("open_plugin", "unable to open plugin", Some(ContextField::PluginName), ErrorCategory::Plugin),
    row("read_file", "unable to read file", Some(ContextField::FileName), ErrorCategory::Filesystem),
    row("file_not_found", "file not found", Some(ContextField::FileName), ErrorCategory::Filesystem),
    row("directory_not_found", "directory not found", Some(ContextField::DirName), ErrorCategory::Filesystem),
    row("plugin_not_found", "plugin not found", Some(ContextField::PluginName), ErrorCategory::Plugin),
    row("duplicate_plugin", "duplicate plugin", Some(ContextField::PluginName), ErrorCategory::Plugin),
    row("plugin_missing_symbol", "missing plugin symbol", Some(ContextField::SymbolName), ErrorCategory::Plugin),
    row("plugin_undefined", "plugin has undefined state", None, ErrorCategory::Plugin),
    row("bad_password_hash", "bad password hash", None, ErrorCategory::Security),
];

impl ErrorKind {
    /// Every kind, in declaration order.
    pub const ALL: [ErrorKind; 12] = [
        Self::BadArg,
        Self::BadConfig,
        Self::OpenFile,
        Self::OpenPlugin,
        Self::ReadFile,
        Self::FileNotFound,
        Self::DirectoryNotFound,
        Self::PluginNotFound,
        Self::DuplicatePlugin,
        Self::PluginMissingSymbol,
        Self::PluginUndefined,
        Self::BadPasswordHash,
    ];

    fn row(self) -> &'static KindRow {
        &KIND_TABLE[self as usize]
    }

    /// Stable `snake_case` name (e.g. `"file_not_found"`).
    pub fn name(self) -> &'static str {
        self.row().name
    }

    /// Text every rendered message of this kind starts with.
    pub fn prefix(self) -> &'static str {
        self.row().prefix
    }

    /// The context field whose value is appended to the prefix, if any.
    pub fn expected_field(self) -> Option<ContextField> {
        self.row().expected
    }

    /// The broad [`ErrorCategory`] of this kind.
    pub fn category(self) -> ErrorCategory {
        self.row().category
    }

    /// Compose the display message for this kind from `context`.
    ///
    /// A missing expected field is not an error; the prefix is returned alone.
    pub fn compose(self, context: &Context) -> String {
        let row = self.row();
        match row.expected.and_then(|field| context.get(&field)) {
            Some(value) => format!("{}: {value}", row.prefix),
            None => row.prefix.to_owned(),
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no known [`ErrorKind`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error kind: {0:?}")]
pub struct ParseKindError(pub String);

impl FromStr for ErrorKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| ParseKindError(s.to_owned()))
    }
}
