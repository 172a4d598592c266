// SPDX-License-Identifier: MIT OR Apache-2.0
//! Failure values with typed context and lazily rendered messages.
//!
//! A [`Failure`] carries an optional [`ErrorKind`], zero or more
//! [`ContextField`] values, and the source location it was raised at. Its
//! display message is composed on first use and cached; composing never
//! fails, it only omits context that is missing.
//!
//! Use the [`FailureBuilder`] returned by [`Failure::builder`] to attach
//! context before the failure is raised:
//!
//! ```
//! use pion_error::{ContextField, ErrorKind, Failure};
//!
//! let err = Failure::builder(ErrorKind::FileNotFound)
//!     .with_context(ContextField::FileName, "pion.conf")
//!     .finalize();
//! assert_eq!(err.to_string(), "file not found: pion.conf");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod context;
mod diagnostic;
mod kind;

pub use context::{Context, ContextField, ContextValue, ParseFieldError};
pub use diagnostic::{
    NON_STRING_PANIC, describe_value, diagnostic_information, diagnostic_information_dyn,
    log_failure, panic_information,
};
pub use kind::{ErrorCategory, ErrorKind, ParseKindError};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::panic::Location;
use std::sync::OnceLock;
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// SourceLocation
// ---------------------------------------------------------------------------

/// Where a failure was raised.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SourceLocation {
    /// Source file path.
    pub file: Cow<'static, str>,
    /// 1-based line number, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl SourceLocation {
    fn caller(location: &'static Location<'static>) -> Self {
        Self {
            file: Cow::Borrowed(location.file()),
            line: Some(location.line()),
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file)?;
        if let Some(line) = self.line {
            write!(f, ":{line}")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FailureBuilder
// ---------------------------------------------------------------------------

/// Accumulates context for a [`Failure`] before it is raised.
#[derive(Debug, Clone)]
#[must_use]
pub struct FailureBuilder {
    kind: Option<ErrorKind>,
    context: Context,
    location: Option<SourceLocation>,
    message: Option<String>,
}

impl FailureBuilder {
    /// Start a failure of `kind`, recording the caller's location.
    #[track_caller]
    pub fn new(kind: ErrorKind) -> Self {
        Self::start(Some(kind), Location::caller())
    }

    /// Start a failure outside the kind catalog.
    ///
    /// It renders as the failure type name, followed by
    /// [`ContextField::Message`] when attached.
    #[track_caller]
    pub fn base() -> Self {
        Self::start(None, Location::caller())
    }

    fn start(kind: Option<ErrorKind>, caller: &'static Location<'static>) -> Self {
        Self {
            kind,
            context: Context::new(),
            location: Some(SourceLocation::caller(caller)),
            message: None,
        }
    }

    /// Attach `value` under `field`, replacing any earlier value.
    pub fn with_context(mut self, field: ContextField, value: impl Into<ContextValue>) -> Self {
        self.attach(field, value);
        self
    }

    /// In-place form of [`with_context`](Self::with_context).
    pub fn attach(&mut self, field: ContextField, value: impl Into<ContextValue>) -> &mut Self {
        self.context.insert(field, value.into());
        self
    }

    /// The value attached under `field`, if any.
    pub fn lookup(&self, field: ContextField) -> Option<&ContextValue> {
        self.context.get(&field)
    }

    /// Use `message` verbatim instead of composing one from the context.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Override the recorded source location.
    pub fn at(mut self, file: impl Into<Cow<'static, str>>, line: u32) -> Self {
        self.location = Some(SourceLocation {
            file: file.into(),
            line: Some(line),
        });
        self
    }

    /// Override the recorded source location with a file whose line is unknown.
    pub fn at_file(mut self, file: impl Into<Cow<'static, str>>) -> Self {
        self.location = Some(SourceLocation {
            file: file.into(),
            line: None,
        });
        self
    }

    /// Drop the recorded source location.
    pub fn without_location(mut self) -> Self {
        self.location = None;
        self
    }

    /// Finish accumulation. The message is still composed lazily.
    pub fn finalize(self) -> Failure {
        let rendered = match self.message {
            Some(message) => OnceLock::from(message),
            None => OnceLock::new(),
        };
        Failure {
            kind: self.kind,
            context: self.context,
            location: self.location,
            rendered,
        }
    }
}

// ---------------------------------------------------------------------------
// Failure
// ---------------------------------------------------------------------------

/// A raised failure.
///
/// The display message is composed at most once, the first time it is read.
/// Context attached after that point is stored and visible to
/// [`lookup`](Self::lookup), but never changes the message.
#[derive(Clone)]
pub struct Failure {
    kind: Option<ErrorKind>,
    context: Context,
    location: Option<SourceLocation>,
    rendered: OnceLock<String>,
}

impl Failure {
    /// A failure of `kind` with no context, located at the caller.
    #[track_caller]
    pub fn new(kind: ErrorKind) -> Self {
        FailureBuilder::new(kind).finalize()
    }

    /// Start building a failure of `kind`, located at the caller.
    #[track_caller]
    pub fn builder(kind: ErrorKind) -> FailureBuilder {
        FailureBuilder::new(kind)
    }

    /// The catalog kind, or `None` for a base failure.
    pub fn kind(&self) -> Option<ErrorKind> {
        self.kind
    }

    /// Shorthand for the kind's category.
    pub fn category(&self) -> Option<ErrorCategory> {
        self.kind.map(ErrorKind::category)
    }

    /// All attached context.
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// The value attached under `field`, if any.
    pub fn lookup(&self, field: ContextField) -> Option<&ContextValue> {
        self.context.get(&field)
    }

    /// Where the failure was raised, if known.
    pub fn location(&self) -> Option<&SourceLocation> {
        self.location.as_ref()
    }

    /// Attach `value` under `field`.
    ///
    /// Has no effect on a message that was already rendered.
    pub fn attach(&mut self, field: ContextField, value: impl Into<ContextValue>) {
        if self.is_rendered() {
            debug!(
                target: "pion.error",
                field = field.as_str(),
                "context attached after message was rendered"
            );
        }
        self.context.insert(field, value.into());
    }

    /// Returns `true` once the message has been composed.
    pub fn is_rendered(&self) -> bool {
        self.rendered.get().is_some()
    }

    /// The display message, composed on first call and cached.
    pub fn message(&self) -> &str {
        self.rendered.get_or_init(|| {
            let message = self.compose();
            trace!(target: "pion.error", kind = ?self.kind, %message, "rendered failure message");
            message
        })
    }

    fn compose(&self) -> String {
        match self.kind {
            Some(kind) => kind.compose(&self.context),
            None => {
                let name = std::any::type_name::<Self>();
                match self.context.get(&ContextField::Message) {
                    Some(message) => format!("{name}: {message}"),
                    None => name.to_owned(),
                }
            }
        }
    }
}

impl fmt::Debug for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut d = f.debug_struct("Failure");
        if let Some(kind) = self.kind {
            d.field("kind", &kind);
        }
        if !self.context.is_empty() {
            d.field("context", &self.context);
        }
        if let Some(ref location) = self.location {
            d.field("location", &format_args!("{location}"));
        }
        if let Some(message) = self.rendered.get() {
            d.field("message", message);
        }
        d.finish()
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for Failure {}

impl From<ErrorKind> for Failure {
    #[track_caller]
    fn from(kind: ErrorKind) -> Self {
        Self::new(kind)
    }
}

// ---------------------------------------------------------------------------
// Serialization support
// ---------------------------------------------------------------------------

/// Serialisable snapshot of a [`Failure`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
pub struct FailureDto {
    /// Catalog kind; absent for base failures.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
    /// Rendered message.
    pub message: String,
    /// Attached context.
    #[serde(default, skip_serializing_if = "Context::is_empty")]
    pub context: Context,
    /// Where the failure was raised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl From<&Failure> for FailureDto {
    fn from(err: &Failure) -> Self {
        Self {
            kind: err.kind,
            message: err.message().to_owned(),
            context: err.context.clone(),
            location: err.location.clone(),
        }
    }
}

impl From<FailureDto> for Failure {
    fn from(dto: FailureDto) -> Self {
        Self {
            kind: dto.kind,
            context: dto.context,
            location: dto.location,
            rendered: OnceLock::from(dto.message),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
