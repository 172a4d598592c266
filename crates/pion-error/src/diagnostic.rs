// SPDX-License-Identifier: MIT OR Apache-2.0
//! Best-effort diagnostic strings for any caught failure.
//!
//! The description of a value is its `Display` text, or its type name when
//! it has none. Values that are [`Failure`]s and carry a source location get
//! a `" [file:line]"` suffix.

use crate::Failure;
use std::any::{Any, type_name};
use std::error::Error;
use tracing::error;

/// Describe a concrete error value.
///
/// An empty `Display` text falls back to the type name of `E`.
pub fn diagnostic_information<E>(err: &E) -> String
where
    E: Error + 'static,
{
    let failure = (err as &dyn Any).downcast_ref::<Failure>();
    describe(err.to_string(), || type_name::<E>().to_owned(), failure)
}

/// Describe a type-erased error, e.g. one taken from a `Box<dyn Error>` or
/// an `anyhow::Error`.
///
/// The concrete type is unknown here, so an empty `Display` text falls back
/// to the `Debug` form of the value, which names the type for derived impls.
pub fn diagnostic_information_dyn(err: &(dyn Error + 'static)) -> String {
    describe(
        err.to_string(),
        || format!("{err:?}"),
        err.downcast_ref::<Failure>(),
    )
}

/// Describe a value that may not implement `Display` at all.
///
/// [`Failure`]s and string payloads are described by their text; anything
/// else by the type name of `T`.
pub fn describe_value<T: Any>(value: &T) -> String {
    describe_any(value).unwrap_or_else(|| type_name::<T>().to_owned())
}

/// Describe the payload of a panic caught with [`std::panic::catch_unwind`].
///
/// Payloads that are neither strings nor [`Failure`]s are reported as
/// [`NON_STRING_PANIC`].
pub fn panic_information(payload: &(dyn Any + Send)) -> String {
    describe_any(payload).unwrap_or_else(|| NON_STRING_PANIC.to_owned())
}

/// Description used for panic payloads that carry no readable text.
pub const NON_STRING_PANIC: &str = "non-string panic payload";

/// Emit one `error` event carrying the suffixed diagnostic string.
pub fn log_failure<E>(err: &E)
where
    E: Error + 'static,
{
    let diagnostic = diagnostic_information(err);
    match (err as &dyn Any).downcast_ref::<Failure>() {
        Some(failure) => {
            let kind = failure.kind().map_or("base", |k| k.name());
            error!(target: "pion.error", kind, "{diagnostic}");
        }
        None => error!(target: "pion.error", "{diagnostic}"),
    }
}

fn describe_any(value: &dyn Any) -> Option<String> {
    if let Some(failure) = value.downcast_ref::<Failure>() {
        return Some(diagnostic_information(failure));
    }
    if let Some(s) = value.downcast_ref::<&'static str>() {
        return Some((*s).to_owned());
    }
    value.downcast_ref::<String>().cloned()
}

fn describe(
    text: String,
    fallback: impl FnOnce() -> String,
    failure: Option<&Failure>,
) -> String {
    let mut out = if text.is_empty() {
        fallback()
    } else {
        text
    };
    if let Some(location) = failure.and_then(Failure::location) {
        out.push_str(" [");
        out.push_str(&location.to_string());
        out.push(']');
    }
    out
}
