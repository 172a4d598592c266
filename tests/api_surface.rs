// SPDX-License-Identifier: MIT OR Apache-2.0
//! API surface tests — compile-time guarantees that public items remain exported.
//!
//! If someone accidentally removes a `pub` item, these tests will fail to compile.

// ---------------------------------------------------------------------------
// pion-error: public types
// ---------------------------------------------------------------------------

#[test]
fn error_failure_and_builder_accessible() {
    let builder: pion_error::FailureBuilder =
        pion_error::Failure::builder(pion_error::ErrorKind::OpenFile);
    let failure: pion_error::Failure = builder.finalize();
    let _kind: Option<pion_error::ErrorKind> = failure.kind();
    let _category: Option<pion_error::ErrorCategory> = failure.category();
    let _context: &pion_error::Context = failure.context();
    let _location: Option<&pion_error::SourceLocation> = failure.location();
    let _message: &str = failure.message();
    let _dto: pion_error::FailureDto = (&failure).into();
}

#[test]
fn error_context_types_accessible() {
    let _field: pion_error::ContextField = pion_error::ContextField::Message;
    let _value: pion_error::ContextValue = pion_error::ContextValue::Int(1);
    let _parse_field: Result<pion_error::ContextField, pion_error::ParseFieldError> =
        "file_name".parse();
    let _parse_kind: Result<pion_error::ErrorKind, pion_error::ParseKindError> =
        "bad_arg".parse();
}

#[test]
fn error_formatter_functions_accessible() {
    let err = std::io::Error::other("x");
    let _: String = pion_error::diagnostic_information(&err);
    let _: String = pion_error::diagnostic_information_dyn(&err);
    let _: String = pion_error::describe_value(&42_u8);
    let _: fn(&(dyn std::any::Any + Send)) -> String = pion_error::panic_information;
    pion_error::log_failure(&err);
}

// ---------------------------------------------------------------------------
// pion-ihash: public types
// ---------------------------------------------------------------------------

#[test]
fn ihash_multimap_accessible() {
    let mut map: pion_ihash::IHashMultimap =
        pion_ihash::IHashMultimap::with_fold(pion_ihash::CaseFold::Unicode);
    map.insert("k", "v");
    let _entries: &[pion_ihash::Entry] = map.find("K");
    let _iter: pion_ihash::Iter<'_> = map.iter();
    let _owned: pion_ihash::IntoIter = map.into_iter();
}
