// SPDX-License-Identifier: MIT OR Apache-2.0
//! Fuzz failure rendering with arbitrary kinds and context.
//!
//! Rendering must never panic and must be stable once computed.
#![no_main]
use libfuzzer_sys::fuzz_target;
use pion_error::{ContextField, ErrorKind, Failure, FailureBuilder, diagnostic_information};

fuzz_target!(|data: (u8, Vec<(u8, String)>, String)| {
    let (kind_byte, context, late) = data;
    let kind = ErrorKind::ALL[kind_byte as usize % ErrorKind::ALL.len()];

    let mut builder = FailureBuilder::new(kind);
    for (field_byte, value) in context.into_iter().take(16) {
        let field = ContextField::ALL[field_byte as usize % ContextField::ALL.len()];
        builder.attach(field, value);
    }
    let mut failure: Failure = builder.finalize();

    let first = failure.message().to_owned();
    assert!(first.starts_with(kind.prefix()));

    failure.attach(ContextField::Message, late);
    assert_eq!(failure.message(), first);

    let diag = diagnostic_information(&failure);
    assert!(diag.starts_with(&first));

    if let Ok(parsed) = kind.name().parse::<ErrorKind>() {
        assert_eq!(parsed, kind);
    }
});
