// SPDX-License-Identifier: MIT OR Apache-2.0
//! Snapshot and logging tests for diagnostic strings.

use pion_error::{
    ContextField, ErrorKind, Failure, FailureBuilder, FailureDto, diagnostic_information,
    diagnostic_information_dyn, log_failure,
};
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

fn located(kind: ErrorKind) -> FailureBuilder {
    Failure::builder(kind).at("src/plugin.rs", 87)
}

// ── Snapshots ───────────────────────────────────────────────────────────

#[test]
fn snapshot_bad_config_with_location() {
    let err = Failure::builder(ErrorKind::BadConfig)
        .with_context(ContextField::FileName, "config.yaml")
        .at("config.yaml", 42)
        .finalize();
    insta::assert_snapshot!(
        diagnostic_information(&err),
        @"config parser error: config.yaml [config.yaml:42]"
    );
}

#[test]
fn snapshot_missing_symbol() {
    let err = located(ErrorKind::PluginMissingSymbol)
        .with_context(ContextField::SymbolName, "pion_create_EchoService")
        .finalize();
    insta::assert_snapshot!(
        diagnostic_information(&err),
        @"missing plugin symbol: pion_create_EchoService [src/plugin.rs:87]"
    );
}

#[test]
fn snapshot_dto_json() {
    let err = located(ErrorKind::DuplicatePlugin)
        .with_context(ContextField::PluginName, "EchoService")
        .finalize();
    let json = serde_json::to_string_pretty(&FailureDto::from(&err)).unwrap();
    insta::assert_snapshot!(json, @r###"
    {
      "kind": "duplicate_plugin",
      "message": "duplicate plugin: EchoService",
      "context": {
        "plugin_name": "EchoService"
      },
      "location": {
        "file": "src/plugin.rs",
        "line": 87
      }
    }
    "###);
}

// ── Interop ─────────────────────────────────────────────────────────────

#[test]
fn anyhow_roundtrip_keeps_failure() {
    fn load() -> anyhow::Result<()> {
        Err(located(ErrorKind::OpenFile)
            .with_context(ContextField::FileName, "/etc/pion.conf")
            .finalize()
            .into())
    }

    let err = load().unwrap_err();
    assert_eq!(err.to_string(), "unable to open file: /etc/pion.conf");
    let failure = err.downcast_ref::<Failure>().expect("downcast");
    assert_eq!(failure.kind(), Some(ErrorKind::OpenFile));
    assert_eq!(
        diagnostic_information_dyn(err.as_ref()),
        "unable to open file: /etc/pion.conf [src/plugin.rs:87]"
    );
}

#[test]
fn question_mark_propagates_failure() {
    fn inner() -> Result<(), Failure> {
        Err(Failure::new(ErrorKind::BadPasswordHash))
    }
    fn outer() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        inner()?;
        Ok(())
    }

    let err = outer().unwrap_err();
    assert_eq!(err.to_string(), "bad password hash");
    assert!(err.downcast_ref::<Failure>().is_some());
}

// ── Logging ─────────────────────────────────────────────────────────────

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn log_failure_emits_suffixed_diagnostic() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .with_writer(move || writer.clone())
        .finish();

    let err = located(ErrorKind::PluginNotFound)
        .with_context(ContextField::PluginName, "LogService")
        .finalize();
    tracing::subscriber::with_default(subscriber, || log_failure(&err));

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    assert!(output.contains("ERROR"), "{output}");
    assert!(output.contains("pion.error"), "{output}");
    assert!(
        output.contains("plugin not found: LogService [src/plugin.rs:87]"),
        "{output}"
    );
    assert!(output.contains("kind=\"plugin_not_found\""), "{output}");
}
