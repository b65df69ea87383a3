//! Observer hook for decode problems.
//!
//! Decoding never fails: bad encodings turn into invalid instructions. A
//! [`DiagnosticsSink`] still gets told about each one so coverage gaps can be
//! collected into test cases. Sinks are injected, never required; the default
//! is [`NullSink`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;

use crate::reader::Address;

/// Why an encoding produced an invalid instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// The dispatch tree has no instruction for the encoding.
    UnmappedEncoding,
    /// A mutator rejected the encoding.
    MutatorFailed,
    /// The encoding is known but its decoder was never written.
    NotYetImplemented,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DiagnosticKind::UnmappedEncoding => "unmapped encoding",
            DiagnosticKind::MutatorFailed => "mutator failed",
            DiagnosticKind::NotYetImplemented => "not yet implemented",
        })
    }
}

/// One reported decode problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Tag of the disassembler that reported it.
    pub decoder: &'static str,
    pub kind: DiagnosticKind,
    pub address: Address,
    /// The encoding word as it appears in the image.
    pub bytes: [u8; 4],
    pub message: String,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} at {}: {} [{}]",
            self.decoder,
            self.kind,
            self.address,
            self.message,
            hex_bytes(&self.bytes)
        )
    }
}

/// Receives diagnostics. Implementations must tolerate concurrent callers.
pub trait DiagnosticsSink: Send + Sync {
    fn report(&self, diagnostic: &Diagnostic);
}

/// Drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticsSink for NullSink {
    fn report(&self, _diagnostic: &Diagnostic) {}
}

/// Forwards diagnostics to the `log` facade at debug level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticsSink for LogSink {
    fn report(&self, diagnostic: &Diagnostic) {
        log::debug!("{diagnostic}");
    }
}

/// Keeps every diagnostic in memory.
#[derive(Debug, Default)]
pub struct Collector {
    entries: Mutex<Vec<Diagnostic>>,
}

/// Diagnostics sharing a kind and message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiagnosticGroup {
    pub decoder: &'static str,
    pub kind: DiagnosticKind,
    pub message: String,
    pub count: usize,
    pub first_address: Address,
    pub sample_bytes: String,
}

impl Collector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of everything reported so far, in report order.
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.lock())
    }

    /// Group by kind and message, keeping the first occurrence as the sample.
    pub fn summary(&self) -> Vec<DiagnosticGroup> {
        let entries = self.lock();
        let mut groups: BTreeMap<(DiagnosticKind, &str), DiagnosticGroup> = BTreeMap::new();
        for d in entries.iter() {
            groups
                .entry((d.kind, d.message.as_str()))
                .and_modify(|g| g.count += 1)
                .or_insert_with(|| DiagnosticGroup {
                    decoder: d.decoder,
                    kind: d.kind,
                    message: d.message.clone(),
                    count: 1,
                    first_address: d.address,
                    sample_bytes: hex_bytes(&d.bytes),
                });
        }
        groups.into_values().collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Diagnostic>> {
        // A panicking reporter cannot leave the vector half-written.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl DiagnosticsSink for Collector {
    fn report(&self, diagnostic: &Diagnostic) {
        self.lock().push(diagnostic.clone());
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
