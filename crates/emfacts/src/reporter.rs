//! Ansible module protocol: one JSON document on stdout per run.

use std::io::Write;

use serde::Serialize;
use tracing::error;

use emfacts_core::{FactBundle, FactEnvelope, Reporter};

#[derive(Debug, Serialize)]
struct FailurePayload<'a> {
    failed: bool,
    msg: &'a str,
}

/// Writes the run outcome as the engine expects it.
///
/// Success: `{"ansible_facts": {...}, "changed": false}`.
/// Failure: `{"failed": true, "msg": "..."}`.
pub struct AnsibleReporter<W: Write + Send> {
    out: W,
}

impl<W: Write + Send> AnsibleReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit<T: Serialize>(&mut self, payload: &T) {
        let written = serde_json::to_writer(&mut self.out, payload)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.out))
            .and_then(|()| self.out.flush());
        if let Err(e) = written {
            error!(error = %e, "failed to write module result");
        }
    }
}

impl<W: Write + Send> Reporter for AnsibleReporter<W> {
    fn report_success(&mut self, bundle: &FactBundle) {
        self.emit(&FactEnvelope::new(bundle));
    }

    fn report_failure(&mut self, message: &str) {
        self.emit(&FailurePayload {
            failed: true,
            msg: message,
        });
    }
}
