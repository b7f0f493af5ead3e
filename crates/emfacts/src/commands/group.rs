//! `group`: ungroup a class-query `imdata` payload into per-class facts.

use std::io::Read;

use serde_json::Value;

use emfacts_core::{ClassGroups, CoreError, FactEnvelope, group_by_class};

use crate::cli::{GlobalOpts, GroupArgs};
use crate::error::CliError;
use crate::output;

pub fn handle(args: &GroupArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let text = match args.file {
        Some(ref path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let payload: Value = serde_json::from_str(&text)?;
    let groups = group_by_class(&payload).map_err(|e| match e {
        CoreError::MalformedResponse { message } => CliError::MalformedResponse { message },
        other => CliError::Validation {
            field: "imdata".into(),
            reason: other.to_string(),
        },
    })?;
    tracing::debug!(classes = groups.len(), "grouped imdata payload");

    let envelope = FactEnvelope::new(groups);
    let out = output::render_single(&global.output, &envelope, |e| summary(&e.ansible_facts))?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn summary(groups: &ClassGroups) -> String {
    groups
        .iter()
        .map(|(class, items)| format!("{class}: {}", items.len()))
        .collect::<Vec<_>>()
        .join("\n")
}
