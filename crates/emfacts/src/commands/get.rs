//! `get`: authenticated GET of any API path, printing its `response`.

use emfacts_core::{GatherConfig, fetch_raw};

use crate::cli::{GetArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    config: &GatherConfig,
    args: &GetArgs,
    global: &GlobalOpts,
    profile_name: &str,
) -> Result<(), CliError> {
    let response = fetch_raw(config, &args.path, args.scope.as_deref())
        .await
        .map_err(|e| CliError::from_core(e, profile_name))?;

    let out = output::render_single(&global.output, &response, |v| {
        serde_json::to_string_pretty(v).unwrap_or_default()
    })?;
    output::print_output(&out, global.quiet);
    Ok(())
}
