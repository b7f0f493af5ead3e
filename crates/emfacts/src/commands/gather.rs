//! `gather`: module mode. Everything, including bad input, ends up as one
//! JSON document on stdout.

use std::io;

use tracing::debug;

use emfacts_core::{Reporter, run_module};

use crate::cli::{GatherArgs, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::module_args::ModuleArgs;
use crate::reporter::AnsibleReporter;

pub async fn handle(
    args: &GatherArgs,
    global: &GlobalOpts,
    module: Result<Option<ModuleArgs>, CliError>,
) -> Result<(), CliError> {
    let mut reporter = AnsibleReporter::new(io::stdout());

    let resolved = module.and_then(|module| {
        let cfg = config::load_config_or_default();
        let profile_name = config::active_profile_name(global, &cfg);
        config::build_gather_config(&cfg, &profile_name, global, &args.shape, module.as_ref())
    });
    let gather = match resolved {
        Ok(gather) => gather,
        Err(err) => {
            let message = err.to_string();
            reporter.report_failure(&message);
            return Err(CliError::Reported { message });
        }
    };

    debug!(
        base_url = %gather.base_url,
        path = %gather.inventory_path,
        scope = ?gather.scope,
        "gathering device facts"
    );

    run_module(&gather, &mut reporter)
        .await
        .map_err(|err| CliError::Reported {
            message: err.failure_message(),
        })
}
