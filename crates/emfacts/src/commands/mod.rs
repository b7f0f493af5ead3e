//! Command dispatch: bridges CLI args -> core gather calls -> output formatting.

pub mod config_cmd;
pub mod devices;
pub mod gather;
pub mod get;
pub mod group;

use crate::cli::{Command, GlobalOpts, ShapeArgs};
use crate::config;
use crate::error::CliError;

/// Dispatch a controller-bound inspection command.
pub async fn dispatch(cmd: Command, global: &GlobalOpts) -> Result<(), CliError> {
    let cfg = config::load_config_or_default();
    let profile_name = config::active_profile_name(global, &cfg);

    match cmd {
        Command::Devices(args) => {
            let gather =
                config::build_gather_config(&cfg, &profile_name, global, &args.shape, None)?;
            devices::handle(&gather, &args, global, &profile_name).await
        }
        Command::Get(args) => {
            let gather = config::build_gather_config(
                &cfg,
                &profile_name,
                global,
                &ShapeArgs::default(),
                None,
            )?;
            get::handle(&gather, &args, global, &profile_name).await
        }
        // Module mode and local commands are handled before dispatch
        Command::Gather(_) | Command::Group(_) | Command::Config(_) | Command::Completions(_) => {
            unreachable!()
        }
    }
}
