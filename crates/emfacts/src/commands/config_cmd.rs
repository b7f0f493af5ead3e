//! Config subcommand handlers.

use secrecy::{ExposeSecret, SecretString};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Config};
use crate::error::CliError;
use crate::output;

const REDACTED: &str = "********";

/// Copy of `cfg` safe to print.
fn redacted(cfg: &Config) -> Config {
    let mut copy = cfg.clone();
    for profile in copy.profiles.values_mut() {
        if profile.password.is_some() {
            profile.password = Some(REDACTED.into());
        }
    }
    copy
}

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&config::config_path().display().to_string(), global.quiet);
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = redacted(&config::load_config_or_default());
            let out = output::render_single(&global.output, &cfg, |c| {
                toml::to_string_pretty(c).unwrap_or_default()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::SetPassword => {
            let cfg = config::load_config_or_default();
            let profile_name = config::active_profile_name(global, &cfg);

            let password = SecretString::from(
                rpassword::prompt_password(format!("Password for profile '{profile_name}': "))?,
            );
            if password.expose_secret().is_empty() {
                return Err(CliError::Validation {
                    field: "password".into(),
                    reason: "password cannot be empty".into(),
                });
            }

            emfacts_config::store_password(&profile_name, password.expose_secret())?;
            eprintln!("Password for '{profile_name}' stored in the system keyring");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;

    #[test]
    fn plaintext_passwords_are_redacted() {
        let mut cfg = Config::default();
        cfg.profiles.insert(
            "lab".into(),
            Profile {
                host: "10.255.40.125".into(),
                password: Some("foobar".into()),
                password_env: Some("LAB_PASSWORD".into()),
                ..Profile::default()
            },
        );

        let shown = redacted(&cfg);

        assert_eq!(shown.profiles["lab"].password.as_deref(), Some(REDACTED));
        assert_eq!(
            shown.profiles["lab"].password_env.as_deref(),
            Some("LAB_PASSWORD")
        );
        assert_eq!(cfg.profiles["lab"].password.as_deref(), Some("foobar"));
    }
}
