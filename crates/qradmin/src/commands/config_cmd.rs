//! Config subcommand handlers.

use dialoguer::{Input, Select};

use qradmin_config::{Config, DEFAULT_API_URL, Profile, parse_consistency};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

// ── Helpers ─────────────────────────────────────────────────────────

/// Render the config as TOML.
fn format_config(cfg: &Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Config {
        message: format!("failed to serialize config: {e}"),
    })
}

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

fn invalid(field: &str, reason: &str) -> CliError {
    CliError::Validation {
        field: field.into(),
        reason: reason.into(),
    }
}

/// Apply `key = value` to a profile, validating the value.
fn set_profile_key(profile: &mut Profile, key: &str, value: String) -> Result<(), CliError> {
    match key {
        "api_url" | "api-url" => {
            url::Url::parse(&value).map_err(|e| invalid("api_url", &format!("invalid URL: {e}")))?;
            profile.api_url = value;
        }
        "credential_store" | "credential-store" => {
            if !matches!(value.as_str(), "file" | "keyring") {
                return Err(invalid("credential_store", "must be 'file' or 'keyring'"));
            }
            profile.credential_store = value;
        }
        "ca_cert" | "ca-cert" => profile.ca_cert = Some(value.into()),
        "insecure" => {
            profile.insecure = Some(
                value
                    .parse()
                    .map_err(|_| invalid("insecure", "must be 'true' or 'false'"))?,
            );
        }
        "timeout" => {
            profile.timeout = Some(
                value
                    .parse()
                    .map_err(|_| invalid("timeout", "must be a number (seconds)"))?,
            );
        }
        "download_dir" | "download-dir" => profile.download_dir = Some(value.into()),
        "consistency" => {
            parse_consistency(&value)?;
            profile.consistency = Some(value);
        }
        other => {
            return Err(invalid(
                other,
                &format!(
                    "unknown config key '{other}'. Valid keys: api_url, credential_store, \
                     ca_cert, insecure, timeout, download_dir, consistency"
                ),
            ));
        }
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, mut global: GlobalOpts) -> Result<(), CliError> {
    let global = &mut global;
    match args.command {
        // ── Init: interactive wizard ────────────────────────────────
        ConfigCommand::Init => {
            let config_path = config::config_path();
            eprintln!("qradmin configuration wizard");
            eprintln!("   Config path: {}\n", config_path.display());

            let profile_name: String = Input::new()
                .with_prompt("Profile name")
                .default("default".into())
                .interact_text()
                .map_err(prompt_err)?;

            let api_url: String = Input::new()
                .with_prompt("Admin service URL")
                .default(DEFAULT_API_URL.into())
                .validate_with(|input: &String| {
                    url::Url::parse(input).map(|_| ()).map_err(|e| e.to_string())
                })
                .interact_text()
                .map_err(prompt_err)?;

            let stores = &["Session file (default)", "System keyring"];
            let store = Select::new()
                .with_prompt("Where should the session token be kept?")
                .items(stores)
                .default(0)
                .interact()
                .map_err(prompt_err)?;

            let mut profile = Profile::new(api_url);
            if store == 1 {
                profile.credential_store = "keyring".into();
            }

            let mut cfg = config::load_for_update()?;
            config::apply_defaults(global, &cfg)?;
            cfg.profiles.insert(profile_name.clone(), profile);
            cfg.default_profile = Some(profile_name.clone());

            let path = config::save_config(&cfg)?;
            output::success(global, &format!("Configuration written to {}", path.display()));
            eprintln!("  Active profile: {profile_name}");
            eprintln!("\n  Next: qradmin login");
            Ok(())
        }

        // ── Show ────────────────────────────────────────────────────
        ConfigCommand::Show => {
            let cfg = config::load_config()?;
            config::apply_defaults(global, &cfg)?;
            let text = format_config(&cfg)?;
            let out = output::render_single(&global.output, &cfg, |_| text.clone(), |c| {
                c.active_profile_name().to_owned()
            })?;
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            println!("{}", config::config_path().display());
            Ok(())
        }

        // ── Set <key> <value> ───────────────────────────────────────
        ConfigCommand::Set { key, value } => {
            let mut cfg = config::load_for_update()?;
            config::apply_defaults(global, &cfg)?;
            let profile_name = config::active_profile_name(global, &cfg);

            let profile = cfg
                .profiles
                .entry(profile_name.clone())
                .or_insert_with(|| Profile::new(DEFAULT_API_URL));
            set_profile_key(profile, &key, value)?;

            config::save_config(&cfg)?;
            output::success(global, &format!("Set {key} on profile '{profile_name}'"));
            Ok(())
        }

        // ── Profiles ────────────────────────────────────────────────
        ConfigCommand::Profiles => {
            let cfg = config::load_config()?;
            if cfg.profiles.is_empty() {
                eprintln!("No profiles configured. Run: qradmin config init");
                return Ok(());
            }
            let default = cfg.active_profile_name();
            for (name, profile) in &cfg.profiles {
                let marker = if name == default { " *" } else { "" };
                println!("{name}{marker}\t{}", profile.api_url);
            }
            Ok(())
        }

        // ── Set-default <name> ─────────────────────────────────────
        ConfigCommand::SetDefault { name } => {
            let mut cfg = config::load_for_update()?;
            config::apply_defaults(global, &cfg)?;

            if !cfg.profiles.contains_key(&name) {
                return Err(CliError::ProfileNotFound {
                    name,
                    available: config::available_profiles(&cfg),
                });
            }

            cfg.default_profile = Some(name.clone());
            config::save_config(&cfg)?;
            output::success(global, &format!("Default profile set to '{name}'"));
            Ok(())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn set_validates_values() {
        let mut p = Profile::new(DEFAULT_API_URL);

        set_profile_key(&mut p, "timeout", "5".into()).unwrap();
        assert_eq!(p.timeout, Some(5));

        set_profile_key(&mut p, "consistency", "last-resolved".into()).unwrap();
        assert_eq!(p.consistency.as_deref(), Some("last-resolved"));

        assert!(set_profile_key(&mut p, "timeout", "soon".into()).is_err());
        assert!(set_profile_key(&mut p, "credential_store", "env".into()).is_err());
        assert!(set_profile_key(&mut p, "api_url", "nope".into()).is_err());
        assert!(set_profile_key(&mut p, "colour", "red".into()).is_err());
    }

    #[test]
    fn format_lists_profiles_in_order() {
        let mut cfg = Config::default();
        cfg.profiles.insert("zeta".into(), Profile::new("http://z"));
        cfg.profiles.insert("alpha".into(), Profile::new("http://a"));

        let out = format_config(&cfg).unwrap();
        let alpha = out.find("[profiles.alpha]").unwrap();
        let zeta = out.find("[profiles.zeta]").unwrap();
        assert!(alpha < zeta);
        assert!(out.contains("credential_store = \"file\""));
    }

    #[test]
    fn paths_with_backslashes_and_quotes_stay_valid_toml() {
        let mut profile = Profile::new("http://localhost:3001");
        profile.ca_cert = Some(r#"C:\certs\"corp" ca.pem"#.into());
        profile.download_dir = Some(r"D:\exports".into());
        let mut cfg = Config::default();
        cfg.profiles.insert("win".into(), profile);

        let parsed: Config = toml::from_str(&format_config(&cfg).unwrap()).unwrap();
        let win = &parsed.profiles["win"];
        assert_eq!(
            win.ca_cert.as_deref(),
            Some(std::path::Path::new(r#"C:\certs\"corp" ca.pem"#))
        );
        assert_eq!(
            win.download_dir.as_deref(),
            Some(std::path::Path::new(r"D:\exports"))
        );
    }
}
