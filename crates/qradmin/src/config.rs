//! CLI-specific config wrappers.
//!
//! Profiles, paths, and sessions live in `qradmin-config`; this module adds
//! the flag-aware resolution that only makes sense with `GlobalOpts`.

use std::path::PathBuf;

use clap::ValueEnum;
use tracing::debug;

use qradmin_config::{
    Config, DEFAULT_API_URL, Profile, SessionStore, load_config_file, profile_to_console_config,
};
use qradmin_core::ConsoleConfig;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use qradmin_config::{config_path, load_config, save_config};

/// Everything a command needs to talk to the service.
#[derive(Debug)]
pub struct Resolved {
    pub profile_name: String,
    pub console: ConsoleConfig,
    pub store: SessionStore,
    pub download_dir: PathBuf,
}

/// Resolve the active profile name: `--profile` flag, then the config's
/// `default_profile`, then "default".
pub fn active_profile_name(global: &GlobalOpts, cfg: &Config) -> String {
    global
        .profile
        .clone()
        .unwrap_or_else(|| cfg.active_profile_name().to_owned())
}

/// Comma-separated profile names for help text.
pub fn available_profiles(cfg: &Config) -> String {
    let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
    names.sort();
    if names.is_empty() {
        "(none)".into()
    } else {
        names.join(", ")
    }
}

/// Load the config file alone, for commands that rewrite it.
pub fn load_for_update() -> Result<Config, CliError> {
    Ok(load_config_file(&config_path())?)
}

fn parse_default<T: ValueEnum>(field: &str, raw: &str) -> Result<T, CliError> {
    T::from_str(raw, true).map_err(|_| CliError::Config {
        message: format!("invalid defaults.{field} '{raw}' in {}", config_path().display()),
    })
}

/// Fill the effective output format and color mode: an explicit flag wins,
/// otherwise the config's `[defaults]` apply.
pub fn apply_defaults(global: &mut GlobalOpts, cfg: &Config) -> Result<(), CliError> {
    global.output = match global.output_flag.take() {
        Some(format) => format,
        None => parse_default::<OutputFormat>("output", &cfg.defaults.output)?,
    };
    global.color = match global.color_flag.take() {
        Some(mode) => mode,
        None => parse_default::<ColorMode>("color", &cfg.defaults.color)?,
    };
    Ok(())
}

/// Merge the config, the selected profile, and CLI overrides.
///
/// A profile named with `--profile` must exist. Without any profile the
/// service is assumed at [`DEFAULT_API_URL`].
pub fn resolve(global: &GlobalOpts, cfg: &Config) -> Result<Resolved, CliError> {
    let profile_name = active_profile_name(global, cfg);

    let mut profile = match cfg.profiles.get(&profile_name) {
        Some(profile) => profile.clone(),
        None if global.profile.is_some() => {
            return Err(CliError::ProfileNotFound {
                name: profile_name,
                available: available_profiles(cfg),
            });
        }
        None => {
            debug!(profile = %profile_name, "no profile configured, using defaults");
            Profile::new(DEFAULT_API_URL)
        }
    };

    if let Some(ref url) = global.api_url {
        profile.api_url.clone_from(url);
    }
    if global.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = global.timeout {
        profile.timeout = Some(timeout);
    }

    let console = profile_to_console_config(&profile, &cfg.defaults)?;
    let store = SessionStore::for_profile(&profile, &profile_name)?;
    let download_dir = global
        .download_dir
        .clone()
        .or_else(|| profile.download_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    debug!(
        profile = %profile_name,
        api_url = %console.api_url,
        session = %store.describe(),
        "configuration resolved"
    );

    Ok(Resolved {
        profile_name,
        console,
        store,
        download_dir,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::Cli;

    fn global(argv: &[&str]) -> GlobalOpts {
        let mut full = vec!["qradmin"];
        full.extend_from_slice(argv);
        full.push("whoami");
        Cli::parse_from(full).global
    }

    #[test]
    fn config_defaults_apply_without_flags() {
        let mut cfg = Config::default();
        cfg.defaults.output = "json".into();
        cfg.defaults.color = "never".into();

        let mut opts = global(&[]);
        apply_defaults(&mut opts, &cfg).unwrap();
        assert!(matches!(opts.output, OutputFormat::Json));
        assert!(matches!(opts.color, ColorMode::Never));

        let mut opts = global(&["-o", "yaml", "--color", "always"]);
        apply_defaults(&mut opts, &cfg).unwrap();
        assert!(matches!(opts.output, OutputFormat::Yaml));
        assert!(matches!(opts.color, ColorMode::Always));
    }

    #[test]
    fn unknown_default_output_is_a_config_error() {
        let mut cfg = Config::default();
        cfg.defaults.output = "xml".into();

        let mut opts = global(&[]);
        let err = apply_defaults(&mut opts, &cfg).unwrap_err();
        assert!(matches!(err, CliError::Config { .. }));
    }
}
