use std::{env, path::PathBuf, sync::Arc};

use chrono::Weekday;
use color_eyre::{Result, eyre::Context};
use directories::ProjectDirs;
use lazy_static::lazy_static;
use serde::Deserialize;

use crate::libs::{
    clock::SystemClock,
    picker::InvalidCommitPolicy,
    value::{ValueModel, Zone},
};

#[derive(Clone, Debug, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub data_dir: PathBuf,
}

/// Settings shared by every picker on screen
#[derive(Clone, Debug, Deserialize)]
pub struct PickerConfig {
    pub week_start: Weekday,
    pub invalid_label: String,
    pub invalid_commit: InvalidCommitPolicy,
    pub zone: Zone,
    pub date_format: String,
    pub time_format: String,
    pub date_time_format: String,
}

impl PickerConfig {
    /// A [`ValueModel`] reading the system clock
    pub fn value_model(&self) -> ValueModel {
        ValueModel::new(self.zone, self.week_start, Arc::new(SystemClock))
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    #[serde(default, flatten)]
    pub config: AppConfig,
    pub picker: PickerConfig,
}

lazy_static! {
    pub static ref PROJECT_NAME: String = env!("CARGO_CRATE_NAME").to_uppercase().to_string();
}

impl Config {
    pub fn new(cli_source: Option<crate::cli::ClapSource>) -> Result<Self> {
        // `--data-dir` also decides where the config file is looked up
        let data_dir = cli_source
            .as_ref()
            .and_then(|cli| cli.data_dir.as_ref())
            .map(PathBuf::from)
            .unwrap_or_else(get_data_dir);
        let mut builder = config::Config::builder()
            .set_default("data_dir", data_dir.to_string_lossy().to_string())?
            .set_default("picker.week_start", "sun")?
            .set_default("picker.invalid_label", "Unknown")?
            .set_default("picker.invalid_commit", "keep-open")?
            .set_default("picker.zone", "local")?
            .set_default("picker.date_format", "MMMM Do")?
            .set_default("picker.time_format", "hh:mm A")?
            .set_default("picker.date_time_format", "MMMM Do hh:mm a")?
            .add_source(config::File::from(data_dir.join("config")).required(false));

        // Add CLI source last (highest priority)
        if let Some(cli_source) = cli_source {
            builder = builder.add_source(cli_source);
        }

        let cfg: Self = builder
            .build()
            .context("Error building config")?
            .try_deserialize()
            .context("Error deserialize config")?;

        Ok(cfg)
    }
}

pub fn get_data_dir() -> PathBuf {
    if let Some(s) = env::var(format!("{}_DATA", PROJECT_NAME.clone()))
        .ok()
        .map(PathBuf::from)
    {
        s
    } else if let Some(proj_dirs) = project_directory() {
        proj_dirs.data_local_dir().to_path_buf()
    } else {
        PathBuf::from(".").join(".data")
    }
}

fn project_directory() -> Option<ProjectDirs> {
    ProjectDirs::from("dev", "yyang", env!("CARGO_PKG_NAME"))
}

#[cfg(test)]
mod tests {

    use chrono::FixedOffset;
    use clap::Parser;
    use tempfile::tempdir_in;

    use crate::cli::{ClapSource, Cli};

    use super::*;

    fn with_data_dir<F: FnOnce(&std::path::Path)>(f: F) {
        let temp_data = tempdir_in(".").unwrap();
        temp_env::with_vars(
            [(
                format!("{}_DATA", PROJECT_NAME.clone()).as_str(),
                Some(temp_data.path().to_str().unwrap()),
            )],
            || f(temp_data.path()),
        );
    }

    #[test]
    fn data_dir_from_env() {
        with_data_dir(|dir| {
            let config = Config::new(None).unwrap();
            assert_eq!(config.config.data_dir, dir);
        });
    }

    #[test]
    fn data_dir_from_cli() {
        let args = Cli::parse_from(["test-config", "--data-dir", ".cli-data"]);
        let config = Config::new(Some(ClapSource::new(&args))).expect("Failed to load config");

        assert_eq!(config.config.data_dir, PathBuf::from(".cli-data"));
    }

    #[test]
    fn config_file_from_cli_data_dir() {
        with_data_dir(|_| {
            let cli_dir = tempdir_in(".").unwrap();
            std::fs::write(
                cli_dir.path().join("config.toml"),
                "[picker]\ninvalid_label = \"from cli dir\"\n",
            )
            .unwrap();
            let path = cli_dir.path().to_str().unwrap();
            let args = Cli::parse_from(["test-config", "--data-dir", path]);
            let config = Config::new(Some(ClapSource::new(&args))).unwrap();

            assert_eq!(config.config.data_dir, cli_dir.path());
            assert_eq!(config.picker.invalid_label, "from cli dir");
        });
    }

    #[test]
    fn picker_defaults() {
        with_data_dir(|_| {
            let config = Config::new(None).unwrap();
            assert_eq!(config.picker.week_start, Weekday::Sun);
            assert_eq!(config.picker.invalid_label, "Unknown");
            assert_eq!(config.picker.invalid_commit, InvalidCommitPolicy::KeepOpen);
            assert_eq!(config.picker.zone, Zone::Local);
            assert_eq!(config.picker.date_format, "MMMM Do");
            assert_eq!(config.picker.time_format, "hh:mm A");
        });
    }

    #[test]
    fn picker_from_cli() {
        let args = Cli::parse_from([
            "test-config",
            "--week-start",
            "mon",
            "--invalid-label",
            "N/A",
            "--invalid-commit",
            "close-silently",
            "--zone",
            "+08:00",
        ]);
        let config = Config::new(Some(ClapSource::new(&args))).expect("Failed to load config");

        assert_eq!(config.picker.week_start, Weekday::Mon);
        assert_eq!(config.picker.invalid_label, "N/A");
        assert_eq!(
            config.picker.invalid_commit,
            InvalidCommitPolicy::CloseSilently
        );
        assert_eq!(
            config.picker.zone,
            Zone::Fixed(FixedOffset::east_opt(8 * 3600).unwrap())
        );
    }

    #[test]
    fn picker_from_file() {
        with_data_dir(|dir| {
            std::fs::write(
                dir.join("config.toml"),
                "[picker]\nweek_start = \"mon\"\nzone = \"utc\"\n",
            )
            .unwrap();
            let config = Config::new(None).unwrap();
            assert_eq!(config.picker.week_start, Weekday::Mon);
            assert_eq!(config.picker.zone, Zone::Utc);
            // untouched keys keep their defaults
            assert_eq!(config.picker.invalid_label, "Unknown");
        });
    }

    #[test]
    fn invalid_policy_is_an_error() {
        let args = Cli::parse_from(["test-config", "--invalid-commit", "sometimes"]);
        assert!(Config::new(Some(ClapSource::new(&args))).is_err());
    }
}
