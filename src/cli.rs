use clap::Parser;
use color_eyre::Result;
use config::Source;

use crate::config::get_data_dir;

#[derive(Parser, Debug)]
#[command(author, version = version(), about)]
pub struct Cli {
    /// Tick rate, i.e. number of ticks per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 4.0)]
    pub tick_rate: f64,

    /// Frame rate, i.e. number of frames per second
    #[arg(short, long, value_name = "FLOAT", default_value_t = 60.0)]
    pub frame_rate: f64,

    /// Path to the data directory
    #[arg(short, long, value_name = "PATH")]
    pub data_dir: Option<String>,

    /// First day of the week, e.g. "sun" or "mon"
    #[arg(short, long, value_name = "WEEKDAY")]
    pub week_start: Option<String>,

    /// Label shown in place of an invalid date
    #[arg(long, value_name = "TEXT")]
    pub invalid_label: Option<String>,

    /// What "OK" does with an invalid selection: keep-open or close-silently
    #[arg(long, value_name = "POLICY")]
    pub invalid_commit: Option<String>,

    /// Time zone of the pickers: local, utc or a fixed offset like +08:00
    #[arg(short, long, value_name = "ZONE")]
    pub zone: Option<String>,
}

const VERSION_MESSAGE: &str = concat!(env!("CARGO_PKG_VERSION"));

pub fn version() -> String {
    let author = clap::crate_authors!();

    let data_dir_path = get_data_dir().display().to_string();

    format!(
        "\
{VERSION_MESSAGE}

Authors: {author}

Data directory: {data_dir_path}"
    )
}

#[derive(Debug, Clone)]
pub struct ClapSource {
    pub data_dir: Option<String>,
    pub week_start: Option<String>,
    pub invalid_label: Option<String>,
    pub invalid_commit: Option<String>,
    pub zone: Option<String>,
}

impl ClapSource {
    pub fn new(cli: &Cli) -> Self {
        Self {
            data_dir: cli.data_dir.clone(),
            week_start: cli.week_start.clone(),
            invalid_label: cli.invalid_label.clone(),
            invalid_commit: cli.invalid_commit.clone(),
            zone: cli.zone.clone(),
        }
    }
}

impl Source for ClapSource {
    fn clone_into_box(&self) -> Box<dyn Source + Send + Sync> {
        Box::new(self.clone())
    }

    fn collect(&self) -> Result<config::Map<String, config::Value>, config::ConfigError> {
        let mut map = config::Map::new();
        let entries = [
            ("data_dir", &self.data_dir),
            ("picker.week_start", &self.week_start),
            ("picker.invalid_label", &self.invalid_label),
            ("picker.invalid_commit", &self.invalid_commit),
            ("picker.zone", &self.zone),
        ];
        for (key, value) in entries {
            if let Some(value) = value {
                map.insert(key.to_string(), config::Value::new(None, value.clone()));
            }
        }
        Ok(map)
    }
}
