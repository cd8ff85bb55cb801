//! 日志记录配置
//!
//! 日志写入 `<data_dir>/tui_pickers.log`，终端界面占用 stdout，因此不输出到终端。
//! 级别由 `RUST_LOG` 控制，未设置时回退到 `TUI_PICKERS_LOG_LEVEL`，默认 `info`。

use std::path::{Path, PathBuf};

use color_eyre::Result;
use lazy_static::lazy_static;
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::config::PROJECT_NAME;

lazy_static! {
    pub static ref LOG_ENV: String = format!("{}_LOG_LEVEL", PROJECT_NAME.clone());
    pub static ref LOG_FILE: String = format!("{}.log", env!("CARGO_PKG_NAME"));
}

/// Create (or truncate) the log file inside `data_dir`
fn create_log_file(data_dir: &Path) -> Result<(PathBuf, std::fs::File)> {
    std::fs::create_dir_all(data_dir)?;
    let log_path = data_dir.join(LOG_FILE.clone());
    let log_file = std::fs::File::create(&log_path)?;
    Ok((log_path, log_file))
}

pub fn init(data_dir: &Path) -> Result<()> {
    let (_, log_file) = create_log_file(data_dir)?;

    let env_filter = EnvFilter::builder().with_default_directive(tracing::Level::INFO.into());
    // If the `RUST_LOG` environment variable is set, use that as the default, otherwise use the
    // value of the `LOG_ENV` environment variable.
    let env_filter = env_filter
        .try_from_env()
        .or_else(|_| env_filter.with_env_var(LOG_ENV.clone()).from_env())?;

    let file_subscriber = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_writer(log_file)
        .with_target(false)
        .with_ansi(false)
        .with_filter(env_filter);
    tracing_subscriber::registry()
        .with(file_subscriber)
        .with(ErrorLayer::default())
        .try_init()?;
    Ok(())
}
