//! Logging Infrastructure
//!
//! Console output plus optional rotating files:
//! - `app/` daily rotating application logs (deleted after 14 days)
//! - `audit/` role mutations, target `"audit"` (never deleted)
//! - `security/` sign-in and sign-out, target `"security"` (never deleted)

use chrono::{Local, NaiveDate, TimeZone};
use std::fs;
use std::path::Path;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, prelude::*};

/// Days an application log file is kept
pub const APP_LOG_RETENTION_DAYS: i64 = 14;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Delete `app.YYYY-MM-DD.log` files older than [`APP_LOG_RETENTION_DAYS`]
///
/// Returns the number of removed files. Audit and security logs are never touched.
pub fn cleanup_old_logs(log_dir: &Path) -> anyhow::Result<usize> {
    let app_log_dir = log_dir.join("app");
    if !app_log_dir.exists() {
        return Ok(0);
    }

    let cutoff = Local::now() - chrono::Duration::days(APP_LOG_RETENTION_DAYS);
    let mut removed = 0;

    for entry in fs::read_dir(app_log_dir)? {
        let path = entry?.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(date) = name
            .strip_prefix("app.")
            .or_else(|| name.strip_prefix("app-"))
            .and_then(|rest| rest.strip_suffix(".log"))
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        else {
            continue;
        };

        let expired = date
            .and_hms_opt(0, 0, 0)
            .and_then(|midnight| Local.from_local_datetime(&midnight).single())
            .is_some_and(|stamp| stamp < cutoff);
        if expired {
            fs::remove_file(&path)?;
            removed += 1;
            tracing::info!(file = %name, "Deleted old log file");
        }
    }

    Ok(removed)
}

/// Initialize the logging system
///
/// # Arguments
/// * `level` - filter used when `RUST_LOG` is unset (e.g. "info", "debug")
/// * `json_format` - JSON lines instead of the pretty format
/// * `log_dir` - enables the rotating `app/`, `audit/` and `security/` files
///
/// Expired application logs are removed once here.
///
/// # Examples
/// ```ignore
/// // Development setup (console only)
/// init_logger_with_file("debug", false, None)?;
///
/// // Production setup (console + files)
/// init_logger_with_file("info", true, Some(Path::new("./work_dir/logs")))?;
/// ```
pub fn init_logger_with_file(
    level: &str,
    json_format: bool,
    log_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let console_layer: BoxedLayer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_current_span(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    let mut layers = vec![console_layer];
    if let Some(dir) = log_dir {
        fs::create_dir_all(dir)?;
        layers.push(file_layer(dir, "app", json_format, |target| {
            target != "audit" && target != "security"
        })?);
        layers.push(file_layer(dir, "audit", json_format, |target| target == "audit")?);
        layers.push(file_layer(dir, "security", json_format, |target| target == "security")?);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    if let Some(dir) = log_dir {
        match cleanup_old_logs(dir) {
            Ok(0) => {}
            Ok(removed) => tracing::info!(removed, "Cleaned up old application logs"),
            Err(e) => tracing::error!(error = %e, "Failed to cleanup old logs"),
        }
    }

    Ok(())
}

/// Initialize the logging system (console only)
pub fn init_logger(level: &str, json_format: bool) -> anyhow::Result<()> {
    init_logger_with_file(level, json_format, None)
}

/// Daily rotating `<dir>/<kind>/<kind>.YYYY-MM-DD.log`, keeping only matching targets
fn file_layer(
    dir: &Path,
    kind: &str,
    json_format: bool,
    keep: fn(&str) -> bool,
) -> anyhow::Result<BoxedLayer> {
    let kind_dir = dir.join(kind);
    fs::create_dir_all(&kind_dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(kind)
        .filename_suffix("log")
        .build(kind_dir)?;

    let filter = filter_fn(move |meta| keep(meta.target()));
    let layer: BoxedLayer = if json_format {
        fmt::layer()
            .json()
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::sync::Mutex::new(appender))
            .with_filter(filter)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_ansi(false)
            .with_writer(std::sync::Mutex::new(appender))
            .with_filter(filter)
            .boxed()
    };
    Ok(layer)
}
