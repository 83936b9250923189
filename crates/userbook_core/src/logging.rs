//! Logging configuration and user operation events.
//!
//! # Responsibility
//! - Resolve `USERBOOK_LOG_LEVEL` / `USERBOOK_LOG_DIR` into a `LogConfig`.
//! - Start the process logger once, to rotating files or to stderr.
//! - Render one metadata-only line per user operation.
//!
//! # Invariants
//! - A second `init_logging` call succeeds only with an identical config.
//! - Operation events carry ids and outcomes, never names or emails.

use crate::model::user::{UserId, UserValidationError};
use flexi_logger::{
    Cleanup, Criterion, Duplicate, FileSpec, FlexiLoggerError, LogSpecification, Logger,
    LoggerHandle, Naming,
};
use log::{info, warn, LevelFilter};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;
use std::str::FromStr;

pub const LOG_LEVEL_ENV: &str = "USERBOOK_LOG_LEVEL";
pub const LOG_DIR_ENV: &str = "USERBOOK_LOG_DIR";

const LOG_FILE_BASENAME: &str = "userbook";
const ROTATE_AT_BYTES: u64 = 10 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 5;

static ACTIVE_LOGGER: OnceCell<(LogConfig, LoggerHandle)> = OnceCell::new();

/// Where and how verbosely the process logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LevelFilter,
    /// Rotating files go here; `None` logs to stderr only.
    pub log_dir: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LevelFilter::Info,
            log_dir: None,
        }
    }
}

impl LogConfig {
    /// Reads the config from the process environment.
    pub fn from_env() -> Result<Self, LoggingError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the config through `lookup`; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, LoggingError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let level = match read(LOG_LEVEL_ENV) {
            Some(raw) => {
                LevelFilter::from_str(&raw).map_err(|_| LoggingError::InvalidLevel(raw))?
            }
            None => LevelFilter::Info,
        };

        let log_dir = match read(LOG_DIR_ENV).map(PathBuf::from) {
            Some(dir) if dir.is_relative() => return Err(LoggingError::RelativeDir(dir)),
            other => other,
        };

        Ok(Self { level, log_dir })
    }
}

#[derive(Debug)]
pub enum LoggingError {
    InvalidLevel(String),
    RelativeDir(PathBuf),
    CreateDir {
        dir: PathBuf,
        source: std::io::Error,
    },
    Backend(FlexiLoggerError),
    /// Logging already runs with a different config.
    Conflict { active: LogConfig },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLevel(raw) => write!(
                f,
                "{LOG_LEVEL_ENV}=`{raw}` is not one of off|error|warn|info|debug|trace"
            ),
            Self::RelativeDir(dir) => write!(
                f,
                "{LOG_DIR_ENV} must be absolute, got `{}`",
                dir.display()
            ),
            Self::CreateDir { dir, source } => {
                write!(f, "cannot create log directory `{}`: {source}", dir.display())
            }
            Self::Backend(err) => write!(f, "logger failed to start: {err}"),
            Self::Conflict { active } => write!(
                f,
                "logging already active at level {} ({})",
                active.level,
                active
                    .log_dir
                    .as_ref()
                    .map(|dir| dir.display().to_string())
                    .unwrap_or_else(|| "stderr".to_string())
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

/// Starts the process logger for `config`.
///
/// With a directory, records go to rotating `userbook*.log` files and
/// warnings are also echoed to stderr.
pub fn init_logging(config: &LogConfig) -> Result<(), LoggingError> {
    let (active, _) = ACTIVE_LOGGER.get_or_try_init(|| start_logger(config))?;
    if active != config {
        return Err(LoggingError::Conflict {
            active: active.clone(),
        });
    }
    Ok(())
}

fn start_logger(config: &LogConfig) -> Result<(LogConfig, LoggerHandle), LoggingError> {
    let spec = LogSpecification::builder().default(config.level).build();
    let logger = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|source| LoggingError::CreateDir {
                dir: dir.clone(),
                source,
            })?;
            Logger::with(spec)
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(ROTATE_AT_BYTES),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(KEEP_LOG_FILES),
                )
                .append()
                .duplicate_to_stderr(Duplicate::Warn)
                .format_for_files(flexi_logger::detailed_format)
        }
        None => Logger::with(spec).log_to_stderr(),
    };
    let handle = logger.start().map_err(LoggingError::Backend)?;

    info!(
        "event=logging_start module=core status=ok version={} level={}",
        env!("CARGO_PKG_VERSION"),
        config.level
    );
    Ok((config.clone(), handle))
}

/// Result of one user operation, as reported in its event line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Ok,
    Rejected(UserValidationError),
    NotFound,
}

pub(crate) fn user_event_line(op: &str, user_id: Option<UserId>, outcome: Outcome) -> String {
    let mut line = format!("event=user_{op} module=service");
    match outcome {
        Outcome::Ok => line.push_str(" status=ok"),
        Outcome::Rejected(reason) => line.push_str(&format!(" status=rejected reason={reason:?}")),
        Outcome::NotFound => line.push_str(" status=not_found"),
    }
    if let Some(id) = user_id {
        line.push_str(&format!(" user_id={id}"));
    }
    line
}

/// Logs one user operation: successes at info, failures at warn.
pub(crate) fn log_user_op(op: &str, user_id: Option<UserId>, outcome: Outcome) {
    let line = user_event_line(op, user_id, outcome);
    match outcome {
        Outcome::Ok => info!("{line}"),
        _ => warn!("{line}"),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        init_logging, user_event_line, LogConfig, LoggingError, Outcome, LOG_DIR_ENV,
        LOG_LEVEL_ENV,
    };
    use crate::model::user::UserValidationError;
    use log::LevelFilter;
    use std::collections::HashMap;
    use std::path::PathBuf;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn missing_or_blank_vars_fall_back_to_info_on_stderr() {
        let config = LogConfig::from_lookup(lookup_from(&[(LOG_LEVEL_ENV, "  ")])).unwrap();
        assert_eq!(config, LogConfig::default());
    }

    #[test]
    fn level_and_dir_are_read_from_vars() {
        let config = LogConfig::from_lookup(lookup_from(&[
            (LOG_LEVEL_ENV, "DEBUG"),
            (LOG_DIR_ENV, "/var/log/userbook"),
        ]))
        .unwrap();

        assert_eq!(config.level, LevelFilter::Debug);
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/userbook")));
    }

    #[test]
    fn unknown_level_and_relative_dir_are_rejected() {
        let err = LogConfig::from_lookup(lookup_from(&[(LOG_LEVEL_ENV, "chatty")])).unwrap_err();
        assert!(matches!(err, LoggingError::InvalidLevel(raw) if raw == "chatty"));

        let err = LogConfig::from_lookup(lookup_from(&[(LOG_DIR_ENV, "logs")])).unwrap_err();
        assert!(matches!(err, LoggingError::RelativeDir(_)));
    }

    #[test]
    fn event_lines_carry_ids_and_outcomes_only() {
        assert_eq!(
            user_event_line("create", Some(3), Outcome::Ok),
            "event=user_create module=service status=ok user_id=3"
        );
        assert_eq!(
            user_event_line(
                "update",
                None,
                Outcome::Rejected(UserValidationError::InvalidEmail)
            ),
            "event=user_update module=service status=rejected reason=InvalidEmail"
        );
        assert_eq!(
            user_event_line("delete", Some(9), Outcome::NotFound),
            "event=user_delete module=service status=not_found user_id=9"
        );
    }

    #[test]
    fn init_is_idempotent_and_rejects_a_different_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = LogConfig {
            level: LevelFilter::Info,
            log_dir: Some(dir.path().to_path_buf()),
        };

        init_logging(&config).unwrap();
        init_logging(&config).unwrap();

        let louder = LogConfig {
            level: LevelFilter::Trace,
            ..config.clone()
        };
        let err = init_logging(&louder).unwrap_err();
        assert!(matches!(err, LoggingError::Conflict { active } if active == config));
    }
}
