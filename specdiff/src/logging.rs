// Copyright 2025 Oxide Computer Company

//! Provides basic facilities for configuring logging and creating loggers,
//! all using Slog.  None of this is required to use the diff engine --
//! [`crate::diff_specs`] accepts any `slog::Logger` -- but it's provided
//! because consumers (and this crate's own tests and CLI) commonly want it.

use camino::Utf8PathBuf;
use serde::Deserialize;
use serde::Serialize;
use slog::Drain;
use slog::Level;
use slog::Logger;
use std::io;
use std::io::LineWriter;

/// Logging configuration, typically a top-level block in a consumer's TOML
/// config file (although that's not required).
///
/// ```
/// use serde::Deserialize;
/// use specdiff::ConfigLogging;
///
/// #[derive(Deserialize)]
/// struct Config {
///     log: ConfigLogging,
/// }
///
/// let config: Config = toml::from_str(
///     r#"
///         [log]
///         mode = "stderr-terminal"
///         level = "debug"
///     "#,
/// )
/// .unwrap();
/// let log = config.log.to_logger("example").unwrap();
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "mode")]
pub enum ConfigLogging {
    /// Pretty-printed output to stderr, assumed to support terminal escapes.
    StderrTerminal { level: ConfigLoggingLevel },
    /// Newline-delimited JSON records written to the given file.
    File {
        level: ConfigLoggingLevel,
        path: Utf8PathBuf,
        if_exists: ConfigLoggingIfExists,
    },
}

/// Log messages have a level that's used for filtering in the usual way.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigLoggingLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Critical,
}

impl From<&ConfigLoggingLevel> for Level {
    fn from(config_level: &ConfigLoggingLevel) -> Level {
        match config_level {
            ConfigLoggingLevel::Trace => Level::Trace,
            ConfigLoggingLevel::Debug => Level::Debug,
            ConfigLoggingLevel::Info => Level::Info,
            ConfigLoggingLevel::Warn => Level::Warning,
            ConfigLoggingLevel::Error => Level::Error,
            ConfigLoggingLevel::Critical => Level::Critical,
        }
    }
}

/// Specifies the behavior when logging to a file that already exists.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigLoggingIfExists {
    /// Fail to create the log
    Fail,
    /// Truncate the existing file
    Truncate,
    /// Append to the existing file
    Append,
}

impl ConfigLogging {
    /// Create a root logger based on the requested configuration.
    ///
    /// `log_name` is attached to every record as the `name` key.
    pub fn to_logger<S: AsRef<str>>(
        &self,
        log_name: S,
    ) -> Result<Logger, io::Error> {
        match self {
            ConfigLogging::StderrTerminal { level } => {
                let decorator = slog_term::TermDecorator::new().build();
                let drain =
                    slog_term::FullFormat::new(decorator).build().fuse();
                Ok(root_logger(level, drain, log_name.as_ref()))
            }

            ConfigLogging::File { level, path, if_exists } => {
                let mut open_options = std::fs::OpenOptions::new();
                open_options.write(true).create(true);
                match if_exists {
                    ConfigLoggingIfExists::Fail => {
                        open_options.create_new(true);
                    }
                    ConfigLoggingIfExists::Append => {
                        open_options.append(true);
                    }
                    ConfigLoggingIfExists::Truncate => {
                        open_options.truncate(true);
                    }
                }

                if let Some(parent) = path.parent() {
                    std::fs::create_dir_all(parent)?;
                }

                // Buffer writes to the file around newlines to minimize
                // syscalls.
                let file = LineWriter::new(open_options.open(path)?);
                let drain = slog_json::Json::new(file)
                    .add_default_keys()
                    .build()
                    .fuse();
                Ok(root_logger(level, drain, log_name.as_ref()))
            }
        }
    }
}

// An async drain takes care of synchronization; the documented alternatives
// use a std::sync::Mutex around the whole drain.
fn root_logger<T>(
    level: &ConfigLoggingLevel,
    drain: T,
    log_name: &str,
) -> Logger
where
    T: Drain + Send + 'static,
    <T as Drain>::Err: std::fmt::Debug,
{
    let level_drain = slog::LevelFilter(drain, Level::from(level)).fuse();
    let async_drain =
        slog_async::Async::new(level_drain).chan_size(1024).build().fuse();
    Logger::root(async_drain, o!("name" => log_name.to_string()))
}

#[cfg(test)]
mod test {
    use super::ConfigLogging;
    use super::ConfigLoggingIfExists;
    use super::ConfigLoggingLevel;

    #[test]
    fn test_config_from_toml() {
        let config: ConfigLogging = toml::from_str(
            "mode = \"stderr-terminal\"\nlevel = \"info\"\n",
        )
        .unwrap();
        assert_eq!(
            config,
            ConfigLogging::StderrTerminal {
                level: ConfigLoggingLevel::Info
            }
        );

        let config: ConfigLogging = toml::from_str(
            "mode = \"file\"\nlevel = \"debug\"\n\
             path = \"/tmp/specdiff.log\"\nif_exists = \"append\"\n",
        )
        .unwrap();
        assert_eq!(
            config,
            ConfigLogging::File {
                level: ConfigLoggingLevel::Debug,
                path: "/tmp/specdiff.log".into(),
                if_exists: ConfigLoggingIfExists::Append,
            }
        );
    }

    #[test]
    fn test_bad_level_rejected() {
        let result = toml::from_str::<ConfigLogging>(
            "mode = \"stderr-terminal\"\nlevel = \"whisper\"\n",
        );
        assert!(result.is_err());
    }
}
