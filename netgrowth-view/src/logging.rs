//! Tracing setup for the viewer binary.
//!
//! Events go to stderr, filtered by `RUST_LOG`. eframe, winit and the egui
//! backends log through the `log` facade and are chatty at `info`, so the
//! default filter only lets their warnings through.

use std::{env, fmt, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing_log::{AsLog, LogTracer};
use tracing_subscriber::{EnvFilter, Layer, Registry, layer::SubscriberExt};

const LOG_FORMAT_ENV: &str = "NETGROWTH_LOG_FORMAT";

const DEFAULT_DIRECTIVES: &str = "info,eframe=warn,egui_glow=warn,egui_winit=warn,winit=warn";

static INSTALLED: OnceLock<LogFormat> = OnceLock::new();

/// Output format of the installed subscriber.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Human,
    /// One JSON object per event, fields flattened to the top level.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let wanted = raw.trim();
        if wanted.eq_ignore_ascii_case("human") {
            Ok(Self::Human)
        } else if wanted.eq_ignore_ascii_case("json") {
            Ok(Self::Json)
        } else {
            Err(LoggingError::UnknownFormat(wanted.to_owned()))
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Human => "human",
            Self::Json => "json",
        })
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("NETGROWTH_LOG_FORMAT is not valid UTF-8")]
    InvalidUnicode,
    #[error("unknown log format `{0}` in NETGROWTH_LOG_FORMAT; use `human` or `json`")]
    UnknownFormat(String),
    #[error("another tracing subscriber is already installed: {0}")]
    SubscriberTaken(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Installs the global subscriber once and returns the format in use.
///
/// Later calls return the format chosen by the first successful call.
///
/// # Errors
/// Fails if `NETGROWTH_LOG_FORMAT` is unreadable or names an unknown format,
/// or if some other subscriber was installed first.
pub fn init_logging() -> Result<LogFormat, LoggingError> {
    if let Some(format) = INSTALLED.get() {
        return Ok(*format);
    }

    let format = format_from_env()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    tracing::subscriber::set_global_default(Registry::default().with(filter).with(fmt_layer(format)))?;

    // Only the first bridge wins; a test harness may have set one already.
    let _ = LogTracer::builder()
        .with_max_level(LevelFilter::current().as_log())
        .init();

    Ok(*INSTALLED.get_or_init(|| format))
}

fn format_from_env() -> Result<LogFormat, LoggingError> {
    match env::var(LOG_FORMAT_ENV) {
        Ok(raw) => raw.parse(),
        Err(env::VarError::NotPresent) => Ok(LogFormat::default()),
        Err(env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode),
    }
}

fn fmt_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    let layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    match format {
        LogFormat::Human => layer.with_target(false).boxed(),
        LogFormat::Json => layer
            .json()
            .flatten_event(true)
            .with_current_span(true)
            .boxed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    #[rstest]
    #[case::lower("human", LogFormat::Human)]
    #[case::mixed_case("Json", LogFormat::Json)]
    #[case::padded("  json\n", LogFormat::Json)]
    fn parses_known_formats(#[case] raw: &str, #[case] expected: LogFormat) {
        assert_eq!(raw.parse::<LogFormat>().expect("known format"), expected);
    }

    #[rstest]
    #[case("yaml")]
    #[case("")]
    fn rejects_unknown_formats(#[case] raw: &str) {
        let err = raw.parse::<LogFormat>().expect_err("unknown format");
        assert!(matches!(err, LoggingError::UnknownFormat(ref got) if got == raw));
    }

    #[test]
    fn format_names_parse_back() {
        for format in [LogFormat::Human, LogFormat::Json] {
            assert_eq!(format.to_string().parse::<LogFormat>().expect("own name"), format);
        }
    }

    #[test]
    fn second_init_reports_the_installed_format() {
        let first = init_logging().expect("first install");
        assert_eq!(init_logging().expect("already installed"), first);
    }
}
