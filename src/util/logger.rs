use tracing::Subscriber;
use tracing_appender::{non_blocking, non_blocking::WorkerGuard, rolling};
use tracing_subscriber::{fmt, layer::SubscriberExt, registry::LookupSpan, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "voltline-backend";

type BoxedLayer<S> = Box<dyn Layer<S> + Send + Sync>;

/// Where file logs go and how verbose they are.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub dir: String,
    pub file_level: String,
    pub error_file_level: String,
}

impl LogSettings {
    /// LOG_DIR (default `logs`), FILE_LOG_LEVEL (default `debug`),
    /// ERROR_FILE_LOG_LEVEL (default `error`).
    pub fn from_env() -> Self {
        let var = |key: &str, default: &str| std::env::var(key).unwrap_or_else(|_| default.to_string());
        LogSettings {
            dir: var("LOG_DIR", "logs"),
            file_level: var("FILE_LOG_LEVEL", "debug"),
            error_file_level: var("ERROR_FILE_LOG_LEVEL", "error"),
        }
    }
}

/// A plain-text and a JSON daily-rolling file in `dir`, both filtered at `level`.
fn rolling_file_layers<S>(dir: &str, name: &str, level: &str, guards: &mut Vec<WorkerGuard>) -> Vec<BoxedLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    let (text, text_guard) = non_blocking(rolling::daily(dir, format!("{}.log", name)));
    let (json, json_guard) = non_blocking(rolling::daily(dir, format!("{}.json", name)));
    guards.push(text_guard);
    guards.push(json_guard);

    vec![
        fmt::layer()
            .with_writer(text)
            .with_ansi(false)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new(level))
            .boxed(),
        fmt::layer()
            .json()
            .with_writer(json)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_filter(EnvFilter::new(level))
            .boxed(),
    ]
}

pub struct Logger {
    /// Dropping a guard stops its background writer.
    pub guards: Vec<WorkerGuard>,
}

impl Logger {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_settings(LogSettings::from_env())
    }

    /// Pretty console output plus rolling files, with errors duplicated into
    /// `<dir>/error`.
    pub fn with_settings(settings: LogSettings) -> Result<Self, Box<dyn std::error::Error>> {
        let error_dir = format!("{}/error", settings.dir);
        std::fs::create_dir_all(&error_dir)?;

        let console_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info,voltline_backend=debug"));

        let mut guards = Vec::with_capacity(4);
        let general = rolling_file_layers(&settings.dir, LOG_FILE_PREFIX, &settings.file_level, &mut guards);
        let errors = rolling_file_layers(
            &error_dir,
            &format!("{}-error", LOG_FILE_PREFIX),
            &settings.error_file_level,
            &mut guards,
        );

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_ansi(true)
                    .with_filter(console_filter),
            )
            .with(general)
            .with(errors)
            .try_init()?;

        Ok(Logger { guards })
    }
}
