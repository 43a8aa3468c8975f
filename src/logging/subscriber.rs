//! Tracing subscriber setup: console formatter and filter initialisation.
use std::fmt::Write as _;

use tracing_subscriber::EnvFilter;

/// Environment variable holding an [`EnvFilter`] directive.
pub const LOG_ENV: &str = "INIMAP_LOG";

/// Collects the `message` field and any extra fields of a [`tracing::Event`].
#[derive(Default)]
struct FieldCollector {
    message: String,
    extra: String,
}

impl FieldCollector {
    fn push_extra(&mut self, name: &str, value: &dyn std::fmt::Display) {
        write!(self.extra, " {name}={value}").ok();
    }
}

impl tracing::field::Visit for FieldCollector {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        } else {
            self.push_extra(field.name(), &format_args!("{value:?}"));
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_extra(field.name(), &value);
        }
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] producing compact console
/// lines: colored `ERROR` / `WARN` prefixes, plain info output, dimmed
/// debug output tagged with the emitting module.
struct ConsoleFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for ConsoleFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let level = *metadata.level();
        let target = metadata.target();

        let mut fields = FieldCollector::default();
        event.record(&mut fields);
        let msg = format!("{}{}", fields.message, fields.extra);

        let ansi = writer.has_ansi_escapes();
        match level {
            tracing::Level::ERROR if ansi => writeln!(writer, "\x1b[31mERROR\x1b[0m {msg}"),
            tracing::Level::ERROR => writeln!(writer, "ERROR {msg}"),
            tracing::Level::WARN if ansi => writeln!(writer, "\x1b[33mWARN\x1b[0m  {msg}"),
            tracing::Level::WARN => writeln!(writer, "WARN  {msg}"),
            tracing::Level::INFO => writeln!(writer, "{msg}"),
            _ if ansi => writeln!(writer, "\x1b[2m{target}: {msg}\x1b[0m"),
            _ => writeln!(writer, "{target}: {msg}"),
        }
    }
}

/// Build the console filter.
///
/// A valid `directive` (normally the value of [`LOG_ENV`]) wins; otherwise
/// `verbose` selects `debug` over `info`.
fn console_filter(verbose: bool, directive: Option<&str>) -> EnvFilter {
    let fallback = if verbose { "debug" } else { "info" };
    directive
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(fallback))
}

/// Initialise the global [`tracing`] subscriber.
///
/// Warnings and errors go to stderr, everything else to stdout. Must be
/// called once at program startup, before any logging.
pub fn init_subscriber(verbose: bool) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        Layer as _, fmt, layer::SubscriberExt as _, util::SubscriberInitExt as _,
    };

    let directive = std::env::var(LOG_ENV).ok();
    let filter = console_filter(verbose, directive.as_deref());

    let make_writer = std::io::stderr
        .with_max_level(tracing::Level::WARN)
        .and(std::io::stdout.with_min_level(tracing::Level::INFO));

    let console_layer = fmt::layer()
        .event_format(ConsoleFormatter)
        .with_writer(make_writer)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}
