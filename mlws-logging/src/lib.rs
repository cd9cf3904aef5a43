//! Tracing subscriber setup for the mlws binary.
//!
//! Everything is driven by environment variables so the library crates only
//! ever talk to `tracing` macros:
//!
//! - `MLWS_LOG_LEVEL` (`warn`), overridden by `RUST_LOG` when set
//! - `MLWS_LOG_OUTPUT`: `console`, `file`, `both` or `none` (`console`)
//! - `MLWS_LOG_FORMAT`: `human` or `json` (`human`)
//! - `MLWS_LOG_TAGS`: `key:value,...` span field filters, `*` matches any value
//! - `MLWS_LOG_FILE_PATH`: daily-rolled log file (`<tmp>/mlws.log`)

use std::{
    collections::HashMap,
    env,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::{field::Visit, span, Metadata, Subscriber};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    fmt::MakeWriter,
    layer::{Context, Layer},
    prelude::*,
    registry, EnvFilter,
};

// --- Custom "Tee" Writer ---
struct Tee<A, B> {
    a: A,
    b: B,
}

impl<A, B> Write for Tee<A, B>
where
    A: Write,
    B: Write,
{
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let res_a = self.a.write(buf);
        let res_b = self.b.write(buf);
        res_a.or(res_b)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.a.flush()?;
        self.b.flush()
    }
}

#[derive(Clone)]
struct MakeTee<A, B> {
    make_a: A,
    make_b: B,
}

impl<'a, A, B, W1, W2> MakeWriter<'a> for MakeTee<A, B>
where
    A: MakeWriter<'a, Writer = W1>,
    B: MakeWriter<'a, Writer = W2>,
    W1: Write + 'a,
    W2: Write + 'a,
{
    type Writer = Tee<W1, W2>;
    fn make_writer(&'a self) -> Self::Writer {
        Tee {
            a: self.make_a.make_writer(),
            b: self.make_b.make_writer(),
        }
    }
}

// --- Tag-Based Filtering Logic ---
#[derive(Clone, Debug, PartialEq, Eq)]
struct Tag {
    key: String,
    value: String,
}

fn parse_tags(raw: &str) -> Vec<Tag> {
    raw.split(',')
        .filter_map(|s| {
            let mut parts = s.splitn(2, ':');
            let key = parts.next()?.trim().to_string();
            let value = parts.next()?.trim().to_string();
            if key.is_empty() {
                return None;
            }
            Some(Tag { key, value })
        })
        .collect()
}

struct TagFilterLayer {
    filters: Vec<Tag>,
}

impl<S> Layer<S> for TagFilterLayer
where
    S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &span::Attributes<'_>, id: &span::Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut fields = HashMap::new();
        let mut visitor = FieldVisitor(&mut fields);
        attrs.record(&mut visitor);
        span.extensions_mut().insert(fields);
    }

    fn enabled(&self, _meta: &Metadata<'_>, ctx: Context<'_, S>) -> bool {
        if self.filters.is_empty() {
            return true;
        }

        let scope = match ctx.current_span().id().and_then(|id| ctx.span_scope(id)) {
            Some(scope) => scope,
            None => return false, // With tags set, events outside a span are dropped.
        };

        let mut all_fields = HashMap::new();
        for span_ref in scope {
            if let Some(fields) = span_ref.extensions().get::<HashMap<String, String>>() {
                for (k, v) in fields {
                    all_fields.entry(k.clone()).or_insert_with(|| v.clone());
                }
            }
        }

        self.filters.iter().all(|filter| {
            all_fields
                .get(&filter.key)
                .is_some_and(|value| filter.value == "*" || value.contains(&filter.value))
        })
    }
}

struct FieldVisitor<'a>(&'a mut HashMap<String, String>);

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0
            .insert(field.name().to_string(), format!("{value:?}"));
    }
}

fn build_env_filter(log_level: &str) -> EnvFilter {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    for directive in ["duct=warn", "dialoguer=warn"] {
        if let Ok(parsed) = directive.parse() {
            filter = filter.add_directive(parsed);
        }
    }
    filter
}

fn default_log_file() -> PathBuf {
    env::temp_dir().join("mlws.log")
}

/// Initializes the global tracing subscriber based on environment variables.
///
/// Returns the file writer guard when file output is enabled; keep it alive
/// for the whole run or buffered lines are lost.
pub fn init_subscriber() -> Option<WorkerGuard> {
    let log_level = env::var("MLWS_LOG_LEVEL").unwrap_or_else(|_| "warn".to_string());
    let log_output = env::var("MLWS_LOG_OUTPUT").unwrap_or_else(|_| "console".to_string());
    let log_format = env::var("MLWS_LOG_FORMAT").unwrap_or_else(|_| "human".to_string());
    let log_tags = env::var("MLWS_LOG_TAGS").unwrap_or_default();
    let log_file_path = env::var("MLWS_LOG_FILE_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| default_log_file());

    let tag_filter_layer = TagFilterLayer {
        filters: parse_tags(&log_tags),
    };

    let use_console = log_output == "console" || log_output == "both";
    let use_file = log_output == "file" || log_output == "both";
    let is_json = log_format == "json";

    let mut guard: Option<WorkerGuard> = None;

    let subscriber = registry()
        .with(build_env_filter(&log_level))
        .with(tag_filter_layer);

    let log_dir = log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(env::temp_dir);
    let log_filename = log_file_path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "mlws.log".into());

    // try_init: a second call (tests, embedding) must not panic.
    if use_console && use_file {
        let file_appender = tracing_appender::rolling::daily(&log_dir, &log_filename);
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let tee_writer = MakeTee {
            make_a: std::io::stderr,
            make_b: non_blocking,
        };

        let fmt_layer = tracing_subscriber::fmt::layer().with_writer(tee_writer);
        if is_json {
            let _ = subscriber.with(fmt_layer.json()).try_init();
        } else {
            let _ = subscriber.with(fmt_layer.compact()).try_init();
        }
    } else if use_console {
        let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        if is_json {
            let _ = subscriber.with(fmt_layer.json()).try_init();
        } else {
            let _ = subscriber.with(fmt_layer.compact()).try_init();
        }
    } else if use_file {
        let file_appender = tracing_appender::rolling::daily(&log_dir, &log_filename);
        let (non_blocking, file_guard) = tracing_appender::non_blocking(file_appender);
        guard = Some(file_guard);

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(non_blocking);
        if is_json {
            let _ = subscriber.with(fmt_layer.json()).try_init();
        } else {
            let _ = subscriber.with(fmt_layer).try_init();
        }
    } else {
        let _ = subscriber.try_init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_skips_malformed_entries() {
        let tags = parse_tags("command:create, bogus ,resource:*,:empty");
        assert_eq!(
            tags,
            vec![
                Tag {
                    key: "command".into(),
                    value: "create".into()
                },
                Tag {
                    key: "resource".into(),
                    value: "*".into()
                },
            ]
        );
    }

    #[test]
    fn test_parse_tags_empty_input() {
        assert!(parse_tags("").is_empty());
    }
}
