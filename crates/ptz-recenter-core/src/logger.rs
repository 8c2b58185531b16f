//! Stderr logger and optional tracing subscriber.
//!
//! Lines look like `[  0.012s  INFO ptz_recenter_blobs::detector] message`.
//! Records from the `ptz_recenter*` crates pass at the configured level;
//! anything else (codec crates, clap) is held to `warn` so `debug` runs
//! stay readable.

use std::io::Write;
use std::str::FromStr;
use std::sync::OnceLock;
use std::time::Instant;

use log::{Level, LevelFilter, Log, Metadata, Record};

#[cfg(feature = "tracing")]
use tracing_subscriber::fmt::format::FmtSpan;
#[cfg(feature = "tracing")]
use tracing_subscriber::util::SubscriberInitExt;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, EnvFilter};

use crate::RecenterError;

const OWN_TARGET_PREFIX: &str = "ptz_recenter";
const FOREIGN_MAX_LEVEL: Level = Level::Warn;

struct RecenterLogger {
    level: LevelFilter,
    started: Instant,
}

impl RecenterLogger {
    fn threshold(&self, target: &str) -> LevelFilter {
        if target.starts_with(OWN_TARGET_PREFIX) {
            self.level
        } else {
            self.level.min(FOREIGN_MAX_LEVEL.to_level_filter())
        }
    }
}

impl Log for RecenterLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.threshold(metadata.target())
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!(
            "[{:7.3}s {:>5} {}] {}\n",
            self.started.elapsed().as_secs_f64(),
            record.level(),
            record.target(),
            record.args()
        );
        // One write per record keeps lines from concurrent detections whole.
        let _ = std::io::stderr().lock().write_all(line.as_bytes());
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

static LOGGER: OnceLock<RecenterLogger> = OnceLock::new();

/// Install the stderr logger at `level`; later calls keep the first level.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_some() {
        return Ok(());
    }
    let logger = LOGGER.get_or_init(|| RecenterLogger {
        level,
        started: Instant::now(),
    });
    log::set_logger(logger)?;
    log::set_max_level(level);
    Ok(())
}

/// Parse `off|error|warn|info|debug|trace` (case-insensitive).
pub fn parse_level_filter(name: &str) -> Result<LevelFilter, RecenterError> {
    LevelFilter::from_str(name.trim())
        .map_err(|_| RecenterError::config(format!("unknown log level '{name}'")))
}

/// Install a `tracing-subscriber` fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `default_level` applies to the
/// `ptz_recenter*` crates and `warn` to everything else. Span close events
/// carry the timings of the labeler and detector spans.
#[cfg(feature = "tracing")]
pub fn init_tracing(json: bool, default_level: LevelFilter) {
    let directive = format!(
        "warn,ptz_recenter={lvl},ptz_recenter_core={lvl},ptz_recenter_blobs={lvl}",
        lvl = default_level.to_string().to_ascii_lowercase()
    );
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let builder = fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_writer(std::io::stderr);
    let _ = if json {
        builder.json().flatten_event(true).finish().try_init()
    } else {
        builder
            .with_timer(fmt::time::Uptime::default())
            .finish()
            .try_init()
    };
}
