use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use tracing::{Level, Subscriber};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{Registry, reload};

/// Level used until the config has been read.
pub const STARTUP_LEVEL: &str = "info";

/// Log file under the data dir. The terminal belongs to the UI, so nothing is
/// written to stdout or stderr while it runs.
pub fn log_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fasttype")
        .join("fasttype.log")
}

pub fn parse_level(level: &str) -> Level {
    level.parse().unwrap_or(Level::INFO)
}

/// Changes the level of an installed subscriber.
pub struct LevelHandle(reload::Handle<LevelFilter, Registry>);

impl LevelHandle {
    pub fn set_level(&self, level: &str) -> Result<()> {
        let filter = LevelFilter::from_level(parse_level(level));
        self.0
            .modify(|current| *current = filter)
            .map_err(|e| anyhow!("failed to change log level: {e}"))
    }
}

fn subscriber<W>(
    writer: W,
    level: &str,
) -> (impl Subscriber + Send + Sync + use<W>, LevelHandle)
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let (filter, handle) = reload::Layer::new(LevelFilter::from_level(parse_level(level)));
    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_ansi(false)
            .with_target(false)
            .with_writer(writer),
    );
    (subscriber, LevelHandle(handle))
}

/// Install the global subscriber, appending to `path`. The returned handle
/// applies the configured level once the config is known.
pub fn init(path: &Path, level: &str) -> Result<LevelHandle> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let (subscriber, handle) = subscriber(Mutex::new(file), level);
    subscriber
        .try_init()
        .map_err(|e| anyhow!("failed to install logger: {e}"))?;
    Ok(handle)
}
