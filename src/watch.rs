//! Rebuild when the input archive changes.

use std::fs;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant, SystemTime};

use log::{error, info, warn};

use crate::config::BuildConfig;
use crate::pipeline;

/// How long the archive must stay unchanged before a rebuild starts.
pub const STABILITY_WINDOW: Duration = Duration::from_secs(2);

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Identity of the file on disk; a change in either field is a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stamp {
    pub modified: Option<SystemTime>,
    pub len: u64,
}

impl Stamp {
    pub fn of(path: &Path) -> Option<Stamp> {
        let meta = fs::metadata(path).ok()?;
        Some(Stamp {
            modified: meta.modified().ok(),
            len: meta.len(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
    /// Something changed; waiting for it to settle.
    Changed,
    Removed,
    /// Stable for the whole window and not built yet.
    Rebuild,
}

/// Debounce state for one watched file.
///
/// An archive already present at start-up counts as new and is built once it
/// is stable.
#[derive(Debug)]
pub struct WatchState {
    window: Duration,
    seen: Option<Stamp>,
    changed_at: Option<Instant>,
    built: Option<Stamp>,
}

impl WatchState {
    pub fn new(window: Duration) -> Self {
        WatchState {
            window,
            seen: None,
            changed_at: None,
            built: None,
        }
    }

    /// Feed one observation taken at `now`.
    pub fn observe(&mut self, stamp: Option<Stamp>, now: Instant) -> Option<WatchEvent> {
        if stamp != self.seen {
            let was_present = self.seen.is_some();
            self.seen = stamp;
            return match stamp {
                Some(_) => {
                    self.changed_at = Some(now);
                    Some(WatchEvent::Changed)
                }
                None => {
                    self.changed_at = None;
                    self.built = None;
                    was_present.then_some(WatchEvent::Removed)
                }
            };
        }

        let settled = self
            .changed_at
            .is_some_and(|at| now.saturating_duration_since(at) >= self.window);
        if settled && self.seen.is_some() && self.seen != self.built {
            self.built = self.seen;
            self.changed_at = None;
            return Some(WatchEvent::Rebuild);
        }
        None
    }
}

/// Poll `config.input` forever, rebuilding after every settled change.
///
/// Build failures are logged; watching continues.
pub fn watch(config: &BuildConfig, interval: Duration) -> anyhow::Result<()> {
    let input_dir = config.input_dir();
    if !input_dir.exists() {
        info!("Input directory not found, creating {}", input_dir.display());
        fs::create_dir_all(input_dir)?;
    }

    info!("Watching for changes to {}", config.input.display());
    let mut state = WatchState::new(STABILITY_WINDOW);

    loop {
        match state.observe(Stamp::of(&config.input), Instant::now()) {
            Some(WatchEvent::Changed) => info!("{} changed", config.input.display()),
            Some(WatchEvent::Removed) => warn!("{} removed", config.input.display()),
            Some(WatchEvent::Rebuild) => {
                info!("Starting build");
                match pipeline::build(config) {
                    Ok(report) => info!("Build finished with {} icons", report.total_icons),
                    Err(err) => error!("Build failed: {err:#}"),
                }
            }
            None => {}
        }
        thread::sleep(interval);
    }
}
