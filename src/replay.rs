//! Scripted measurement sessions.
//!
//! A script names a provider and lists steps: mode switches, deletions,
//! renames and pointer events. Each event point is converted to the
//! provider's native type and fed through its [`InputNormalizer`], the same
//! path a live SDK callback takes.
//!
//! # Example TOML
//! ```toml
//! provider = "google"
//!
//! [[steps]]
//! activate = "distance"
//!
//! [[steps]]
//! event = "left-click"
//! point = { lat = 10.0, lng = 20.0 }
//!
//! [[steps]]
//! event = "left-click"
//! point = { lat = 10.0, lng = 20.1 }
//! at_ms = 150
//! ```

use crate::config::Config;
use crate::coord::{self, CoordinateForm, NativeCoord};
use crate::draw::Scene;
use crate::input::{Channel, InputNormalizer, MouseButton, RawPointerEvent, ScreenPoint};
use crate::interaction::{FixedLabel, ProviderSession};
use crate::measure::MeasureKind;
use crate::pool::{MeasurementPool, RecordView, SharedPool};
use crate::provider::{CesiumGlobe, GoogleMaps, LeafletMap, ProviderAdapter, ProviderKind};
use anyhow::{Context, Result, anyhow};
use log::{debug, info, warn};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

/// A replayable session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Script {
    pub provider: ProviderKind,
    /// Overrides the provider's default name in records
    #[serde(default)]
    pub provider_name: Option<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// One script step. Measurements are addressed by their label index.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Step {
    Activate {
        activate: MeasureKind,
    },
    Deactivate {
        deactivate: bool,
    },
    Delete {
        delete: u32,
    },
    Rename {
        rename: u32,
        label: String,
    },
    Event {
        event: String,
        point: NativeCoord,
        #[serde(default)]
        screen: Option<[f64; 2]>,
        /// Milliseconds since the script started; defaults to 1 ms after
        /// the previous event
        #[serde(default)]
        at_ms: Option<u64>,
    },
}

impl Script {
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).context("Failed to parse replay script")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_toml(&source).with_context(|| format!("Invalid script {}", path.display()))
    }

    fn provider_name(&self) -> String {
        self.provider_name
            .clone()
            .unwrap_or_else(|| self.provider.default_name().to_string())
    }
}

/// Replays `script` against a fresh pool and returns the final records.
pub fn run(script: &Script, config: &Config, form: CoordinateForm) -> Result<Vec<RecordView>> {
    let pool = MeasurementPool::shared();
    match script.provider {
        ProviderKind::Google => replay(GoogleMaps, script, config, &pool)?,
        ProviderKind::Cesium => replay(CesiumGlobe, script, config, &pool)?,
        ProviderKind::Leaflet => replay(LeafletMap, script, config, &pool)?,
    }

    let views = pool.borrow().list(form);
    info!("Replay finished with {} measurements", views.len());
    Ok(views)
}

fn replay<A: ProviderAdapter + Clone>(
    adapter: A,
    script: &Script,
    config: &Config,
    pool: &SharedPool,
) -> Result<()> {
    let mut session = ProviderSession::named(
        script.provider,
        script.provider_name(),
        pool.clone(),
        Scene::new(adapter.clone()),
        config,
    );
    let normalizer = InputNormalizer::new(adapter.clone());
    let start = Instant::now();
    let mut clock_ms = 0;

    for (index, step) in script.steps.iter().enumerate() {
        let number = index + 1;
        match step {
            Step::Activate { activate } => session.activate(*activate),
            Step::Deactivate { deactivate } => {
                if *deactivate {
                    session.deactivate();
                }
            }
            Step::Delete { delete } => {
                let id = id_for_label(pool, *delete).with_context(|| format!("step {number}"))?;
                session
                    .delete(id)
                    .with_context(|| format!("step {number}: delete #{delete}"))?;
            }
            Step::Rename { rename, label } => {
                let id = id_for_label(pool, *rename).with_context(|| format!("step {number}"))?;
                let editor = FixedLabel(Some(label.clone()));
                futures::executor::block_on(session.rename_label(id, &editor))
                    .with_context(|| format!("step {number}: rename #{rename}"))?;
            }
            Step::Event {
                event,
                point,
                screen,
                at_ms,
            } => {
                let channel: Channel = event
                    .parse()
                    .map_err(|err: String| anyhow!(err))
                    .with_context(|| format!("step {number}"))?;
                clock_ms = at_ms.unwrap_or(clock_ms + 1);

                let coordinate = match coord::normalize(*point) {
                    Ok(coordinate) => coordinate,
                    Err(err) => {
                        warn!("Step {number}: {err}; event dropped");
                        continue;
                    }
                };
                let [x, y] = screen.unwrap_or_default();
                let raw = RawPointerEvent {
                    channel,
                    native: adapter.to_native(&coordinate),
                    screen: ScreenPoint::new(x, y),
                    button: button_for(channel),
                    at: start + Duration::from_millis(clock_ms),
                };
                debug!("Step {number}: {channel:?} at {clock_ms} ms");
                session.handle_raw(&normalizer, &raw);
            }
        }
    }
    Ok(())
}

fn button_for(channel: Channel) -> Option<MouseButton> {
    match channel {
        Channel::LeftClick | Channel::DoubleClick | Channel::DragStart | Channel::MouseUp => {
            Some(MouseButton::Left)
        }
        Channel::RightClick => Some(MouseButton::Right),
        Channel::MouseMove => None,
    }
}

fn id_for_label(pool: &SharedPool, label_index: u32) -> Result<u64> {
    pool.borrow()
        .records()
        .iter()
        .find(|r| r.label_index == label_index)
        .map(|r| r.id)
        .ok_or_else(|| anyhow!("no measurement labelled #{label_index}"))
}
