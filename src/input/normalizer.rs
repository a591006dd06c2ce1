//! Turns provider-native pointer events into [`NormalizedEvent`]s.

use super::events::{Channel, DomEvent, MouseButton, NormalizedEvent, ScreenPoint};
use crate::coord::{self, NativeCoord};
use crate::error::MeasureError;
use crate::provider::ProviderAdapter;
use log::debug;
use std::time::Instant;

/// A pointer event as a provider SDK reports it.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPointerEvent<N> {
    pub channel: Channel,
    /// Map position in the provider's native point type
    pub native: N,
    pub screen: ScreenPoint,
    pub button: Option<MouseButton>,
    pub at: Instant,
}

/// Builds a normalized event from any supported coordinate shape.
pub fn normalize_event(
    native: NativeCoord,
    screen: ScreenPoint,
    button: Option<MouseButton>,
    at: Instant,
) -> Result<NormalizedEvent, MeasureError> {
    Ok(NormalizedEvent {
        dom_event: DomEvent { button, at },
        map_point: coord::normalize(native)?,
        screen_point: screen,
    })
}

/// Per-provider input adapter.
#[derive(Debug, Clone, Default)]
pub struct InputNormalizer<A: ProviderAdapter> {
    adapter: A,
}

impl<A: ProviderAdapter> InputNormalizer<A> {
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    /// Normalizes a raw event. Events without a usable coordinate are dropped.
    pub fn normalize(&self, raw: &RawPointerEvent<A::Native>) -> Option<(Channel, NormalizedEvent)> {
        match normalize_event(
            self.adapter.from_native(&raw.native),
            raw.screen,
            raw.button,
            raw.at,
        ) {
            Ok(event) => Some((raw.channel, event)),
            Err(err) => {
                debug!(
                    "Ignoring {:?} on {}: {err}",
                    raw.channel,
                    self.adapter.kind()
                );
                None
            }
        }
    }
}
