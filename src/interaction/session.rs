//! One provider's measurement surface: its collaborator plus a mode per kind.

use super::label::LabelEditor;
use super::mode::{InteractionSettings, MeasureMode};
use crate::config::Config;
use crate::draw::{DrawingCollaborator, StyleSet};
use crate::error::MeasureError;
use crate::input::{Channel, InputNormalizer, NormalizedEvent, RawPointerEvent};
use crate::measure::{MeasureKind, MeasurementRecord};
use crate::pool::SharedPool;
use crate::provider::{ProviderAdapter, ProviderKind};
use log::{info, trace};

/// Owns the drawing collaborator and routes events to the active mode.
///
/// At most one mode is active; activating another discards the previous
/// mode's unfinished work.
#[derive(Debug)]
pub struct ProviderSession<D: DrawingCollaborator> {
    provider_name: String,
    pool: SharedPool,
    drawer: D,
    modes: [MeasureMode; 3],
    active: Option<MeasureKind>,
}

fn slot(kind: MeasureKind) -> usize {
    match kind {
        MeasureKind::PointInfo => 0,
        MeasureKind::Distance => 1,
        MeasureKind::Area => 2,
    }
}

impl<D: DrawingCollaborator> ProviderSession<D> {
    pub fn new(
        provider_name: impl Into<String>,
        pool: SharedPool,
        drawer: D,
        settings: InteractionSettings,
        styles: StyleSet,
    ) -> Self {
        let provider_name = provider_name.into();
        let modes = MeasureKind::ALL.map(|kind| {
            MeasureMode::new(
                kind,
                provider_name.clone(),
                pool.clone(),
                settings,
                styles.clone(),
            )
        });
        Self {
            provider_name,
            pool,
            drawer,
            modes,
            active: None,
        }
    }

    /// Session for `provider` under its default name, configured from `config`.
    ///
    /// Vertex matching uses the looser of the configured epsilon and the
    /// provider's native round-trip tolerance.
    pub fn for_provider(provider: ProviderKind, pool: SharedPool, drawer: D, config: &Config) -> Self {
        Self::named(provider, provider.default_name(), pool, drawer, config)
    }

    /// Like [`for_provider`](Self::for_provider) with an explicit provider name.
    pub fn named(
        provider: ProviderKind,
        provider_name: impl Into<String>,
        pool: SharedPool,
        drawer: D,
        config: &Config,
    ) -> Self {
        let epsilon = config
            .interaction
            .coordinate_epsilon
            .max(provider.equality_epsilon());
        let settings = InteractionSettings::from_config(&config.interaction).with_epsilon(epsilon);
        Self::new(
            provider_name,
            pool,
            drawer,
            settings,
            StyleSet::from_config(&config.style),
        )
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn pool(&self) -> &SharedPool {
        &self.pool
    }

    pub fn drawer(&self) -> &D {
        &self.drawer
    }

    pub fn active_kind(&self) -> Option<MeasureKind> {
        self.active
    }

    pub fn mode(&self, kind: MeasureKind) -> &MeasureMode {
        &self.modes[slot(kind)]
    }

    /// Makes `kind` the active mode.
    pub fn activate(&mut self, kind: MeasureKind) {
        if self.active == Some(kind) {
            return;
        }
        self.deactivate();
        self.modes[slot(kind)].activate();
        self.active = Some(kind);
        info!("{} measuring {}", self.provider_name, kind);
    }

    /// Deactivates the active mode, if any.
    pub fn deactivate(&mut self) {
        if let Some(kind) = self.active.take() {
            self.modes[slot(kind)].deactivate(&mut self.drawer);
        }
    }

    /// Delivers a normalized event to the active mode.
    pub fn handle(&mut self, channel: Channel, event: &NormalizedEvent) {
        let Some(kind) = self.active else {
            trace!("No active mode on {}; dropping {:?}", self.provider_name, channel);
            return;
        };
        self.modes[slot(kind)].handle_event(channel, event, &mut self.drawer);
    }

    /// Normalizes a provider-native event and delivers it.
    pub fn handle_raw<A: ProviderAdapter>(
        &mut self,
        normalizer: &InputNormalizer<A>,
        raw: &RawPointerEvent<A::Native>,
    ) {
        if let Some((channel, event)) = normalizer.normalize(raw) {
            self.handle(channel, &event);
        }
    }

    /// Deletes one of this provider's measurements with its graphics.
    pub fn delete(&mut self, id: u64) -> Result<MeasurementRecord, MeasureError> {
        let kind = self.owned_kind(id)?;
        self.modes[slot(kind)].delete_measurement(id, &mut self.drawer)
    }

    /// Renames the label of one of this provider's measurements.
    pub async fn rename_label(
        &mut self,
        id: u64,
        editor: &dyn LabelEditor,
    ) -> Result<bool, MeasureError> {
        let kind = self.owned_kind(id)?;
        self.modes[slot(kind)]
            .rename_label(id, editor, &mut self.drawer)
            .await
    }

    /// Ends the session: drops unfinished work, removes every graphic and
    /// every record this provider owns. Returns how many records went.
    pub fn teardown(&mut self) -> usize {
        self.deactivate();
        for mode in &mut self.modes {
            mode.discard_graphics(&mut self.drawer);
        }
        let removed = self.pool.borrow_mut().remove_by_provider(&self.provider_name);
        info!(
            "Tore down {} session, removed {removed} measurements",
            self.provider_name
        );
        removed
    }

    fn owned_kind(&self, id: u64) -> Result<MeasureKind, MeasureError> {
        let pool = self.pool.borrow();
        match pool.find_by_id(id) {
            Some(record) if record.provider_name == self.provider_name => Ok(record.kind),
            Some(record) => Err(MeasureError::RecordNotFound(format!(
                "id {id} belongs to {}",
                record.provider_name
            ))),
            None => Err(MeasureError::RecordNotFound(format!("id {id}"))),
        }
    }
}
