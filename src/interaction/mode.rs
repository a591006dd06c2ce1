//! Measure mode state and the graphic bookkeeping shared by its handlers.

use super::drag::DragCoordinator;
use crate::config::InteractionConfig;
use crate::coord::Coordinate;
use crate::draw::{DrawingCollaborator, GraphicHandle, GraphicKind, HandleId, StyleSet};
use crate::error::MeasureError;
use crate::input::{Channel, NormalizedEvent};
use crate::measure::{LabelContent, MeasureKind, MeasurementRecord, RecordStatus};
use crate::pool::SharedPool;
use log::{debug, trace, warn};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

/// Collection state of a measure mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeState {
    /// Waiting for the first click
    Idle,
    /// At least one point committed, more needed
    Collecting,
    /// Pointer moving between committed clicks; preview graphics live
    Previewing,
    /// Last measurement finalized; the next click starts a new one
    Completed,
}

/// Tunables for click/drag disambiguation and point matching.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InteractionSettings {
    pub drag_threshold_px: f64,
    pub drag_cooldown: Duration,
    /// Degrees within which a pointer position matches a stored vertex
    pub epsilon: f64,
}

impl Default for InteractionSettings {
    fn default() -> Self {
        Self::from_config(&InteractionConfig::default())
    }
}

impl InteractionSettings {
    pub fn from_config(config: &InteractionConfig) -> Self {
        Self {
            drag_threshold_px: config.drag_threshold_px,
            drag_cooldown: config.drag_cooldown(),
            epsilon: config.coordinate_epsilon,
        }
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }
}

/// Graphics drawn for one measurement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeasurementGraphics {
    /// One marker per vertex, index-aligned with the record's coordinates.
    /// `None` where the collaborator failed to draw it.
    pub points: Vec<Option<GraphicHandle>>,
    /// Line (distance) or polygon (area)
    pub shape: Option<GraphicHandle>,
    pub label: Option<GraphicHandle>,
}

/// In-progress measurement: the working copy of its record plus graphics.
#[derive(Debug)]
pub(super) struct Working {
    pub record: MeasurementRecord,
    pub graphics: MeasurementGraphics,
}

/// Measurement state machine for one provider and one [`MeasureKind`].
///
/// Consumes normalized events, drives the drawing collaborator and commits
/// to the shared pool. Graphic calls that fail are logged and skipped; data
/// changes are committed regardless.
#[derive(Debug)]
pub struct MeasureMode {
    pub(super) kind: MeasureKind,
    pub(super) provider_name: String,
    pub(super) settings: InteractionSettings,
    pub(super) styles: StyleSet,
    pub(super) pool: SharedPool,
    pub(super) state: ModeState,
    pub(super) active: bool,
    pub(super) working: Option<Working>,
    /// Moving preview shape and label
    pub(super) preview: MeasurementGraphics,
    /// Graphics of completed records created by this mode, by record id
    pub(super) committed: BTreeMap<u64, MeasurementGraphics>,
    pub(super) drag: DragCoordinator,
    pub(super) last_drag_release: Option<Instant>,
}

impl MeasureMode {
    pub fn new(
        kind: MeasureKind,
        provider_name: impl Into<String>,
        pool: SharedPool,
        settings: InteractionSettings,
        styles: StyleSet,
    ) -> Self {
        Self {
            kind,
            provider_name: provider_name.into(),
            settings,
            styles,
            pool,
            state: ModeState::Idle,
            active: false,
            working: None,
            preview: MeasurementGraphics::default(),
            committed: BTreeMap::new(),
            drag: DragCoordinator::new(settings.drag_threshold_px, settings.epsilon),
            last_drag_release: None,
        }
    }

    pub fn kind(&self) -> MeasureKind {
        self.kind
    }

    pub fn provider_name(&self) -> &str {
        &self.provider_name
    }

    pub fn state(&self) -> ModeState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn drag(&self) -> &DragCoordinator {
        &self.drag
    }

    /// Working copy of the measurement being collected, if any.
    pub fn working_record(&self) -> Option<&MeasurementRecord> {
        self.working.as_ref().map(|w| &w.record)
    }

    /// Graphics drawn for a completed record owned by this mode.
    pub fn graphics(&self, id: u64) -> Option<&MeasurementGraphics> {
        self.committed.get(&id)
    }

    /// Moving preview graphics, present only while previewing.
    pub fn preview_graphics(&self) -> &MeasurementGraphics {
        &self.preview
    }

    /// Starts accepting events.
    pub fn activate(&mut self) {
        if !self.active {
            debug!("Activating {} mode on {}", self.kind, self.provider_name);
        }
        self.active = true;
        self.state = ModeState::Idle;
    }

    /// Stops accepting events, tearing down any gesture in progress.
    ///
    /// An unfinished measurement is discarded, never committed, and a drag is
    /// rolled back to the last committed state.
    pub fn deactivate(&mut self, drawer: &mut dyn DrawingCollaborator) {
        if self.drag.is_engaged() {
            self.abort_drag(drawer);
        }
        self.cancel(drawer);
        self.active = false;
        self.state = ModeState::Idle;
        debug!("Deactivated {} mode on {}", self.kind, self.provider_name);
    }

    /// Routes a normalized event from one of the input channels.
    pub fn handle_event(
        &mut self,
        channel: Channel,
        event: &NormalizedEvent,
        drawer: &mut dyn DrawingCollaborator,
    ) {
        if !self.active {
            trace!("{} mode inactive; ignoring {:?}", self.kind, channel);
            return;
        }

        match channel {
            Channel::LeftClick => self.on_left_click(event, drawer),
            Channel::MouseMove => self.on_mouse_move(event, drawer),
            Channel::RightClick | Channel::DoubleClick => self.on_close(channel, drawer),
            Channel::DragStart => self.on_drag_start(event),
            Channel::MouseUp => self.on_mouse_up(event, drawer),
        }
    }

    /// Removes a completed measurement's graphics and its pool record.
    pub fn delete_measurement(
        &mut self,
        id: u64,
        drawer: &mut dyn DrawingCollaborator,
    ) -> Result<MeasurementRecord, MeasureError> {
        if self.drag.dragging_record() == Some(id) {
            self.abort_drag(drawer);
        }
        if self.working.as_ref().is_some_and(|w| w.record.id == id) {
            self.cancel(drawer);
        }
        if let Some(graphics) = self.committed.remove(&id) {
            remove_graphics(drawer, graphics);
        }

        let removed = self.pool.borrow_mut().remove(id);
        removed.ok_or_else(|| MeasureError::RecordNotFound(format!("id {id}")))
    }

    /// Removes every graphic this mode drew without touching the pool.
    pub fn discard_graphics(&mut self, drawer: &mut dyn DrawingCollaborator) {
        let committed = std::mem::take(&mut self.committed);
        for graphics in committed.into_values() {
            remove_graphics(drawer, graphics);
        }
    }

    /// Whether a click at `at` falls inside the post-drag cool-down.
    pub(super) fn in_drag_cooldown(&self, at: Instant) -> bool {
        self.last_drag_release
            .is_some_and(|released| at.saturating_duration_since(released) < self.settings.drag_cooldown)
    }
}

// ============================================================================
// Graphic helpers
// ============================================================================

/// Logs a collaborator failure and turns it into `None`.
pub(super) fn soft<T>(result: Result<T, MeasureError>, what: &str) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("Skipping {what}: {err}");
            None
        }
    }
}

fn shape_kind(kind: MeasureKind, count: usize) -> Option<GraphicKind> {
    match kind {
        MeasureKind::PointInfo => None,
        MeasureKind::Distance if count >= 2 => Some(GraphicKind::Line),
        MeasureKind::Area if count >= 3 => Some(GraphicKind::Polygon),
        MeasureKind::Area if count == 2 => Some(GraphicKind::Line),
        _ => None,
    }
}

pub(super) fn draw_point(
    drawer: &mut dyn DrawingCollaborator,
    styles: &StyleSet,
    coord: &Coordinate,
    status: RecordStatus,
) -> Option<GraphicHandle> {
    let mut handle = soft(drawer.add_point(coord, &styles.point(status)), "point")?;
    handle.status = status;
    Some(handle)
}

fn draw_shape(
    drawer: &mut dyn DrawingCollaborator,
    styles: &StyleSet,
    kind: MeasureKind,
    coords: &[Coordinate],
    status: RecordStatus,
) -> Option<GraphicHandle> {
    let result = match shape_kind(kind, coords.len())? {
        GraphicKind::Polygon => drawer.add_polygon(coords, &styles.polygon(status)),
        _ => drawer.add_line([coords[0], coords[coords.len() - 1]], &styles.line(status)),
    };
    let mut handle = soft(result, "shape")?;
    handle.status = status;
    Some(handle)
}

fn shape_positions(kind: GraphicKind, coords: &[Coordinate]) -> Vec<Coordinate> {
    match (kind, coords) {
        (GraphicKind::Line, [first, .., last]) => vec![*first, *last],
        _ => coords.to_vec(),
    }
}

/// Brings `slot` in line with `coords`, replacing the graphic when the
/// required primitive changes (line to polygon as an area grows).
pub(super) fn sync_shape(
    drawer: &mut dyn DrawingCollaborator,
    styles: &StyleSet,
    slot: &mut Option<GraphicHandle>,
    kind: MeasureKind,
    coords: &[Coordinate],
    status: RecordStatus,
) {
    let wanted = shape_kind(kind, coords.len());
    match (slot.as_mut(), wanted) {
        (Some(handle), Some(wanted)) if handle.kind == wanted => {
            let positions = shape_positions(wanted, coords);
            soft(drawer.update_position(handle, &positions), "shape update");
        }
        _ => {
            if let Some(old) = slot.take() {
                soft(drawer.remove(&old), "shape removal");
            }
            *slot = draw_shape(drawer, styles, kind, coords, status);
        }
    }
}

/// Creates or updates a label showing `content` for the shape through `coords`.
pub(super) fn sync_label(
    drawer: &mut dyn DrawingCollaborator,
    styles: &StyleSet,
    slot: &mut Option<GraphicHandle>,
    coords: &[Coordinate],
    content: &LabelContent,
    status: RecordStatus,
) {
    match slot.as_mut() {
        Some(handle) => {
            soft(drawer.update_position(handle, coords), "label move");
            soft(drawer.update_label(handle, content), "label text");
        }
        None => {
            *slot = soft(
                drawer.add_label(coords, content, &styles.label(status)),
                "label",
            )
            .map(|mut handle| {
                handle.status = status;
                handle
            });
        }
    }
}

/// Moves every graphic of a measurement to `coords`, collecting touched handles.
pub(super) fn reposition(
    drawer: &mut dyn DrawingCollaborator,
    graphics: &mut MeasurementGraphics,
    coords: &[Coordinate],
    content: &LabelContent,
    touched: &mut Vec<HandleId>,
) {
    for (handle, coord) in graphics.points.iter_mut().zip(coords) {
        if let Some(handle) = handle {
            if handle.positions.first() != Some(coord) {
                soft(
                    drawer.update_position(handle, std::slice::from_ref(coord)),
                    "point move",
                );
                touch(touched, handle.id);
            }
        }
    }
    if let Some(shape) = graphics.shape.as_mut() {
        let positions = shape_positions(shape.kind, coords);
        soft(drawer.update_position(shape, &positions), "shape move");
        touch(touched, shape.id);
    }
    if let Some(label) = graphics.label.as_mut() {
        soft(drawer.update_position(label, coords), "label move");
        soft(drawer.update_label(label, content), "label text");
        touch(touched, label.id);
    }
}

/// Restyles every graphic of a measurement for `status`.
pub(super) fn restyle(
    drawer: &mut dyn DrawingCollaborator,
    styles: &StyleSet,
    graphics: &mut MeasurementGraphics,
    status: RecordStatus,
) {
    for handle in graphics.points.iter_mut().flatten() {
        soft(
            drawer.update_style(handle, &styles.point(status), status),
            "point style",
        );
    }
    if let Some(shape) = graphics.shape.as_mut() {
        let style = match shape.kind {
            GraphicKind::Polygon => styles.polygon(status),
            _ => styles.line(status),
        };
        soft(drawer.update_style(shape, &style, status), "shape style");
    }
    if let Some(label) = graphics.label.as_mut() {
        soft(
            drawer.update_style(label, &styles.label(status), status),
            "label style",
        );
    }
}

pub(super) fn remove_graphics(drawer: &mut dyn DrawingCollaborator, graphics: MeasurementGraphics) {
    let handles = graphics
        .points
        .into_iter()
        .flatten()
        .chain(graphics.shape)
        .chain(graphics.label);
    for handle in handles {
        soft(drawer.remove(&handle), "graphic removal");
    }
}

/// Brings a measurement's shape and label in line with its record.
///
/// The label appears once the record has enough points to mean something.
pub(super) fn sync_graphics(
    drawer: &mut dyn DrawingCollaborator,
    styles: &StyleSet,
    graphics: &mut MeasurementGraphics,
    record: &MeasurementRecord,
    status: RecordStatus,
) {
    sync_shape(
        drawer,
        styles,
        &mut graphics.shape,
        record.kind,
        &record.coordinates,
        status,
    );
    if record.coordinates.len() >= record.kind.min_points().min(2) {
        sync_label(
            drawer,
            styles,
            &mut graphics.label,
            &record.coordinates,
            &record.label_content(),
            status,
        );
    }
}

fn touch(touched: &mut Vec<HandleId>, id: HandleId) {
    if !touched.contains(&id) {
        touched.push(id);
    }
}
