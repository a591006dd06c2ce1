//! Dragging committed vertices of completed measurements.
//!
//! A press on a committed point only arms the coordinator. The drag begins
//! once the pointer has travelled `threshold_px` screen pixels; a release
//! before that is an ordinary click. While dragging, the working copy is
//! edited and redrawn but the pool only sees the record flip to `moving` at
//! the start and back to `completed` on release. Only the geometry is written
//! back, so a label edited mid-drag is kept.

use super::mode::{MeasureMode, MeasurementGraphics, ModeState, reposition, restyle};
use crate::coord::Coordinate;
use crate::draw::{DrawingCollaborator, HandleId, StyleSet};
use crate::error::MeasureError;
use crate::input::{NormalizedEvent, ScreenPoint};
use crate::measure::{MeasureKind, MeasurementRecord, RecordStatus};
use crate::pool::{DragEnd, SharedPool};
use log::{debug, info, warn};
use std::collections::BTreeMap;

/// A drag in progress.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    /// Working copy being edited
    pub record: MeasurementRecord,
    /// Index of the vertex under the pointer
    pub vertex: usize,
    /// Record as it was before the drag, restored on abort
    original: MeasurementRecord,
    touched: Vec<HandleId>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragState {
    Inactive,
    /// Button down on a point; not yet past the threshold
    Armed {
        origin: Coordinate,
        screen: ScreenPoint,
    },
    Dragging(DragSession),
}

/// Everything a drag touches outside its own state.
pub(super) struct DragContext<'a> {
    pub pool: &'a SharedPool,
    pub drawer: &'a mut dyn DrawingCollaborator,
    pub committed: &'a mut BTreeMap<u64, MeasurementGraphics>,
    pub styles: &'a StyleSet,
    pub kind: MeasureKind,
    pub provider_name: &'a str,
    /// Owning mode is `Idle` or `Completed`
    pub between_measurements: bool,
}

/// Press/move/release state machine separating drags from clicks.
#[derive(Debug, Clone, PartialEq)]
pub struct DragCoordinator {
    state: DragState,
    threshold_px: f64,
    epsilon: f64,
}

impl DragCoordinator {
    pub fn new(threshold_px: f64, epsilon: f64) -> Self {
        Self {
            state: DragState::Inactive,
            threshold_px,
            epsilon,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Armed or dragging.
    pub fn is_engaged(&self) -> bool {
        !matches!(self.state, DragState::Inactive)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    /// Id of the record being dragged.
    pub fn dragging_record(&self) -> Option<u64> {
        match &self.state {
            DragState::Dragging(session) => Some(session.record.id),
            _ => None,
        }
    }

    /// Arms a drag. Refused while another drag is running.
    pub(super) fn arm(&mut self, origin: Coordinate, screen: ScreenPoint) -> bool {
        if let DragState::Dragging(session) = &self.state {
            warn!(
                "Measurement {} is already moving; ignoring drag start",
                session.record.id
            );
            return false;
        }
        self.state = DragState::Armed { origin, screen };
        true
    }

    /// Drops an armed press that never became a drag. A running drag is kept.
    pub(super) fn disarm(&mut self) {
        if matches!(self.state, DragState::Armed { .. }) {
            self.state = DragState::Inactive;
        }
    }

    /// Feeds a pointer move. Returns `true` if the move belonged to a drag.
    pub(super) fn on_move(&mut self, event: &NormalizedEvent, ctx: &mut DragContext<'_>) -> bool {
        let armed = match &self.state {
            DragState::Inactive => return false,
            DragState::Armed { origin, screen } => Some((*origin, *screen)),
            DragState::Dragging(_) => None,
        };

        if let Some((origin, screen)) = armed {
            if event.screen_point.distance_to(&screen) < self.threshold_px {
                return false;
            }
            match self.begin(origin, ctx) {
                Ok(session) => self.state = DragState::Dragging(session),
                Err(err) => {
                    warn!("Drag aborted: {err}");
                    self.state = DragState::Inactive;
                    return false;
                }
            }
        }

        self.apply(event.map_point, ctx);
        true
    }

    /// Finishes the gesture. Returns the drag-end payload if a drag ran.
    pub(super) fn on_mouse_up(&mut self, ctx: &mut DragContext<'_>) -> Option<DragEnd> {
        let DragState::Dragging(session) = std::mem::replace(&mut self.state, DragState::Inactive)
        else {
            return None;
        };

        let stored = ctx.pool.borrow().find_by_id(session.record.id).cloned();
        let mut record = match stored {
            Some(mut stored) => {
                stored.coordinates = session.record.coordinates;
                stored.recompute();
                stored
            }
            None => {
                warn!(
                    "Measurement {} left the pool during a drag; restoring it",
                    session.record.id
                );
                session.record
            }
        };
        record.status = RecordStatus::Completed;
        if !ctx.pool.borrow_mut().upsert(record.clone()) {
            warn!("Pool rejected dragged measurement {}", record.id);
        }
        if let Some(graphics) = ctx.committed.get_mut(&record.id) {
            let mut touched = Vec::new();
            reposition(
                ctx.drawer,
                graphics,
                &record.coordinates,
                &record.label_content(),
                &mut touched,
            );
            restyle(ctx.drawer, ctx.styles, graphics, RecordStatus::Completed);
        }
        ctx.drawer.set_panning_enabled(true);

        info!(
            "Moved vertex {} of {} measurement {}: {}",
            session.vertex,
            record.kind,
            record.id,
            record.label_content()
        );
        let drag_end = DragEnd {
            record,
            touched_handles: session.touched,
        };
        ctx.pool.borrow_mut().notify_drag_end(drag_end.clone());
        Some(drag_end)
    }

    /// Rolls a drag back to the last committed state.
    pub(super) fn abort(&mut self, ctx: &mut DragContext<'_>) {
        let DragState::Dragging(session) = std::mem::replace(&mut self.state, DragState::Inactive)
        else {
            return;
        };

        let mut original = session.original;
        original.status = RecordStatus::Completed;
        if let Some(stored) = ctx.pool.borrow().find_by_id(original.id) {
            original.label.clone_from(&stored.label);
        }
        if let Some(graphics) = ctx.committed.get_mut(&original.id) {
            let mut touched = Vec::new();
            reposition(
                ctx.drawer,
                graphics,
                &original.coordinates,
                &original.label_content(),
                &mut touched,
            );
            restyle(ctx.drawer, ctx.styles, graphics, RecordStatus::Completed);
        }
        ctx.drawer.set_panning_enabled(true);
        debug!("Drag of measurement {} rolled back", original.id);
        ctx.pool.borrow_mut().upsert(original);
    }

    fn begin(
        &self,
        origin: Coordinate,
        ctx: &mut DragContext<'_>,
    ) -> Result<DragSession, MeasureError> {
        if !ctx.between_measurements {
            return Err(MeasureError::RecordNotFound(format!(
                "{} mode is collecting a measurement",
                ctx.kind
            )));
        }
        let record = ctx
            .pool
            .borrow()
            .find_by_coordinate(&origin, Some(self.epsilon))
            .cloned()
            .ok_or_else(|| {
                MeasureError::RecordNotFound(format!(
                    "no measurement at {:.6}, {:.6}",
                    origin.latitude, origin.longitude
                ))
            })?;

        if record.kind != ctx.kind
            || record.provider_name != ctx.provider_name
            || !ctx.committed.contains_key(&record.id)
        {
            return Err(MeasureError::RecordNotFound(format!(
                "measurement {} is not a {} on {}",
                record.id, ctx.kind, ctx.provider_name
            )));
        }
        if record.status != RecordStatus::Completed {
            return Err(MeasureError::RecordNotFound(format!(
                "measurement {} is {:?}, not completed",
                record.id, record.status
            )));
        }
        let vertex = record
            .vertex_index(&origin, Some(self.epsilon))
            .ok_or_else(|| MeasureError::RecordNotFound(format!("vertex of {}", record.id)))?;

        let original = record.clone();
        let mut moving = record;
        moving.status = RecordStatus::Moving;
        if ctx.pool.borrow_mut().update(moving.id, moving.clone()).is_none() {
            return Err(MeasureError::RecordNotFound(format!("id {}", moving.id)));
        }
        ctx.drawer.set_panning_enabled(false);
        if let Some(graphics) = ctx.committed.get_mut(&moving.id) {
            restyle(ctx.drawer, ctx.styles, graphics, RecordStatus::Moving);
        }

        debug!("Dragging vertex {vertex} of measurement {}", moving.id);
        Ok(DragSession {
            record: moving,
            vertex,
            original,
            touched: Vec::new(),
        })
    }

    fn apply(&mut self, point: Coordinate, ctx: &mut DragContext<'_>) {
        let DragState::Dragging(session) = &mut self.state else {
            return;
        };
        let Some(slot) = session.record.coordinates.get_mut(session.vertex) else {
            return;
        };
        *slot = point;
        session.record.recompute();
        if let Some(stored) = ctx.pool.borrow().find_by_id(session.record.id) {
            session.record.label.clone_from(&stored.label);
        }

        if let Some(graphics) = ctx.committed.get_mut(&session.record.id) {
            reposition(
                ctx.drawer,
                graphics,
                &session.record.coordinates,
                &session.record.label_content(),
                &mut session.touched,
            );
        }
    }
}

impl MeasureMode {
    fn drag_context<'a>(
        &'a mut self,
        drawer: &'a mut dyn DrawingCollaborator,
    ) -> (&'a mut DragCoordinator, DragContext<'a>) {
        (
            &mut self.drag,
            DragContext {
                pool: &self.pool,
                drawer,
                committed: &mut self.committed,
                styles: &self.styles,
                kind: self.kind,
                provider_name: &self.provider_name,
                between_measurements: matches!(
                    self.state,
                    ModeState::Idle | ModeState::Completed
                ),
            },
        )
    }

    /// Arms a drag on a committed point. Only between measurements.
    pub(super) fn on_drag_start(&mut self, event: &NormalizedEvent) {
        if !matches!(self.state, ModeState::Idle | ModeState::Completed) {
            debug!("Ignoring drag start while collecting");
            return;
        }
        self.drag.arm(event.map_point, event.screen_point);
    }

    /// Returns `true` if the move was consumed by a drag.
    pub(super) fn drag_move(
        &mut self,
        event: &NormalizedEvent,
        drawer: &mut dyn DrawingCollaborator,
    ) -> bool {
        let (drag, mut ctx) = self.drag_context(drawer);
        drag.on_move(event, &mut ctx)
    }

    pub(super) fn on_mouse_up(
        &mut self,
        event: &NormalizedEvent,
        drawer: &mut dyn DrawingCollaborator,
    ) {
        let (drag, mut ctx) = self.drag_context(drawer);
        if drag.on_mouse_up(&mut ctx).is_some() {
            self.last_drag_release = Some(event.at());
        }
    }

    pub(super) fn abort_drag(&mut self, drawer: &mut dyn DrawingCollaborator) {
        let (drag, mut ctx) = self.drag_context(drawer);
        drag.abort(&mut ctx);
    }
}
