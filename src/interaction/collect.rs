//! Point collection: clicks, previews, closing and cancelling.

use super::mode::{
    MeasureMode, MeasurementGraphics, ModeState, Working, draw_point, remove_graphics, restyle,
    soft, sync_graphics, sync_label, sync_shape,
};
use crate::coord::{self, Coordinate};
use crate::draw::DrawingCollaborator;
use crate::input::{Channel, NormalizedEvent};
use crate::measure::{LabelContent, MeasureKind, MeasurementRecord, RecordStatus};
use log::{debug, info, warn};

impl MeasureMode {
    pub(super) fn on_left_click(
        &mut self,
        event: &NormalizedEvent,
        drawer: &mut dyn DrawingCollaborator,
    ) {
        if self.in_drag_cooldown(event.at()) {
            debug!("Ignoring click inside post-drag cool-down");
            return;
        }
        if self.drag.is_dragging() {
            debug!("Ignoring click while a drag is in progress");
            return;
        }
        self.drag.disarm();

        match self.state {
            ModeState::Idle | ModeState::Completed => self.start(event.map_point, drawer),
            ModeState::Collecting | ModeState::Previewing => self.extend(event.map_point, drawer),
        }
    }

    pub(super) fn on_mouse_move(
        &mut self,
        event: &NormalizedEvent,
        drawer: &mut dyn DrawingCollaborator,
    ) {
        if self.drag_move(event, drawer) {
            return;
        }
        if matches!(self.state, ModeState::Collecting | ModeState::Previewing) {
            self.update_preview(event.map_point, drawer);
        }
    }

    /// Right-click or double-click.
    pub(super) fn on_close(&mut self, channel: Channel, drawer: &mut dyn DrawingCollaborator) {
        if !matches!(self.state, ModeState::Collecting | ModeState::Previewing) {
            debug!("Nothing to close in {} mode", self.kind);
            return;
        }

        match self.kind {
            MeasureKind::Area => {
                if channel == Channel::DoubleClick {
                    self.drop_trailing_duplicate(drawer);
                }
                let count = self
                    .working
                    .as_ref()
                    .map_or(0, |w| w.record.coordinates.len());
                if count >= self.kind.min_points() {
                    self.finalize(drawer);
                } else {
                    debug!("Area closed with {count} points; cancelling");
                    self.cancel(drawer);
                }
            }
            MeasureKind::Distance if channel == Channel::RightClick => {
                debug!("Distance cancelled by right-click");
                self.cancel(drawer);
            }
            _ => {}
        }
    }

    /// Starts a new measurement at `point`.
    fn start(&mut self, point: Coordinate, drawer: &mut dyn DrawingCollaborator) {
        let (id, label_index) = {
            let mut pool = self.pool.borrow_mut();
            (pool.next_id(), pool.next_label_index())
        };
        let record =
            MeasurementRecord::pending(id, self.kind, point, self.provider_name.clone(), label_index);
        let mut graphics = MeasurementGraphics::default();
        graphics
            .points
            .push(draw_point(drawer, &self.styles, &point, RecordStatus::Pending));
        self.working = Some(Working { record, graphics });

        if self.kind.completes_at(1) {
            self.finalize(drawer);
        } else {
            self.write_pending();
            self.state = ModeState::Collecting;
        }
    }

    /// Commits `point` to the measurement being collected.
    fn extend(&mut self, point: Coordinate, drawer: &mut dyn DrawingCollaborator) {
        let Some(working) = self.working.as_mut() else {
            warn!("{} mode collecting without a working record", self.kind);
            self.state = ModeState::Idle;
            return;
        };

        working.record.coordinates.push(point);
        working.record.recompute();
        working
            .graphics
            .points
            .push(draw_point(drawer, &self.styles, &point, RecordStatus::Pending));
        let count = working.record.coordinates.len();

        if self.kind.completes_at(count) {
            self.finalize(drawer);
            return;
        }

        self.clear_preview(drawer);
        if let Some(working) = self.working.as_mut() {
            sync_graphics(
                drawer,
                &self.styles,
                &mut working.graphics,
                &working.record,
                RecordStatus::Pending,
            );
        }
        self.write_pending();
        self.state = ModeState::Collecting;
    }

    /// Redraws the moving preview through the committed points and `pointer`.
    fn update_preview(&mut self, pointer: Coordinate, drawer: &mut dyn DrawingCollaborator) {
        let Some(working) = self.working.as_ref() else {
            return;
        };
        let mut coords = working.record.coordinates.clone();
        coords.push(pointer);
        let content = LabelContent::preview(self.kind, self.kind.compute(&coords));

        let status = RecordStatus::Moving;
        sync_shape(
            drawer,
            &self.styles,
            &mut self.preview.shape,
            self.kind,
            &coords,
            status,
        );
        sync_label(
            drawer,
            &self.styles,
            &mut self.preview.label,
            &coords,
            &content,
            status,
        );
        self.state = ModeState::Previewing;
    }

    /// Finalizes the working measurement and commits it to the pool.
    pub(super) fn finalize(&mut self, drawer: &mut dyn DrawingCollaborator) {
        self.clear_preview(drawer);
        let Some(Working {
            mut record,
            mut graphics,
        }) = self.working.take()
        else {
            return;
        };

        record.recompute();
        record.status = RecordStatus::Completed;
        sync_graphics(drawer, &self.styles, &mut graphics, &record, record.status);
        restyle(drawer, &self.styles, &mut graphics, record.status);

        let id = record.id;
        let summary = record.label_content().to_string();
        if self.pool.borrow_mut().upsert(record) {
            info!(
                "{} measurement {id} completed on {}: {summary}",
                self.kind, self.provider_name
            );
            self.committed.insert(id, graphics);
        } else {
            warn!("Measurement {id} rejected by pool; discarding graphics");
            remove_graphics(drawer, graphics);
        }
        self.state = ModeState::Completed;
    }

    /// Discards the working measurement and its pending pool record.
    pub(super) fn cancel(&mut self, drawer: &mut dyn DrawingCollaborator) {
        self.clear_preview(drawer);
        if let Some(working) = self.working.take() {
            remove_graphics(drawer, working.graphics);
            if self.pool.borrow_mut().remove(working.record.id).is_some() {
                debug!("Removed pending measurement {}", working.record.id);
            }
        }
        if matches!(self.state, ModeState::Collecting | ModeState::Previewing) {
            self.state = ModeState::Idle;
        }
    }

    fn clear_preview(&mut self, drawer: &mut dyn DrawingCollaborator) {
        remove_graphics(drawer, std::mem::take(&mut self.preview));
    }

    fn write_pending(&mut self) {
        if let Some(working) = self.working.as_ref() {
            if !self.pool.borrow_mut().upsert(working.record.clone()) {
                warn!("Pending measurement {} rejected by pool", working.record.id);
            }
        }
    }

    /// A double-click arrives after the click that produced it; drop that
    /// click's vertex if it repeats the one before it.
    fn drop_trailing_duplicate(&mut self, drawer: &mut dyn DrawingCollaborator) {
        let epsilon = Some(self.settings.epsilon);
        let Some(working) = self.working.as_mut() else {
            return;
        };
        let coords = &working.record.coordinates;
        let duplicate = matches!(
            coords.as_slice(),
            [.., previous, last] if coord::equal(previous, last, epsilon)
        );
        if !duplicate {
            return;
        }

        working.record.coordinates.pop();
        working.record.recompute();
        if let Some(Some(handle)) = working.graphics.points.pop() {
            soft(drawer.remove(&handle), "duplicate point removal");
        }
        sync_graphics(
            drawer,
            &self.styles,
            &mut working.graphics,
            &working.record,
            RecordStatus::Pending,
        );
    }
}
