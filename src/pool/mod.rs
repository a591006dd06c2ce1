//! Provider-agnostic measurement pool.
//!
//! The pool is the single source of truth for every measurement, across all
//! providers and modes. Modes keep working copies while a gesture is in
//! progress and write them back here with [`MeasurementPool::upsert`].
//!
//! The pool is single-threaded: share it as a [`SharedPool`] between the
//! components running on the event thread. Observers receive events after a
//! mutation is complete and must not re-enter the pool from a listener.

pub mod events;

pub use events::{DragEnd, EventBus, ListenerId, PoolEvent, Removed};

use crate::coord::{self, Coordinate, CoordinateForm, NativeCoord, ProjectedCoordinate};
use crate::measure::{MeasureKind, MeasurementRecord, RecordStatus};
use log::{debug, warn};
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;

/// Handle to the pool shared by every mode on the event thread.
pub type SharedPool = Rc<RefCell<MeasurementPool>>;

/// Read-only view of a record with coordinates in a presentation form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordView {
    pub id: u64,
    pub kind: MeasureKind,
    pub coordinates: Vec<ProjectedCoordinate>,
    pub measurements: Vec<f64>,
    pub status: RecordStatus,
    pub provider_name: String,
    pub label_index: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// Store of all measurement records in insertion order.
#[derive(Debug, Default)]
pub struct MeasurementPool {
    records: Vec<MeasurementRecord>,
    events: EventBus,
    last_id: u64,
    last_label_index: u32,
}

impl MeasurementPool {
    /// Creates an empty pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty pool wrapped for sharing.
    pub fn shared() -> SharedPool {
        Rc::new(RefCell::new(Self::new()))
    }

    /// Registers a listener for pool events.
    pub fn subscribe(&mut self, listener: impl FnMut(&PoolEvent) + 'static) -> ListenerId {
        self.events.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Allocates a record id from the current timestamp, kept strictly monotonic.
    pub fn next_id(&mut self) -> u64 {
        let now = u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or(0);
        self.last_id = now.max(self.last_id + 1);
        self.last_id
    }

    /// Allocates the next display number, starting at 1.
    pub fn next_label_index(&mut self) -> u32 {
        self.last_label_index += 1;
        self.last_label_index
    }

    /// Appends a record. Records without coordinates or with an invalid
    /// coordinate are rejected and `false` is returned.
    pub fn add(&mut self, record: MeasurementRecord) -> bool {
        if record.coordinates.is_empty() {
            debug!("Ignoring record {} with no coordinates", record.id);
            return false;
        }
        let Some(record) = normalize_record(record) else {
            return false;
        };

        self.records.push(record.clone());
        self.events.emit(&PoolEvent::RecordAdded(record));
        self.emit_changed();
        true
    }

    /// Replaces the record with the same id, or appends it if unknown.
    pub fn upsert(&mut self, record: MeasurementRecord) -> bool {
        if self.position(record.id).is_some() {
            let id = record.id;
            self.update(id, record).is_some()
        } else {
            self.add(record)
        }
    }

    /// Replaces the record stored under `id` in place.
    ///
    /// `id`, `kind`, `provider_name` and `label_index` stay as stored. Returns
    /// `None` (and logs) if the id is unknown or the new coordinates are invalid.
    pub fn update(&mut self, id: u64, record: MeasurementRecord) -> Option<&MeasurementRecord> {
        let Some(index) = self.position(id) else {
            warn!("Cannot update measurement {id}: not in pool");
            return None;
        };
        let mut record = normalize_record(record)?;

        let stored = &self.records[index];
        record.id = stored.id;
        record.kind = stored.kind;
        record.provider_name = stored.provider_name.clone();
        record.label_index = stored.label_index;

        self.records[index] = record.clone();
        self.events.emit(&PoolEvent::RecordUpdated(record));
        self.emit_changed();
        self.records.get(index)
    }

    pub fn find_by_id(&self, id: u64) -> Option<&MeasurementRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// First record, in insertion order, having a vertex equal to `point`.
    ///
    /// Two measurements sharing an exact vertex resolve to the older one.
    pub fn find_by_coordinate(
        &self,
        point: &Coordinate,
        epsilon: Option<f64>,
    ) -> Option<&MeasurementRecord> {
        self.records
            .iter()
            .find(|r| r.coordinates.iter().any(|c| coord::equal(c, point, epsilon)))
    }

    /// Removes a record by id.
    pub fn remove(&mut self, id: u64) -> Option<MeasurementRecord> {
        let index = self.position(id)?;
        let removed = self.records.remove(index);
        self.events
            .emit(&PoolEvent::RecordRemoved(Removed::Record(removed.clone())));
        self.emit_changed();
        Some(removed)
    }

    /// Removes every record owned by `provider_name`, returning how many went.
    ///
    /// Emits one `record-removed` and one `pool-changed` if anything was removed.
    pub fn remove_by_provider(&mut self, provider_name: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|r| r.provider_name != provider_name);
        let removed = before - self.records.len();

        if removed > 0 {
            self.events.emit(&PoolEvent::RecordRemoved(Removed::Provider(
                provider_name.to_string(),
            )));
            self.emit_changed();
        }
        removed
    }

    /// Snapshot of all records with coordinates projected into `form`.
    pub fn list(&self, form: CoordinateForm) -> Vec<RecordView> {
        self.records
            .iter()
            .map(|r| RecordView {
                id: r.id,
                kind: r.kind,
                coordinates: r.coordinates.iter().map(|c| form.project(c)).collect(),
                measurements: r.measurements.clone(),
                status: r.status,
                provider_name: r.provider_name.clone(),
                label_index: r.label_index,
                label: r.label.clone(),
            })
            .collect()
    }

    /// Canonical records in insertion order.
    pub fn records(&self) -> &[MeasurementRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Empties the pool.
    pub fn clear(&mut self) {
        self.records.clear();
        self.events.emit(&PoolEvent::PoolCleared);
    }

    /// Publishes the end of a drag gesture to pool observers.
    pub fn notify_drag_end(&mut self, drag_end: DragEnd) {
        self.events.emit(&PoolEvent::DragEnd(drag_end));
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.records.iter().position(|r| r.id == id)
    }

    fn emit_changed(&mut self) {
        let snapshot = PoolEvent::PoolChanged(self.records.clone());
        self.events.emit(&snapshot);
    }
}

fn normalize_record(mut record: MeasurementRecord) -> Option<MeasurementRecord> {
    let mut normalized = Vec::with_capacity(record.coordinates.len());
    for c in &record.coordinates {
        match coord::normalize(NativeCoord::Canonical(*c)) {
            Ok(c) => normalized.push(c),
            Err(err) => {
                warn!("Rejecting measurement {}: {err}", record.id);
                return None;
            }
        }
    }
    record.coordinates = normalized;
    Some(record)
}
