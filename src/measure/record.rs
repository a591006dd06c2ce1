//! The persisted unit of measurement state.

use super::MeasureKind;
use super::format::LabelContent;
use crate::coord::{self, Coordinate};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordStatus {
    /// Being collected; not all points placed yet
    Pending,
    /// A committed point is being dragged
    Moving,
    /// Finalized
    Completed,
}

/// One measurement, owned canonically by the pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementRecord {
    /// Monotonic id derived from the creation timestamp
    pub id: u64,
    pub kind: MeasureKind,
    /// Ordered vertices; count rules depend on `kind`
    pub coordinates: Vec<Coordinate>,
    /// Derived results, recomputed on every coordinate change
    pub measurements: Vec<f64>,
    pub status: RecordStatus,
    /// Owning provider, e.g. "google"
    pub provider_name: String,
    /// Sequential display number
    pub label_index: u32,
    /// User-supplied label text replacing the formatted value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl MeasurementRecord {
    /// Creates a pending record with its first coordinate.
    pub fn pending(
        id: u64,
        kind: MeasureKind,
        first: Coordinate,
        provider_name: impl Into<String>,
        label_index: u32,
    ) -> Self {
        let mut record = Self {
            id,
            kind,
            coordinates: vec![first],
            measurements: Vec::new(),
            status: RecordStatus::Pending,
            provider_name: provider_name.into(),
            label_index,
            label: None,
        };
        record.recompute();
        record
    }

    /// Recomputes `measurements` from `coordinates`.
    pub fn recompute(&mut self) {
        self.measurements = self.kind.compute(&self.coordinates);
    }

    /// Primary numeric result, if any.
    pub fn value(&self) -> Option<f64> {
        self.measurements.first().copied()
    }

    /// Whether the coordinate count satisfies the kind's completion rule.
    pub fn has_required_points(&self) -> bool {
        self.kind.accepts_count(self.coordinates.len())
    }

    /// Index of the first vertex equal to `point`.
    pub fn vertex_index(&self, point: &Coordinate, epsilon: Option<f64>) -> Option<usize> {
        self.coordinates
            .iter()
            .position(|c| coord::equal(c, point, epsilon))
    }

    /// Label content for the current state of the record.
    pub fn label_content(&self) -> LabelContent {
        LabelContent::for_record(self)
    }
}
