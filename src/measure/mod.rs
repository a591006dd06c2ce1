//! Measurement records, kinds and the geodesy behind their results.

pub mod format;
pub mod geometry;
pub mod kind;
pub mod record;

pub use format::LabelContent;
pub use kind::MeasureKind;
pub use record::{MeasurementRecord, RecordStatus};
