//! Provider-agnostic map measurement core.
//!
//! Pointer events from any map renderer are normalized, run through one
//! measure mode state machine per measurement kind and committed to a shared
//! [`pool::MeasurementPool`]. Renderers plug in through the
//! [`draw::DrawingCollaborator`] contract.

pub mod config;
pub mod coord;
pub mod draw;
pub mod error;
pub mod input;
pub mod interaction;
pub mod measure;
pub mod pool;
pub mod provider;
pub mod replay;

pub use config::Config;
pub use error::MeasureError;
