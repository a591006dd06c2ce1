//! Measure mode state machine.
//!
//! One [`MeasureMode`] per measurement kind turns normalized pointer events
//! into pool records and graphics:
//!
//! ```text
//! Idle --click--> Collecting <--move--> Previewing
//!                      |  (enough points / close)
//!                      v
//!                  Completed --click--> Collecting ...
//! ```
//!
//! Drags of committed points run alongside in the [`DragCoordinator`], and a
//! [`ProviderSession`] owns the drawing collaborator and picks the active mode.

mod collect;
mod drag;
mod label;
mod mode;
mod session;
#[cfg(test)]
mod tests;

pub use drag::{DragCoordinator, DragSession, DragState};
pub use label::{FixedLabel, LabelEditor};
pub use mode::{InteractionSettings, MeasureMode, MeasurementGraphics, ModeState};
pub use session::ProviderSession;
