//! Drawing collaborator contract and the retained scene implementing it.
//!
//! - [`DrawingCollaborator`]: primitives the measure modes call (points, lines,
//!   polygons, labels)
//! - [`GraphicHandle`]: what the core remembers about each graphic
//! - [`Scene`]: generic collaborator storing graphics in a provider's native form
//! - [`StyleSet`]: per-role styles resolved from config

pub mod collaborator;
pub mod color;
pub mod scene;
pub mod style;

pub use collaborator::{DrawingCollaborator, GraphicHandle, GraphicKind, HandleId};
pub use color::Color;
pub use scene::{Graphic, Scene};
pub use style::{GraphicStyle, StyleSet};
