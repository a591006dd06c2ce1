//! Contract between the measurement core and a provider's renderer.

use super::style::GraphicStyle;
use crate::coord::Coordinate;
use crate::error::MeasureError;
use crate::measure::{LabelContent, RecordStatus};

/// Identifier of a graphic inside one collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandleId(pub u64);

/// Primitive a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GraphicKind {
    Point,
    Line,
    Polygon,
    Label,
}

/// What the core knows about a graphic without asking the renderer.
///
/// `positions` is a copy of the coordinates the graphic was last set to and
/// `status` mirrors the owning record. Everything else is opaque.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicHandle {
    pub id: HandleId,
    pub kind: GraphicKind,
    pub positions: Vec<Coordinate>,
    pub status: RecordStatus,
}

impl GraphicHandle {
    pub fn new(id: HandleId, kind: GraphicKind, positions: Vec<Coordinate>) -> Self {
        Self {
            id,
            kind,
            positions,
            status: RecordStatus::Pending,
        }
    }
}

/// Per-provider renderer primitives used by the measure modes.
///
/// Implementations must keep `handle.positions` and `handle.status` in sync
/// with what they render. Any failure is reported as
/// [`MeasureError::CollaboratorFailure`]; the core logs it and carries on.
pub trait DrawingCollaborator {
    fn add_point(
        &mut self,
        coord: &Coordinate,
        style: &GraphicStyle,
    ) -> Result<GraphicHandle, MeasureError>;

    fn add_line(
        &mut self,
        coords: [Coordinate; 2],
        style: &GraphicStyle,
    ) -> Result<GraphicHandle, MeasureError>;

    /// Requires at least three vertices.
    fn add_polygon(
        &mut self,
        coords: &[Coordinate],
        style: &GraphicStyle,
    ) -> Result<GraphicHandle, MeasureError>;

    /// Label for the shape through `coords`, showing `content`'s value and unit.
    fn add_label(
        &mut self,
        coords: &[Coordinate],
        content: &LabelContent,
        style: &GraphicStyle,
    ) -> Result<GraphicHandle, MeasureError>;

    fn update_position(
        &mut self,
        handle: &mut GraphicHandle,
        coords: &[Coordinate],
    ) -> Result<(), MeasureError>;

    /// Restyles a graphic and mirrors the owning record's status onto it.
    fn update_style(
        &mut self,
        handle: &mut GraphicHandle,
        style: &GraphicStyle,
        status: RecordStatus,
    ) -> Result<(), MeasureError>;

    fn update_label(
        &mut self,
        handle: &mut GraphicHandle,
        content: &LabelContent,
    ) -> Result<(), MeasureError>;

    fn remove(&mut self, handle: &GraphicHandle) -> Result<(), MeasureError>;

    /// Enables or disables the map's own pan/drag gesture.
    fn set_panning_enabled(&mut self, enabled: bool);
}
