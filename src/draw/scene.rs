//! Retained graphic store implementing [`DrawingCollaborator`] for any provider.
//!
//! A `Scene` holds every graphic in the provider's native coordinate form,
//! which is what the provider SDK's render loop consumes. The three providers
//! differ only in the [`ProviderAdapter`] they plug in.

use super::collaborator::{DrawingCollaborator, GraphicHandle, GraphicKind, HandleId};
use super::style::GraphicStyle;
use crate::coord::Coordinate;
use crate::error::MeasureError;
use crate::measure::{LabelContent, RecordStatus, geometry};
use crate::provider::ProviderAdapter;
use log::trace;
use std::collections::BTreeMap;

/// One retained graphic in native coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Graphic<N> {
    pub kind: GraphicKind,
    pub positions: Vec<N>,
    /// Where a label is drawn
    pub anchor: Option<N>,
    pub style: GraphicStyle,
    /// Label text, including unit
    pub text: Option<String>,
    pub status: RecordStatus,
}

/// Graphic store for one provider.
#[derive(Debug)]
pub struct Scene<A: ProviderAdapter> {
    adapter: A,
    graphics: BTreeMap<HandleId, Graphic<A::Native>>,
    next_handle: u64,
    panning_enabled: bool,
}

impl<A: ProviderAdapter> Scene<A> {
    pub fn new(adapter: A) -> Self {
        Self {
            adapter,
            graphics: BTreeMap::new(),
            next_handle: 1,
            panning_enabled: true,
        }
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn graphic(&self, id: HandleId) -> Option<&Graphic<A::Native>> {
        self.graphics.get(&id)
    }

    /// Graphics in creation order.
    pub fn graphics(&self) -> impl Iterator<Item = (&HandleId, &Graphic<A::Native>)> {
        self.graphics.iter()
    }

    pub fn len(&self) -> usize {
        self.graphics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphics.is_empty()
    }

    pub fn count(&self, kind: GraphicKind) -> usize {
        self.graphics.values().filter(|g| g.kind == kind).count()
    }

    /// Whether the map's own pan/drag is currently allowed.
    pub fn panning_enabled(&self) -> bool {
        self.panning_enabled
    }

    fn native(&self, coords: &[Coordinate]) -> Vec<A::Native> {
        coords.iter().map(|c| self.adapter.to_native(c)).collect()
    }

    fn insert(
        &mut self,
        kind: GraphicKind,
        coords: &[Coordinate],
        style: &GraphicStyle,
        text: Option<String>,
    ) -> GraphicHandle {
        let id = HandleId(self.next_handle);
        self.next_handle += 1;

        let anchor = match kind {
            GraphicKind::Label => geometry::anchor(coords).map(|c| self.adapter.to_native(&c)),
            _ => None,
        };
        let graphic = Graphic {
            kind,
            positions: self.native(coords),
            anchor,
            style: *style,
            text,
            status: RecordStatus::Pending,
        };
        trace!("{} scene: add {:?} {:?}", self.adapter.kind(), kind, id);
        self.graphics.insert(id, graphic);

        GraphicHandle::new(id, kind, coords.to_vec())
    }

    fn lookup(&mut self, handle: &GraphicHandle) -> Result<&mut Graphic<A::Native>, MeasureError> {
        self.graphics.get_mut(&handle.id).ok_or_else(|| {
            MeasureError::CollaboratorFailure(format!("unknown graphic {:?}", handle.id))
        })
    }
}

impl<A: ProviderAdapter> DrawingCollaborator for Scene<A> {
    fn add_point(
        &mut self,
        coord: &Coordinate,
        style: &GraphicStyle,
    ) -> Result<GraphicHandle, MeasureError> {
        Ok(self.insert(GraphicKind::Point, std::slice::from_ref(coord), style, None))
    }

    fn add_line(
        &mut self,
        coords: [Coordinate; 2],
        style: &GraphicStyle,
    ) -> Result<GraphicHandle, MeasureError> {
        Ok(self.insert(GraphicKind::Line, &coords, style, None))
    }

    fn add_polygon(
        &mut self,
        coords: &[Coordinate],
        style: &GraphicStyle,
    ) -> Result<GraphicHandle, MeasureError> {
        if coords.len() < 3 {
            return Err(MeasureError::CollaboratorFailure(format!(
                "polygon needs 3 vertices, got {}",
                coords.len()
            )));
        }
        Ok(self.insert(GraphicKind::Polygon, coords, style, None))
    }

    fn add_label(
        &mut self,
        coords: &[Coordinate],
        content: &LabelContent,
        style: &GraphicStyle,
    ) -> Result<GraphicHandle, MeasureError> {
        if coords.is_empty() {
            return Err(MeasureError::CollaboratorFailure(
                "label needs a position".to_string(),
            ));
        }
        Ok(self.insert(GraphicKind::Label, coords, style, Some(content.to_string())))
    }

    fn update_position(
        &mut self,
        handle: &mut GraphicHandle,
        coords: &[Coordinate],
    ) -> Result<(), MeasureError> {
        let native = self.native(coords);
        let anchor = geometry::anchor(coords).map(|c| self.adapter.to_native(&c));
        let graphic = self.lookup(handle)?;

        let minimum = match graphic.kind {
            GraphicKind::Polygon => 3,
            GraphicKind::Line => 2,
            GraphicKind::Point | GraphicKind::Label => 1,
        };
        if coords.len() < minimum {
            return Err(MeasureError::CollaboratorFailure(format!(
                "{:?} needs {minimum} positions, got {}",
                graphic.kind,
                coords.len()
            )));
        }

        graphic.positions = native;
        if graphic.kind == GraphicKind::Label {
            graphic.anchor = anchor;
        }
        handle.positions = coords.to_vec();
        Ok(())
    }

    fn update_style(
        &mut self,
        handle: &mut GraphicHandle,
        style: &GraphicStyle,
        status: RecordStatus,
    ) -> Result<(), MeasureError> {
        let graphic = self.lookup(handle)?;
        graphic.style = *style;
        graphic.status = status;
        handle.status = status;
        Ok(())
    }

    fn update_label(
        &mut self,
        handle: &mut GraphicHandle,
        content: &LabelContent,
    ) -> Result<(), MeasureError> {
        let graphic = self.lookup(handle)?;
        if graphic.kind != GraphicKind::Label {
            return Err(MeasureError::CollaboratorFailure(format!(
                "{:?} is not a label",
                handle.id
            )));
        }
        graphic.text = Some(content.to_string());
        Ok(())
    }

    fn remove(&mut self, handle: &GraphicHandle) -> Result<(), MeasureError> {
        self.graphics
            .remove(&handle.id)
            .map(|_| ())
            .ok_or_else(|| {
                MeasureError::CollaboratorFailure(format!("unknown graphic {:?}", handle.id))
            })
    }

    fn set_panning_enabled(&mut self, enabled: bool) {
        self.panning_enabled = enabled;
    }
}
