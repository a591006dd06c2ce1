//! Renaming measurement labels through an asynchronous editor.

use super::mode::{MeasureMode, soft};
use crate::draw::DrawingCollaborator;
use crate::error::MeasureError;
use async_trait::async_trait;
use log::info;

/// Source of a new label text, typically a modal dialog.
///
/// Resolves to `None` when the user cancels.
#[async_trait(?Send)]
pub trait LabelEditor {
    async fn edit(&self, current: &str) -> Option<String>;
}

/// Editor answering every prompt with the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedLabel(pub Option<String>);

#[async_trait(?Send)]
impl LabelEditor for FixedLabel {
    async fn edit(&self, _current: &str) -> Option<String> {
        self.0.clone()
    }
}

impl MeasureMode {
    /// Asks `editor` for a new label for record `id`.
    ///
    /// Returns `Ok(false)` if the editor was cancelled. An empty answer
    /// restores the formatted measurement value.
    pub async fn rename_label(
        &mut self,
        id: u64,
        editor: &dyn LabelEditor,
        drawer: &mut dyn DrawingCollaborator,
    ) -> Result<bool, MeasureError> {
        let current = {
            let pool = self.pool.borrow();
            let record = pool
                .find_by_id(id)
                .ok_or_else(|| MeasureError::RecordNotFound(format!("id {id}")))?;
            record.label_content().to_string()
        };

        let Some(answer) = editor.edit(&current).await else {
            return Ok(false);
        };

        // The record may have changed or vanished while the editor was open.
        let mut record = self
            .pool
            .borrow()
            .find_by_id(id)
            .cloned()
            .ok_or_else(|| MeasureError::RecordNotFound(format!("id {id}")))?;
        let answer = answer.trim();
        record.label = (!answer.is_empty()).then(|| answer.to_string());
        let content = record.label_content();
        if self.pool.borrow_mut().update(id, record).is_none() {
            return Err(MeasureError::RecordNotFound(format!("id {id}")));
        }

        if let Some(label) = self.committed.get_mut(&id).and_then(|g| g.label.as_mut()) {
            soft(drawer.update_label(label, &content), "label rename");
        }
        info!("Measurement {id} label set to \"{content}\"");
        Ok(true)
    }
}
