//! Change notifications emitted by the measurement pool.

use crate::draw::HandleId;
use crate::measure::MeasurementRecord;

/// What a `record-removed` notification refers to.
#[derive(Debug, Clone, PartialEq)]
pub enum Removed {
    /// A single record removed by id
    Record(MeasurementRecord),
    /// Every record of a provider removed in bulk
    Provider(String),
}

/// Payload of a `drag-end` notification.
#[derive(Debug, Clone, PartialEq)]
pub struct DragEnd {
    /// Snapshot of the finalized record
    pub record: MeasurementRecord,
    /// Graphics updated during the drag
    pub touched_handles: Vec<HandleId>,
}

/// Events observable by any listener, e.g. a UI panel.
///
/// Emitted only after the corresponding mutation is fully applied.
#[derive(Debug, Clone, PartialEq)]
pub enum PoolEvent {
    RecordAdded(MeasurementRecord),
    RecordUpdated(MeasurementRecord),
    RecordRemoved(Removed),
    PoolCleared,
    /// Full snapshot after any mutation
    PoolChanged(Vec<MeasurementRecord>),
    DragEnd(DragEnd),
}

impl PoolEvent {
    /// Kebab-case event name, matching what UI layers subscribe to.
    pub fn name(&self) -> &'static str {
        match self {
            PoolEvent::RecordAdded(_) => "record-added",
            PoolEvent::RecordUpdated(_) => "record-updated",
            PoolEvent::RecordRemoved(_) => "record-removed",
            PoolEvent::PoolCleared => "pool-cleared",
            PoolEvent::PoolChanged(_) => "pool-changed",
            PoolEvent::DragEnd(_) => "drag-end",
        }
    }
}

/// Opaque token returned by `subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&PoolEvent)>;

/// Ordered list of listeners. Listeners must not call back into the pool.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(ListenerId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&PoolEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `true` if the listener was registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: &PoolEvent) {
        log::trace!("pool event: {}", event.name());
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
