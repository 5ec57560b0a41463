//! Document-level pointer listeners for drags that leave their control.
//!
//! A controller subscribes when a drag starts and holds the returned
//! [`DragSubscription`]. Dropping the subscription deregisters it, so the
//! listener is released exactly once whether the drag ends on pointer-up or
//! the player is torn down mid-drag.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Seek,
    Volume,
}

#[derive(Debug, Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<(u64, Axis)>,
}

/// Listener table for the document-level pointer stream.
///
/// Cloning shares the same table; hosts may keep a clone to inspect it.
#[derive(Debug, Clone, Default)]
pub struct PointerHub {
    registry: Rc<RefCell<Registry>>,
}

impl PointerHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, axis: Axis) -> DragSubscription {
        let mut registry = self.registry.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, axis));
        tracing::debug!(?axis, id, "drag listener registered");
        DragSubscription { id, axis, registry: Rc::downgrade(&self.registry) }
    }

    /// Axes with a live listener, in registration order.
    pub fn listeners(&self) -> Vec<Axis> {
        self.registry.borrow().listeners.iter().map(|(_, axis)| *axis).collect()
    }

    pub fn listener_count(&self) -> usize {
        self.registry.borrow().listeners.len()
    }
}

/// Owned registration in a [`PointerHub`]; deregisters on drop.
#[derive(Debug)]
pub struct DragSubscription {
    id: u64,
    axis: Axis,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for DragSubscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().listeners.retain(|(id, _)| *id != self.id);
            tracing::debug!(axis = ?self.axis, id = self.id, "drag listener released");
        }
    }
}
