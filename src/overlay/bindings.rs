//! Explicit listener registrations.
//!
//! Every overlay owns handles to the listeners it registered, both on its own
//! element (press, resize handle, wheel) and on the shared window channels
//! (pointer move, pointer release, window resize). Unbinding an overlay removes
//! exactly those handles and leaves every other overlay's listeners in place.

use slab::Slab;

use super::model::OverlayId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
    PointerDown,
    ResizeDown,
    Wheel,
    WindowPointerMove,
    WindowPointerUp,
    WindowResize,
}

impl ListenerKind {
    pub const ALL: [ListenerKind; 6] = [
        ListenerKind::PointerDown,
        ListenerKind::ResizeDown,
        ListenerKind::Wheel,
        ListenerKind::WindowPointerMove,
        ListenerKind::WindowPointerUp,
        ListenerKind::WindowResize,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerHandle {
    key: usize,
    listener: Listener,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct Listener {
    overlay: OverlayId,
    kind: ListenerKind,
}

/// Handles an overlay holds for its own listeners.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayBindings {
    handles: Vec<ListenerHandle>,
}

impl OverlayBindings {
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }
}

#[derive(Debug, Default)]
pub struct EventHub {
    listeners: Slab<Listener>,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, overlay: OverlayId, kind: ListenerKind) -> ListenerHandle {
        let listener = Listener { overlay, kind };
        let key = self.listeners.insert(listener);
        ListenerHandle { key, listener }
    }

    /// Remove one listener. Returns `false` for a handle that is no longer
    /// bound; a slot reused by another listener is left alone.
    pub fn unbind(&mut self, handle: ListenerHandle) -> bool {
        if self.listeners.get(handle.key) != Some(&handle.listener) {
            return false;
        }
        self.listeners.remove(handle.key);
        true
    }

    /// Register the full listener set an interactive overlay needs.
    pub fn bind_overlay(&mut self, overlay: OverlayId) -> OverlayBindings {
        let handles = ListenerKind::ALL
            .iter()
            .map(|kind| self.bind(overlay, *kind))
            .collect();
        OverlayBindings { handles }
    }

    /// Remove every listener recorded in `bindings`, leaving it empty.
    /// Returns how many listeners were actually removed.
    pub fn unbind_overlay(&mut self, bindings: &mut OverlayBindings) -> usize {
        bindings
            .handles
            .drain(..)
            .filter(|handle| self.unbind(*handle))
            .count()
    }

    pub fn is_bound(&self, overlay: OverlayId, kind: ListenerKind) -> bool {
        self.listeners
            .iter()
            .any(|(_, l)| l.overlay == overlay && l.kind == kind)
    }

    /// Overlays listening on `kind`, in slot order.
    pub fn listeners_for(&self, kind: ListenerKind) -> Vec<OverlayId> {
        self.listeners
            .iter()
            .filter(|(_, l)| l.kind == kind)
            .map(|(_, l)| l.overlay)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
