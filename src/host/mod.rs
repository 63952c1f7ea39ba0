//! Capabilities the editor borrows from whatever UI layer hosts it.

mod memory;

use std::rc::Rc;

use crate::geometry::{Bounds, PopupPlacement, Size};

pub use memory::{MemoryAnchor, MemoryHost, MemorySurface};

/// Opaque identity of a node in the host's element tree.
pub type NodeId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub target: NodeId,
}

pub type PointerListener = Rc<dyn Fn(&PointerEvent)>;

/// A positioning anchor: the selected element or the wrapper context.
pub trait Anchor {
    fn bounds(&self) -> Bounds;
}

/// The popup's own mounted element.
pub trait PopupSurface {
    fn contains(&self, node: NodeId) -> bool;
    fn size(&self) -> Size;
    fn apply_placement(&self, placement: PopupPlacement);
}

pub trait ObserverHandle {
    /// Stops delivery. Calling it more than once is harmless.
    fn disconnect(&mut self);
}

pub trait ResizeObserving {
    /// Starts observing `target`. Hosts are expected to deliver one
    /// notification right away, like a browser `ResizeObserver` does.
    fn observe(&self, target: Rc<dyn Anchor>, on_resize: Rc<dyn Fn()>) -> Box<dyn ObserverHandle>;
}

pub trait Host {
    /// Registers a document-level pointer-down listener.
    fn add_pointer_listener(&self, listener: PointerListener) -> ListenerId;

    fn remove_pointer_listener(&self, id: ListenerId);

    /// `None` when the host cannot observe element resizes.
    fn resize_observer(&self) -> Option<Rc<dyn ResizeObserving>>;
}
