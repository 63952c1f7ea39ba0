use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::{Rc, Weak};

use super::{
    Anchor, Host, ListenerId, NodeId, ObserverHandle, PointerEvent, PointerListener, PopupSurface,
    ResizeObserving,
};
use crate::geometry::{Bounds, PopupPlacement, Size};

type ResizeCallback = Rc<dyn Fn()>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    pointer_listeners: Vec<(ListenerId, PointerListener)>,
    observers: Vec<(u64, ResizeCallback)>,
}

impl Registry {
    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id = self.next_id.saturating_add(1);
        id
    }
}

/// In-memory host used by the replay runner and by tests.
pub struct MemoryHost {
    registry: Rc<RefCell<Registry>>,
    observer: Option<Rc<dyn ResizeObserving>>,
}

impl MemoryHost {
    pub fn new() -> Self {
        let registry = Rc::new(RefCell::new(Registry::default()));
        let observer: Rc<dyn ResizeObserving> = Rc::new(MemoryResizeObserver {
            registry: Rc::downgrade(&registry),
        });
        Self {
            registry,
            observer: Some(observer),
        }
    }

    /// A host that lacks resize observation entirely.
    pub fn without_resize_observer() -> Self {
        Self {
            registry: Rc::new(RefCell::new(Registry::default())),
            observer: None,
        }
    }

    pub fn dispatch_pointer_down(&self, target: NodeId) {
        let listeners = self
            .registry
            .borrow()
            .pointer_listeners
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect::<Vec<_>>();
        let event = PointerEvent { target };
        for listener in listeners {
            listener(&event);
        }
    }

    pub fn notify_resize(&self) {
        let callbacks = self
            .registry
            .borrow()
            .observers
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect::<Vec<_>>();
        for callback in callbacks {
            callback();
        }
    }

    pub fn pointer_listener_count(&self) -> usize {
        self.registry.borrow().pointer_listeners.len()
    }

    pub fn observer_count(&self) -> usize {
        self.registry.borrow().observers.len()
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl Host for MemoryHost {
    fn add_pointer_listener(&self, listener: PointerListener) -> ListenerId {
        let mut registry = self.registry.borrow_mut();
        let id = ListenerId(registry.allocate_id());
        registry.pointer_listeners.push((id, listener));
        id
    }

    fn remove_pointer_listener(&self, id: ListenerId) {
        self.registry
            .borrow_mut()
            .pointer_listeners
            .retain(|(listener_id, _)| *listener_id != id);
    }

    fn resize_observer(&self) -> Option<Rc<dyn ResizeObserving>> {
        self.observer.clone()
    }
}

struct MemoryResizeObserver {
    registry: Weak<RefCell<Registry>>,
}

impl ResizeObserving for MemoryResizeObserver {
    fn observe(&self, _target: Rc<dyn Anchor>, on_resize: Rc<dyn Fn()>) -> Box<dyn ObserverHandle> {
        let id = match self.registry.upgrade() {
            Some(registry) => {
                let mut registry = registry.borrow_mut();
                let id = registry.allocate_id();
                registry.observers.push((id, Rc::clone(&on_resize)));
                Some(id)
            }
            None => None,
        };
        on_resize();
        Box::new(MemoryObserverHandle {
            registry: self.registry.clone(),
            id,
        })
    }
}

struct MemoryObserverHandle {
    registry: Weak<RefCell<Registry>>,
    id: Option<u64>,
}

impl ObserverHandle for MemoryObserverHandle {
    fn disconnect(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(registry) = self.registry.upgrade() {
            registry
                .borrow_mut()
                .observers
                .retain(|(observer_id, _)| *observer_id != id);
        }
    }
}

#[derive(Debug)]
pub struct MemoryAnchor {
    bounds: Cell<Bounds>,
}

impl MemoryAnchor {
    pub fn new(bounds: Bounds) -> Self {
        Self {
            bounds: Cell::new(bounds),
        }
    }

    pub fn set_bounds(&self, bounds: Bounds) {
        self.bounds.set(bounds);
    }
}

impl Anchor for MemoryAnchor {
    fn bounds(&self) -> Bounds {
        self.bounds.get()
    }
}

/// A popup element made of a fixed set of node ids.
#[derive(Debug)]
pub struct MemorySurface {
    nodes: HashSet<NodeId>,
    size: Size,
    placements: RefCell<Vec<PopupPlacement>>,
}

impl MemorySurface {
    pub fn new(nodes: impl IntoIterator<Item = NodeId>, size: Size) -> Self {
        Self {
            nodes: nodes.into_iter().collect(),
            size,
            placements: RefCell::new(Vec::new()),
        }
    }

    pub fn placements(&self) -> Vec<PopupPlacement> {
        self.placements.borrow().clone()
    }

    pub fn last_placement(&self) -> Option<PopupPlacement> {
        self.placements.borrow().last().copied()
    }
}

impl PopupSurface for MemorySurface {
    fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    fn size(&self) -> Size {
        self.size
    }

    fn apply_placement(&self, placement: PopupPlacement) {
        self.placements.borrow_mut().push(placement);
    }
}
