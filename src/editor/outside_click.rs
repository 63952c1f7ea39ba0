use std::cell::Cell;
use std::rc::Rc;

use crate::host::{Host, ListenerId, PointerListener};

/// Owns at most one document-level pointer listener.
pub struct OutsideClickListener {
    host: Rc<dyn Host>,
    id: Cell<Option<ListenerId>>,
}

impl OutsideClickListener {
    pub fn new(host: Rc<dyn Host>) -> Self {
        Self {
            host,
            id: Cell::new(None),
        }
    }

    pub fn is_attached(&self) -> bool {
        self.id.get().is_some()
    }

    /// Returns `false` when a listener was already attached.
    pub fn attach(&self, listener: PointerListener) -> bool {
        if self.is_attached() {
            return false;
        }
        let id = self.host.add_pointer_listener(listener);
        tracing::debug!(?id, "outside-click listener attached");
        self.id.set(Some(id));
        true
    }

    pub fn detach(&self) {
        if let Some(id) = self.id.take() {
            self.host.remove_pointer_listener(id);
            tracing::debug!(?id, "outside-click listener detached");
        }
    }
}

impl Drop for OutsideClickListener {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{MemoryHost, PointerEvent};

    fn noop() -> PointerListener {
        Rc::new(|_: &PointerEvent| {})
    }

    #[test]
    fn attach_and_detach_are_idempotent() {
        let host = Rc::new(MemoryHost::new());
        let listener = OutsideClickListener::new(host.clone());

        assert!(listener.attach(noop()));
        assert!(!listener.attach(noop()));
        assert_eq!(host.pointer_listener_count(), 1);

        listener.detach();
        listener.detach();
        assert!(!listener.is_attached());
        assert_eq!(host.pointer_listener_count(), 0);
    }

    #[test]
    fn dropping_the_guard_removes_the_listener() {
        let host = Rc::new(MemoryHost::new());
        {
            let listener = OutsideClickListener::new(host.clone());
            listener.attach(noop());
        }
        assert_eq!(host.pointer_listener_count(), 0);
    }
}
