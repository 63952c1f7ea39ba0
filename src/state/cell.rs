use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<A> = Rc<dyn Fn(Option<&A>)>;

/// The one copy of the local editor state.
///
/// Reads are synchronous so commit logic always sees the latest write; UI
/// layers observe changes through `subscribe` instead of keeping a mirror.
pub struct AnnotationCell<A> {
    value: RefCell<Option<A>>,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber<A>)>>,
    next_id: Cell<u64>,
}

impl<A: Clone> AnnotationCell<A> {
    pub fn new() -> Self {
        Self {
            value: RefCell::new(None),
            subscribers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        }
    }

    pub fn get(&self) -> Option<A> {
        self.value.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.value.borrow().is_none()
    }

    /// Stores `value`, then notifies subscribers with the stored snapshot.
    pub fn set(&self, value: Option<A>) {
        *self.value.borrow_mut() = value.clone();

        let subscribers = self
            .subscribers
            .borrow()
            .iter()
            .map(|(_, subscriber)| Rc::clone(subscriber))
            .collect::<Vec<_>>();
        for subscriber in subscribers {
            subscriber(value.as_ref());
        }
    }

    pub fn clear(&self) {
        if !self.is_empty() {
            self.set(None);
        }
    }

    pub fn subscribe(&self, subscriber: impl Fn(Option<&A>) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(self.next_id.get().saturating_add(1));
        self.subscribers
            .borrow_mut()
            .push((id, Rc::new(subscriber)));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .borrow_mut()
            .retain(|(subscription, _)| *subscription != id);
    }
}

impl<A: Clone> Default for AnnotationCell<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: std::fmt::Debug> std::fmt::Debug for AnnotationCell<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationCell")
            .field("value", &self.value.borrow())
            .field("subscribers", &self.subscribers.borrow().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_visible_to_readers_before_subscribers_run() {
        let cell = Rc::new(AnnotationCell::<u32>::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let cell_for_subscriber = Rc::clone(&cell);
        let seen_for_subscriber = Rc::clone(&seen);
        cell.subscribe(move |value| {
            assert_eq!(cell_for_subscriber.get().as_ref(), value);
            seen_for_subscriber.borrow_mut().push(value.copied());
        });

        cell.set(Some(3));
        cell.set(Some(4));
        cell.clear();
        cell.clear();

        assert_eq!(*seen.borrow(), vec![Some(3), Some(4), None]);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let cell = AnnotationCell::<u32>::new();
        let hits = Rc::new(Cell::new(0));
        let hits_for_subscriber = Rc::clone(&hits);
        let id = cell.subscribe(move |_| hits_for_subscriber.set(hits_for_subscriber.get() + 1));

        cell.set(Some(1));
        cell.unsubscribe(id);
        cell.set(Some(2));

        assert_eq!(hits.get(), 1);
        assert_eq!(cell.get(), Some(2));
    }
}
