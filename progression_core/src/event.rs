//! Synchronous, single-threaded event listeners

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

/// Handle returned by [`Listeners::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback<E> = Rc<dyn Fn(&E)>;

/// Ordered list of callbacks for one event type
///
/// `emit` invokes a snapshot of the listeners taken when it starts, so
/// callbacks may subscribe, unsubscribe or trigger further events without
/// touching the list being iterated. A listener removed mid-emit still
/// receives that one event.
pub struct Listeners<E> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(ListenerId, Callback<E>)>>,
}

impl<E> Default for Listeners<E> {
    fn default() -> Self {
        Listeners {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }
}

impl<E> Listeners<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback, invoked after all earlier subscribers
    pub fn subscribe(&self, callback: impl Fn(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let callback: Callback<E> = Rc::new(callback);
        self.entries.borrow_mut().push((id, callback));
        id
    }

    /// Remove a callback; returns false if it was not subscribed
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry_id, _)| *entry_id != id);
        entries.len() != before
    }

    /// Invoke every current listener in subscription order
    pub fn emit(&self, event: &E) {
        let snapshot: Vec<Callback<E>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, callback)| Rc::clone(callback))
            .collect();

        for callback in snapshot {
            callback(event);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl<E> fmt::Debug for Listeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners").field("len", &self.len()).finish()
    }
}
