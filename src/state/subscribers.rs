//! Subscriber registry shared by signals and stores.
//!
//! Subscriptions are identified by an id handed out at subscribe time, so the
//! returned unsubscribe closure removes exactly that entry even when the same
//! callback logic was subscribed twice.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::types::Unsubscribe;

type Subscriber = Rc<dyn Fn()>;

struct SubscriberList {
    entries: Vec<(usize, Subscriber)>,
    next_id: usize,
}

impl SubscriberList {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

/// Ordered set of change callbacks.
pub struct Subscribers {
    list: Rc<RefCell<SubscriberList>>,
}

impl Default for Subscribers {
    fn default() -> Self {
        Self::new()
    }
}

impl Subscribers {
    pub fn new() -> Self {
        Self {
            list: Rc::new(RefCell::new(SubscriberList::new())),
        }
    }

    /// Add a callback. Returns the closure that removes it.
    pub fn subscribe<F>(&self, callback: F) -> Unsubscribe
    where
        F: Fn() + 'static,
    {
        let id = {
            let mut list = self.list.borrow_mut();
            let id = list.next_id();
            list.entries.push((id, Rc::new(callback)));
            id
        };

        let list: Weak<RefCell<SubscriberList>> = Rc::downgrade(&self.list);
        Box::new(move || {
            if let Some(list) = list.upgrade() {
                list.borrow_mut()
                    .entries
                    .retain(|(subscriber_id, _)| *subscriber_id != id);
            }
        })
    }

    /// Call every current subscriber in subscription order.
    ///
    /// Callbacks may subscribe or unsubscribe while being notified. An entry
    /// removed by an earlier callback is skipped; entries added during the
    /// pass are first called on the next notification.
    pub fn notify(&self) {
        let snapshot: Vec<(usize, Subscriber)> = self.list.borrow().entries.clone();
        for (id, callback) in snapshot {
            let still_subscribed = self
                .list
                .borrow()
                .entries
                .iter()
                .any(|(subscriber_id, _)| *subscriber_id == id);
            if still_subscribed {
                callback();
            }
        }
    }

    pub fn len(&self) -> usize {
        self.list.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.borrow().entries.is_empty()
    }
}
