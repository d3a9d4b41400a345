//! Host event subscriptions.
//!
//! A [`Signal`] delivers a mutable argument to its subscribers. Besides
//! ordinary subscriptions it supports one-shot subscriptions
//! ([`Signal::connect_once`]): the subscription is removed *before* its
//! handler runs, so a handler that causes the same notification again is
//! not re-entered.

/// Handle returned by `connect`/`connect_once`, used to disconnect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

enum Handler<A> {
    Persistent(Box<dyn FnMut(&mut A)>),
    Once(Box<dyn FnOnce(&mut A)>),
}

struct Slot<A> {
    id: SubscriptionId,
    handler: Handler<A>,
}

/// A notification with an ordered list of subscribers.
pub struct Signal<A> {
    next_id: u64,
    slots: Vec<Slot<A>>,
}

impl<A> Default for Signal<A> {
    fn default() -> Self {
        Self {
            next_id: 0,
            slots: Vec::new(),
        }
    }
}

impl<A> Signal<A> {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, handler: Handler<A>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.slots.push(Slot { id, handler });
        id
    }

    /// Subscribe until explicitly disconnected.
    pub fn connect(&mut self, handler: impl FnMut(&mut A) + 'static) -> SubscriptionId {
        self.push(Handler::Persistent(Box::new(handler)))
    }

    /// Subscribe for exactly one delivery.
    pub fn connect_once(&mut self, handler: impl FnOnce(&mut A) + 'static) -> SubscriptionId {
        self.push(Handler::Once(Box::new(handler)))
    }

    /// Remove a subscription. Returns `false` if it was already gone.
    pub fn disconnect(&mut self, id: SubscriptionId) -> bool {
        let before = self.slots.len();
        self.slots.retain(|slot| slot.id != id);
        self.slots.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.slots.len()
    }

    /// Deliver `arg` to every subscriber in subscription order.
    ///
    /// One-shot subscriptions are unsubscribed before any handler runs.
    pub fn emit(&mut self, arg: &mut A) {
        let slots = std::mem::take(&mut self.slots);
        let mut kept = Vec::with_capacity(slots.len());
        let mut once = Vec::new();

        for slot in slots {
            match slot.handler {
                Handler::Persistent(_) => kept.push(slot),
                Handler::Once(handler) => once.push((slot.id, handler)),
            }
        }
        self.slots = kept;

        let mut pending_once = once.into_iter().peekable();
        for slot in &mut self.slots {
            // Keep subscription order across both kinds of handler.
            while let Some((id, _)) = pending_once.peek() {
                if id.0 > slot.id.0 {
                    break;
                }
                if let Some((_, handler)) = pending_once.next() {
                    handler(arg);
                }
            }
            if let Handler::Persistent(handler) = &mut slot.handler {
                handler(arg);
            }
        }
        for (_, handler) in pending_once {
            handler(arg);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_persistent_handler_runs_every_time() {
        let mut signal = Signal::new();
        signal.connect(|count: &mut u32| *count += 1);

        let mut count = 0;
        signal.emit(&mut count);
        signal.emit(&mut count);
        assert_eq!(count, 2);
    }

    #[test]
    fn test_once_handler_runs_once_and_unsubscribes() {
        let mut signal = Signal::new();
        signal.connect_once(|count: &mut u32| *count += 10);
        assert_eq!(signal.subscriber_count(), 1);

        let mut count = 0;
        signal.emit(&mut count);
        assert_eq!(signal.subscriber_count(), 0);
        signal.emit(&mut count);
        assert_eq!(count, 10);
    }

    #[test]
    fn test_disconnect() {
        let mut signal = Signal::new();
        let id = signal.connect(|count: &mut u32| *count += 1);
        assert!(signal.disconnect(id));
        assert!(!signal.disconnect(id));

        let mut count = 0;
        signal.emit(&mut count);
        assert_eq!(count, 0);
    }

    #[test]
    fn test_delivery_follows_subscription_order() {
        let order = Rc::new(RefCell::new(Vec::new()));
        let mut signal: Signal<()> = Signal::new();

        let o = Rc::clone(&order);
        signal.connect(move |_| o.borrow_mut().push("first"));
        let o = Rc::clone(&order);
        signal.connect_once(move |_| o.borrow_mut().push("second"));
        let o = Rc::clone(&order);
        signal.connect(move |_| o.borrow_mut().push("third"));
        let o = Rc::clone(&order);
        signal.connect_once(move |_| o.borrow_mut().push("fourth"));

        signal.emit(&mut ());
        assert_eq!(*order.borrow(), vec!["first", "second", "third", "fourth"]);

        signal.emit(&mut ());
        assert_eq!(
            *order.borrow(),
            vec!["first", "second", "third", "fourth", "first", "third"]
        );
    }
}
