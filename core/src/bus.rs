//! Session-owned multicast event bus with per-subscriber mailboxes.

use std::collections::VecDeque;

/// Handle proving a live subscription to an [`EventBus`].
///
/// The handle is deliberately not `Clone`; unsubscribing consumes it so a
/// subscription can be torn down exactly once.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

#[derive(Debug)]
struct Mailbox<E> {
    key: u64,
    pending: VecDeque<E>,
}

/// Typed event bus delivering every published event to each live subscriber.
///
/// Delivery is synchronous: `publish` copies the event into the mailbox of
/// every subscriber, in the order those subscribers registered. Subscribers
/// drain their mailbox when they are ready to react. Dropping a subscription
/// discards its undelivered events.
#[derive(Debug)]
pub struct EventBus<E> {
    mailboxes: Vec<Mailbox<E>>,
    next_key: u64,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            mailboxes: Vec::new(),
            next_key: 0,
        }
    }
}

impl<E: Clone> EventBus<E> {
    /// Creates a bus without subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a new subscriber whose mailbox receives events published from now on.
    pub fn subscribe(&mut self) -> Subscription {
        let key = self.next_key;
        self.next_key += 1;
        self.mailboxes.push(Mailbox {
            key,
            pending: VecDeque::new(),
        });
        Subscription(key)
    }

    /// Removes a subscriber, dropping any events it has not drained.
    ///
    /// Returns `false` when the subscription does not belong to this bus.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.mailboxes.len();
        self.mailboxes
            .retain(|mailbox| mailbox.key != subscription.0);
        self.mailboxes.len() != before
    }

    /// Delivers the event to every live subscriber in subscription order.
    pub fn publish(&mut self, event: E) {
        let Some((last, rest)) = self.mailboxes.split_last_mut() else {
            return;
        };
        for mailbox in rest {
            mailbox.pending.push_back(event.clone());
        }
        last.pending.push_back(event);
    }

    /// Delivers each event of the batch in order.
    pub fn publish_all(&mut self, events: impl IntoIterator<Item = E>) {
        for event in events {
            self.publish(event);
        }
    }

    /// Takes every event waiting in the subscriber's mailbox, oldest first.
    ///
    /// Unknown subscriptions yield an empty batch.
    pub fn drain(&mut self, subscription: &Subscription) -> Vec<E> {
        self.mailboxes
            .iter_mut()
            .find(|mailbox| mailbox.key == subscription.0)
            .map(|mailbox| mailbox.pending.drain(..).collect())
            .unwrap_or_default()
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.mailboxes.len()
    }
}
