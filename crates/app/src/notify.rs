use std::sync::mpsc;

use scrubline_state::cue::CuePoint;

use crate::host::AdInfo;

/// Player, ad and locale events the seek bar reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    AdStarted(AdInfo),
    AdStopped,
    /// Replaces the whole cue list.
    CuePointsChanged(Vec<CuePoint>),
    Loaded,
    Unloading,
    LocaleChanged,
    TimeUpdate,
}

/// Fan-out of notifications to any number of subscribers.
#[derive(Default)]
pub struct NotificationBus {
    subscribers: Vec<mpsc::Sender<Notification>>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        Subscription { rx }
    }

    /// Delivers to every live subscriber. Dropped subscriptions are pruned here.
    pub fn publish(&mut self, notification: Notification) {
        self.subscribers
            .retain(|tx| tx.send(notification.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Receiving end of a bus registration. Dropping it deregisters.
pub struct Subscription {
    rx: mpsc::Receiver<Notification>,
}

impl Subscription {
    pub fn drain(&self) -> Vec<Notification> {
        self.rx.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_subscriber_sees_each_notification_in_order() {
        let mut bus = NotificationBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(Notification::Loaded);
        bus.publish(Notification::AdStopped);

        assert_eq!(a.drain(), vec![Notification::Loaded, Notification::AdStopped]);
        assert_eq!(b.drain(), vec![Notification::Loaded, Notification::AdStopped]);
        assert!(a.drain().is_empty());
    }

    #[test]
    fn dropped_subscription_is_pruned_on_publish() {
        let mut bus = NotificationBus::new();
        let keep = bus.subscribe();
        let gone = bus.subscribe();
        drop(gone);
        assert_eq!(bus.subscriber_count(), 2);

        bus.publish(Notification::TimeUpdate);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.drain(), vec![Notification::TimeUpdate]);
    }
}
