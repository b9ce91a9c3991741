// SmtpView - app/publisher.rs
//
// Process-wide broadcast point between event producers (logging bridge,
// mail source, clear source) and display subscribers.
//
// Rules:
//   - Delivery is synchronous on the publishing thread, in registration order.
//   - Publications are serialised by a delivery lock, so every subscriber
//     sees the same global order of events.
//   - A subscriber that returns an error or panics is logged and skipped;
//     the remaining subscribers still receive the event and nothing reaches
//     the producer.
//   - Subscribers are registered at start-up and never removed.
//   - Records emitted while delivering are never captured on the delivering
//     thread, so a capture sink whose component covers this module cannot
//     re-enter `publish`.

use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use crate::core::event::Event;
use crate::util::error::HandlerError;
use crate::util::logging::without_capture;

/// Something that reacts to published events.
///
/// `handle` runs on the producer's thread and must return quickly. It must
/// not publish from inside `handle`: the delivery lock is not re-entrant.
pub trait Subscriber: Send + Sync {
    fn handle(&self, event: &Event) -> Result<(), HandlerError>;

    /// Name used in diagnostics.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Per-publication delivery counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Subscribers that handled the event successfully.
    pub delivered: usize,
    /// Subscribers that returned an error or panicked.
    pub failed: usize,
}

/// Ordered registry of subscribers with synchronous fan-out.
#[derive(Default)]
pub struct EventPublisher {
    subscribers: RwLock<Vec<Arc<dyn Subscriber>>>,
    delivery: Mutex<()>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber. Registering the same subscriber twice delivers
    /// every event to it twice.
    pub fn subscribe(&self, subscriber: Arc<dyn Subscriber>) {
        tracing::debug!(subscriber = subscriber.name(), "Subscriber registered");
        self.subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(subscriber);
    }

    /// Number of registered subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Deliver `event` to every subscriber, in registration order.
    ///
    /// Capture sinks are suppressed on this thread while subscribers run, and
    /// failures are only logged once the delivery lock is released, so a
    /// captured diagnostic never re-enters a delivery in progress.
    pub fn publish(&self, event: Event) -> DeliveryReport {
        let (report, failures) = without_capture(|| self.deliver(&event));

        for failure in &failures {
            match failure {
                Failure::Error { subscriber, error } => tracing::warn!(
                    subscriber = *subscriber,
                    event = event.kind().label(),
                    error = %error,
                    "Subscriber failed to handle event"
                ),
                Failure::Panic { subscriber, message } => tracing::error!(
                    subscriber = *subscriber,
                    event = event.kind().label(),
                    panic = message.as_str(),
                    "Subscriber panicked while handling event"
                ),
            }
        }
        tracing::trace!(
            event = event.kind().label(),
            delivered = report.delivered,
            failed = report.failed,
            "Event published"
        );
        report
    }

    fn deliver(&self, event: &Event) -> (DeliveryReport, Vec<Failure>) {
        let _order = self.delivery.lock().unwrap_or_else(PoisonError::into_inner);

        let subscribers: Vec<Arc<dyn Subscriber>> = self
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        let mut report = DeliveryReport::default();
        let mut failures = Vec::new();
        for subscriber in &subscribers {
            match panic::catch_unwind(AssertUnwindSafe(|| subscriber.handle(event))) {
                Ok(Ok(())) => report.delivered += 1,
                Ok(Err(error)) => {
                    report.failed += 1;
                    failures.push(Failure::Error {
                        subscriber: subscriber.name(),
                        error,
                    });
                }
                Err(payload) => {
                    report.failed += 1;
                    failures.push(Failure::Panic {
                        subscriber: subscriber.name(),
                        message: panic_message(payload.as_ref()).to_string(),
                    });
                }
            }
        }
        (report, failures)
    }
}

/// A subscriber failure, held until the delivery lock is released.
enum Failure {
    Error {
        subscriber: &'static str,
        error: HandlerError,
    },
    Panic {
        subscriber: &'static str,
        message: String,
    },
}

impl std::fmt::Debug for EventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventPublisher")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "<non-string panic payload>"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::EventKind;

    /// Records the kinds it sees, tagged with its own id.
    struct Tagged {
        id: usize,
        seen: Arc<Mutex<Vec<(usize, EventKind)>>>,
    }

    impl Subscriber for Tagged {
        fn handle(&self, event: &Event) -> Result<(), HandlerError> {
            self.seen.lock().unwrap().push((self.id, event.kind()));
            Ok(())
        }
    }

    struct Panics;

    impl Subscriber for Panics {
        fn handle(&self, _event: &Event) -> Result<(), HandlerError> {
            panic!("display went away");
        }

        fn name(&self) -> &'static str {
            "panics"
        }
    }

    struct Fails;

    impl Subscriber for Fails {
        fn handle(&self, _event: &Event) -> Result<(), HandlerError> {
            Err(HandlerError::Other {
                subscriber: "fails".into(),
                reason: "nope".into(),
            })
        }
    }

    #[test]
    fn test_publish_without_subscribers_is_a_no_op() {
        let publisher = EventPublisher::new();
        assert_eq!(publisher.publish(Event::ClearAll), DeliveryReport::default());
    }

    #[test]
    fn test_delivery_follows_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let publisher = EventPublisher::new();
        for id in 0..3 {
            publisher.subscribe(Arc::new(Tagged {
                id,
                seen: Arc::clone(&seen),
            }));
        }

        publisher.publish(Event::ClearAll);
        publisher.publish(Event::log_line("x"));

        let seen = seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![
                (0, EventKind::ClearAll),
                (1, EventKind::ClearAll),
                (2, EventKind::ClearAll),
                (0, EventKind::LogLine),
                (1, EventKind::LogLine),
                (2, EventKind::LogLine),
            ]
        );
    }

    #[test]
    fn test_duplicate_registration_delivers_twice() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let publisher = EventPublisher::new();
        let sub: Arc<dyn Subscriber> = Arc::new(Tagged {
            id: 7,
            seen: Arc::clone(&seen),
        });
        publisher.subscribe(Arc::clone(&sub));
        publisher.subscribe(sub);

        let report = publisher.publish(Event::ClearAll);
        assert_eq!(report.delivered, 2);
        assert_eq!(seen.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_failing_subscribers_do_not_block_the_rest() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let publisher = EventPublisher::new();
        publisher.subscribe(Arc::new(Panics));
        publisher.subscribe(Arc::new(Fails));
        publisher.subscribe(Arc::new(Tagged {
            id: 1,
            seen: Arc::clone(&seen),
        }));

        let report = publisher.publish(Event::ClearAll);
        assert_eq!(report, DeliveryReport { delivered: 1, failed: 2 });
        assert_eq!(seen.lock().unwrap().len(), 1);

        // The publisher keeps working after a panic.
        let report = publisher.publish(Event::ClearAll);
        assert_eq!(report.delivered, 1);
    }

    #[test]
    fn test_concurrent_publishers_deliver_every_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let publisher = Arc::new(EventPublisher::new());
        publisher.subscribe(Arc::new(Tagged {
            id: 0,
            seen: Arc::clone(&seen),
        }));

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let publisher = Arc::clone(&publisher);
                std::thread::spawn(move || {
                    for _ in 0..25 {
                        publisher.publish(Event::log_line("tick"));
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }

        assert_eq!(seen.lock().unwrap().len(), 100);
    }
}
