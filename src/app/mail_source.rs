// SmtpView - app/mail_source.rs
//
// Mail event source: called by the mail persistence collaborator once a
// message is fully written, publishes its rendered content.

use std::sync::Arc;

use crate::app::publisher::{DeliveryReport, EventPublisher};
use crate::core::event::{Event, MailModel};

/// Publishes `MailReceived` events.
#[derive(Debug, Clone)]
pub struct MailSource {
    publisher: Arc<EventPublisher>,
}

impl MailSource {
    pub fn new(publisher: Arc<EventPublisher>) -> Self {
        Self { publisher }
    }

    /// A message has been saved; show its fully rendered content.
    pub fn notify_mail_saved(&self, rendered: impl Into<String>) -> DeliveryReport {
        self.publisher.publish(Event::MailReceived {
            rendered: rendered.into(),
        })
    }

    /// Same as [`Self::notify_mail_saved`], from a structured model.
    pub fn notify_model_saved(&self, mail: &MailModel) -> DeliveryReport {
        tracing::debug!(
            from = %mail.from,
            recipients = mail.to.len(),
            subject = mail.subject.as_deref().unwrap_or(""),
            bytes = mail.rendered.len(),
            "Mail saved"
        );
        self.notify_mail_saved(mail.rendered.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::display::{LogsBuffer, MailBuffer};
    use chrono::Local;

    #[test]
    fn test_mail_reaches_mail_pane_only() {
        let publisher = Arc::new(EventPublisher::new());
        let logs = Arc::new(LogsBuffer::new());
        let last = Arc::new(MailBuffer::new());
        publisher.subscribe(logs.clone());
        publisher.subscribe(last.clone());

        let source = MailSource::new(publisher);
        let report = source.notify_model_saved(&MailModel {
            received_at: Local::now(),
            from: "alice@example.com".into(),
            to: vec!["bob@example.com".into()],
            subject: Some("Hi".into()),
            rendered: "From: alice@example.com\r\nSubject: Hi\r\n\r\nHello Bob".into(),
        });

        assert_eq!(report.delivered, 2);
        assert_eq!(
            last.content(),
            "From: alice@example.com\r\nSubject: Hi\r\n\r\nHello Bob"
        );
        assert_eq!(logs.content(), "");
    }
}
