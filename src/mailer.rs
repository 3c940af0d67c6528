use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub message_id: String,
}

/// Outbound mail stand-in.
///
/// Messages are logged and kept in an in-memory outbox instead of being
/// delivered.
#[derive(Clone, Default)]
pub struct Mailer {
    outbox: Arc<Mutex<Vec<SentEmail>>>,
}

impl Mailer {
    pub fn send(&self, to: &str, subject: &str, body: String) -> SentEmail {
        let email = SentEmail {
            to: to.to_string(),
            subject: subject.to_string(),
            body,
            message_id: format!("local_email_{}", uuid::Uuid::new_v4()),
        };
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            message_id = %email.message_id,
            bytes = email.body.len(),
            "Queued email"
        );

        self.outbox.lock().push(email.clone());
        email
    }

    /// Every message sent so far, oldest first.
    #[cfg(test)]
    pub fn sent(&self) -> Vec<SentEmail> {
        self.outbox.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_records_in_outbox() {
        let mailer = Mailer::default();
        let first = mailer.send("a@example.com", "Hello", "body one".to_string());
        mailer.clone().send("b@example.com", "Again", "body two".to_string());

        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], first);
        assert_eq!(sent[1].to, "b@example.com");
        assert!(first.message_id.starts_with("local_email_"));
    }
}
