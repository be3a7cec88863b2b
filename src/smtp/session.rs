//! Per-connection session state management

use crate::smtp::email::Email;
use crate::smtp::error::{SmtpError, SmtpLimits};

/// Represents the current state of a protocol session
#[derive(Debug, Clone, PartialEq)]
pub enum SmtpState {
    /// Initial state - waiting for HELO
    Init,
    /// HELO received - ready for MAIL FROM
    Greeted,
    /// MAIL FROM received - ready for RCPT TO
    MailFromSet,
    /// RCPT TO received - ready for DATA
    RcptToSet,
    /// DATA received - waiting for the FILENAME line
    WaitingForFilename,
    /// FILENAME received - collecting body lines until a lone "."
    CollectingBody,
}

/// Manages the state and buffered message for a single connection.
///
/// Owned exclusively by the connection worker and discarded when it exits.
#[derive(Debug)]
pub struct SmtpSession {
    /// Current state of the session
    pub state: SmtpState,
    /// Sender identity from MAIL FROM
    pub sender: Option<String>,
    /// Recipient identity from RCPT TO
    pub recipient: Option<String>,
    /// Subject key from FILENAME
    pub subject: Option<String>,
    /// Body lines collected so far
    pub body: Vec<String>,
    /// Total size of body data collected so far
    pub body_size: usize,
}

impl SmtpSession {
    /// Create a new session
    pub fn new() -> Self {
        Self {
            state: SmtpState::Init,
            sender: None,
            recipient: None,
            subject: None,
            body: Vec::new(),
            body_size: 0,
        }
    }

    /// Reset to the greeted state, dropping any in-progress transaction.
    ///
    /// Used by HELO (accepted in any state) and after each finalize, whether
    /// it persisted a message or failed with missing fields.
    pub fn reset(&mut self) {
        self.state = SmtpState::Greeted;
        self.sender = None;
        self.recipient = None;
        self.subject = None;
        self.body.clear();
        self.body_size = 0;
    }

    /// Set the sender identity
    pub fn set_sender(&mut self, sender: String) -> Result<(), SmtpError> {
        if self.state != SmtpState::Greeted {
            return Err(SmtpError::InvalidState(
                "MAIL FROM requires HELO first".to_string(),
            ));
        }

        self.sender = Some(sender);
        self.state = SmtpState::MailFromSet;
        Ok(())
    }

    /// Set the recipient identity
    pub fn set_recipient(&mut self, recipient: String) -> Result<(), SmtpError> {
        if self.state != SmtpState::MailFromSet {
            return Err(SmtpError::InvalidState(
                "RCPT TO requires MAIL FROM first".to_string(),
            ));
        }

        self.recipient = Some(recipient);
        self.state = SmtpState::RcptToSet;
        Ok(())
    }

    /// Begin the DATA phase, waiting for the subject line
    pub fn start_data(&mut self) -> Result<(), SmtpError> {
        if self.state != SmtpState::RcptToSet {
            return Err(SmtpError::InvalidState(
                "DATA requires RCPT TO first".to_string(),
            ));
        }

        self.state = SmtpState::WaitingForFilename;
        Ok(())
    }

    /// Set the subject key and start collecting body lines.
    ///
    /// Clears any body lines buffered by an earlier, abandoned transaction.
    pub fn set_subject(&mut self, subject: String) -> Result<(), SmtpError> {
        if self.state != SmtpState::WaitingForFilename {
            return Err(SmtpError::InvalidState(
                "FILENAME requires DATA first".to_string(),
            ));
        }

        self.subject = Some(subject);
        self.body.clear();
        self.body_size = 0;
        self.state = SmtpState::CollectingBody;
        Ok(())
    }

    /// Whether body lines are currently being collected
    pub fn collecting_body(&self) -> bool {
        self.state == SmtpState::CollectingBody
    }

    /// Buffer one body line
    pub fn add_body_line(&mut self, line: String) -> Result<(), SmtpError> {
        if self.state != SmtpState::CollectingBody {
            return Err(SmtpError::InvalidState(
                "Not collecting body data".to_string(),
            ));
        }

        let line_size = line.len() + 2; // +2 for CRLF

        if line_size > SmtpLimits::TEXT_LINE_MAX_LENGTH {
            return Err(SmtpError::LineTooLong {
                max: SmtpLimits::TEXT_LINE_MAX_LENGTH,
            });
        }

        if self.body_size + line_size > SmtpLimits::MAX_DATA_SIZE {
            return Err(SmtpError::TooMuchData {
                max: SmtpLimits::MAX_DATA_SIZE,
            });
        }

        self.body.push(line);
        self.body_size += line_size;
        Ok(())
    }

    /// Finalize the buffered message on the terminating ".".
    ///
    /// Returns the completed email when sender, recipient, and subject are
    /// all set, or `MissingFields` otherwise. Either way the session resets
    /// to `Greeted` so the connection can start another send sequence.
    pub fn finish_message(&mut self) -> Result<Email, SmtpError> {
        let email = match (&self.sender, &self.recipient, &self.subject) {
            (Some(sender), Some(recipient), Some(subject)) => Email::new(
                sender.clone(),
                recipient.clone(),
                subject.clone(),
                self.body.join("\n"),
            ),
            _ => {
                self.reset();
                return Err(SmtpError::MissingFields);
            }
        };

        self.reset();
        Ok(email)
    }
}

impl Default for SmtpSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn greeted_session() -> SmtpSession {
        let mut session = SmtpSession::new();
        session.reset();
        session
    }

    #[test]
    fn test_new_session() {
        let session = SmtpSession::new();
        assert_eq!(session.state, SmtpState::Init);
        assert!(session.sender.is_none());
        assert!(session.recipient.is_none());
        assert!(session.subject.is_none());
        assert!(session.body.is_empty());
        assert_eq!(session.body_size, 0);
    }

    #[test]
    fn test_send_sequence_transitions() {
        let mut session = greeted_session();

        session.set_sender("alice".to_string()).unwrap();
        assert_eq!(session.state, SmtpState::MailFromSet);

        session.set_recipient("bob".to_string()).unwrap();
        assert_eq!(session.state, SmtpState::RcptToSet);

        session.start_data().unwrap();
        assert_eq!(session.state, SmtpState::WaitingForFilename);

        session.set_subject("greeting".to_string()).unwrap();
        assert_eq!(session.state, SmtpState::CollectingBody);
        assert!(session.collecting_body());
    }

    #[test]
    fn test_out_of_order_commands_rejected() {
        let mut session = SmtpSession::new();

        // Nothing but HELO is valid from Init
        assert!(matches!(
            session.set_sender("alice".to_string()),
            Err(SmtpError::InvalidState(_))
        ));
        assert!(matches!(
            session.set_recipient("bob".to_string()),
            Err(SmtpError::InvalidState(_))
        ));
        assert!(matches!(session.start_data(), Err(SmtpError::InvalidState(_))));
        assert_eq!(session.state, SmtpState::Init);

        // RCPT before MAIL
        let mut session = greeted_session();
        assert!(matches!(
            session.set_recipient("bob".to_string()),
            Err(SmtpError::InvalidState(_))
        ));
        assert_eq!(session.state, SmtpState::Greeted);

        // DATA before RCPT
        session.set_sender("alice".to_string()).unwrap();
        assert!(matches!(session.start_data(), Err(SmtpError::InvalidState(_))));
        assert_eq!(session.state, SmtpState::MailFromSet);
    }

    #[test]
    fn test_body_collection_and_finish() {
        let mut session = greeted_session();
        session.set_sender("alice".to_string()).unwrap();
        session.set_recipient("bob".to_string()).unwrap();
        session.start_data().unwrap();
        session.set_subject("greeting".to_string()).unwrap();

        session.add_body_line("hi there".to_string()).unwrap();
        session.add_body_line("".to_string()).unwrap();
        session.add_body_line("second paragraph".to_string()).unwrap();

        let email = session.finish_message().unwrap();
        assert_eq!(email.from, "alice");
        assert_eq!(email.to, "bob");
        assert_eq!(email.subject, "greeting");
        assert_eq!(email.body, "hi there\n\nsecond paragraph");

        // Session is back at Greeted with the transaction cleared
        assert_eq!(session.state, SmtpState::Greeted);
        assert!(session.sender.is_none());
        assert!(session.recipient.is_none());
        assert!(session.subject.is_none());
        assert!(session.body.is_empty());
    }

    #[test]
    fn test_filename_clears_buffered_body() {
        let mut session = greeted_session();
        session.set_sender("alice".to_string()).unwrap();
        session.set_recipient("bob".to_string()).unwrap();
        session.start_data().unwrap();
        session.body.push("stale line".to_string());
        session.body_size = 12;

        session.set_subject("fresh".to_string()).unwrap();
        assert!(session.body.is_empty());
        assert_eq!(session.body_size, 0);
    }

    #[test]
    fn test_finish_without_subject_is_missing_fields() {
        let mut session = greeted_session();
        session.set_sender("alice".to_string()).unwrap();
        session.set_recipient("bob".to_string()).unwrap();

        let result = session.finish_message();
        assert!(matches!(result, Err(SmtpError::MissingFields)));
        assert_eq!(session.state, SmtpState::Greeted);

        // A correct sequence still works afterwards
        session.set_sender("alice".to_string()).unwrap();
        session.set_recipient("bob".to_string()).unwrap();
        session.start_data().unwrap();
        session.set_subject("retry".to_string()).unwrap();
        session.add_body_line("ok".to_string()).unwrap();
        assert!(session.finish_message().is_ok());
    }

    #[test]
    fn test_helo_reset_abandons_transaction() {
        let mut session = greeted_session();
        session.set_sender("alice".to_string()).unwrap();
        session.set_recipient("bob".to_string()).unwrap();

        session.reset();

        assert_eq!(session.state, SmtpState::Greeted);
        assert!(session.sender.is_none());
        assert!(session.recipient.is_none());
    }

    #[test]
    fn test_body_line_too_long() {
        let mut session = greeted_session();
        session.set_sender("alice".to_string()).unwrap();
        session.set_recipient("bob".to_string()).unwrap();
        session.start_data().unwrap();
        session.set_subject("long".to_string()).unwrap();

        let long_line = "a".repeat(SmtpLimits::TEXT_LINE_MAX_LENGTH + 1);
        let result = session.add_body_line(long_line);
        assert!(matches!(result, Err(SmtpError::LineTooLong { .. })));
    }

    #[test]
    fn test_body_line_outside_collection_rejected() {
        let mut session = greeted_session();
        let result = session.add_body_line("stray".to_string());
        assert!(matches!(result, Err(SmtpError::InvalidState(_))));
    }
}
