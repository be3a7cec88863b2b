//! Error types for the mail server

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SmtpError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid command")]
    InvalidCommand,

    #[error("Invalid state for command")]
    InvalidState(String),

    #[error("Missing sender, recipient, or filename")]
    MissingFields,

    #[error("Mailbox not found for {recipient}")]
    MailboxNotFound { recipient: String },

    #[error("Email {subject} not found for {recipient}")]
    EmailNotFound { recipient: String, subject: String },

    #[error("Invalid read command format")]
    BadReadFormat,

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Line too long (max {max} characters)")]
    LineTooLong { max: usize },

    #[error("Name too long (max {max} characters)")]
    NameTooLong { max: usize },

    #[error("Too much message data (max {max} bytes)")]
    TooMuchData { max: usize },

    #[error("Unexpected reply: {0}")]
    UnexpectedReply(String),

    #[error("Connection closed unexpectedly")]
    ConnectionClosed,
}

/// Size limits enforced by the server, derived from RFC 821
pub struct SmtpLimits;

impl SmtpLimits {
    /// Maximum length of a command line including CRLF
    pub const COMMAND_LINE_MAX_LENGTH: usize = 512;

    /// Maximum length of a body text line including CRLF
    pub const TEXT_LINE_MAX_LENGTH: usize = 1000;

    /// Maximum length of an identity or subject key
    pub const NAME_MAX_LENGTH: usize = 128;

    /// Maximum total size of message body data
    pub const MAX_DATA_SIZE: usize = 10 * 1024 * 1024; // 10MB
}

/// Maps errors to wire response codes and messages
impl SmtpError {
    pub fn to_response_code(&self) -> &'static str {
        match self {
            SmtpError::Io(_) => "421",
            SmtpError::ConnectionClosed => "421",
            _ => "500",
        }
    }

    pub fn to_response_message(&self) -> String {
        match self {
            SmtpError::Io(_) => "Service not available".to_string(),
            SmtpError::ConnectionClosed => "Connection closed".to_string(),
            SmtpError::MissingFields => {
                "Error: Missing sender, recipient, or filename".to_string()
            }
            SmtpError::MailboxNotFound { .. } => {
                "Error: Recipient mailbox not found".to_string()
            }
            SmtpError::EmailNotFound { recipient, subject } => {
                format!("Error: Email {subject} not found for {recipient}")
            }
            SmtpError::BadReadFormat => {
                "Error: Invalid command format for reading email".to_string()
            }
            SmtpError::LineTooLong { max } => format!("Line too long (max {max} characters)"),
            SmtpError::NameTooLong { max } => format!("Name too long (max {max} characters)"),
            SmtpError::TooMuchData { max } => {
                format!("Too much message data (max {max} bytes)")
            }
            // Sequencing errors, unknown commands, and rejected names all
            // collapse to the generic syntax error on the wire.
            SmtpError::InvalidCommand
            | SmtpError::InvalidState(_)
            | SmtpError::InvalidName(_)
            | SmtpError::UnexpectedReply(_) => "Syntax error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequencing_errors_are_generic_syntax_errors() {
        let err = SmtpError::InvalidState("RCPT before MAIL".to_string());
        assert_eq!(err.to_response_code(), "500");
        assert_eq!(err.to_response_message(), "Syntax error");

        let err = SmtpError::InvalidCommand;
        assert_eq!(err.to_response_code(), "500");
        assert_eq!(err.to_response_message(), "Syntax error");
    }

    #[test]
    fn test_missing_fields_message() {
        let err = SmtpError::MissingFields;
        assert_eq!(err.to_response_code(), "500");
        assert_eq!(
            err.to_response_message(),
            "Error: Missing sender, recipient, or filename"
        );
    }

    #[test]
    fn test_not_found_messages() {
        let err = SmtpError::MailboxNotFound {
            recipient: "nobody".to_string(),
        };
        assert_eq!(
            err.to_response_message(),
            "Error: Recipient mailbox not found"
        );

        let err = SmtpError::EmailNotFound {
            recipient: "bob".to_string(),
            subject: "hello".to_string(),
        };
        assert_eq!(
            err.to_response_message(),
            "Error: Email hello not found for bob"
        );
    }

    #[test]
    fn test_io_errors_are_transient() {
        let err = SmtpError::Io(std::io::Error::other("disk gone"));
        assert_eq!(err.to_response_code(), "421");
        assert_eq!(err.to_response_message(), "Service not available");
    }
}
