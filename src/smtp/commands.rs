//! Implementation of the protocol commands

use crate::smtp::error::{SmtpError, SmtpLimits};
use crate::smtp::mailbox::MailboxStore;
use crate::smtp::response::SmtpResponse;
use crate::smtp::session::SmtpSession;

/// Parses command lines, drives session transitions, and answers mailbox
/// queries against the store.
#[derive(Debug)]
pub struct SmtpCommandHandler<'a> {
    store: &'a MailboxStore,
}

impl<'a> SmtpCommandHandler<'a> {
    /// Create a new command handler backed by the given store
    pub fn new(store: &'a MailboxStore) -> Self {
        Self { store }
    }

    /// Process one command line and return its response.
    ///
    /// Commands are matched by case-sensitive prefix; arguments are the text
    /// after the first colon, trimmed. `Ok(None)` means the line was
    /// accepted but produces no reply (the FILENAME line). Body lines and
    /// the "." terminator never reach this method; the connection handler
    /// routes them straight to the session.
    pub fn process_command(
        &self,
        line: &str,
        session: &mut SmtpSession,
    ) -> Result<Option<SmtpResponse>, SmtpError> {
        if line.len() > SmtpLimits::COMMAND_LINE_MAX_LENGTH {
            return Err(SmtpError::LineTooLong {
                max: SmtpLimits::COMMAND_LINE_MAX_LENGTH,
            });
        }

        if line.starts_with("HELO") {
            // Valid in any state; abandons any transaction in progress.
            session.reset();
            Ok(Some(SmtpResponse::hello()))
        } else if line.starts_with("MAIL FROM:") {
            let sender = Self::argument(line);
            MailboxStore::validate_name(&sender)?;
            session.set_sender(sender)?;
            Ok(Some(SmtpResponse::ok()))
        } else if line.starts_with("RCPT TO:") {
            let recipient = Self::argument(line);
            MailboxStore::validate_name(&recipient)?;
            session.set_recipient(recipient)?;
            Ok(Some(SmtpResponse::ok()))
        } else if line.starts_with("DATA") {
            session.start_data()?;
            Ok(Some(SmtpResponse::data_start()))
        } else if line.starts_with("FILENAME:") {
            let subject = Self::argument(line);
            MailboxStore::validate_name(&subject)?;
            session.set_subject(subject)?;
            Ok(None)
        } else if line.starts_with("LIST EMAILS:") {
            self.handle_list(line).map(Some)
        } else if line.starts_with("READ EMAIL:") {
            self.handle_read(line).map(Some)
        } else if line == "QUIT" {
            Ok(Some(SmtpResponse::bye()))
        } else {
            Err(SmtpError::InvalidCommand)
        }
    }

    /// Handle a LIST EMAILS query; valid in any state, touches no session
    fn handle_list(&self, line: &str) -> Result<SmtpResponse, SmtpError> {
        let recipient = Self::argument(line);
        let subjects = self.store.list(&recipient)?;
        Ok(SmtpResponse::email_list(&recipient, &subjects))
    }

    /// Handle a READ EMAIL query; valid in any state, touches no session
    fn handle_read(&self, line: &str) -> Result<SmtpResponse, SmtpError> {
        let parts: Vec<&str> = line.split(':').collect();
        if parts.len() != 3 {
            return Err(SmtpError::BadReadFormat);
        }

        let recipient = parts[1].trim();
        let subject = parts[2].trim();
        let email = self.store.get(recipient, subject)?;
        Ok(SmtpResponse::email_content(email.encode()))
    }

    /// Extract the text after the first colon, trimmed
    fn argument(line: &str) -> String {
        match line.split_once(':') {
            Some((_, rest)) => rest.trim().to_string(),
            None => String::new(),
        }
    }
}
