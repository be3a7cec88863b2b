//! Durable per-recipient mailbox storage

use crate::smtp::email::Email;
use crate::smtp::error::{SmtpError, SmtpLimits};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Filesystem-backed mailbox store.
///
/// Each recipient owns a directory under the store root; each message is one
/// file named `<subject>.txt` inside it. Writes to the same `(recipient,
/// subject)` pair overwrite each other, last write wins. No locking is done
/// beyond what the filesystem provides for single-file writes.
#[derive(Debug, Clone)]
pub struct MailboxStore {
    /// Root directory holding all recipient mailboxes
    root: PathBuf,
}

impl MailboxStore {
    /// Create a store rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Create the store root if absent (idempotent)
    pub fn ensure_root(&self) -> Result<(), SmtpError> {
        fs::create_dir_all(&self.root)?;
        Ok(())
    }

    /// Create the mailbox directory for a recipient if absent (idempotent)
    pub fn ensure_mailbox(&self, recipient: &str) -> Result<PathBuf, SmtpError> {
        Self::validate_name(recipient)?;
        let dir = self.root.join(recipient);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Persist an email under `(recipient, subject)`, creating the mailbox
    /// if needed. Overwrites any prior message with the same subject.
    pub fn put(&self, email: &Email) -> Result<(), SmtpError> {
        Self::validate_name(&email.subject)?;
        let dir = self.ensure_mailbox(&email.to)?;
        fs::write(dir.join(Self::file_name(&email.subject)), email.encode())?;
        Ok(())
    }

    /// List the subject keys stored for a recipient, in enumeration order.
    ///
    /// A recipient that never received mail has no mailbox directory and
    /// yields `MailboxNotFound`; an existing empty mailbox yields an empty
    /// vec.
    pub fn list(&self, recipient: &str) -> Result<Vec<String>, SmtpError> {
        Self::validate_name(recipient)?;
        let dir = self.root.join(recipient);

        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SmtpError::MailboxNotFound {
                    recipient: recipient.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        let mut subjects = Vec::new();
        for entry in entries {
            let name = entry?.file_name();
            let name = name.to_string_lossy();
            if let Some(subject) = name.strip_suffix(".txt") {
                subjects.push(subject.to_string());
            }
        }
        Ok(subjects)
    }

    /// Fetch the stored email for `(recipient, subject)`
    pub fn get(&self, recipient: &str, subject: &str) -> Result<Email, SmtpError> {
        Self::validate_name(recipient)?;
        Self::validate_name(subject)?;
        let path = self.root.join(recipient).join(Self::file_name(subject));

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(SmtpError::EmailNotFound {
                    recipient: recipient.to_string(),
                    subject: subject.to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        };

        Email::decode(subject, &content).ok_or_else(|| {
            SmtpError::Io(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("corrupt record at {}", path.display()),
            ))
        })
    }

    /// Validate an identity or subject before it becomes a path segment.
    ///
    /// Names are opaque strings but land on the filesystem, so anything
    /// that could escape the store root is rejected.
    pub fn validate_name(name: &str) -> Result<(), SmtpError> {
        if name.is_empty() || name == "." || name == ".." {
            return Err(SmtpError::InvalidName(name.to_string()));
        }
        if name.len() > SmtpLimits::NAME_MAX_LENGTH {
            return Err(SmtpError::NameTooLong {
                max: SmtpLimits::NAME_MAX_LENGTH,
            });
        }
        if name.contains(['/', '\\', '\0']) {
            return Err(SmtpError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    fn file_name(subject: &str) -> String {
        format!("{subject}.txt")
    }
}
