//! Email data structures and storage encoding

/// Represents one delivered email message
#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    /// The sender's identity
    pub from: String,

    /// The recipient's identity
    pub to: String,

    /// The subject key the message is filed under
    pub subject: String,

    /// The message body, newline-joined
    pub body: String,
}

impl Email {
    /// Create a new email
    pub fn new(from: String, to: String, subject: String, body: String) -> Self {
        Self {
            from,
            to,
            subject,
            body,
        }
    }

    /// Encode the email for durable storage.
    ///
    /// The format is two header lines, a blank separator, then the body:
    ///
    /// ```text
    /// From: <sender>
    /// To: <recipient>
    ///
    /// <body>
    /// ```
    pub fn encode(&self) -> String {
        format!("From: {}\nTo: {}\n\n{}", self.from, self.to, self.body)
    }

    /// Decode a stored record back into an email.
    ///
    /// The subject is not part of the record; it comes from the storage key.
    /// Returns `None` when the record does not carry both headers and the
    /// blank separator line.
    pub fn decode(subject: &str, content: &str) -> Option<Self> {
        let (headers, body) = content.split_once("\n\n")?;
        let mut lines = headers.lines();
        let from = lines.next()?.strip_prefix("From: ")?;
        let to = lines.next()?.strip_prefix("To: ")?;

        Some(Self {
            from: from.to_string(),
            to: to.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        })
    }

    /// Get the size of the message body in bytes
    pub fn body_size(&self) -> usize {
        self.body.len()
    }
}
