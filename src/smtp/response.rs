//! Wire response handling

/// Represents a response that can be sent to a client
#[derive(Debug, Clone)]
pub struct SmtpResponse {
    /// The response code (e.g., "250", "354", "500")
    pub code: String,
    /// The human-readable message
    pub message: String,
    /// Optional payload block following the status line (list and read results)
    pub payload: Option<String>,
}

impl SmtpResponse {
    /// Create a new response
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            payload: None,
        }
    }

    /// Create a new response carrying a payload block
    pub fn with_payload(code: &str, message: &str, payload: String) -> Self {
        Self {
            code: code.to_owned(),
            message: message.to_owned(),
            payload: Some(payload),
        }
    }

    /// Create a success response (250 OK)
    pub fn ok() -> Self {
        Self::new("250", "OK")
    }

    /// Create the connection banner (220)
    pub fn ready() -> Self {
        Self::new("220", "Postbox Server Ready")
    }

    /// Create a HELO acknowledgement (250)
    pub fn hello() -> Self {
        Self::new("250", "Hello")
    }

    /// Create a DATA intermediate response (354)
    pub fn data_start() -> Self {
        Self::new("354", "End with '.' on a new line")
    }

    /// Create the finalize acknowledgement (250)
    pub fn accepted() -> Self {
        Self::new("250", "Message accepted")
    }

    /// Create a QUIT response (221)
    pub fn bye() -> Self {
        Self::new("221", "Bye")
    }

    /// Create a listing response for a recipient's subject keys (250)
    pub fn email_list(recipient: &str, subjects: &[String]) -> Self {
        if subjects.is_empty() {
            Self::new("250", &format!("No emails found for {recipient}"))
        } else {
            Self::with_payload(
                "250",
                &format!("List of emails for {recipient}:"),
                subjects.join("\n"),
            )
        }
    }

    /// Create a read response carrying the stored email content (250)
    pub fn email_content(content: String) -> Self {
        Self::with_payload("250", "Email content:", content)
    }

    /// Create an error response from a code and message
    pub fn error(code: &str, message: &str) -> Self {
        Self::new(code, message)
    }

    /// Format the response for sending over the wire
    pub fn format(&self) -> String {
        if let Some(ref payload) = self.payload {
            format!("{} {}\r\n{}\r\n", self.code, self.message, payload)
        } else {
            format!("{} {}\r\n", self.code, self.message)
        }
    }

    /// Check if this is a success response (2xx)
    pub fn is_success(&self) -> bool {
        self.code.starts_with('2')
    }

    /// Check if this is an error response (4xx or 5xx)
    pub fn is_error(&self) -> bool {
        self.code.starts_with('4') || self.code.starts_with('5')
    }
}
