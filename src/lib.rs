//! # Postbox
//!
//! Postbox is a minimal, SMTP-inspired mail transfer server with
//! file-backed mailboxes, plus a client that speaks the same protocol.
//!
//! Delivered messages are persisted under a per-recipient directory and can
//! be listed and read back over the same connection-oriented, line-based
//! protocol used to send them.
//!
//! ## Quick Start
//!
//! ```rust
//! use postbox::{SmtpClient, SmtpServer};
//! use std::net::TcpListener;
//! use std::thread;
//!
//! // Create and start server
//! let listener = TcpListener::bind("127.0.0.1:0").unwrap();
//! let addr = listener.local_addr().unwrap().to_string();
//! let server = SmtpServer::new(std::env::temp_dir().join("postbox-doc-mailbox"));
//!
//! thread::spawn(move || {
//!     server.start_with_listener(listener).unwrap();
//! });
//!
//! // Send a message, then query it back
//! let client = SmtpClient::new(&addr);
//! client.send_email("alice@x", "bob@x", "hello", "hi there").unwrap();
//!
//! let listing = client.list_emails("bob@x").unwrap();
//! assert!(listing.contains("hello"));
//! ```
//!
//! ## Supported commands
//!
//! - `HELO <id>` - Greet; valid in any state, abandons any transaction
//! - `MAIL FROM: <sender>` - Declare the sender identity
//! - `RCPT TO: <recipient>` - Declare the recipient identity
//! - `DATA` - Begin a message
//! - `FILENAME: <subject>` - Declare the subject key (no reply)
//! - `.` - Finalize and persist the buffered message
//! - `LIST EMAILS: <recipient>` - List stored subject keys (any state)
//! - `READ EMAIL: <recipient>: <subject>` - Read one stored email (any state)
//! - `QUIT` - Close connection
//!
//! ## Storage
//!
//! Each message is one file, `<root>/<recipient>/<subject>.txt`, holding
//! sender, recipient, and body. Writing the same `(recipient, subject)`
//! pair twice overwrites the first message: last write wins, no versioning.
//! Identities and subjects become path segments and are rejected if they
//! contain path separators or traversal sequences.
//!
//! ## Notes
//!
//! - SMTP authentication is not supported.
//! - SSL/TLS connection is not supported.
//! - Mail relay and queuing/retry are not supported.
//! - One thread per connection; no read timeouts or connection cap.
//!
//! ## Size Limits
//!
//! The server enforces RFC 821-derived limits:
//! - Command lines: 512 characters max
//! - Body text lines: 1000 characters max
//! - Identity and subject names: 128 characters max
//! - Message bodies: 10 MB max

mod smtp;

pub use smtp::{
    Email, MailboxStore, SmtpClient, SmtpError, SmtpLimits, SmtpResponse, SmtpServer,
    SmtpSession, SmtpState,
};
