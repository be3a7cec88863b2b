//! SMTP-inspired mail transfer protocol implementation

pub mod client;
pub mod commands;
pub mod email;
pub mod error;
pub mod mailbox;
pub mod response;
pub mod server;
pub mod session;

pub use client::SmtpClient;
pub use email::Email;
pub use error::{SmtpError, SmtpLimits};
pub use mailbox::MailboxStore;
pub use response::SmtpResponse;
pub use server::SmtpServer;
pub use session::{SmtpSession, SmtpState};
