//! Protocol client for sending, listing, and reading mail

use crate::smtp::error::SmtpError;

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpStream;

/// Client side of the protocol.
///
/// Opens one connection per operation. Query replies (`list_emails`,
/// `read_email`) can span several text lines and are collected with a
/// single read, mirroring the read-granularity framing of the wire
/// protocol's multi-line responses.
#[derive(Debug, Clone)]
pub struct SmtpClient {
    addr: String,
}

impl SmtpClient {
    /// Create a client for a server address like "127.0.0.1:2525"
    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.to_owned(),
        }
    }

    /// Send one message through the full HELO → MAIL FROM → RCPT TO → DATA
    /// → FILENAME → body → "." → QUIT exchange.
    ///
    /// Returns every server reply in order, for the caller to display.
    pub fn send_email(
        &self,
        sender: &str,
        recipient: &str,
        subject: &str,
        body: &str,
    ) -> Result<Vec<String>, SmtpError> {
        let (mut stream, mut reader, greeting) = self.connect()?;
        let mut replies = vec![greeting];

        replies.push(Self::command(&mut stream, &mut reader, "HELO client", "250")?);
        replies.push(Self::command(
            &mut stream,
            &mut reader,
            &format!("MAIL FROM: {sender}"),
            "250",
        )?);
        replies.push(Self::command(
            &mut stream,
            &mut reader,
            &format!("RCPT TO: {recipient}"),
            "250",
        )?);
        replies.push(Self::command(&mut stream, &mut reader, "DATA", "354")?);

        // FILENAME and body lines get no reply
        write!(stream, "FILENAME: {subject}\r\n")?;
        for line in body.lines() {
            write!(stream, "{line}\r\n")?;
        }
        stream.flush()?;

        replies.push(Self::command(&mut stream, &mut reader, ".", "250")?);
        replies.push(Self::command(&mut stream, &mut reader, "QUIT", "221")?);

        Ok(replies)
    }

    /// Ask the server for the subject keys stored for a recipient.
    ///
    /// Returns the raw reply text, success or error, for display.
    pub fn list_emails(&self, recipient: &str) -> Result<String, SmtpError> {
        self.query(&format!("LIST EMAILS: {recipient}"))
    }

    /// Ask the server for one stored email.
    ///
    /// Returns the raw reply text, success or error, for display.
    pub fn read_email(&self, recipient: &str, subject: &str) -> Result<String, SmtpError> {
        self.query(&format!("READ EMAIL: {recipient}: {subject}"))
    }

    /// Connect and consume the 220 banner
    fn connect(&self) -> Result<(TcpStream, BufReader<TcpStream>, String), SmtpError> {
        let stream = TcpStream::connect(&self.addr)?;
        let mut reader = BufReader::new(stream.try_clone()?);

        let mut greeting = String::new();
        if reader.read_line(&mut greeting)? == 0 {
            return Err(SmtpError::ConnectionClosed);
        }
        let greeting = greeting.trim().to_string();
        if !greeting.starts_with("220") {
            return Err(SmtpError::UnexpectedReply(greeting));
        }

        Ok((stream, reader, greeting))
    }

    /// Send one command line and read its single-line reply
    fn command(
        stream: &mut TcpStream,
        reader: &mut BufReader<TcpStream>,
        line: &str,
        expected_code: &str,
    ) -> Result<String, SmtpError> {
        write!(stream, "{line}\r\n")?;
        stream.flush()?;

        let mut reply = String::new();
        if reader.read_line(&mut reply)? == 0 {
            return Err(SmtpError::ConnectionClosed);
        }
        let reply = reply.trim().to_string();
        if !reply.starts_with(expected_code) {
            return Err(SmtpError::UnexpectedReply(reply));
        }
        Ok(reply)
    }

    /// Send one stateless query and collect its (possibly multi-line) reply
    fn query(&self, line: &str) -> Result<String, SmtpError> {
        let (mut stream, _reader, _greeting) = self.connect()?;

        write!(stream, "{line}\r\n")?;
        stream.flush()?;

        let mut buf = [0u8; 65536];
        let n = stream.read(&mut buf)?;
        if n == 0 {
            return Err(SmtpError::ConnectionClosed);
        }
        Ok(String::from_utf8_lossy(&buf[..n]).trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::smtp::server::SmtpServer;
    use std::net::TcpListener;
    use std::thread;
    use tempfile::TempDir;

    fn start_test_server() -> (String, TempDir) {
        let dir = TempDir::new().unwrap();
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        let server = SmtpServer::new(dir.path());

        thread::spawn(move || {
            if let Err(e) = server.start_with_listener(listener) {
                eprintln!("Error starting server: {e}");
            }
        });

        (addr, dir)
    }

    #[test]
    fn test_send_then_read_back() {
        let (addr, _dir) = start_test_server();
        let client = SmtpClient::new(&addr);

        let replies = client
            .send_email("a@x", "b@x", "hello", "hi there")
            .unwrap();
        assert_eq!(replies.last().unwrap(), "221 Bye");
        assert!(replies.iter().any(|r| r == "250 Message accepted"));

        let reply = client.read_email("b@x", "hello").unwrap();
        assert!(reply.starts_with("250 Email content:"));
        assert!(reply.contains("From: a@x"));
        assert!(reply.contains("To: b@x"));
        assert!(reply.contains("hi there"));
    }

    #[test]
    fn test_list_before_and_after_send() {
        let (addr, _dir) = start_test_server();
        let client = SmtpClient::new(&addr);

        let reply = client.list_emails("b@x").unwrap();
        assert_eq!(reply, "500 Error: Recipient mailbox not found");

        client
            .send_email("a@x", "b@x", "hello", "hi there")
            .unwrap();

        let reply = client.list_emails("b@x").unwrap();
        assert!(reply.starts_with("250 List of emails for b@x:"));
        assert!(reply.contains("hello"));
    }

    #[test]
    fn test_read_unknown_email() {
        let (addr, _dir) = start_test_server();
        let client = SmtpClient::new(&addr);

        let reply = client.read_email("nobody", "anything").unwrap();
        assert_eq!(reply, "500 Error: Email anything not found for nobody");
    }

    #[test]
    fn test_send_rejects_invalid_recipient() {
        let (addr, _dir) = start_test_server();
        let client = SmtpClient::new(&addr);

        let result = client.send_email("a@x", "../escape", "s", "body");
        assert!(matches!(result, Err(SmtpError::UnexpectedReply(_))));
    }
}
