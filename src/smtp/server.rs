//! TCP server and per-connection handling

use crate::smtp::commands::SmtpCommandHandler;
use crate::smtp::error::SmtpError;
use crate::smtp::mailbox::MailboxStore;
use crate::smtp::response::SmtpResponse;
use crate::smtp::session::SmtpSession;

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::path::PathBuf;
use std::thread;

/// Accepts connections and drives one session per connection.
///
/// Each accepted connection gets its own worker thread and its own
/// [`SmtpSession`]; the only shared resource is the mailbox store.
#[derive(Debug, Clone)]
pub struct SmtpServer {
    store: MailboxStore,
}

impl SmtpServer {
    /// Create a server persisting mail under the given root directory
    pub fn new(mailbox_root: impl Into<PathBuf>) -> Self {
        Self {
            store: MailboxStore::new(mailbox_root),
        }
    }

    /// The mailbox store backing this server
    pub fn store(&self) -> &MailboxStore {
        &self.store
    }

    /// Bind the address and serve connections (blocking)
    pub fn start(&self, addr: &str) -> Result<(), SmtpError> {
        let listener = TcpListener::bind(addr)?;
        self.start_with_listener(listener)
    }

    /// Serve connections from an existing listener (blocking)
    pub fn start_with_listener(&self, listener: TcpListener) -> Result<(), SmtpError> {
        self.store.ensure_root()?;
        println!(
            "Server listening on {}",
            listener.local_addr().map_err(SmtpError::Io)?
        );

        for stream in listener.incoming() {
            match stream {
                Ok(stream) => {
                    let server = self.clone();
                    thread::spawn(move || {
                        if let Err(e) = server.handle_client(stream) {
                            eprintln!("Error handling client: {e}");
                        }
                    });
                }
                Err(e) => {
                    eprintln!("Error accepting connection: {e}");
                }
            }
        }

        Ok(())
    }

    /// Handle a client connection.
    ///
    /// Input framing is strictly newline-delimited: lines are read with
    /// `read_until(b'\n')` and lossy-decoded, so commands batched in one
    /// segment or split across segments are both handled. Body lines keep
    /// their leading whitespace; only the line ending is stripped.
    fn handle_client(&self, mut stream: TcpStream) -> Result<(), SmtpError> {
        let mut session = SmtpSession::new();
        let handler = SmtpCommandHandler::new(&self.store);
        let mut reader = BufReader::new(stream.try_clone()?);

        self.send_response(&mut stream, &SmtpResponse::ready())?;

        let mut line_buffer = Vec::new();
        loop {
            line_buffer.clear();

            match reader.read_until(b'\n', &mut line_buffer) {
                Ok(0) => break, // Connection closed
                Ok(_) => {
                    let line = String::from_utf8_lossy(&line_buffer);

                    if session.collecting_body() {
                        let line = line.trim_end_matches(['\r', '\n']);
                        if line == "." {
                            let response = self.finalize_message(&mut session);
                            self.send_response(&mut stream, &response)?;
                        } else if let Err(e) = session.add_body_line(line.to_string()) {
                            let response =
                                SmtpResponse::error(e.to_response_code(), &e.to_response_message());
                            self.send_response(&mut stream, &response)?;
                            session.reset();
                        }
                        continue;
                    }

                    let command = line.trim();
                    if command.is_empty() {
                        continue;
                    }

                    match handler.process_command(command, &mut session) {
                        Ok(Some(response)) => {
                            self.send_response(&mut stream, &response)?;
                            if response.code == "221" {
                                break; // QUIT
                            }
                        }
                        Ok(None) => {
                            // Accepted without a reply (FILENAME)
                        }
                        Err(e) => {
                            let response =
                                SmtpResponse::error(e.to_response_code(), &e.to_response_message());
                            self.send_response(&mut stream, &response)?;
                        }
                    }
                }
                Err(e) => {
                    eprintln!("Error reading from client: {e}");
                    break;
                }
            }
        }

        Ok(())
    }

    /// Finalize the buffered message on the "." terminator and persist it.
    ///
    /// Missing fields and storage faults both come back as error responses;
    /// the session has already reset to greeted either way, so the client
    /// may retry on the same connection.
    fn finalize_message(&self, session: &mut SmtpSession) -> SmtpResponse {
        let result = session
            .finish_message()
            .and_then(|email| self.store.put(&email));

        match result {
            Ok(()) => SmtpResponse::accepted(),
            Err(e) => SmtpResponse::error(e.to_response_code(), &e.to_response_message()),
        }
    }

    /// Send a response to the client
    fn send_response(
        &self,
        stream: &mut TcpStream,
        response: &SmtpResponse,
    ) -> Result<(), SmtpError> {
        stream.write_all(response.format().as_bytes())?;
        stream.flush()?;
        Ok(())
    }
}
