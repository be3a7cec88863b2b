use postbox::SmtpServer;
use std::env;

fn main() {
    let args: Vec<String> = env::args().collect();

    let addr = if args.len() > 1 {
        args[1].as_str()
    } else {
        "127.0.0.1:2525"
    };

    let mailbox_root = if args.len() > 2 {
        args[2].as_str()
    } else {
        "mailbox"
    };

    println!("Starting Postbox server...");
    println!("Address: {addr}");
    println!("Mailbox root: {mailbox_root}");

    let server = SmtpServer::new(mailbox_root);

    if let Err(e) = server.start(addr) {
        eprintln!("Failed to start server: {e}");
        std::process::exit(1);
    }
}
