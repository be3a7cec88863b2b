use postbox::SmtpClient;
use std::env;

fn usage() -> ! {
    eprintln!("Usage:");
    eprintln!("  postbox-client send <sender> <recipient> <subject> <message>");
    eprintln!("  postbox-client list <recipient>");
    eprintln!("  postbox-client read <recipient> <subject>");
    eprintln!();
    eprintln!("Set POSTBOX_ADDR to override the server address (default 127.0.0.1:2525)");
    std::process::exit(1);
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        usage();
    }

    let addr = env::var("POSTBOX_ADDR").unwrap_or_else(|_| "127.0.0.1:2525".to_string());
    let client = SmtpClient::new(&addr);

    let result = match (args[1].as_str(), args.len()) {
        ("send", 6) => client
            .send_email(&args[2], &args[3], &args[4], &args[5])
            .map(|replies| {
                for reply in replies {
                    println!("Server: {reply}");
                }
            }),
        ("list", 3) => client.list_emails(&args[2]).map(|reply| {
            println!("Server: {reply}");
        }),
        ("read", 4) => client.read_email(&args[2], &args[3]).map(|reply| {
            println!("Server: {reply}");
        }),
        _ => usage(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
