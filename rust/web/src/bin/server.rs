//! Standalone web server binary
//!
//! Usage: cargo run -p holdem-web --bin holdem-web-server

use holdem_web::{ServerConfig, WebServer};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    holdem_web::init_logging();

    let args: Vec<String> = std::env::args().collect();
    let mut host = "127.0.0.1".to_string();
    let mut port = 8080u16;
    let mut history: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--host" | "-h" => {
                if i + 1 < args.len() {
                    host = args[i + 1].clone();
                    i += 2;
                } else {
                    eprintln!("Error: --host requires a value");
                    std::process::exit(1);
                }
            }
            "--port" | "-p" => {
                if i + 1 < args.len() {
                    port = args[i + 1].parse().unwrap_or_else(|_| {
                        eprintln!("Error: invalid port number");
                        std::process::exit(1);
                    });
                    i += 2;
                } else {
                    eprintln!("Error: --port requires a value");
                    std::process::exit(1);
                }
            }
            "--history" | "-H" => {
                if i + 1 < args.len() {
                    history = Some(PathBuf::from(&args[i + 1]));
                    i += 2;
                } else {
                    eprintln!("Error: --history requires a value");
                    std::process::exit(1);
                }
            }
            "--help" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                eprintln!("Unknown argument: {}", args[i]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    let mut config = ServerConfig::new(host, port);
    if let Some(path) = history {
        tracing::info!(path = %path.display(), "round history enabled");
        config = config.with_history(path);
    }

    let server = WebServer::new(config)?;
    let handle = server.start().await?;

    tracing::info!("server running at http://{}", handle.address());
    println!("Server running at http://{}", handle.address());
    println!("Press Ctrl+C to stop");

    tokio::signal::ctrl_c().await?;

    tracing::info!("shutting down server");
    handle.shutdown().await?;
    tracing::info!("server stopped cleanly");

    Ok(())
}

fn print_help() {
    println!("Hold'em Web Server");
    println!();
    println!("Usage: holdem-web-server [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --host, -h <HOST>       Host to bind to (default: 127.0.0.1)");
    println!("  --port, -p <PORT>       Port to bind to (default: 8080)");
    println!("  --history, -H <FILE>    Append resolved rounds to a JSONL file");
    println!("  --help                  Show this help message");
}
