//! pulsekv CLI Client
//!
//! Command-line interface for interacting with a pulsekv server.

use clap::{Parser, Subcommand};
use pulsekv::Client;

/// pulsekv CLI
#[derive(Parser, Debug)]
#[command(name = "pulsekv-cli")]
#[command(about = "CLI for the pulsekv key-value store")]
struct Args {
    /// Server address
    #[arg(short, long, default_value = "127.0.0.1:7878")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Publish a value to a topic
    Pub {
        /// The topic to publish to
        topic: String,

        /// The value to publish
        value: String,
    },

    /// Subscribe to a topic and print values as they arrive
    Sub {
        /// The topic to subscribe to
        topic: String,
    },
}

fn main() {
    let args = Args::parse();

    if let Err(e) = run(args) {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> pulsekv::Result<()> {
    let mut client = Client::connect(&args.server)?;

    match args.command {
        Commands::Get { key } => match client.get(key.as_bytes())? {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => println!("(not found)"),
        },
        Commands::Set { key, value } => {
            client.set(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        Commands::Del { key } => {
            client.del(key.as_bytes())?;
            println!("OK");
        }
        Commands::Pub { topic, value } => {
            client.publish(topic.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        Commands::Sub { topic } => {
            let stream = client.subscribe(topic.as_bytes())?;
            for value in stream {
                println!("{}", String::from_utf8_lossy(&value?));
            }
        }
    }

    Ok(())
}
