use clap::{Parser, Subcommand};
use key_gate::auth::strip_bearer;
use key_gate::{handle_event_json, AuthorizationResult, KeyConfig, KeyStore, Result};
use serde::Serialize;
use std::io::Read;
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(
    name = "key-gate",
    about = "Run requests through the static API key gate",
    version,
    after_help = "EXAMPLES:
    key-gate invoke --event event.json    Run an event file through the handler
    cat event.json | key-gate invoke      Read the event from stdin
    key-gate keys                         List configured users
    key-gate check abc123                 Check a single key"
)]
struct Cli {
    /// Credential list (key:user[:role],...)
    #[arg(long, env = "API_KEYS", default_value = "", hide_env_values = true, global = true)]
    api_keys: String,

    /// Output as JSON
    #[arg(short, long, global = true)]
    json: bool,

    /// Log to stderr (filter with RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a function event through the handler and print the response
    Invoke {
        /// Event JSON file (reads stdin when omitted)
        #[arg(short, long)]
        event: Option<PathBuf>,

        /// Pretty-print the response
        #[arg(long)]
        pretty: bool,
    },
    /// List configured users with masked keys
    Keys,
    /// Check whether a key is authorized
    Check {
        /// API key, optionally prefixed with "Bearer "
        key: String,
    },
}

/// Credential listing entry; the key itself is never printed
#[derive(Serialize)]
struct KeyEntry {
    user_id: String,
    role: String,
    key: String,
}

fn main() {
    let cli = Cli::parse();

    if cli.verbose {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "debug".into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = KeyConfig::new(cli.api_keys);

    match cli.command {
        Commands::Invoke { event, pretty } => {
            let raw = match event {
                Some(path) => std::fs::read_to_string(path)?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin().read_to_string(&mut buf)?;
                    buf
                }
            };

            let response = handle_event_json(&raw, config.raw())?;
            if pretty {
                let value: serde_json::Value = serde_json::from_str(&response)?;
                println!("{}", serde_json::to_string_pretty(&value)?);
            } else {
                println!("{}", response);
            }
        }

        Commands::Keys => {
            let store = KeyStore::from_config(&config);
            let entries: Vec<KeyEntry> = store
                .credentials()
                .into_iter()
                .map(|c| KeyEntry {
                    user_id: c.user.user_id,
                    role: c.user.role,
                    key: mask_key(&c.key),
                })
                .collect();

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                for e in &entries {
                    println!("{} ({})  {}", e.user_id, e.role, e.key);
                }
                eprintln!("\n{} keys", entries.len());
            }
        }

        Commands::Check { key } => {
            let store = KeyStore::from_config(&config);
            let result = store.validate(Some(strip_bearer(&key)));

            if cli.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                match &result.user_info {
                    Some(user) => println!("authorized: {}", user),
                    None => println!("unauthorized"),
                }
            }

            return Ok(check_exit_code(&result));
        }
    }

    Ok(0)
}

/// Exit status for `check`: 0 when authorized, 1 otherwise
fn check_exit_code(result: &AuthorizationResult) -> i32 {
    if result.authorized {
        0
    } else {
        1
    }
}

fn mask_key(key: &str) -> String {
    if key.chars().count() <= 4 {
        return "****".to_string();
    }
    let visible: String = key.chars().take(2).collect();
    format!("{}****", visible)
}
