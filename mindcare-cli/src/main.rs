use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::sync::Arc;

mod auth;
mod boundary;
mod chat;
mod config;
mod oracle;
mod responder;
mod server;
mod state;

use boundary::ChatRequest;
use responder::Responder;

#[derive(Parser, Debug)]
#[command(name = "mindcare", version, about = "MindCare supportive chat responder")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer one message and print the response JSON
    Ask {
        message: String,

        /// Prior conversation turns, oldest first (repeatable)
        #[arg(long = "history")]
        history: Vec<String>,

        /// Skip the simulated response delay
        #[arg(long)]
        no_delay: bool,

        /// Never call the external oracle
        #[arg(long)]
        offline: bool,
    },

    /// Print the topic the keyword rules pick (no oracle, no delay)
    Classify {
        message: String,

        #[arg(long = "history")]
        history: Vec<String>,
    },

    /// Interactive terminal chat
    Chat {
        #[arg(long)]
        offline: bool,
    },

    /// Serve the HTTP API
    Serve {
        #[arg(long)]
        host: Option<String>,

        #[arg(long)]
        port: Option<u16>,
    },

    /// Print crisis helplines
    Resources,

    /// Config file helpers
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },

    /// Store oracle API keys in ~/.mindcare/auth.json
    Auth {
        #[command(subcommand)]
        command: AuthCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default ~/.mindcare/config.toml
    Init,
    /// Print the effective config
    Show,
}

#[derive(Subcommand, Debug)]
enum AuthCommand {
    PasteOpenaiApiKey,
    PasteAnthropicToken,
    /// Show which keys are configured (values are never printed)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let interactive = matches!(cli.command, Command::Chat { .. });
    init_tracing(interactive);

    match cli.command {
        Command::Ask {
            message,
            history,
            no_delay,
            offline,
        } => {
            let mut r = build_responder(offline)?;
            if no_delay {
                r = r.without_delay();
            }
            let req = ChatRequest::new(message).with_history(history);
            let resp = r
                .handle(&req)
                .await
                .context("message must not be empty")?;
            println!("{}", serde_json::to_string_pretty(&resp)?);
        }

        Command::Classify { message, history } => {
            let cfg = config::load_config()?;
            let c = cfg.chat.classifier()?.classify_detailed(&message, history.as_slice());
            println!("{} ({:?})", c.topic, c.source);
        }

        Command::Chat { offline } => {
            let r = build_responder(offline)?.without_delay();
            chat::run_chat(&r)?;
        }

        Command::Serve { host, port } => {
            let cfg = config::load_config()?;
            let r = Responder::from_config(&cfg, &auth::resolve_auth()?)?;
            let host = host.unwrap_or(cfg.server.host);
            let port = port.unwrap_or(cfg.server.port);
            server::serve(Arc::new(r), &host, port).await?;
        }

        Command::Resources => {
            println!("If you are in danger, contact emergency services now.\n");
            for h in mindcare_core::HELPLINES {
                println!("- {}: {} ({})", h.name, h.number, h.available);
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => config::init_config()?,
            ConfigCommand::Show => {
                let cfg = config::load_config()?;
                println!("# {}", config::config_path()?.display());
                println!("{}", toml::to_string_pretty(&cfg)?);
            }
        },

        Command::Auth { command } => match command {
            AuthCommand::PasteOpenaiApiKey => auth::openai_paste_api_key()?,
            AuthCommand::PasteAnthropicToken => auth::anthropic_paste_token()?,
            AuthCommand::Status => auth::print_status()?,
        },
    }

    Ok(())
}

fn build_responder(offline: bool) -> Result<Responder> {
    let cfg = config::load_config()?;
    if offline {
        return Ok(Responder::new(cfg.chat.classifier()?).with_delay(cfg.chat.delay_range()));
    }
    Responder::from_config(&cfg, &auth::resolve_auth()?)
}

/// `RUST_LOG` wins; otherwise info for our crates. The TUI owns the terminal,
/// so it only gets errors on stderr.
fn init_tracing(interactive: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if interactive {
        "error"
    } else {
        "mindcare_cli=info,mindcare_core=info,warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
