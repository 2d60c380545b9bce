//! sessionrpc demo client
//!
//! Talks to the account backend through a sessioned client while the
//! heartbeat keeps the session alive in the background.

pub mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;

use commands::account::{AccountApi, Credentials};
use sessionrpc_core::{Config, SessionKeeper};

#[derive(Parser)]
#[command(
    name = "sessionrpc",
    about = "Session-keeping JSON RPC client for the account backend"
)]
pub struct Cli {
    /// JSON config file; SESSIONRPC_* environment variables are used otherwise
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Register a new user
    Register { username: String, password: String },
    /// Log in on the current session
    Login { username: String, password: String },
    /// Print the user logged in on the current session
    Whoami,
    /// Register, log in and print the user name on one session
    Demo { username: String, password: String },
    /// Call any backend method with an optional JSON payload
    Call { method: String, data: Option<String> },
    /// Keep the session alive until Ctrl-C
    Keepalive,
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    sessionrpc_core::init_logging();

    let config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::from_env()?,
    };

    let keeper = SessionKeeper::new(config)?;
    keeper.start();

    let outcome = execute(&keeper, cli.command).await;
    keeper.shutdown().await;
    outcome
}

async fn execute(keeper: &SessionKeeper, command: Command) -> anyhow::Result<()> {
    let client = keeper.client().clone();
    let api = AccountApi::new(client.clone());

    match command {
        Command::Register { username, password } => {
            print_json(&api.register(&Credentials { username, password }).await)
        }
        Command::Login { username, password } => {
            print_json(&api.login(&Credentials { username, password }).await)
        }
        Command::Whoami => print_json(&api.user_name().await),
        Command::Demo { username, password } => {
            let credentials = Credentials { username, password };
            print_json(&api.register(&credentials).await)?;
            print_json(&api.login(&credentials).await)?;
            print_json(&api.user_name().await)
        }
        Command::Call { method, data } => {
            print_json(&commands::rpc::call_method(&client, &method, data.as_deref()).await)
        }
        Command::Keepalive => {
            tracing::info!(
                interval_secs = keeper.config().heartbeat_interval_secs,
                "Keeping session alive, press Ctrl-C to stop"
            );
            tokio::signal::ctrl_c().await?;
            Ok(())
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        let cli = Cli::try_parse_from(["sessionrpc", "login", "ada", "secret"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Login { ref username, ref password } if username == "ada" && password == "secret"
        ));

        let cli = Cli::try_parse_from([
            "sessionrpc",
            "--config",
            "client.json",
            "call",
            "updateSession",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("client.json")));
        assert!(matches!(cli.command, Command::Call { ref data, .. } if data.is_none()));
    }

    #[test]
    fn test_missing_arguments_rejected() {
        assert!(Cli::try_parse_from(["sessionrpc", "register", "ada"]).is_err());
    }
}
