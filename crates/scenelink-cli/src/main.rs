//! SceneLink command line
//!
//! Thin glue over the session core: argument parsing, the environment
//! secret, event printing, and exit codes.

use anyhow::Context;
use clap::{value_parser, Arg, ArgAction, Command};
use scenelink_core::{SceneError, Session, SessionConfig};
use scenelink_events::{EventReceiver, SessionEvent};
use scenelink_transports::{HttpLinkerFactory, HttpPreviewFactory};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable holding the signing secret
const SECRET_ENV: &str = "SCENELINK_PRIVATE_KEY";

fn cli() -> Command {
    let dir = Arg::new("dir")
        .long("dir")
        .default_value(".")
        .help("Working directory holding the scene project(s)");

    Command::new("scenelink")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Preview and publish scene content to a decentralized network")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("preview")
                .about("Serve the scene locally for iterative development")
                .arg(dir.clone())
                .arg(
                    Arg::new("port")
                        .long("port")
                        .value_parser(value_parser!(u16))
                        .help("Preview server port"),
                )
                .arg(
                    Arg::new("watch")
                        .long("watch")
                        .action(ArgAction::SetTrue)
                        .help("Report scene manifest changes while serving"),
                ),
        )
        .subcommand(
            Command::new("link")
                .about("Obtain an authorized signature for a content root")
                .arg(dir.clone())
                .arg(
                    Arg::new("cid")
                        .long("cid")
                        .required(true)
                        .help("Content root (rootCID) of the scene bundle"),
                )
                .arg(
                    Arg::new("port")
                        .long("port")
                        .value_parser(value_parser!(u16))
                        .help("Linker endpoint port"),
                )
                .arg(
                    Arg::new("https")
                        .long("https")
                        .action(ArgAction::SetTrue)
                        .help("Advertise an https linker URL"),
                )
                .arg(
                    Arg::new("timeout")
                        .long("timeout")
                        .value_parser(value_parser!(u64))
                        .help("Bound the handshake wait, in seconds"),
                ),
        )
        .subcommand(
            Command::new("address")
                .about("Print the public address of the signing identity")
                .arg(dir.clone()),
        )
        .subcommand(
            Command::new("sign")
                .about("Sign a message with the signing identity")
                .arg(dir)
                .arg(
                    Arg::new("message")
                        .long("message")
                        .required(true)
                        .help("Message to sign"),
                ),
        )
}

fn build_session(config: SessionConfig) -> Result<Session, SceneError> {
    let secret = std::env::var(SECRET_ENV).ok();
    Session::new(
        config,
        secret.as_deref(),
        Arc::new(HttpPreviewFactory),
        Arc::new(HttpLinkerFactory),
    )
}

/// Print relayed transport events as they arrive
fn print_events(mut events: EventReceiver) {
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            match &event {
                SessionEvent::LinkReady { url } => {
                    println!("Open the linker in your browser: {url}");
                }
                SessionEvent::PreviewChanged { project } => {
                    println!("Scene changed: {project}");
                }
                _ => tracing::info!(event = event.name(), "progress"),
            }
        }
    });
}

async fn run() -> anyhow::Result<()> {
    let matches = cli().get_matches();

    match matches.subcommand() {
        Some(("preview", args)) => {
            let mut config = SessionConfig::new(args.get_one::<String>("dir").unwrap());
            if let Some(port) = args.get_one::<u16>("port") {
                config = config.with_preview_port(*port);
            }
            if args.get_flag("watch") {
                config = config.with_watch(true);
            }

            let session = build_session(config)?;
            if let Some(events) = session.take_events() {
                print_events(events);
            }
            session.preview().await?;
            println!("Preview running on port {}", session.config().preview_port());
            println!("Press Ctrl-C to stop");
            tokio::signal::ctrl_c().await.context("waiting for shutdown")?;
            Ok(())
        }
        Some(("link", args)) => {
            let mut config = SessionConfig::new(args.get_one::<String>("dir").unwrap());
            if let Some(port) = args.get_one::<u16>("port") {
                config = config.with_linker_port(*port);
            }
            if args.get_flag("https") {
                config = config.with_https(true);
            }
            if let Some(secs) = args.get_one::<u64>("timeout") {
                config = config.with_link_timeout(Duration::from_secs(*secs));
            }
            let cid = args.get_one::<String>("cid").unwrap();

            let session = build_session(config)?;
            if let Some(events) = session.take_events() {
                print_events(events);
            }
            let outcome = session.link(cid).await?;
            println!("Content root linked");
            println!("  address:   {}", outcome.address);
            println!("  signature: {}", outcome.signature);
            Ok(())
        }
        Some(("address", args)) => {
            let config = SessionConfig::new(args.get_one::<String>("dir").unwrap());
            let session = build_session(config)?;
            println!("{}", session.get_public_address().await?);
            Ok(())
        }
        Some(("sign", args)) => {
            let config = SessionConfig::new(args.get_one::<String>("dir").unwrap());
            let message = args.get_one::<String>("message").unwrap();
            let session = build_session(config)?;
            let pair = session.get_address_and_signature(message).await?;
            println!("address:   {}", pair.address);
            println!("signature: {}", pair.signature);
            Ok(())
        }
        _ => unreachable!("subcommand required"),
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Err(e) = run().await {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_link_args() {
        let matches = cli()
            .try_get_matches_from(["scenelink", "link", "--cid", "bafyroot", "--timeout", "90"])
            .unwrap();
        let (name, args) = matches.subcommand().unwrap();
        assert_eq!(name, "link");
        assert_eq!(args.get_one::<String>("cid").unwrap(), "bafyroot");
        assert_eq!(args.get_one::<u64>("timeout"), Some(&90));
    }

    #[test]
    fn cli_requires_a_cid_for_link() {
        assert!(cli().try_get_matches_from(["scenelink", "link"]).is_err());
    }

    #[test]
    fn cli_defaults_working_dir() {
        let matches = cli()
            .try_get_matches_from(["scenelink", "preview"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(args.get_one::<String>("dir").unwrap(), ".");
    }
}
