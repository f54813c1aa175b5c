//! Terminal front end for the Vision Assistant chat widget
//!
//! Reads questions from stdin, one per line. Ctrl+C cancels the request in
//! flight; Ctrl+D exits.
//!
//! Commands:
//! - `#N`  submit visible suggestion N
//! - `<` / `>`  scroll the suggestions
//! - `/quit`  exit

use anyhow::Context;
use assistant_common::{telemetry, Locale};
use assistant_widget::host::{HostNotifier, JsonLinesNotifier, NoopNotifier};
use assistant_widget::{
    ChatSession, HttpAssistantClient, Message, MessageKind, SubmitOutcome, DEFAULT_ENDPOINT,
};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(name = "widget", version, about = "Chat with the Vision assistant")]
struct Args {
    /// Gateway endpoint
    #[arg(long, env = "WIDGET_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// UI locale (`en-us` or `hr`)
    #[arg(long, env = "WIDGET_LOCALE", default_value = "en-us")]
    locale: String,

    /// Request timeout in seconds, 0 disables it
    #[arg(long, env = "WIDGET_TIMEOUT_SECS", default_value_t = 120)]
    timeout_secs: u64,

    /// Write host events as JSON lines to stderr
    #[arg(long)]
    host_events: bool,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "WIDGET_LOG", default_value = "warn")]
    log: String,
}

enum Command<'a> {
    Quit,
    ScrollLeft,
    ScrollRight,
    Suggestion(usize),
    Ask(&'a str),
}

fn parse_command(line: &str) -> Command<'_> {
    match line.trim() {
        "/quit" => Command::Quit,
        "<" => Command::ScrollLeft,
        ">" => Command::ScrollRight,
        other => match other.strip_prefix('#').and_then(|n| n.parse::<usize>().ok()) {
            Some(n) if n > 0 => Command::Suggestion(n - 1),
            _ => Command::Ask(line),
        },
    }
}

fn print_message(message: &Message) {
    let who = match message.kind() {
        MessageKind::User => "you",
        MessageKind::Assistant => "assistant",
    };
    println!("{}> {}", who, message.text());
}

async fn print_suggestions(session: &ChatSession) {
    let snapshot = session.snapshot().await;
    for (i, prompt) in snapshot.suggestions.iter().take(3).enumerate() {
        println!("  #{} {}", i + 1, prompt);
    }
    println!("({})", snapshot.placeholder);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    telemetry::init_with_filter(&args.log, false);

    let locale = Locale::parse(&args.locale);
    let timeout = (args.timeout_secs > 0).then(|| Duration::from_secs(args.timeout_secs));
    let client = HttpAssistantClient::new(args.endpoint.clone(), timeout)
        .context("failed to build HTTP client")?;
    let host: Arc<dyn HostNotifier> = if args.host_events {
        Arc::new(JsonLinesNotifier::new(std::io::stderr()))
    } else {
        Arc::new(NoopNotifier)
    };
    let session = ChatSession::with_host(locale, Arc::new(client), host);

    tracing::info!(endpoint = %args.endpoint, locale = %locale, "Widget started");

    println!("{}", locale.title());
    for message in session.transcript().await {
        print_message(&message);
    }
    print_suggestions(&session).await;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let submit = match parse_command(&line) {
            Command::Quit => break,
            Command::ScrollLeft => {
                session.scroll_left().await;
                print_suggestions(&session).await;
                continue;
            }
            Command::ScrollRight => {
                session.scroll_right().await;
                print_suggestions(&session).await;
                continue;
            }
            Command::Suggestion(index) => {
                let session = session.clone();
                tokio::spawn(async move { session.choose_suggestion(index).await })
            }
            Command::Ask(text) => {
                session.set_input(text).await;
                let session = session.clone();
                tokio::spawn(async move { session.submit().await })
            }
        };
        tokio::pin!(submit);

        let finished = tokio::select! {
            outcome = &mut submit => Some(outcome),
            _ = tokio::signal::ctrl_c() => None,
        };
        let outcome = match finished {
            Some(outcome) => outcome?,
            None => {
                session.cancel().await;
                submit.await?
            }
        };

        let snapshot = session.snapshot().await;
        match outcome {
            SubmitOutcome::Answered(answer) => print_message(&Message::assistant(answer)),
            SubmitOutcome::Rejected => {
                if let Some(warning) = snapshot.warning {
                    println!("! {}", warning);
                }
            }
            SubmitOutcome::Failed => {
                if let Some(error) = snapshot.error {
                    println!("! {}", error);
                }
            }
            SubmitOutcome::Cancelled => println!("(cancelled)"),
            SubmitOutcome::Busy | SubmitOutcome::Ignored => {}
        }
        print_suggestions(&session).await;
    }

    Ok(())
}
