//! Terminal front-end for a messaging account.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session
//! ntc
//!
//! # One command, then exit
//! ntc --list 10
//! ntc -t @alice see you at six
//!
//! # Keep settings and caches elsewhere, without colors
//! ntc --data-dir ~/.ntc --no-color
//! ```
//!
//! Ctrl-C cuts the current animation short; a second Ctrl-C before the next
//! command quits.
//!
//! Set `NTC_LOG` (for example `NTC_LOG=ntc=debug`) to write diagnostics to
//! stderr.

use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arrrg::CommandLine;
use futures::StreamExt;
use tracing_subscriber::EnvFilter;

use ntc::commands::{INVOCATION, Input, parse_input};
use ntc::render::{TerminalRenderer, note_interrupt};
use ntc::repl::{LineReader, ReadOutcome};
use ntc::session::spawn_receipt_poller;
use ntc::{Command, Credentials, Flow, MemoryMessenger, Messenger, Ntc, NtcArgs, NtcConfig};

const USAGE: &str = "ntc [OPTIONS] [--command ARGS...]";
/// 128 + SIGINT.
const INTERRUPT_EXIT_CODE: i32 = 130;

fn init_logging() {
    let Ok(filter) = std::env::var("NTC_LOG") else {
        return;
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_ansi(false)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn prompt_stdin(label: &str) -> ntc::Result<String> {
    let mut stdout = io::stdout();
    stdout.write_all(label.as_bytes())?;
    stdout.flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let (globals, rest) = NtcArgs::split_globals(&argv);
    let globals: Vec<&str> = globals.iter().map(String::as_str).collect();
    let (args, _) = NtcArgs::from_arguments_relaxed(USAGE, &globals);
    let config = NtcConfig::from(args);
    tracing::debug!(?config, "starting");

    let credentials = Credentials::load_or_prompt(&config.env_file, prompt_stdin)?;
    tracing::debug!(?credentials, "credentials loaded");

    let interrupted = Arc::new(AtomicBool::new(false));
    let interrupted_clone = interrupted.clone();
    ctrlc::set_handler(move || {
        if note_interrupt(&interrupted_clone) {
            std::process::exit(INTERRUPT_EXIT_CODE);
        }
    })?;

    let renderer = TerminalRenderer::with_color(config.use_color)
        .with_animation(config.animate)
        .with_interrupt(interrupted.clone());
    let client = Arc::new(MemoryMessenger::demo());
    let mut app = Ntc::new(client.clone(), config, Box::new(renderer));

    if !rest.is_empty() {
        run_once(&mut app, &rest).await;
        app.shutdown().await;
        return Ok(());
    }

    if let Err(err) = app.login().await {
        app.report_error(&err);
        return Err(err.into());
    }
    app.greet();
    run_interactive(&mut app, &client, &interrupted).await?;
    app.shutdown().await;
    Ok(())
}

async fn run_once<M: Messenger>(app: &mut Ntc<M>, rest: &[String]) {
    let line = format!("{INVOCATION} {}", rest.join(" "));
    let command = match parse_input(&line) {
        Input::Command { name, args } => Command::parse(&name, args.as_deref()),
        _ => Command::Help,
    };
    if command.needs_client() {
        if let Err(err) = app.login().await {
            app.report_error(&err);
            return;
        }
    }
    app.dispatch(command).await;
}

async fn run_interactive<M: Messenger>(
    app: &mut Ntc<M>,
    client: &Arc<M>,
    interrupted: &AtomicBool,
) -> Result<(), Box<dyn std::error::Error>> {
    let poller = spawn_receipt_poller(
        client.clone(),
        app.session().receipts().clone(),
        app.session().subscribe(),
    );
    let mut updates = client.updates();
    let mut reader = LineReader::spawn()?;

    reader.request(&app.prompt())?;
    loop {
        tokio::select! {
            outcome = reader.next() => match outcome {
                ReadOutcome::Line(line) => {
                    interrupted.store(false, Ordering::Relaxed);
                    if app.handle_line(&line).await == Flow::Exit {
                        break;
                    }
                    reader.request(&app.prompt())?;
                }
                ReadOutcome::Interrupted => {
                    reader.request(&app.prompt())?;
                }
                ReadOutcome::Eof => break,
                ReadOutcome::Failed(err) => {
                    tracing::error!(error = %err, "line editor failed");
                    break;
                }
            },
            Some(message) = updates.next() => {
                app.on_new_message(&message);
            }
        }
    }
    poller.abort();
    Ok(())
}
