//! Chat command handler.
//!
//! REPL against the generation channel: each line becomes one request,
//! then events stream to stdout until a terminal event. A piped stdin
//! runs a single generation instead.

use std::io::{IsTerminal, Read, Write};

use anyhow::{Context, Result};
use tokio::io::AsyncBufReadExt;

use slidesmith_core::config::Config;
use slidesmith_core::session::{Session, SessionState, WsConnector};
use slidesmith_types::ChannelEvent;

pub async fn run(config: &Config) -> Result<()> {
    let mut session = Session::new(WsConnector, config.endpoint.clone());
    session
        .connect()
        .await
        .with_context(|| format!("connect to {}", config.endpoint))?;

    // If stdin is piped, run a single generation instead of the REPL.
    if !std::io::stdin().is_terminal() {
        let mut prompt = String::new();
        std::io::stdin().lock().read_to_string(&mut prompt)?;
        let prompt = prompt.trim();
        if prompt.is_empty() {
            anyhow::bail!("No input provided via pipe");
        }
        session.submit(prompt).await.context("submit prompt")?;
        stream_response(&mut session).await;
        session.close().await;
        return Ok(());
    }

    println!("Connected to {}. Type a prompt, or 'exit' to quit.", config.endpoint);

    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    prompt_marker()?;
    while let Some(line) = lines.next_line().await? {
        let prompt = line.trim();
        if prompt.is_empty() {
            prompt_marker()?;
            continue;
        }
        if prompt == "exit" || prompt == "quit" {
            break;
        }

        match session.submit(prompt).await {
            Ok(()) => stream_response(&mut session).await,
            // Recoverable: the next submit reconnects on its own.
            Err(e) => eprintln!("{e}"),
        }
        prompt_marker()?;
    }

    session.close().await;
    Ok(())
}

/// Drains events for one request, printing progress as it arrives.
async fn stream_response(session: &mut Session<WsConnector>) {
    while let Some(event) = session.next_event().await {
        match &event {
            ChannelEvent::Thinking { step } => println!("  .. {step}"),
            ChannelEvent::Slides { slides } => {
                println!("Created a {}-slide presentation!", slides.len());
            }
            ChannelEvent::Error { message } => println!("Error: {message}"),
            ChannelEvent::Complete => {}
        }
        if event.is_terminal() {
            return;
        }
    }
    if session.state() == SessionState::Disconnected {
        println!("Channel closed by the server.");
    }
}

fn prompt_marker() -> Result<()> {
    print!("> ");
    std::io::stdout().flush()?;
    Ok(())
}
