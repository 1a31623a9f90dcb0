//! Live search - drive a search session from stdin
//!
//! Each stdin line replaces the current input and goes through the
//! debounced path. A line starting with `!` submits the rest immediately.
//! Every change of the displayed results is printed.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::client::NotesApi;
use crate::core::render::{RenderConfig, Renderer};
use crate::search::SearchSession;

const SUBMIT_PREFIX: char = '!';

/// What one input line asks for
#[derive(Debug, PartialEq, Eq)]
pub enum LiveInput<'a> {
    Submit(&'a str),
    Edit(&'a str),
}

pub fn parse_line(line: &str) -> LiveInput<'_> {
    match line.strip_prefix(SUBMIT_PREFIX) {
        Some(rest) => LiveInput::Submit(rest),
        None => LiveInput::Edit(line),
    }
}

pub async fn run_live<A: NotesApi + 'static>(
    api: Arc<A>,
    debounce: Duration,
    render_config: RenderConfig,
) -> Result<()> {
    let mut session = SearchSession::new(api, debounce);
    let mut updates = session.subscribe();
    let renderer = Renderer::with_config(render_config);

    let printer = tokio::spawn(async move {
        while updates.changed().await.is_ok() {
            let output = renderer.render(&updates.borrow_and_update());
            println!("{}", output);
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match parse_line(&line) {
            LiveInput::Submit(query) => session.submit(query).await,
            LiveInput::Edit(query) => session.on_input(query),
        }
    }

    session.settle().await;
    drop(session);
    printer.await.context("Result printer stopped unexpectedly")?;
    Ok(())
}
