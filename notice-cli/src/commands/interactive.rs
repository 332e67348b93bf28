//! Line-oriented notice list session.
//!
//! Every line read from stdin is either a paging command or the new content
//! of the search box. Search input is debounced exactly as keystrokes would
//! be; every state change is printed as it happens.

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

use notice_client::{FetchOrchestrator, FetchOutcome, NoticeStore};
use notice_core::QueryState;

use crate::render;

/// One line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input {
    Next,
    Previous,
    Retry,
    First,
    Quit,
    Search(String),
}

impl Input {
    fn parse(line: &str) -> Self {
        match line.trim_end_matches(['\r', '\n']) {
            ":next" | ":n" => Self::Next,
            ":prev" | ":p" => Self::Previous,
            ":retry" | ":r" => Self::Retry,
            ":first" | ":f" => Self::First,
            ":quit" | ":q" => Self::Quit,
            text => Self::Search(text.to_string()),
        }
    }
}

/// Run the interactive command on stdin.
pub async fn run<S: NoticeStore + 'static>(
    orchestrator: &FetchOrchestrator<S>,
    quiet: Duration,
) -> Result<()> {
    println!("Type a title prefix to search. Commands: :next :prev :retry :first :quit");
    let renderer = spawn_renderer(orchestrator);

    drive(orchestrator, BufReader::new(tokio::io::stdin()), quiet).await?;
    renderer.abort();

    println!("--");
    let state = orchestrator.state();
    print!("{}", render::view(state.view(orchestrator.error_view())));
    Ok(())
}

/// Print every state change until the session goes away.
fn spawn_renderer<S: NoticeStore + 'static>(
    orchestrator: &FetchOrchestrator<S>,
) -> tokio::task::JoinHandle<()> {
    let mut states = orchestrator.subscribe();
    let error_view = orchestrator.error_view();
    let mut last_printed: Option<QueryState> = None;

    tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = QueryState::clone(&states.borrow_and_update());

            // Input changes alone do not change what is shown
            if let Some(previous) = &last_printed {
                if previous.status() == state.status()
                    && previous.items() == state.items()
                    && previous.error_message() == state.error_message()
                {
                    continue;
                }
            }
            print!("{}", render::view(state.view(error_view)));
            last_printed = Some(state);
        }
    })
}

/// Feed input lines to the session, then wait for it to settle.
async fn drive<S, R>(orchestrator: &FetchOrchestrator<S>, reader: R, quiet: Duration) -> Result<()>
where
    S: NoticeStore + 'static,
    R: AsyncBufRead + Unpin,
{
    let mut lines = reader.lines();

    while let Some(line) = lines.next_line().await.context("Failed to read input")? {
        let outcome = match Input::parse(&line) {
            Input::Quit => break,
            Input::Search(text) => {
                orchestrator.search(text).await?;
                continue;
            }
            Input::Next => orchestrator.next_page().await,
            Input::Previous => orchestrator.previous_page().await,
            Input::Retry => orchestrator.retry().await,
            Input::First => orchestrator.first_page().await,
        };
        if outcome == FetchOutcome::Skipped {
            println!("(nothing to fetch)");
        }
    }

    settle(orchestrator, quiet).await;
    Ok(())
}

/// Wait for a pending search to fire and its fetch to finish.
async fn settle<S: NoticeStore + 'static>(orchestrator: &FetchOrchestrator<S>, quiet: Duration) {
    tokio::time::sleep(quiet + Duration::from_millis(50)).await;
    let mut states = orchestrator.subscribe();
    let _ = states.wait_for(|state| !state.is_loading()).await;
}
