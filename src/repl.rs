//! Line-oriented terminal front-end
//!
//! Reads stdin, submits plain lines to the store, and prints replies as the
//! store announces them. Diagnostics commands go straight to the transport.

use crate::conversation::{ConversationStore, Snapshot, StoreEvent, SubmitOutcome};
use crate::render::{render_message, terminal};
use crate::state_machine::TransitionError;
use crate::transcript::Role;
use crate::transport::ChatTransport;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinSet;

const HELP: &str = "Commands: /health, /batch CODE, /history, /quit";

/// One line of user input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// Chat text, verbatim
    Say(&'a str),
    Health,
    Batch(&'a str),
    History,
    Help,
    Quit,
    Unknown(&'a str),
}

impl<'a> Command<'a> {
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();
        if !trimmed.starts_with('/') {
            return Command::Say(line);
        }

        let (name, arg) = match trimmed.split_once(char::is_whitespace) {
            Some((name, arg)) => (name, arg.trim()),
            None => (trimmed, ""),
        };

        match (name, arg) {
            ("/health", _) => Command::Health,
            ("/batch", code) if !code.is_empty() => Command::Batch(code),
            ("/history", _) => Command::History,
            ("/help", _) => Command::Help,
            ("/quit" | "/exit", _) => Command::Quit,
            _ => Command::Unknown(trimmed),
        }
    }
}

/// Run until `/quit` or end of input, then close the store. At end of
/// input, submits already accepted are answered first; `/quit` drops them.
pub async fn run<T, R>(store: ConversationStore<T>, input: R) -> std::io::Result<()>
where
    T: ChatTransport + 'static,
    R: AsyncBufRead + Unpin,
{
    print_transcript(&store.snapshot());
    println!("{HELP}");

    let printer = tokio::spawn(print_updates(store.clone(), store.subscribe()));
    let mut submits = JoinSet::new();
    let mut lines = input.lines();
    let mut quit = false;

    while let Some(line) = lines.next_line().await? {
        // Reap finished submits
        while submits.try_join_next().is_some() {}

        match Command::parse(&line) {
            Command::Say(text) => submit(&mut submits, &store, text),
            Command::Health => match store.transport().health().await {
                Ok(health) => println!("Backend is healthy: {}", health.service),
                Err(e) => println!("{}", terminal::format_banner(&format!("Health check failed: {e}"))),
            },
            Command::Batch(code) => match store.transport().batch_info(code).await {
                Ok(info) => terminal::format_batch_info(&info)
                    .iter()
                    .for_each(|line| println!("{line}")),
                Err(e) => println!("{}", terminal::format_banner(&format!("Batch lookup failed: {e}"))),
            },
            Command::History => print_transcript(&store.snapshot()),
            Command::Help => println!("{HELP}"),
            Command::Quit => {
                quit = true;
                break;
            }
            Command::Unknown(command) => println!("Unknown command {command}. {HELP}"),
        }
    }

    if !quit {
        while let Some(result) = submits.join_next().await {
            if let Err(e) = result {
                tracing::error!(error = %e, "Submit task failed");
            }
        }
    }

    store.close();
    if let Err(e) = printer.await {
        tracing::error!(error = %e, "Display task failed");
    }
    Ok(())
}

/// Submit in the background so the prompt stays responsive
fn submit<T: ChatTransport + 'static>(
    submits: &mut JoinSet<()>,
    store: &ConversationStore<T>,
    text: &str,
) {
    let store = store.clone();
    let text = text.to_string();
    submits.spawn(async move {
        match store.submit(&text).await {
            SubmitOutcome::Rejected(TransitionError::AwaitingReply) => {
                println!("{}", terminal::format_banner(&TransitionError::AwaitingReply.to_string()));
            }
            SubmitOutcome::Rejected(_)
            | SubmitOutcome::Completed
            | SubmitOutcome::Closed
            | SubmitOutcome::Discarded => {}
        }
    });
}

fn print_transcript(snapshot: &Snapshot) {
    for message in &snapshot.messages {
        print_lines(&terminal::format_message(&render_message(message)));
    }
    if let Some(banner) = &snapshot.error_banner {
        println!("{}", terminal::format_banner(banner));
    }
    if snapshot.pending {
        println!("Assistant is typing...");
    }
}

/// Print assistant replies and the banner as the store changes. User lines
/// are already on screen. Stops once the store is closed and every queued
/// update has been printed.
async fn print_updates<T: ChatTransport + 'static>(
    store: ConversationStore<T>,
    mut events: broadcast::Receiver<StoreEvent>,
) {
    loop {
        let event = tokio::select! {
            biased;

            event = events.recv() => event,
            () = store.closed() => break,
        };

        match event {
            Ok(StoreEvent::MessageAppended(message)) if message.role == Role::Assistant => {
                print_lines(&terminal::format_message(&render_message(&message)));
            }
            Ok(StoreEvent::MessageAppended(_)) => {}
            Ok(StoreEvent::PendingChanged(true)) => println!("Assistant is typing..."),
            Ok(StoreEvent::PendingChanged(false)) => {
                if let Some(banner) = store.snapshot().error_banner {
                    println!("{}", terminal::format_banner(&banner));
                }
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Display fell behind, some updates not shown");
            }
            Err(RecvError::Closed) => break,
        }
    }
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::testing::MockTransport;
    use crate::state_machine::ConvContext;
    use crate::transcript::MessageContent;
    use crate::transport::ChatReply;
    use std::sync::Arc;

    #[test]
    fn test_plain_lines_are_chat_verbatim() {
        assert_eq!(Command::parse("where is it?"), Command::Say("where is it?"));
        assert_eq!(Command::parse("  spaced  "), Command::Say("  spaced  "));
        assert_eq!(Command::parse(""), Command::Say(""));
    }

    #[test]
    fn test_commands() {
        assert_eq!(Command::parse("/health"), Command::Health);
        assert_eq!(Command::parse("/batch VDT-052025-A"), Command::Batch("VDT-052025-A"));
        assert_eq!(Command::parse("/batch   VDT-1  "), Command::Batch("VDT-1"));
        assert_eq!(Command::parse("/history"), Command::History);
        assert_eq!(Command::parse("/quit"), Command::Quit);
        assert_eq!(Command::parse(" /exit "), Command::Quit);
        assert_eq!(Command::parse("/help"), Command::Help);
    }

    #[test]
    fn test_batch_without_code_is_unknown() {
        assert_eq!(Command::parse("/batch"), Command::Unknown("/batch"));
        assert_eq!(Command::parse("/frobnicate x"), Command::Unknown("/frobnicate x"));
    }

    #[tokio::test]
    async fn test_run_closes_store_on_quit() {
        let store = ConversationStore::new(ConvContext::new("s"), MockTransport::new());

        run(store.clone(), "/history\n/quit\nignored\n".as_bytes())
            .await
            .unwrap();

        assert!(store.is_closed());
        assert!(store.snapshot().messages.is_empty());
    }

    #[tokio::test]
    async fn test_piped_line_answered_before_exit() {
        let transport = Arc::new(MockTransport::new());
        transport.queue_reply(ChatReply::text("pong"));
        let store = ConversationStore::new(ConvContext::new("s"), Arc::clone(&transport));

        run(store.clone(), "ping\n".as_bytes()).await.unwrap();

        let snap = store.snapshot();
        assert_eq!(snap.messages.len(), 2);
        assert_eq!(snap.messages[0].content, MessageContent::text("ping"));
        assert_eq!(snap.messages[1].content, MessageContent::text("pong"));
        assert!(!snap.pending);
        assert_eq!(transport.recorded_requests().len(), 1);
        assert!(store.is_closed());
    }

    #[tokio::test]
    async fn test_run_closes_store_at_eof() {
        let store = ConversationStore::with_welcome(ConvContext::new("s"), MockTransport::new());

        run(store.clone(), tokio::io::BufReader::new(tokio::io::empty()))
            .await
            .unwrap();

        assert!(store.is_closed());
        assert_eq!(store.submit("ping").await, SubmitOutcome::Closed);
        assert_eq!(store.snapshot().messages.len(), 1);
    }
}
