//! Interactive chat for the MakeIt CLI.
//!
//! Each input line is one user turn run through the [`FallbackCoordinator`].
//! History, tutorial state and the last generated image returned by a turn
//! are carried into the next one.

use std::future::Future;
use std::io::Write;

use color_eyre::Result;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

use crate::coordinator::{CompletionPath, FallbackCoordinator};
use crate::dispatch::StreamHandler;
use crate::error::TurnError;
use crate::models::{ChatRequest, DonePayload, HistoryEntry, ThinkingPayload};
use crate::traits::HttpClient;

const PROMPT: &str = "> ";

/// State carried between turns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conversation {
    history: Vec<HistoryEntry>,
    tutorial_data: Option<Value>,
    generated_image: Option<String>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> &[HistoryEntry] {
        &self.history
    }

    pub fn tutorial_data(&self) -> Option<&Value> {
        self.tutorial_data.as_ref()
    }

    /// Build the request for the next turn.
    pub fn request(&self, message: &str) -> ChatRequest {
        ChatRequest::new(message)
            .with_history(self.history.clone())
            .with_tutorial_data(self.tutorial_data.clone())
            .with_generated_image(self.generated_image.clone())
    }

    /// Take over the state returned by a completed turn.
    ///
    /// History is replaced wholesale. Tutorial state and image are only
    /// replaced when the turn returned them.
    pub fn absorb(&mut self, payload: &DonePayload) {
        self.history = payload.conversation_history.clone();
        if payload.has_tutorial() {
            self.tutorial_data = payload.tutorial_data.clone();
        }
        if payload.generated_image.is_some() {
            self.generated_image = payload.generated_image.clone();
        }
    }
}

/// Prints one turn as it streams.
pub struct TerminalRenderer<W: Write + Send> {
    out: W,
    last_status: Option<String>,
    streamed: String,
}

impl<W: Write + Send> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            last_status: None,
            streamed: String::new(),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> StreamHandler for TerminalRenderer<W> {
    fn on_status(&mut self, status: &ThinkingPayload) {
        // Status is only shown until generated text starts
        if !self.streamed.is_empty() || self.last_status.as_deref() == Some(status.text.as_str()) {
            return;
        }
        let _ = writeln!(self.out, "  ... {}", status.text);
        let _ = self.out.flush();
        self.last_status = Some(status.text.clone());
    }

    fn on_token(&mut self, text: &str) {
        self.streamed.push_str(text);
        let _ = write!(self.out, "{}", text);
        let _ = self.out.flush();
    }

    fn on_done(&mut self, payload: &DonePayload) {
        if self.streamed.is_empty() {
            let _ = writeln!(self.out, "{}", payload.response);
        } else if self.streamed.trim() == payload.response.trim() {
            let _ = writeln!(self.out);
        } else {
            // Final response supersedes the streamed text
            let _ = writeln!(self.out);
            let _ = writeln!(self.out, "{}", payload.response);
        }
        if payload.has_tutorial() {
            let _ = writeln!(self.out, "  [tutorial updated]");
        }
        let _ = self.out.flush();
    }

    fn on_error(&mut self, error: &TurnError) {
        if !self.streamed.is_empty() {
            let _ = writeln!(self.out);
        }
        let _ = writeln!(self.out, "Error: {}", error.user_message());
        let _ = self.out.flush();
    }
}

/// Run the interactive chat until end of input, `/quit` or Ctrl-C at the
/// prompt.
///
/// Ctrl-C during a turn abandons that turn; the conversation state is left
/// as it was before it.
pub async fn run_chat<C, R, W>(
    coordinator: &FallbackCoordinator<C>,
    input: R,
    out: &mut W,
) -> Result<Conversation>
where
    C: HttpClient,
    R: AsyncBufRead + Unpin,
    W: Write + Send,
{
    run_chat_with_interrupt(coordinator, input, out, tokio::signal::ctrl_c).await
}

/// [`run_chat`] with a custom interrupt source.
///
/// `interrupt` is called for each wait; the future it returns completing
/// counts as one Ctrl-C.
pub async fn run_chat_with_interrupt<C, R, W, I, F>(
    coordinator: &FallbackCoordinator<C>,
    input: R,
    out: &mut W,
    mut interrupt: I,
) -> Result<Conversation>
where
    C: HttpClient,
    R: AsyncBufRead + Unpin,
    W: Write + Send,
    I: FnMut() -> F,
    F: Future<Output = std::io::Result<()>>,
{
    let mut conversation = Conversation::new();
    let mut lines = input.lines();

    loop {
        write!(out, "{}", PROMPT)?;
        out.flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = interrupt() => {
                tracing::debug!("Interrupted at prompt");
                writeln!(out)?;
                break;
            }
        };
        let line = match line {
            Some(line) => line,
            None => break,
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "/quit" || message == "/exit" {
            break;
        }

        let request = conversation.request(message);
        let mut renderer = TerminalRenderer::new(&mut *out);

        let abandoned = tokio::select! {
            result = coordinator.run_turn(&request, &mut renderer) => {
                if let Ok(completion) = result {
                    if completion.path == CompletionPath::Fallback {
                        tracing::info!(session_id = %completion.session_id, "Turn answered by fallback");
                    }
                    conversation.absorb(&completion.payload);
                }
                false
            }
            _ = interrupt() => true,
        };
        drop(renderer);

        if abandoned {
            tracing::debug!("Turn abandoned by user");
            writeln!(out)?;
            writeln!(out, "[turn abandoned]")?;
        }
    }

    Ok(conversation)
}
