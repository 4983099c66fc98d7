//! Line editing for the interactive loop.
//!
//! rustyline blocks, so it lives on its own thread. The async loop asks for
//! a line with [`LineReader::request`] and awaits [`LineReader::next`], which
//! can be raced against live message updates.

use std::sync::mpsc as std_mpsc;
use std::thread;

use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::mpsc;

use crate::error::{Error, Result};

/// Result of one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A line of input, without the trailing newline.
    Line(String),
    /// Ctrl-C at the prompt.
    Interrupted,
    /// Ctrl-D or a closed stdin.
    Eof,
    /// The editor failed.
    Failed(String),
}

/// Handle on the line-editor thread.
pub struct LineReader {
    prompts: std_mpsc::Sender<String>,
    outcomes: mpsc::UnboundedReceiver<ReadOutcome>,
}

impl LineReader {
    /// Starts the editor thread.
    pub fn spawn() -> Result<Self> {
        let (prompts, prompt_rx) = std_mpsc::channel::<String>();
        let (outcome_tx, outcomes) = mpsc::unbounded_channel();
        let (ready_tx, ready_rx) = std_mpsc::channel::<std::result::Result<(), String>>();

        thread::Builder::new()
            .name("ntc-readline".to_string())
            .spawn(move || {
                let mut editor = match DefaultEditor::new() {
                    Ok(editor) => {
                        let _ = ready_tx.send(Ok(()));
                        editor
                    }
                    Err(err) => {
                        let _ = ready_tx.send(Err(err.to_string()));
                        return;
                    }
                };
                while let Ok(prompt) = prompt_rx.recv() {
                    let outcome = match editor.readline(&prompt) {
                        Ok(line) => {
                            if !line.trim().is_empty() {
                                let _ = editor.add_history_entry(line.as_str());
                            }
                            ReadOutcome::Line(line)
                        }
                        Err(ReadlineError::Interrupted) => ReadOutcome::Interrupted,
                        Err(ReadlineError::Eof) => ReadOutcome::Eof,
                        Err(err) => ReadOutcome::Failed(err.to_string()),
                    };
                    if outcome_tx.send(outcome).is_err() {
                        break;
                    }
                }
            })
            .map_err(|err| Error::io("failed to spawn the line editor thread", err))?;

        match ready_rx.recv() {
            Ok(Ok(())) => Ok(Self { prompts, outcomes }),
            Ok(Err(message)) => Err(Error::client(
                format!("failed to start the line editor: {message}"),
                None,
            )),
            Err(_) => Err(Error::unknown("line editor thread exited during startup")),
        }
    }

    /// Shows `prompt` and starts reading a line.
    pub fn request(&self, prompt: &str) -> Result<()> {
        self.prompts
            .send(prompt.to_string())
            .map_err(|_| Error::unknown("line editor thread has stopped"))
    }

    /// Waits for the line requested last. Cancel-safe.
    pub async fn next(&mut self) -> ReadOutcome {
        self.outcomes.recv().await.unwrap_or(ReadOutcome::Eof)
    }
}
