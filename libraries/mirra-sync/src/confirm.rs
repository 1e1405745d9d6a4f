/// Operator confirmation of diffs
use crate::diffs::Diffs;
use crate::error::{Result, SyncError};
use crate::types::SyncOperation;
use async_trait::async_trait;
use mirra_core::RelativePath;
use std::io;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin, Stdout};

const INVALID_ANSWER: &str = "Invalid answer. Please answer with \"y\", \"yes\", \"n\", \"no\"";

/// A way to put yes/no questions to an operator.
#[async_trait]
pub trait Prompter: Send {
    /// Show `question` and return the raw answer.
    async fn ask(&mut self, question: &str) -> io::Result<String>;

    /// Show a message that needs no answer.
    async fn notify(&mut self, message: &str) -> io::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Answer {
    Yes,
    No,
    Invalid,
}

/// Empty input counts as yes.
pub fn parse_answer(answer: &str) -> Answer {
    match answer.trim().to_lowercase().as_str() {
        "" | "y" | "yes" => Answer::Yes,
        "n" | "no" => Answer::No,
        _ => Answer::Invalid,
    }
}

fn question(operation: SyncOperation, path: &RelativePath) -> String {
    format!("Do you want to sync ({}) \"{}\"? (y/n): ", operation, path)
}

/// Ask about every path, batch by batch, and keep the accepted ones.
///
/// Invalid answers repeat the question. Returns `None` when nothing was
/// accepted.
pub async fn confirm_diffs(diffs: Diffs, prompter: &mut dyn Prompter) -> Result<Option<Diffs>> {
    let mut confirmed = Diffs::new();

    for operation in SyncOperation::ALL {
        for path in diffs.batch(operation) {
            loop {
                let answer = prompter
                    .ask(&question(operation, path))
                    .await
                    .map_err(SyncError::Prompt)?;

                match parse_answer(&answer) {
                    Answer::Yes => {
                        confirmed.push(operation, path.clone());
                        break;
                    }
                    Answer::No => break,
                    Answer::Invalid => {
                        prompter
                            .notify(INVALID_ANSWER)
                            .await
                            .map_err(SyncError::Prompt)?;
                    }
                }
            }
        }
    }

    Ok(confirmed.into_option())
}

/// Reads answers line by line from standard input.
pub struct StdinPrompter {
    lines: Lines<BufReader<Stdin>>,
    stdout: Stdout,
}

impl StdinPrompter {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
            stdout: tokio::io::stdout(),
        }
    }
}

impl Default for StdinPrompter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prompter for StdinPrompter {
    async fn ask(&mut self, question: &str) -> io::Result<String> {
        self.stdout.write_all(question.as_bytes()).await?;
        self.stdout.flush().await?;

        self.lines.next_line().await?.ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "Standard input closed while waiting for an answer",
            )
        })
    }

    async fn notify(&mut self, message: &str) -> io::Result<()> {
        self.stdout.write_all(message.as_bytes()).await?;
        self.stdout.write_all(b"\n").await?;
        self.stdout.flush().await
    }
}

/// Accepts everything without asking.
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoApprove;

#[async_trait]
impl Prompter for AutoApprove {
    async fn ask(&mut self, _question: &str) -> io::Result<String> {
        Ok("y".to_string())
    }

    async fn notify(&mut self, _message: &str) -> io::Result<()> {
        Ok(())
    }
}
