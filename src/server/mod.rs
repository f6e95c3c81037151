//! Line-delimited JSON server loop
//!
//! Reads one command per line, answers each with one JSON object per line.
//! Lines are handled strictly one at a time: a response is written and
//! flushed before the next line is read.

use crate::core::config::{EXIT_SENTINEL, LOG_TARGET};
use crate::core::error::Result;
use crate::nlu::classifier::ZeroShotClassifier;
use crate::nlu::processor::CommandProcessor;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// What to do with a single input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineAction<'a> {
    /// The exit sentinel: stop reading
    Exit,
    /// Blank line: no output
    Skip,
    /// Trimmed text to classify
    Classify(&'a str),
}

impl<'a> LineAction<'a> {
    /// The sentinel check runs before the emptiness check
    pub fn from_line(line: &'a str) -> Self {
        let text = line.trim();
        if text.eq_ignore_ascii_case(EXIT_SENTINEL) {
            Self::Exit
        } else if text.is_empty() {
            Self::Skip
        } else {
            Self::Classify(text)
        }
    }
}

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shutdown {
    ExitSentinel,
    EndOfInput,
}

/// Drives a [`CommandProcessor`] from a line reader to a line writer
pub struct LineServer<C> {
    processor: CommandProcessor<C>,
    lines_answered: u64,
}

impl<C: ZeroShotClassifier> LineServer<C> {
    pub fn new(processor: CommandProcessor<C>) -> Self {
        Self {
            processor,
            lines_answered: 0,
        }
    }

    /// Number of response lines written so far
    pub fn lines_answered(&self) -> u64 {
        self.lines_answered
    }

    /// Serve until the exit sentinel or end of input
    ///
    /// Classification failures are answered in-band. Only failures of the
    /// streams themselves end the loop with an error. Bytes that are not
    /// valid UTF-8 are replaced with U+FFFD rather than rejected.
    pub async fn run<R, W>(&mut self, mut reader: R, mut writer: W) -> Result<Shutdown>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();

        tracing::info!(
            target: LOG_TARGET,
            "NLU Server Ready. Waiting for input..."
        );

        let reason = loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                tracing::info!(target: LOG_TARGET, "Input closed. Shutting down.");
                break Shutdown::EndOfInput;
            }
            let line = String::from_utf8_lossy(&buf);

            match LineAction::from_line(&line) {
                LineAction::Exit => {
                    tracing::info!(
                        target: LOG_TARGET,
                        "Received {} command. Shutting down.",
                        EXIT_SENTINEL
                    );
                    break Shutdown::ExitSentinel;
                }
                LineAction::Skip => continue,
                LineAction::Classify(text) => self.answer(text, &mut writer).await?,
            }
        };

        Ok(reason)
    }

    /// Write one response line and flush it before returning
    async fn answer<W>(&mut self, text: &str, writer: &mut W) -> Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        let response = self.processor.process(text).await;
        let mut json = serde_json::to_vec(&response)?;
        json.push(b'\n');
        writer.write_all(&json).await?;
        writer.flush().await?;
        self.lines_answered += 1;
        Ok(())
    }
}
