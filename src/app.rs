// src/app.rs

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use voxcal_actions::{Dispatcher, HttpCalendarService, HttpWeatherService};
use voxcal_config::VoxcalConfig;
use voxcal_core::{VoxcalError, VoxcalResult};
use voxcal_nlu::NluEngine;
use voxcal_observability::MetricsCollector;

use crate::session::Conversation;

/// Reads transcripts line by line and speaks each reply back as a line.
pub struct VoxcalApp {
    config: VoxcalConfig,
    conversation: Conversation,
}

impl VoxcalApp {
    pub fn new(config: VoxcalConfig) -> VoxcalResult<Self> {
        info!("Initializing voxcal components...");

        let weather = Arc::new(HttpWeatherService::new(config.weather.clone())?);
        let calendar = Arc::new(HttpCalendarService::new(config.calendar.clone())?);
        let dispatcher = Dispatcher::new(weather, calendar)
            .with_default_location(config.calendar.default_location.clone());
        let nlu = NluEngine::new(&config.nlu)?;
        let metrics = Arc::new(MetricsCollector::with_enabled(
            config.observability.metrics_enabled,
        ));

        Ok(Self::with_conversation(
            config,
            Conversation::new(nlu, dispatcher, metrics),
        ))
    }

    pub fn with_conversation(config: VoxcalConfig, conversation: Conversation) -> Self {
        Self {
            config,
            conversation,
        }
    }

    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Talks over stdin/stdout until an exit word, end of input or ctrl-c.
    pub async fn run(&mut self) -> VoxcalResult<()> {
        info!("Starting voxcal assistant...");

        // Tokio's stdin read cannot be cancelled, so lines come from a plain thread.
        let (tx, mut lines) = mpsc::channel(16);
        std::thread::Builder::new()
            .name("stdin-reader".to_string())
            .spawn(move || forward_lines(std::io::stdin().lock(), tx))?;

        let mut stdout = tokio::io::stdout();
        let shutdown = wait_for_shutdown();
        tokio::pin!(shutdown);

        let result = async {
            speak(&mut stdout, &self.config.app.greeting).await?;
            loop {
                tokio::select! {
                    line = lines.recv() => match line {
                        Some(line) => {
                            if !self.answer(&line, &mut stdout).await? {
                                break;
                            }
                        }
                        None => break,
                    },
                    result = &mut shutdown => {
                        result?;
                        break;
                    }
                }
            }
            speak(&mut stdout, &self.config.app.farewell).await
        }
        .await;

        self.conversation.metrics().log_summary();
        result
    }

    /// The conversation loop over any line source and sink.
    pub async fn converse<R, W>(&mut self, input: R, output: &mut W) -> VoxcalResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        speak(output, &self.config.app.greeting).await?;

        let mut lines = input.lines();
        while let Some(line) = lines.next_line().await? {
            if !self.answer(&line, output).await? {
                break;
            }
        }

        speak(output, &self.config.app.farewell).await
    }

    /// Answers one transcript line. Returns `false` once an exit word arrives.
    async fn answer<W: AsyncWrite + Unpin>(
        &mut self,
        line: &str,
        output: &mut W,
    ) -> VoxcalResult<bool> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(true);
        }
        if self.config.is_exit_word(line) {
            info!("Exit word received");
            return Ok(false);
        }

        let reply = self.conversation.respond(line).await;
        speak(output, &reply).await?;
        Ok(true)
    }
}

/// Sends each input line to `lines` until input ends or the receiver is gone.
fn forward_lines<R: std::io::BufRead>(input: R, lines: mpsc::Sender<String>) {
    for line in input.lines() {
        match line {
            Ok(line) => {
                if lines.blocking_send(line).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to read input line");
                break;
            }
        }
    }
}

async fn speak<W: AsyncWrite + Unpin>(output: &mut W, text: &str) -> VoxcalResult<()> {
    output.write_all(text.as_bytes()).await?;
    output.write_all(b"\n").await?;
    output.flush().await?;
    Ok(())
}

async fn wait_for_shutdown() -> VoxcalResult<()> {
    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Received shutdown signal");
            Ok(())
        }
        Err(e) => {
            error!("Failed to listen for shutdown signal: {}", e);
            Err(VoxcalError::Unknown(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_forwarded_lines_arrive_in_order() {
        let (tx, mut rx) = mpsc::channel(1);
        let reader = std::thread::spawn(move || {
            forward_lines(std::io::Cursor::new("hello\n\nwhat is my next appointment\n"), tx)
        });

        let mut received = Vec::new();
        while let Some(line) = rx.recv().await {
            received.push(line);
        }
        reader.join().unwrap();

        assert_eq!(received, vec!["hello", "", "what is my next appointment"]);
    }

    #[test]
    fn test_forwarding_stops_once_receiver_is_gone() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);

        forward_lines(std::io::Cursor::new("one\ntwo\nthree\n"), tx);
    }
}
