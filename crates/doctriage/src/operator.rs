use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, unbounded, Sender};
use log::{debug, error, info};

use crate::error::WorkerError;

/// What the operator decided for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Defer the file to the review queue.
    ReviewLater,
    /// File the document under this (possibly new) category name.
    NewCategory(String),
}

impl Decision {
    /// Interprets a raw operator answer. Empty input and the literal
    /// "review later" (or "later") defer; anything else names a category.
    pub fn parse(input: &str) -> Self {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Decision::ReviewLater;
        }
        match trimmed.to_lowercase().as_str() {
            "review later" | "later" => Decision::ReviewLater,
            _ => Decision::NewCategory(trimmed.to_string()),
        }
    }
}

/// One file presented to the operator.
#[derive(Debug, Clone)]
pub struct Review {
    pub path: PathBuf,
    pub mime_type: Option<String>,
    pub preview: String,
    /// True when `preview` is a cut-down prefix of the extracted text.
    pub truncated: bool,
}

/// The prompt surface. Implementations block until the operator answers;
/// the desk guarantees they are only ever called from one thread.
pub trait OperatorPrompt: Send {
    fn ask(&mut self, review: &Review) -> Decision;
}

struct ReviewRequest {
    review: Review,
    reply: Sender<Decision>,
}

/// Cloneable handle workers use to consult the operator.
#[derive(Clone)]
pub struct OperatorHandle {
    request_tx: Sender<ReviewRequest>,
}

impl OperatorHandle {
    /// Sends one review to the desk and blocks until the operator
    /// answers. Human response time is unbounded, so the calling worker
    /// parks here for as long as it takes.
    pub fn consult(&self, review: Review) -> Result<Decision, WorkerError> {
        let (reply_tx, reply_rx) = bounded(1);
        self.request_tx
            .send(ReviewRequest {
                review,
                reply: reply_tx,
            })
            .map_err(|_| WorkerError::OperatorUnavailable)?;
        reply_rx.recv().map_err(|_| WorkerError::OperatorUnavailable)
    }
}

/// Single-consumer actor in front of the operator.
///
/// N workers can hit the prompt boundary concurrently; funnelling every
/// request through one dedicated thread keeps the operator's session
/// strictly one-file-at-a-time and keeps prompt state off the workers.
pub struct OperatorDesk {
    request_tx: Sender<ReviewRequest>,
    shutdown: Arc<AtomicBool>,
    handle: JoinHandle<()>,
}

impl OperatorDesk {
    pub fn spawn(mut prompt: Box<dyn OperatorPrompt>) -> Self {
        let (request_tx, request_rx) = unbounded::<ReviewRequest>();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_flag = Arc::clone(&shutdown);

        let handle = thread::spawn(move || {
            debug!("Operator desk started");
            loop {
                if shutdown_flag.load(Ordering::Relaxed) {
                    break;
                }
                match request_rx.recv_timeout(Duration::from_millis(100)) {
                    Ok(request) => {
                        let decision = prompt.ask(&request.review);
                        // A dropped reply receiver means the worker gave
                        // up; nothing to do but move on.
                        let _ = request.reply.send(decision);
                    }
                    Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
                    Err(crossbeam_channel::RecvTimeoutError::Disconnected) => break,
                }
            }
            debug!("Operator desk stopped");
        });

        Self {
            request_tx,
            shutdown,
            handle,
        }
    }

    pub fn handle(&self) -> OperatorHandle {
        OperatorHandle {
            request_tx: self.request_tx.clone(),
        }
    }

    /// Stops the desk and waits for the prompt thread to finish. Pending
    /// and later consultations resolve to `OperatorUnavailable`.
    pub fn close(self) {
        self.shutdown.store(true, Ordering::Relaxed);
        drop(self.request_tx);
        if self.handle.join().is_err() {
            error!("Operator desk thread panicked");
        }
    }
}

/// Interactive prompt reading answers from stdin.
pub struct StdinPrompt;

impl OperatorPrompt for StdinPrompt {
    fn ask(&mut self, review: &Review) -> Decision {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        let _ = write!(out, "{}", format_review(review));
        let _ = out.flush();

        let mut answer = String::new();
        if std::io::stdin().lock().read_line(&mut answer).is_err() {
            info!("Stdin closed, deferring {}", review.path.display());
            return Decision::ReviewLater;
        }
        Decision::parse(&answer)
    }
}

/// Renders the prompt text for one review. A trailing ellipsis marks a
/// preview that was actually cut short.
fn format_review(review: &Review) -> String {
    let mut text = format!("\nFile: {}\n", review.path.display());
    if let Some(mime) = &review.mime_type {
        text.push_str(&format!("Type: {}\n", mime));
    }
    let suffix = if review.truncated { "..." } else { "" };
    text.push_str(&format!("Extracted text: {}{}\n", review.preview, suffix));
    text.push_str("Category name (empty or \"review later\" to defer): ");
    text
}

/// Truncates a preview to at most `limit` characters, on a char boundary.
pub fn truncate_preview(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
