//! Displayed result set.
//!
//! Each generation attempt takes a ticket when it starts. Only the newest
//! ticket may write back, so a slow earlier batch that settles late cannot
//! overwrite what a newer batch produced.

use crate::models::{GenerationOutcome, GenerationResult};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchTicket(u64);

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GalleryState {
    pub images: Vec<GenerationResult>,
    pub error: Option<String>,
    pub is_generating: bool,
}

#[derive(Debug, Default)]
struct Inner {
    state: GalleryState,
    current: u64,
}

#[derive(Debug, Clone, Default)]
pub struct Gallery {
    inner: Arc<RwLock<Inner>>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new batch: clears the previous images and error.
    pub async fn begin_batch(&self) -> BatchTicket {
        let mut inner = self.inner.write().await;
        inner.current += 1;
        inner.state = GalleryState {
            images: Vec::new(),
            error: None,
            is_generating: true,
        };
        BatchTicket(inner.current)
    }

    /// Apply a settled outcome. Returns `false` when a newer batch has started
    /// since `ticket` was issued, in which case nothing changes.
    pub async fn settle(&self, ticket: BatchTicket, outcome: &GenerationOutcome) -> bool {
        let mut inner = self.inner.write().await;
        if ticket.0 != inner.current {
            debug!(
                "Discarding stale batch {} (current is {})",
                ticket.0, inner.current
            );
            return false;
        }

        inner.state = match outcome {
            GenerationOutcome::Success(results) => GalleryState {
                images: results.clone(),
                error: None,
                is_generating: false,
            },
            other => GalleryState {
                images: Vec::new(),
                error: other.user_message().map(str::to_string),
                is_generating: false,
            },
        };
        true
    }

    pub async fn snapshot(&self) -> GalleryState {
        self.inner.read().await.state.clone()
    }
}
