//! Transient transaction status shown to the user.
//!
//! Terminal statuses dismiss themselves after a fixed delay. Each update bumps a generation
//! counter so a late dismissal never hides a newer status.

use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use utoipa::ToSchema;

pub const SUCCESS_DISMISS_AFTER: Duration = Duration::from_millis(2000);
pub const ERROR_DISMISS_AFTER: Duration = Duration::from_millis(3000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    #[default]
    Pending,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, Default)]
pub struct TransactionStatus {
    pub visible: bool,
    pub status: StatusKind,
    pub message: String,
}

struct Slot {
    status: TransactionStatus,
    generation: u64,
}

#[derive(Clone)]
pub struct StatusBoard {
    slot: Arc<Mutex<Slot>>,
    success_after: Duration,
    error_after: Duration,
}

impl Default for StatusBoard {
    fn default() -> Self {
        Self::new(SUCCESS_DISMISS_AFTER, ERROR_DISMISS_AFTER)
    }
}

impl StatusBoard {
    pub fn new(success_after: Duration, error_after: Duration) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Slot {
                status: TransactionStatus::default(),
                generation: 0,
            })),
            success_after,
            error_after,
        }
    }

    pub async fn current(&self) -> TransactionStatus {
        self.slot.lock().await.status.clone()
    }

    /// Pending statuses stay until replaced.
    pub async fn pending(&self, message: impl Into<String>) {
        self.show(StatusKind::Pending, message.into()).await;
    }

    pub async fn success(&self, message: impl Into<String>) {
        let generation = self.show(StatusKind::Success, message.into()).await;
        self.dismiss_later(generation, self.success_after);
    }

    pub async fn error(&self, message: impl Into<String>) {
        let generation = self.show(StatusKind::Error, message.into()).await;
        self.dismiss_later(generation, self.error_after);
    }

    async fn show(&self, status: StatusKind, message: String) -> u64 {
        let mut slot = self.slot.lock().await;
        slot.generation += 1;
        slot.status = TransactionStatus {
            visible: true,
            status,
            message,
        };
        slot.generation
    }

    fn dismiss_later(&self, generation: u64, after: Duration) {
        let slot = self.slot.clone();
        tokio::spawn(async move {
            tokio::time::sleep(after).await;
            let mut slot = slot.lock().await;
            if slot.generation == generation {
                slot.status = TransactionStatus::default();
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn success_dismisses_after_delay() {
        let board = StatusBoard::default();
        board.success("done").await;
        assert_eq!(board.current().await.status, StatusKind::Success);

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert!(board.current().await.visible);

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(board.current().await, TransactionStatus::default());
    }

    #[tokio::test(start_paused = true)]
    async fn newer_status_survives_older_dismissal() {
        let board = StatusBoard::default();
        board.success("first").await;
        tokio::time::sleep(Duration::from_millis(1500)).await;
        board.error("second").await;

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let current = board.current().await;
        assert_eq!(current.status, StatusKind::Error);
        assert_eq!(current.message, "second");

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert!(!board.current().await.visible);
    }

    #[tokio::test(start_paused = true)]
    async fn pending_stays_visible() {
        let board = StatusBoard::default();
        board.pending("working").await;
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(board.current().await.status, StatusKind::Pending);
    }
}
