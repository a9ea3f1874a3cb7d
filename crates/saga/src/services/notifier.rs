//! Notification service trait and in-memory implementation.

use std::fmt;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::GuestId;

use crate::error::SagaError;

/// The kinds of guest notifications the booking flow produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    BookingConfirmed,
    BookingCancelled,
    BookingRejected,
}

impl NotificationKind {
    /// Wire name of the notification kind.
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::BookingConfirmed => "BOOKING_CONFIRMED",
            NotificationKind::BookingCancelled => "BOOKING_CANCELLED",
            NotificationKind::BookingRejected => "BOOKING_REJECTED",
        }
    }
}

impl fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A guest-facing notification.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Guest the notification is addressed to.
    pub guest_id: GuestId,
    /// Kind of event the notification reports.
    pub kind: NotificationKind,
    /// Short subject line.
    pub title: String,
    /// Body text.
    pub message: String,
    /// Identifier of the booking the notification refers to.
    pub reference: String,
}

impl Notification {
    /// Creates a new notification.
    pub fn new(
        guest_id: GuestId,
        kind: NotificationKind,
        title: impl Into<String>,
        message: impl Into<String>,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            guest_id,
            kind,
            title: title.into(),
            message: message.into(),
            reference: reference.into(),
        }
    }
}

/// Trait for delivering guest notifications.
///
/// Delivery is best effort everywhere it is used; callers log failures
/// instead of propagating them.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Delivers a notification to the guest.
    async fn notify(&self, notification: Notification) -> Result<(), SagaError>;
}

#[derive(Debug, Default)]
struct InMemoryNotificationState {
    sent: Vec<Notification>,
    fail_on_notify: bool,
}

/// In-memory notification service for testing.
#[derive(Debug, Clone, Default)]
pub struct InMemoryNotificationService {
    state: Arc<RwLock<InMemoryNotificationState>>,
}

impl InMemoryNotificationService {
    /// Creates a new in-memory notification service.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the service to fail delivery calls.
    pub fn set_fail_on_notify(&self, fail: bool) {
        self.state.write().unwrap().fail_on_notify = fail;
    }

    /// Number of notifications delivered so far.
    pub fn sent_count(&self) -> usize {
        self.state.read().unwrap().sent.len()
    }

    /// Number of delivered notifications of the given kind.
    pub fn count_of(&self, kind: NotificationKind) -> usize {
        self.state
            .read()
            .unwrap()
            .sent
            .iter()
            .filter(|n| n.kind == kind)
            .count()
    }

    /// The most recently delivered notification, if any.
    pub fn last(&self) -> Option<Notification> {
        self.state.read().unwrap().sent.last().cloned()
    }
}

#[async_trait]
impl NotificationService for InMemoryNotificationService {
    async fn notify(&self, notification: Notification) -> Result<(), SagaError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_notify {
            return Err(SagaError::NotificationService(
                "Delivery failed".to_string(),
            ));
        }

        state.sent.push(notification);
        Ok(())
    }
}
