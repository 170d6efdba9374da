// src/notifications/notification_service.rs
// In-app notifications for the user who owns a record

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use parking_lot::Mutex;
use redis::aio::MultiplexedConnection;
use serde::{Deserialize, Serialize};
use std::future::Future;
use uuid::Uuid;

use crate::errors::NotifyError;
use crate::notifications::dispatcher::Delivery;
use crate::types::{RecordId, RecordKind, Subject};

const NO_OWNER: &str = "record has no owning user";

pub trait NotificationService: Send + Sync {
    /// Create a notification for the record's owner. Records without an owning
    /// user are skipped, not an error.
    fn notify(
        &self,
        subject: Subject<'_>,
        status: &str,
    ) -> impl Future<Output = Result<Delivery, NotifyError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InAppNotification {
    pub id: String,
    pub user_id: String,
    pub record_kind: RecordKind,
    pub record_id: RecordId,
    pub status: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
    pub read: bool,
}

impl InAppNotification {
    /// Returns `None` when nobody owns the record.
    pub fn for_subject(subject: Subject<'_>, status: &str) -> Option<Self> {
        let user_id = subject.owner_user_id()?;
        Some(Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            record_kind: subject.kind(),
            record_id: subject.id().clone(),
            status: status.to_string(),
            message: notification_message(subject, status),
            created_at: Utc::now(),
            read: false,
        })
    }
}

pub fn notification_message(subject: Subject<'_>, status: &str) -> String {
    let status = status.replace('_', " ");
    match subject {
        Subject::Order(order) => match status.as_str() {
            "completed" => format!("Payment received for order #{}", order.id),
            "failed" => format!("Payment for order #{} failed", order.id),
            _ => format!("Your order #{} is now {}", order.id, status),
        },
        Subject::Donation(donation) => match status.as_str() {
            "completed" => format!(
                "Thank you! Your donation of {} {:.0} was received",
                donation.currency, donation.amount
            ),
            _ => format!("Your donation #{} is now {}", donation.id, status),
        },
        Subject::Application(application) => format!(
            "Your volunteer application for {} is {}",
            application.role, status
        ),
    }
}

/// Pushes notifications onto a per-user Redis list, newest first.
#[derive(Clone)]
pub struct RedisNotificationService {
    connection: MultiplexedConnection,
    history_limit: usize,
    enabled: bool,
}

impl RedisNotificationService {
    pub fn new(connection: MultiplexedConnection, history_limit: usize, enabled: bool) -> Self {
        if enabled {
            info!("🔔 In-app notifications enabled (keeping last {} per user)", history_limit);
        } else {
            warn!("🔔 In-app notifications disabled - NOTIFICATIONS_ENABLED is not set");
        }

        Self {
            connection,
            history_limit: history_limit.max(1),
            enabled,
        }
    }

    pub fn user_key(user_id: &str) -> String {
        format!("notifications:user:{}", user_id)
    }
}

impl NotificationService for RedisNotificationService {
    async fn notify(&self, subject: Subject<'_>, status: &str) -> Result<Delivery, NotifyError> {
        if !self.enabled {
            return Ok(Delivery::skipped("notifications disabled"));
        }

        let Some(notification) = InAppNotification::for_subject(subject, status) else {
            debug!(
                "🔔 {} {} has no owning user, skipping notification",
                subject.kind(),
                subject.id()
            );
            return Ok(Delivery::skipped(NO_OWNER));
        };

        let key = Self::user_key(&notification.user_id);
        let payload = serde_json::to_string(&notification)?;
        let mut connection = self.connection.clone();

        redis::pipe()
            .lpush(&key, payload)
            .ignore()
            .ltrim(&key, 0, self.history_limit as isize - 1)
            .ignore()
            .query_async::<_, ()>(&mut connection)
            .await?;

        info!(
            "🔔 Notified user {} about {} {} -> {}",
            notification.user_id, notification.record_kind, notification.record_id, status
        );
        Ok(Delivery::Sent)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotifyCall {
    pub kind: RecordKind,
    pub record_id: RecordId,
    pub status: String,
}

/// Keeps notifications in memory. Every call is recorded, deliveries only
/// happen for records with an owner.
#[derive(Default)]
pub struct MemoryNotificationService {
    calls: Mutex<Vec<NotifyCall>>,
    delivered: Mutex<Vec<InAppNotification>>,
}

impl MemoryNotificationService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<NotifyCall> {
        self.calls.lock().clone()
    }

    pub fn delivered(&self) -> Vec<InAppNotification> {
        self.delivered.lock().clone()
    }

    pub fn for_user(&self, user_id: &str) -> Vec<InAppNotification> {
        self.delivered
            .lock()
            .iter()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect()
    }
}

impl NotificationService for MemoryNotificationService {
    async fn notify(&self, subject: Subject<'_>, status: &str) -> Result<Delivery, NotifyError> {
        self.calls.lock().push(NotifyCall {
            kind: subject.kind(),
            record_id: subject.id().clone(),
            status: status.to_string(),
        });

        match InAppNotification::for_subject(subject, status) {
            Some(notification) => {
                self.delivered.lock().push(notification);
                Ok(Delivery::Sent)
            }
            None => Ok(Delivery::skipped(NO_OWNER)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ApplicationStatus, Donation, PaymentStatus, VolunteerApplication};

    fn donation(user_id: Option<&str>) -> Donation {
        Donation {
            id: RecordId::from("don-7"),
            user_id: user_id.map(str::to_string),
            donor_name: "Okello".to_string(),
            donor_email: None,
            amount: 25_000.0,
            currency: "UGX".to_string(),
            payment_status: PaymentStatus::Completed,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_no_owner_means_no_notification() {
        let donation = donation(None);
        assert!(InAppNotification::for_subject(Subject::Donation(&donation), "completed").is_none());
    }

    #[test]
    fn test_messages_per_kind() {
        let donation = donation(Some("user-3"));
        let notification =
            InAppNotification::for_subject(Subject::Donation(&donation), "completed").unwrap();
        assert_eq!(notification.user_id, "user-3");
        assert_eq!(notification.message, "Thank you! Your donation of UGX 25000 was received");

        let application = VolunteerApplication {
            id: RecordId::from("app-2"),
            user_id: Some("user-4".to_string()),
            applicant_name: "Nakato".to_string(),
            applicant_email: None,
            role: "Food bank driver".to_string(),
            status: ApplicationStatus::Approved,
            updated_at: Utc::now(),
        };
        assert_eq!(
            notification_message(Subject::Application(&application), "approved"),
            "Your volunteer application for Food bank driver is approved"
        );
    }

    #[tokio::test]
    async fn test_memory_service_records_calls_without_owner() {
        let service = MemoryNotificationService::new();
        let orphan = donation(None);
        let owned = donation(Some("user-5"));

        assert_eq!(
            service.notify(Subject::Donation(&orphan), "failed").await.unwrap(),
            Delivery::skipped(NO_OWNER)
        );
        assert_eq!(
            service.notify(Subject::Donation(&owned), "completed").await.unwrap(),
            Delivery::Sent
        );

        assert_eq!(service.calls().len(), 2);
        assert_eq!(service.delivered().len(), 1);
        assert_eq!(service.for_user("user-5")[0].status, "completed");
    }
}
