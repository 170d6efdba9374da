// src/notifications/status_diff.rs
// Before/after comparison of watched status fields. Pure: no I/O, no logging.

use serde::Serialize;

use crate::types::{
    ApplicationSnapshot, ApplicationStatus, Donation, DonationSnapshot, Order, OrderSnapshot,
    OrderStatus, PaymentStatus, VolunteerApplication,
};

/// Order statuses that send the status update email.
pub const ORDER_STATUS_EMAIL_TRIGGERS: &[OrderStatus] = &[
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
];

/// Order statuses that create an in-app notification. Same members as the
/// email set for now.
pub const ORDER_STATUS_NOTIFY_TRIGGERS: &[OrderStatus] = &[
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
];

pub const APPLICATION_STATUS_TRIGGERS: &[ApplicationStatus] = &[
    ApplicationStatus::Approved,
    ApplicationStatus::Rejected,
    ApplicationStatus::Reviewing,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "email", rename_all = "snake_case")]
pub enum EmailKind {
    OrderConfirmation,
    OrderStatusUpdate { status: String },
    DonationConfirmation,
    VolunteerStatusUpdate { status: String },
}

impl EmailKind {
    pub fn name(&self) -> &'static str {
        match self {
            EmailKind::OrderConfirmation => "order_confirmation",
            EmailKind::OrderStatusUpdate { .. } => "order_status_update",
            EmailKind::DonationConfirmation => "donation_confirmation",
            EmailKind::VolunteerStatusUpdate { .. } => "volunteer_status_update",
        }
    }
}

/// A side effect decided by a diff, executed later by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum Effect {
    Notify { status: String },
    Email(EmailKind),
}

impl Effect {
    pub fn notify(status: impl Into<String>) -> Self {
        Effect::Notify {
            status: status.into(),
        }
    }
}

/// Payment track shared by orders and donations: notify on any change,
/// plus `confirmation` once the payment completes.
fn payment_effects(before: &PaymentStatus, after: &PaymentStatus, confirmation: EmailKind) -> Vec<Effect> {
    if before == after {
        return Vec::new();
    }

    let mut effects = vec![Effect::notify(after.as_str())];
    if *after == PaymentStatus::Completed {
        effects.push(Effect::Email(confirmation));
    }
    effects
}

pub fn diff_order(before: &OrderSnapshot, after: &Order) -> Vec<Effect> {
    let mut effects = payment_effects(
        &before.payment_status,
        &after.payment_status,
        EmailKind::OrderConfirmation,
    );

    if before.status != after.status {
        let status = after.status.as_str();
        if ORDER_STATUS_EMAIL_TRIGGERS.contains(&after.status) {
            effects.push(Effect::Email(EmailKind::OrderStatusUpdate {
                status: status.to_string(),
            }));
        }
        if ORDER_STATUS_NOTIFY_TRIGGERS.contains(&after.status) {
            effects.push(Effect::notify(status));
        }
    }

    effects
}

pub fn diff_donation(before: &DonationSnapshot, after: &Donation) -> Vec<Effect> {
    payment_effects(
        &before.payment_status,
        &after.payment_status,
        EmailKind::DonationConfirmation,
    )
}

pub fn diff_application(before: &ApplicationSnapshot, after: &VolunteerApplication) -> Vec<Effect> {
    if before.status == after.status || !APPLICATION_STATUS_TRIGGERS.contains(&after.status) {
        return Vec::new();
    }

    let status = after.status.as_str();
    vec![
        Effect::Email(EmailKind::VolunteerStatusUpdate {
            status: status.to_string(),
        }),
        Effect::notify(status),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Customer, RecordId};
    use chrono::Utc;

    fn order(status: &str, payment_status: &str) -> Order {
        Order {
            id: RecordId::from("ord-1"),
            user_id: Some("user-1".to_string()),
            customer: Customer {
                name: "Amina".to_string(),
                email: Some("amina@example.org".to_string()),
                phone: None,
            },
            items: Vec::new(),
            shipping_address: None,
            billing_address: None,
            status: OrderStatus::from(status),
            payment_status: PaymentStatus::from(payment_status),
            total: 50_000.0,
            currency: "UGX".to_string(),
            updated_at: Utc::now(),
        }
    }

    fn order_snapshot(status: &str, payment_status: &str) -> OrderSnapshot {
        OrderSnapshot {
            status: OrderStatus::from(status),
            payment_status: PaymentStatus::from(payment_status),
        }
    }

    fn donation(payment_status: &str) -> Donation {
        Donation {
            id: RecordId::from("don-1"),
            user_id: None,
            donor_name: "Okello".to_string(),
            donor_email: Some("okello@example.org".to_string()),
            amount: 20_000.0,
            currency: "UGX".to_string(),
            payment_status: PaymentStatus::from(payment_status),
            updated_at: Utc::now(),
        }
    }

    fn application(status: &str) -> VolunteerApplication {
        VolunteerApplication {
            id: RecordId::from("app-1"),
            user_id: Some("user-9".to_string()),
            applicant_name: "Nakato".to_string(),
            applicant_email: Some("nakato@example.org".to_string()),
            role: "Warehouse".to_string(),
            status: ApplicationStatus::from(status),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_payment_change_notifies_without_email() {
        for (old, new) in [("pending", "failed"), ("completed", "refunded"), ("failed", "pending")] {
            let effects = diff_order(&order_snapshot("pending", old), &order("pending", new));
            assert_eq!(effects, vec![Effect::notify(new)], "{} -> {}", old, new);
        }
    }

    #[test]
    fn test_payment_completed_sends_confirmation() {
        let effects = diff_order(&order_snapshot("pending", "pending"), &order("pending", "completed"));
        assert_eq!(
            effects,
            vec![
                Effect::notify("completed"),
                Effect::Email(EmailKind::OrderConfirmation),
            ]
        );
    }

    #[test]
    fn test_unchanged_order_produces_nothing() {
        for (status, payment) in [("pending", "pending"), ("shipped", "completed"), ("weird", "odd")] {
            let effects = diff_order(&order_snapshot(status, payment), &order(status, payment));
            assert!(effects.is_empty(), "{} / {}", status, payment);
        }
    }

    #[test]
    fn test_order_status_into_trigger_set() {
        for new in ["processing", "shipped", "delivered"] {
            let effects = diff_order(&order_snapshot("pending", "completed"), &order(new, "completed"));
            assert_eq!(
                effects,
                vec![
                    Effect::Email(EmailKind::OrderStatusUpdate {
                        status: new.to_string()
                    }),
                    Effect::notify(new),
                ]
            );
        }
    }

    #[test]
    fn test_order_status_outside_trigger_set_is_ignored() {
        for new in ["cancelled", "pending", "returned"] {
            let effects = diff_order(&order_snapshot("processing", "completed"), &order(new, "completed"));
            assert!(effects.is_empty(), "transition into {} should be silent", new);
        }
    }

    #[test]
    fn test_both_order_tracks_fire_in_one_save() {
        let effects = diff_order(&order_snapshot("pending", "pending"), &order("processing", "completed"));
        assert_eq!(
            effects,
            vec![
                Effect::notify("completed"),
                Effect::Email(EmailKind::OrderConfirmation),
                Effect::Email(EmailKind::OrderStatusUpdate {
                    status: "processing".to_string()
                }),
                Effect::notify("processing"),
            ]
        );
    }

    #[test]
    fn test_donation_payment_track() {
        let before = DonationSnapshot {
            payment_status: PaymentStatus::Pending,
        };
        assert_eq!(
            diff_donation(&before, &donation("completed")),
            vec![
                Effect::notify("completed"),
                Effect::Email(EmailKind::DonationConfirmation),
            ]
        );
        assert_eq!(diff_donation(&before, &donation("failed")), vec![Effect::notify("failed")]);
        assert!(diff_donation(&before, &donation("pending")).is_empty());
    }

    #[test]
    fn test_application_transitions() {
        let before = ApplicationSnapshot {
            status: ApplicationStatus::Submitted,
        };
        for new in ["approved", "rejected", "reviewing"] {
            assert_eq!(
                diff_application(&before, &application(new)),
                vec![
                    Effect::Email(EmailKind::VolunteerStatusUpdate {
                        status: new.to_string()
                    }),
                    Effect::notify(new),
                ]
            );
        }

        let reviewing = ApplicationSnapshot {
            status: ApplicationStatus::Reviewing,
        };
        assert!(diff_application(&reviewing, &application("submitted")).is_empty());
        assert!(diff_application(&reviewing, &application("reviewing")).is_empty());
        assert!(diff_application(&reviewing, &application("withdrawn")).is_empty());
    }
}
