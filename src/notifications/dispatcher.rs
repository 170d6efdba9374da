// src/notifications/dispatcher.rs
use log::{debug, error, info};
use serde::Serialize;
use std::sync::Arc;

use crate::errors::EmailError;
use crate::notifications::email_service::EmailService;
use crate::notifications::notification_service::NotificationService;
use crate::notifications::status_diff::{Effect, EmailKind};
use crate::types::Subject;

/// What a collaborator did with one effect. `Skipped` covers a switched-off
/// channel or a record with nobody to tell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "reason", rename_all = "snake_case")]
pub enum Delivery {
    Sent,
    Skipped(String),
}

impl Delivery {
    pub fn skipped(reason: impl Into<String>) -> Self {
        Delivery::Skipped(reason.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedEffect {
    pub effect: Effect,
    pub reason: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectFailure {
    pub effect: Effect,
    pub error: String,
}

/// What happened to each effect of one save.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DispatchReport {
    pub delivered: Vec<Effect>,
    pub skipped: Vec<SkippedEffect>,
    pub failed: Vec<EffectFailure>,
}

impl DispatchReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.delivered.len() + self.skipped.len() + self.failed.len()
    }
}

/// Runs effects against the notification and email collaborators.
pub struct EffectDispatcher<N, E> {
    notifications: Arc<N>,
    email: Arc<E>,
}

impl<N, E> Clone for EffectDispatcher<N, E> {
    fn clone(&self) -> Self {
        Self {
            notifications: self.notifications.clone(),
            email: self.email.clone(),
        }
    }
}

impl<N: NotificationService, E: EmailService> EffectDispatcher<N, E> {
    pub fn new(notifications: Arc<N>, email: Arc<E>) -> Self {
        Self {
            notifications,
            email,
        }
    }

    pub fn notifications(&self) -> &Arc<N> {
        &self.notifications
    }

    pub fn email(&self) -> &Arc<E> {
        &self.email
    }

    /// Every effect is attempted once, in order. A failing collaborator is
    /// logged and reported but never stops the rest.
    pub async fn dispatch(&self, subject: Subject<'_>, effects: &[Effect]) -> DispatchReport {
        let mut report = DispatchReport::default();

        if effects.is_empty() {
            return report;
        }

        info!(
            "📢 Dispatching {} effect(s) for {} {}",
            effects.len(),
            subject.kind(),
            subject.id()
        );

        for effect in effects {
            let result = match effect {
                Effect::Notify { status } => self
                    .notifications
                    .notify(subject, status)
                    .await
                    .map_err(|e| e.to_string()),
                Effect::Email(kind) => self.send_email(kind, subject).await.map_err(|e| e.to_string()),
            };

            match result {
                Ok(Delivery::Sent) => report.delivered.push(effect.clone()),
                Ok(Delivery::Skipped(reason)) => {
                    debug!(
                        "📢 {:?} skipped for {} {}: {}",
                        effect,
                        subject.kind(),
                        subject.id(),
                        reason
                    );
                    report.skipped.push(SkippedEffect {
                        effect: effect.clone(),
                        reason,
                    });
                }
                Err(e) => {
                    error!(
                        "📢 {:?} failed for {} {}: {}",
                        effect,
                        subject.kind(),
                        subject.id(),
                        e
                    );
                    report.failed.push(EffectFailure {
                        effect: effect.clone(),
                        error: e,
                    });
                }
            }
        }

        report
    }

    async fn send_email(&self, kind: &EmailKind, subject: Subject<'_>) -> Result<Delivery, EmailError> {
        match (kind, subject) {
            (EmailKind::OrderConfirmation, Subject::Order(order)) => {
                self.email.order_confirmation(order).await
            }
            (EmailKind::OrderStatusUpdate { status }, Subject::Order(order)) => {
                self.email.order_status_update(order, status).await
            }
            (EmailKind::DonationConfirmation, Subject::Donation(donation)) => {
                self.email.donation_confirmation(donation).await
            }
            (EmailKind::VolunteerStatusUpdate { status }, Subject::Application(application)) => {
                self.email.volunteer_status_update(application, status).await
            }
            (kind, subject) => Err(EmailError::SubjectMismatch {
                email: kind.name(),
                kind: subject.kind(),
            }),
        }
    }
}
