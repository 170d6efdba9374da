// src/notifications/email_service.rs
// Transactional emails, delivered through an HTTP mail relay

use log::{error, info, warn};
use parking_lot::Mutex;
use reqwest::Client;
use serde_json::json;
use std::future::Future;

use crate::errors::EmailError;
use crate::notifications::dispatcher::Delivery;
use crate::notifications::email_templates::{self, RenderedEmail};
use crate::notifications::status_diff::EmailKind;
use crate::types::{Donation, Order, Subject, VolunteerApplication};

pub trait EmailService: Send + Sync {
    fn order_confirmation(&self, order: &Order) -> impl Future<Output = Result<Delivery, EmailError>> + Send;

    fn order_status_update(
        &self,
        order: &Order,
        status: &str,
    ) -> impl Future<Output = Result<Delivery, EmailError>> + Send;

    fn donation_confirmation(
        &self,
        donation: &Donation,
    ) -> impl Future<Output = Result<Delivery, EmailError>> + Send;

    fn volunteer_status_update(
        &self,
        application: &VolunteerApplication,
        status: &str,
    ) -> impl Future<Output = Result<Delivery, EmailError>> + Send;
}

pub struct MailRelayEmailService {
    client: Client,
    relay_url: Option<String>,
    relay_token: Option<String>,
    from: String,
    enabled: bool,
}

impl MailRelayEmailService {
    pub fn new(relay_url: Option<String>, relay_token: Option<String>, from: String) -> Self {
        let enabled = relay_url.is_some();

        if enabled {
            info!("📧 Mail relay initialized (sending as {})", from);
        } else {
            warn!("📧 Mail relay disabled - missing MAIL_RELAY_URL");
        }

        Self {
            client: Client::new(),
            relay_url,
            relay_token,
            from,
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn deliver(&self, kind: EmailKind, subject: Subject<'_>) -> Result<Delivery, EmailError> {
        let Some(relay_url) = self.relay_url.as_deref() else {
            return Ok(Delivery::skipped("mail relay not configured"));
        };

        let email = email_templates::render(&kind, subject)?;

        let payload = json!({
            "from": self.from,
            "to": email.to,
            "subject": email.subject,
            "text": email.body,
            "template": email.template,
        });

        let mut request = self.client.post(relay_url).json(&payload);
        if let Some(token) = &self.relay_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        if response.status().is_success() {
            info!("📧 {} email sent to {} for {} {}", email.template, email.to, subject.kind(), subject.id());
            Ok(Delivery::Sent)
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!("📧 Mail relay rejected {} email: {}", email.template, body);
            Err(EmailError::Rejected { status, body })
        }
    }
}

impl EmailService for MailRelayEmailService {
    async fn order_confirmation(&self, order: &Order) -> Result<Delivery, EmailError> {
        self.deliver(EmailKind::OrderConfirmation, Subject::Order(order)).await
    }

    async fn order_status_update(&self, order: &Order, status: &str) -> Result<Delivery, EmailError> {
        let kind = EmailKind::OrderStatusUpdate {
            status: status.to_string(),
        };
        self.deliver(kind, Subject::Order(order)).await
    }

    async fn donation_confirmation(&self, donation: &Donation) -> Result<Delivery, EmailError> {
        self.deliver(EmailKind::DonationConfirmation, Subject::Donation(donation)).await
    }

    async fn volunteer_status_update(
        &self,
        application: &VolunteerApplication,
        status: &str,
    ) -> Result<Delivery, EmailError> {
        let kind = EmailKind::VolunteerStatusUpdate {
            status: status.to_string(),
        };
        self.deliver(kind, Subject::Application(application)).await
    }
}

/// Renders emails and keeps them instead of sending.
#[derive(Default)]
pub struct MemoryEmailService {
    outbox: Mutex<Vec<RenderedEmail>>,
}

impl MemoryEmailService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outbox(&self) -> Vec<RenderedEmail> {
        self.outbox.lock().clone()
    }

    fn keep(&self, kind: EmailKind, subject: Subject<'_>) -> Result<Delivery, EmailError> {
        let email = email_templates::render(&kind, subject)?;
        self.outbox.lock().push(email);
        Ok(Delivery::Sent)
    }
}

impl EmailService for MemoryEmailService {
    async fn order_confirmation(&self, order: &Order) -> Result<Delivery, EmailError> {
        self.keep(EmailKind::OrderConfirmation, Subject::Order(order))
    }

    async fn order_status_update(&self, order: &Order, status: &str) -> Result<Delivery, EmailError> {
        let kind = EmailKind::OrderStatusUpdate {
            status: status.to_string(),
        };
        self.keep(kind, Subject::Order(order))
    }

    async fn donation_confirmation(&self, donation: &Donation) -> Result<Delivery, EmailError> {
        self.keep(EmailKind::DonationConfirmation, Subject::Donation(donation))
    }

    async fn volunteer_status_update(
        &self,
        application: &VolunteerApplication,
        status: &str,
    ) -> Result<Delivery, EmailError> {
        let kind = EmailKind::VolunteerStatusUpdate {
            status: status.to_string(),
        };
        self.keep(kind, Subject::Application(application))
    }
}
