// src/notifications/email_templates.rs
// Subject/body rendering for the transactional emails

use serde::Serialize;

use crate::errors::EmailError;
use crate::notifications::status_diff::EmailKind;
use crate::types::{Donation, Order, Subject, VolunteerApplication};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedEmail {
    pub template: &'static str,
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub fn render(kind: &EmailKind, subject: Subject<'_>) -> Result<RenderedEmail, EmailError> {
    match (kind, subject) {
        (EmailKind::OrderConfirmation, Subject::Order(order)) => order_confirmation(order),
        (EmailKind::OrderStatusUpdate { status }, Subject::Order(order)) => {
            order_status_update(order, status)
        }
        (EmailKind::DonationConfirmation, Subject::Donation(donation)) => {
            donation_confirmation(donation)
        }
        (EmailKind::VolunteerStatusUpdate { status }, Subject::Application(application)) => {
            volunteer_status_update(application, status)
        }
        (kind, subject) => Err(EmailError::SubjectMismatch {
            email: kind.name(),
            kind: subject.kind(),
        }),
    }
}

fn recipient(email: Option<&String>, subject: Subject<'_>) -> Result<String, EmailError> {
    match email.map(|e| e.trim()).filter(|e| !e.is_empty()) {
        Some(address) => Ok(address.to_string()),
        None => Err(EmailError::MissingRecipient {
            kind: subject.kind(),
            id: subject.id().clone(),
        }),
    }
}

fn order_lines(order: &Order) -> String {
    order
        .items
        .iter()
        .map(|item| {
            format!(
                "  {} x {} @ {} {:.0} = {} {:.0}",
                item.quantity,
                item.product_name,
                order.currency,
                item.unit_price,
                order.currency,
                item.line_total()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn order_confirmation(order: &Order) -> Result<RenderedEmail, EmailError> {
    let to = recipient(order.customer.email.as_ref(), Subject::Order(order))?;

    let mut body = format!(
        "Hi {},\n\nThank you for your order #{}. Your payment has been received.\n\n{}\n\nTotal: {} {:.0}\n",
        order.customer.name,
        order.id,
        order_lines(order),
        order.currency,
        order.total
    );
    if let Some(address) = &order.shipping_address {
        body.push_str(&format!("Shipping to: {}\n", address));
    }

    Ok(RenderedEmail {
        template: "order_confirmation",
        to,
        subject: format!("Order #{} confirmed", order.id),
        body,
    })
}

pub fn order_status_update(order: &Order, status: &str) -> Result<RenderedEmail, EmailError> {
    let to = recipient(order.customer.email.as_ref(), Subject::Order(order))?;

    let detail = match status {
        "processing" => "We are preparing your items.",
        "shipped" => "Your items are on the way.",
        "delivered" => "Your items have been delivered. Enjoy!",
        _ => "Your order has been updated.",
    };
    let mut body = format!(
        "Hi {},\n\nYour order #{} is now {}. {}\n",
        order.customer.name, order.id, status, detail
    );
    if status == "shipped" {
        if let Some(address) = &order.shipping_address {
            body.push_str(&format!("Shipping to: {}\n", address));
        }
    }

    Ok(RenderedEmail {
        template: "order_status_update",
        to,
        subject: format!("Order #{} is {}", order.id, status),
        body,
    })
}

pub fn donation_confirmation(donation: &Donation) -> Result<RenderedEmail, EmailError> {
    let to = recipient(donation.donor_email.as_ref(), Subject::Donation(donation))?;

    Ok(RenderedEmail {
        template: "donation_confirmation",
        to,
        subject: "Thank you for your donation".to_string(),
        body: format!(
            "Dear {},\n\nWe have received your donation of {} {:.0} (reference #{}). Thank you for your support.\n",
            donation.donor_name, donation.currency, donation.amount, donation.id
        ),
    })
}

pub fn volunteer_status_update(
    application: &VolunteerApplication,
    status: &str,
) -> Result<RenderedEmail, EmailError> {
    let to = recipient(application.applicant_email.as_ref(), Subject::Application(application))?;

    let detail = match status {
        "approved" => "Welcome aboard! We will contact you with next steps.",
        "rejected" => "Unfortunately we cannot offer you this role at the moment.",
        "reviewing" => "Our team is reviewing your application.",
        _ => "Your application has been updated.",
    };

    Ok(RenderedEmail {
        template: "volunteer_status_update",
        to,
        subject: format!("Your volunteer application: {}", status),
        body: format!(
            "Hi {},\n\nYour application for the {} role is {}. {}\n",
            application.applicant_name, application.role, status, detail
        ),
    })
}
