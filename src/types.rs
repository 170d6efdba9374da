// src/types.rs
// Record types observed by the status hooks, plus exchange rate rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::notifications::status_diff::{self, Effect};

/// Opaque record identifier. New records get a UUID v4, but any string is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// String-backed status enum. Known values get a variant, anything else is kept
/// verbatim in `Other` so unrecognized statuses survive a save untouched.
macro_rules! status_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(from = "String", into = "String")]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            pub fn as_str(&self) -> &str {
                match self {
                    $($name::$variant => $text,)+
                    $name::Other(value) => value.as_str(),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                match value {
                    $($text => $name::$variant,)+
                    other => $name::Other(other.to_string()),
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                $name::from(value.as_str())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.as_str().to_string()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

status_enum!(
    /// Fulfilment status of an order.
    OrderStatus {
        Pending => "pending",
        Processing => "processing",
        Shipped => "shipped",
        Delivered => "delivered",
        Cancelled => "cancelled",
    }
);

status_enum!(
    /// Payment status shared by orders and donations.
    PaymentStatus {
        Pending => "pending",
        Completed => "completed",
        Failed => "failed",
        Refunded => "refunded",
    }
);

status_enum!(
    /// Review status of a volunteer application.
    ApplicationStatus {
        Submitted => "submitted",
        Reviewing => "reviewing",
        Approved => "approved",
        Rejected => "rejected",
    }
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Order,
    Donation,
    VolunteerApplication,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Order => "order",
            RecordKind::Donation => "donation",
            RecordKind::VolunteerApplication => "volunteer_application",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_name: String,
    pub quantity: u32,
    pub unit_price: f64,
}

impl LineItem {
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub region: Option<String>,
    pub country: String,
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.line1)?;
        if let Some(line2) = &self.line2 {
            write!(f, ", {}", line2)?;
        }
        write!(f, ", {}", self.city)?;
        if let Some(region) = &self.region {
            write!(f, ", {}", region)?;
        }
        write!(f, ", {}", self.country)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: RecordId,
    pub user_id: Option<String>,
    pub customer: Customer,
    #[serde(default)]
    pub items: Vec<LineItem>,
    pub shipping_address: Option<Address>,
    pub billing_address: Option<Address>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub total: f64,
    pub currency: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: RecordId,
    pub user_id: Option<String>,
    pub donor_name: String,
    pub donor_email: Option<String>,
    pub amount: f64,
    pub currency: String,
    pub payment_status: PaymentStatus,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolunteerApplication {
    pub id: RecordId,
    pub user_id: Option<String>,
    pub applicant_name: String,
    pub applicant_email: Option<String>,
    pub role: String,
    pub status: ApplicationStatus,
    pub updated_at: DateTime<Utc>,
}

// Pre-save copies of the watched fields

#[derive(Debug, Clone, PartialEq)]
pub struct OrderSnapshot {
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DonationSnapshot {
    pub payment_status: PaymentStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationSnapshot {
    pub status: ApplicationStatus,
}

/// Borrowed view of a record handed to the notification and email collaborators.
#[derive(Debug, Clone, Copy)]
pub enum Subject<'a> {
    Order(&'a Order),
    Donation(&'a Donation),
    Application(&'a VolunteerApplication),
}

impl<'a> Subject<'a> {
    pub fn kind(&self) -> RecordKind {
        match self {
            Subject::Order(_) => RecordKind::Order,
            Subject::Donation(_) => RecordKind::Donation,
            Subject::Application(_) => RecordKind::VolunteerApplication,
        }
    }

    pub fn id(&self) -> &'a RecordId {
        match self {
            Subject::Order(order) => &order.id,
            Subject::Donation(donation) => &donation.id,
            Subject::Application(application) => &application.id,
        }
    }

    pub fn owner_user_id(&self) -> Option<&'a str> {
        match self {
            Subject::Order(order) => order.user_id.as_deref(),
            Subject::Donation(donation) => donation.user_id.as_deref(),
            Subject::Application(application) => application.user_id.as_deref(),
        }
    }
}

/// A persisted record whose status fields are watched across saves.
pub trait StatusRecord: Clone + Serialize + serde::de::DeserializeOwned + Send + Sync + 'static {
    type Snapshot: Clone + Send + Sync;

    const KIND: RecordKind;

    fn id(&self) -> &RecordId;

    fn snapshot(&self) -> Self::Snapshot;

    fn subject(&self) -> Subject<'_>;

    fn diff(before: &Self::Snapshot, after: &Self) -> Vec<Effect>;

    fn owner_user_id(&self) -> Option<&str> {
        self.subject().owner_user_id()
    }
}

impl StatusRecord for Order {
    type Snapshot = OrderSnapshot;

    const KIND: RecordKind = RecordKind::Order;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn snapshot(&self) -> OrderSnapshot {
        OrderSnapshot {
            status: self.status.clone(),
            payment_status: self.payment_status.clone(),
        }
    }

    fn subject(&self) -> Subject<'_> {
        Subject::Order(self)
    }

    fn diff(before: &OrderSnapshot, after: &Self) -> Vec<Effect> {
        status_diff::diff_order(before, after)
    }
}

impl StatusRecord for Donation {
    type Snapshot = DonationSnapshot;

    const KIND: RecordKind = RecordKind::Donation;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn snapshot(&self) -> DonationSnapshot {
        DonationSnapshot {
            payment_status: self.payment_status.clone(),
        }
    }

    fn subject(&self) -> Subject<'_> {
        Subject::Donation(self)
    }

    fn diff(before: &DonationSnapshot, after: &Self) -> Vec<Effect> {
        status_diff::diff_donation(before, after)
    }
}

impl StatusRecord for VolunteerApplication {
    type Snapshot = ApplicationSnapshot;

    const KIND: RecordKind = RecordKind::VolunteerApplication;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn snapshot(&self) -> ApplicationSnapshot {
        ApplicationSnapshot {
            status: self.status.clone(),
        }
    }

    fn subject(&self) -> Subject<'_> {
        Subject::Application(self)
    }

    fn diff(before: &ApplicationSnapshot, after: &Self) -> Vec<Effect> {
        status_diff::diff_application(before, after)
    }
}

/// One fetched exchange rate row. `rate` is quote units per one base unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRate {
    pub base_code: String,
    pub quote_code: String,
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses_parse_to_variants() {
        assert_eq!(OrderStatus::from("shipped"), OrderStatus::Shipped);
        assert_eq!(PaymentStatus::from("completed"), PaymentStatus::Completed);
        assert_eq!(ApplicationStatus::from("reviewing"), ApplicationStatus::Reviewing);
    }

    #[test]
    fn test_unknown_status_is_kept_verbatim() {
        let status = OrderStatus::from("on_hold");
        assert_eq!(status, OrderStatus::Other("on_hold".to_string()));
        assert_eq!(status.as_str(), "on_hold");

        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(json, "\"on_hold\"");
    }

    #[test]
    fn test_status_serializes_as_lowercase_string() {
        let json = serde_json::to_string(&PaymentStatus::Refunded).unwrap();
        assert_eq!(json, "\"refunded\"");

        let parsed: ApplicationStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(parsed, ApplicationStatus::Approved);
    }

    #[test]
    fn test_address_display() {
        let address = Address {
            line1: "Plot 12 Kampala Road".to_string(),
            line2: None,
            city: "Kampala".to_string(),
            region: Some("Central".to_string()),
            country: "UG".to_string(),
        };
        assert_eq!(address.to_string(), "Plot 12 Kampala Road, Kampala, Central, UG");
    }
}
