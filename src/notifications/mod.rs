// src/notifications/mod.rs
pub mod dispatcher;
pub mod email_service;
pub mod email_templates;
pub mod notification_service;
pub mod status_diff;

pub use dispatcher::{Delivery, DispatchReport, EffectDispatcher, EffectFailure, SkippedEffect};
pub use email_service::{EmailService, MailRelayEmailService, MemoryEmailService};
pub use notification_service::{
    InAppNotification, MemoryNotificationService, NotificationService, RedisNotificationService,
};
pub use status_diff::{Effect, EmailKind};
