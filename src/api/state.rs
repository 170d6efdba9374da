// src/api/state.rs
use redis::Client;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::currency::converter::{CurrencyConverter, CurrencySettings};
use crate::lifecycle::RecordLifecycle;
use crate::notifications::dispatcher::EffectDispatcher;
use crate::notifications::email_service::{EmailService, MailRelayEmailService, MemoryEmailService};
use crate::notifications::notification_service::{
    MemoryNotificationService, NotificationService, RedisNotificationService,
};
use crate::store::exchange_rate_store::{ExchangeRateStore, MemoryExchangeRateStore, RedisExchangeRateStore};
use crate::store::record_store::{MemoryRecordStore, RecordStore, RedisRecordStore};
use crate::types::{Donation, Order, VolunteerApplication};

/// The stores and collaborators one running service is wired to.
pub trait Backend: Send + Sync + 'static {
    type Notifications: NotificationService + 'static;
    type Email: EmailService + 'static;
    type Orders: RecordStore<Order> + 'static;
    type Donations: RecordStore<Donation> + 'static;
    type Applications: RecordStore<VolunteerApplication> + 'static;
    type Rates: ExchangeRateStore + 'static;
}

pub struct RedisBackend;

impl Backend for RedisBackend {
    type Notifications = RedisNotificationService;
    type Email = MailRelayEmailService;
    type Orders = RedisRecordStore<Order>;
    type Donations = RedisRecordStore<Donation>;
    type Applications = RedisRecordStore<VolunteerApplication>;
    type Rates = RedisExchangeRateStore;
}

pub struct MemoryBackend;

impl Backend for MemoryBackend {
    type Notifications = MemoryNotificationService;
    type Email = MemoryEmailService;
    type Orders = MemoryRecordStore<Order>;
    type Donations = MemoryRecordStore<Donation>;
    type Applications = MemoryRecordStore<VolunteerApplication>;
    type Rates = MemoryExchangeRateStore;
}

pub type Lifecycle<B> = RecordLifecycle<<B as Backend>::Notifications, <B as Backend>::Email>;

pub struct AppState<B: Backend> {
    pub lifecycle: Lifecycle<B>,
    pub orders: Arc<B::Orders>,
    pub donations: Arc<B::Donations>,
    pub applications: Arc<B::Applications>,
    pub rates: Arc<B::Rates>,
    pub currency: CurrencySettings,
}

impl<B: Backend> Clone for AppState<B> {
    fn clone(&self) -> Self {
        Self {
            lifecycle: self.lifecycle.clone(),
            orders: self.orders.clone(),
            donations: self.donations.clone(),
            applications: self.applications.clone(),
            rates: self.rates.clone(),
            currency: self.currency.clone(),
        }
    }
}

impl<B: Backend> AppState<B> {
    pub fn new(
        lifecycle: Lifecycle<B>,
        orders: Arc<B::Orders>,
        donations: Arc<B::Donations>,
        applications: Arc<B::Applications>,
        rates: Arc<B::Rates>,
        currency: CurrencySettings,
    ) -> Self {
        Self {
            lifecycle,
            orders,
            donations,
            applications,
            rates,
            currency,
        }
    }

    /// Fresh converter for one request; its rate cache dies with it.
    pub fn converter(&self) -> CurrencyConverter<B::Rates> {
        CurrencyConverter::new(self.rates.clone(), self.currency.clone())
    }
}

impl AppState<RedisBackend> {
    pub async fn connect(config: &AppConfig) -> Result<Self, redis::RedisError> {
        let client = Client::open(config.redis_url.as_str())?;
        let connection = client.get_multiplexed_tokio_connection().await?;

        let notifications = RedisNotificationService::new(
            connection.clone(),
            config.notification_history_limit,
            config.notifications_enabled,
        );
        let email = MailRelayEmailService::new(
            config.mail_relay_url.clone(),
            config.mail_relay_token.clone(),
            config.mail_from.clone(),
        );
        let dispatcher = EffectDispatcher::new(Arc::new(notifications), Arc::new(email));

        Ok(Self::new(
            RecordLifecycle::new(dispatcher),
            Arc::new(RedisRecordStore::new(connection.clone())),
            Arc::new(RedisRecordStore::new(connection.clone())),
            Arc::new(RedisRecordStore::new(connection.clone())),
            Arc::new(RedisExchangeRateStore::new(connection)),
            config.currency.clone(),
        ))
    }
}

impl AppState<MemoryBackend> {
    /// Everything kept in process. Stores and collaborators are reachable
    /// through the state's fields and the lifecycle's dispatcher.
    pub fn in_memory(currency: CurrencySettings) -> Self {
        let dispatcher = EffectDispatcher::new(
            Arc::new(MemoryNotificationService::new()),
            Arc::new(MemoryEmailService::new()),
        );

        Self::new(
            RecordLifecycle::new(dispatcher),
            Arc::new(MemoryRecordStore::new()),
            Arc::new(MemoryRecordStore::new()),
            Arc::new(MemoryRecordStore::new()),
            Arc::new(MemoryExchangeRateStore::new()),
            currency,
        )
    }
}
