// src/lifecycle.rs
// Save a record and react to its status changes:
// snapshot -> save -> reload -> diff -> dispatch

use log::{debug, info, warn};
use serde::Serialize;

use crate::errors::LifecycleError;
use crate::notifications::dispatcher::{DispatchReport, EffectDispatcher};
use crate::notifications::email_service::EmailService;
use crate::notifications::notification_service::NotificationService;
use crate::notifications::status_diff::Effect;
use crate::store::record_store::RecordStore;
use crate::types::StatusRecord;

#[derive(Debug, Clone, Serialize)]
pub struct SaveOutcome<R> {
    /// The record as reloaded after the save.
    pub record: R,
    /// True when no row existed before this save.
    pub created: bool,
    pub effects: Vec<Effect>,
    pub report: DispatchReport,
}

pub struct RecordLifecycle<N, E> {
    dispatcher: EffectDispatcher<N, E>,
}

impl<N, E> Clone for RecordLifecycle<N, E> {
    fn clone(&self) -> Self {
        Self {
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<N: NotificationService, E: EmailService> RecordLifecycle<N, E> {
    pub fn new(dispatcher: EffectDispatcher<N, E>) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &EffectDispatcher<N, E> {
        &self.dispatcher
    }

    /// Pre-save hook. Reads the persisted row, since the caller's copy has
    /// already been mutated. `None` means the save is a creation.
    pub async fn before_save<R, S>(&self, store: &S, record: &R) -> Result<Option<R::Snapshot>, LifecycleError>
    where
        R: StatusRecord,
        S: RecordStore<R>,
    {
        Ok(store.load(record.id()).await?.map(|row| row.snapshot()))
    }

    /// Post-save hook. Reloads the record so collaborators see fresh relations,
    /// then diffs against the snapshot and dispatches.
    pub async fn after_save<R, S>(
        &self,
        store: &S,
        record: &R,
        snapshot: Option<R::Snapshot>,
    ) -> Result<SaveOutcome<R>, LifecycleError>
    where
        R: StatusRecord,
        S: RecordStore<R>,
    {
        let reloaded = match store.load(record.id()).await? {
            Some(row) => row,
            None => {
                warn!(
                    "💾 {} {} vanished right after save, using in-memory copy",
                    R::KIND,
                    record.id()
                );
                record.clone()
            }
        };

        let Some(before) = snapshot else {
            debug!("💾 Created {} {}, no status hooks on creation", R::KIND, reloaded.id());
            return Ok(SaveOutcome {
                record: reloaded,
                created: true,
                effects: Vec::new(),
                report: DispatchReport::default(),
            });
        };

        let effects = R::diff(&before, &reloaded);
        let report = self.dispatcher.dispatch(reloaded.subject(), &effects).await;

        if !effects.is_empty() {
            info!(
                "💾 Saved {} {}: {} effect(s), {} skipped, {} failed",
                R::KIND,
                reloaded.id(),
                effects.len(),
                report.skipped.len(),
                report.failed.len()
            );
        }

        Ok(SaveOutcome {
            record: reloaded,
            created: false,
            effects,
            report,
        })
    }

    pub async fn save<R, S>(&self, store: &S, record: &R) -> Result<SaveOutcome<R>, LifecycleError>
    where
        R: StatusRecord,
        S: RecordStore<R>,
    {
        let snapshot = self.before_save(store, record).await?;
        store.save(record).await?;
        self.after_save(store, record, snapshot).await
    }
}
