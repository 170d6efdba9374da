// src/api/records.rs
// Save endpoints used by the admin layer after an edit

use axum::{
    extract::{Path, State},
    Json,
};
use log::info;

use crate::api::error::ApiError;
use crate::api::state::{AppState, Backend};
use crate::lifecycle::SaveOutcome;
use crate::store::record_store::RecordStore;
use crate::types::{Donation, Order, RecordId, StatusRecord, VolunteerApplication};

async fn save_record<B, R, S>(
    state: &AppState<B>,
    store: &S,
    path_id: String,
    record: R,
) -> Result<Json<SaveOutcome<R>>, ApiError>
where
    B: Backend,
    R: StatusRecord,
    S: RecordStore<R>,
{
    if record.id() != &RecordId(path_id.clone()) {
        return Err(ApiError::IdMismatch {
            path: path_id,
            body: record.id().to_string(),
        });
    }

    info!("📝 Save requested for {} {}", R::KIND, record.id());
    let outcome = state.lifecycle.save(store, &record).await?;
    Ok(Json(outcome))
}

pub async fn put_order<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Json(order): Json<Order>,
) -> Result<Json<SaveOutcome<Order>>, ApiError> {
    save_record(&state, state.orders.as_ref(), id, order).await
}

pub async fn put_donation<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Json(donation): Json<Donation>,
) -> Result<Json<SaveOutcome<Donation>>, ApiError> {
    save_record(&state, state.donations.as_ref(), id, donation).await
}

pub async fn put_application<B: Backend>(
    State(state): State<AppState<B>>,
    Path(id): Path<String>,
    Json(application): Json<VolunteerApplication>,
) -> Result<Json<SaveOutcome<VolunteerApplication>>, ApiError> {
    save_record(&state, state.applications.as_ref(), id, application).await
}
