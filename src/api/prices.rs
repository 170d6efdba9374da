// src/api/prices.rs
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::state::{AppState, Backend};
use crate::currency::converter::ResolvedRate;
use crate::currency::display::{DisplayAmounts, FormattedAmounts};

#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub amount: f64,
}

#[derive(Debug, Deserialize)]
pub struct ConvertBatchRequest {
    pub amounts: Vec<f64>,
}

#[derive(Debug, Serialize)]
pub struct ConvertedPrice {
    #[serde(flatten)]
    pub amounts: DisplayAmounts,
    pub formatted: FormattedAmounts,
}

#[derive(Debug, Serialize)]
pub struct ConvertResponse {
    pub base_code: String,
    pub quote_code: String,
    pub rate: ResolvedRate,
    pub prices: Vec<ConvertedPrice>,
}

fn check_amount(amount: f64) -> Result<(), ApiError> {
    if amount.is_finite() {
        Ok(())
    } else {
        Err(ApiError::InvalidAmount(amount))
    }
}

async fn convert_all<B: Backend>(state: &AppState<B>, amounts: &[f64]) -> Result<ConvertResponse, ApiError> {
    for amount in amounts {
        check_amount(*amount)?;
    }

    // One converter per request: the rate is looked up at most once here.
    let converter = state.converter();
    let mut prices = Vec::with_capacity(amounts.len());
    for amount in amounts {
        let converted = converter.for_base(*amount).await;
        prices.push(ConvertedPrice {
            formatted: converted.format(converter.settings()),
            amounts: converted,
        });
    }

    Ok(ConvertResponse {
        base_code: state.currency.base_code.clone(),
        quote_code: state.currency.quote_code.clone(),
        rate: converter.resolved_rate().await.clone(),
        prices,
    })
}

pub async fn convert_price<B: Backend>(
    State(state): State<AppState<B>>,
    Query(query): Query<ConvertQuery>,
) -> Result<Json<ConvertResponse>, ApiError> {
    Ok(Json(convert_all(&state, &[query.amount]).await?))
}

pub async fn convert_prices<B: Backend>(
    State(state): State<AppState<B>>,
    Json(request): Json<ConvertBatchRequest>,
) -> Result<Json<ConvertResponse>, ApiError> {
    Ok(Json(convert_all(&state, &request.amounts).await?))
}
