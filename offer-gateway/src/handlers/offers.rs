// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Offer endpoints. Every record leaves through role redaction.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use offer_policy::access::Action;
use offer_policy::record::{NewOffer, OfferPatch, RecordViolation};
use tracing::info;

use super::{ApiError, ApiState};
use crate::auth::{enforce, Viewer};
use crate::store::{OfferQuery, StoreError};

/// `GET /api/offers`
pub async fn list_offers(
    State(state): State<ApiState>,
    Viewer(ctx): Viewer,
    query: Result<Query<OfferQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    enforce(&ctx, Action::ListOffers)?;
    let Query(query) = query?;

    let offers = state.observe(state.store.list_offers().await)?;
    let page = query.apply(offers)?;
    let page = page.try_map(|offer| state.redact(&ctx, &offer))?;

    Ok((StatusCode::OK, Json(page)).into_response())
}

/// `GET /api/offers/:offer_id`
pub async fn get_offer(
    State(state): State<ApiState>,
    Viewer(ctx): Viewer,
    offer_id: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    enforce(&ctx, Action::ReadOffer)?;
    let Path(offer_id) = offer_id?;

    let offer = state.observe(state.store.get_offer(&offer_id).await)?;
    Ok((StatusCode::OK, Json(state.redact(&ctx, &offer)?)).into_response())
}

/// `POST /api/offers`
pub async fn create_offer(
    State(state): State<ApiState>,
    Viewer(ctx): Viewer,
    payload: Result<Json<NewOffer>, JsonRejection>,
) -> Result<Response, ApiError> {
    enforce(&ctx, Action::CreateOffer)?;
    let Json(new_offer) = payload?;

    let offer = state.observe(state.store.create_offer(new_offer).await)?;
    info!(
        offer_id = %offer.offer_id,
        role = %ctx.role,
        user_id = ?ctx.user_id,
        "Offer created"
    );

    Ok((StatusCode::CREATED, Json(state.redact(&ctx, &offer)?)).into_response())
}

/// `PATCH /api/offers/:offer_id`
pub async fn update_offer(
    State(state): State<ApiState>,
    Viewer(ctx): Viewer,
    offer_id: Result<Path<String>, PathRejection>,
    payload: Result<Json<OfferPatch>, JsonRejection>,
) -> Result<Response, ApiError> {
    enforce(&ctx, Action::UpdateOffer)?;
    let Path(offer_id) = offer_id?;
    let Json(patch) = payload?;

    if patch.is_empty() {
        return Err(StoreError::Validation(vec![RecordViolation::new(
            "patch",
            "must change at least one field",
        )
        .for_record(&offer_id)])
        .into());
    }

    let offer = state.observe(state.store.update_offer(&offer_id, patch).await)?;
    info!(
        offer_id = %offer_id,
        role = %ctx.role,
        user_id = ?ctx.user_id,
        "Offer updated"
    );

    Ok((StatusCode::OK, Json(state.redact(&ctx, &offer)?)).into_response())
}

/// `DELETE /api/offers/:offer_id`
pub async fn delete_offer(
    State(state): State<ApiState>,
    Viewer(ctx): Viewer,
    offer_id: Result<Path<String>, PathRejection>,
) -> Result<Response, ApiError> {
    enforce(&ctx, Action::DeleteOffer)?;
    let Path(offer_id) = offer_id?;

    state.observe(state.store.delete_offer(&offer_id).await)?;
    info!(
        offer_id = %offer_id,
        role = %ctx.role,
        user_id = ?ctx.user_id,
        "Offer deleted"
    );

    Ok(StatusCode::NO_CONTENT.into_response())
}
