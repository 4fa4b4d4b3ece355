// SPDX-License-Identifier: Apache-2.0
// Copyright 2024-2026 CAB Ingénierie / Christophe ABOULICAM
//! Buyer and publisher directories, dashboard stats, and the caller's permissions.

use axum::{extract::State, Json};
use offer_policy::access::{Action, Role, UserPermissions};
use offer_policy::record::{Buyer, OfferStats, Publisher};
use serde::Serialize;

use super::{ApiError, ApiState};
use crate::auth::{enforce, Viewer};

/// `GET /api/buyers`
pub async fn list_buyers(
    State(state): State<ApiState>,
    Viewer(ctx): Viewer,
) -> Result<Json<Vec<Buyer>>, ApiError> {
    enforce(&ctx, Action::ListBuyers)?;
    Ok(Json(state.observe(state.store.list_buyers().await)?))
}

/// `GET /api/publishers`
pub async fn list_publishers(
    State(state): State<ApiState>,
    Viewer(ctx): Viewer,
) -> Result<Json<Vec<Publisher>>, ApiError> {
    enforce(&ctx, Action::ListPublishers)?;
    Ok(Json(state.observe(state.store.list_publishers().await)?))
}

/// `GET /api/stats`
pub async fn offer_stats(
    State(state): State<ApiState>,
    Viewer(ctx): Viewer,
) -> Result<Json<OfferStats>, ApiError> {
    enforce(&ctx, Action::ViewStats)?;
    Ok(Json(state.observe(state.store.aggregate_stats().await)?))
}

#[derive(Debug, Serialize)]
pub struct PermissionsResponse {
    role: Role,
    permissions: UserPermissions,
}

/// `GET /api/permissions`
pub async fn permissions(Viewer(ctx): Viewer) -> Json<PermissionsResponse> {
    Json(PermissionsResponse {
        role: ctx.role,
        permissions: ctx.permissions(),
    })
}
