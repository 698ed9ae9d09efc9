use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use giftcode_domain::code::CodeStatus;
use giftcode_identity::identity::Identity;

use crate::error::GiftServiceError;
use crate::state::AppState;
use crate::usecase::code::{
    ActivateCodeInput, ActivateCodeUseCase, LinkCodeInput, LinkCodeUseCase, ShipCodeInput,
    ShipCodeUseCase, UpdateMemosInput, UpdateMemosUseCase,
};

// ── POST /codes/{id}/link ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LinkCodeRequest {
    pub shop_id: Uuid,
    pub product_id: Uuid,
}

pub async fn link_code(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<LinkCodeRequest>,
) -> Result<StatusCode, GiftServiceError> {
    let uc = LinkCodeUseCase {
        codes: state.code_repo(),
        shops: state.shop_repo(),
        products: state.product_repo(),
    };
    uc.execute(LinkCodeInput {
        subject_id: identity.subject_id,
        code_id: id.into(),
        shop_id: body.shop_id.into(),
        product_id: body.product_id.into(),
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /codes/{id}/activate ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ActivateCodeRequest {
    /// Required for an unassigned code; ignored for a linked one.
    pub shop_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
}

#[derive(Serialize)]
pub struct ActivatedCodeResponse {
    pub id: Uuid,
    pub status: CodeStatus,
    #[serde(serialize_with = "giftcode_core::serde::opt_to_rfc3339_ms")]
    pub activated_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "giftcode_core::serde::opt_to_rfc3339_ms")]
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub async fn activate_code(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ActivateCodeRequest>,
) -> Result<Json<ActivatedCodeResponse>, GiftServiceError> {
    let uc = ActivateCodeUseCase {
        codes: state.code_repo(),
        shops: state.shop_repo(),
        products: state.product_repo(),
    };
    let code = uc
        .execute(ActivateCodeInput {
            subject_id: identity.subject_id,
            code_id: id.into(),
            shop_id: body.shop_id.map(Into::into),
            product_id: body.product_id.map(Into::into),
        })
        .await?;
    Ok(Json(ActivatedCodeResponse {
        id: code.id.0,
        status: code.status,
        activated_at: code.activated_at,
        expires_at: code.expires_at,
    }))
}

// ── PATCH /codes/{id}/memos ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMemosRequest {
    pub memo_for_users: Option<String>,
    pub memo_for_shop: Option<String>,
}

pub async fn update_memos(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMemosRequest>,
) -> Result<StatusCode, GiftServiceError> {
    let uc = UpdateMemosUseCase {
        codes: state.code_repo(),
        shops: state.shop_repo(),
    };
    uc.execute(UpdateMemosInput {
        subject_id: identity.subject_id,
        code_id: id.into(),
        memo_for_users: body.memo_for_users,
        memo_for_shop: body.memo_for_shop,
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /codes/{id}/ship ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ShipCodeRequest {
    pub carrier: String,
    pub tracking_number: String,
}

pub async fn ship_code(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ShipCodeRequest>,
) -> Result<StatusCode, GiftServiceError> {
    let uc = ShipCodeUseCase {
        codes: state.code_repo(),
        orders: state.order_repo(),
        shops: state.shop_repo(),
        mailer: state.mailer(),
    };
    uc.execute(ShipCodeInput {
        subject_id: identity.subject_id,
        code_id: id.into(),
        carrier: body.carrier,
        tracking_number: body.tracking_number,
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
