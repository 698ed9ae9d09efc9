//! Recipient-facing endpoints. No gateway identity here: the PIN (and
//! optional password) in the request body is the whole credential.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use giftcode_domain::code::CodeStatus;

use crate::domain::types::Order;
use crate::error::GiftServiceError;
use crate::state::AppState;
use crate::usecase::recipient::{
    CodeDetail, CompleteCodeInput, CompleteCodeUseCase, SubmitShippingInput,
    SubmitShippingUseCase, VerifyCodeInput, VerifyCodeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct OrderResponse {
    pub recipient_name: String,
    pub postal_code: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    #[serde(serialize_with = "giftcode_core::serde::opt_to_rfc3339_ms")]
    pub shipped_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            recipient_name: order.recipient_name,
            postal_code: order.postal_code,
            address: order.address,
            phone: order.phone,
            email: order.email,
            carrier: order.carrier,
            tracking_number: order.tracking_number,
            shipped_at: order.shipped_at,
        }
    }
}

#[derive(Serialize)]
pub struct VerifyProductResponse {
    pub id: Uuid,
    pub name: String,
    pub valid_days: i32,
}

/// Disclosed only when `is_authorized` is true.
#[derive(Serialize)]
pub struct CodeDetailResponse {
    pub product: Option<VerifyProductResponse>,
    pub memo_for_users: Option<String>,
    pub order: Option<OrderResponse>,
}

impl From<CodeDetail> for CodeDetailResponse {
    fn from(detail: CodeDetail) -> Self {
        Self {
            product: detail.product.map(|p| VerifyProductResponse {
                id: p.id.0,
                name: p.name,
                valid_days: p.valid_days,
            }),
            memo_for_users: detail.memo_for_users,
            order: detail.order.map(Into::into),
        }
    }
}

// ── POST /codes/{id}/verify ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct VerifyCodeRequest {
    pub pin: String,
    pub password: Option<String>,
}

#[derive(Serialize)]
pub struct VerifyCodeResponse {
    pub status: CodeStatus,
    pub is_password_protected: bool,
    pub is_authorized: bool,
    pub detail: Option<CodeDetailResponse>,
}

pub async fn verify_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<VerifyCodeRequest>,
) -> Result<Json<VerifyCodeResponse>, GiftServiceError> {
    let uc = VerifyCodeUseCase {
        codes: state.code_repo(),
        orders: state.order_repo(),
        products: state.product_repo(),
    };
    let out = uc
        .execute(VerifyCodeInput {
            code_id: id.into(),
            pin: body.pin,
            password: body.password,
        })
        .await?;
    Ok(Json(VerifyCodeResponse {
        status: out.status,
        is_password_protected: out.is_password_protected,
        is_authorized: out.is_authorized,
        detail: out.detail.map(Into::into),
    }))
}

// ── POST /codes/{id}/shipping ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubmitShippingRequest {
    pub pin: String,
    pub password: Option<String>,
    pub recipient_name: String,
    pub postal_code: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize)]
pub struct SubmitShippingResponse {
    pub order: OrderResponse,
    /// `null` when no email was supplied; `false` means the confirmation
    /// send failed, which does not fail the submission.
    pub confirmation_sent: Option<bool>,
}

pub async fn submit_shipping(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SubmitShippingRequest>,
) -> Result<(StatusCode, Json<SubmitShippingResponse>), GiftServiceError> {
    let uc = SubmitShippingUseCase {
        codes: state.code_repo(),
        mailer: state.mailer(),
    };
    let out = uc
        .execute(SubmitShippingInput {
            code_id: id.into(),
            pin: body.pin,
            password: body.password,
            recipient_name: body.recipient_name,
            postal_code: body.postal_code,
            address: body.address,
            phone: body.phone,
            email: body.email,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(SubmitShippingResponse {
            order: out.order.into(),
            confirmation_sent: out.confirmation_sent,
        }),
    ))
}

// ── POST /codes/{id}/complete ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CompleteCodeRequest {
    pub pin: String,
}

pub async fn complete_code(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CompleteCodeRequest>,
) -> Result<StatusCode, GiftServiceError> {
    let uc = CompleteCodeUseCase {
        codes: state.code_repo(),
    };
    uc.execute(CompleteCodeInput {
        code_id: id.into(),
        pin: body.pin,
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
