use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use giftcode_domain::code::CodeStatus;
use giftcode_domain::pagination::PageRequest;
use giftcode_identity::identity::Identity;

use crate::domain::types::Code;
use crate::error::GiftServiceError;
use crate::state::AppState;
use crate::usecase::admin::{
    BanCodeUseCase, GenerateCodesInput, GenerateCodesUseCase, ListCodesByStatusUseCase,
    PurgeBannedUseCase, SearchCodesUseCase,
};

/// Admin routes answer 404 to non-members of the administrator group,
/// masking their existence instead of returning 403.
fn require_admin(identity: &Identity) -> Result<(), GiftServiceError> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(GiftServiceError::NotFound)
    }
}

// ── Response types ───────────────────────────────────────────────────────────

/// Generation response: the only place PINs leave the system in bulk,
/// for the card-printing export.
#[derive(Serialize)]
pub struct GeneratedCodeResponse {
    pub id: Uuid,
    pub pin: String,
}

#[derive(Serialize)]
pub struct AdminCodeResponse {
    pub id: Uuid,
    pub status: CodeStatus,
    pub pin: String,
    pub shop_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub memo_for_users: Option<String>,
    pub memo_for_shop: Option<String>,
    #[serde(serialize_with = "giftcode_core::serde::opt_to_rfc3339_ms")]
    pub activated_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "giftcode_core::serde::opt_to_rfc3339_ms")]
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "giftcode_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "giftcode_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Code> for AdminCodeResponse {
    fn from(code: Code) -> Self {
        Self {
            id: code.id.0,
            status: code.status,
            pin: code.pin,
            shop_id: code.shop_id.map(|s| s.0),
            product_id: code.product_id.map(|p| p.0),
            memo_for_users: code.memo_for_users,
            memo_for_shop: code.memo_for_shop,
            activated_at: code.activated_at,
            expires_at: code.expires_at,
            created_at: code.created_at,
            updated_at: code.updated_at,
        }
    }
}

// ── POST /admin/codes ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct GenerateCodesRequest {
    pub count: u32,
}

pub async fn generate_codes(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<GenerateCodesRequest>,
) -> Result<(StatusCode, Json<Vec<GeneratedCodeResponse>>), GiftServiceError> {
    require_admin(&identity)?;
    let uc = GenerateCodesUseCase {
        codes: state.code_repo(),
    };
    let batch = uc.execute(GenerateCodesInput { count: body.count }).await?;
    let items = batch
        .into_iter()
        .map(|code| GeneratedCodeResponse {
            id: code.id.0,
            pin: code.pin,
        })
        .collect();
    Ok((StatusCode::CREATED, Json(items)))
}

// ── GET /admin/codes ─────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct AdminListQuery {
    pub status: String,
    #[serde(rename = "per-page")]
    pub per_page: Option<u32>,
    pub page: Option<u32>,
}

pub async fn list_codes(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<Vec<AdminCodeResponse>>, GiftServiceError> {
    require_admin(&identity)?;
    let status = CodeStatus::from_str_opt(&query.status)
        .ok_or(GiftServiceError::InvalidInput("unknown status"))?;
    let defaults = PageRequest::default();
    let page = PageRequest {
        per_page: query.per_page.unwrap_or(defaults.per_page),
        page: query.page.unwrap_or(defaults.page),
    };

    let uc = ListCodesByStatusUseCase {
        codes: state.code_repo(),
    };
    let codes = uc.execute(status, page).await?;
    Ok(Json(codes.into_iter().map(Into::into).collect()))
}

// ── GET /admin/codes/search ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

pub async fn search_codes(
    identity: Identity,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<AdminCodeResponse>>, GiftServiceError> {
    require_admin(&identity)?;
    let uc = SearchCodesUseCase {
        codes: state.code_repo(),
    };
    let codes = uc.execute(&query.q).await?;
    Ok(Json(codes.into_iter().map(Into::into).collect()))
}

// ── POST /admin/codes/{id}/ban ───────────────────────────────────────────────

pub async fn ban_code(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, GiftServiceError> {
    require_admin(&identity)?;
    let uc = BanCodeUseCase {
        codes: state.code_repo(),
    };
    uc.execute(id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /admin/codes/banned ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct PurgeResponse {
    pub purged: u64,
}

pub async fn purge_banned(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<PurgeResponse>, GiftServiceError> {
    require_admin(&identity)?;
    let uc = PurgeBannedUseCase {
        codes: state.code_repo(),
    };
    let purged = uc.execute().await?;
    Ok(Json(PurgeResponse { purged }))
}
