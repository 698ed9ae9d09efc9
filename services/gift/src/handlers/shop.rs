use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use giftcode_domain::code::CodeStatus;
use giftcode_identity::identity::Identity;

use crate::domain::types::{Product, Shop};
use crate::error::GiftServiceError;
use crate::handlers::recipient::OrderResponse;
use crate::state::AppState;
use crate::usecase::code::ListShopCodesUseCase;
use crate::usecase::shop::{
    CreateProductInput, CreateProductUseCase, CreateShopInput, CreateShopUseCase,
    DeleteProductUseCase, GetMyShopsUseCase, StopProductUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ShopResponse {
    pub id: Uuid,
    pub name: String,
    #[serde(serialize_with = "giftcode_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Shop> for ShopResponse {
    fn from(shop: Shop) -> Self {
        Self {
            id: shop.id.0,
            name: shop.name,
            created_at: shop.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: Uuid,
    pub shop_id: Uuid,
    pub name: String,
    pub status: String,
    pub valid_days: i32,
    #[serde(serialize_with = "giftcode_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.0,
            shop_id: product.shop_id.0,
            name: product.name,
            status: product.status.as_str().to_owned(),
            valid_days: product.valid_days,
            created_at: product.created_at,
        }
    }
}

/// One code in the owner listing, with its order when redeemed.
#[derive(Serialize)]
pub struct ShopCodeResponse {
    pub id: Uuid,
    pub status: CodeStatus,
    pub product_id: Option<Uuid>,
    pub memo_for_shop: Option<String>,
    #[serde(serialize_with = "giftcode_core::serde::opt_to_rfc3339_ms")]
    pub activated_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "giftcode_core::serde::opt_to_rfc3339_ms")]
    pub expires_at: Option<chrono::DateTime<chrono::Utc>>,
    pub order: Option<OrderResponse>,
}

// ── POST /shops ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateShopRequest {
    pub name: String,
}

pub async fn create_shop(
    identity: Identity,
    State(state): State<AppState>,
    Json(body): Json<CreateShopRequest>,
) -> Result<(StatusCode, Json<ShopResponse>), GiftServiceError> {
    let uc = CreateShopUseCase {
        shops: state.shop_repo(),
    };
    let shop = uc
        .execute(CreateShopInput {
            owner_subject_id: identity.subject_id,
            name: body.name,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(shop.into())))
}

// ── GET /shops/@me ───────────────────────────────────────────────────────────

pub async fn get_my_shops(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<ShopResponse>>, GiftServiceError> {
    let uc = GetMyShopsUseCase {
        shops: state.shop_repo(),
    };
    let shops = uc.execute(identity.subject_id).await?;
    Ok(Json(shops.into_iter().map(Into::into).collect()))
}

// ── POST /shops/{shop_id}/products ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub valid_days: i32,
}

pub async fn create_product(
    identity: Identity,
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductResponse>), GiftServiceError> {
    let uc = CreateProductUseCase {
        shops: state.shop_repo(),
        products: state.product_repo(),
    };
    let product = uc
        .execute(CreateProductInput {
            subject_id: identity.subject_id,
            shop_id: shop_id.into(),
            name: body.name,
            valid_days: body.valid_days,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(product.into())))
}

// ── POST /products/{id}/stop ─────────────────────────────────────────────────

pub async fn stop_product(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, GiftServiceError> {
    let uc = StopProductUseCase {
        shops: state.shop_repo(),
        products: state.product_repo(),
    };
    uc.execute(identity.subject_id, id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /products/{id} ────────────────────────────────────────────────────

pub async fn delete_product(
    identity: Identity,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, GiftServiceError> {
    let uc = DeleteProductUseCase {
        shops: state.shop_repo(),
        products: state.product_repo(),
        codes: state.code_repo(),
    };
    uc.execute(identity.subject_id, id.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /shops/{shop_id}/codes ───────────────────────────────────────────────

pub async fn list_shop_codes(
    identity: Identity,
    State(state): State<AppState>,
    Path(shop_id): Path<Uuid>,
) -> Result<Json<Vec<ShopCodeResponse>>, GiftServiceError> {
    let uc = ListShopCodesUseCase {
        codes: state.code_repo(),
        shops: state.shop_repo(),
    };
    let rows = uc.execute(identity.subject_id, shop_id.into()).await?;
    let items = rows
        .into_iter()
        .map(|(code, order)| ShopCodeResponse {
            id: code.id.0,
            status: code.status,
            product_id: code.product_id.map(|p| p.0),
            memo_for_shop: code.memo_for_shop,
            activated_at: code.activated_at,
            expires_at: code.expires_at,
            order: order.map(Into::into),
        })
        .collect();
    Ok(Json(items))
}
