//! Shop and product management.

use chrono::Utc;
use uuid::Uuid;

use giftcode_domain::id::{ProductId, ShopId};

use crate::domain::repository::{CodeRepository, ProductRepository, ShopRepository};
use crate::domain::types::{Product, ProductStatus, Shop};
use crate::error::GiftServiceError;

// ── CreateShop ───────────────────────────────────────────────────────────────

pub struct CreateShopInput {
    pub owner_subject_id: Uuid,
    pub name: String,
}

pub struct CreateShopUseCase<S: ShopRepository> {
    pub shops: S,
}

impl<S: ShopRepository> CreateShopUseCase<S> {
    pub async fn execute(&self, input: CreateShopInput) -> Result<Shop, GiftServiceError> {
        if input.name.trim().is_empty() {
            return Err(GiftServiceError::InvalidInput("shop name is required"));
        }
        let now = Utc::now();
        let shop = Shop {
            id: ShopId::generate(),
            owner_subject_id: input.owner_subject_id,
            name: input.name,
            created_at: now,
            updated_at: now,
        };
        self.shops.create(&shop).await?;
        Ok(shop)
    }
}

// ── GetMyShops ───────────────────────────────────────────────────────────────

pub struct GetMyShopsUseCase<S: ShopRepository> {
    pub shops: S,
}

impl<S: ShopRepository> GetMyShopsUseCase<S> {
    pub async fn execute(&self, owner_subject_id: Uuid) -> Result<Vec<Shop>, GiftServiceError> {
        self.shops.list_by_owner(owner_subject_id).await
    }
}

/// Load a shop and require that `subject_id` owns it.
pub async fn require_owned_shop<S: ShopRepository>(
    shops: &S,
    shop_id: ShopId,
    subject_id: Uuid,
) -> Result<Shop, GiftServiceError> {
    let shop = shops.find(shop_id).await?.ok_or(GiftServiceError::NotFound)?;
    if shop.owner_subject_id != subject_id {
        return Err(GiftServiceError::Forbidden);
    }
    Ok(shop)
}

// ── CreateProduct ────────────────────────────────────────────────────────────

pub struct CreateProductInput {
    pub subject_id: Uuid,
    pub shop_id: ShopId,
    pub name: String,
    pub valid_days: i32,
}

pub struct CreateProductUseCase<S, P>
where
    S: ShopRepository,
    P: ProductRepository,
{
    pub shops: S,
    pub products: P,
}

impl<S, P> CreateProductUseCase<S, P>
where
    S: ShopRepository,
    P: ProductRepository,
{
    pub async fn execute(&self, input: CreateProductInput) -> Result<Product, GiftServiceError> {
        if input.name.trim().is_empty() {
            return Err(GiftServiceError::InvalidInput("product name is required"));
        }
        if input.valid_days < 1 {
            return Err(GiftServiceError::InvalidInput(
                "valid_days must be at least 1",
            ));
        }
        let shop = require_owned_shop(&self.shops, input.shop_id, input.subject_id).await?;

        let now = Utc::now();
        let product = Product {
            id: ProductId::generate(),
            shop_id: shop.id,
            name: input.name,
            status: ProductStatus::Active,
            valid_days: input.valid_days,
            created_at: now,
            updated_at: now,
        };
        self.products.create(&product).await?;
        Ok(product)
    }
}

// ── StopProduct ──────────────────────────────────────────────────────────────

pub struct StopProductUseCase<S, P>
where
    S: ShopRepository,
    P: ProductRepository,
{
    pub shops: S,
    pub products: P,
}

impl<S, P> StopProductUseCase<S, P>
where
    S: ShopRepository,
    P: ProductRepository,
{
    pub async fn execute(
        &self,
        subject_id: Uuid,
        product_id: ProductId,
    ) -> Result<(), GiftServiceError> {
        let product = self
            .products
            .find(product_id)
            .await?
            .ok_or(GiftServiceError::NotFound)?;
        require_owned_shop(&self.shops, product.shop_id, subject_id).await?;

        if !self.products.stop(product_id).await? {
            return Err(GiftServiceError::StateConflict);
        }
        Ok(())
    }
}

// ── DeleteProduct ────────────────────────────────────────────────────────────

pub struct DeleteProductUseCase<S, P, C>
where
    S: ShopRepository,
    P: ProductRepository,
    C: CodeRepository,
{
    pub shops: S,
    pub products: P,
    pub codes: C,
}

impl<S, P, C> DeleteProductUseCase<S, P, C>
where
    S: ShopRepository,
    P: ProductRepository,
    C: CodeRepository,
{
    pub async fn execute(
        &self,
        subject_id: Uuid,
        product_id: ProductId,
    ) -> Result<(), GiftServiceError> {
        let product = self
            .products
            .find(product_id)
            .await?
            .ok_or(GiftServiceError::NotFound)?;
        require_owned_shop(&self.shops, product.shop_id, subject_id).await?;

        // Deletion only for stopped products with no redeemed-but-unshipped
        // code still pointing at them.
        if product.status != ProductStatus::Stopped {
            return Err(GiftServiceError::StateConflict);
        }
        if self.codes.count_used_for_product(product_id).await? > 0 {
            return Err(GiftServiceError::StateConflict);
        }
        if !self.products.delete(product_id).await? {
            return Err(GiftServiceError::NotFound);
        }
        Ok(())
    }
}
