//! Shop-driven code lifecycle operations: link, activate, ship, memos,
//! and the owner-scoped listing.

use chrono::Utc;
use uuid::Uuid;

use giftcode_domain::code::{CodeStatus, DEFAULT_VALID_DAYS, expires_at};
use giftcode_domain::id::{CodeId, ProductId, ShopId};

use crate::domain::repository::{CodeRepository, Mailer, OrderRepository, ProductRepository, ShopRepository};
use crate::domain::types::{Code, Order, Product, ProductStatus};
use crate::error::GiftServiceError;
use crate::usecase::access::load_code;
use crate::usecase::shop::require_owned_shop;

/// Load a product, requiring it to belong to `shop_id` and be sellable.
async fn require_active_product<P: ProductRepository>(
    products: &P,
    product_id: ProductId,
    shop_id: ShopId,
) -> Result<Product, GiftServiceError> {
    let product = products
        .find(product_id)
        .await?
        .ok_or(GiftServiceError::NotFound)?;
    if product.shop_id != shop_id {
        return Err(GiftServiceError::Forbidden);
    }
    if product.status != ProductStatus::Active {
        return Err(GiftServiceError::StateConflict);
    }
    Ok(product)
}

// ── LinkCode ─────────────────────────────────────────────────────────────────

pub struct LinkCodeInput {
    pub subject_id: Uuid,
    pub code_id: CodeId,
    pub shop_id: ShopId,
    pub product_id: ProductId,
}

pub struct LinkCodeUseCase<C, S, P>
where
    C: CodeRepository,
    S: ShopRepository,
    P: ProductRepository,
{
    pub codes: C,
    pub shops: S,
    pub products: P,
}

impl<C, S, P> LinkCodeUseCase<C, S, P>
where
    C: CodeRepository,
    S: ShopRepository,
    P: ProductRepository,
{
    pub async fn execute(&self, input: LinkCodeInput) -> Result<(), GiftServiceError> {
        require_owned_shop(&self.shops, input.shop_id, input.subject_id).await?;
        require_active_product(&self.products, input.product_id, input.shop_id).await?;

        // Existence check up front so an unknown id is a 404, not a 409.
        load_code(&self.codes, input.code_id, Utc::now()).await?;

        if !self
            .codes
            .link(input.code_id, input.shop_id, input.product_id)
            .await?
        {
            return Err(GiftServiceError::StateConflict);
        }
        Ok(())
    }
}

// ── ActivateCode ─────────────────────────────────────────────────────────────

pub struct ActivateCodeInput {
    pub subject_id: Uuid,
    pub code_id: CodeId,
    /// Required when activating straight from `Unassigned`; ignored for
    /// a `Linked` code, which already carries its shop and product.
    pub shop_id: Option<ShopId>,
    pub product_id: Option<ProductId>,
}

pub struct ActivateCodeUseCase<C, S, P>
where
    C: CodeRepository,
    S: ShopRepository,
    P: ProductRepository,
{
    pub codes: C,
    pub shops: S,
    pub products: P,
}

impl<C, S, P> ActivateCodeUseCase<C, S, P>
where
    C: CodeRepository,
    S: ShopRepository,
    P: ProductRepository,
{
    pub async fn execute(&self, input: ActivateCodeInput) -> Result<Code, GiftServiceError> {
        let now = Utc::now();
        let code = load_code(&self.codes, input.code_id, now).await?;

        let (expected, shop_id, product_id) = match code.status {
            CodeStatus::Unassigned => {
                let shop_id = input
                    .shop_id
                    .ok_or(GiftServiceError::InvalidInput("shop_id is required"))?;
                (CodeStatus::Unassigned, shop_id, input.product_id)
            }
            CodeStatus::Linked => {
                let shop_id = code.shop_id.ok_or_else(|| {
                    GiftServiceError::Internal(anyhow::anyhow!(
                        "linked code {} has no shop_id",
                        code.id
                    ))
                })?;
                (CodeStatus::Linked, shop_id, code.product_id)
            }
            _ => return Err(GiftServiceError::StateConflict),
        };

        require_owned_shop(&self.shops, shop_id, input.subject_id).await?;
        let valid_days = match product_id {
            Some(pid) => {
                require_active_product(&self.products, pid, shop_id)
                    .await?
                    .valid_days as i64
            }
            None => DEFAULT_VALID_DAYS,
        };
        let expiry = expires_at(now, valid_days);

        if !self
            .codes
            .activate(code.id, expected, shop_id, product_id, now, expiry)
            .await?
        {
            return Err(GiftServiceError::StateConflict);
        }

        Ok(Code {
            status: CodeStatus::Active,
            shop_id: Some(shop_id),
            product_id,
            activated_at: Some(now),
            expires_at: Some(expiry),
            updated_at: now,
            ..code
        })
    }
}

// ── ShipCode ─────────────────────────────────────────────────────────────────

pub struct ShipCodeInput {
    pub subject_id: Uuid,
    pub code_id: CodeId,
    pub carrier: String,
    pub tracking_number: String,
}

pub struct ShipCodeUseCase<C, O, S, M>
where
    C: CodeRepository,
    O: OrderRepository,
    S: ShopRepository,
    M: Mailer,
{
    pub codes: C,
    pub orders: O,
    pub shops: S,
    pub mailer: M,
}

impl<C, O, S, M> ShipCodeUseCase<C, O, S, M>
where
    C: CodeRepository,
    O: OrderRepository,
    S: ShopRepository,
    M: Mailer,
{
    pub async fn execute(&self, input: ShipCodeInput) -> Result<(), GiftServiceError> {
        if input.carrier.trim().is_empty() {
            return Err(GiftServiceError::InvalidInput("carrier is required"));
        }
        if input.tracking_number.trim().is_empty() {
            return Err(GiftServiceError::InvalidInput(
                "tracking number is required",
            ));
        }

        let now = Utc::now();
        let code = load_code(&self.codes, input.code_id, now).await?;
        let shop_id = code.shop_id.ok_or(GiftServiceError::StateConflict)?;
        require_owned_shop(&self.shops, shop_id, input.subject_id).await?;

        if !self
            .codes
            .ship(code.id, &input.carrier, &input.tracking_number, now)
            .await?
        {
            return Err(GiftServiceError::StateConflict);
        }

        // Shipment notification is best-effort; a mail failure never
        // rolls the transition back.
        if let Ok(Some(order)) = self.orders.find_by_code(code.id).await {
            if let Some(email) = &order.email {
                let text = format!(
                    "Your gift ({}) has shipped via {} with tracking number {}.",
                    code.id, input.carrier, input.tracking_number
                );
                if let Err(e) = self
                    .mailer
                    .send(std::slice::from_ref(email), "Your gift has shipped", &text)
                    .await
                {
                    tracing::warn!(code_id = %code.id, error = %e, "shipment notification failed");
                }
            }
        }
        Ok(())
    }
}

// ── UpdateMemos ──────────────────────────────────────────────────────────────

pub struct UpdateMemosInput {
    pub subject_id: Uuid,
    pub code_id: CodeId,
    pub memo_for_users: Option<String>,
    pub memo_for_shop: Option<String>,
}

pub struct UpdateMemosUseCase<C, S>
where
    C: CodeRepository,
    S: ShopRepository,
{
    pub codes: C,
    pub shops: S,
}

impl<C, S> UpdateMemosUseCase<C, S>
where
    C: CodeRepository,
    S: ShopRepository,
{
    pub async fn execute(&self, input: UpdateMemosInput) -> Result<(), GiftServiceError> {
        let code = load_code(&self.codes, input.code_id, Utc::now()).await?;
        let shop_id = code.shop_id.ok_or(GiftServiceError::Forbidden)?;
        require_owned_shop(&self.shops, shop_id, input.subject_id).await?;

        if !self
            .codes
            .update_memos(code.id, input.memo_for_users, input.memo_for_shop)
            .await?
        {
            return Err(GiftServiceError::NotFound);
        }
        Ok(())
    }
}

// ── ListShopCodes ────────────────────────────────────────────────────────────

pub struct ListShopCodesUseCase<C, S>
where
    C: CodeRepository,
    S: ShopRepository,
{
    pub codes: C,
    pub shops: S,
}

impl<C, S> ListShopCodesUseCase<C, S>
where
    C: CodeRepository,
    S: ShopRepository,
{
    pub async fn execute(
        &self,
        subject_id: Uuid,
        shop_id: ShopId,
    ) -> Result<Vec<(Code, Option<Order>)>, GiftServiceError> {
        require_owned_shop(&self.shops, shop_id, subject_id).await?;
        self.codes.list_by_shop(shop_id).await
    }
}
