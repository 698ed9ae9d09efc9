#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use giftcode_domain::code::CodeStatus;
use giftcode_domain::id::{CodeId, ProductId, ShopId};
use giftcode_domain::lockout::Lockout;
use giftcode_domain::pagination::PageRequest;

use crate::domain::types::{ChatMessage, ChatSubscriber, Code, Order, Product, Shop};
use crate::error::GiftServiceError;

/// Repository for gift codes.
///
/// Every lifecycle transition is a conditional write: the stored status
/// is part of the WHERE clause, the store checks it atomically, and the
/// method returns `false` when the precondition no longer held. Callers
/// surface that as `StateConflict` — never overwrite.
pub trait CodeRepository: Send + Sync {
    async fn find(&self, id: CodeId) -> Result<Option<Code>, GiftServiceError>;

    /// Insert a freshly generated batch. All codes start `Unassigned`.
    async fn create_batch(&self, codes: &[Code]) -> Result<(), GiftServiceError>;

    /// `Unassigned → Linked`, setting shop and product.
    async fn link(
        &self,
        id: CodeId,
        shop_id: ShopId,
        product_id: ProductId,
    ) -> Result<bool, GiftServiceError>;

    /// `Unassigned/Linked → Active` (expected status in the predicate),
    /// setting shop, product, and the activation/expiry instants.
    async fn activate(
        &self,
        id: CodeId,
        expected: CodeStatus,
        shop_id: ShopId,
        product_id: Option<ProductId>,
        activated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, GiftServiceError>;

    /// Lazy-expiry write: `Active → Expired` iff the window has passed.
    async fn mark_expired(&self, id: CodeId, now: DateTime<Utc>) -> Result<bool, GiftServiceError>;

    /// `Active → Used` plus order creation, one atomic batch. Clears the
    /// lockout counters and stores `password_hash` when one is being set
    /// for the first time.
    async fn redeem(
        &self,
        id: CodeId,
        order: &Order,
        password_hash: Option<&str>,
    ) -> Result<bool, GiftServiceError>;

    /// `Used → Shipped` plus carrier/tracking on the order, one atomic batch.
    async fn ship(
        &self,
        id: CodeId,
        carrier: &str,
        tracking_number: &str,
        shipped_at: DateTime<Utc>,
    ) -> Result<bool, GiftServiceError>;

    /// `Shipped → Completed`.
    async fn complete(&self, id: CodeId) -> Result<bool, GiftServiceError>;

    /// `any non-terminal → Banned`.
    async fn ban(&self, id: CodeId) -> Result<bool, GiftServiceError>;

    /// Bulk-delete terminal `Banned` codes. Returns the purge count.
    async fn purge_banned(&self) -> Result<u64, GiftServiceError>;

    /// Atomically increment the failure counter, opening the lock window
    /// when the threshold is reached. Returns the post-increment counters.
    async fn record_auth_failure(&self, id: CodeId) -> Result<Lockout, GiftServiceError>;

    /// Remove both lockout fields after a successful check.
    async fn clear_auth_failures(&self, id: CodeId) -> Result<(), GiftServiceError>;

    async fn update_memos(
        &self,
        id: CodeId,
        memo_for_users: Option<String>,
        memo_for_shop: Option<String>,
    ) -> Result<bool, GiftServiceError>;

    /// Status-scoped listing via the status index, most recently updated first.
    async fn list_by_status(
        &self,
        status: CodeStatus,
        page: PageRequest,
    ) -> Result<Vec<Code>, GiftServiceError>;

    /// Owner-scoped listing via the shop index, with attached orders.
    async fn list_by_shop(
        &self,
        shop_id: ShopId,
    ) -> Result<Vec<(Code, Option<Order>)>, GiftServiceError>;

    /// Substring scan over id and PIN. Fallback/debug path — full scan,
    /// no ordering guarantee.
    async fn search(&self, query: &str) -> Result<Vec<Code>, GiftServiceError>;

    /// Redeemed-but-unshipped codes referencing a product (product
    /// deletion guard).
    async fn count_used_for_product(&self, product_id: ProductId)
    -> Result<u64, GiftServiceError>;
}

/// Read access to the order attached to a code.
pub trait OrderRepository: Send + Sync {
    async fn find_by_code(&self, code_id: CodeId) -> Result<Option<Order>, GiftServiceError>;
}

pub trait ShopRepository: Send + Sync {
    async fn create(&self, shop: &Shop) -> Result<(), GiftServiceError>;
    async fn find(&self, id: ShopId) -> Result<Option<Shop>, GiftServiceError>;
    async fn list_by_owner(&self, owner_subject_id: Uuid) -> Result<Vec<Shop>, GiftServiceError>;
}

pub trait ProductRepository: Send + Sync {
    async fn create(&self, product: &Product) -> Result<(), GiftServiceError>;
    async fn find(&self, id: ProductId) -> Result<Option<Product>, GiftServiceError>;
    /// `active → stopped`, conditional on the stored status.
    async fn stop(&self, id: ProductId) -> Result<bool, GiftServiceError>;
    /// Physical delete; the caller has already checked the guards.
    async fn delete(&self, id: ProductId) -> Result<bool, GiftServiceError>;
}

/// Append-only per-code message ledger plus its subscriber set.
pub trait ChatRepository: Send + Sync {
    async fn list_messages(&self, code_id: CodeId) -> Result<Vec<ChatMessage>, GiftServiceError>;
    async fn append_message(&self, message: &ChatMessage) -> Result<(), GiftServiceError>;
    async fn list_subscribers(
        &self,
        code_id: CodeId,
    ) -> Result<Vec<ChatSubscriber>, GiftServiceError>;
    /// Insert or update the subscription; idempotent beyond the language
    /// preference overwrite.
    async fn upsert_subscriber(&self, sub: &ChatSubscriber) -> Result<(), GiftServiceError>;
}

/// Port for the external email-delivery collaborator. Best-effort from
/// the core's perspective: callers log failures and never roll back the
/// triggering operation.
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &[String], subject: &str, text: &str)
    -> Result<(), GiftServiceError>;
}
