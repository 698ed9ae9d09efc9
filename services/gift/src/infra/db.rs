use anyhow::Context as _;
use chrono::{DateTime, Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection,
    DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use giftcode_domain::code::CodeStatus;
use giftcode_domain::id::{CodeId, ProductId, ShopId};
use giftcode_domain::lockout::{LOCKOUT_THRESHOLD, LOCKOUT_WINDOW_SECS, Lockout};
use giftcode_domain::pagination::PageRequest;
use giftcode_schema::{chat_messages, chat_subscribers, codes, orders, products, shops};

use crate::domain::repository::{
    ChatRepository, CodeRepository, OrderRepository, ProductRepository, ShopRepository,
};
use crate::domain::types::{ChatMessage, ChatSubscriber, Code, Order, Product, ProductStatus, Shop};
use crate::error::GiftServiceError;

// ── Code repository ──────────────────────────────────────────────────────────

/// Lifecycle transitions are `UPDATE … WHERE id = ? AND status = ?`:
/// the store checks the precondition atomically and `rows_affected = 0`
/// means the code was no longer in the expected status. Mutations that
/// must land together (status flip + order row) run in one transaction.
#[derive(Clone)]
pub struct DbCodeRepository {
    pub db: DatabaseConnection,
}

impl CodeRepository for DbCodeRepository {
    async fn find(&self, id: CodeId) -> Result<Option<Code>, GiftServiceError> {
        let model = codes::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find code by id")?;
        model.map(code_from_model).transpose()
    }

    async fn create_batch(&self, batch: &[Code]) -> Result<(), GiftServiceError> {
        let models = batch.iter().map(|code| codes::ActiveModel {
            id: Set(code.id.0),
            status: Set(code.status.as_str().to_owned()),
            pin: Set(code.pin.clone()),
            password_hash: Set(code.password_hash.clone()),
            shop_id: Set(code.shop_id.map(|s| s.0)),
            product_id: Set(code.product_id.map(|p| p.0)),
            memo_for_users: Set(code.memo_for_users.clone()),
            memo_for_shop: Set(code.memo_for_shop.clone()),
            failed_attempts: Set(code.lockout.failed_attempts),
            locked_until: Set(code.lockout.locked_until),
            activated_at: Set(code.activated_at),
            expires_at: Set(code.expires_at),
            created_at: Set(code.created_at),
            updated_at: Set(code.updated_at),
        });
        codes::Entity::insert_many(models)
            .exec(&self.db)
            .await
            .context("insert code batch")?;
        Ok(())
    }

    async fn link(
        &self,
        id: CodeId,
        shop_id: ShopId,
        product_id: ProductId,
    ) -> Result<bool, GiftServiceError> {
        let result = codes::Entity::update_many()
            .col_expr(
                codes::Column::Status,
                Expr::value(CodeStatus::Linked.as_str()),
            )
            .col_expr(codes::Column::ShopId, Expr::value(Some(shop_id.0)))
            .col_expr(codes::Column::ProductId, Expr::value(Some(product_id.0)))
            .col_expr(codes::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(codes::Column::Id.eq(id.0))
            .filter(codes::Column::Status.eq(CodeStatus::Unassigned.as_str()))
            .exec(&self.db)
            .await
            .context("link code")?;
        Ok(result.rows_affected > 0)
    }

    async fn activate(
        &self,
        id: CodeId,
        expected: CodeStatus,
        shop_id: ShopId,
        product_id: Option<ProductId>,
        activated_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, GiftServiceError> {
        let result = codes::Entity::update_many()
            .col_expr(
                codes::Column::Status,
                Expr::value(CodeStatus::Active.as_str()),
            )
            .col_expr(codes::Column::ShopId, Expr::value(Some(shop_id.0)))
            .col_expr(
                codes::Column::ProductId,
                Expr::value(product_id.map(|p| p.0)),
            )
            .col_expr(codes::Column::ActivatedAt, Expr::value(Some(activated_at)))
            .col_expr(codes::Column::ExpiresAt, Expr::value(Some(expires_at)))
            .col_expr(codes::Column::UpdatedAt, Expr::value(activated_at))
            .filter(codes::Column::Id.eq(id.0))
            .filter(codes::Column::Status.eq(expected.as_str()))
            .exec(&self.db)
            .await
            .context("activate code")?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_expired(&self, id: CodeId, now: DateTime<Utc>) -> Result<bool, GiftServiceError> {
        let result = codes::Entity::update_many()
            .col_expr(
                codes::Column::Status,
                Expr::value(CodeStatus::Expired.as_str()),
            )
            .col_expr(codes::Column::UpdatedAt, Expr::value(now))
            .filter(codes::Column::Id.eq(id.0))
            .filter(codes::Column::Status.eq(CodeStatus::Active.as_str()))
            .filter(codes::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await
            .context("mark code expired")?;
        Ok(result.rows_affected > 0)
    }

    async fn redeem(
        &self,
        id: CodeId,
        order: &Order,
        password_hash: Option<&str>,
    ) -> Result<bool, GiftServiceError> {
        let order = order.clone();
        let password_hash = password_hash.map(str::to_owned);
        let applied = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let now = Utc::now();
                    let mut update = codes::Entity::update_many()
                        .col_expr(
                            codes::Column::Status,
                            Expr::value(CodeStatus::Used.as_str()),
                        )
                        .col_expr(codes::Column::FailedAttempts, Expr::value(0))
                        .col_expr(
                            codes::Column::LockedUntil,
                            Expr::value(Option::<DateTime<Utc>>::None),
                        )
                        .col_expr(codes::Column::UpdatedAt, Expr::value(now))
                        .filter(codes::Column::Id.eq(id.0))
                        .filter(codes::Column::Status.eq(CodeStatus::Active.as_str()));
                    if let Some(hash) = password_hash {
                        update =
                            update.col_expr(codes::Column::PasswordHash, Expr::value(Some(hash)));
                    }
                    if update.exec(txn).await?.rows_affected == 0 {
                        return Ok(false);
                    }
                    insert_order(txn, &order).await?;
                    Ok(true)
                })
            })
            .await
            .context("redeem code")?;
        Ok(applied)
    }

    async fn ship(
        &self,
        id: CodeId,
        carrier: &str,
        tracking_number: &str,
        shipped_at: DateTime<Utc>,
    ) -> Result<bool, GiftServiceError> {
        let carrier = carrier.to_owned();
        let tracking_number = tracking_number.to_owned();
        let applied = self
            .db
            .transaction::<_, bool, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let flipped = codes::Entity::update_many()
                        .col_expr(
                            codes::Column::Status,
                            Expr::value(CodeStatus::Shipped.as_str()),
                        )
                        .col_expr(codes::Column::UpdatedAt, Expr::value(shipped_at))
                        .filter(codes::Column::Id.eq(id.0))
                        .filter(codes::Column::Status.eq(CodeStatus::Used.as_str()))
                        .exec(txn)
                        .await?;
                    if flipped.rows_affected == 0 {
                        return Ok(false);
                    }
                    orders::Entity::update_many()
                        .col_expr(orders::Column::Carrier, Expr::value(Some(carrier)))
                        .col_expr(
                            orders::Column::TrackingNumber,
                            Expr::value(Some(tracking_number)),
                        )
                        .col_expr(orders::Column::ShippedAt, Expr::value(Some(shipped_at)))
                        .col_expr(orders::Column::UpdatedAt, Expr::value(shipped_at))
                        .filter(orders::Column::CodeId.eq(id.0))
                        .exec(txn)
                        .await?;
                    Ok(true)
                })
            })
            .await
            .context("ship code")?;
        Ok(applied)
    }

    async fn complete(&self, id: CodeId) -> Result<bool, GiftServiceError> {
        let result = codes::Entity::update_many()
            .col_expr(
                codes::Column::Status,
                Expr::value(CodeStatus::Completed.as_str()),
            )
            .col_expr(codes::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(codes::Column::Id.eq(id.0))
            .filter(codes::Column::Status.eq(CodeStatus::Shipped.as_str()))
            .exec(&self.db)
            .await
            .context("complete code")?;
        Ok(result.rows_affected > 0)
    }

    async fn ban(&self, id: CodeId) -> Result<bool, GiftServiceError> {
        let terminal = [
            CodeStatus::Completed.as_str(),
            CodeStatus::Expired.as_str(),
            CodeStatus::Banned.as_str(),
        ];
        let result = codes::Entity::update_many()
            .col_expr(
                codes::Column::Status,
                Expr::value(CodeStatus::Banned.as_str()),
            )
            .col_expr(codes::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(codes::Column::Id.eq(id.0))
            .filter(codes::Column::Status.is_not_in(terminal))
            .exec(&self.db)
            .await
            .context("ban code")?;
        Ok(result.rows_affected > 0)
    }

    async fn purge_banned(&self) -> Result<u64, GiftServiceError> {
        let result = codes::Entity::delete_many()
            .filter(codes::Column::Status.eq(CodeStatus::Banned.as_str()))
            .exec(&self.db)
            .await
            .context("purge banned codes")?;
        Ok(result.rows_affected)
    }

    async fn record_auth_failure(&self, id: CodeId) -> Result<Lockout, GiftServiceError> {
        let now = Utc::now();
        // Atomic increment first; the counter may over-count under a
        // concurrent burst but never under-counts past the threshold.
        codes::Entity::update_many()
            .col_expr(
                codes::Column::FailedAttempts,
                Expr::col(codes::Column::FailedAttempts).add(1),
            )
            .col_expr(codes::Column::UpdatedAt, Expr::value(now))
            .filter(codes::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("increment failed attempts")?;

        let model = codes::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("re-read failure counters")?
            .ok_or(GiftServiceError::NotFound)?;

        let mut lockout = Lockout {
            failed_attempts: model.failed_attempts,
            locked_until: model.locked_until,
        };
        if lockout.failed_attempts >= LOCKOUT_THRESHOLD {
            let until = now + Duration::seconds(LOCKOUT_WINDOW_SECS);
            codes::ActiveModel {
                id: Set(id.0),
                locked_until: Set(Some(until)),
                updated_at: Set(now),
                ..Default::default()
            }
            .update(&self.db)
            .await
            .context("open lock window")?;
            lockout.locked_until = Some(until);
        }
        Ok(lockout)
    }

    async fn clear_auth_failures(&self, id: CodeId) -> Result<(), GiftServiceError> {
        codes::ActiveModel {
            id: Set(id.0),
            failed_attempts: Set(0),
            locked_until: Set(None),
            updated_at: Set(Utc::now()),
            ..Default::default()
        }
        .update(&self.db)
        .await
        .context("clear failure counters")?;
        Ok(())
    }

    async fn update_memos(
        &self,
        id: CodeId,
        memo_for_users: Option<String>,
        memo_for_shop: Option<String>,
    ) -> Result<bool, GiftServiceError> {
        let result = codes::Entity::update_many()
            .col_expr(codes::Column::MemoForUsers, Expr::value(memo_for_users))
            .col_expr(codes::Column::MemoForShop, Expr::value(memo_for_shop))
            .col_expr(codes::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(codes::Column::Id.eq(id.0))
            .exec(&self.db)
            .await
            .context("update code memos")?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_status(
        &self,
        status: CodeStatus,
        page: PageRequest,
    ) -> Result<Vec<Code>, GiftServiceError> {
        let models = codes::Entity::find()
            .filter(codes::Column::Status.eq(status.as_str()))
            .order_by_desc(codes::Column::UpdatedAt)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await
            .context("list codes by status")?;
        models.into_iter().map(code_from_model).collect()
    }

    async fn list_by_shop(
        &self,
        shop_id: ShopId,
    ) -> Result<Vec<(Code, Option<Order>)>, GiftServiceError> {
        let rows = codes::Entity::find()
            .filter(codes::Column::ShopId.eq(shop_id.0))
            .find_also_related(orders::Entity)
            .order_by_desc(codes::Column::UpdatedAt)
            .all(&self.db)
            .await
            .context("list codes by shop")?;
        rows.into_iter()
            .map(|(code, order)| Ok((code_from_model(code)?, order.map(order_from_model))))
            .collect()
    }

    async fn search(&self, query: &str) -> Result<Vec<Code>, GiftServiceError> {
        let pattern = format!("%{query}%");
        let models = codes::Entity::find()
            .filter(
                Condition::any()
                    .add(Expr::cust_with_values(
                        "CAST(\"codes\".\"id\" AS TEXT) LIKE ?",
                        [pattern.clone()],
                    ))
                    .add(codes::Column::Pin.like(&pattern)),
            )
            .all(&self.db)
            .await
            .context("search codes")?;
        models.into_iter().map(code_from_model).collect()
    }

    async fn count_used_for_product(
        &self,
        product_id: ProductId,
    ) -> Result<u64, GiftServiceError> {
        let count = codes::Entity::find()
            .filter(codes::Column::ProductId.eq(product_id.0))
            .filter(codes::Column::Status.eq(CodeStatus::Used.as_str()))
            .count(&self.db)
            .await
            .context("count used codes for product")?;
        Ok(count)
    }
}

async fn insert_order(txn: &DatabaseTransaction, order: &Order) -> Result<(), sea_orm::DbErr> {
    orders::ActiveModel {
        code_id: Set(order.code_id.0),
        recipient_name: Set(order.recipient_name.clone()),
        postal_code: Set(order.postal_code.clone()),
        address: Set(order.address.clone()),
        phone: Set(order.phone.clone()),
        email: Set(order.email.clone()),
        carrier: Set(None),
        tracking_number: Set(None),
        shipped_at: Set(None),
        created_at: Set(order.created_at),
        updated_at: Set(order.updated_at),
    }
    .insert(txn)
    .await?;
    Ok(())
}

fn code_from_model(model: codes::Model) -> Result<Code, GiftServiceError> {
    let status = CodeStatus::from_str_opt(&model.status).ok_or_else(|| {
        GiftServiceError::Internal(anyhow::anyhow!("unknown code status {:?}", model.status))
    })?;
    Ok(Code {
        id: CodeId(model.id),
        status,
        pin: model.pin,
        password_hash: model.password_hash,
        shop_id: model.shop_id.map(ShopId),
        product_id: model.product_id.map(ProductId),
        memo_for_users: model.memo_for_users,
        memo_for_shop: model.memo_for_shop,
        lockout: Lockout {
            failed_attempts: model.failed_attempts,
            locked_until: model.locked_until,
        },
        activated_at: model.activated_at,
        expires_at: model.expires_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Order repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbOrderRepository {
    pub db: DatabaseConnection,
}

impl OrderRepository for DbOrderRepository {
    async fn find_by_code(&self, code_id: CodeId) -> Result<Option<Order>, GiftServiceError> {
        let model = orders::Entity::find_by_id(code_id.0)
            .one(&self.db)
            .await
            .context("find order by code")?;
        Ok(model.map(order_from_model))
    }
}

fn order_from_model(model: orders::Model) -> Order {
    Order {
        code_id: CodeId(model.code_id),
        recipient_name: model.recipient_name,
        postal_code: model.postal_code,
        address: model.address,
        phone: model.phone,
        email: model.email,
        carrier: model.carrier,
        tracking_number: model.tracking_number,
        shipped_at: model.shipped_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Shop repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbShopRepository {
    pub db: DatabaseConnection,
}

impl ShopRepository for DbShopRepository {
    async fn create(&self, shop: &Shop) -> Result<(), GiftServiceError> {
        shops::ActiveModel {
            id: Set(shop.id.0),
            owner_subject_id: Set(shop.owner_subject_id),
            name: Set(shop.name.clone()),
            created_at: Set(shop.created_at),
            updated_at: Set(shop.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create shop")?;
        Ok(())
    }

    async fn find(&self, id: ShopId) -> Result<Option<Shop>, GiftServiceError> {
        let model = shops::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find shop by id")?;
        Ok(model.map(shop_from_model))
    }

    async fn list_by_owner(&self, owner_subject_id: Uuid) -> Result<Vec<Shop>, GiftServiceError> {
        let models = shops::Entity::find()
            .filter(shops::Column::OwnerSubjectId.eq(owner_subject_id))
            .order_by_desc(shops::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list shops by owner")?;
        Ok(models.into_iter().map(shop_from_model).collect())
    }
}

fn shop_from_model(model: shops::Model) -> Shop {
    Shop {
        id: ShopId(model.id),
        owner_subject_id: model.owner_subject_id,
        name: model.name,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl ProductRepository for DbProductRepository {
    async fn create(&self, product: &Product) -> Result<(), GiftServiceError> {
        products::ActiveModel {
            id: Set(product.id.0),
            shop_id: Set(product.shop_id.0),
            name: Set(product.name.clone()),
            status: Set(product.status.as_str().to_owned()),
            valid_days: Set(product.valid_days),
            created_at: Set(product.created_at),
            updated_at: Set(product.updated_at),
        }
        .insert(&self.db)
        .await
        .context("create product")?;
        Ok(())
    }

    async fn find(&self, id: ProductId) -> Result<Option<Product>, GiftServiceError> {
        let model = products::Entity::find_by_id(id.0)
            .one(&self.db)
            .await
            .context("find product by id")?;
        model.map(product_from_model).transpose()
    }

    async fn stop(&self, id: ProductId) -> Result<bool, GiftServiceError> {
        let result = products::Entity::update_many()
            .col_expr(
                products::Column::Status,
                Expr::value(ProductStatus::Stopped.as_str()),
            )
            .col_expr(products::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(products::Column::Id.eq(id.0))
            .filter(products::Column::Status.eq(ProductStatus::Active.as_str()))
            .exec(&self.db)
            .await
            .context("stop product")?;
        Ok(result.rows_affected > 0)
    }

    async fn delete(&self, id: ProductId) -> Result<bool, GiftServiceError> {
        let result = products::Entity::delete_by_id(id.0)
            .exec(&self.db)
            .await
            .context("delete product")?;
        Ok(result.rows_affected > 0)
    }
}

fn product_from_model(model: products::Model) -> Result<Product, GiftServiceError> {
    let status = ProductStatus::from_str_opt(&model.status).ok_or_else(|| {
        GiftServiceError::Internal(anyhow::anyhow!("unknown product status {:?}", model.status))
    })?;
    Ok(Product {
        id: ProductId(model.id),
        shop_id: ShopId(model.shop_id),
        name: model.name,
        status,
        valid_days: model.valid_days,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Chat repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbChatRepository {
    pub db: DatabaseConnection,
}

impl ChatRepository for DbChatRepository {
    async fn list_messages(&self, code_id: CodeId) -> Result<Vec<ChatMessage>, GiftServiceError> {
        let models = chat_messages::Entity::find()
            .filter(chat_messages::Column::CodeId.eq(code_id.0))
            .order_by_asc(chat_messages::Column::CreatedAt)
            .all(&self.db)
            .await
            .context("list chat messages")?;
        Ok(models
            .into_iter()
            .map(|m| ChatMessage {
                id: m.id,
                code_id: CodeId(m.code_id),
                author: m.author,
                body: m.body,
                created_at: m.created_at,
            })
            .collect())
    }

    async fn append_message(&self, message: &ChatMessage) -> Result<(), GiftServiceError> {
        chat_messages::ActiveModel {
            id: Set(message.id),
            code_id: Set(message.code_id.0),
            author: Set(message.author.clone()),
            body: Set(message.body.clone()),
            created_at: Set(message.created_at),
        }
        .insert(&self.db)
        .await
        .context("append chat message")?;
        Ok(())
    }

    async fn list_subscribers(
        &self,
        code_id: CodeId,
    ) -> Result<Vec<ChatSubscriber>, GiftServiceError> {
        let models = chat_subscribers::Entity::find()
            .filter(chat_subscribers::Column::CodeId.eq(code_id.0))
            .all(&self.db)
            .await
            .context("list chat subscribers")?;
        Ok(models
            .into_iter()
            .map(|m| ChatSubscriber {
                code_id: CodeId(m.code_id),
                email: m.email,
                lang: m.lang,
            })
            .collect())
    }

    async fn upsert_subscriber(&self, sub: &ChatSubscriber) -> Result<(), GiftServiceError> {
        let now = Utc::now();
        chat_subscribers::Entity::insert(chat_subscribers::ActiveModel {
            code_id: Set(sub.code_id.0),
            email: Set(sub.email.clone()),
            lang: Set(sub.lang.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        })
        .on_conflict(
            OnConflict::columns([
                chat_subscribers::Column::CodeId,
                chat_subscribers::Column::Email,
            ])
            .update_columns([
                chat_subscribers::Column::Lang,
                chat_subscribers::Column::UpdatedAt,
            ])
            .to_owned(),
        )
        .exec(&self.db)
        .await
        .context("upsert chat subscriber")?;
        Ok(())
    }
}
