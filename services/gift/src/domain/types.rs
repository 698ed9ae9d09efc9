use chrono::{DateTime, Utc};
use uuid::Uuid;

use giftcode_domain::code::CodeStatus;
use giftcode_domain::id::{CodeId, ProductId, ShopId};
use giftcode_domain::lockout::Lockout;

/// PIN length in digits. Fixed at creation, never reissued.
pub const PIN_LEN: usize = 6;

/// Author name reserved for service-generated chat entries.
pub const SYSTEM_AUTHOR: &str = "system";

/// One gift code as stored.
#[derive(Debug, Clone)]
pub struct Code {
    pub id: CodeId,
    pub status: CodeStatus,
    pub pin: String,
    /// Argon2id PHC string, set once at first recipient submission.
    pub password_hash: Option<String>,
    pub shop_id: Option<ShopId>,
    pub product_id: Option<ProductId>,
    pub memo_for_users: Option<String>,
    pub memo_for_shop: Option<String>,
    pub lockout: Lockout,
    pub activated_at: Option<DateTime<Utc>>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Code {
    pub fn is_password_protected(&self) -> bool {
        self.password_hash.is_some()
    }
}

/// A shop, owned by an identity-provider subject.
#[derive(Debug, Clone)]
pub struct Shop {
    pub id: ShopId,
    pub owner_subject_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductStatus {
    Active,
    Stopped,
}

impl ProductStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Stopped => "stopped",
        }
    }

    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "active" => Some(Self::Active),
            "stopped" => Some(Self::Stopped),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub shop_id: ShopId,
    pub name: String,
    pub status: ProductStatus,
    /// Days from activation to expiry for codes linked to this product.
    pub valid_days: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Shipping details attached to a used code. Created in the same atomic
/// write that flips the code to `Used`; never exists on its own.
#[derive(Debug, Clone)]
pub struct Order {
    pub code_id: CodeId,
    pub recipient_name: String,
    pub postal_code: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub carrier: Option<String>,
    pub tracking_number: Option<String>,
    pub shipped_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: Uuid,
    pub code_id: CodeId,
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct ChatSubscriber {
    pub code_id: CodeId,
    pub email: String,
    /// BCP 47-ish language tag for notification emails ("en", "ja", ...).
    pub lang: String,
}
