//! Administrative operations: bulk generation, ban, purge, and the
//! status-scoped and free-text listings.
//!
//! Authorization (membership in the administrator group) is enforced at
//! the handler layer, which answers 404 to non-admins.

use chrono::Utc;
use rand::RngExt;

use giftcode_domain::code::CodeStatus;
use giftcode_domain::id::CodeId;
use giftcode_domain::lockout::Lockout;
use giftcode_domain::pagination::PageRequest;

use crate::domain::repository::CodeRepository;
use crate::domain::types::{Code, PIN_LEN};
use crate::error::GiftServiceError;

/// Upper bound for one generation batch.
pub const MAX_BATCH: u32 = 1000;

fn generate_pin() -> String {
    let mut rng = rand::rng();
    (0..PIN_LEN)
        .map(|_| char::from(b'0' + rng.random_range(0..10) as u8))
        .collect()
}

// ── GenerateCodes ────────────────────────────────────────────────────────────

pub struct GenerateCodesInput {
    pub count: u32,
}

pub struct GenerateCodesUseCase<C: CodeRepository> {
    pub codes: C,
}

impl<C: CodeRepository> GenerateCodesUseCase<C> {
    /// Create `count` fresh codes in one batch. The response carries the
    /// PINs — this is the only moment they leave the system in bulk,
    /// for the card-printing export.
    pub async fn execute(&self, input: GenerateCodesInput) -> Result<Vec<Code>, GiftServiceError> {
        if input.count == 0 || input.count > MAX_BATCH {
            return Err(GiftServiceError::InvalidInput(
                "count must be between 1 and 1000",
            ));
        }
        let now = Utc::now();
        let batch: Vec<Code> = (0..input.count)
            .map(|_| Code {
                id: CodeId::generate(),
                status: CodeStatus::Unassigned,
                pin: generate_pin(),
                password_hash: None,
                shop_id: None,
                product_id: None,
                memo_for_users: None,
                memo_for_shop: None,
                lockout: Lockout::default(),
                activated_at: None,
                expires_at: None,
                created_at: now,
                updated_at: now,
            })
            .collect();
        self.codes.create_batch(&batch).await?;
        Ok(batch)
    }
}

// ── BanCode ──────────────────────────────────────────────────────────────────

pub struct BanCodeUseCase<C: CodeRepository> {
    pub codes: C,
}

impl<C: CodeRepository> BanCodeUseCase<C> {
    pub async fn execute(&self, code_id: CodeId) -> Result<(), GiftServiceError> {
        self.codes
            .find(code_id)
            .await?
            .ok_or(GiftServiceError::NotFound)?;
        // The conditional write refuses terminal statuses.
        if !self.codes.ban(code_id).await? {
            return Err(GiftServiceError::StateConflict);
        }
        Ok(())
    }
}

// ── PurgeBanned ──────────────────────────────────────────────────────────────

pub struct PurgeBannedUseCase<C: CodeRepository> {
    pub codes: C,
}

impl<C: CodeRepository> PurgeBannedUseCase<C> {
    pub async fn execute(&self) -> Result<u64, GiftServiceError> {
        let purged = self.codes.purge_banned().await?;
        tracing::info!(purged, "purged banned codes");
        Ok(purged)
    }
}

// ── ListCodesByStatus ────────────────────────────────────────────────────────

pub struct ListCodesByStatusUseCase<C: CodeRepository> {
    pub codes: C,
}

impl<C: CodeRepository> ListCodesByStatusUseCase<C> {
    pub async fn execute(
        &self,
        status: CodeStatus,
        page: PageRequest,
    ) -> Result<Vec<Code>, GiftServiceError> {
        self.codes.list_by_status(status, page.clamped()).await
    }
}

// ── SearchCodes ──────────────────────────────────────────────────────────────

pub struct SearchCodesUseCase<C: CodeRepository> {
    pub codes: C,
}

impl<C: CodeRepository> SearchCodesUseCase<C> {
    /// Substring scan over id and PIN. Debug tooling, not a production
    /// query path: unindexed and unordered.
    pub async fn execute(&self, query: &str) -> Result<Vec<Code>, GiftServiceError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GiftServiceError::InvalidInput("query is required"));
        }
        self.codes.search(query).await
    }
}
