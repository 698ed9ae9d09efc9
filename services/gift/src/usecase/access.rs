//! Shared access-control machinery: lazy-expiry loading, PIN checks with
//! lockout, and password hashing.

use chrono::{DateTime, Utc};

use giftcode_domain::code::{CodeStatus, is_expired};
use giftcode_domain::id::CodeId;
use giftcode_domain::lockout::Lockout;

use crate::domain::repository::CodeRepository;
use crate::domain::types::Code;
use crate::error::GiftServiceError;

/// Load a code, applying the lazy `Active → Expired` correction first.
///
/// The expiry write is best-effort: if it races with a concurrent
/// transition (e.g. a legitimate redeem), the store's own precondition
/// decides, and we re-read to proceed from whatever actually won.
pub async fn load_code<C: CodeRepository>(
    codes: &C,
    id: CodeId,
    now: DateTime<Utc>,
) -> Result<Code, GiftServiceError> {
    let code = codes.find(id).await?.ok_or(GiftServiceError::NotFound)?;
    if !is_expired(code.status, code.expires_at, now) {
        return Ok(code);
    }
    if codes.mark_expired(id, now).await? {
        return Ok(Code {
            status: CodeStatus::Expired,
            ..code
        });
    }
    // Lost the race; somebody else moved the code first.
    codes.find(id).await?.ok_or(GiftServiceError::NotFound)
}

/// Verify the PIN, mutating the lockout counters as the only side effect.
///
/// The lock check runs before any comparison, so a locked code
/// short-circuits with `Locked` and compares nothing. A mismatch counts
/// one failure; a match clears the counters.
pub async fn check_pin<C: CodeRepository>(
    codes: &C,
    code: &Code,
    pin: &str,
    now: DateTime<Utc>,
) -> Result<(), GiftServiceError> {
    if code.lockout.is_locked(now) {
        return Err(GiftServiceError::Locked);
    }
    if code.pin != pin {
        codes.record_auth_failure(code.id).await?;
        return Err(GiftServiceError::Unauthorized);
    }
    if code.lockout != Lockout::default() {
        codes.clear_auth_failures(code.id).await?;
    }
    Ok(())
}

/// Derive an argon2id PHC string for a new password. Computed once, at
/// first submission; the stored hash is never re-derived.
pub fn hash_password(password: &str) -> Result<String, GiftServiceError> {
    use argon2::password_hash::SaltString;
    use argon2::password_hash::rand_core::OsRng;
    use argon2::{Argon2, PasswordHasher};

    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| GiftServiceError::Internal(anyhow::anyhow!("hash password: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC string. An unparsable stored
/// hash verifies as false rather than erroring.
pub fn verify_password(password: &str, hash: &str) -> bool {
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
