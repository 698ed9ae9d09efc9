//! Recipient-facing operations: verify, submit shipping details
//! (redeem), and confirm completion. All are PIN-gated.

use chrono::Utc;

use giftcode_domain::code::CodeStatus;
use giftcode_domain::id::CodeId;

use crate::domain::repository::{CodeRepository, Mailer, OrderRepository, ProductRepository};
use crate::domain::types::{Code, Order, Product};
use crate::error::GiftServiceError;
use crate::usecase::access::{check_pin, hash_password, load_code, verify_password};

// ── VerifyCode ───────────────────────────────────────────────────────────────

pub struct VerifyCodeInput {
    pub code_id: CodeId,
    pub pin: String,
    pub password: Option<String>,
}

/// Disclosed only to fully authorized callers.
#[derive(Debug)]
pub struct CodeDetail {
    pub product: Option<Product>,
    pub memo_for_users: Option<String>,
    pub order: Option<Order>,
}

#[derive(Debug)]
pub struct VerifyCodeOutput {
    pub status: CodeStatus,
    pub is_password_protected: bool,
    pub is_authorized: bool,
    pub detail: Option<CodeDetail>,
}

pub struct VerifyCodeUseCase<C, O, P>
where
    C: CodeRepository,
    O: OrderRepository,
    P: ProductRepository,
{
    pub codes: C,
    pub orders: O,
    pub products: P,
}

impl<C, O, P> VerifyCodeUseCase<C, O, P>
where
    C: CodeRepository,
    O: OrderRepository,
    P: ProductRepository,
{
    pub async fn execute(&self, input: VerifyCodeInput) -> Result<VerifyCodeOutput, GiftServiceError> {
        let now = Utc::now();
        let code = load_code(&self.codes, input.code_id, now).await?;

        // PIN verification stands alone: it succeeds or fails on the PIN,
        // and the password only gates what gets disclosed afterwards.
        check_pin(&self.codes, &code, &input.pin, now).await?;

        let protected = code.is_password_protected();
        let authorized = match (&code.password_hash, &input.password) {
            (None, _) => true,
            (Some(hash), Some(password)) => {
                if verify_password(password, hash) {
                    true
                } else {
                    // A failed password check counts toward the same lockout.
                    self.codes.record_auth_failure(code.id).await?;
                    false
                }
            }
            (Some(_), None) => false,
        };

        let detail = if authorized {
            Some(self.load_detail(&code).await?)
        } else {
            None
        };

        Ok(VerifyCodeOutput {
            status: code.status,
            is_password_protected: protected,
            is_authorized: authorized,
            detail,
        })
    }

    async fn load_detail(&self, code: &Code) -> Result<CodeDetail, GiftServiceError> {
        let product = match code.product_id {
            Some(id) => self.products.find(id).await?,
            None => None,
        };
        let order = self.orders.find_by_code(code.id).await?;
        Ok(CodeDetail {
            product,
            memo_for_users: code.memo_for_users.clone(),
            order,
        })
    }
}

// ── SubmitShipping ───────────────────────────────────────────────────────────

pub struct SubmitShippingInput {
    pub code_id: CodeId,
    pub pin: String,
    /// Verified when the code is already protected; otherwise stored as
    /// the code's password from now on.
    pub password: Option<String>,
    pub recipient_name: String,
    pub postal_code: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug)]
pub struct SubmitShippingOutput {
    pub order: Order,
    /// `None` when no email address was supplied; failure is non-fatal.
    pub confirmation_sent: Option<bool>,
}

pub struct SubmitShippingUseCase<C, M>
where
    C: CodeRepository,
    M: Mailer,
{
    pub codes: C,
    pub mailer: M,
}

impl<C, M> SubmitShippingUseCase<C, M>
where
    C: CodeRepository,
    M: Mailer,
{
    pub async fn execute(
        &self,
        input: SubmitShippingInput,
    ) -> Result<SubmitShippingOutput, GiftServiceError> {
        // Required-field validation happens before the store is touched.
        if input.recipient_name.trim().is_empty() {
            return Err(GiftServiceError::InvalidInput("recipient name is required"));
        }
        if input.postal_code.trim().is_empty() {
            return Err(GiftServiceError::InvalidInput("postal code is required"));
        }
        if input.address.trim().is_empty() {
            return Err(GiftServiceError::InvalidInput("address is required"));
        }

        let now = Utc::now();
        let code = load_code(&self.codes, input.code_id, now).await?;
        check_pin(&self.codes, &code, &input.pin, now).await?;

        // Hash stored once at first submission; afterwards only verified.
        let new_hash = match (&code.password_hash, &input.password) {
            (Some(hash), Some(password)) => {
                if !verify_password(password, hash) {
                    self.codes.record_auth_failure(code.id).await?;
                    return Err(GiftServiceError::Unauthorized);
                }
                None
            }
            (Some(_), None) => return Err(GiftServiceError::Unauthorized),
            (None, Some(password)) => Some(hash_password(password)?),
            (None, None) => None,
        };

        let order = Order {
            code_id: code.id,
            recipient_name: input.recipient_name,
            postal_code: input.postal_code,
            address: input.address,
            phone: input.phone,
            email: input.email,
            carrier: None,
            tracking_number: None,
            shipped_at: None,
            created_at: now,
            updated_at: now,
        };

        // Status flip + order creation are one atomic batch; two
        // concurrent submissions race at the store and exactly one wins.
        let applied = self.codes.redeem(code.id, &order, new_hash.as_deref()).await?;
        if !applied {
            return Err(GiftServiceError::StateConflict);
        }

        let confirmation_sent = match &order.email {
            Some(email) => {
                let result = self
                    .mailer
                    .send(
                        std::slice::from_ref(email),
                        "Your gift order has been received",
                        &format!(
                            "Shipping details for gift code {} were received.\n\
                             You will be notified again once the item ships.",
                            code.id
                        ),
                    )
                    .await;
                if let Err(ref e) = result {
                    tracing::warn!(code_id = %code.id, error = %e, "confirmation email failed");
                }
                Some(result.is_ok())
            }
            None => None,
        };

        Ok(SubmitShippingOutput {
            order,
            confirmation_sent,
        })
    }
}

// ── CompleteCode ─────────────────────────────────────────────────────────────

pub struct CompleteCodeInput {
    pub code_id: CodeId,
    pub pin: String,
}

pub struct CompleteCodeUseCase<C: CodeRepository> {
    pub codes: C,
}

impl<C: CodeRepository> CompleteCodeUseCase<C> {
    pub async fn execute(&self, input: CompleteCodeInput) -> Result<(), GiftServiceError> {
        let now = Utc::now();
        let code = load_code(&self.codes, input.code_id, now).await?;
        check_pin(&self.codes, &code, &input.pin, now).await?;

        if !self.codes.complete(code.id).await? {
            return Err(GiftServiceError::StateConflict);
        }
        Ok(())
    }
}
