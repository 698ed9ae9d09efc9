//! Per-code messaging ledger: list, post, subscribe. PIN-gated on every
//! read and write; the password never applies here.

use chrono::Utc;
use uuid::Uuid;

use giftcode_domain::id::CodeId;

use crate::domain::repository::{ChatRepository, CodeRepository, Mailer};
use crate::domain::types::{ChatMessage, ChatSubscriber, SYSTEM_AUTHOR};
use crate::error::GiftServiceError;
use crate::usecase::access::{check_pin, load_code};

fn is_plausible_email(s: &str) -> bool {
    let Some((local, domain)) = s.split_once('@') else {
        return false;
    };
    !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
}

/// Notification subject in the subscriber's stored language.
fn notify_subject(lang: &str) -> &'static str {
    match lang {
        "ja" => "ギフトチャットに新着メッセージがあります",
        _ => "New message in your gift chat",
    }
}

// ── ListMessages ─────────────────────────────────────────────────────────────

pub struct ListMessagesInput {
    pub code_id: CodeId,
    pub pin: String,
}

pub struct ListMessagesUseCase<C, T>
where
    C: CodeRepository,
    T: ChatRepository,
{
    pub codes: C,
    pub chat: T,
}

impl<C, T> ListMessagesUseCase<C, T>
where
    C: CodeRepository,
    T: ChatRepository,
{
    pub async fn execute(
        &self,
        input: ListMessagesInput,
    ) -> Result<Vec<ChatMessage>, GiftServiceError> {
        let now = Utc::now();
        let code = load_code(&self.codes, input.code_id, now).await?;
        check_pin(&self.codes, &code, &input.pin, now).await?;
        self.chat.list_messages(code.id).await
    }
}

// ── PostMessage ──────────────────────────────────────────────────────────────

pub struct PostMessageInput {
    pub code_id: CodeId,
    pub pin: String,
    pub author: String,
    pub body: String,
}

pub struct PostMessageUseCase<C, T, M>
where
    C: CodeRepository,
    T: ChatRepository,
    M: Mailer,
{
    pub codes: C,
    pub chat: T,
    pub mailer: M,
}

impl<C, T, M> PostMessageUseCase<C, T, M>
where
    C: CodeRepository,
    T: ChatRepository,
    M: Mailer,
{
    pub async fn execute(&self, input: PostMessageInput) -> Result<ChatMessage, GiftServiceError> {
        let author = input.author.trim();
        if author.is_empty() {
            return Err(GiftServiceError::InvalidInput("author name is required"));
        }
        if author.eq_ignore_ascii_case(SYSTEM_AUTHOR) {
            return Err(GiftServiceError::InvalidInput("author name is reserved"));
        }
        if input.body.trim().is_empty() {
            return Err(GiftServiceError::InvalidInput("message body is required"));
        }

        let now = Utc::now();
        let code = load_code(&self.codes, input.code_id, now).await?;
        check_pin(&self.codes, &code, &input.pin, now).await?;

        let message = ChatMessage {
            id: Uuid::new_v4(),
            code_id: code.id,
            author: author.to_owned(),
            body: input.body,
            created_at: now,
        };
        self.chat.append_message(&message).await?;

        // Best-effort fan-out, one send per subscriber so each gets its
        // stored language. Failures are logged and swallowed.
        for sub in self.chat.list_subscribers(code.id).await? {
            let text = format!("{}:\n{}", message.author, message.body);
            if let Err(e) = self
                .mailer
                .send(
                    std::slice::from_ref(&sub.email),
                    notify_subject(&sub.lang),
                    &text,
                )
                .await
            {
                tracing::warn!(code_id = %code.id, to = %sub.email, error = %e,
                    "chat notification failed");
            }
        }

        Ok(message)
    }
}

// ── Subscribe ────────────────────────────────────────────────────────────────

pub struct SubscribeInput {
    pub code_id: CodeId,
    pub pin: String,
    pub email: String,
    pub lang: String,
}

pub struct SubscribeUseCase<C, T>
where
    C: CodeRepository,
    T: ChatRepository,
{
    pub codes: C,
    pub chat: T,
}

impl<C, T> SubscribeUseCase<C, T>
where
    C: CodeRepository,
    T: ChatRepository,
{
    pub async fn execute(&self, input: SubscribeInput) -> Result<(), GiftServiceError> {
        if !is_plausible_email(&input.email) {
            return Err(GiftServiceError::InvalidInput("invalid email address"));
        }

        let now = Utc::now();
        let code = load_code(&self.codes, input.code_id, now).await?;
        check_pin(&self.codes, &code, &input.pin, now).await?;

        let lang = if input.lang.trim().is_empty() {
            "en".to_owned()
        } else {
            input.lang
        };
        self.chat
            .upsert_subscriber(&ChatSubscriber {
                code_id: code.id,
                email: input.email,
                lang,
            })
            .await
    }
}
