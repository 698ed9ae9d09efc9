//! Chat endpoints. PIN-gated like the other recipient routes; listing
//! takes the PIN in a POST body so it never lands in access logs.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::types::ChatMessage;
use crate::error::GiftServiceError;
use crate::state::AppState;
use crate::usecase::chat::{
    ListMessagesInput, ListMessagesUseCase, PostMessageInput, PostMessageUseCase, SubscribeInput,
    SubscribeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub author: String,
    pub body: String,
    #[serde(serialize_with = "giftcode_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ChatMessage> for MessageResponse {
    fn from(message: ChatMessage) -> Self {
        Self {
            id: message.id,
            author: message.author,
            body: message.body,
            created_at: message.created_at,
        }
    }
}

// ── POST /codes/{id}/messages/list ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct ListMessagesRequest {
    pub pin: String,
}

pub async fn list_messages(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ListMessagesRequest>,
) -> Result<Json<Vec<MessageResponse>>, GiftServiceError> {
    let uc = ListMessagesUseCase {
        codes: state.code_repo(),
        chat: state.chat_repo(),
    };
    let messages = uc
        .execute(ListMessagesInput {
            code_id: id.into(),
            pin: body.pin,
        })
        .await?;
    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

// ── POST /codes/{id}/messages ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct PostMessageRequest {
    pub pin: String,
    pub author: String,
    pub body: String,
}

pub async fn post_message(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), GiftServiceError> {
    let uc = PostMessageUseCase {
        codes: state.code_repo(),
        chat: state.chat_repo(),
        mailer: state.mailer(),
    };
    let message = uc
        .execute(PostMessageInput {
            code_id: id.into(),
            pin: body.pin,
            author: body.author,
            body: body.body,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}

// ── POST /codes/{id}/subscriptions ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct SubscribeRequest {
    pub pin: String,
    pub email: String,
    #[serde(default)]
    pub lang: String,
}

pub async fn subscribe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SubscribeRequest>,
) -> Result<StatusCode, GiftServiceError> {
    let uc = SubscribeUseCase {
        codes: state.code_repo(),
        chat: state.chat_repo(),
    };
    uc.execute(SubscribeInput {
        code_id: id.into(),
        pin: body.pin,
        email: body.email,
        lang: body.lang,
    })
    .await?;
    Ok(StatusCode::NO_CONTENT)
}
