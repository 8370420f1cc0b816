use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use uuid::Uuid;
use validator::Validate;

use crate::{
    error::Result,
    extract::{AppJson, AppPath},
    message::{
        message_dto::{
            AckResponse, ConversationRow, SendMessageRequest, SendMessageResponse,
            UnreadCountResponse,
        },
        message_models::ThreadMessage,
    },
    middleware::AuthUser,
    state::AppState,
};

/// Send a message to another user
#[utoipa::path(
    post,
    path = "/api/messages",
    tag = "messages",
    request_body = SendMessageRequest,
    responses(
        (status = 201, description = "Message sent successfully", body = SendMessageResponse),
        (status = 400, description = "Receiver or message missing"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Receiver not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn send_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppJson(payload): AppJson<SendMessageRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let message = state
        .message_service
        .send_message(
            user_id,
            payload.receiver_id,
            payload.message.as_deref().unwrap_or_default(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(SendMessageResponse::from(message))))
}

/// Get the thread with another user, oldest message first.
///
/// Messages the other user sent to the caller are marked as read.
#[utoipa::path(
    get,
    path = "/api/messages/{id}",
    tag = "messages",
    params(
        ("id" = Uuid, Path, description = "Counterpart user ID")
    ),
    responses(
        (status = 200, description = "Thread messages", body = Vec<ThreadMessage>),
        (status = 400, description = "Malformed user ID"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_thread(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(counterpart_id): AppPath<Uuid>,
) -> Result<impl IntoResponse> {
    let messages = state
        .message_service
        .fetch_thread(user_id, counterpart_id)
        .await?;

    Ok((StatusCode::OK, Json(messages)))
}

/// Get all conversations for the authenticated user
#[utoipa::path(
    get,
    path = "/api/messages/conversations",
    tag = "messages",
    responses(
        (status = 200, description = "Conversations, most recent first", body = Vec<ConversationRow>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_conversations(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let conversations = state.message_service.list_conversations(user_id).await?;

    Ok((StatusCode::OK, Json(conversations)))
}

/// Number of unread messages addressed to the authenticated user
#[utoipa::path(
    get,
    path = "/api/messages/unread",
    tag = "messages",
    responses(
        (status = 200, description = "Unread message count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_unread_count(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<impl IntoResponse> {
    let count = state.message_service.unread_count(user_id).await?;

    Ok((StatusCode::OK, Json(UnreadCountResponse { count })))
}

/// Delete a message sent by the authenticated user
#[utoipa::path(
    delete,
    path = "/api/messages/{id}",
    tag = "messages",
    params(
        ("id" = i64, Path, description = "Message ID to delete")
    ),
    responses(
        (status = 200, description = "Message deleted", body = AckResponse),
        (status = 400, description = "Malformed message ID"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the sender"),
        (status = 404, description = "Message not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_message(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    AppPath(message_id): AppPath<i64>,
) -> Result<impl IntoResponse> {
    state
        .message_service
        .delete_message(user_id, message_id)
        .await?;

    Ok((
        StatusCode::OK,
        Json(AckResponse {
            message: "Message deleted successfully".to_string(),
        }),
    ))
}
