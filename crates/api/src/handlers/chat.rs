//! Project chat and shot comments.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use filmcraft_core::chat::{
    author_label, filter_messages, require_author, unread_badge, unread_count, validate_content,
    MessageMetadata, MessageType, SEARCH_RESULT_LIMIT,
};
use filmcraft_core::collaboration::Permission;
use filmcraft_core::error::CoreError;
use filmcraft_core::types::DbId;
use filmcraft_db::models::comment::{CreateComment, ProjectComment};
use filmcraft_db::repositories::{ChatReadStatusRepo, CommentRepo, ShotRepo};
use filmcraft_events::ChangeTable;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::publish_change;
use crate::middleware::access::authorize_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// A message with its author label for the viewer.
#[derive(Debug, Serialize)]
pub struct MessageView {
    #[serde(flatten)]
    pub message: ProjectComment,
    pub author_label: String,
    pub is_own: bool,
}

impl MessageView {
    fn new(message: ProjectComment, viewer_id: DbId) -> Self {
        Self {
            author_label: author_label(&message, viewer_id),
            is_own: message.user_id == viewer_id,
            message,
        }
    }
}

/// Query for `GET /projects/{id}/messages`.
#[derive(Debug, Default, Deserialize)]
pub struct ListMessagesQuery {
    #[serde(rename = "type")]
    pub message_type: Option<String>,
    #[serde(default)]
    pub q: String,
}

/// Query for `GET /projects/{id}/messages/search`.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: String,
}

/// Request body for posting a message or comment.
#[derive(Debug, Deserialize)]
pub struct PostMessageRequest {
    pub content: String,
    #[serde(default)]
    pub message_type: Option<String>,
}

/// Request body for `PUT /messages/{id}`.
#[derive(Debug, Deserialize)]
pub struct EditMessageRequest {
    pub content: String,
}

/// Request body for `PUT /projects/{id}/messages/read`.
///
/// Without a message id the latest message is marked read.
#[derive(Debug, Default, Deserialize)]
pub struct MarkReadRequest {
    pub last_read_message_id: Option<DbId>,
}

/// The viewer's read position in a project's chat.
#[derive(Debug, Serialize)]
pub struct ReadStatusView {
    pub last_read_message_id: Option<DbId>,
    pub unread_count: usize,
    /// Display text for the unread badge; absent when nothing is unread.
    pub badge: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn gone(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Message",
        id,
    })
}

/// Load a message the caller wrote on a project they can still view.
async fn authorize_own_message(
    state: &AppState,
    user: &AuthUser,
    id: DbId,
) -> AppResult<ProjectComment> {
    let message = CommentRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| gone(id))?;
    authorize_project(&state.pool, user, message.project_id, Permission::View).await?;
    require_author(message.user_id, user.user_id)?;
    Ok(message)
}

fn parse_type(value: Option<&str>) -> AppResult<MessageType> {
    Ok(match value {
        Some(name) => MessageType::from_name(name)?,
        None => MessageType::General,
    })
}

fn read_status(
    messages: &[ProjectComment],
    last_read_message_id: Option<DbId>,
    user_id: DbId,
) -> ReadStatusView {
    let unread = unread_count(messages, last_read_message_id, user_id);
    ReadStatusView {
        last_read_message_id,
        unread_count: unread,
        badge: unread_badge(unread),
    }
}

async fn post(
    state: &AppState,
    user: &AuthUser,
    project_id: DbId,
    shot_id: Option<DbId>,
    input: PostMessageRequest,
) -> AppResult<ProjectComment> {
    let content = validate_content(&input.content)?.to_string();
    let message_type = parse_type(input.message_type.as_deref())?;

    let message = CommentRepo::create(
        &state.pool,
        &CreateComment {
            project_id,
            shot_id,
            user_id: user.user_id,
            content,
            message_type,
            metadata: MessageMetadata::new(&user.email, Utc::now()),
        },
    )
    .await?;
    tracing::debug!(message_id = message.id, project_id, ?shot_id, "Message posted");
    publish_change(state, project_id, ChangeTable::Comments, user);
    Ok(message)
}

// ---------------------------------------------------------------------------
// Project chat
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/messages?type=question&q=lens
///
/// Project-level chat, oldest first. `type` and `q` narrow the list.
pub async fn list(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Query(query): Query<ListMessagesQuery>,
) -> AppResult<Json<DataResponse<Vec<MessageView>>>> {
    authorize_project(&state.pool, &user, project_id, Permission::View).await?;
    let type_filter = match query.message_type.as_deref() {
        None | Some("") | Some("all") => None,
        Some(name) => Some(MessageType::from_name(name)?),
    };

    let messages = CommentRepo::list_project_chat(&state.pool, project_id).await?;
    let data = filter_messages(&messages, type_filter, &query.q)
        .into_iter()
        .map(|m| MessageView::new(m.clone(), user.user_id))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/projects/{id}/messages
pub async fn create(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<PostMessageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<MessageView>>)> {
    authorize_project(&state.pool, &user, project_id, Permission::View).await?;
    let message = post(&state, &user, project_id, None, input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MessageView::new(message, user.user_id),
        }),
    ))
}

/// GET /api/v1/projects/{id}/messages/search?q=
///
/// Newest matches first, capped at [`SEARCH_RESULT_LIMIT`].
pub async fn search(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<DataResponse<Vec<MessageView>>>> {
    authorize_project(&state.pool, &user, project_id, Permission::View).await?;
    let term = query.q.trim();
    if term.is_empty() {
        return Ok(Json(DataResponse { data: Vec::new() }));
    }

    let messages = CommentRepo::search(&state.pool, project_id, term, SEARCH_RESULT_LIMIT).await?;
    let data = messages
        .into_iter()
        .map(|m| MessageView::new(m, user.user_id))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// PUT /api/v1/messages/{id}
///
/// Authors may edit their own messages; the message is flagged as edited.
pub async fn edit(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<EditMessageRequest>,
) -> AppResult<Json<DataResponse<MessageView>>> {
    let message = authorize_own_message(&state, &user, id).await?;
    let content = validate_content(&input.content)?;

    let mut metadata = message.metadata.0;
    metadata.mark_edited(Utc::now());
    let message = CommentRepo::update_content(&state.pool, id, content, &metadata)
        .await?
        .ok_or_else(|| gone(id))?;
    publish_change(&state, message.project_id, ChangeTable::Comments, &user);
    Ok(Json(DataResponse {
        data: MessageView::new(message, user.user_id),
    }))
}

/// DELETE /api/v1/messages/{id}
pub async fn delete(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let message = authorize_own_message(&state, &user, id).await?;
    if !CommentRepo::delete(&state.pool, id).await? {
        return Err(gone(id));
    }
    publish_change(&state, message.project_id, ChangeTable::Comments, &user);
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Read status
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/messages/read
pub async fn get_read_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
) -> AppResult<Json<DataResponse<ReadStatusView>>> {
    authorize_project(&state.pool, &user, project_id, Permission::View).await?;
    let status = ChatReadStatusRepo::find(&state.pool, project_id, user.user_id).await?;
    let messages = CommentRepo::list_project_chat(&state.pool, project_id).await?;

    let last_read = status.and_then(|s| s.last_read_message_id);
    Ok(Json(DataResponse {
        data: read_status(&messages, last_read, user.user_id),
    }))
}

/// PUT /api/v1/projects/{id}/messages/read
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(project_id): Path<DbId>,
    Json(input): Json<MarkReadRequest>,
) -> AppResult<Json<DataResponse<ReadStatusView>>> {
    authorize_project(&state.pool, &user, project_id, Permission::View).await?;
    let messages = CommentRepo::list_project_chat(&state.pool, project_id).await?;

    let last_read = match input.last_read_message_id {
        Some(id) if !messages.iter().any(|m| m.id == id) => {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Message {id} is not part of this project's chat"
            ))))
        }
        Some(id) => Some(id),
        None => messages.last().map(|m| m.id),
    };

    let status = ChatReadStatusRepo::upsert(&state.pool, project_id, user.user_id, last_read).await?;
    Ok(Json(DataResponse {
        data: read_status(&messages, status.last_read_message_id, user.user_id),
    }))
}

// ---------------------------------------------------------------------------
// Shot comments
// ---------------------------------------------------------------------------

/// GET /api/v1/shots/{id}/comments
pub async fn list_shot_comments(
    State(state): State<AppState>,
    user: AuthUser,
    Path(shot_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<MessageView>>>> {
    let shot = ShotRepo::find_by_id(&state.pool, shot_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Shot",
            id: shot_id,
        }))?;
    authorize_project(&state.pool, &user, shot.project_id, Permission::View).await?;

    let comments = CommentRepo::list_for_shot(&state.pool, shot_id).await?;
    let data = comments
        .into_iter()
        .map(|m| MessageView::new(m, user.user_id))
        .collect();
    Ok(Json(DataResponse { data }))
}

/// POST /api/v1/shots/{id}/comments
pub async fn create_shot_comment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(shot_id): Path<DbId>,
    Json(input): Json<PostMessageRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<MessageView>>)> {
    let shot = ShotRepo::find_by_id(&state.pool, shot_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Shot",
            id: shot_id,
        }))?;
    authorize_project(&state.pool, &user, shot.project_id, Permission::View).await?;

    let comment = post(&state, &user, shot.project_id, Some(shot_id), input).await?;
    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: MessageView::new(comment, user.user_id),
        }),
    ))
}
