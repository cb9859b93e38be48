//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    domain::{GroupId, UserId},
    infrastructure::dto::{
        http::{
            CreateGroupRequest, CreateUserRequest, GroupDto, Pagination, PostMessageRequest,
            UserDto,
        },
        websocket::MessageDto,
    },
    ui::state::AppState,
};

use super::{error::ApiError, extract::CallerId};

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

pub async fn register_user(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserDto>), ApiError> {
    let user = state
        .register_user_usecase
        .execute(request.name, request.email)
        .await?;
    tracing::info!(user_id = %user.id, "Registered user");
    Ok((StatusCode::CREATED, Json(user.into())))
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Json<Vec<UserDto>> {
    let users = state
        .list_users_usecase
        .execute(page.skip, page.limit)
        .await;
    Json(users.into_iter().map(UserDto::from).collect())
}

pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> Result<Json<UserDto>, ApiError> {
    let user_id = UserId::new(user_id)?;
    let user = state.get_user_usecase.execute(&user_id).await?;
    Ok(Json(user.into()))
}

/// Create a group; the caller becomes its admin and first member.
pub async fn create_group(
    State(state): State<Arc<AppState>>,
    CallerId(admin_id): CallerId,
    Json(request): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<GroupDto>), ApiError> {
    let group = state
        .create_group_usecase
        .execute(
            &admin_id,
            request.name,
            request.description,
            request.max_members,
        )
        .await?;
    tracing::info!(group_id = %group.id, admin_id = %admin_id, "Created group");
    Ok((StatusCode::CREATED, Json(group.into())))
}

pub async fn list_groups(
    State(state): State<Arc<AppState>>,
    Query(page): Query<Pagination>,
) -> Json<Vec<GroupDto>> {
    let groups = state
        .list_groups_usecase
        .execute(page.skip, page.limit)
        .await;
    Json(groups.into_iter().map(GroupDto::from).collect())
}

pub async fn join_group(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
    Path(group_id): Path<String>,
) -> Result<Json<GroupDto>, ApiError> {
    let group_id = GroupId::new(group_id)?;
    let group = state
        .join_group_usecase
        .execute(&group_id, &user_id)
        .await?;
    tracing::info!(group_id = %group_id, user_id = %user_id, "User joined group");
    Ok(Json(group.into()))
}

/// Stored history of a group, oldest first.
pub async fn get_group_messages(
    State(state): State<Arc<AppState>>,
    Path(group_id): Path<String>,
) -> Result<Json<Vec<MessageDto>>, ApiError> {
    let group_id = GroupId::new(group_id)?;
    let messages = state.get_history_usecase.execute(&group_id).await?;
    Ok(Json(messages.iter().map(MessageDto::from).collect()))
}

/// Post a message without holding a live connection.
///
/// Goes through the same path as live submissions, so attached
/// connections of the group receive it as a `message` frame.
pub async fn post_group_message(
    State(state): State<Arc<AppState>>,
    CallerId(user_id): CallerId,
    Path(group_id): Path<String>,
    Json(request): Json<PostMessageRequest>,
) -> Result<(StatusCode, Json<MessageDto>), ApiError> {
    let group_id = GroupId::new(group_id)?;
    let message = state
        .submit_message_usecase
        .execute(&group_id, &user_id, request.message)
        .await?;
    Ok((StatusCode::CREATED, Json(message.into())))
}
