//! Request handlers, one per assignment operation

use assigner_core::{AssignmentService, Team, TeamMember};
use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Deserialize)]
pub struct AddTeamRequest {
    #[serde(default)]
    pub team_name: String,
    #[serde(default)]
    pub members: Vec<TeamMember>,
}

#[derive(Debug, Deserialize)]
pub struct TeamQuery {
    pub team_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    #[serde(default)]
    pub user_id: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub user_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePrRequest {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default)]
    pub pull_request_name: String,
    #[serde(default)]
    pub author_id: String,
}

#[derive(Debug, Deserialize)]
pub struct MergePrRequest {
    #[serde(default)]
    pub pull_request_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ReassignRequest {
    #[serde(default)]
    pub pull_request_id: String,
    #[serde(default, alias = "old_user_id")]
    pub old_reviewer_id: String,
}

fn required(value: Option<String>, name: &str) -> ApiResult<String> {
    value
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::missing_parameter(name))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn add_team(
    State(service): State<AssignmentService>,
    payload: Result<Json<AddTeamRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(req) = payload?;
    if req.team_name.is_empty() {
        return Err(ApiError::missing_fields("team_name is"));
    }

    let team = service
        .create_team(Team::new(req.team_name, req.members))
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "team": team }))))
}

pub async fn get_team(
    State(service): State<AssignmentService>,
    Query(query): Query<TeamQuery>,
) -> ApiResult<Json<Value>> {
    let team_name = required(query.team_name, "team_name")?;
    let team = service.get_team(&team_name).await?;
    Ok(Json(json!({ "team": team })))
}

pub async fn set_user_active(
    State(service): State<AssignmentService>,
    payload: Result<Json<SetActiveRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    let is_active = match req.is_active {
        Some(flag) if !req.user_id.is_empty() => flag,
        _ => return Err(ApiError::missing_fields("user_id and is_active are")),
    };

    let user = service.set_user_active(&req.user_id, is_active).await?;
    Ok(Json(json!({ "user": user })))
}

pub async fn get_reviews(
    State(service): State<AssignmentService>,
    Query(query): Query<UserQuery>,
) -> ApiResult<Json<Value>> {
    let user_id = required(query.user_id, "user_id")?;
    let reviews = service.get_reviews_for_user(&user_id).await?;
    Ok(Json(json!(reviews)))
}

pub async fn create_pull_request(
    State(service): State<AssignmentService>,
    payload: Result<Json<CreatePrRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(req) = payload?;
    if req.pull_request_id.is_empty() || req.pull_request_name.is_empty() || req.author_id.is_empty()
    {
        return Err(ApiError::missing_fields(
            "pull_request_id, pull_request_name and author_id are",
        ));
    }

    let pr = service
        .create_pull_request(&req.pull_request_id, &req.pull_request_name, &req.author_id)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "pr": pr }))))
}

pub async fn merge_pull_request(
    State(service): State<AssignmentService>,
    payload: Result<Json<MergePrRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    if req.pull_request_id.is_empty() {
        return Err(ApiError::missing_fields("pull_request_id is"));
    }

    let pr = service.merge_pull_request(&req.pull_request_id).await?;
    Ok(Json(json!({ "pr": pr })))
}

pub async fn reassign_reviewer(
    State(service): State<AssignmentService>,
    payload: Result<Json<ReassignRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let Json(req) = payload?;
    if req.pull_request_id.is_empty() || req.old_reviewer_id.is_empty() {
        return Err(ApiError::missing_fields(
            "pull_request_id and old_reviewer_id are",
        ));
    }

    let reassignment = service
        .reassign_reviewer(&req.pull_request_id, &req.old_reviewer_id)
        .await?;
    Ok(Json(json!(reassignment)))
}

pub async fn stats(State(service): State<AssignmentService>) -> ApiResult<Json<Value>> {
    let stats = service.get_stats().await?;
    Ok(Json(json!({ "stats": stats })))
}
