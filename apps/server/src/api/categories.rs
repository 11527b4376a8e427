use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use fintrack_core::{
    categories::{Category, CategoryUpdate, NewCategory},
    users::AuthenticatedUser,
};

use super::shared::{BulkDeleteRequest, BulkDeleteResponse, SearchParams};
use crate::{error::ApiResult, main_lib::AppState};

async fn list_categories(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Query(params): Query<SearchParams>,
) -> ApiResult<Json<Vec<Category>>> {
    let categories = state
        .category_service
        .list_categories(&user.id, params.search.as_deref())?;
    Ok(Json(categories))
}

async fn create_category(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(category): Json<NewCategory>,
) -> ApiResult<(StatusCode, Json<Category>)> {
    let created = state.category_service.create_category(&user.id, category).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn get_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<Json<Category>> {
    Ok(Json(state.category_service.get_category(&user.id, &id)?))
}

async fn update_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(update): Json<CategoryUpdate>,
) -> ApiResult<Json<Category>> {
    let updated = state
        .category_service
        .update_category(&user.id, &id, update)
        .await?;
    Ok(Json(updated))
}

async fn delete_category(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiResult<StatusCode> {
    state.category_service.delete_category(&user.id, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn bulk_delete_categories(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(body): Json<BulkDeleteRequest>,
) -> ApiResult<Json<BulkDeleteResponse>> {
    let deleted = state
        .category_service
        .delete_categories(&user.id, body.ids)
        .await?;
    Ok(Json(BulkDeleteResponse { deleted }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/bulk-delete", post(bulk_delete_categories))
        .route(
            "/categories/{id}",
            get(get_category).put(update_category).delete(delete_category),
        )
}
