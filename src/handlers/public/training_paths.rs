use axum::extract::{rejection::PathRejection, Path, State};
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{
    TrainingPathGridRow, TrainingPathKatas, TrainingPathMetadata, TrainingPathSummary,
    TrainingPathWithKatas,
};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// GET /api/training-paths - enabled paths, without katas
pub async fn get_training_paths_without_katas(
    State(state): State<AppState>,
) -> ApiResult<Vec<TrainingPathSummary>> {
    let paths = state.training_paths.get_training_paths_without_katas().await?;
    Ok(ApiResponse::success(paths))
}

/// GET /api/training-paths/grid - all paths with kata counts, for the settings grid
pub async fn get_training_paths_for_grid(
    State(state): State<AppState>,
) -> ApiResult<Vec<TrainingPathGridRow>> {
    let rows = state.training_paths.get_training_paths_for_grid().await?;
    Ok(ApiResponse::success(rows))
}

/// GET /api/training-paths/topic/:topic - `data` is null when no enabled path matches
pub async fn get_training_path_by_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> ApiResult<Option<TrainingPathMetadata>> {
    let metadata = state.training_paths.get_training_path_by_topic(&topic).await?;
    Ok(ApiResponse::success(metadata))
}

/// GET /api/training-paths/:topic/katas
pub async fn get_katas_of_training_path_by_topic(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> ApiResult<TrainingPathWithKatas> {
    let path = state
        .training_paths
        .get_katas_of_training_path_by_topic(&topic)
        .await?;
    Ok(ApiResponse::success(path))
}

/// GET /api/katas/training-path/:id
pub async fn get_katas_by_training_path_id(
    State(state): State<AppState>,
    path_id: Result<Path<Uuid>, PathRejection>,
) -> ApiResult<Vec<TrainingPathKatas>> {
    let Path(path_id) = path_id.map_err(|_| ApiError::bad_request("Invalid training path id"))?;

    let paths = state
        .training_paths
        .get_katas_by_training_path_id(path_id)
        .await?;
    Ok(ApiResponse::success(paths))
}
