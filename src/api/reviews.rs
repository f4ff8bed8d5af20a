//! Review endpoints.

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::Deserialize;

use super::trails::trail_not_found;
use super::{parse_param, success, ApiResult};
use crate::errors::AppError;
use crate::models::{CreateReviewRequest, Review, ReviewSubmission, MIN_RATING};
use crate::reviews::DEFAULT_RECENT_LIMIT;
use crate::AppState;

const MAX_RECENT_LIMIT: usize = 50;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewListParams {
    pub min_rating: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RecentParams {
    pub limit: Option<String>,
}

/// GET /api/trails/:id/reviews - Reviews of a trail, most recent first.
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(trail_id): Path<i64>,
    Query(params): Query<ReviewListParams>,
) -> ApiResult<Vec<Review>> {
    ensure_trail(&state, trail_id).await?;
    let min_rating: u8 = parse_param("minRating", params.min_rating.as_deref())?.unwrap_or(MIN_RATING);

    let reviews = state.reviews.read().await;
    success(reviews.by_min_rating(trail_id, min_rating))
}

/// POST /api/trails/:id/reviews - Submit a review.
///
/// The trail's rating and review count are refreshed from the ledger before
/// the response is sent.
pub async fn add_review(
    State(state): State<AppState>,
    Path(trail_id): Path<i64>,
    body: Result<Json<CreateReviewRequest>, JsonRejection>,
) -> ApiResult<ReviewSubmission> {
    ensure_trail(&state, trail_id).await?;
    let Json(request) = body.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let mut reviews = state.reviews.write().await;
    let review = reviews.add(trail_id, &request)?;
    let average_rating = reviews.average_rating(trail_id);
    let review_count = reviews.count(trail_id);

    state
        .catalog
        .write()
        .await
        .apply_review_aggregate(trail_id, average_rating, review_count);

    if let Err(e) = state.repo.insert_review(&review).await {
        tracing::warn!("Failed to persist review {}: {}", review.id, e);
    }

    tracing::info!(
        "Review {} added to trail {} (now {} over {} reviews)",
        review.id,
        trail_id,
        average_rating,
        review_count
    );

    success(ReviewSubmission {
        review,
        average_rating,
        review_count,
    })
}

/// POST /api/trails/:id/reviews/:review_id/helpful - Increment the helpful
/// counter. An unknown review is a no-op answered with `null`.
pub async fn mark_helpful(
    State(state): State<AppState>,
    Path((trail_id, review_id)): Path<(i64, i64)>,
) -> ApiResult<Option<Review>> {
    let updated = state.reviews.write().await.mark_helpful(review_id, trail_id);

    if let Some(review) = &updated {
        if let Err(e) = state.repo.update_helpful(review.id, review.helpful).await {
            tracing::warn!("Failed to persist helpful count for review {}: {}", review.id, e);
        }
    }

    success(updated)
}

/// GET /api/reviews/recent - Newest reviews across all trails.
pub async fn recent_reviews(
    State(state): State<AppState>,
    Query(params): Query<RecentParams>,
) -> ApiResult<Vec<Review>> {
    let limit: usize = parse_param("limit", params.limit.as_deref())?
        .unwrap_or(DEFAULT_RECENT_LIMIT)
        .min(MAX_RECENT_LIMIT);

    success(state.reviews.read().await.recent(limit))
}

async fn ensure_trail(state: &AppState, trail_id: i64) -> Result<(), AppError> {
    if state.catalog.read().await.by_id(trail_id).is_none() {
        return Err(trail_not_found(trail_id));
    }
    Ok(())
}
