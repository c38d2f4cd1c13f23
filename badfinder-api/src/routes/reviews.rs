/// Circle review endpoints
///
/// # Endpoints
///
/// - `GET /api/circles/:id/reviews` - List a circle's reviews, newest first
/// - `POST /api/circles/:id/reviews` - Post a review (requires session)
///
/// After every review write the circle's `averageRating`/`reviewCount`
/// aggregate is recomputed so it always equals the aggregate over the
/// review rows.

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use badfinder_shared::models::{
    circle::Circle,
    review::{CreateReview, Review},
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::ApiResult,
    middleware::auth::CurrentUser,
    response::{created, ok},
    routes::circles::circle_not_found,
};

/// Create review request
#[derive(Debug, Deserialize, Validate)]
pub struct CreateReviewRequest {
    /// Rating, 1-5
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: i32,

    /// Review text
    #[validate(length(min = 1, message = "Comment is required"))]
    pub comment: String,
}

/// Post a review for a circle
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `401 Unauthorized`: no valid session
/// - `404 Not Found`: no such circle
pub async fn create_review(
    State(state): State<AppState>,
    Path(circle_id): Path<Uuid>,
    user: CurrentUser,
    Json(req): Json<CreateReviewRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    if Circle::find_by_id(&state.db, circle_id).await?.is_none() {
        return Err(circle_not_found());
    }

    let review = Review::create(
        &state.db,
        CreateReview {
            circle_id,
            user_id: user.user_id,
            rating: req.rating,
            comment: req.comment,
        },
    )
    .await?;

    Circle::refresh_rating(&state.db, circle_id).await?;

    Ok(created(review, "Review posted successfully"))
}

/// List a circle's reviews, newest first
///
/// # Errors
///
/// - `404 Not Found`: no such circle
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(circle_id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if Circle::find_by_id(&state.db, circle_id).await?.is_none() {
        return Err(circle_not_found());
    }

    let reviews = Review::list_by_circle(&state.db, circle_id).await?;

    Ok(ok(reviews, "Reviews retrieved successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        let valid = CreateReviewRequest {
            rating: 5,
            comment: "とても楽しいサークルです".to_string(),
        };
        assert!(valid.validate().is_ok());

        for rating in [0, 6, -1] {
            let req = CreateReviewRequest {
                rating,
                comment: "x".to_string(),
            };
            let errors = req.validate().unwrap_err();
            assert!(errors.field_errors().contains_key("rating"));
        }
    }

    #[test]
    fn test_empty_comment_is_rejected() {
        let req = CreateReviewRequest {
            rating: 3,
            comment: String::new(),
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("comment"));
    }
}
