/// Circle endpoints: search listing and CRUD
///
/// # Endpoints
///
/// - `GET /api/circles` - Search/list recruiting circles
/// - `POST /api/circles` - Register a circle
/// - `GET /api/circles/:id` - Fetch one circle with its images
/// - `PUT /api/circles/:id` - Partial update
/// - `DELETE /api/circles/:id` - Delete (cascades to images/members/reviews)
///
/// The listing composes optional filters with AND (free-text matching name
/// OR description inside one grouped criterion) and only ever returns
/// recruiting circles. Which search strategy runs depends on the query:
/// `lat`+`lng` select the geographic variant, `fulltext=true` the
/// relevance-ranked variant, anything else the substring default.

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use badfinder_shared::{
    models::{
        circle::{Circle, CreateCircle, UpdateCircle},
        image::Image,
    },
    search::{
        filter::CircleFilter, fulltext::FullTextSearch, geo::GeoSearch, SearchPage, SearchQuery,
        SearchStrategy, SubstringSearch,
    },
};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
    response::{created, ok},
};

/// Query parameters for the circle listing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCirclesQuery {
    /// 1-based page number (default 1)
    pub page: Option<i64>,

    /// Page size (default 10, max 100)
    pub limit: Option<i64>,

    /// Free-text term matched against name OR description
    pub search: Option<String>,

    /// Exact prefecture filter
    pub prefecture: Option<String>,

    /// Skill level tag filter
    pub skill_level: Option<String>,

    /// Latitude; with `lng`, selects the geographic strategy
    pub lat: Option<f64>,

    /// Longitude; with `lat`, selects the geographic strategy
    pub lng: Option<f64>,

    /// Search radius in kilometers (default 10)
    pub radius: Option<f64>,

    /// Select the relevance-ranked full-text strategy
    pub fulltext: Option<bool>,
}

/// A circle plus its image records, as returned by create/get
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CircleWithImages {
    /// The circle
    #[serde(flatten)]
    pub circle: Circle,

    /// Its images
    pub images: Vec<Image>,
}

/// Create circle request
///
/// `isRecruiting` is deliberately absent: new listings always start
/// recruiting, whatever the client sends.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCircleRequest {
    #[validate(length(min = 1, message = "Circle name is required"))]
    pub name: String,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,

    #[validate(length(min = 1, message = "Prefecture is required"))]
    pub prefecture: String,

    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,

    pub address: Option<String>,

    #[validate(length(min = 1, message = "Activity frequency is required"))]
    pub activity_frequency: String,

    #[validate(length(min = 1, message = "Select at least one activity day"))]
    pub activity_days: Vec<String>,

    #[validate(length(min = 1, message = "Select at least one activity time"))]
    pub activity_times: Vec<String>,

    #[validate(length(min = 1, message = "Select at least one skill level"))]
    pub skill_level: Vec<String>,

    #[validate(range(min = 0, message = "Fee must be zero or greater"))]
    pub fee: i32,

    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,

    pub website: Option<String>,

    pub social_links: Option<JsonValue>,
    pub facilities: Option<Vec<String>>,
    pub equipments: Option<Vec<String>>,
    pub age_groups: Option<Vec<String>>,
    pub gender_ratio: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<CreateCircleRequest> for CreateCircle {
    fn from(req: CreateCircleRequest) -> Self {
        CreateCircle {
            name: req.name,
            description: req.description,
            prefecture: req.prefecture,
            city: req.city,
            address: req.address,
            activity_frequency: req.activity_frequency,
            activity_days: req.activity_days,
            activity_times: req.activity_times,
            skill_level: req.skill_level,
            fee: req.fee,
            capacity: req.capacity,
            website: req.website,
            social_links: req.social_links,
            facilities: req.facilities,
            equipments: req.equipments,
            age_groups: req.age_groups,
            gender_ratio: req.gender_ratio,
            latitude: req.latitude,
            longitude: req.longitude,
        }
    }
}

/// Update circle request; every field optional
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCircleRequest {
    #[validate(length(min = 1, message = "Circle name is required"))]
    pub name: Option<String>,

    #[validate(length(min = 1, message = "Description is required"))]
    pub description: Option<String>,

    #[validate(length(min = 1, message = "Prefecture is required"))]
    pub prefecture: Option<String>,

    #[validate(length(min = 1, message = "City is required"))]
    pub city: Option<String>,

    pub address: Option<String>,

    #[validate(length(min = 1, message = "Activity frequency is required"))]
    pub activity_frequency: Option<String>,

    #[validate(length(min = 1, message = "Select at least one activity day"))]
    pub activity_days: Option<Vec<String>>,

    #[validate(length(min = 1, message = "Select at least one activity time"))]
    pub activity_times: Option<Vec<String>>,

    #[validate(length(min = 1, message = "Select at least one skill level"))]
    pub skill_level: Option<Vec<String>>,

    #[validate(range(min = 0, message = "Fee must be zero or greater"))]
    pub fee: Option<i32>,

    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: Option<i32>,

    pub is_recruiting: Option<bool>,

    pub website: Option<String>,

    pub social_links: Option<JsonValue>,
    pub facilities: Option<Vec<String>>,
    pub equipments: Option<Vec<String>>,
    pub age_groups: Option<Vec<String>>,
    pub gender_ratio: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl From<UpdateCircleRequest> for UpdateCircle {
    fn from(req: UpdateCircleRequest) -> Self {
        UpdateCircle {
            name: req.name,
            description: req.description,
            prefecture: req.prefecture,
            city: req.city,
            address: req.address,
            activity_frequency: req.activity_frequency,
            activity_days: req.activity_days,
            activity_times: req.activity_times,
            skill_level: req.skill_level,
            fee: req.fee,
            capacity: req.capacity,
            is_recruiting: req.is_recruiting,
            website: req.website,
            social_links: req.social_links,
            facilities: req.facilities,
            equipments: req.equipments,
            age_groups: req.age_groups,
            gender_ratio: req.gender_ratio,
            latitude: req.latitude,
            longitude: req.longitude,
        }
    }
}

/// Search/list recruiting circles
///
/// # Endpoint
///
/// ```text
/// GET /api/circles?search=バドミントン&prefecture=東京都&skillLevel=初心者&page=1&limit=10
/// ```
///
/// Every supplied criterion narrows the result; the free-text term matches
/// when name OR description contains it, case-insensitively. Results are
/// newest first (nearest first for the geographic variant) with
/// `pagination.pages = ceil(total / limit)`.
pub async fn list_circles(
    State(state): State<AppState>,
    Query(params): Query<ListCirclesQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = CircleFilter {
        search: params.search,
        prefecture: params.prefecture,
        skill_level: params.skill_level,
    };
    let query = SearchQuery::new(filter, params.page, params.limit);

    let page: SearchPage = if let (Some(lat), Some(lng)) = (params.lat, params.lng) {
        GeoSearch {
            latitude: lat,
            longitude: lng,
            radius_km: params.radius.unwrap_or(GeoSearch::DEFAULT_RADIUS_KM),
        }
        .search(&state.db, &query)
        .await?
    } else if params.fulltext.unwrap_or(false) {
        FullTextSearch.search(&state.db, &query).await?
    } else {
        SubstringSearch.search(&state.db, &query).await?
    };

    Ok(ok(page, "Circle list retrieved successfully"))
}

/// Register a new circle
///
/// # Endpoint
///
/// ```text
/// POST /api/circles
/// Content-Type: application/json
/// ```
///
/// # Errors
///
/// - `400 Bad Request`: validation failed (e.g. negative `fee` is rejected
///   with a `fee` entry in `errors`)
pub async fn create_circle(
    State(state): State<AppState>,
    Json(req): Json<CreateCircleRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let circle = Circle::create(&state.db, req.into()).await?;

    Ok(created(
        CircleWithImages {
            circle,
            images: Vec::new(),
        },
        "Circle created successfully",
    ))
}

/// Fetch one circle with its images
pub async fn get_circle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    let circle = Circle::find_by_id(&state.db, id)
        .await?
        .ok_or_else(circle_not_found)?;

    let images = Image::list_by_circle(&state.db, id).await?;

    Ok(ok(
        CircleWithImages { circle, images },
        "Circle retrieved successfully",
    ))
}

/// Update a circle
///
/// Only the fields present in the body change.
///
/// # Errors
///
/// - `400 Bad Request`: validation failed
/// - `404 Not Found`: no such circle
pub async fn update_circle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCircleRequest>,
) -> ApiResult<impl IntoResponse> {
    req.validate()?;

    let circle = Circle::update(&state.db, id, req.into())
        .await?
        .ok_or_else(circle_not_found)?;

    let images = Image::list_by_circle(&state.db, id).await?;

    Ok(ok(
        CircleWithImages { circle, images },
        "Circle updated successfully",
    ))
}

/// Delete a circle
///
/// Dependent images, members, and reviews are removed by the cascade.
///
/// # Errors
///
/// - `404 Not Found`: no such circle
pub async fn delete_circle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<impl IntoResponse> {
    if !Circle::delete(&state.db, id).await? {
        return Err(circle_not_found());
    }

    Ok(ok((), "Circle deleted successfully"))
}

pub(crate) fn circle_not_found() -> ApiError {
    ApiError::NotFound("Circle not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_request() -> CreateCircleRequest {
        CreateCircleRequest {
            name: "渋谷バドミントンクラブ".to_string(),
            description: "毎週楽しく活動しています".to_string(),
            prefecture: "東京都".to_string(),
            city: "渋谷区".to_string(),
            address: None,
            activity_frequency: "週2回".to_string(),
            activity_days: vec!["土".to_string()],
            activity_times: vec!["午前".to_string()],
            skill_level: vec!["初心者".to_string()],
            fee: 3000,
            capacity: None,
            website: None,
            social_links: None,
            facilities: None,
            equipments: None,
            age_groups: None,
            gender_ratio: None,
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn test_valid_create_request_passes() {
        assert!(valid_request().validate().is_ok());
    }

    #[test]
    fn test_negative_fee_is_rejected() {
        let req = CreateCircleRequest {
            fee: -100,
            ..valid_request()
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("fee"));
    }

    #[test]
    fn test_empty_skill_level_is_rejected() {
        let req = CreateCircleRequest {
            skill_level: vec![],
            ..valid_request()
        };

        let errors = req.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("skill_level"));
    }

    #[test]
    fn test_update_request_accepts_partial_body() {
        let req: UpdateCircleRequest =
            serde_json::from_value(serde_json::json!({ "fee": 5000 })).unwrap();

        assert!(req.validate().is_ok());
        assert_eq!(req.fee, Some(5000));
        assert!(req.name.is_none());
    }

    #[test]
    fn test_list_query_uses_camel_case_keys() {
        let query: ListCirclesQuery = serde_json::from_value(serde_json::json!({
            "search": "club",
            "skillLevel": "初心者",
            "page": 2
        }))
        .unwrap();

        assert_eq!(query.skill_level.as_deref(), Some("初心者"));
        assert_eq!(query.page, Some(2));
    }
}
