use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use model::entities::{prelude::*, property, review, user};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};

use crate::auth;
use crate::error::{ApiError, ApiResult};
use crate::handlers::properties::page_params;
use crate::helpers::ratings::{self, UserReviewStats};
use crate::schemas::AppState;

const DEFAULT_PER_PAGE: u64 = 12;
const MIN_REVIEW_TEXT_CHARS: usize = 50;

#[derive(Debug, Deserialize, IntoParams)]
pub struct ReviewListQuery {
    /// 1-indexed page number.
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Filter on the reviewer's campus. "all" disables the filter.
    pub university: Option<String>,
    /// Keep only reviews with at least this overall rating.
    pub min_rating: Option<i32>,
    /// Case-insensitive substring match on property name or review text.
    pub search: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewResponse {
    pub id: i32,
    pub property_id: i32,
    pub property_name: String,
    pub overall_rating: i32,
    pub value_rating: Option<i32>,
    pub location_rating: Option<i32>,
    pub safety_rating: Option<i32>,
    pub cleanliness_rating: Option<i32>,
    pub management_rating: Option<i32>,
    pub facilities_rating: Option<i32>,
    pub review_text: String,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub recommend: bool,
    pub anonymous: bool,
    pub helpful_count: i32,
    pub author: String,
    pub author_year: Option<String>,
    pub author_university: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

/// Builds the public view of a review. Anonymous reviews hide the author's
/// name and study year but keep the campus for context.
pub fn review_response(
    model: review::Model,
    author: Option<&user::Model>,
    property_name: &str,
) -> ReviewResponse {
    let (author_name, author_year) = if model.anonymous {
        ("Anonymous".to_string(), None)
    } else {
        match author {
            Some(user) => (user.name.clone(), user.year_of_study.clone()),
            None => ("Anonymous".to_string(), None),
        }
    };
    ReviewResponse {
        id: model.id,
        property_id: model.property_id,
        property_name: property_name.to_string(),
        overall_rating: model.overall_rating,
        value_rating: model.value_rating,
        location_rating: model.location_rating,
        safety_rating: model.safety_rating,
        cleanliness_rating: model.cleanliness_rating,
        management_rating: model.management_rating,
        facilities_rating: model.facilities_rating,
        review_text: model.review_text,
        pros: model.pros,
        cons: model.cons,
        recommend: model.recommend,
        anonymous: model.anonymous,
        helpful_count: model.helpful_count,
        author: author_name,
        author_year,
        author_university: author.map(|user| user.university.clone()),
        created_at: model.created_at,
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewResponse>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyRef {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyReviewListResponse {
    pub property: PropertyRef,
    pub reviews: Vec<ReviewResponse>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub overall_rating: Option<i32>,
    pub value_rating: Option<i32>,
    pub location_rating: Option<i32>,
    pub safety_rating: Option<i32>,
    pub cleanliness_rating: Option<i32>,
    pub management_rating: Option<i32>,
    pub facilities_rating: Option<i32>,
    pub review_text: Option<String>,
    pub pros: Option<String>,
    pub cons: Option<String>,
    pub recommend: Option<bool>,
    pub anonymous: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CreateReviewResponse {
    pub message: String,
    pub review: ReviewResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HelpfulResponse {
    pub message: String,
    pub helpful_count: i32,
}

/// Sub-ratings at zero or below mean "not rated" and are stored as absent.
/// Values above five are rejected.
fn normalize_sub_rating(name: &str, value: Option<i32>) -> ApiResult<Option<i32>> {
    match value {
        None => Ok(None),
        Some(v) if v <= 0 => Ok(None),
        Some(v) if v <= 5 => Ok(Some(v)),
        Some(v) => Err(ApiError::Validation(format!(
            "{} must be between 1 and 5, got {}",
            name, v
        ))),
    }
}

async fn batch_context(
    state: &AppState,
    reviews: &[review::Model],
) -> ApiResult<(HashMap<i32, user::Model>, HashMap<i32, String>)> {
    let user_ids: Vec<i32> = reviews.iter().map(|r| r.user_id).collect();
    let property_ids: Vec<i32> = reviews.iter().map(|r| r.property_id).collect();

    let users: HashMap<i32, user::Model> = if user_ids.is_empty() {
        HashMap::new()
    } else {
        User::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|u| (u.id, u))
            .collect()
    };
    let property_names: HashMap<i32, String> = if property_ids.is_empty() {
        HashMap::new()
    } else {
        Property::find()
            .filter(property::Column::Id.is_in(property_ids))
            .all(&state.db)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect()
    };
    Ok((users, property_names))
}

/// List reviews across all approved properties.
#[utoipa::path(
    get,
    path = "/api/reviews",
    params(ReviewListQuery),
    responses(
        (status = 200, description = "Paginated review listing", body = ReviewListResponse)
    ),
    tag = "reviews"
)]
#[instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Query(params): Query<ReviewListQuery>,
) -> ApiResult<Json<ReviewListResponse>> {
    trace!("Listing reviews");
    let (page, per_page) = page_params(params.page, params.per_page, DEFAULT_PER_PAGE);

    let mut query = Review::find()
        .join(JoinType::InnerJoin, review::Relation::Property.def())
        .filter(property::Column::Approved.eq(true));

    if let Some(university) = params
        .university
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
    {
        query = query
            .join(JoinType::InnerJoin, review::Relation::User.def())
            .filter(user::Column::University.eq(university.to_lowercase()));
    }
    if let Some(min_rating) = params.min_rating {
        query = query.filter(review::Column::OverallRating.gte(min_rating));
    }
    if let Some(search) = params.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let pattern = format!("%{}%", search.to_lowercase());
        query = query.filter(
            Condition::any()
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        property::Entity,
                        property::Column::Name,
                    ))))
                    .like(pattern.clone()),
                )
                .add(
                    Expr::expr(Func::lower(Expr::col((
                        review::Entity,
                        review::Column::ReviewText,
                    ))))
                    .like(pattern),
                ),
        );
    }

    let paginator = query
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id)
        .paginate(&state.db, per_page);
    let sea_orm::ItemsAndPagesNumber { number_of_items: total, number_of_pages: total_pages } = paginator.num_items_and_pages().await?;
    let models = paginator.fetch_page(page - 1).await?;
    debug!("Found {} reviews on page {} of {}", models.len(), page, total_pages);

    let (users, property_names) = batch_context(&state, &models).await?;
    let reviews = models
        .into_iter()
        .map(|model| {
            let author = users.get(&model.user_id);
            let name = property_names
                .get(&model.property_id)
                .map(String::as_str)
                .unwrap_or("Unknown Property");
            review_response(model, author, name)
        })
        .collect();

    Ok(Json(ReviewListResponse {
        reviews,
        total,
        total_pages,
        current_page: page,
    }))
}

/// List reviews for one property.
#[utoipa::path(
    get,
    path = "/api/reviews/property/{property_id}",
    params(
        ("property_id" = i32, Path, description = "Property ID"),
        PageQuery
    ),
    responses(
        (status = 200, description = "Reviews for the property", body = PropertyReviewListResponse),
        (status = 404, description = "Property not found", body = crate::error::ErrorResponse)
    ),
    tag = "reviews"
)]
#[instrument(skip(state))]
pub async fn list_property_reviews(
    State(state): State<AppState>,
    Path(property_id): Path<i32>,
    Query(params): Query<PageQuery>,
) -> ApiResult<Json<PropertyReviewListResponse>> {
    trace!("Listing reviews for property {}", property_id);
    let property_model = Property::find_by_id(property_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    let (page, per_page) = page_params(params.page, params.per_page, DEFAULT_PER_PAGE);
    let paginator = Review::find()
        .filter(review::Column::PropertyId.eq(property_id))
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id)
        .paginate(&state.db, per_page);
    let sea_orm::ItemsAndPagesNumber { number_of_items: total, number_of_pages: total_pages } = paginator.num_items_and_pages().await?;
    let models = paginator.fetch_page(page - 1).await?;

    let (users, _) = batch_context(&state, &models).await?;
    let reviews = models
        .into_iter()
        .map(|model| {
            let author = users.get(&model.user_id);
            review_response(model, author, &property_model.name)
        })
        .collect();

    Ok(Json(PropertyReviewListResponse {
        property: PropertyRef {
            id: property_model.id,
            name: property_model.name,
        },
        reviews,
        total,
        total_pages,
        current_page: page,
    }))
}

/// Submit a review for a property. One review per user per property.
#[utoipa::path(
    post,
    path = "/api/reviews/property/{property_id}",
    params(
        ("property_id" = i32, Path, description = "Property ID")
    ),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = CreateReviewResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Property not found", body = crate::error::ErrorResponse),
        (status = 409, description = "Already reviewed", body = crate::error::ErrorResponse)
    ),
    tag = "reviews"
)]
#[instrument(skip(state, headers, payload))]
pub async fn create_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(property_id): Path<i32>,
    Json(payload): Json<CreateReviewRequest>,
) -> ApiResult<(axum::http::StatusCode, Json<CreateReviewResponse>)> {
    let author = auth::current_user(&state, &headers).await?;
    trace!("User {} submitting review for property {}", author.id, property_id);

    let property_model = Property::find_by_id(property_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    // A repeat submission is a conflict regardless of what else is wrong
    // with the body.
    let already_reviewed = Review::find()
        .filter(review::Column::UserId.eq(author.id))
        .filter(review::Column::PropertyId.eq(property_id))
        .one(&state.db)
        .await?
        .is_some();
    if already_reviewed {
        return Err(ApiError::Conflict(
            "You have already reviewed this property".to_string(),
        ));
    }

    let overall_rating = payload
        .overall_rating
        .ok_or_else(|| ApiError::Validation("Overall rating is required".to_string()))?;
    if !(1..=5).contains(&overall_rating) {
        return Err(ApiError::Validation(
            "Overall rating must be between 1 and 5".to_string(),
        ));
    }

    let review_text = payload
        .review_text
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if review_text.chars().count() < MIN_REVIEW_TEXT_CHARS {
        return Err(ApiError::Validation(format!(
            "Review text must be at least {} characters",
            MIN_REVIEW_TEXT_CHARS
        )));
    }

    let recommend = payload
        .recommend
        .ok_or_else(|| ApiError::Validation("Recommendation is required".to_string()))?;

    let now = Utc::now().naive_utc();
    let active = review::ActiveModel {
        user_id: Set(author.id),
        property_id: Set(property_id),
        overall_rating: Set(overall_rating),
        value_rating: Set(normalize_sub_rating("Value rating", payload.value_rating)?),
        location_rating: Set(normalize_sub_rating("Location rating", payload.location_rating)?),
        safety_rating: Set(normalize_sub_rating("Safety rating", payload.safety_rating)?),
        cleanliness_rating: Set(normalize_sub_rating(
            "Cleanliness rating",
            payload.cleanliness_rating,
        )?),
        management_rating: Set(normalize_sub_rating(
            "Management rating",
            payload.management_rating,
        )?),
        facilities_rating: Set(normalize_sub_rating(
            "Facilities rating",
            payload.facilities_rating,
        )?),
        review_text: Set(review_text),
        pros: Set(payload.pros),
        cons: Set(payload.cons),
        recommend: Set(recommend),
        anonymous: Set(payload.anonymous.unwrap_or(false)),
        helpful_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };

    // The unique index on (user, property) closes the race the pre-check
    // leaves open.
    let model = active.insert(&state.db).await.map_err(|e| {
        ApiError::from_insert_error(e, "You have already reviewed this property")
    })?;
    info!("User {} reviewed property {}", author.id, property_id);

    let review = review_response(model, Some(&author), &property_model.name);
    Ok((
        axum::http::StatusCode::CREATED,
        Json(CreateReviewResponse {
            message: "Review submitted successfully.".to_string(),
            review,
        }),
    ))
}

/// Mark a review as helpful.
#[utoipa::path(
    post,
    path = "/api/reviews/{review_id}/helpful",
    params(
        ("review_id" = i32, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Helpful count incremented", body = HelpfulResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 404, description = "Review not found", body = crate::error::ErrorResponse)
    ),
    tag = "reviews"
)]
#[instrument(skip(state, headers))]
pub async fn mark_review_helpful(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(review_id): Path<i32>,
) -> ApiResult<Json<HelpfulResponse>> {
    let user = auth::current_user(&state, &headers).await?;
    trace!("User {} marking review {} helpful", user.id, review_id);

    // Atomic increment; avoids read-modify-write races between voters.
    let result = Review::update_many()
        .col_expr(
            review::Column::HelpfulCount,
            Expr::col(review::Column::HelpfulCount).add(1),
        )
        .filter(review::Column::Id.eq(review_id))
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound("Review not found".to_string()));
    }

    let model = Review::find_by_id(review_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Review not found".to_string()))?;

    Ok(Json(HelpfulResponse {
        message: "Marked as helpful".to_string(),
        helpful_count: model.helpful_count,
    }))
}

/// Review statistics for the authenticated user.
#[utoipa::path(
    get,
    path = "/api/reviews/user/stats",
    responses(
        (status = 200, description = "Aggregated review activity", body = UserReviewStats),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse)
    ),
    tag = "reviews"
)]
#[instrument(skip(state, headers))]
pub async fn user_review_stats(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<UserReviewStats>> {
    let user = auth::current_user(&state, &headers).await?;
    let stats = ratings::user_review_stats(&state.db, user.id).await?;
    Ok(Json(stats))
}
