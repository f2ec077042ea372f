use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use chrono::Utc;
use model::entities::{prelude::*, property, property_image, property_university, review, user};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, trace};
use utoipa::{IntoParams, ToSchema};

use crate::auth;
use crate::error::{ApiError, ApiResult};
use crate::handlers::auth::UserResponse;
use crate::handlers::properties::{
    page_params, property_images_map, PropertyResponse,
};
use crate::handlers::reviews::{review_response, ReviewResponse};
use crate::helpers::ratings;
use crate::schemas::AppState;

const DEFAULT_PER_PAGE: u64 = 12;
const DASHBOARD_RECENT_LIMIT: u64 = 12;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ImageInput {
    pub image_url: Option<String>,
    pub caption: Option<String>,
    pub is_primary: Option<bool>,
}

/// Body for creating or partially updating a property.
#[derive(Debug, Deserialize, ToSchema)]
pub struct PropertyInput {
    pub name: Option<String>,
    pub address: Option<String>,
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub price_min: Option<i32>,
    pub price_max: Option<i32>,
    pub description: Option<String>,
    pub amenities: Option<Vec<String>>,
    pub contact_info: Option<String>,
    /// Display string, e.g. "wits" or "wits & uj".
    pub university: Option<String>,
    pub nsfas_accredited: Option<bool>,
    pub approved: Option<bool>,
    pub images: Option<Vec<ImageInput>>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AdminPropertyListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// One of "all", "approved", "pending".
    pub status: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminPropertyResponse {
    pub message: String,
    pub property: PropertyResponse,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DashboardResponse {
    pub total_properties: u64,
    pub approved_properties: u64,
    pub pending_properties: u64,
    pub total_users: u64,
    pub verified_users: u64,
    pub total_reviews: u64,
    pub recent_properties: Vec<PropertyResponse>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminUserListResponse {
    pub users: Vec<UserResponse>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

/// Review with reviewer identity attached; the anonymity contract does not
/// apply to moderation views.
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminReviewResponse {
    #[serde(flatten)]
    pub review: ReviewResponse,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminReviewListResponse {
    pub reviews: Vec<AdminReviewResponse>,
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MessageOnly {
    pub message: String,
}

fn required_field<'a>(value: &'a Option<String>, field: &str) -> ApiResult<&'a str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ApiError::Validation(format!("{} is required", field)))
}

fn validate_prices(price_min: i32, price_max: i32) -> ApiResult<()> {
    if price_min < 0 {
        return Err(ApiError::Validation(
            "Minimum price cannot be negative".to_string(),
        ));
    }
    if price_max < price_min {
        return Err(ApiError::Validation(
            "Maximum price must be at least the minimum price".to_string(),
        ));
    }
    Ok(())
}

fn encode_amenities(amenities: &Option<Vec<String>>) -> ApiResult<Option<String>> {
    match amenities {
        None => Ok(None),
        Some(list) => serde_json::to_string(list)
            .map(Some)
            .map_err(|e| ApiError::Internal(format!("Failed to encode amenities: {}", e))),
    }
}

/// Replaces the campus membership rows derived from the display string.
async fn rewrite_affiliations(
    txn: &DatabaseTransaction,
    property_id: i32,
    university: &str,
) -> ApiResult<()> {
    PropertyUniversity::delete_many()
        .filter(property_university::Column::PropertyId.eq(property_id))
        .exec(txn)
        .await?;
    for campus in property::affiliations(university) {
        property_university::ActiveModel {
            property_id: Set(property_id),
            university: Set(campus),
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

async fn replace_images(
    txn: &DatabaseTransaction,
    property_id: i32,
    images: &[ImageInput],
) -> ApiResult<()> {
    PropertyImage::delete_many()
        .filter(property_image::Column::PropertyId.eq(property_id))
        .exec(txn)
        .await?;
    for image in images {
        let image_url = required_field(&image.image_url, "Image URL")?;
        property_image::ActiveModel {
            property_id: Set(property_id),
            image_url: Set(image_url.to_string()),
            caption: Set(image.caption.clone()),
            is_primary: Set(image.is_primary.unwrap_or(false)),
            created_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        }
        .insert(txn)
        .await?;
    }
    Ok(())
}

async fn decorated_property(
    state: &AppState,
    model: property::Model,
) -> ApiResult<PropertyResponse> {
    let summaries = ratings::rating_summaries(&state.db, &[model.id]).await?;
    let summary = summaries.get(&model.id).copied().unwrap_or_default();
    let mut images = property_images_map(&state.db, &[model.id]).await?;
    let model_images = images.remove(&model.id).unwrap_or_default();
    Ok(PropertyResponse::from_model(model, summary, model_images))
}

/// Admin dashboard counters and recent listings.
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Platform counters", body = DashboardResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    ),
    tag = "admin"
)]
#[instrument(skip(state, headers))]
pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Json<DashboardResponse>> {
    auth::require_admin(&state, &headers).await?;
    trace!("Building admin dashboard");

    let total_properties = Property::find().count(&state.db).await?;
    let approved_properties = Property::find()
        .filter(property::Column::Approved.eq(true))
        .count(&state.db)
        .await?;
    let total_users = User::find()
        .filter(user::Column::IsAdmin.eq(false))
        .count(&state.db)
        .await?;
    let verified_users = User::find()
        .filter(user::Column::IsAdmin.eq(false))
        .filter(user::Column::Verified.eq(true))
        .count(&state.db)
        .await?;
    let total_reviews = Review::find().count(&state.db).await?;

    let recent = Property::find()
        .order_by_desc(property::Column::CreatedAt)
        .order_by_desc(property::Column::Id)
        .paginate(&state.db, DASHBOARD_RECENT_LIMIT)
        .fetch_page(0)
        .await?;
    let property_ids: Vec<i32> = recent.iter().map(|p| p.id).collect();
    let summaries = ratings::rating_summaries(&state.db, &property_ids).await?;
    let mut images = property_images_map(&state.db, &property_ids).await?;
    let recent_properties = recent
        .into_iter()
        .map(|model| {
            let summary = summaries.get(&model.id).copied().unwrap_or_default();
            let model_images = images.remove(&model.id).unwrap_or_default();
            PropertyResponse::from_model(model, summary, model_images)
        })
        .collect();

    Ok(Json(DashboardResponse {
        total_properties,
        approved_properties,
        pending_properties: total_properties - approved_properties,
        total_users,
        verified_users,
        total_reviews,
        recent_properties,
    }))
}

/// List properties for moderation, including unapproved ones.
#[utoipa::path(
    get,
    path = "/api/admin/properties",
    params(AdminPropertyListQuery),
    responses(
        (status = 200, description = "Paginated property listing", body = crate::handlers::properties::PropertyListResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    ),
    tag = "admin"
)]
#[instrument(skip(state, headers))]
pub async fn admin_list_properties(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<AdminPropertyListQuery>,
) -> ApiResult<Json<crate::handlers::properties::PropertyListResponse>> {
    auth::require_admin(&state, &headers).await?;
    let (page, per_page) = page_params(params.page, params.per_page, DEFAULT_PER_PAGE);

    let mut query = Property::find();
    match params.status.as_deref().map(str::trim) {
        Some("approved") => query = query.filter(property::Column::Approved.eq(true)),
        Some("pending") => query = query.filter(property::Column::Approved.eq(false)),
        Some("all") | None | Some("") => {}
        Some(other) => {
            return Err(ApiError::Validation(format!(
                "Unknown status filter: {}",
                other
            )));
        }
    }

    let paginator = query
        .order_by_desc(property::Column::CreatedAt)
        .order_by_desc(property::Column::Id)
        .paginate(&state.db, per_page);
    let sea_orm::ItemsAndPagesNumber { number_of_items: total, number_of_pages: pages } = paginator.num_items_and_pages().await?;
    let models = paginator.fetch_page(page - 1).await?;
    debug!("Admin listing returned {} properties", models.len());

    let property_ids: Vec<i32> = models.iter().map(|p| p.id).collect();
    let summaries = ratings::rating_summaries(&state.db, &property_ids).await?;
    let mut images = property_images_map(&state.db, &property_ids).await?;
    let properties = models
        .into_iter()
        .map(|model| {
            let summary = summaries.get(&model.id).copied().unwrap_or_default();
            let model_images = images.remove(&model.id).unwrap_or_default();
            PropertyResponse::from_model(model, summary, model_images)
        })
        .collect();

    Ok(Json(crate::handlers::properties::PropertyListResponse {
        properties,
        total,
        pages,
        current_page: page,
    }))
}

/// Create a property. Admin-created properties are approved immediately
/// unless the body says otherwise.
#[utoipa::path(
    post,
    path = "/api/admin/properties",
    request_body = PropertyInput,
    responses(
        (status = 201, description = "Property created", body = AdminPropertyResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    ),
    tag = "admin"
)]
#[instrument(skip(state, headers, payload))]
pub async fn create_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<PropertyInput>,
) -> ApiResult<(axum::http::StatusCode, Json<AdminPropertyResponse>)> {
    let admin = auth::require_admin(&state, &headers).await?;
    trace!("Admin {} creating property", admin.id);

    let name = required_field(&payload.name, "Name")?.to_string();
    let address = required_field(&payload.address, "Address")?.to_string();
    let property_type = required_field(&payload.property_type, "Type")?.to_lowercase();
    let university = required_field(&payload.university, "University")?.to_string();
    let price_min = payload
        .price_min
        .ok_or_else(|| ApiError::Validation("Minimum price is required".to_string()))?;
    let price_max = payload
        .price_max
        .ok_or_else(|| ApiError::Validation("Maximum price is required".to_string()))?;
    validate_prices(price_min, price_max)?;
    let amenities = encode_amenities(&payload.amenities)?;

    let txn = state.db.begin().await?;
    let model = property::ActiveModel {
        name: Set(name),
        address: Set(address),
        property_type: Set(property_type),
        price_min: Set(price_min),
        price_max: Set(price_max),
        description: Set(payload.description.clone()),
        amenities: Set(amenities),
        contact_info: Set(payload.contact_info.clone()),
        university: Set(university.clone()),
        approved: Set(payload.approved.unwrap_or(true)),
        nsfas_accredited: Set(payload.nsfas_accredited.unwrap_or(false)),
        created_at: Set(Utc::now().naive_utc()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;
    rewrite_affiliations(&txn, model.id, &university).await?;
    if let Some(images) = &payload.images {
        replace_images(&txn, model.id, images).await?;
    }
    txn.commit().await?;
    info!("Admin {} created property {}", admin.id, model.id);

    let property = decorated_property(&state, model).await?;
    Ok((
        axum::http::StatusCode::CREATED,
        Json(AdminPropertyResponse {
            message: "Property created successfully.".to_string(),
            property,
        }),
    ))
}

/// Partially update a property.
#[utoipa::path(
    put,
    path = "/api/admin/properties/{property_id}",
    params(
        ("property_id" = i32, Path, description = "Property ID")
    ),
    request_body = PropertyInput,
    responses(
        (status = 200, description = "Property updated", body = AdminPropertyResponse),
        (status = 400, description = "Validation error", body = crate::error::ErrorResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 404, description = "Property not found", body = crate::error::ErrorResponse)
    ),
    tag = "admin"
)]
#[instrument(skip(state, headers, payload))]
pub async fn update_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(property_id): Path<i32>,
    Json(payload): Json<PropertyInput>,
) -> ApiResult<Json<AdminPropertyResponse>> {
    let admin = auth::require_admin(&state, &headers).await?;
    trace!("Admin {} updating property {}", admin.id, property_id);

    let existing = Property::find_by_id(property_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    let price_min = payload.price_min.unwrap_or(existing.price_min);
    let price_max = payload.price_max.unwrap_or(existing.price_max);
    validate_prices(price_min, price_max)?;
    // A blank university would wipe every campus membership row.
    if payload.university.is_some() {
        required_field(&payload.university, "University")?;
    }

    let university_changed = payload
        .university
        .as_deref()
        .map(|u| u != existing.university)
        .unwrap_or(false);

    let mut active: property::ActiveModel = existing.into();
    if let Some(name) = &payload.name {
        active.name = Set(name.trim().to_string());
    }
    if let Some(address) = &payload.address {
        active.address = Set(address.trim().to_string());
    }
    if let Some(property_type) = &payload.property_type {
        active.property_type = Set(property_type.trim().to_lowercase());
    }
    active.price_min = Set(price_min);
    active.price_max = Set(price_max);
    if payload.description.is_some() {
        active.description = Set(payload.description.clone());
    }
    if payload.amenities.is_some() {
        active.amenities = Set(encode_amenities(&payload.amenities)?);
    }
    if payload.contact_info.is_some() {
        active.contact_info = Set(payload.contact_info.clone());
    }
    if let Some(university) = &payload.university {
        active.university = Set(university.trim().to_string());
    }
    if let Some(nsfas) = payload.nsfas_accredited {
        active.nsfas_accredited = Set(nsfas);
    }
    // Approval only moves on an explicit admin instruction, never as a side
    // effect of editing other fields.
    if let Some(approved) = payload.approved {
        active.approved = Set(approved);
    }

    let txn = state.db.begin().await?;
    let model = active.update(&txn).await?;
    if university_changed {
        rewrite_affiliations(&txn, model.id, &model.university).await?;
    }
    if let Some(images) = &payload.images {
        replace_images(&txn, model.id, images).await?;
    }
    txn.commit().await?;
    info!("Admin {} updated property {}", admin.id, property_id);

    let property = decorated_property(&state, model).await?;
    Ok(Json(AdminPropertyResponse {
        message: "Property updated successfully.".to_string(),
        property,
    }))
}

/// Delete a property along with its reviews, images and campus links.
#[utoipa::path(
    delete,
    path = "/api/admin/properties/{property_id}",
    params(
        ("property_id" = i32, Path, description = "Property ID")
    ),
    responses(
        (status = 200, description = "Property deleted", body = MessageOnly),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 404, description = "Property not found", body = crate::error::ErrorResponse)
    ),
    tag = "admin"
)]
#[instrument(skip(state, headers))]
pub async fn delete_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(property_id): Path<i32>,
) -> ApiResult<Json<MessageOnly>> {
    let admin = auth::require_admin(&state, &headers).await?;
    trace!("Admin {} deleting property {}", admin.id, property_id);

    Property::find_by_id(property_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    let txn = state.db.begin().await?;
    Review::delete_many()
        .filter(review::Column::PropertyId.eq(property_id))
        .exec(&txn)
        .await?;
    PropertyImage::delete_many()
        .filter(property_image::Column::PropertyId.eq(property_id))
        .exec(&txn)
        .await?;
    PropertyUniversity::delete_many()
        .filter(property_university::Column::PropertyId.eq(property_id))
        .exec(&txn)
        .await?;
    Property::delete_by_id(property_id).exec(&txn).await?;
    txn.commit().await?;
    info!("Admin {} deleted property {}", admin.id, property_id);

    Ok(Json(MessageOnly {
        message: "Property deleted successfully.".to_string(),
    }))
}

/// Approve a pending property, making it publicly visible.
#[utoipa::path(
    post,
    path = "/api/admin/properties/{property_id}/approve",
    params(
        ("property_id" = i32, Path, description = "Property ID")
    ),
    responses(
        (status = 200, description = "Property approved", body = AdminPropertyResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 404, description = "Property not found", body = crate::error::ErrorResponse)
    ),
    tag = "admin"
)]
#[instrument(skip(state, headers))]
pub async fn approve_property(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(property_id): Path<i32>,
) -> ApiResult<Json<AdminPropertyResponse>> {
    let admin = auth::require_admin(&state, &headers).await?;
    trace!("Admin {} approving property {}", admin.id, property_id);

    let existing = Property::find_by_id(property_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    let mut active: property::ActiveModel = existing.into();
    active.approved = Set(true);
    let model = active.update(&state.db).await?;
    info!("Admin {} approved property {}", admin.id, property_id);

    let property = decorated_property(&state, model).await?;
    Ok(Json(AdminPropertyResponse {
        message: "Property approved.".to_string(),
        property,
    }))
}

/// List non-admin user accounts.
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(crate::handlers::reviews::PageQuery),
    responses(
        (status = 200, description = "Paginated user listing", body = AdminUserListResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    ),
    tag = "admin"
)]
#[instrument(skip(state, headers))]
pub async fn list_users(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<crate::handlers::reviews::PageQuery>,
) -> ApiResult<Json<AdminUserListResponse>> {
    auth::require_admin(&state, &headers).await?;
    let (page, per_page) = page_params(params.page, params.per_page, DEFAULT_PER_PAGE);

    let paginator = User::find()
        .filter(user::Column::IsAdmin.eq(false))
        .order_by_desc(user::Column::CreatedAt)
        .order_by_desc(user::Column::Id)
        .paginate(&state.db, per_page);
    let sea_orm::ItemsAndPagesNumber { number_of_items: total, number_of_pages: total_pages } = paginator.num_items_and_pages().await?;
    let models = paginator.fetch_page(page - 1).await?;

    Ok(Json(AdminUserListResponse {
        users: models.into_iter().map(Into::into).collect(),
        total,
        total_pages,
        current_page: page,
    }))
}

/// Mark a user account as verified.
#[utoipa::path(
    post,
    path = "/api/admin/users/{user_id}/verify",
    params(
        ("user_id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User verified", body = MessageOnly),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 404, description = "User not found", body = crate::error::ErrorResponse)
    ),
    tag = "admin"
)]
#[instrument(skip(state, headers))]
pub async fn verify_user(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(user_id): Path<i32>,
) -> ApiResult<Json<MessageOnly>> {
    let admin = auth::require_admin(&state, &headers).await?;

    let existing = User::find_by_id(user_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let mut active: user::ActiveModel = existing.into();
    active.verified = Set(true);
    active.update(&state.db).await?;
    info!("Admin {} verified user {}", admin.id, user_id);

    Ok(Json(MessageOnly {
        message: "User verified.".to_string(),
    }))
}

/// List all reviews with reviewer identity for moderation.
#[utoipa::path(
    get,
    path = "/api/admin/reviews",
    params(crate::handlers::reviews::PageQuery),
    responses(
        (status = 200, description = "Paginated review listing", body = AdminReviewListResponse),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse)
    ),
    tag = "admin"
)]
#[instrument(skip(state, headers))]
pub async fn admin_list_reviews(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<crate::handlers::reviews::PageQuery>,
) -> ApiResult<Json<AdminReviewListResponse>> {
    auth::require_admin(&state, &headers).await?;
    let (page, per_page) = page_params(params.page, params.per_page, DEFAULT_PER_PAGE);

    let paginator = Review::find()
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id)
        .paginate(&state.db, per_page);
    let sea_orm::ItemsAndPagesNumber { number_of_items: total, number_of_pages: total_pages } = paginator.num_items_and_pages().await?;
    let models = paginator.fetch_page(page - 1).await?;

    let user_ids: Vec<i32> = models.iter().map(|r| r.user_id).collect();
    let property_ids: Vec<i32> = models.iter().map(|r| r.property_id).collect();
    let users: std::collections::HashMap<i32, user::Model> = User::find()
        .filter(user::Column::Id.is_in(user_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect();
    let property_names: std::collections::HashMap<i32, String> = Property::find()
        .filter(property::Column::Id.is_in(property_ids))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|p| (p.id, p.name))
        .collect();

    let reviews = models
        .into_iter()
        .map(|model| {
            let author = users.get(&model.user_id);
            let name = property_names
                .get(&model.property_id)
                .map(String::as_str)
                .unwrap_or("Unknown Property");
            let (user_name, user_email) = match author {
                Some(u) => (u.name.clone(), u.email.clone()),
                None => ("Unknown".to_string(), String::new()),
            };
            AdminReviewResponse {
                review: review_response(model, author, name),
                user_name,
                user_email,
            }
        })
        .collect();

    Ok(Json(AdminReviewListResponse {
        reviews,
        total,
        total_pages,
        current_page: page,
    }))
}

/// Remove a review.
#[utoipa::path(
    delete,
    path = "/api/admin/reviews/{review_id}",
    params(
        ("review_id" = i32, Path, description = "Review ID")
    ),
    responses(
        (status = 200, description = "Review deleted", body = MessageOnly),
        (status = 401, description = "Authentication required", body = crate::error::ErrorResponse),
        (status = 403, description = "Admin access required", body = crate::error::ErrorResponse),
        (status = 404, description = "Review not found", body = crate::error::ErrorResponse)
    ),
    tag = "admin"
)]
#[instrument(skip(state, headers))]
pub async fn delete_review(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(review_id): Path<i32>,
) -> ApiResult<Json<MessageOnly>> {
    let admin = auth::require_admin(&state, &headers).await?;

    let result = Review::delete_by_id(review_id).exec(&state.db).await?;
    if result.rows_affected == 0 {
        return Err(ApiError::NotFound("Review not found".to_string()));
    }
    info!("Admin {} deleted review {}", admin.id, review_id);

    Ok(Json(MessageOnly {
        message: "Review deleted successfully.".to_string(),
    }))
}
