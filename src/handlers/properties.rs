use std::collections::HashMap;

use axum::extract::{Path, Query, State};
use axum::Json;
use model::entities::{prelude::*, property, property_image, property_university};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, trace};
use utoipa::{IntoParams, ToSchema};

use crate::error::{ApiError, ApiResult};
use crate::helpers::ratings::{self, RatingSummary};
use crate::schemas::AppState;

const DEFAULT_PER_PAGE: u64 = 10;
const MAX_PER_PAGE: u64 = 100;

#[derive(Debug, Deserialize, IntoParams)]
pub struct PropertyListQuery {
    /// 1-indexed page number.
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    /// Campus filter. "all" disables the filter.
    pub university: Option<String>,
    /// Property type filter. "all" disables the filter.
    #[serde(rename = "type")]
    pub property_type: Option<String>,
    pub min_price: Option<i32>,
    pub max_price: Option<i32>,
    /// Case-insensitive substring match on name or address.
    pub search: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyImageResponse {
    pub id: i32,
    pub image_url: String,
    pub caption: Option<String>,
    pub is_primary: bool,
}

impl From<property_image::Model> for PropertyImageResponse {
    fn from(model: property_image::Model) -> Self {
        Self {
            id: model.id,
            image_url: model.image_url,
            caption: model.caption,
            is_primary: model.is_primary,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyResponse {
    pub id: i32,
    pub name: String,
    pub address: String,
    #[serde(rename = "type")]
    pub property_type: String,
    pub price_min: i32,
    pub price_max: i32,
    pub description: Option<String>,
    pub amenities: Vec<String>,
    pub contact_info: Option<String>,
    pub university: String,
    pub approved: bool,
    pub nsfas_accredited: bool,
    pub average_rating: f64,
    pub review_count: i64,
    pub images: Vec<PropertyImageResponse>,
    pub created_at: chrono::NaiveDateTime,
}

impl PropertyResponse {
    pub fn from_model(
        model: property::Model,
        summary: RatingSummary,
        images: Vec<property_image::Model>,
    ) -> Self {
        let amenities = model
            .amenities
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();
        Self {
            id: model.id,
            name: model.name,
            address: model.address,
            property_type: model.property_type,
            price_min: model.price_min,
            price_max: model.price_max,
            description: model.description,
            amenities,
            contact_info: model.contact_info,
            university: model.university,
            approved: model.approved,
            nsfas_accredited: model.nsfas_accredited,
            average_rating: summary.average_rating,
            review_count: summary.review_count,
            images: images.into_iter().map(Into::into).collect(),
            created_at: model.created_at,
        }
    }
}

/// Fetches images for a batch of properties, primary image first.
pub async fn property_images_map(
    db: &sea_orm::DatabaseConnection,
    property_ids: &[i32],
) -> Result<HashMap<i32, Vec<property_image::Model>>, sea_orm::DbErr> {
    let mut map: HashMap<i32, Vec<property_image::Model>> = HashMap::new();
    if property_ids.is_empty() {
        return Ok(map);
    }
    let images = PropertyImage::find()
        .filter(property_image::Column::PropertyId.is_in(property_ids.iter().copied()))
        .order_by_desc(property_image::Column::IsPrimary)
        .order_by_asc(property_image::Column::Id)
        .all(db)
        .await?;
    for image in images {
        map.entry(image.property_id).or_default().push(image);
    }
    Ok(map)
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PropertyListResponse {
    pub properties: Vec<PropertyResponse>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SinglePropertyResponse {
    pub property: PropertyResponse,
}

fn normalized_filter(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.eq_ignore_ascii_case("all"))
        .map(str::to_lowercase)
}

/// Applies the shared listing filters on top of a base property query.
pub fn apply_listing_filters(
    mut query: sea_orm::Select<Property>,
    params: &PropertyListQuery,
) -> sea_orm::Select<Property> {
    if let Some(university) = normalized_filter(&params.university) {
        query = query
            .join(JoinType::InnerJoin, property::Relation::PropertyUniversity.def())
            .filter(property_university::Column::University.eq(university));
    }
    if let Some(property_type) = normalized_filter(&params.property_type) {
        query = query.filter(property::Column::PropertyType.eq(property_type));
    }
    if let Some(min_price) = params.min_price {
        query = query.filter(property::Column::PriceMin.gte(min_price));
    }
    if let Some(max_price) = params.max_price {
        query = query.filter(property::Column::PriceMax.lte(max_price));
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
                        property::Entity,
                        property::Column::Address,
                    ))))
                    .like(pattern),
                ),
        );
    }
    query
}

pub fn page_params(page: Option<u64>, per_page: Option<u64>, default_per_page: u64) -> (u64, u64) {
    let page = page.unwrap_or(1).max(1);
    let per_page = per_page.unwrap_or(default_per_page).clamp(1, MAX_PER_PAGE);
    (page, per_page)
}

/// List approved properties with filtering and pagination.
#[utoipa::path(
    get,
    path = "/api/properties",
    params(PropertyListQuery),
    responses(
        (status = 200, description = "Paginated property listing", body = PropertyListResponse)
    ),
    tag = "properties"
)]
#[instrument(skip(state))]
pub async fn list_properties(
    State(state): State<AppState>,
    Query(params): Query<PropertyListQuery>,
) -> ApiResult<Json<PropertyListResponse>> {
    trace!("Listing public properties");
    let (page, per_page) = page_params(params.page, params.per_page, DEFAULT_PER_PAGE);

    let query = apply_listing_filters(
        Property::find().filter(property::Column::Approved.eq(true)),
        &params,
    )
    .order_by_desc(property::Column::CreatedAt)
    .order_by_desc(property::Column::Id);

    let paginator = query.paginate(&state.db, per_page);
    let sea_orm::ItemsAndPagesNumber { number_of_items: total, number_of_pages: pages } = paginator.num_items_and_pages().await?;
    // fetch_page is 0-indexed; an out-of-range page yields an empty list.
    let models = paginator.fetch_page(page - 1).await?;
    debug!("Found {} properties on page {} of {}", models.len(), page, pages);

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

    Ok(Json(PropertyListResponse {
        properties,
        total,
        pages,
        current_page: page,
    }))
}

/// Fetch a single approved property by id.
#[utoipa::path(
    get,
    path = "/api/properties/{property_id}",
    params(
        ("property_id" = i32, Path, description = "Property ID")
    ),
    responses(
        (status = 200, description = "Property found", body = SinglePropertyResponse),
        (status = 404, description = "Property not found or not approved", body = crate::error::ErrorResponse)
    ),
    tag = "properties"
)]
#[instrument(skip(state))]
pub async fn get_property(
    State(state): State<AppState>,
    Path(property_id): Path<i32>,
) -> ApiResult<Json<SinglePropertyResponse>> {
    trace!("Fetching property {}", property_id);
    let model = Property::find_by_id(property_id)
        .one(&state.db)
        .await?
        .filter(|p| p.approved)
        .ok_or_else(|| ApiError::NotFound("Property not found".to_string()))?;

    let summaries = ratings::rating_summaries(&state.db, &[model.id]).await?;
    let summary = summaries.get(&model.id).copied().unwrap_or_default();
    let mut images = property_images_map(&state.db, &[model.id]).await?;
    let model_images = images.remove(&model.id).unwrap_or_default();

    Ok(Json(SinglePropertyResponse {
        property: PropertyResponse::from_model(model, summary, model_images),
    }))
}
