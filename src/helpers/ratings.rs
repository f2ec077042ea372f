use std::collections::HashMap;

use model::entities::{prelude::*, property, review};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
};
use serde::Serialize;
use tracing::trace;
use utoipa::ToSchema;

/// Number of reviews shown on a user's stats panel.
pub const RECENT_REVIEW_LIMIT: usize = 3;
/// Character limit for review body previews.
pub const BODY_PREVIEW_CHARS: usize = 100;

/// Aggregated rating data for one property.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub review_count: i64,
}

pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Truncates a review body on a character boundary, appending an ellipsis
/// when anything was cut.
pub fn preview(text: &str) -> String {
    if text.chars().count() <= BODY_PREVIEW_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(BODY_PREVIEW_CHARS).collect();
    format!("{}...", cut)
}

/// Computes rating summaries for a batch of properties in one query.
/// Properties without reviews get the zero-valued default.
pub async fn rating_summaries(
    db: &DatabaseConnection,
    property_ids: &[i32],
) -> Result<HashMap<i32, RatingSummary>, DbErr> {
    trace!("Computing rating summaries for {} properties", property_ids.len());
    let mut summaries: HashMap<i32, RatingSummary> = HashMap::new();
    if property_ids.is_empty() {
        return Ok(summaries);
    }

    let reviews = Review::find()
        .filter(review::Column::PropertyId.is_in(property_ids.iter().copied()))
        .all(db)
        .await?;

    let mut totals: HashMap<i32, (i64, i64)> = HashMap::new();
    for item in reviews {
        let entry = totals.entry(item.property_id).or_insert((0, 0));
        entry.0 += i64::from(item.overall_rating);
        entry.1 += 1;
    }

    for (property_id, (rating_sum, count)) in totals {
        summaries.insert(
            property_id,
            RatingSummary {
                average_rating: round_one_decimal(rating_sum as f64 / count as f64),
                review_count: count,
            },
        );
    }
    Ok(summaries)
}

/// Aggregate counters for a user's review activity.
#[derive(Debug, Serialize, ToSchema)]
pub struct ReviewStats {
    #[serde(rename = "reviewsCount")]
    pub reviews_count: i64,
    #[serde(rename = "avgRating")]
    pub avg_rating: f64,
    #[serde(rename = "helpfulVotes")]
    pub helpful_votes: i64,
}

/// Compact review entry shown in the user's recent activity.
#[derive(Debug, Serialize, ToSchema)]
pub struct RecentReview {
    pub id: i32,
    pub property_id: i32,
    pub property_name: String,
    pub rating: i32,
    pub text: String,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserReviewStats {
    pub stats: ReviewStats,
    pub recent_reviews: Vec<RecentReview>,
}

/// Builds the stats panel for one user: lifetime counters plus their most
/// recent reviews with body previews.
pub async fn user_review_stats(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<UserReviewStats, DbErr> {
    let reviews = Review::find()
        .filter(review::Column::UserId.eq(user_id))
        .order_by_desc(review::Column::CreatedAt)
        .order_by_desc(review::Column::Id)
        .all(db)
        .await?;

    let reviews_count = reviews.len() as i64;
    let helpful_votes: i64 = reviews.iter().map(|r| i64::from(r.helpful_count)).sum();
    let avg_rating = if reviews.is_empty() {
        0.0
    } else {
        let rating_sum: i64 = reviews.iter().map(|r| i64::from(r.overall_rating)).sum();
        round_one_decimal(rating_sum as f64 / reviews_count as f64)
    };

    let recent: Vec<&review::Model> = reviews.iter().take(RECENT_REVIEW_LIMIT).collect();
    let property_ids: Vec<i32> = recent.iter().map(|r| r.property_id).collect();
    let property_names: HashMap<i32, String> = if property_ids.is_empty() {
        HashMap::new()
    } else {
        Property::find()
            .filter(property::Column::Id.is_in(property_ids))
            .all(db)
            .await?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect()
    };

    let recent_reviews = recent
        .into_iter()
        .map(|r| RecentReview {
            id: r.id,
            property_id: r.property_id,
            property_name: property_names
                .get(&r.property_id)
                .cloned()
                .unwrap_or_else(|| "Unknown Property".to_string()),
            rating: r.overall_rating,
            text: preview(&r.review_text),
            created_at: r.created_at,
        })
        .collect();

    Ok(UserReviewStats {
        stats: ReviewStats {
            reviews_count,
            avg_rating,
            helpful_votes,
        },
        recent_reviews,
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_round_one_decimal() {
        assert_eq!(round_one_decimal(4.0 / 3.0), 1.3);
        assert_eq!(round_one_decimal(11.0 / 3.0), 3.7);
        assert_eq!(round_one_decimal(4.0), 4.0);
        assert_eq!(round_one_decimal(0.0), 0.0);
    }

    #[test]
    fn test_preview_short_text_is_untouched() {
        assert_eq!(preview("short review"), "short review");
    }

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let text = "é".repeat(150);
        let result = preview(&text);
        assert!(result.ends_with("..."));
        assert_eq!(result.chars().count(), BODY_PREVIEW_CHARS + 3);
    }
}
