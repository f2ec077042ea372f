use sea_orm::entity::prelude::*;

/// A rated evaluation of one property by one user.
///
/// The schema carries a unique index on (user_id, property_id); the
/// application-level duplicate pre-check is a courtesy, the index is the
/// guarantee. Sub-ratings are optional: absent means "not supplied", never
/// zero.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "reviews")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub property_id: i32,
    /// Required overall rating, 1-5.
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
    #[sea_orm(default_value = "false")]
    pub anonymous: bool,
    /// Monotonically incremented helpful-vote counter.
    #[sea_orm(default_value = "0")]
    pub helpful_count: i32,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::property::Entity",
        from = "Column::PropertyId",
        to = "super::property::Column::Id"
    )]
    Property,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::property::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Property.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
