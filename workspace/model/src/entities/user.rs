use sea_orm::entity::prelude::*;

/// A registered student (or platform administrator).
///
/// The email is a university address whose local part is the student number;
/// the `university` field is derived from the email domain at registration.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub name: String,
    /// University affiliation of the student, e.g. "wits" or "uj".
    pub university: String,
    pub year_of_study: Option<String>,
    pub faculty: Option<String>,
    #[sea_orm(default_value = "false")]
    pub verified: bool,
    #[sea_orm(default_value = "false")]
    pub is_admin: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// A user authors many reviews.
    #[sea_orm(has_many = "super::review::Entity")]
    Review,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
