use sea_orm::entity::prelude::*;

/// Universities the platform knows about. Wildcard affiliations expand to
/// this list.
pub const KNOWN_UNIVERSITIES: &[&str] = &["wits", "uj"];

/// An accommodation listing. Invisible to the public until `approved` is set
/// by an admin.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "properties")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub address: String,
    /// Open string in practice; "residence", "apartment" and "house" by
    /// convention.
    pub property_type: String,
    pub price_min: i32,
    pub price_max: i32,
    pub description: Option<String>,
    /// JSON-encoded ordered list of amenity tags.
    pub amenities: Option<String>,
    pub contact_info: Option<String>,
    /// Affiliation as entered ("wits", "both", "wits & uj", ...). The
    /// normalized membership set lives in `property_universities`.
    pub university: String,
    #[sea_orm(default_value = "false")]
    pub approved: bool,
    #[sea_orm(default_value = "false")]
    pub nsfas_accredited: bool,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::review::Entity")]
    Review,
    #[sea_orm(has_many = "super::property_image::Entity")]
    PropertyImage,
    #[sea_orm(has_many = "super::property_university::Entity")]
    PropertyUniversity,
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Review.def()
    }
}

impl Related<super::property_image::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyImage.def()
    }
}

impl Related<super::property_university::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PropertyUniversity.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Expand a display affiliation string into the set of universities it
/// covers. "both" and "all" are wildcards; compound strings such as
/// "wits & uj" split on `&` or `,`. The result is lowercase, order
/// preserving and duplicate free.
pub fn affiliations(university: &str) -> Vec<String> {
    let normalized = university.trim().to_lowercase();
    if normalized == "both" || normalized == "all" {
        return KNOWN_UNIVERSITIES.iter().map(|u| ToString::to_string(u)).collect();
    }

    let mut out = Vec::new();
    for part in normalized.split(['&', ',']) {
        let part = part.trim();
        if !part.is_empty() && !out.iter().any(|p| p == part) {
            out.push(part.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::affiliations;

    #[test]
    fn single_university() {
        assert_eq!(affiliations("wits"), vec!["wits"]);
        assert_eq!(affiliations(" UJ "), vec!["uj"]);
    }

    #[test]
    fn wildcard_expands_to_all_known() {
        assert_eq!(affiliations("both"), vec!["wits", "uj"]);
        assert_eq!(affiliations("ALL"), vec!["wits", "uj"]);
    }

    #[test]
    fn compound_string_splits_on_delimiters() {
        assert_eq!(affiliations("wits & uj"), vec!["wits", "uj"]);
        assert_eq!(affiliations("wits,uj"), vec!["wits", "uj"]);
    }

    #[test]
    fn duplicates_and_empty_parts_are_dropped() {
        assert_eq!(affiliations("wits & wits"), vec!["wits"]);
        assert_eq!(affiliations(" & uj"), vec!["uj"]);
        assert!(affiliations("").is_empty());
    }
}
