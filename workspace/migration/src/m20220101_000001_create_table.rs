use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create users table
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk_auto(Users::Id))
                    .col(string(Users::Email).unique_key())
                    .col(string(Users::PasswordHash))
                    .col(string(Users::Name))
                    .col(string(Users::University))
                    .col(string_null(Users::YearOfStudy))
                    .col(string_null(Users::Faculty))
                    .col(boolean(Users::Verified).default(false))
                    .col(boolean(Users::IsAdmin).default(false))
                    .col(timestamp(Users::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create properties table
        manager
            .create_table(
                Table::create()
                    .table(Properties::Table)
                    .if_not_exists()
                    .col(pk_auto(Properties::Id))
                    .col(string(Properties::Name))
                    .col(text(Properties::Address))
                    .col(string(Properties::PropertyType))
                    .col(integer(Properties::PriceMin))
                    .col(integer(Properties::PriceMax))
                    .col(text_null(Properties::Description))
                    .col(text_null(Properties::Amenities))
                    .col(text_null(Properties::ContactInfo))
                    .col(string(Properties::University))
                    .col(boolean(Properties::Approved).default(false))
                    .col(boolean(Properties::NsfasAccredited).default(false))
                    .col(timestamp(Properties::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        // Create property_universities table (normalized affiliation set)
        manager
            .create_table(
                Table::create()
                    .table(PropertyUniversities::Table)
                    .if_not_exists()
                    .col(integer(PropertyUniversities::PropertyId))
                    .col(string(PropertyUniversities::University))
                    .primary_key(
                        Index::create()
                            .name("pk_property_universities")
                            .col(PropertyUniversities::PropertyId)
                            .col(PropertyUniversities::University),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_universities_property")
                            .from(PropertyUniversities::Table, PropertyUniversities::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create property_images table
        manager
            .create_table(
                Table::create()
                    .table(PropertyImages::Table)
                    .if_not_exists()
                    .col(pk_auto(PropertyImages::Id))
                    .col(integer(PropertyImages::PropertyId))
                    .col(string(PropertyImages::ImageUrl))
                    .col(string_null(PropertyImages::Caption))
                    .col(boolean(PropertyImages::IsPrimary).default(false))
                    .col(timestamp(PropertyImages::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_property_images_property")
                            .from(PropertyImages::Table, PropertyImages::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create reviews table
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(pk_auto(Reviews::Id))
                    .col(integer(Reviews::UserId))
                    .col(integer(Reviews::PropertyId))
                    .col(integer(Reviews::OverallRating))
                    .col(integer_null(Reviews::ValueRating))
                    .col(integer_null(Reviews::LocationRating))
                    .col(integer_null(Reviews::SafetyRating))
                    .col(integer_null(Reviews::CleanlinessRating))
                    .col(integer_null(Reviews::ManagementRating))
                    .col(integer_null(Reviews::FacilitiesRating))
                    .col(text(Reviews::ReviewText))
                    .col(text_null(Reviews::Pros))
                    .col(text_null(Reviews::Cons))
                    .col(boolean(Reviews::Recommend))
                    .col(boolean(Reviews::Anonymous).default(false))
                    .col(integer(Reviews::HelpfulCount).default(0))
                    .col(timestamp(Reviews::CreatedAt).default(Expr::current_timestamp()))
                    .col(timestamp(Reviews::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_user")
                            .from(Reviews::Table, Reviews::UserId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_reviews_property")
                            .from(Reviews::Table, Reviews::PropertyId)
                            .to(Properties::Table, Properties::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // One review per (user, property); the storage layer owns this
        // invariant, not the application pre-check.
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_user_property")
                    .table(Reviews::Table)
                    .col(Reviews::UserId)
                    .col(Reviews::PropertyId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PropertyImages::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PropertyUniversities::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Properties::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    Email,
    PasswordHash,
    Name,
    University,
    YearOfStudy,
    Faculty,
    Verified,
    IsAdmin,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Properties {
    Table,
    Id,
    Name,
    Address,
    PropertyType,
    PriceMin,
    PriceMax,
    Description,
    Amenities,
    ContactInfo,
    University,
    Approved,
    NsfasAccredited,
    CreatedAt,
}

#[derive(DeriveIden)]
enum PropertyUniversities {
    Table,
    PropertyId,
    University,
}

#[derive(DeriveIden)]
enum PropertyImages {
    Table,
    Id,
    PropertyId,
    ImageUrl,
    Caption,
    IsPrimary,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Reviews {
    Table,
    Id,
    UserId,
    PropertyId,
    OverallRating,
    ValueRating,
    LocationRating,
    SafetyRating,
    CleanlinessRating,
    ManagementRating,
    FacilitiesRating,
    ReviewText,
    Pros,
    Cons,
    Recommend,
    Anonymous,
    HelpfulCount,
    CreatedAt,
    UpdatedAt,
}
