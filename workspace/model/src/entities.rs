//! This file serves as the root for all SeaORM entity modules.
//! We define the data models for the accommodation review platform here:
//! users, property listings, their images and affiliations, and reviews.

pub mod property;
pub mod property_image;
pub mod property_university;
pub mod review;
pub mod user;

pub mod prelude {
    //! A prelude module for easy importing of all entities.
    pub use super::property::Entity as Property;
    pub use super::property_image::Entity as PropertyImage;
    pub use super::property_university::Entity as PropertyUniversity;
    pub use super::review::Entity as Review;
    pub use super::user::Entity as User;
}
