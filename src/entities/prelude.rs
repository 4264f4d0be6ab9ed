pub use super::banner_images::Entity as BannerImages;
pub use super::categories::Entity as Categories;
pub use super::notifications::Entity as Notifications;
pub use super::users::Entity as Users;
pub use super::video_categories::Entity as VideoCategories;
pub use super::videos::Entity as Videos;
