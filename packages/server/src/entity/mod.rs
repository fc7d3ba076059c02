pub mod review;
pub mod review_image;
pub mod user;
pub mod user_role;
