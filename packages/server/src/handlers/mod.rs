pub mod auth;
pub mod image;
pub mod review;
pub mod scorecard;
