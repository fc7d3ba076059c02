//! Scoring and ranking engine for the review directory.
//!
//! Everything in this crate is a pure, synchronous transformation over
//! in-memory review records: raw sub-ratings go in, normalized category
//! scores, a weighted overall score, and a price-adjusted value score
//! come out. No I/O happens here; callers hand the engine fully
//! materialized collections.

pub mod filter;
pub mod price;
pub mod rank;
pub mod review;
pub mod score;

pub use filter::{ReviewFilter, TypeFilter, filter_reviews};
pub use price::{PriceCategory, categorize_price};
pub use rank::rank_top;
pub use review::{CategoryScores, ComputedReview, ProductType, Review};
pub use score::{compute_scores, overall_score, value_score};
