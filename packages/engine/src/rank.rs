use std::cmp::Ordering;

use crate::review::{ComputedReview, Review};

/// Compute scores for every review, order descending by value score, and
/// keep the first `n`.
///
/// The input is left untouched; callers get a new, independently owned
/// sequence. Ties keep their input order (stable sort), which pins down
/// deterministic output for equal value scores.
pub fn rank_top(reviews: &[Review], n: usize) -> Vec<ComputedReview> {
    let mut computed: Vec<ComputedReview> = reviews
        .iter()
        .cloned()
        .map(ComputedReview::from)
        .collect();
    computed.sort_by(|a, b| {
        b.value_score
            .partial_cmp(&a.value_score)
            .unwrap_or(Ordering::Equal)
    });
    computed.truncate(n);
    computed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::review::ProductType;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn review(name: &str, price: u32, tekstur: f64) -> Review {
        let now = Utc::now();
        Review {
            id: Uuid::now_v7(),
            outlet_name: name.into(),
            address: "Jl. Malioboro 1".into(),
            city: "Yogyakarta".into(),
            visit_date: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            price,
            product_type: ProductType::Goreng,
            notes: None,
            google_map_url: None,
            image_url: None,
            image_urls: Vec::new(),
            kuah_kekentalan: None,
            kuah_kaldu: None,
            kuah_keseimbangan: None,
            kuah_aroma: None,
            mie_tekstur: Some(tekstur),
            mie_tipe: None,
            ayam_bumbu: Some(7.0),
            ayam_potongan: Some(7.0),
            fasilitas_kebersihan: Some(8.0),
            fasilitas_alat_makan: Some(8.0),
            fasilitas_tempat: Some(8.0),
            service_durasi: None,
            complexity: None,
            sweetness: None,
            overall_score: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn orders_descending_by_value_score() {
        let reviews = vec![
            review("pricey", 20000, 9.0),
            review("cheap", 8000, 9.0),
            review("middling", 12000, 9.0),
        ];
        let ranked = rank_top(&reviews, 10);
        let names: Vec<&str> = ranked.iter().map(|r| r.review.outlet_name.as_str()).collect();
        assert_eq!(names, ["cheap", "middling", "pricey"]);
        for pair in ranked.windows(2) {
            assert!(pair[0].value_score >= pair[1].value_score);
        }
    }

    #[test]
    fn returns_at_most_n() {
        let reviews: Vec<Review> = (0..8).map(|i| review("warung", 9000 + i * 500, 7.0)).collect();
        assert_eq!(rank_top(&reviews, 5).len(), 5);
        assert_eq!(rank_top(&reviews, 0).len(), 0);
        assert_eq!(rank_top(&reviews[..2], 5).len(), 2);
    }

    #[test]
    fn does_not_mutate_input() {
        let reviews = vec![
            review("b", 15000, 6.0),
            review("a", 9000, 8.0),
        ];
        let snapshot = reviews.clone();
        let _ = rank_top(&reviews, 1);
        assert_eq!(reviews, snapshot);
    }

    #[test]
    fn ties_keep_insertion_order() {
        let first = review("first", 10000, 7.0);
        let second = review("second", 10000, 7.0);
        let ranked = rank_top(&[first, second], 2);
        assert_eq!(ranked[0].review.outlet_name, "first");
        assert_eq!(ranked[1].review.outlet_name, "second");
    }
}
