use serde::Deserialize;

use crate::review::{ComputedReview, ProductType, Review};

/// Product-type filter selection; `All` disables the predicate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum TypeFilter {
    #[default]
    All,
    Kuah,
    Goreng,
}

impl TypeFilter {
    fn matches(self, product_type: ProductType) -> bool {
        match self {
            TypeFilter::All => true,
            TypeFilter::Kuah => product_type == ProductType::Kuah,
            TypeFilter::Goreng => product_type == ProductType::Goreng,
        }
    }
}

/// Predicates narrowing a review collection, AND-composed.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct ReviewFilter {
    /// Case-insensitive substring match against outlet name, address, or
    /// city. Empty or absent means no text filter. The term is matched
    /// as-is apart from case folding; whitespace is not trimmed.
    pub search_term: Option<String>,
    /// Exact city match; `"all"` or absent means no filter.
    pub city: Option<String>,
    pub product_type: TypeFilter,
}

impl ReviewFilter {
    fn matches(&self, review: &Review) -> bool {
        if let Some(term) = self.search_term.as_deref()
            && !term.is_empty()
        {
            let needle = term.to_lowercase();
            let hit = review.outlet_name.to_lowercase().contains(&needle)
                || review.address.to_lowercase().contains(&needle)
                || review.city.to_lowercase().contains(&needle);
            if !hit {
                return false;
            }
        }

        if let Some(city) = self.city.as_deref()
            && city != "all"
            && review.city != city
        {
            return false;
        }

        self.product_type.matches(review.product_type)
    }
}

/// Keep the reviews matching every active predicate. The input is never
/// mutated; the result is an independently owned subset.
pub fn filter_reviews(reviews: &[ComputedReview], filter: &ReviewFilter) -> Vec<ComputedReview> {
    reviews
        .iter()
        .filter(|r| filter.matches(&r.review))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn computed(name: &str, address: &str, city: &str, product_type: ProductType) -> ComputedReview {
        let now = Utc::now();
        ComputedReview::from(Review {
            id: Uuid::now_v7(),
            outlet_name: name.into(),
            address: address.into(),
            city: city.into(),
            visit_date: NaiveDate::from_ymd_opt(2024, 1, 20).unwrap(),
            price: 12000,
            product_type,
            notes: None,
            google_map_url: None,
            image_url: None,
            image_urls: Vec::new(),
            kuah_kekentalan: Some(7.0),
            kuah_kaldu: Some(7.0),
            kuah_keseimbangan: Some(7.0),
            kuah_aroma: Some(7.0),
            mie_tekstur: Some(8.0),
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
        })
    }

    fn sample() -> Vec<ComputedReview> {
        vec![
            computed("Mie Ayam Tumini", "Jl. Imogiri Timur", "Yogyakarta", ProductType::Kuah),
            computed("Bakmi Pak Pele", "Alun-Alun Utara", "Yogyakarta", ProductType::Goreng),
            computed("Mie Ayam Wonogiri", "Jl. Slamet Riyadi", "Solo", ProductType::Kuah),
        ]
    }

    #[test]
    fn identity_filter_returns_input_unchanged() {
        let reviews = sample();
        let filter = ReviewFilter {
            search_term: Some(String::new()),
            city: Some("all".into()),
            product_type: TypeFilter::All,
        };
        assert_eq!(filter_reviews(&reviews, &filter), reviews);
    }

    #[test]
    fn search_matches_any_text_field_case_insensitively() {
        let reviews = sample();

        let by_name = filter_reviews(
            &reviews,
            &ReviewFilter {
                search_term: Some("tumini".into()),
                ..Default::default()
            },
        );
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].review.outlet_name, "Mie Ayam Tumini");

        let by_address = filter_reviews(
            &reviews,
            &ReviewFilter {
                search_term: Some("ALUN".into()),
                ..Default::default()
            },
        );
        assert_eq!(by_address.len(), 1);

        let by_city = filter_reviews(
            &reviews,
            &ReviewFilter {
                search_term: Some("solo".into()),
                ..Default::default()
            },
        );
        assert_eq!(by_city.len(), 1);
    }

    #[test]
    fn whitespace_in_term_is_not_trimmed() {
        let reviews = sample();
        let padded = filter_reviews(
            &reviews,
            &ReviewFilter {
                search_term: Some(" tumini".into()),
                ..Default::default()
            },
        );
        assert!(padded.is_empty());
    }

    #[test]
    fn city_filter_is_exact() {
        let reviews = sample();
        let solo = filter_reviews(
            &reviews,
            &ReviewFilter {
                city: Some("Solo".into()),
                ..Default::default()
            },
        );
        assert_eq!(solo.len(), 1);

        // Exact match, not case-folded.
        let lower = filter_reviews(
            &reviews,
            &ReviewFilter {
                city: Some("solo".into()),
                ..Default::default()
            },
        );
        assert!(lower.is_empty());
    }

    #[test]
    fn predicates_compose_with_and() {
        let reviews = sample();
        let filter = ReviewFilter {
            search_term: Some("mie".into()),
            city: Some("Yogyakarta".into()),
            product_type: TypeFilter::Kuah,
        };
        let hits = filter_reviews(&reviews, &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].review.outlet_name, "Mie Ayam Tumini");
    }

    #[test]
    fn type_filter_narrows_by_variant() {
        let reviews = sample();
        let goreng = filter_reviews(
            &reviews,
            &ReviewFilter {
                product_type: TypeFilter::Goreng,
                ..Default::default()
            },
        );
        assert_eq!(goreng.len(), 1);
        assert_eq!(goreng[0].review.outlet_name, "Bakmi Pak Pele");
    }
}
