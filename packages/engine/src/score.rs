use crate::review::{CategoryScores, ProductType, Review};

/// Weights for the persisted overall score of a `kuah` review.
const KUAH_WEIGHTS: (f64, f64, f64, f64) = (0.30, 0.30, 0.25, 0.15);

/// Weights for a `goreng` review: the broth term is dropped entirely and
/// the remaining components re-normalized to sum to 1.0.
const GORENG_WEIGHTS: (f64, f64, f64) = (0.40, 0.40, 0.20);

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn or_zero(v: Option<f64>) -> f64 {
    v.unwrap_or(0.0)
}

/// Unrounded category averages.
///
/// Absent sub-ratings count as 0 and the denominators are fixed (4, 1,
/// 2, 3) regardless of how many inputs are present.
fn raw_scores(review: &Review) -> (f64, f64, f64, f64) {
    let kuah = match review.product_type {
        ProductType::Kuah => {
            (or_zero(review.kuah_kekentalan)
                + or_zero(review.kuah_kaldu)
                + or_zero(review.kuah_keseimbangan)
                + or_zero(review.kuah_aroma))
                / 4.0
        }
        ProductType::Goreng => 0.0,
    };
    let mie = or_zero(review.mie_tekstur);
    let ayam = (or_zero(review.ayam_bumbu) + or_zero(review.ayam_potongan)) / 2.0;
    let fasilitas = (or_zero(review.fasilitas_kebersihan)
        + or_zero(review.fasilitas_alat_makan)
        + or_zero(review.fasilitas_tempat))
        / 3.0;
    (kuah, mie, ayam, fasilitas)
}

/// Per-category scores rounded to one decimal place for display.
pub fn compute_scores(review: &Review) -> CategoryScores {
    let (kuah, mie, ayam, fasilitas) = raw_scores(review);
    CategoryScores {
        kuah: round1(kuah),
        mie: round1(mie),
        ayam: round1(ayam),
        fasilitas: round1(fasilitas),
    }
}

/// The product-type-weighted headline score, computed from the unrounded
/// category averages. This is the value persisted as `overall_score`.
pub fn overall_score(review: &Review) -> f64 {
    let (kuah, mie, ayam, fasilitas) = raw_scores(review);
    match review.product_type {
        ProductType::Kuah => {
            let (wk, wm, wa, wf) = KUAH_WEIGHTS;
            wk * kuah + wm * mie + wa * ayam + wf * fasilitas
        }
        ProductType::Goreng => {
            let (wm, wa, wf) = GORENG_WEIGHTS;
            wm * mie + wa * ayam + wf * fasilitas
        }
    }
}

/// Price-adjusted ranking score: `((kuah + mie + ayam) / 3 + fasilitas)
/// / price * 1000`, over the rounded category scores.
///
/// Unlike [`overall_score`] this is an unweighted taste average with no
/// product-type special case; the two formulas are intentionally kept
/// distinct. Used only for ordering, never displayed.
///
/// # Panics
///
/// Panics if `price` is zero. The data model guarantees a positive
/// price, so a zero here is a programming error upstream.
pub fn value_score(review: &Review) -> f64 {
    assert!(review.price > 0, "review price must be positive");
    let scores = compute_scores(review);
    let avg_rasa = (scores.kuah + scores.mie + scores.ayam) / 3.0;
    (avg_rasa + scores.fasilitas) / f64::from(review.price) * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn base_review(product_type: ProductType) -> Review {
        let now = Utc::now();
        Review {
            id: Uuid::now_v7(),
            outlet_name: "Mie Ayam Pak Budi".into(),
            address: "Jl. Sudirman 12".into(),
            city: "Solo".into(),
            visit_date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            price: 10000,
            product_type,
            notes: None,
            google_map_url: None,
            image_url: None,
            image_urls: Vec::new(),
            kuah_kekentalan: None,
            kuah_kaldu: None,
            kuah_keseimbangan: None,
            kuah_aroma: None,
            mie_tekstur: None,
            mie_tipe: None,
            ayam_bumbu: None,
            ayam_potongan: None,
            fasilitas_kebersihan: None,
            fasilitas_alat_makan: None,
            fasilitas_tempat: None,
            service_durasi: None,
            complexity: None,
            sweetness: None,
            overall_score: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn rated_review() -> Review {
        let mut r = base_review(ProductType::Kuah);
        r.kuah_kekentalan = Some(8.0);
        r.kuah_kaldu = Some(7.0);
        r.kuah_keseimbangan = Some(9.0);
        r.kuah_aroma = Some(6.0);
        r.mie_tekstur = Some(7.0);
        r.ayam_bumbu = Some(8.0);
        r.ayam_potongan = Some(6.0);
        r.fasilitas_kebersihan = Some(9.0);
        r.fasilitas_alat_makan = Some(8.0);
        r.fasilitas_tempat = Some(7.0);
        r
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn category_scores_for_fully_rated_kuah_review() {
        let scores = compute_scores(&rated_review());
        assert!(approx(scores.kuah, 7.5));
        assert!(approx(scores.mie, 7.0));
        assert!(approx(scores.ayam, 7.0));
        assert!(approx(scores.fasilitas, 8.0));
    }

    #[test]
    fn goreng_kuah_score_is_zero_even_with_broth_ratings() {
        let mut r = rated_review();
        r.product_type = ProductType::Goreng;
        assert_eq!(compute_scores(&r).kuah, 0.0);
    }

    #[test]
    fn absent_ratings_average_over_fixed_denominator() {
        let mut r = base_review(ProductType::Kuah);
        // Only one of four broth attributes rated: 8 / 4, not 8 / 1.
        r.kuah_kekentalan = Some(8.0);
        assert!(approx(compute_scores(&r).kuah, 2.0));
        // One of three facility attributes: 6 / 3.
        r.fasilitas_tempat = Some(6.0);
        assert!(approx(compute_scores(&r).fasilitas, 2.0));
    }

    #[test]
    fn all_scores_within_bounds() {
        let mut r = rated_review();
        for ratings in [&mut r.kuah_kekentalan, &mut r.mie_tekstur] {
            *ratings = Some(10.0);
        }
        let scores = compute_scores(&r);
        for s in [scores.kuah, scores.mie, scores.ayam, scores.fasilitas] {
            assert!((0.0..=10.0).contains(&s));
        }
    }

    #[test]
    fn overall_score_uses_kuah_weights() {
        let overall = overall_score(&rated_review());
        assert!(approx(overall, 0.30 * 7.5 + 0.30 * 7.0 + 0.25 * 7.0 + 0.15 * 8.0));
    }

    #[test]
    fn overall_score_reweights_for_goreng() {
        let mut r = rated_review();
        r.product_type = ProductType::Goreng;
        let overall = overall_score(&r);
        assert!(approx(overall, 0.40 * 7.0 + 0.40 * 7.0 + 0.20 * 8.0));
    }

    #[test]
    fn overall_weights_sum_to_one() {
        let (wk, wm, wa, wf) = KUAH_WEIGHTS;
        assert!(approx(wk + wm + wa + wf, 1.0));
        let (gm, ga, gf) = GORENG_WEIGHTS;
        assert!(approx(gm + ga + gf, 1.0));
    }

    #[test]
    fn value_score_matches_documented_formula() {
        // avg_rasa = (7.5 + 7 + 7) / 3, value = (avg_rasa + 8) / 10000 * 1000.
        let v = value_score(&rated_review());
        assert!(approx(v, ((7.5 + 7.0 + 7.0) / 3.0 + 8.0) / 10.0));
        assert!((v - 1.5166666).abs() < 1e-6);
    }

    #[test]
    fn value_score_rewards_lower_price() {
        let cheap = rated_review();
        let mut expensive = rated_review();
        expensive.price = 20000;
        assert!(value_score(&cheap) > value_score(&expensive));
    }

    #[test]
    #[should_panic(expected = "price must be positive")]
    fn value_score_panics_on_zero_price() {
        let mut r = rated_review();
        r.price = 0;
        value_score(&r);
    }

    #[test]
    fn scoring_is_idempotent() {
        let r = rated_review();
        assert_eq!(compute_scores(&r), compute_scores(&r));
        assert_eq!(overall_score(&r).to_bits(), overall_score(&r).to_bits());
        assert_eq!(value_score(&r).to_bits(), value_score(&r).to_bits());
    }

    #[test]
    fn unrated_review_scores_zero() {
        let r = base_review(ProductType::Kuah);
        let scores = compute_scores(&r);
        assert_eq!(
            (scores.kuah, scores.mie, scores.ayam, scores.fasilitas),
            (0.0, 0.0, 0.0, 0.0)
        );
        assert_eq!(overall_score(&r), 0.0);
        assert_eq!(value_score(&r), 0.0);
    }
}
