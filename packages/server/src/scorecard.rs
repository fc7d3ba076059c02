use engine::{ComputedReview, ProductType};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::instrument;

use crate::config::ScorecardConfig;

/// Errors from the remote scorecard generator. All of these are
/// best-effort failures: the review stays fully usable without a
/// scorecard.
#[derive(Debug, Error)]
pub enum ScorecardError {
    #[error("scorecard gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("scorecard gateway returned {status}: {body}")]
    Gateway { status: u16, body: String },

    #[error("scorecard gateway response contained no image")]
    MissingImage,

    #[error("scorecard gateway API key not configured")]
    NotConfigured,
}

/// Client for the opaque image-generation gateway that renders a
/// shareable scorecard graphic for a review.
pub struct ScorecardClient {
    http: reqwest::Client,
    config: ScorecardConfig,
}

impl ScorecardClient {
    pub fn new(config: ScorecardConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Ask the gateway to render a scorecard and return the image URL.
    #[instrument(skip(self, review), fields(outlet = %review.review.outlet_name))]
    pub async fn generate(&self, review: &ComputedReview) -> Result<String, ScorecardError> {
        if self.config.api_key.is_empty() {
            return Err(ScorecardError::NotConfigured);
        }

        let body = json!({
            "model": self.config.model,
            "messages": [{ "role": "user", "content": scorecard_prompt(review) }],
            "modalities": ["image", "text"],
        });

        let response = self
            .http
            .post(&self.config.gateway_url)
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScorecardError::Gateway {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json().await?;
        extract_image_url(&payload).ok_or(ScorecardError::MissingImage)
    }
}

/// Prompt describing the scorecard layout and this review's numbers.
fn scorecard_prompt(review: &ComputedReview) -> String {
    let r = &review.review;
    let scores = &review.scores;

    let kuah_line = match r.product_type {
        ProductType::Kuah => format!("- Kuah (Broth): {:.1}/10\n", scores.kuah),
        ProductType::Goreng => String::new(),
    };
    let type_label = match r.product_type {
        ProductType::Kuah => "Kuah (Soup)",
        ProductType::Goreng => "Goreng (Fried)",
    };

    format!(
        "Create a professional Instagram story scorecard (1920x1080px landscape) for a \
         Mie Ayam (Indonesian chicken noodle) restaurant review with these specifications:\n\n\
         **Restaurant:** {outlet}\n\
         **Location:** {city}\n\
         **Type:** {type_label}\n\
         **Price:** Rp {price}\n\
         **Visit Date:** {visit_date}\n\n\
         **Scores (out of 10):**\n\
         {kuah_line}\
         - Mie (Noodles): {mie:.1}/10\n\
         - Ayam (Chicken): {ayam:.1}/10\n\
         - Fasilitas (Facilities): {fasilitas:.1}/10\n\n\
         **Design Requirements:**\n\
         - Warm, appetizing color scheme (oranges, yellows, warm reds)\n\
         - \"MIE AYAM RANGER\" branding at the top\n\
         - Clean, modern layout with good readability\n\
         - Display scores with visual bars or circular progress indicators\n\
         - Instagram story optimized format (1920x1080px landscape)\n\n\
         Make it look appetizing, professional, and share-worthy for social media!",
        outlet = r.outlet_name,
        city = r.city,
        price = r.price,
        visit_date = r.visit_date,
        mie = scores.mie,
        ayam = scores.ayam,
        fasilitas = scores.fasilitas,
    )
}

/// Pull the generated image URL out of a chat-completions response.
fn extract_image_url(payload: &Value) -> Option<String> {
    payload
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("images")?
        .get(0)?
        .get("image_url")?
        .get("url")?
        .as_str()
        .map(str::to_owned)
}
