// Third-party pricing catalog
//
// A public read-only JSON map of model-id → pricing/limits fields, consumed
// opportunistically: fetch failures and missing entries degrade, never fail.

use serde_json::{Map, Value};

pub const MODEL_PRICES_URL: &str =
    "https://raw.githubusercontent.com/BerriAI/litellm/refs/heads/main/model_prices_and_context_window.json";

/// Only these fields are copied into a model's model_info; everything else
/// in a catalog entry (context windows, capability flags) is ignored.
const PRICE_FIELDS: &[&str] = &[
    "input_cost_per_token",
    "output_cost_per_token",
    "input_cost_per_audio_token",
    "output_cost_per_audio_token",
    "input_cost_per_image",
    "output_cost_per_image",
    "input_cost_per_video_per_second",
    "output_cost_per_video_per_second",
    "cache_creation_input_token_cost",
    "cache_read_input_token_cost",
    "output_cost_per_reasoning_token",
    "input_cost_per_token_above_200k_tokens",
    "output_cost_per_token_above_200k_tokens",
];

pub struct PricingCatalog {
    prices: Map<String, Value>,
}

impl PricingCatalog {
    /// Fetch the public catalog. Failure degrades to an empty catalog with
    /// a logged warning.
    pub async fn fetch(http: &reqwest::Client) -> Self {
        match Self::try_fetch(http).await {
            Ok(prices) => {
                tracing::info!(entries = prices.len(), "fetched pricing catalog");
                Self { prices }
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to fetch pricing catalog; prices unavailable");
                Self { prices: Map::new() }
            }
        }
    }

    async fn try_fetch(http: &reqwest::Client) -> Result<Map<String, Value>, reqwest::Error> {
        http.get(MODEL_PRICES_URL)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }

    pub fn from_map(prices: Map<String, Value>) -> Self {
        Self { prices }
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Find price data for a model id: exact match on the id and its derived
    /// candidates first, then substring match of any candidate against
    /// catalog keys.
    pub fn find(&self, model_id: &str) -> Option<&Map<String, Value>> {
        let candidates = candidate_ids(model_id);

        for candidate in &candidates {
            if let Some(entry) = self.prices.get(candidate).and_then(Value::as_object) {
                return Some(entry);
            }
        }

        for candidate in &candidates {
            for (key, value) in &self.prices {
                if key.contains(candidate.as_str()) {
                    if let Some(entry) = value.as_object() {
                        return Some(entry);
                    }
                }
            }
        }

        None
    }
}

/// Lookup candidates for a model id: the id itself, then variants with the
/// "gemini-" prefix and the "-thinking"/"-medium" suffixes stripped.
fn candidate_ids(model_id: &str) -> Vec<String> {
    let mut candidates = vec![model_id.to_string()];

    if let Some(stripped) = model_id.strip_prefix("gemini-") {
        candidates.push(stripped.to_string());
    }

    for suffix in ["-thinking", "-medium"] {
        if let Some(stripped) = model_id.strip_suffix(suffix) {
            candidates.push(stripped.to_string());
            if let Some(inner) = stripped.strip_prefix("gemini-") {
                candidates.push(inner.to_string());
            }
        }
    }

    candidates
}

/// Keep only the cost fields from a catalog entry.
pub fn price_fields(entry: &Map<String, Value>) -> Map<String, Value> {
    entry
        .iter()
        .filter(|(key, _)| PRICE_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
