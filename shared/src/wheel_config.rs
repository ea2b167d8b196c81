use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{DEFAULT_SEGMENT_COLORS, WHEEL_SLOT_CAPACITY};
use crate::error::SpinError;

/// Odds as the dashboard stores them: sometimes a number, sometimes text,
/// occasionally something else entirely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Odds {
    Number(f64),
    Text(String),
    Other(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LotResponse {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub odds: Option<Odds>,
    #[serde(default)]
    pub promo_code: Option<String>,
}

/// Body of `GET /wheel/getSingleWheel/{wheelId}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WheelConfigResponse {
    #[serde(default)]
    pub business_name: Option<String>,
    #[serde(default)]
    pub google_review_link: Option<String>,
    #[serde(default)]
    pub social_media_link: Option<String>,
    #[serde(default)]
    pub customer_instruction: Option<String>,
    #[serde(default)]
    pub main_colors: Option<Value>,
    #[serde(default)]
    pub lots: Vec<LotResponse>,
    #[serde(default)]
    pub logo_url: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WheelEnvelope {
    Wrapped { wheel: WheelConfigResponse },
    Bare(WheelConfigResponse),
}

/// One wedge of the wheel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub name: String,
    pub weight: f64,
    pub promo_code: Option<String>,
}

impl Segment {
    pub fn new(name: &str, weight: f64) -> Self {
        Self {
            name: name.to_string(),
            weight: normalize_weight(weight),
            promo_code: None,
        }
    }

    pub fn is_playable(&self) -> bool {
        !self.name.trim().is_empty()
    }
}

/// Zero, negative, non-finite or unparsable odds count as 1.
pub fn normalize_weight(weight: f64) -> f64 {
    if weight.is_finite() && weight > 0.0 {
        weight
    } else {
        1.0
    }
}

pub fn parse_odds(odds: Option<&Odds>) -> f64 {
    let raw = match odds {
        Some(Odds::Number(value)) => *value,
        Some(Odds::Text(text)) => text.trim().parse::<f64>().unwrap_or(1.0),
        Some(Odds::Other(_)) | None => 1.0,
    };
    normalize_weight(raw)
}

/// Error for a wheel fetch that came back with a non-2xx status.
///
/// Server-side and throttling failures are worth retrying; anything else means
/// the wheel cannot be played.
pub fn wheel_status_error(wheel_id: &str, status: u16) -> SpinError {
    if status >= 500 || status == 408 || status == 429 {
        SpinError::Transport(format!("wheel {} fetch failed with status {}", wheel_id, status))
    } else {
        SpinError::Configuration(format!("wheel {} could not be loaded (status {})", wheel_id, status))
    }
}

/// Segments with a non-blank name, in wheel order.
pub fn playable_segments(segments: &[Segment]) -> Vec<Segment> {
    segments.iter().filter(|segment| segment.is_playable()).cloned().collect()
}

/// Wedge colour for `index`, cycling the merchant palette.
pub fn segment_color(index: usize, colors: &[String]) -> String {
    if colors.is_empty() {
        DEFAULT_SEGMENT_COLORS[index % DEFAULT_SEGMENT_COLORS.len()].to_string()
    } else {
        colors[index % colors.len()].clone()
    }
}

/// A merchant's wheel as seen by the player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WheelConfiguration {
    pub wheel_id: String,
    pub business_name: String,
    pub review_link: Option<String>,
    pub social_media_link: Option<String>,
    pub instruction_text: Option<String>,
    pub colors: Vec<String>,
    pub logo_url: Option<String>,
    pub segments: Vec<Segment>,
}

impl WheelConfiguration {
    pub fn from_json(wheel_id: &str, body: &str) -> Result<Self, SpinError> {
        let envelope: WheelEnvelope = serde_json::from_str(body)
            .map_err(|e| SpinError::Configuration(format!("invalid wheel body: {}", e)))?;
        let response = match envelope {
            WheelEnvelope::Wrapped { wheel } => wheel,
            WheelEnvelope::Bare(wheel) => wheel,
        };
        Self::from_response(wheel_id, response)
    }

    pub fn from_response(wheel_id: &str, response: WheelConfigResponse) -> Result<Self, SpinError> {
        if response.lots.len() > WHEEL_SLOT_CAPACITY {
            log::warn!(
                "Wheel {} has {} lots, more than the {} editable slots",
                wheel_id,
                response.lots.len(),
                WHEEL_SLOT_CAPACITY
            );
        }

        let segments: Vec<Segment> = response
            .lots
            .iter()
            .map(|lot| Segment {
                name: lot.name.as_deref().unwrap_or_default().trim().to_string(),
                weight: parse_odds(lot.odds.as_ref()),
                promo_code: lot
                    .promo_code
                    .as_deref()
                    .map(str::trim)
                    .filter(|code| !code.is_empty())
                    .map(str::to_string),
            })
            .collect();

        let config = Self {
            wheel_id: wheel_id.to_string(),
            business_name: response.business_name.unwrap_or_default(),
            review_link: non_blank(response.google_review_link),
            social_media_link: non_blank(response.social_media_link),
            instruction_text: non_blank(response.customer_instruction),
            colors: extract_colors(response.main_colors.as_ref()),
            logo_url: non_blank(response.logo_url),
            segments,
        };

        if config.playable_segments().is_empty() {
            return Err(SpinError::Configuration(format!(
                "wheel {} has no playable segments",
                wheel_id
            )));
        }

        log::info!(
            "Loaded wheel {} with {} playable segments",
            wheel_id,
            config.playable_segments().len()
        );
        Ok(config)
    }

    pub fn playable_segments(&self) -> Vec<Segment> {
        playable_segments(&self.segments)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn extract_colors(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::Object(map)) => map
            .values()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(color)) => vec![color.clone()],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHEEL_JSON: &str = r##"{
        "businessName": "Corner Cafe",
        "googleReviewLink": "https://g.page/r/corner-cafe",
        "customerInstruction": "Leave us a review, then spin!",
        "mainColors": ["#111111", "#222222"],
        "lots": [
            {"name": "Free coffee", "odds": 3, "promoCode": "COFFEE"},
            {"name": "   ", "odds": 5},
            {"name": "10% off", "odds": "2"},
            {"name": "Cookie", "odds": "lots"},
            {"name": "", "odds": 0}
        ],
        "logoUrl": ""
    }"##;

    #[test]
    fn test_config_parses_and_filters_blank_lots() {
        let config = WheelConfiguration::from_json("w1", WHEEL_JSON).unwrap();
        assert_eq!(config.business_name, "Corner Cafe");
        assert_eq!(config.segments.len(), 5);
        assert!(config.logo_url.is_none());

        let playable = config.playable_segments();
        let names: Vec<&str> = playable.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Free coffee", "10% off", "Cookie"]);
        assert_eq!(playable[0].weight, 3.0);
        assert_eq!(playable[0].promo_code.as_deref(), Some("COFFEE"));
        assert_eq!(playable[1].weight, 2.0);
        assert_eq!(playable[2].weight, 1.0);
    }

    #[test]
    fn test_wrapped_body_is_accepted() {
        let body = format!(r#"{{"wheel": {}}}"#, WHEEL_JSON);
        let config = WheelConfiguration::from_json("w1", &body).unwrap();
        assert_eq!(config.playable_segments().len(), 3);
    }

    #[test]
    fn test_zero_playable_segments_is_rejected_at_load() {
        let body = r#"{"lots": [{"name": ""}, {"name": "  "}]}"#;
        let err = WheelConfiguration::from_json("w2", body).unwrap_err();
        assert!(matches!(err, SpinError::Configuration(_)));

        let err = WheelConfiguration::from_json("w3", "{}").unwrap_err();
        assert!(matches!(err, SpinError::Configuration(_)));
    }

    #[test]
    fn test_playable_segments_does_not_mutate_input() {
        let segments = vec![Segment::new("A", 1.0), Segment::new(" ", 1.0), Segment::new("B", 2.0)];
        let playable = playable_segments(&segments);
        assert_eq!(playable.len(), 2);
        assert_eq!(segments.len(), 3);
        assert_eq!(playable[1].name, "B");
    }

    #[test]
    fn test_invalid_weights_are_coerced_to_one() {
        assert_eq!(normalize_weight(0.0), 1.0);
        assert_eq!(normalize_weight(-4.0), 1.0);
        assert_eq!(normalize_weight(f64::NAN), 1.0);
        assert_eq!(parse_odds(Some(&Odds::Text("abc".to_string()))), 1.0);
        assert_eq!(parse_odds(Some(&Odds::Text(" 7 ".to_string()))), 7.0);
        assert_eq!(parse_odds(None), 1.0);
        assert_eq!(parse_odds(Some(&Odds::Other(Value::Bool(true)))), 1.0);
    }

    #[test]
    fn test_unexpected_odds_shapes_default_to_one() {
        let body = r#"{"lots": [
            {"name": "A", "odds": true},
            {"name": "B", "odds": 2},
            {"name": "C", "odds": {"v": 1}},
            {"name": "D", "odds": []},
            {"name": "E", "odds": null}
        ]}"#;
        let config = WheelConfiguration::from_json("w4", body).unwrap();
        let weights: Vec<f64> = config.playable_segments().iter().map(|s| s.weight).collect();
        assert_eq!(weights, vec![1.0, 2.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_wheel_status_errors() {
        assert!(matches!(wheel_status_error("w1", 404), SpinError::Configuration(_)));
        let err = wheel_status_error("w1", 503);
        assert!(matches!(err, SpinError::Transport(_)));
        assert!(err.is_retryable());
        assert!(matches!(wheel_status_error("w1", 429), SpinError::Transport(_)));
    }

    #[test]
    fn test_segment_colors_cycle() {
        let colors = vec!["#aaa".to_string(), "#bbb".to_string()];
        assert_eq!(segment_color(3, &colors), "#bbb");
        assert_eq!(segment_color(0, &[]), DEFAULT_SEGMENT_COLORS[0]);
    }
}
