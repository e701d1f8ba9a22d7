use std::collections::BTreeMap;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Scores strictly above this are positive.
pub const POSITIVE_THRESHOLD: f64 = 0.05;
/// Scores strictly below this are negative.
pub const NEGATIVE_THRESHOLD: f64 = -0.05;

// ---------------------------------------------------------------------------
// Sentiment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

impl SentimentLabel {
    /// Classify a compound polarity score using the fixed ±0.05 thresholds.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        if score > POSITIVE_THRESHOLD {
            SentimentLabel::Positive
        } else if score < NEGATIVE_THRESHOLD {
            SentimentLabel::Negative
        } else {
            SentimentLabel::Neutral
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SentimentLabel::Positive => "positive",
            SentimentLabel::Neutral => "neutral",
            SentimentLabel::Negative => "negative",
        }
    }
}

impl std::fmt::Display for SentimentLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SentimentLabel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive" => Ok(SentimentLabel::Positive),
            "neutral" => Ok(SentimentLabel::Neutral),
            "negative" => Ok(SentimentLabel::Negative),
            other => Err(format!("unknown sentiment label '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    /// Compound polarity in `[-1.0, 1.0]`.
    pub score: f64,
    pub label: SentimentLabel,
}

impl SentimentResult {
    #[must_use]
    pub fn neutral() -> Self {
        Self {
            score: 0.0,
            label: SentimentLabel::Neutral,
        }
    }

    /// Build a result from a raw score, clamping it into `[-1.0, 1.0]`.
    #[must_use]
    pub fn from_score(score: f64) -> Self {
        let score = if score.is_finite() {
            score.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        Self {
            score,
            label: SentimentLabel::from_score(score),
        }
    }
}

// ---------------------------------------------------------------------------
// Mentions
// ---------------------------------------------------------------------------

/// Presence of one entity inside a block of engine-response text.
///
/// `mentioned` is always equal to `mention_count > 0`; use
/// [`MentionResult::from_occurrences`] to keep the two in step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentionResult {
    pub mentioned: bool,
    /// 1-indexed sentence ordinal of the first occurrence.
    pub position: Option<u32>,
    pub mention_count: u32,
}

impl MentionResult {
    #[must_use]
    pub fn not_mentioned() -> Self {
        Self {
            mentioned: false,
            position: None,
            mention_count: 0,
        }
    }

    #[must_use]
    pub fn from_occurrences(mention_count: u32, position: Option<u32>) -> Self {
        if mention_count == 0 {
            return Self::not_mentioned();
        }
        Self {
            mentioned: true,
            position,
            mention_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorMention {
    pub name: String,
    pub position: u32,
    pub sentiment: SentimentLabel,
}

// ---------------------------------------------------------------------------
// Engines
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
#[error("unknown engine '{0}'")]
pub struct UnknownEngine(pub String);

/// The AI answer engines being monitored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Engine {
    #[serde(rename = "chatgpt")]
    ChatGpt,
    #[serde(rename = "perplexity")]
    Perplexity,
    #[serde(rename = "google_aio")]
    GoogleAio,
}

impl Engine {
    pub const ALL: [Engine; 3] = [Engine::ChatGpt, Engine::Perplexity, Engine::GoogleAio];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Engine::ChatGpt => "chatgpt",
            Engine::Perplexity => "perplexity",
            Engine::GoogleAio => "google_aio",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Engine {
    type Err = UnknownEngine;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "chatgpt" => Ok(Engine::ChatGpt),
            "perplexity" => Ok(Engine::Perplexity),
            "google_aio" => Ok(Engine::GoogleAio),
            _ => Err(UnknownEngine(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-result and snapshot records
// ---------------------------------------------------------------------------

/// One prompt × engine × day observation, ready for persistence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptResult {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub prompt_id: Uuid,
    pub engine: Engine,
    pub response_text: String,
    pub brand_mentioned: bool,
    pub mention_position: Option<u32>,
    pub mention_count: u32,
    pub sentiment_score: f64,
    pub sentiment_label: SentimentLabel,
    pub competitor_mentions: Vec<CompetitorMention>,
    pub visibility_score: u8,
    pub citation_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: u32,
    pub neutral: u32,
    pub negative: u32,
}

impl SentimentBreakdown {
    pub fn record(&mut self, label: SentimentLabel) {
        match label {
            SentimentLabel::Positive => self.positive += 1,
            SentimentLabel::Neutral => self.neutral += 1,
            SentimentLabel::Negative => self.negative += 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetitorStats {
    pub mentions: u32,
    pub sentiment_breakdown: SentimentBreakdown,
}

/// One brand's aggregated metrics for one calendar date.
///
/// Keyed by `(brand_id, date)`; re-aggregating the same day overwrites the
/// metric fields rather than adding a second row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilitySnapshot {
    pub brand_id: Uuid,
    pub date: NaiveDate,
    pub chatgpt_score: Option<u8>,
    pub perplexity_score: Option<u8>,
    pub google_aio_score: Option<u8>,
    pub overall_score: u8,
    pub sentiment_positive: f64,
    pub sentiment_neutral: f64,
    pub sentiment_negative: f64,
    pub total_mentions: u32,
    pub total_prompts_checked: u32,
    pub competitor_data: BTreeMap<String, CompetitorStats>,
}

impl VisibilitySnapshot {
    pub fn set_engine_score(&mut self, engine: Engine, score: Option<u8>) {
        match engine {
            Engine::ChatGpt => self.chatgpt_score = score,
            Engine::Perplexity => self.perplexity_score = score,
            Engine::GoogleAio => self.google_aio_score = score,
        }
    }
}

/// Structural scoring of one page. Not time-series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentScoreResult {
    pub overall_score: u8,
    pub structure_score: u8,
    pub readability_score: u8,
    pub freshness_score: u8,
    pub key_content_score: u8,
    pub citation_score: u8,
    pub recommendations: Vec<String>,
}

// ---------------------------------------------------------------------------
// Alerts
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    VisibilityDrop,
    NewMention,
    SentimentShift,
    CompetitorNew,
}

impl AlertType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            AlertType::VisibilityDrop => "visibility_drop",
            AlertType::NewMention => "new_mention",
            AlertType::SentimentShift => "sentiment_shift",
            AlertType::CompetitorNew => "competitor_new",
        }
    }

    #[must_use]
    pub fn severity(self) -> Severity {
        match self {
            AlertType::VisibilityDrop | AlertType::SentimentShift => Severity::Warning,
            AlertType::NewMention | AlertType::CompetitorNew => Severity::Info,
        }
    }
}

impl std::fmt::Display for AlertType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AlertType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "visibility_drop" => Ok(AlertType::VisibilityDrop),
            "new_mention" => Ok(AlertType::NewMention),
            "sentiment_shift" => Ok(AlertType::SentimentShift),
            "competitor_new" => Ok(AlertType::CompetitorNew),
            other => Err(format!("unknown alert type '{other}'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub title: String,
    pub body: String,
    pub severity: Severity,
    pub metadata: serde_json::Value,
}

/// Per-brand alert toggles plus an optional webhook destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertSettings {
    pub visibility_drop: bool,
    pub new_mention: bool,
    pub sentiment_shift: bool,
    pub competitor_new: bool,
    pub webhook_url: Option<String>,
}

impl AlertSettings {
    #[must_use]
    pub fn is_enabled(&self, alert_type: AlertType) -> bool {
        match alert_type {
            AlertType::VisibilityDrop => self.visibility_drop,
            AlertType::NewMention => self.new_mention,
            AlertType::SentimentShift => self.sentiment_shift,
            AlertType::CompetitorNew => self.competitor_new,
        }
    }

    pub fn set_enabled(&mut self, alert_type: AlertType, enabled: bool) {
        match alert_type {
            AlertType::VisibilityDrop => self.visibility_drop = enabled,
            AlertType::NewMention => self.new_mention = enabled,
            AlertType::SentimentShift => self.sentiment_shift = enabled,
            AlertType::CompetitorNew => self.competitor_new = enabled,
        }
    }
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            visibility_drop: true,
            new_mention: true,
            sentiment_shift: true,
            competitor_new: true,
            webhook_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_thresholds_are_exclusive() {
        assert_eq!(SentimentLabel::from_score(0.05), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(-0.05), SentimentLabel::Neutral);
        assert_eq!(SentimentLabel::from_score(0.050_1), SentimentLabel::Positive);
        assert_eq!(
            SentimentLabel::from_score(-0.050_1),
            SentimentLabel::Negative
        );
    }

    #[test]
    fn sentiment_result_clamps_and_handles_nan() {
        assert_eq!(SentimentResult::from_score(3.0).score, 1.0);
        assert_eq!(SentimentResult::from_score(-3.0).score, -1.0);
        assert_eq!(SentimentResult::from_score(f64::NAN), SentimentResult::neutral());
    }

    #[test]
    fn mention_result_keeps_flag_and_count_in_step() {
        let none = MentionResult::from_occurrences(0, Some(2));
        assert!(!none.mentioned);
        assert!(none.position.is_none());

        let some = MentionResult::from_occurrences(3, Some(1));
        assert!(some.mentioned);
        assert_eq!(some.mention_count, 3);
    }

    #[test]
    fn engine_parses_identifiers() {
        assert_eq!("chatgpt".parse::<Engine>().unwrap(), Engine::ChatGpt);
        assert_eq!("Perplexity".parse::<Engine>().unwrap(), Engine::Perplexity);
        assert_eq!("google_aio".parse::<Engine>().unwrap(), Engine::GoogleAio);
        assert!("bing".parse::<Engine>().is_err());
    }

    #[test]
    fn engine_serializes_as_identifier() {
        let json = serde_json::to_string(&Engine::GoogleAio).unwrap();
        assert_eq!(json, "\"google_aio\"");
    }

    #[test]
    fn alert_event_serializes_type_field() {
        let event = AlertEvent {
            alert_type: AlertType::NewMention,
            title: "t".to_string(),
            body: "b".to_string(),
            severity: AlertType::NewMention.severity(),
            metadata: serde_json::json!({}),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "new_mention");
        assert_eq!(value["severity"], "info");
    }

    #[test]
    fn alert_type_round_trips_through_identifier() {
        for alert_type in [
            AlertType::VisibilityDrop,
            AlertType::NewMention,
            AlertType::SentimentShift,
            AlertType::CompetitorNew,
        ] {
            assert_eq!(alert_type.as_str().parse::<AlertType>(), Ok(alert_type));
        }
        assert!("price_change".parse::<AlertType>().is_err());
    }

    #[test]
    fn toggles_can_be_switched_off() {
        let mut settings = AlertSettings::default();
        settings.set_enabled(AlertType::NewMention, false);
        assert!(!settings.is_enabled(AlertType::NewMention));
        assert!(settings.is_enabled(AlertType::VisibilityDrop));
    }

    #[test]
    fn severities_follow_alert_type() {
        assert_eq!(AlertType::VisibilityDrop.severity(), Severity::Warning);
        assert_eq!(AlertType::SentimentShift.severity(), Severity::Warning);
        assert_eq!(AlertType::NewMention.severity(), Severity::Info);
        assert_eq!(AlertType::CompetitorNew.severity(), Severity::Info);
    }
}
