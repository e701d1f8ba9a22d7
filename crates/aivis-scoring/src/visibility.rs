//! Per-result visibility scores.
//!
//! Two independently weighted formulas exist for the same concept.
//! [`visibility_score`] is the one the result-processing flow persists;
//! [`general_visibility_score`] is a general-purpose analyzer utility with its
//! own weights. They are intentionally kept separate.

use aivis_core::SentimentLabel;

/// Signals extracted from one engine response for one brand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibilitySignals {
    pub mentioned: bool,
    pub position: Option<u32>,
    pub sentiment: SentimentLabel,
    pub has_citation: bool,
    pub competitor_count: usize,
}

/// Canonical score used for persisted prompt results.
///
/// `+50` when mentioned; `+30` for a mention in sentences 1–5 or `+15` for
/// sentences 6–10; `+20` positive / `+10` neutral / `+0` negative sentiment.
/// Citation presence and competitor density do not contribute.
#[must_use]
pub fn visibility_score(signals: &VisibilitySignals) -> u8 {
    let mut score: u32 = 0;

    if signals.mentioned {
        score += 50;
        score += match signals.position {
            Some(p) if p <= 5 => 30,
            Some(p) if p <= 10 => 15,
            _ => 0,
        };
    }

    score += match signals.sentiment {
        SentimentLabel::Positive => 20,
        SentimentLabel::Neutral => 10,
        SentimentLabel::Negative => 0,
    };

    clamp_score(score)
}

/// General-purpose analyzer score.
///
/// `+40` when mentioned; a position bonus of `max(0, 20 - (position - 1) * 2)`
/// when mentioned; `+15` for positive sentiment whether or not the entity is
/// mentioned; `+15` when a citation points at the entity; `+10` when fewer
/// than three competitors appear. Capped at 100.
#[must_use]
pub fn general_visibility_score(signals: &VisibilitySignals) -> u8 {
    let mut score: u32 = 0;

    if signals.mentioned {
        score += 40;
        if let Some(position) = signals.position {
            let decay = position.saturating_sub(1).saturating_mul(2);
            score += 20u32.saturating_sub(decay);
        }
    }

    if signals.sentiment == SentimentLabel::Positive {
        score += 15;
    }
    if signals.has_citation {
        score += 15;
    }
    if signals.competitor_count < 3 {
        score += 10;
    }

    clamp_score(score)
}

fn clamp_score(score: u32) -> u8 {
    u8::try_from(score.min(100)).unwrap_or(100)
}
