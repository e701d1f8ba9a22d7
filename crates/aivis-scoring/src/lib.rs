//! Pure scoring functions for engine-response text and page markup.
//!
//! Everything here is synchronous and free of I/O: sentiment polarity,
//! brand/competitor mention extraction, per-result visibility scores, and
//! structural scoring of HTML pages for answer-engine readiness. Inputs must
//! already be in memory; outputs degrade to documented defaults rather than
//! erroring.

pub mod content;
pub mod mentions;
pub mod sentences;
pub mod sentiment;
pub mod visibility;

mod lexicon;

pub use content::{score_content, score_content_at};
pub use mentions::{bare_domain, extract_competitor_mentions, extract_mentions};
pub use sentences::{delimited_segments, sentence_at_position, split_sentences};
pub use sentiment::SentimentAnalyzer;
pub use visibility::{general_visibility_score, visibility_score, VisibilitySignals};
