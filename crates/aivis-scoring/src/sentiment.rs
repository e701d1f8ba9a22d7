//! Lexicon-and-rule sentiment analyzer (VADER family).
//!
//! Word valences come from [`crate::lexicon`] and are adjusted for preceding
//! intensifiers, negations within a three-word window, ALL-CAPS emphasis, a
//! contrastive "but", and trailing `!`/`?` emphasis. The summed valence is
//! normalized into `[-1.0, 1.0]` and labelled with the fixed ±0.05 thresholds.

use std::collections::{HashMap, HashSet};

use aivis_core::SentimentResult;

use crate::lexicon::{BOOSTERS, LEXICON, NEGATIONS};

/// Normalization constant approximating the maximum expected summed valence.
const ALPHA: f64 = 15.0;
const NEGATION_SCALAR: f64 = -0.74;
const CAPS_INCREMENT: f64 = 0.733;
const EXCLAMATION_INCREMENT: f64 = 0.292;
const MAX_EXCLAMATIONS: usize = 4;
const QUESTION_INCREMENT: f64 = 0.18;
const MAX_QUESTION_EMPHASIS: f64 = 0.96;
const BUT_BEFORE_WEIGHT: f64 = 0.5;
const BUT_AFTER_WEIGHT: f64 = 1.5;
/// Booster and negation influence decays with distance from the scored word.
const WINDOW_DAMPING: [f64; 3] = [1.0, 0.95, 0.9];

struct Token {
    norm: String,
    shouting: bool,
}

impl Token {
    fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if trimmed.is_empty() {
            return None;
        }
        let letters: Vec<char> = trimmed.chars().filter(|c| c.is_alphabetic()).collect();
        let shouting = letters.len() > 1 && letters.iter().all(|c| c.is_uppercase());
        let norm = trimmed
            .chars()
            .filter(|&c| c != '\'' && c != '\u{2019}')
            .collect::<String>()
            .to_lowercase();
        Some(Self { norm, shouting })
    }
}

/// Stateless once built; construct one and pass it to whatever needs scoring.
pub struct SentimentAnalyzer {
    lexicon: HashMap<&'static str, f64>,
    boosters: HashMap<&'static str, f64>,
    negations: HashSet<&'static str>,
}

impl Default for SentimentAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentAnalyzer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            lexicon: LEXICON.iter().copied().collect(),
            boosters: BOOSTERS.iter().copied().collect(),
            negations: NEGATIONS.iter().copied().collect(),
        }
    }

    /// Score a block of text.
    ///
    /// Empty or whitespace-only input returns a neutral `0.0` result.
    #[must_use]
    pub fn score(&self, text: &str) -> SentimentResult {
        if text.trim().is_empty() {
            return SentimentResult::neutral();
        }

        let tokens: Vec<Token> = text.split_whitespace().filter_map(Token::new).collect();
        if tokens.is_empty() {
            return SentimentResult::neutral();
        }

        let any_shouting = tokens.iter().any(|t| t.shouting);
        let all_shouting = tokens.iter().all(|t| t.shouting);
        let caps_differential = any_shouting && !all_shouting;

        let mut valences: Vec<f64> = (0..tokens.len())
            .map(|i| self.token_valence(&tokens, i, caps_differential))
            .collect();

        if let Some(but_idx) = tokens.iter().position(|t| t.norm == "but") {
            for (i, v) in valences.iter_mut().enumerate() {
                if i < but_idx {
                    *v *= BUT_BEFORE_WEIGHT;
                } else if i > but_idx {
                    *v *= BUT_AFTER_WEIGHT;
                }
            }
        }

        let mut sum: f64 = valences.iter().sum();
        let emphasis = punctuation_emphasis(text);
        if sum > 0.0 {
            sum += emphasis;
        } else if sum < 0.0 {
            sum -= emphasis;
        }

        SentimentResult::from_score(normalize(sum))
    }

    fn token_valence(&self, tokens: &[Token], i: usize, caps_differential: bool) -> f64 {
        let token = &tokens[i];
        if self.boosters.contains_key(token.norm.as_str()) {
            return 0.0;
        }
        // "kind of" is a hedge, not the word "kind".
        if token.norm == "kind" && tokens.get(i + 1).is_some_and(|next| next.norm == "of") {
            return 0.0;
        }
        let Some(&base) = self.lexicon.get(token.norm.as_str()) else {
            return 0.0;
        };

        let direction = base.signum();
        let mut valence = base;
        if caps_differential && token.shouting {
            valence += CAPS_INCREMENT * direction;
        }

        for (distance, damping) in WINDOW_DAMPING.iter().enumerate().map(|(d, w)| (d + 1, w)) {
            let Some(prev_idx) = i.checked_sub(distance) else {
                break;
            };
            let prev = &tokens[prev_idx];
            if let Some(&boost) = self.boosters.get(prev.norm.as_str()) {
                let mut scalar = boost * direction;
                if caps_differential && prev.shouting {
                    scalar += CAPS_INCREMENT * direction;
                }
                valence += scalar * damping;
            }
            if self.negations.contains(prev.norm.as_str()) {
                valence *= NEGATION_SCALAR;
            }
        }

        valence
    }
}

fn punctuation_emphasis(text: &str) -> f64 {
    let exclamations = text.matches('!').count().min(MAX_EXCLAMATIONS);
    let questions = text.matches('?').count();
    let question_emphasis = if questions > 1 {
        (count_f64(questions) * QUESTION_INCREMENT).min(MAX_QUESTION_EMPHASIS)
    } else {
        0.0
    };
    count_f64(exclamations) * EXCLAMATION_INCREMENT + question_emphasis
}

fn normalize(sum: f64) -> f64 {
    let norm = sum / (sum * sum + ALPHA).sqrt();
    norm.clamp(-1.0, 1.0)
}

fn count_f64(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}

#[cfg(test)]
mod tests {
    use aivis_core::SentimentLabel;

    use super::*;

    fn score(text: &str) -> f64 {
        SentimentAnalyzer::new().score(text).score
    }

    #[test]
    fn empty_string_is_neutral() {
        let result = SentimentAnalyzer::new().score("");
        assert_eq!(result, SentimentResult::neutral());
    }

    #[test]
    fn whitespace_only_is_neutral() {
        let result = SentimentAnalyzer::new().score("  \n\t ");
        assert_eq!(result.label, SentimentLabel::Neutral);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn unknown_words_are_neutral() {
        let result = SentimentAnalyzer::new().score("the quick brown fox");
        assert_eq!(result.label, SentimentLabel::Neutral);
    }

    #[test]
    fn positive_text_is_positive() {
        let result = SentimentAnalyzer::new().score("Acme is a great and reliable tool.");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.score > 0.05);
    }

    #[test]
    fn negative_text_is_negative() {
        let result = SentimentAnalyzer::new().score("Support was terrible and the app is buggy.");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.score < -0.05);
    }

    #[test]
    fn negation_flips_polarity() {
        assert!(score("this is good") > 0.0);
        assert!(score("this is not good") < 0.0);
        assert!(score("this isn't good") < 0.0);
    }

    #[test]
    fn booster_intensifies() {
        assert!(score("very good") > score("good"));
        assert!(score("slightly good") < score("good"));
    }

    #[test]
    fn exclamation_adds_emphasis() {
        assert!(score("good!!!") > score("good"));
        assert!(score("bad!!!") < score("bad"));
    }

    #[test]
    fn caps_emphasis_in_mixed_case_text() {
        assert!(score("the support is GREAT") > score("the support is great"));
    }

    #[test]
    fn but_shifts_weight_to_second_clause() {
        let result = SentimentAnalyzer::new().score("the pricing is good but the product is terrible");
        assert_eq!(result.label, SentimentLabel::Negative);
    }

    #[test]
    fn kind_of_is_not_scored() {
        assert_eq!(score("kind of"), 0.0);
    }

    #[test]
    fn score_stays_within_bounds() {
        let positive = "great excellent best love amazing awesome perfect wonderful ".repeat(40);
        let negative = "worst terrible awful horrible scam fraud hate ".repeat(40);
        let p = score(&positive);
        let n = score(&negative);
        assert!((-1.0..=1.0).contains(&p) && p > 0.9, "got {p}");
        assert!((-1.0..=1.0).contains(&n) && n < -0.9, "got {n}");
    }

    #[test]
    fn punctuation_only_is_neutral() {
        assert_eq!(score("?!?!..."), 0.0);
    }
}
