use crate::sentences::split_sentences;

use super::page::Page;
use super::to_score;

/// Pages shorter than this get a "thin content" recommendation.
const MIN_WORDS: usize = 300;
/// Word count that earns full marks under the fallback heuristic.
const FALLBACK_TARGET_WORDS: f64 = 500.0;

pub(super) fn score(page: &Page, recommendations: &mut Vec<String>) -> u8 {
    let words = page.words();
    let word_count = words.len();

    let raw = if let Some(ease) = flesch_reading_ease(&page.body_text, &words) {
        ease
    } else {
        tracing::debug!(word_count, "reading ease unavailable, using word-count heuristic");
        (count_f64(word_count) / FALLBACK_TARGET_WORDS * 100.0).min(100.0)
    };

    if word_count < MIN_WORDS {
        recommendations.push(format!(
            "Expand the content to at least {MIN_WORDS} words (currently {word_count})"
        ));
    }

    to_score(raw)
}

/// Flesch reading ease; `None` when there is no text to measure.
fn flesch_reading_ease(text: &str, words: &[&str]) -> Option<f64> {
    if words.is_empty() {
        return None;
    }
    let sentence_count = split_sentences(text).len().max(1);
    let syllables: usize = words.iter().map(|w| count_syllables(w)).sum();

    let words_f = count_f64(words.len());
    let ease = 206.835
        - 1.015 * (words_f / count_f64(sentence_count))
        - 84.6 * (count_f64(syllables) / words_f);

    ease.is_finite().then_some(ease)
}

/// Heuristic English syllable count: vowel groups, minus a silent trailing
/// `e`/`es`/`ed`, never less than one.
pub(super) fn count_syllables(word: &str) -> usize {
    let lower: String = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .collect::<String>()
        .to_ascii_lowercase();
    if lower.is_empty() {
        return 1;
    }
    if lower.len() <= 3 {
        return 1;
    }

    let trimmed = if lower.ends_with("es") || lower.ends_with("ed") {
        &lower[..lower.len() - 2]
    } else if lower.ends_with('e') && !lower.ends_with("le") {
        &lower[..lower.len() - 1]
    } else {
        lower.as_str()
    };

    let mut groups = 0;
    let mut prev_vowel = false;
    for c in trimmed.chars() {
        let vowel = matches!(c, 'a' | 'e' | 'i' | 'o' | 'u' | 'y');
        if vowel && !prev_vowel {
            groups += 1;
        }
        prev_vowel = vowel;
    }
    groups.max(1)
}

fn count_f64(n: usize) -> f64 {
    f64::from(u32::try_from(n).unwrap_or(u32::MAX))
}
