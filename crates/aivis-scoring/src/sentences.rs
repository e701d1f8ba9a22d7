//! Sentence segmentation shared by mention extraction and readability.
//!
//! A sentence boundary is any maximal run of `.`, `!`, `?` or newline
//! characters. Positions are 1-indexed: text before the first boundary is
//! sentence 1.

#[must_use]
pub fn is_sentence_delimiter(c: char) -> bool {
    matches!(c, '.' | '!' | '?' | '\n')
}

/// Number of boundaries (delimiter runs) in `text`.
#[must_use]
pub fn count_boundaries(text: &str) -> usize {
    let mut boundaries = 0;
    let mut in_run = false;
    for c in text.chars() {
        if is_sentence_delimiter(c) {
            if !in_run {
                boundaries += 1;
                in_run = true;
            }
        } else {
            in_run = false;
        }
    }
    boundaries
}

/// 1-indexed sentence ordinal of the byte offset `offset` within `text`.
///
/// `offset` is clamped to the text length and snapped back to a char boundary.
#[must_use]
pub fn position_of_offset(text: &str, offset: usize) -> u32 {
    let mut end = offset.min(text.len());
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let boundaries = count_boundaries(&text[..end]);
    u32::try_from(boundaries)
        .unwrap_or(u32::MAX - 1)
        .saturating_add(1)
}

/// Split `text` into trimmed, non-blank sentences.
#[must_use]
pub fn split_sentences(text: &str) -> Vec<&str> {
    text.split(is_sentence_delimiter)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split `text` at every delimiter run, keeping blank segments so that
/// segment `n - 1` is exactly sentence `n` as counted by [`position_of_offset`].
/// Segments are trimmed.
#[must_use]
pub fn delimited_segments(text: &str) -> Vec<&str> {
    let mut segments = Vec::new();
    let mut start = 0;
    let mut in_run = false;
    for (i, c) in text.char_indices() {
        if is_sentence_delimiter(c) {
            if !in_run {
                segments.push(text[start..i].trim());
                in_run = true;
            }
        } else if in_run {
            start = i;
            in_run = false;
        }
    }
    segments.push(if in_run { "" } else { text[start..].trim() });
    segments
}

/// Return the sentence a 1-indexed mention `position` refers to.
///
/// Indexes [`delimited_segments`], so blank segments between delimiter runs
/// keep their slot. Trailing blank segments are dropped and the index is
/// clamped into `[0, len - 1]`. Text with no non-blank segment falls back to
/// the whole (trimmed) text as a single sentence.
#[must_use]
pub fn sentence_at_position(text: &str, position: u32) -> &str {
    let mut segments = delimited_segments(text);
    while segments.last().is_some_and(|s| s.is_empty()) {
        segments.pop();
    }
    if segments.is_empty() {
        return text.trim();
    }
    let index = usize::try_from(position.saturating_sub(1)).unwrap_or(usize::MAX);
    segments[index.min(segments.len() - 1)]
}
