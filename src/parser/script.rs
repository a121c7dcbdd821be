use chrono::{DateTime, Utc};
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::parser::tokenizer::{self, SentenceToken, Word};

/// One non-empty, non-comment line of the script.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sentence {
    /// Unique within the episode, 0-based, in document order.
    pub id: usize,
    /// The trimmed source line.
    pub original_text: String,
    pub tokens: Vec<SentenceToken>,
}

/// Immutable parse result for one script. Created once at import time,
/// read-only thereafter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeContent {
    /// Opaque identifier, typically the content hash of the raw script.
    pub episode_id: String,
    /// Extracted from the first `#` line; empty if the script has none.
    pub title: String,
    pub sentences: Vec<Sentence>,
    /// Flat list of every word in the episode, ordered by id, so
    /// `all_words[i].id == i`.
    pub all_words: Vec<Word>,
    pub imported_timestamp: DateTime<Utc>,
}

/// Parse a full script into an [`EpisodeContent`].
///
/// The first line whose trimmed form starts with `#` becomes the title
/// (marker and following whitespace stripped). Every other `#` line and
/// every blank line is skipped whole; skipping is all-or-nothing per
/// physical line. Remaining lines tokenize in document order.
///
/// `all_words` is then partitioned into consecutive chunks of
/// `chunk_size` (the last chunk may be shorter) and each chunk gets a
/// shuffled assignment of lap numbers `1..=len`, so during initial
/// learning every lap hides exactly one new batch of words per chunk.
///
/// The RNG is injected so tests can seed it; production callers pass
/// `SmallRng::from_entropy()`. Empty input is fine and yields an empty
/// episode; `chunk_size == 0` is a contract violation.
pub fn parse_script(
    text: &str,
    episode_id: &str,
    chunk_size: usize,
    rng: &mut impl Rng,
) -> Result<EpisodeContent> {
    if chunk_size == 0 {
        return Err(Error::InvalidArgument(
            "chunk size must be at least 1".to_string(),
        ));
    }

    let mut title = String::new();
    let mut found_title = false;
    let mut sentences: Vec<Sentence> = Vec::new();
    let mut all_words: Vec<Word> = Vec::new();

    for line in text.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix('#') {
            if !found_title {
                title = rest.trim_start().to_string();
                found_title = true;
            }
            continue;
        }
        if trimmed.is_empty() {
            continue;
        }
        let sentence_id = sentences.len();
        let (tokens, words) = tokenizer::tokenize_line(trimmed, sentence_id, all_words.len());
        sentences.push(Sentence {
            id: sentence_id,
            original_text: trimmed.to_string(),
            tokens,
        });
        all_words.extend(words);
    }

    assign_masking_laps(&mut all_words, chunk_size, rng);

    Ok(EpisodeContent {
        episode_id: episode_id.to_string(),
        title,
        sentences,
        all_words,
        imported_timestamp: Utc::now(),
    })
}

/// Give every word in each `chunk_size` slice a distinct lap in
/// `1..=len`, uniformly shuffled (Fisher-Yates via `SliceRandom`).
fn assign_masking_laps(words: &mut [Word], chunk_size: usize, rng: &mut impl Rng) {
    for chunk in words.chunks_mut(chunk_size) {
        let mut laps: Vec<u32> = (1..=chunk.len() as u32).collect();
        laps.shuffle(rng);
        for (word, lap) in chunk.iter_mut().zip(laps) {
            word.masked_in_initial_lap = lap;
        }
    }
}
