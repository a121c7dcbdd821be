use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::parser::script::EpisodeContent;

/// Self-judgment outcome for one word in one phase. `Unanswered` doubles
/// as "not applicable" for words that never enter the review phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Judgment {
    Unanswered,
    Correct,
    Incorrect,
}

impl Judgment {
    pub fn is_answered(self) -> bool {
        !matches!(self, Judgment::Unanswered)
    }

    pub fn from_correct(correct: bool) -> Self {
        if correct {
            Judgment::Correct
        } else {
            Judgment::Incorrect
        }
    }
}

/// Per-word learning state, aligned 1:1 with `EpisodeContent::all_words`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordStatus {
    pub id: usize,
    pub is_correct_initial: Judgment,
    pub is_correct_review: Judgment,
    /// Set when the word is judged incorrect during initial learning;
    /// never cleared for the lifetime of the episode.
    pub needs_review: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitialLearning {
    /// 0 = not started; laps run `1..=total_laps`.
    pub current_lap: u32,
    pub total_laps: u32,
    pub is_completed: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewPhase {
    /// Word ids flagged `needs_review` when initial learning completed,
    /// ascending, no duplicates. Fixed for the rest of the episode.
    pub target_word_ids: Vec<usize>,
    /// Index into `target_word_ids`; `None` while idle (not started, or
    /// every target judged correct).
    pub current_review_word_index: Option<usize>,
}

/// Mutable learning state for one episode. Created once right after
/// parsing, then mutated in place as the learner answers words.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeProgress {
    pub episode_id: String,
    pub word_status: Vec<WordStatus>,
    pub initial_learning: InitialLearning,
    pub review_phase: ReviewPhase,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_learned_timestamp: Option<DateTime<Utc>>,
}

/// Derive the initial progress record for a freshly parsed episode:
/// every judgment unanswered, nothing flagged for review, lap counter at
/// zero. `total_laps` is the largest assigned masking lap, or 1 for an
/// empty episode so the phase is trivially sized rather than zero-sized.
pub fn initialize_progress(content: &EpisodeContent) -> EpisodeProgress {
    let word_status = content
        .all_words
        .iter()
        .map(|word| WordStatus {
            id: word.id,
            is_correct_initial: Judgment::Unanswered,
            is_correct_review: Judgment::Unanswered,
            needs_review: false,
        })
        .collect();

    let total_laps = content
        .all_words
        .iter()
        .map(|word| word.masked_in_initial_lap)
        .max()
        .unwrap_or(1);

    EpisodeProgress {
        episode_id: content.episode_id.clone(),
        word_status,
        initial_learning: InitialLearning {
            current_lap: 0,
            total_laps,
            is_completed: false,
        },
        review_phase: ReviewPhase {
            target_word_ids: Vec::new(),
            current_review_word_index: None,
        },
        last_learned_timestamp: None,
    }
}
