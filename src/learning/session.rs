use chrono::Utc;

use crate::error::{Error, Result};
use crate::learning::progress::{EpisodeProgress, Judgment};
use crate::parser::script::EpisodeContent;

/// Outcome of [`LearningSession::advance_lap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LapAdvance {
    /// Now in lap `n` of the initial-learning phase.
    EnteredLap(u32),
    /// Final lap finished; review targets are populated and the review
    /// phase is active (or trivially complete when nothing was missed).
    CompletedInitial,
    /// The current lap still has unanswered words; nothing changed.
    LapUnfinished,
}

/// The per-episode state machine: borrows the immutable parse result and
/// mutates one progress record through lap advancement and judgments.
///
/// Initial learning runs `current_lap` from 0 through `total_laps`; a lap
/// only closes once every word masked in it has a recorded judgment.
/// Completion populates the review targets from `needs_review` flags.
/// Review then walks `target_word_ids` front to back, retrying each word
/// until it is judged correct.
pub struct LearningSession<'a> {
    content: &'a EpisodeContent,
    progress: &'a mut EpisodeProgress,
}

impl<'a> LearningSession<'a> {
    pub fn new(content: &'a EpisodeContent, progress: &'a mut EpisodeProgress) -> Result<Self> {
        if content.episode_id != progress.episode_id {
            return Err(Error::InvalidArgument(format!(
                "progress record {} does not belong to episode {}",
                progress.episode_id, content.episode_id
            )));
        }
        if content.all_words.len() != progress.word_status.len()
            || progress.word_status.iter().enumerate().any(|(i, s)| s.id != i)
        {
            return Err(Error::InvalidArgument(
                "word status list is not aligned with the episode's words".to_string(),
            ));
        }
        // A progress file can deserialize cleanly and still carry a
        // review phase that does not fit this episode; reject it here so
        // no judgment path ever indexes out of bounds.
        let review = &progress.review_phase;
        if review
            .target_word_ids
            .iter()
            .any(|&id| id >= content.all_words.len())
            || review
                .current_review_word_index
                .is_some_and(|index| index >= review.target_word_ids.len())
        {
            return Err(Error::InvalidArgument(
                "review phase is not consistent with the episode's words".to_string(),
            ));
        }
        Ok(Self { content, progress })
    }

    /// Ids of the words hidden during `lap`, in first-appearance order.
    pub fn lap_word_ids(&self, lap: u32) -> Vec<usize> {
        self.content
            .all_words
            .iter()
            .filter(|word| word.masked_in_initial_lap == lap)
            .map(|word| word.id)
            .collect()
    }

    pub fn current_lap_word_ids(&self) -> Vec<usize> {
        self.lap_word_ids(self.progress.initial_learning.current_lap)
    }

    /// True once every word masked in `lap` has a recorded judgment.
    pub fn lap_complete(&self, lap: u32) -> bool {
        self.lap_word_ids(lap)
            .into_iter()
            .all(|id| self.progress.word_status[id].is_correct_initial.is_answered())
    }

    /// Move the initial-learning phase forward. Entering lap 1 from the
    /// unstarted state always succeeds; every later step requires the
    /// current lap to be fully judged. Finishing the final lap flips
    /// `is_completed` (exactly once) and enters the review phase.
    pub fn advance_lap(&mut self) -> Result<LapAdvance> {
        if self.progress.initial_learning.is_completed {
            return Err(Error::InvalidArgument(
                "initial learning is already completed".to_string(),
            ));
        }
        let current = self.progress.initial_learning.current_lap;
        if current > 0 && !self.lap_complete(current) {
            return Ok(LapAdvance::LapUnfinished);
        }
        if current >= self.progress.initial_learning.total_laps {
            self.progress.initial_learning.is_completed = true;
            self.enter_review();
            Ok(LapAdvance::CompletedInitial)
        } else {
            self.progress.initial_learning.current_lap = current + 1;
            Ok(LapAdvance::EnteredLap(current + 1))
        }
    }

    fn enter_review(&mut self) {
        let targets: Vec<usize> = self
            .progress
            .word_status
            .iter()
            .filter(|status| status.needs_review)
            .map(|status| status.id)
            .collect();
        self.progress.review_phase.current_review_word_index =
            if targets.is_empty() { None } else { Some(0) };
        self.progress.review_phase.target_word_ids = targets;
    }

    /// Record a self-judgment for a word masked in the current lap. An
    /// incorrect judgment flags the word for review permanently; a later
    /// correct judgment does not unflag it.
    pub fn judge_initial(&mut self, word_id: usize, correct: bool) -> Result<()> {
        let lap = self.progress.initial_learning.current_lap;
        if lap == 0 || self.progress.initial_learning.is_completed {
            return Err(Error::InvalidArgument(
                "no initial-learning lap is active".to_string(),
            ));
        }
        let word = self.content.all_words.get(word_id).ok_or_else(|| {
            Error::InvalidArgument(format!("unknown word id {word_id}"))
        })?;
        if word.masked_in_initial_lap != lap {
            return Err(Error::InvalidArgument(format!(
                "word {word_id} is not masked in lap {lap}"
            )));
        }

        let status = &mut self.progress.word_status[word_id];
        status.is_correct_initial = Judgment::from_correct(correct);
        if !correct {
            status.needs_review = true;
        }
        self.touch();
        Ok(())
    }

    /// The word the learner is currently reviewing, if the phase is
    /// active.
    pub fn current_review_word_id(&self) -> Option<usize> {
        self.progress
            .review_phase
            .current_review_word_index
            .map(|index| self.progress.review_phase.target_word_ids[index])
    }

    /// Record a self-judgment for the current review word. Correct moves
    /// the index to the next target not yet judged correct (no wrap);
    /// incorrect keeps the index so the learner retries the same word.
    pub fn judge_review(&mut self, correct: bool) -> Result<()> {
        let Some(index) = self.progress.review_phase.current_review_word_index else {
            return Err(Error::InvalidArgument(
                "review phase is not active".to_string(),
            ));
        };
        let word_id = self.progress.review_phase.target_word_ids[index];
        self.progress.word_status[word_id].is_correct_review = Judgment::from_correct(correct);
        if correct {
            let next = self.progress.review_phase.target_word_ids[index + 1..]
                .iter()
                .position(|&id| self.progress.word_status[id].is_correct_review != Judgment::Correct)
                .map(|offset| index + 1 + offset);
            self.progress.review_phase.current_review_word_index = next;
        }
        self.touch();
        Ok(())
    }

    /// True once initial learning is done and no review target remains
    /// unanswered (including the trivial case of an empty target set).
    pub fn review_complete(&self) -> bool {
        self.progress.initial_learning.is_completed
            && self.progress.review_phase.current_review_word_index.is_none()
    }

    fn touch(&mut self) {
        self.progress.last_learned_timestamp = Some(Utc::now());
    }
}
