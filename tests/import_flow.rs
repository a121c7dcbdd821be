//! End-to-end walk through a whole episode: import, initial learning
//! with a few misses, review, with the progress record persisted and
//! reloaded between every step the way the CLI does it.

use tempfile::TempDir;

use linedrill::learning::progress::Judgment;
use linedrill::learning::session::{LapAdvance, LearningSession};
use linedrill::store::json_store::JsonStore;
use linedrill::usecases;

const SCRIPT: &str = "\
# Sample Anime Episode Script - Episode 001
# Character: Sakura, Takeshi

Hello, my name is Sakura.
Nice to meet you, Takeshi. How are you today?
I am fine, thank you.

This is a beautiful day.
Would you like to go shopping?
Yes, let's go to the mall.
What do you want to buy?
I need some new clothes.
The weather is really nice today.";

fn make_test_store() -> (TempDir, JsonStore) {
    let dir = TempDir::new().unwrap();
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    (dir, store)
}

#[test]
fn test_full_episode_lifecycle() {
    let (_dir, store) = make_test_store();

    let progress = usecases::import_script(&store, SCRIPT, 6).unwrap();
    let episode_id = progress.episode_id.clone();
    let content = store.load_content(&episode_id).unwrap();

    assert_eq!(content.sentences.len(), 9);
    assert!(!content.title.is_empty());
    assert_eq!(progress.word_status.len(), content.all_words.len());

    // Every third word gets judged incorrect during its lap.
    let wrong: Vec<usize> = content
        .all_words
        .iter()
        .map(|w| w.id)
        .filter(|id| id % 3 == 0)
        .collect();

    // Initial learning, reloading progress from disk each lap.
    loop {
        let mut progress = store.load_progress(&episode_id).unwrap();
        let advance = {
            let mut session = LearningSession::new(&content, &mut progress).unwrap();
            match session.advance_lap().unwrap() {
                LapAdvance::CompletedInitial => LapAdvance::CompletedInitial,
                LapAdvance::EnteredLap(lap) => {
                    for id in session.current_lap_word_ids() {
                        session.judge_initial(id, !wrong.contains(&id)).unwrap();
                    }
                    LapAdvance::EnteredLap(lap)
                }
                LapAdvance::LapUnfinished => panic!("lap left unfinished"),
            }
        };
        store.save_progress(&progress).unwrap();
        if advance == LapAdvance::CompletedInitial {
            break;
        }
    }

    // Review targets are exactly the missed words, ascending.
    let mut progress = store.load_progress(&episode_id).unwrap();
    assert!(progress.initial_learning.is_completed);
    assert_eq!(progress.review_phase.target_word_ids, wrong);
    assert_eq!(progress.review_phase.current_review_word_index, Some(0));
    assert!(progress.last_learned_timestamp.is_some());

    // Review: fail the first word once, then answer everything correct.
    {
        let mut session = LearningSession::new(&content, &mut progress).unwrap();
        let first = session.current_review_word_id().unwrap();
        session.judge_review(false).unwrap();
        assert_eq!(session.current_review_word_id(), Some(first));
        while !session.review_complete() {
            session.judge_review(true).unwrap();
        }
    }
    store.save_progress(&progress).unwrap();

    let final_progress = store.load_progress(&episode_id).unwrap();
    assert_eq!(final_progress.review_phase.current_review_word_index, None);
    for &id in &wrong {
        assert_eq!(
            final_progress.word_status[id].is_correct_review,
            Judgment::Correct
        );
        assert!(final_progress.word_status[id].needs_review);
    }
    for status in &final_progress.word_status {
        if !wrong.contains(&status.id) {
            assert_eq!(status.is_correct_review, Judgment::Unanswered);
        }
    }
}

#[test]
fn test_reimporting_identical_script_fails_but_keeps_state() {
    let (_dir, store) = make_test_store();
    let progress = usecases::import_script(&store, SCRIPT, 6).unwrap();

    assert!(usecases::import_script(&store, SCRIPT, 6).is_err());

    // The original records are untouched.
    let reloaded = store.load_progress(&progress.episode_id).unwrap();
    assert_eq!(reloaded, progress);
    assert_eq!(usecases::load_all_progress(&store).unwrap().len(), 1);
}
