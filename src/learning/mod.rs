pub mod progress;
pub mod session;

pub use progress::{EpisodeProgress, Judgment, WordStatus, initialize_progress};
pub use session::{LapAdvance, LearningSession};
