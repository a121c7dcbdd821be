use crate::learning::progress::EpisodeProgress;

/// Presentation-side cache of progress records, one per episode id.
/// Every mutation bumps `version`, so a render loop can poll cheaply for
/// changes instead of diffing records. Not part of the learning core's
/// correctness surface.
#[derive(Debug, Default)]
pub struct EpisodeList {
    episodes: Vec<EpisodeProgress>,
    version: u64,
}

impl EpisodeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn episodes(&self) -> &[EpisodeProgress] {
        &self.episodes
    }

    pub fn get(&self, episode_id: &str) -> Option<&EpisodeProgress> {
        self.episodes.iter().find(|e| e.episode_id == episode_id)
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace the whole list.
    pub fn set(&mut self, episodes: Vec<EpisodeProgress>) {
        self.episodes = episodes;
        self.version += 1;
    }

    pub fn add(&mut self, episode: EpisodeProgress) {
        self.episodes.push(episode);
        self.version += 1;
    }

    /// Replace the record with a matching id; a miss changes nothing.
    pub fn update(&mut self, episode: EpisodeProgress) {
        if let Some(slot) = self
            .episodes
            .iter_mut()
            .find(|e| e.episode_id == episode.episode_id)
        {
            *slot = episode;
            self.version += 1;
        }
    }

    pub fn remove(&mut self, episode_id: &str) {
        let before = self.episodes.len();
        self.episodes.retain(|e| e.episode_id != episode_id);
        if self.episodes.len() != before {
            self.version += 1;
        }
    }

    pub fn clear(&mut self) {
        self.episodes.clear();
        self.version += 1;
    }
}
