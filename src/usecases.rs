use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::{error, trace};

use crate::error::{Error, Result};
use crate::hash;
use crate::learning::progress::{EpisodeProgress, initialize_progress};
use crate::parser::script::parse_script;
use crate::store::json_store::JsonStore;

/// Import a raw script: hash it, parse it, persist the content, and
/// create the initial progress record. The content hash is the episode
/// id, so importing byte-identical text twice fails with
/// [`Error::DuplicateImport`].
pub fn import_script(store: &JsonStore, text: &str, chunk_size: usize) -> Result<EpisodeProgress> {
    let episode_id = hash::content_id(text);
    trace!(%episode_id, "importing script");
    if store.episode_ids()?.contains(&episode_id) {
        return Err(Error::DuplicateImport(episode_id));
    }

    let mut rng = SmallRng::from_entropy();
    let content = parse_script(text, &episode_id, chunk_size, &mut rng)?;
    store.save_content(&content)?;

    let progress = initialize_progress(&content);
    store.save_progress(&progress)?;
    Ok(progress)
}

/// Load progress for every known episode. A record that fails to load is
/// logged and skipped so one corrupt file does not hide the rest.
pub fn load_all_progress(store: &JsonStore) -> Result<Vec<EpisodeProgress>> {
    trace!("loading all episode progress records");
    let mut progresses = Vec::new();
    for episode_id in store.episode_ids()? {
        match store.load_progress(&episode_id) {
            Ok(progress) => progresses.push(progress),
            Err(err) => error!(%episode_id, "failed to load progress: {err}"),
        }
    }
    Ok(progresses)
}
