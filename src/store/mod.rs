pub mod episode_list;
pub mod json_store;

pub use episode_list::EpisodeList;
pub use json_store::JsonStore;
