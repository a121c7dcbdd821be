pub mod script;
pub mod tokenizer;

pub use script::{EpisodeContent, Sentence, parse_script};
pub use tokenizer::{SentenceToken, Word, tokenize_line};
