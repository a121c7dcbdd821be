use serde::{Deserialize, Serialize};

/// A single lexical unit of an episode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    /// Unique within the episode, 0-based, in order of first appearance.
    pub id: usize,
    pub text: String,
    pub sentence_id: usize,
    /// Lap (1-based, within the word's chunk) during which the word is
    /// hidden in the initial-learning phase. Left at 0 by the tokenizer;
    /// the script parser's assignment pass sets the real value.
    pub masked_in_initial_lap: u32,
}

/// One token of a sentence: either a reference to a [`Word`] or a single
/// literal character (punctuation, whitespace, non-ASCII text).
///
/// Concatenating a sentence's token texts in order reproduces its
/// original text exactly.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SentenceToken {
    Word { word_id: usize, text: String },
    Char { text: char },
}

impl SentenceToken {
    pub fn push_text(&self, out: &mut String) {
        match self {
            SentenceToken::Word { text, .. } => out.push_str(text),
            SentenceToken::Char { text } => out.push(*text),
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '\''
}

/// Split one line into tokens and the words it introduces.
///
/// Maximal runs of `[A-Za-z0-9']` become word tokens consuming
/// sequential ids starting at `next_word_id`; every other character is
/// its own char token. Nothing is grouped or dropped.
pub fn tokenize_line(
    line: &str,
    sentence_id: usize,
    next_word_id: usize,
) -> (Vec<SentenceToken>, Vec<Word>) {
    let mut tokens = Vec::new();
    let mut words: Vec<Word> = Vec::new();
    let mut run = String::new();

    let flush = |run: &mut String, tokens: &mut Vec<SentenceToken>, words: &mut Vec<Word>| {
        if run.is_empty() {
            return;
        }
        let word_id = next_word_id + words.len();
        let text = std::mem::take(run);
        tokens.push(SentenceToken::Word {
            word_id,
            text: text.clone(),
        });
        words.push(Word {
            id: word_id,
            text,
            sentence_id,
            masked_in_initial_lap: 0,
        });
    };

    for c in line.chars() {
        if is_word_char(c) {
            run.push(c);
        } else {
            flush(&mut run, &mut tokens, &mut words);
            tokens.push(SentenceToken::Char { text: c });
        }
    }
    flush(&mut run, &mut tokens, &mut words);

    (tokens, words)
}
