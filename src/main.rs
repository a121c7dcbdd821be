use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use linedrill::config::Config;
use linedrill::learning::progress::EpisodeProgress;
use linedrill::learning::session::{LapAdvance, LearningSession};
use linedrill::parser::script::{EpisodeContent, Sentence};
use linedrill::parser::tokenizer::SentenceToken;
use linedrill::store::episode_list::EpisodeList;
use linedrill::store::json_store::JsonStore;
use linedrill::usecases;

#[derive(Parser)]
#[command(
    name = "linedrill",
    version,
    about = "Terminal dialogue memorization trainer"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[arg(long, help = "Override the data directory")]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Import a script file and create its progress record
    Import {
        file: PathBuf,
        #[arg(short, long, help = "Words per masking chunk")]
        chunk_size: Option<usize>,
    },
    /// List imported episodes and their phase
    List,
    /// Run an interactive learning session for one episode
    Learn { episode_id: String },
    /// Delete an episode's content and progress
    Delete { episode_id: String },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::load()?;
    config.validate();

    let base_dir = cli
        .data_dir
        .unwrap_or_else(|| PathBuf::from(&config.data_dir));
    let store = JsonStore::with_base_dir(base_dir)?;

    match cli.command {
        Command::Import { file, chunk_size } => {
            let text = fs::read_to_string(&file)
                .with_context(|| format!("failed to read {}", file.display()))?;
            let chunk_size = chunk_size.unwrap_or(config.chunk_size);
            let progress = usecases::import_script(&store, &text, chunk_size)?;
            let content = store.load_content(&progress.episode_id)?;
            let title = if content.title.is_empty() {
                "(untitled)"
            } else {
                &content.title
            };
            println!(
                "Imported {title}: {} sentences, {} words, {} laps",
                content.sentences.len(),
                content.all_words.len(),
                progress.initial_learning.total_laps
            );
            println!("Episode id: {}", progress.episode_id);
        }
        Command::List => cmd_list(&store)?,
        Command::Learn { episode_id } => cmd_learn(&store, &episode_id)?,
        Command::Delete { episode_id } => {
            store.delete_episode(&episode_id)?;
            println!("Deleted {episode_id}");
        }
    }

    Ok(())
}

fn cmd_list(store: &JsonStore) -> Result<()> {
    let mut list = EpisodeList::new();
    list.set(usecases::load_all_progress(store)?);
    if list.is_empty() {
        println!("No episodes imported yet.");
        return Ok(());
    }
    for progress in list.episodes() {
        let title = store
            .load_content(&progress.episode_id)
            .map(|content| content.title)
            .unwrap_or_default();
        println!(
            "{}  {:<40}  {}",
            short_id(&progress.episode_id),
            title,
            phase_label(progress)
        );
    }
    Ok(())
}

// Ids from the hash are ASCII hex, but the store lists any file stem in
// the data dir, so slice on chars rather than bytes.
fn short_id(episode_id: &str) -> String {
    episode_id.chars().take(12).collect()
}

fn phase_label(progress: &EpisodeProgress) -> String {
    let learning = &progress.initial_learning;
    if !learning.is_completed {
        format!("lap {}/{}", learning.current_lap, learning.total_laps)
    } else if let Some(index) = progress.review_phase.current_review_word_index {
        format!(
            "review {}/{}",
            index + 1,
            progress.review_phase.target_word_ids.len()
        )
    } else {
        "done".to_string()
    }
}

fn cmd_learn(store: &JsonStore, episode_id: &str) -> Result<()> {
    let content = store.load_content(episode_id)?;
    let mut progress = store.load_progress(episode_id)?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    if !content.title.is_empty() {
        println!("{}", content.title);
    }

    run_initial_phase(store, &content, &mut progress, &mut lines)?;
    run_review_phase(store, &content, &mut progress, &mut lines)?;

    println!("\nAll done.");
    Ok(())
}

fn run_initial_phase(
    store: &JsonStore,
    content: &EpisodeContent,
    progress: &mut EpisodeProgress,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    while !progress.initial_learning.is_completed {
        let current = progress.initial_learning.current_lap;
        let pending: Vec<usize> = content
            .all_words
            .iter()
            .filter(|word| current > 0 && word.masked_in_initial_lap == current)
            .map(|word| word.id)
            .filter(|&id| !progress.word_status[id].is_correct_initial.is_answered())
            .collect();

        if pending.is_empty() {
            let advance = LearningSession::new(content, progress)?.advance_lap()?;
            store.save_progress(progress)?;
            match advance {
                LapAdvance::CompletedInitial => {
                    println!("\nInitial learning complete.");
                    break;
                }
                LapAdvance::EnteredLap(lap) => {
                    println!("\n== Lap {lap} of {} ==", progress.initial_learning.total_laps);
                }
                LapAdvance::LapUnfinished => continue,
            }
            continue;
        }

        for word_id in pending {
            let correct = quiz_word(content, word_id, lines)?;
            LearningSession::new(content, progress)?.judge_initial(word_id, correct)?;
            store.save_progress(progress)?;
        }
    }
    Ok(())
}

fn run_review_phase(
    store: &JsonStore,
    content: &EpisodeContent,
    progress: &mut EpisodeProgress,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<()> {
    if progress.review_phase.current_review_word_index.is_none() {
        if progress.review_phase.target_word_ids.is_empty() {
            println!("\nNothing was flagged for review.");
        }
        return Ok(());
    }

    println!(
        "\n== Review: {} words ==",
        progress.review_phase.target_word_ids.len()
    );
    loop {
        let word_id = {
            let session = LearningSession::new(content, progress)?;
            match session.current_review_word_id() {
                Some(id) => id,
                None => break,
            }
        };
        let correct = quiz_word(content, word_id, lines)?;
        {
            let mut session = LearningSession::new(content, progress)?;
            session.judge_review(correct)?;
        }
        store.save_progress(progress)?;
    }
    println!("\nReview complete.");
    Ok(())
}

/// Show the word's sentence with the word blanked out, wait for the
/// learner to recall it, reveal it, and ask for a self-judgment.
fn quiz_word(
    content: &EpisodeContent,
    word_id: usize,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<bool> {
    let word = &content.all_words[word_id];
    let sentence = &content.sentences[word.sentence_id];
    println!("\n{}", masked_sentence(sentence, word_id));
    print!("Recall the hidden word, then press Enter to reveal ");
    io::stdout().flush()?;
    read_line(lines)?;
    println!("-> {}", word.text);
    ask_yes_no(lines, "Did you get it right? [y/n] ")
}

fn masked_sentence(sentence: &Sentence, hidden_word_id: usize) -> String {
    let mut out = String::new();
    for token in &sentence.tokens {
        match token {
            SentenceToken::Word { word_id, text } if *word_id == hidden_word_id => {
                out.push_str(&"_".repeat(text.chars().count()));
            }
            other => other.push_text(&mut out),
        }
    }
    out
}

fn read_line(lines: &mut impl Iterator<Item = io::Result<String>>) -> Result<String> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => bail!("stdin closed before the session finished"),
    }
}

fn ask_yes_no(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    prompt: &str,
) -> Result<bool> {
    loop {
        print!("{prompt}");
        io::stdout().flush()?;
        match read_line(lines)?.trim().to_lowercase().as_str() {
            "y" | "yes" => return Ok(true),
            "n" | "no" => return Ok(false),
            _ => println!("Please answer y or n."),
        }
    }
}
