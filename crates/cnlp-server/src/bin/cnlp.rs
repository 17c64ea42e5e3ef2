use std::io::{self, BufRead, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cnlp_dict::{LoadMode, load_count_dictionary, load_lemma_dictionary};
use cnlp_lemma::{Lemmatizer, SnowballStemmer};
use cnlp_text::{CountOptions, TransformMode, count_in_place, tokenize};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "cnlp", about = "Tokenize, lemmatize and count Dutch text")]
struct Cli {
    /// How dictionary files are read: mmap or owned.
    #[arg(long, global = true, default_value = "mmap", value_parser = parse_load_mode)]
    load_mode: LoadMode,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Tokenize stdin.
    Tokenize,
    /// Lemmatize the given words, or each line of stdin.
    Lemmatize {
        #[arg(long)]
        dict: PathBuf,
        /// Print `word/lemma` instead of just the lemma.
        #[arg(long)]
        with_word: bool,
        /// Stemmer used for words missing from the dictionary.
        #[arg(long, default_value = "dutch")]
        language: String,
        words: Vec<String>,
    },
    /// Count dictionary ids in stdin.
    Count {
        #[arg(long)]
        dict: PathBuf,
        #[arg(long)]
        lowercase: bool,
        /// identity, lemma-category, lemma or word (or its numeric code).
        #[arg(long, default_value = "identity")]
        transform: TransformMode,
    },
}

fn parse_load_mode(raw: &str) -> Result<LoadMode, String> {
    LoadMode::parse(raw).ok_or_else(|| format!("invalid load mode {raw:?}, expected mmap or owned"))
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    match cli.cmd {
        Command::Tokenize => {
            let text = read_stdin()?;
            writeln!(out, "{}", tokenize(&text))?;
        }
        Command::Lemmatize {
            dict,
            with_word,
            language,
            words,
        } => {
            let dictionary = load_lemma_dictionary(&dict, cli.load_mode)
                .with_context(|| format!("loading {}", dict.display()))?;
            let lemmatizer = Lemmatizer::new(SnowballStemmer::for_language(&language)?);
            let words = if words.is_empty() {
                io::stdin()
                    .lock()
                    .lines()
                    .collect::<io::Result<Vec<_>>>()
                    .context("reading stdin")?
            } else {
                words
            };
            for word in words.iter().map(|w| w.trim()).filter(|w| !w.is_empty()) {
                let lemma = lemmatizer.lemmatize(word, &dictionary);
                if with_word {
                    writeln!(out, "{word}/{}", lemma.text)?;
                } else {
                    writeln!(out, "{}", lemma.text)?;
                }
            }
        }
        Command::Count {
            dict,
            lowercase,
            transform,
        } => {
            let dictionary = load_count_dictionary(&dict, cli.load_mode)
                .with_context(|| format!("loading {}", dict.display()))?;
            let mut text = read_stdin()?;
            let freq = count_in_place(
                &mut text,
                &dictionary,
                CountOptions {
                    lowercase,
                    transform,
                },
            );
            for (id, n) in freq {
                writeln!(out, "{id}\t{n}")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}

fn read_stdin() -> Result<String> {
    let mut text = String::new();
    io::stdin()
        .read_to_string(&mut text)
        .context("reading stdin")?;
    Ok(text)
}
