use std::{
    fs,
    io::{self, BufRead, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use nlputils::{Config, EncodeOptions, Language, SelectionPolicy, Side, Tokenizer};
use tracing_subscriber::filter::LevelFilter;

fn main() {
    if let Err(err) = run() {
        eprintln!("nlputils failed: {err:#}");
        std::process::exit(1);
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Vocabulary building and id encoding", long_about = None)]
struct Args {
    #[arg(
        short,
        long,
        value_name = "PATH",
        global = true,
        help = "Tokenizer config file (.toml or .json)"
    )]
    config: Option<PathBuf>,

    #[arg(long, global = true, help = "Override the configured language (cn, en)")]
    language: Option<Language>,

    #[arg(short, long, action = ArgAction::Count, global = true, help = "Increase log verbosity")]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Segment a corpus (one text per line) and write its vocabulary.
    BuildVocab {
        #[arg(value_name = "CORPUS")]
        corpus: PathBuf,
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
        #[arg(long, help = "Keep tokens seen more than N times")]
        min_count: Option<u64>,
        #[arg(long, conflicts_with = "min_count", help = "Keep tokens up to this frequency coverage")]
        coverage: Option<f64>,
        #[arg(long)]
        discard_stop_words: bool,
    },
    /// Encode text to ids, one line of ids per input line.
    Encode {
        #[arg(long, value_name = "PATH")]
        vocab: PathBuf,
        #[arg(help = "Text to encode; reads stdin when omitted")]
        text: Option<String>,
        #[arg(long)]
        max_length: Option<usize>,
        #[arg(long, default_value = "right")]
        padding: Side,
        #[arg(long, default_value = "right")]
        truncation: Side,
        #[arg(long)]
        discard_stop_words: bool,
    },
    /// Decode ids back to text.
    Decode {
        #[arg(long, value_name = "PATH")]
        vocab: PathBuf,
        #[arg(required = true)]
        ids: Vec<u32>,
    },
    /// Write the full tokenizer state as JSON.
    SaveState {
        #[arg(long, value_name = "PATH")]
        vocab: Option<PathBuf>,
        #[arg(short, long, value_name = "PATH")]
        output: PathBuf,
    },
}

fn run() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut tokenizer = build_tokenizer(args.config.as_deref(), args.language)?;

    match args.command {
        Command::BuildVocab {
            corpus,
            output,
            min_count,
            coverage,
            discard_stop_words,
        } => {
            let policy = match coverage {
                Some(coverage) => SelectionPolicy::Coverage(coverage),
                None => SelectionPolicy::MinCount(min_count),
            };
            let text = fs::read_to_string(&corpus)
                .with_context(|| format!("failed to read corpus {}", corpus.display()))?;
            let segmented: Vec<Vec<String>> = text
                .lines()
                .filter(|line| !line.trim().is_empty())
                .map(|line| tokenizer.segment(line, discard_stop_words))
                .collect();

            let mut builder = tokenizer.vocab_builder(policy)?;
            let size = builder.generate(&segmented).len();
            builder.save(&output)?;
            println!(
                "wrote {} tokens ({} lines) to {}",
                size,
                segmented.len(),
                output.display()
            );
        }
        Command::Encode {
            vocab,
            text,
            max_length,
            padding,
            truncation,
            discard_stop_words,
        } => {
            tokenizer.load_vocab(vocab)?;
            let options = EncodeOptions {
                max_length,
                padding,
                truncation,
                discard_stop_words,
            };
            let stdout = io::stdout();
            let mut out = stdout.lock();
            match text {
                Some(text) => write_ids(&mut out, &tokenizer.encode(&text, &options)?)?,
                None => {
                    for line in io::stdin().lock().lines() {
                        let line = line.context("failed to read stdin")?;
                        write_ids(&mut out, &tokenizer.encode(&line, &options)?)?;
                    }
                }
            }
        }
        Command::Decode { vocab, ids } => {
            tokenizer.load_vocab(vocab)?;
            println!("{}", tokenizer.decode(&ids)?);
        }
        Command::SaveState { vocab, output } => {
            if let Some(vocab) = vocab {
                tokenizer.load_vocab(vocab)?;
            }
            tokenizer.save_tokenizer_state(&output)?;
            println!("saved tokenizer state to {}", output.display());
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn build_tokenizer(config: Option<&Path>, language: Option<Language>) -> Result<Tokenizer> {
    let mut cfg = match config {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(language) = language {
        if config.is_some() && language != cfg.language {
            log::warn!("overriding configured language '{}' with '{}'", cfg.language, language);
        }
        cfg.language = language;
    }
    Ok(Tokenizer::new(&cfg)?)
}

fn write_ids(out: &mut impl Write, ids: &[u32]) -> Result<()> {
    let line = ids
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{line}")?;
    Ok(())
}
