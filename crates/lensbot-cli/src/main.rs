//! lensbot: intent classification for rental-gear support chats.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Args, Parser, Subcommand, ValueEnum};

use lensbot_ai::{DEFAULT_THRESHOLD, Model, Strategy, TextEncoder};
use lensbot_core::Corpus;

mod chat;
mod replies;

#[derive(Parser)]
#[command(name = "lensbot", version, about = "Intent classification for rental-gear support chats")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load a corpus file and report per-label example counts.
    Corpus {
        /// `text,label` CSV (last-comma split) or a JSON array of examples.
        file: PathBuf,
    },
    /// Classify a single message.
    Classify {
        #[command(flatten)]
        model: ModelArgs,
        /// The customer message to classify.
        message: String,
    },
    /// Interactive chat: classify each input line and print a canned reply.
    Chat {
        #[command(flatten)]
        model: ModelArgs,
    },
}

#[derive(Args)]
struct ModelArgs {
    /// Path to the corpus file.
    #[arg(long, env = "LENSBOT_CORPUS")]
    corpus: PathBuf,

    /// Classification strategy.
    #[arg(long, value_enum, default_value_t = StrategyArg::Linear)]
    strategy: StrategyArg,

    /// Similarity below which the embedding strategy answers "unknown".
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Directory with `model.onnx` and `tokenizer.json` (embedding strategy).
    #[arg(long, env = "LENSBOT_MODEL_DIR")]
    model_dir: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// TF-IDF label centroids; pure Rust, no model files.
    Linear,
    /// Sentence embeddings + cosine threshold; needs the `onnx` build.
    Embedding,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    tracing::info!("lensbot v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    match cli.command {
        Command::Corpus { file } => corpus_report(&file),
        Command::Classify { model, message } => {
            let model = build_model(&model)?;
            let prediction = model.predict(&message)?;
            println!("{}\t{:.3}", prediction.intent, prediction.score);
            Ok(())
        }
        Command::Chat { model } => {
            let model = build_model(&model)?;
            chat::run(&model)
        }
    }
}

fn corpus_report(file: &Path) -> anyhow::Result<()> {
    let corpus = load_corpus(file)?;
    println!("{} examples", corpus.len());
    for (label, count) in corpus.label_counts() {
        println!("{count:>6}  {label}");
    }
    Ok(())
}

fn load_corpus(path: &Path) -> anyhow::Result<Corpus> {
    let corpus = if path.extension().is_some_and(|ext| ext == "json") {
        Corpus::from_json_path(path)
    } else {
        Corpus::from_csv_path(path)
    }
    .with_context(|| format!("loading corpus from {}", path.display()))?;
    Ok(corpus)
}

fn build_model(args: &ModelArgs) -> anyhow::Result<Model> {
    let corpus = load_corpus(&args.corpus)?;
    let strategy = match args.strategy {
        StrategyArg::Linear => Strategy::Linear,
        StrategyArg::Embedding => Strategy::Embedding {
            encoder: onnx_encoder(args)?,
            threshold: args.threshold,
        },
    };
    Ok(Model::build(&corpus, strategy)?)
}

#[cfg(feature = "onnx")]
fn onnx_encoder(args: &ModelArgs) -> anyhow::Result<Arc<dyn TextEncoder>> {
    let dir = args
        .model_dir
        .as_deref()
        .context("--model-dir is required for the embedding strategy")?;
    Ok(Arc::new(lensbot_ai::OnnxEncoder::load(dir)?))
}

#[cfg(not(feature = "onnx"))]
fn onnx_encoder(_args: &ModelArgs) -> anyhow::Result<Arc<dyn TextEncoder>> {
    anyhow::bail!("the embedding strategy requires a build with the `onnx` feature")
}
