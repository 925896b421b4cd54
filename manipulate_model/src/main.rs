use std::fs;
use std::path::PathBuf;

use clap::Parser;
use langid::Model;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(about = "A program to manipulate trained models.")]
struct Args {
    /// Input path of the model file
    #[arg(long)]
    model_in: PathBuf,

    /// Output path of the model file
    #[arg(long)]
    model_out: Option<PathBuf>,

    /// Output the vocabulary of every language as CSV.
    #[arg(long)]
    dump_vocab: Option<PathBuf>,

    /// Replace the language labels, given in class order and separated by commas.
    #[arg(long, value_delimiter = ',')]
    relabel: Option<Vec<String>>,

    /// The zstd compression level of the output model file
    #[arg(long, default_value = "19")]
    zstd_level: i32,
}

#[derive(Serialize)]
struct VocabularyRecord<'a> {
    class: usize,
    label: &'a str,
    index: usize,
    ngram: &'a str,
    weight: u64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    info!("Loading model file...");
    let mut f = zstd::Decoder::new(fs::File::open(args.model_in)?)?;
    let mut model = Model::read(&mut f)?;
    let params = model.params();
    info!(
        labels = ?model.labels(),
        sanitizer = model.sanitizer(),
        ngram_range = ?params.ngram_range(),
        max_features = params.max_features(),
        ignore_non_words = params.ignores_non_words(),
        sublinear_tf = params.is_sublinear_tf(),
        use_idf = params.uses_idf(),
        "Model loaded"
    );

    if let Some(path) = args.dump_vocab {
        info!("Saving vocabulary file...");
        let file = fs::File::create(path)?;
        let mut wtr = csv::Writer::from_writer(file);
        for (class, (label, v)) in model
            .labels()
            .iter()
            .zip(model.identifier().vectorizers())
            .enumerate()
        {
            for entry in v.vocabulary() {
                wtr.serialize(VocabularyRecord {
                    class,
                    label,
                    index: entry.index(),
                    ngram: entry.ngram(),
                    weight: entry.weight(),
                })?;
            }
        }
        wtr.flush()?;
    }

    if let Some(labels) = args.relabel {
        info!(from = ?model.labels(), to = ?labels, "Replacing labels");
        model.replace_labels(labels)?;
    }

    if let Some(path) = args.model_out {
        info!("Saving model file...");
        let mut f = zstd::Encoder::new(fs::File::create(path)?, args.zstd_level)?;
        model.write(&mut f)?;
        f.finish()?;
    }

    Ok(())
}
