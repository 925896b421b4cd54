use std::fs::File;
use std::io::{prelude::*, stdin, stdout, BufWriter};
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use langid::{Model, Prediction, Predictor};
use langid_rules::{SanitizerKind, StringFilter};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(about = "A program to identify the language of each line of the standard input.")]
struct Args {
    /// The model file to use when identifying text
    #[arg(long)]
    model: PathBuf,

    /// Append the score of every language to each output line
    #[arg(long)]
    scores: bool,

    /// Skip sentences with fewer words than this after sanitization
    #[arg(long, default_value = "0")]
    min_words: usize,

    /// Do not sanitize input lines before identification
    #[arg(long)]
    raw: bool,

    /// The number of lines identified at once
    #[arg(long, default_value = "1000")]
    batch_size: usize,
}

fn write_predictions<W>(
    out: &mut W,
    predictions: &[Prediction],
    with_scores: bool,
) -> std::io::Result<()>
where
    W: Write,
{
    for p in predictions {
        write!(out, "{}\t{}", p.label(), p.text())?;
        if with_scores {
            for s in p.scores() {
                write!(out, "\t{s:.4}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
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
    let mut f = zstd::Decoder::new(File::open(args.model)?)?;
    let model = Model::read(&mut f)?;
    info!(labels = ?model.labels(), sanitizer = model.sanitizer(), "Model loaded");

    let sanitizer: SanitizerKind = if args.raw {
        SanitizerKind::None
    } else {
        model.sanitizer().parse()?
    };
    let word_filter = sanitizer.build();
    let filter = sanitizer.build();
    let predictor = Predictor::new(model).preprocessor(move |s: &str| filter.filter(s));

    let batch_size = args.batch_size.max(1);
    let mut out = BufWriter::new(stdout().lock());
    let mut batch = Vec::with_capacity(batch_size);
    let mut n_sentences = 0;
    let mut n_skipped = 0;
    let mut n_chars = 0;
    let start = Instant::now();
    for line in stdin().lock().lines() {
        let line = line?;
        if args.min_words != 0
            && word_filter.filter(line.as_str()).split_whitespace().count() < args.min_words
        {
            n_skipped += 1;
            continue;
        }
        n_chars += line.chars().count();
        batch.push(line);
        if batch.len() == batch_size {
            write_predictions(&mut out, &predictor.predict(&batch)?, args.scores)?;
            n_sentences += batch.len();
            batch.clear();
        }
    }
    if !batch.is_empty() {
        write_predictions(&mut out, &predictor.predict(&batch)?, args.scores)?;
        n_sentences += batch.len();
    }
    out.flush()?;

    let duration = start.elapsed();
    if n_skipped != 0 {
        warn!(n_skipped, min_words = args.min_words, "Skipped short sentences");
    }
    info!(n_sentences, elapsed = duration.as_secs_f64(), "Finished");
    info!(
        "Speed: {} [sentences/sec], {} [chars/sec]",
        n_sentences as f64 / duration.as_secs_f64(),
        n_chars as f64 / duration.as_secs_f64()
    );

    Ok(())
}
