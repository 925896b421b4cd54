use std::fs::File;
use std::io::{prelude::*, BufReader};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Instant;

use clap::Parser;
use langid::{Trainer, VectorizerParams};
use langid_rules::{SanitizerKind, StringFilter};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Clone, Debug)]
struct LabeledPath {
    label: String,
    path: PathBuf,
}

impl FromStr for LabeledPath {
    type Err = &'static str;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (label, path) = s.split_once('=').ok_or("expected LABEL=PATH")?;
        if label.is_empty() || path.is_empty() {
            return Err("expected LABEL=PATH");
        }
        Ok(Self {
            label: label.to_string(),
            path: PathBuf::from(path),
        })
    }
}

#[derive(Parser, Debug)]
#[command(about = "A program to train language identification models.")]
struct Args {
    /// A training corpus of one language given as LABEL=PATH, one sentence per line.
    /// Class ids follow the order of the arguments.
    #[arg(long, required = true)]
    data: Vec<LabeledPath>,

    /// The file to write the trained model to
    #[arg(long)]
    model: PathBuf,

    /// The shortest character n-gram
    #[arg(long, default_value = "3")]
    ngram_min: usize,

    /// The longest character n-gram
    #[arg(long, default_value = "5")]
    ngram_max: usize,

    /// The number of n-grams kept for each language
    #[arg(long, default_value = "1000")]
    max_features: usize,

    /// Keep n-grams that contain no letter
    #[arg(long)]
    keep_non_words: bool,

    /// Use raw term frequencies instead of 1 + ln(tf)
    #[arg(long)]
    no_sublinear_tf: bool,

    /// Weight n-grams by their inverse document frequency
    #[arg(long)]
    use_idf: bool,

    /// The sanitizer applied to each sentence: {none, v0, v1, v2}
    #[arg(long, default_value = "v1")]
    sanitizer: SanitizerKind,

    /// The zstd compression level of the model file
    #[arg(long, default_value = "19")]
    zstd_level: i32,

    /// The number of workers for zstd (0 means multithreaded will be disabled)
    #[arg(long, default_value = "0")]
    zstd_workers: u32,
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

    let params = VectorizerParams::new((args.ngram_min, args.ngram_max), args.max_features)
        .ignore_non_words(!args.keep_non_words)
        .sublinear_tf(!args.no_sublinear_tf)
        .use_idf(args.use_idf);
    let labels = args.data.iter().map(|d| d.label.clone()).collect();
    let filter = args.sanitizer.build();
    let mut trainer = Trainer::new(labels, params)?
        .preprocessor(args.sanitizer.name(), move |s: &str| filter.filter(s));

    info!("Loading dataset...");
    for (class, data) in args.data.iter().enumerate() {
        let f = BufReader::new(File::open(&data.path)?);
        let mut n_sentences = 0;
        for line in f.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            trainer.push_sample(&line, class)?;
            n_sentences += 1;
        }
        info!(label = %data.label, path = ?data.path, n_sentences, "Loaded");
    }
    info!(n_samples = trainer.n_samples(), "Start training...");

    let start = Instant::now();
    let model = trainer.train()?;
    info!(elapsed = start.elapsed().as_secs_f64(), "Finish training.");
    for (label, v) in model.labels().iter().zip(model.identifier().vectorizers()) {
        info!(label = %label, vocab_size = v.num_features(), "Vocabulary");
    }

    let mut f = zstd::Encoder::new(File::create(args.model)?, args.zstd_level)?;
    f.multithread(args.zstd_workers)?;
    model.write(&mut f)?;
    f.finish()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_labeled_path() {
        let d: LabeledPath = "de=data/de.txt".parse().unwrap();
        assert_eq!("de", d.label);
        assert_eq!(PathBuf::from("data/de.txt"), d.path);
        assert!("de".parse::<LabeledPath>().is_err());
        assert!("=data/de.txt".parse::<LabeledPath>().is_err());
    }
}
