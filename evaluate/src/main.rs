use std::fs::File;
use std::io::{prelude::*, BufReader};
use std::path::PathBuf;
use std::str::FromStr;

use clap::Parser;
use langid::{ConfusionMatrix, Model, Predictor};
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
#[command(about = "A program to evaluate the accuracy of language identification models.")]
struct Args {
    /// The model file to evaluate
    #[arg(long)]
    model: PathBuf,

    /// A test corpus of one language given as LABEL=PATH, one sentence per line.
    /// LABEL must be one of the labels of the model.
    #[arg(long, required = true)]
    data: Vec<LabeledPath>,

    /// Print up to this number of misclassified sentences
    #[arg(long, default_value = "0")]
    show_errors: usize,
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
    let sanitizer: SanitizerKind = model.sanitizer().parse()?;
    let filter = sanitizer.build();
    let labels = model.labels().to_vec();
    let predictor = Predictor::new(model).preprocessor(move |s: &str| filter.filter(s));

    info!("Loading dataset...");
    let mut texts = vec![];
    let mut expected = vec![];
    for data in &args.data {
        let class = labels
            .iter()
            .position(|l| *l == data.label)
            .ok_or_else(|| format!("unknown label {:?}, expected one of {labels:?}", data.label))?;
        let f = BufReader::new(File::open(&data.path)?);
        for line in f.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            texts.push(line);
            expected.push(class);
        }
    }
    info!(n_sentences = texts.len(), "Start evaluation");

    let predictions = predictor.predict(&texts)?;
    let predicted: Vec<usize> = predictions.iter().map(|p| p.class()).collect();
    let matrix = ConfusionMatrix::from_predictions(&expected, &predicted, labels.len())?;

    println!(
        "Accuracy: {:.4} ({}/{})",
        matrix.accuracy(),
        matrix.correct(),
        matrix.total()
    );
    println!();
    println!("label\tprecision\trecall\tf1\tsupport");
    for (class, label) in labels.iter().enumerate() {
        let r = matrix.report(class);
        println!(
            "{label}\t{:.4}\t{:.4}\t{:.4}\t{}",
            r.precision, r.recall, r.f1, r.support
        );
    }
    let avg = matrix.macro_average();
    println!(
        "macro avg\t{:.4}\t{:.4}\t{:.4}\t{}",
        avg.precision, avg.recall, avg.f1, avg.support
    );
    println!();
    println!("Confusion matrix (rows: expected, columns: predicted)");
    println!("\t{}", labels.join("\t"));
    for (label, row) in labels.iter().zip(matrix.to_string().lines()) {
        println!("{label}\t{row}");
    }
    println!();
    println!("Errors per language");
    for (class, label) in labels.iter().enumerate() {
        println!(
            "{label}\t{}/{}",
            matrix.errors(class),
            matrix.support(class)
        );
    }

    if args.show_errors != 0 {
        println!();
        println!("expected\tpredicted\ttext");
        for (p, &e) in predictions
            .iter()
            .zip(&expected)
            .filter(|(p, e)| p.class() != **e)
            .take(args.show_errors)
        {
            println!("{}\t{}\t{}", labels[e], p.label(), p.text());
        }
    }

    Ok(())
}
