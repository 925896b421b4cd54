#![cfg_attr(docsrs, feature(doc_cfg))]

//! # Langid
//!
//! Langid is a language identifier built from one character n-gram vectorizer per language.
//!
//! Each vectorizer keeps the most frequent n-grams of its language. A text is scored against
//! every language by the sum of its normalized n-gram weights, and the best scoring language
//! wins.
//!
//! ## Examples
//!
//! ```no_run
//! use std::fs::File;
//! use std::io::{prelude::*, stdin, BufReader};
//!
//! use langid::{Model, Predictor};
//!
//! let mut f = BufReader::new(File::open("model.bin").unwrap());
//! let model = Model::read(&mut f).unwrap();
//! let predictor = Predictor::new(model);
//!
//! for line in stdin().lock().lines() {
//!     let p = predictor.predict_one(&line.unwrap()).unwrap();
//!     println!("{}\t{}", p.label(), p.text());
//! }
//! ```
//!
//! Per-class fitting and scoring run in parallel with the default **crate feature**
//! `multithreading`.

mod identifier;
mod metrics;
mod model;
mod predictor;
mod sparse;
mod trainer;
mod utils;
mod vectorizer;

pub mod errors;

pub use identifier::{Identifier, ScoreMatrix};
pub use metrics::{ClassReport, ConfusionMatrix};
pub use model::{Model, NO_SANITIZER};
pub use predictor::{Prediction, Predictor};
pub use sparse::SparseVector;
pub use trainer::{Preprocessor, Trainer};
pub use vectorizer::{NgramVectorizer, VectorizerParams, VocabularyEntry};
