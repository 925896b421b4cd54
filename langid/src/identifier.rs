use std::fmt;

#[cfg(feature = "multithreading")]
use rayon::prelude::*;
use tracing::debug;

use crate::errors::{LangidError, Result};
use crate::vectorizer::{NgramVectorizer, VectorizerParams};

/// Aggregate activations of a batch of texts, one row per text and one column per class.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoreMatrix {
    n_classes: usize,
    scores: Vec<f64>,
}

impl ScoreMatrix {
    fn from_columns(n_rows: usize, columns: &[Vec<f64>]) -> Self {
        let n_classes = columns.len();
        let mut scores = vec![0.0; n_rows * n_classes];
        for (class, column) in columns.iter().enumerate() {
            for (row, &score) in column.iter().enumerate() {
                scores[row * n_classes + class] = score;
            }
        }
        Self { n_classes, scores }
    }

    pub fn n_rows(&self) -> usize {
        if self.n_classes == 0 {
            0
        } else {
            self.scores.len() / self.n_classes
        }
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    /// Scores of the `i`-th text.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.scores[i * self.n_classes..(i + 1) * self.n_classes]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.scores.chunks(self.n_classes.max(1))
    }

    /// Class with the highest score for the `i`-th text. Ties go to the lowest class id.
    pub fn argmax(&self, i: usize) -> usize {
        first_argmax(self.row(i))
    }
}

impl fmt::Display for ScoreMatrix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.rows() {
            let cells: Vec<_> = row.iter().map(|s| format!("{s:.4}")).collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

pub(crate) fn first_argmax(xs: &[f64]) -> usize {
    let mut best = 0;
    for (i, &x) in xs.iter().enumerate().skip(1) {
        if x > xs[best] {
            best = i;
        }
    }
    best
}

/// Per-class language identifier.
///
/// Holds one [`NgramVectorizer`] per class, each trained only on the samples of its class,
/// and labels a text with the class whose vocabulary it activates the most.
///
/// # Examples
///
/// ```
/// use langid::{Identifier, VectorizerParams};
///
/// let mut identifier = Identifier::new(VectorizerParams::new((1, 3), 100));
/// identifier
///     .fit(&["guten tag", "bonjour", "good morning"], &[0, 1, 2], 3)
///     .unwrap();
/// assert_eq!(vec![1], identifier.predict(&["bonjour madame"]).unwrap());
/// ```
#[derive(Clone, Debug)]
pub struct Identifier {
    params: VectorizerParams,
    vectorizers: Vec<NgramVectorizer>,
}

impl Identifier {
    /// Creates an untrained identifier.
    ///
    /// # Arguments
    ///
    /// * `params` - Parameters given to the vectorizer of every class.
    pub fn new(params: VectorizerParams) -> Self {
        Self {
            params,
            vectorizers: vec![],
        }
    }

    pub(crate) fn from_vectorizers(params: VectorizerParams, vectorizers: Vec<NgramVectorizer>) -> Self {
        Self {
            params,
            vectorizers,
        }
    }

    /// Trains one vectorizer per class.
    ///
    /// # Arguments
    ///
    /// * `samples` - Training texts.
    /// * `labels` - Class id of each text.
    /// * `n_classes` - Number of classes. Every id in `0..n_classes` needs at least one sample.
    ///
    /// # Errors
    ///
    /// [`LangidError::DimensionMismatch`] is returned if `samples` and `labels` differ in
    /// length, a label is out of range or a class has no sample.
    /// [`LangidError::InvalidArgument`] is returned if the vectorizer parameters are invalid.
    /// On error, the previously trained vectorizers are kept.
    pub fn fit<S>(&mut self, samples: &[S], labels: &[usize], n_classes: usize) -> Result<()>
    where
        S: AsRef<str> + Sync,
    {
        let partitions = partition(samples, labels, n_classes)?;
        self.params.validate()?;
        debug!(n_samples = samples.len(), n_classes, "Fitting Identifier");

        let params = self.params;
        #[cfg(feature = "multithreading")]
        let vectorizers = partitions
            .par_iter()
            .map(|corpus| NgramVectorizer::fit(corpus, params))
            .collect::<Result<Vec<_>>>()?;
        #[cfg(not(feature = "multithreading"))]
        let vectorizers = partitions
            .iter()
            .map(|corpus| NgramVectorizer::fit(corpus, params))
            .collect::<Result<Vec<_>>>()?;

        for (class, v) in vectorizers.iter().enumerate() {
            debug!(class, vocab_size = v.num_features(), "Class vectorizer fitted");
        }
        self.vectorizers = vectorizers;
        Ok(())
    }

    /// Predicts the class of each text.
    ///
    /// # Errors
    ///
    /// [`LangidError::InvalidModel`] is returned if the identifier has not been trained.
    pub fn predict<S>(&self, texts: &[S]) -> Result<Vec<usize>>
    where
        S: AsRef<str> + Sync,
    {
        self.predict_with_scores(texts).map(|(labels, _)| labels)
    }

    /// Predicts the class of each text and returns the per-class scores alongside.
    ///
    /// A text without any known n-gram gets an all-zero score row and class 0.
    ///
    /// # Errors
    ///
    /// [`LangidError::InvalidModel`] is returned if the identifier has not been trained.
    pub fn predict_with_scores<S>(&self, texts: &[S]) -> Result<(Vec<usize>, ScoreMatrix)>
    where
        S: AsRef<str> + Sync,
    {
        if !self.is_fitted() {
            return Err(LangidError::invalid_model("the identifier has not been trained"));
        }
        debug!(num_texts = texts.len(), "Predicting");

        let activations = |v: &NgramVectorizer| -> Vec<f64> {
            texts.iter().map(|t| v.transform_one(t.as_ref()).sum()).collect()
        };
        #[cfg(feature = "multithreading")]
        let columns: Vec<Vec<f64>> = self.vectorizers.par_iter().map(activations).collect();
        #[cfg(not(feature = "multithreading"))]
        let columns: Vec<Vec<f64>> = self.vectorizers.iter().map(activations).collect();

        let scores = ScoreMatrix::from_columns(texts.len(), &columns);
        let labels = (0..texts.len()).map(|i| scores.argmax(i)).collect();
        Ok((labels, scores))
    }

    /// Trains the identifier, then predicts the training samples.
    pub fn fit_predict<S>(
        &mut self,
        samples: &[S],
        labels: &[usize],
        n_classes: usize,
    ) -> Result<Vec<usize>>
    where
        S: AsRef<str> + Sync,
    {
        self.fit(samples, labels, n_classes)?;
        self.predict(samples)
    }

    /// Number of classes seen by the last successful fit.
    pub fn n_classes(&self) -> usize {
        self.vectorizers.len()
    }

    pub fn is_fitted(&self) -> bool {
        !self.vectorizers.is_empty()
    }

    /// Vectorizers ordered by class id.
    pub fn vectorizers(&self) -> &[NgramVectorizer] {
        &self.vectorizers
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }
}

/// Groups samples by class, checking labels first.
fn partition<'a, S>(samples: &'a [S], labels: &[usize], n_classes: usize) -> Result<Vec<Vec<&'a str>>>
where
    S: AsRef<str>,
{
    if samples.len() != labels.len() {
        return Err(LangidError::dimension_mismatch(format!(
            "{} samples but {} labels",
            samples.len(),
            labels.len()
        )));
    }
    if n_classes == 0 {
        return Err(LangidError::dimension_mismatch("n_classes must be positive"));
    }
    let mut partitions = vec![vec![]; n_classes];
    for (sample, &label) in samples.iter().zip(labels) {
        let Some(partition) = partitions.get_mut(label) else {
            return Err(LangidError::dimension_mismatch(format!(
                "label {label} is out of range for {n_classes} classes"
            )));
        };
        partition.push(sample.as_ref());
    }
    if let Some(class) = partitions.iter().position(Vec::is_empty) {
        return Err(LangidError::dimension_mismatch(format!(
            "class {class} has no sample"
        )));
    }
    Ok(partitions)
}
