use tracing::debug;

use crate::errors::{LangidError, Result};
use crate::identifier::Identifier;
use crate::model::{Model, NO_SANITIZER};
use crate::vectorizer::VectorizerParams;

/// Text preprocessing function applied to every sample before n-gram extraction.
pub type Preprocessor = Box<dyn Fn(&str) -> String + Send + Sync>;

/// Trainer.
///
/// # Examples
///
/// ```
/// use langid::{Trainer, VectorizerParams};
///
/// let labels = vec!["de".to_string(), "fr".to_string()];
/// let mut trainer = Trainer::new(labels, VectorizerParams::new((2, 4), 500))
///     .unwrap()
///     .preprocessor("lowercase", |s: &str| s.to_lowercase());
/// trainer.push_sample("Das ist ein Haus", 0).unwrap();
/// trainer.push_sample("C'est une maison", 1).unwrap();
///
/// let model = trainer.train().unwrap();
/// assert_eq!("lowercase", model.sanitizer());
/// ```
pub struct Trainer {
    labels: Vec<String>,
    params: VectorizerParams,
    sanitizer_name: String,
    preprocessor: Option<Preprocessor>,
    samples: Vec<String>,
    classes: Vec<usize>,
}

impl Trainer {
    /// Creates a new trainer.
    ///
    /// # Arguments
    ///
    /// * `labels` - Class names. The class id of a label is its position.
    /// * `params` - Vectorizer parameters shared by all classes.
    ///
    /// # Errors
    ///
    /// [`LangidError::InvalidArgument`] is returned if `labels` is empty.
    pub fn new(labels: Vec<String>, params: VectorizerParams) -> Result<Self> {
        if labels.is_empty() {
            return Err(LangidError::invalid_argument("labels", "no class given"));
        }
        Ok(Self {
            labels,
            params,
            sanitizer_name: NO_SANITIZER.to_string(),
            preprocessor: None,
            samples: vec![],
            classes: vec![],
        })
    }

    /// Sets the function applied to each sample when it is added.
    ///
    /// # Arguments
    ///
    /// * `name` - Name stored in the model so that the same function can be used when predicting.
    /// * `f` - Preprocessing function.
    pub fn preprocessor<S, F>(mut self, name: S, f: F) -> Self
    where
        S: Into<String>,
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.sanitizer_name = name.into();
        self.preprocessor = Some(Box::new(f));
        self
    }

    /// Adds a sample to the dataset.
    ///
    /// # Errors
    ///
    /// [`LangidError::InvalidArgument`] is returned if `class` is not a known class id.
    pub fn push_sample<S>(&mut self, text: S, class: usize) -> Result<()>
    where
        S: AsRef<str>,
    {
        if class >= self.labels.len() {
            return Err(LangidError::invalid_argument(
                "class",
                format!("{class} is out of range for {} labels", self.labels.len()),
            ));
        }
        let text = match &self.preprocessor {
            Some(f) => f(text.as_ref()),
            None => text.as_ref().to_string(),
        };
        self.samples.push(text);
        self.classes.push(class);
        Ok(())
    }

    /// Gets the number of samples.
    pub fn n_samples(&self) -> usize {
        self.samples.len()
    }

    /// Gets the number of samples of each class.
    pub fn class_counts(&self) -> Vec<usize> {
        let mut counts = vec![0; self.labels.len()];
        for &c in &self.classes {
            counts[c] += 1;
        }
        counts
    }

    /// Trains a model.
    ///
    /// # Errors
    ///
    /// See [`Identifier::fit`].
    pub fn train(self) -> Result<Model> {
        debug!(
            n_samples = self.samples.len(),
            n_classes = self.labels.len(),
            sanitizer = %self.sanitizer_name,
            "Training"
        );
        let mut identifier = Identifier::new(self.params);
        identifier.fit(&self.samples, &self.classes, self.labels.len())?;
        Model::new(self.labels, self.sanitizer_name, identifier)
    }
}
