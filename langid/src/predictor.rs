use crate::errors::Result;
use crate::model::Model;
use crate::trainer::Preprocessor;

/// Result of identifying one text.
#[derive(Clone, Debug, PartialEq)]
pub struct Prediction {
    text: String,
    class: usize,
    label: String,
    scores: Vec<f64>,
}

impl Prediction {
    /// Input text as given to the predictor, before preprocessing.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn class(&self) -> usize {
        self.class
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Score of each class, ordered by class id.
    pub fn scores(&self) -> &[f64] {
        &self.scores
    }

    /// Score of the predicted class.
    pub fn score(&self) -> f64 {
        self.scores[self.class]
    }
}

/// Predictor.
pub struct Predictor {
    model: Model,
    preprocessor: Option<Preprocessor>,
}

impl Predictor {
    /// Creates a new predictor.
    ///
    /// # Arguments
    ///
    /// * `model` - A model data.
    pub fn new(model: Model) -> Self {
        Self {
            model,
            preprocessor: None,
        }
    }

    /// Sets the function applied to each text before identification.
    ///
    /// It should be the function the model was trained with. See [`Model::sanitizer`].
    pub fn preprocessor<F>(mut self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.preprocessor = Some(Box::new(f));
        self
    }

    /// Identifies the language of each text.
    ///
    /// # Arguments
    ///
    /// * `texts` - Texts to identify.
    ///
    /// # Returns
    ///
    /// One prediction per text, in input order.
    ///
    /// # Errors
    ///
    /// See [`crate::Identifier::predict_with_scores`].
    pub fn predict<S>(&self, texts: &[S]) -> Result<Vec<Prediction>>
    where
        S: AsRef<str> + Sync,
    {
        let (classes, scores) = match &self.preprocessor {
            Some(f) => {
                let cleaned: Vec<String> = texts.iter().map(|t| f(t.as_ref())).collect();
                self.model.identifier().predict_with_scores(&cleaned)?
            }
            None => self.model.identifier().predict_with_scores(texts)?,
        };
        let labels = self.model.labels();
        Ok(texts
            .iter()
            .zip(classes)
            .zip(scores.rows())
            .map(|((text, class), row)| Prediction {
                text: text.as_ref().to_string(),
                class,
                label: labels[class].clone(),
                scores: row.to_vec(),
            })
            .collect())
    }

    /// Identifies the language of a single text.
    pub fn predict_one(&self, text: &str) -> Result<Prediction> {
        let mut predictions = self.predict(&[text])?;
        // predict() returns exactly one prediction per input.
        Ok(predictions.remove(0))
    }

    /// Class names, ordered by class id.
    pub fn labels(&self) -> &[String] {
        self.model.labels()
    }

    pub fn model(&self) -> &Model {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::trainer::Trainer;
    use crate::vectorizer::VectorizerParams;

    fn toy_model() -> Model {
        let labels = ["de", "fr", "en"].iter().map(|s| s.to_string()).collect();
        let mut trainer = Trainer::new(labels, VectorizerParams::new((2, 4), 300))
            .unwrap()
            .preprocessor("lowercase", |s: &str| s.to_lowercase());
        for (text, class) in [
            ("Wie geht es dir", 0),
            ("Ich habe Hunger", 0),
            ("Comment ça va", 1),
            ("J'ai faim", 1),
            ("How are you", 2),
            ("I am hungry", 2),
        ] {
            trainer.push_sample(text, class).unwrap();
        }
        trainer.train().unwrap()
    }

    #[test]
    fn test_predict() {
        let predictor = Predictor::new(toy_model());
        let predictions = predictor
            .predict(&["geht es", "ça va", "are you"])
            .unwrap();
        assert_eq!(3, predictions.len());
        assert_eq!(
            vec!["de", "fr", "en"],
            predictions.iter().map(|p| p.label()).collect::<Vec<_>>()
        );
        assert_eq!(vec![0, 1, 2], predictions.iter().map(|p| p.class()).collect::<Vec<_>>());
        for p in &predictions {
            assert_eq!(3, p.scores().len());
            assert!(p.scores().iter().all(|&s| s <= p.score()));
        }
        assert_eq!("ça va", predictions[1].text());
    }

    #[test]
    fn test_predict_with_preprocessor() {
        let predictor = Predictor::new(toy_model()).preprocessor(|s: &str| s.to_lowercase());
        let p = predictor.predict_one("GEHT ES").unwrap();
        assert_eq!("de", p.label());
        assert_eq!("GEHT ES", p.text());
    }

    #[test]
    fn test_predict_unknown_text() {
        let predictor = Predictor::new(toy_model());
        let p = predictor.predict_one("???").unwrap();
        assert_eq!(0, p.class());
        assert_eq!("de", p.label());
        assert_eq!(vec![0.0; 3], p.scores());
    }

    #[test]
    fn test_predict_empty_batch() {
        let predictor = Predictor::new(toy_model());
        let texts: [&str; 0] = [];
        assert!(predictor.predict(&texts).unwrap().is_empty());
    }
}
