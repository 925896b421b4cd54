use std::io::{Read, Write};

use bincode::{Decode, Encode};

use crate::errors::{LangidError, Result};
use crate::identifier::Identifier;
use crate::vectorizer::{NgramVectorizer, VectorizerParams, VectorizerRecord};

/// Name recorded for models trained without any preprocessing.
pub const NO_SANITIZER: &str = "none";

/// Model data.
#[derive(Clone, Debug)]
pub struct Model {
    labels: Vec<String>,
    sanitizer: String,
    identifier: Identifier,
}

#[derive(Decode, Encode)]
struct ModelRecord {
    labels: Vec<String>,
    sanitizer: String,
    vectorizers: Vec<VectorizerRecord>,
}

impl Model {
    /// Creates a model from a trained identifier.
    ///
    /// # Arguments
    ///
    /// * `labels` - Name of each class, ordered by class id.
    /// * `sanitizer` - Name of the string filter applied to texts before training.
    /// * `identifier` - A trained identifier.
    ///
    /// # Errors
    ///
    /// [`LangidError::InvalidModel`] is returned if the number of labels differs from the number
    /// of classes of `identifier`.
    pub fn new<S>(labels: Vec<String>, sanitizer: S, identifier: Identifier) -> Result<Self>
    where
        S: Into<String>,
    {
        if labels.len() != identifier.n_classes() {
            return Err(LangidError::invalid_model(format!(
                "{} labels given for {} classes",
                labels.len(),
                identifier.n_classes()
            )));
        }
        Ok(Self {
            labels,
            sanitizer: sanitizer.into(),
            identifier,
        })
    }

    /// Exports the model data.
    ///
    /// # Arguments
    ///
    /// * `wtr` - Byte-oriented sink object.
    ///
    /// # Errors
    ///
    /// When `wtr` generates an error, it will be returned as is.
    pub fn write<W>(&self, wtr: &mut W) -> Result<()>
    where
        W: Write,
    {
        let record = ModelRecord {
            labels: self.labels.clone(),
            sanitizer: self.sanitizer.clone(),
            vectorizers: self
                .identifier
                .vectorizers()
                .iter()
                .map(VectorizerRecord::from)
                .collect(),
        };
        bincode::encode_into_std_write(record, wtr, bincode::config::standard())?;
        Ok(())
    }

    /// Creates a model from a reader.
    ///
    /// # Arguments
    ///
    /// * `rdr` - A data source.
    ///
    /// # Errors
    ///
    /// When `rdr` generates an error, it will be returned as is.
    /// [`LangidError::InvalidModel`] is returned if the data is inconsistent.
    pub fn read<R>(rdr: &mut R) -> Result<Self>
    where
        R: Read,
    {
        let record: ModelRecord = bincode::decode_from_std_read(rdr, bincode::config::standard())?;
        let vectorizers = record
            .vectorizers
            .into_iter()
            .map(NgramVectorizer::try_from)
            .collect::<Result<Vec<_>>>()?;
        let params = match vectorizers.first() {
            Some(v) => *v.params(),
            None => return Err(LangidError::invalid_model("the model has no class")),
        };
        if vectorizers.iter().any(|v| *v.params() != params) {
            return Err(LangidError::invalid_model(
                "vectorizers were trained with different parameters",
            ));
        }
        Self::new(
            record.labels,
            record.sanitizer,
            Identifier::from_vectorizers(params, vectorizers),
        )
    }

    /// Class names, ordered by class id.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Replaces the class names.
    ///
    /// # Errors
    ///
    /// [`LangidError::InvalidArgument`] is returned if the number of labels changes.
    pub fn replace_labels(&mut self, labels: Vec<String>) -> Result<()> {
        if labels.len() != self.labels.len() {
            return Err(LangidError::invalid_argument(
                "labels",
                format!("expected {} labels, got {}", self.labels.len(), labels.len()),
            ));
        }
        self.labels = labels;
        Ok(())
    }

    /// Name of the string filter the model was trained with.
    pub fn sanitizer(&self) -> &str {
        &self.sanitizer
    }

    pub fn identifier(&self) -> &Identifier {
        &self.identifier
    }

    pub fn params(&self) -> &VectorizerParams {
        self.identifier.params()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toy_model() -> Model {
        let mut identifier = Identifier::new(VectorizerParams::new((2, 3), 50).use_idf(true));
        identifier
            .fit(
                &["hallo zusammen", "salut tout le monde", "hello everyone"],
                &[0, 1, 2],
                3,
            )
            .unwrap();
        Model::new(
            vec!["de".to_string(), "fr".to_string(), "en".to_string()],
            "v1",
            identifier,
        )
        .unwrap()
    }

    #[test]
    fn test_write_read() {
        let model = toy_model();
        let mut buf = vec![];
        model.write(&mut buf).unwrap();
        let loaded = Model::read(&mut buf.as_slice()).unwrap();

        assert_eq!(model.labels(), loaded.labels());
        assert_eq!("v1", loaded.sanitizer());
        assert_eq!(model.params(), loaded.params());
        let texts = ["hallo welt", "tout va bien", "hello world", "???"];
        let (expected_labels, expected_scores) =
            model.identifier().predict_with_scores(&texts).unwrap();
        let (labels, scores) = loaded.identifier().predict_with_scores(&texts).unwrap();
        assert_eq!(expected_labels, labels);
        assert_eq!(expected_scores, scores);
        for (a, b) in model
            .identifier()
            .vectorizers()
            .iter()
            .zip(loaded.identifier().vectorizers())
        {
            assert_eq!(a.vocabulary(), b.vocabulary());
        }
    }

    #[test]
    fn test_read_truncated() {
        let model = toy_model();
        let mut buf = vec![];
        model.write(&mut buf).unwrap();
        buf.truncate(buf.len() / 2);
        assert!(matches!(
            Model::read(&mut buf.as_slice()),
            Err(LangidError::DecodeError(_))
        ));
    }

    #[test]
    fn test_new_label_mismatch() {
        let model = toy_model();
        let identifier = model.identifier().clone();
        assert!(matches!(
            Model::new(vec!["de".to_string()], NO_SANITIZER, identifier),
            Err(LangidError::InvalidModel(_))
        ));
    }

    #[test]
    fn test_replace_labels() {
        let mut model = toy_model();
        let labels = vec!["deu".to_string(), "fra".to_string(), "eng".to_string()];
        model.replace_labels(labels.clone()).unwrap();
        assert_eq!(labels.as_slice(), model.labels());
        assert!(model.replace_labels(vec!["x".to_string()]).is_err());
    }
}
