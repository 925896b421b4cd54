use bincode::{Decode, Encode};
use hashbrown::HashMap;
use tracing::debug;

use crate::errors::{LangidError, Result};
use crate::sparse::SparseVector;
use crate::utils::{self, Indexer};

/// Parameters of an [`NgramVectorizer`].
///
/// The same parameters are used to build the vectorizer of every class, so this struct plays
/// the role of the vectorizer factory of an [`Identifier`](crate::Identifier).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorizerParams {
    ngram_range: (usize, usize),
    max_features: usize,
    ignore_non_words: bool,
    sublinear_tf: bool,
    use_idf: bool,
}

impl VectorizerParams {
    /// Creates parameters.
    ///
    /// # Arguments
    ///
    /// * `ngram_range` - Inclusive bounds of the character n-gram lengths.
    /// * `max_features` - Maximum vocabulary size.
    ///
    /// Parameters are checked when fitting, not here.
    pub fn new(ngram_range: (usize, usize), max_features: usize) -> Self {
        Self {
            ngram_range,
            max_features,
            ..Self::default()
        }
    }

    /// Discards n-grams without any letter from the vocabulary (default: `true`).
    pub fn ignore_non_words(mut self, yes: bool) -> Self {
        self.ignore_non_words = yes;
        self
    }

    /// Uses `1 + ln(tf)` instead of raw counts (default: `true`).
    pub fn sublinear_tf(mut self, yes: bool) -> Self {
        self.sublinear_tf = yes;
        self
    }

    /// Weights n-grams by their smoothed inverse document frequency (default: `false`).
    pub fn use_idf(mut self, yes: bool) -> Self {
        self.use_idf = yes;
        self
    }

    pub fn ngram_range(&self) -> (usize, usize) {
        self.ngram_range
    }

    pub fn max_features(&self) -> usize {
        self.max_features
    }

    pub fn ignores_non_words(&self) -> bool {
        self.ignore_non_words
    }

    pub fn is_sublinear_tf(&self) -> bool {
        self.sublinear_tf
    }

    pub fn uses_idf(&self) -> bool {
        self.use_idf
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 {
            return Err(LangidError::invalid_argument(
                "ngram_range",
                "n-gram lengths must be positive",
            ));
        }
        if min_n > max_n {
            return Err(LangidError::invalid_argument(
                "ngram_range",
                format!("empty range ({min_n}, {max_n})"),
            ));
        }
        if self.max_features == 0 {
            return Err(LangidError::invalid_argument(
                "max_features",
                "must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for VectorizerParams {
    fn default() -> Self {
        Self {
            ngram_range: (3, 5),
            max_features: 1000,
            ignore_non_words: true,
            sublinear_tf: true,
            use_idf: false,
        }
    }
}

/// A vocabulary entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VocabularyEntry {
    ngram: String,
    weight: u64,
    index: usize,
}

impl VocabularyEntry {
    pub fn ngram(&self) -> &str {
        &self.ngram
    }

    /// Frequency of the n-gram in the training corpus.
    pub fn weight(&self) -> u64 {
        self.weight
    }

    /// Feature index.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Character n-gram vectorizer.
///
/// Learns the most frequent n-grams of a corpus and maps texts to L2-normalized vectors of
/// their (sublinear) frequencies over that vocabulary.
///
/// # Examples
///
/// ```
/// use langid::{NgramVectorizer, VectorizerParams};
///
/// let params = VectorizerParams::new((3, 3), 5).ignore_non_words(false);
/// let vectorizer = NgramVectorizer::fit(&["aabaa", "aabaa"], params).unwrap();
/// let ngrams: Vec<_> = vectorizer.vocabulary().iter().map(|e| e.ngram()).collect();
/// assert_eq!(vec!["aab", "aba", "baa"], ngrams);
///
/// let rows = vectorizer.transform(&["baa!"]);
/// assert!((rows[0].norm() - 1.0).abs() < 1e-9);
/// ```
#[derive(Clone, Debug)]
pub struct NgramVectorizer {
    params: VectorizerParams,
    vocabulary: Vec<VocabularyEntry>,
    lookup: HashMap<String, u32>,
    idf: Vec<f64>,
}

impl NgramVectorizer {
    /// Learns a vocabulary from `corpus`.
    ///
    /// # Errors
    ///
    /// [`LangidError::InvalidArgument`] is returned if `params` is invalid.
    pub fn fit<S>(corpus: &[S], params: VectorizerParams) -> Result<Self>
    where
        S: AsRef<str>,
    {
        params.validate()?;
        let (min_n, max_n) = params.ngram_range;

        let mut indexer: Indexer<String> = Indexer::new();
        let mut counts: Vec<u64> = vec![];
        let mut doc_freqs: Vec<u64> = vec![];
        // 1-based index of the last document containing each n-gram.
        let mut last_doc: Vec<usize> = vec![];

        for (doc, text) in corpus.iter().enumerate() {
            let text = text.as_ref().to_lowercase();
            for ngram in utils::char_ngrams(&text, min_n, max_n) {
                if params.ignore_non_words && !utils::has_letter(ngram) {
                    continue;
                }
                let id = indexer.get_id(ngram);
                if id == counts.len() {
                    counts.push(0);
                    doc_freqs.push(0);
                    last_doc.push(0);
                }
                counts[id] += 1;
                if last_doc[id] != doc + 1 {
                    last_doc[id] = doc + 1;
                    doc_freqs[id] += 1;
                }
            }
        }

        let n_candidates = indexer.len();
        let mut order: Vec<usize> = (0..n_candidates).collect();
        // stable: equal counts keep discovery order
        order.sort_by(|&a, &b| counts[b].cmp(&counts[a]));
        order.truncate(params.max_features);

        let mut keys: Vec<Option<String>> = indexer.into_keys().into_iter().map(Some).collect();
        let n_docs = corpus.len() as f64;
        let mut vocabulary = Vec::with_capacity(order.len());
        let mut idf = vec![];
        for (index, id) in order.into_iter().enumerate() {
            let ngram = keys[id].take().unwrap_or_default();
            vocabulary.push(VocabularyEntry {
                ngram,
                weight: counts[id],
                index,
            });
            if params.use_idf {
                idf.push(((1. + n_docs) / (1. + doc_freqs[id] as f64)).ln() + 1.);
            }
        }
        debug!(
            n_docs = corpus.len(),
            n_candidates,
            vocab_size = vocabulary.len(),
            "NgramVectorizer fitting complete"
        );
        Ok(Self::from_parts(params, vocabulary, idf))
    }

    /// Fits a vectorizer on `corpus` and transforms the same corpus.
    pub fn fit_transform<S>(corpus: &[S], params: VectorizerParams) -> Result<(Self, Vec<SparseVector>)>
    where
        S: AsRef<str>,
    {
        let vectorizer = Self::fit(corpus, params)?;
        let rows = vectorizer.transform(corpus);
        Ok((vectorizer, rows))
    }

    fn from_parts(params: VectorizerParams, vocabulary: Vec<VocabularyEntry>, idf: Vec<f64>) -> Self {
        let lookup = vocabulary
            .iter()
            .map(|e| (e.ngram.clone(), e.index as u32))
            .collect();
        Self {
            params,
            vocabulary,
            lookup,
            idf,
        }
    }

    /// Transforms texts into feature vectors, one per text.
    ///
    /// N-grams missing from the vocabulary are ignored. A text without any known n-gram is
    /// mapped to the zero vector; every other row has unit norm.
    pub fn transform<S>(&self, texts: &[S]) -> Vec<SparseVector>
    where
        S: AsRef<str>,
    {
        texts.iter().map(|t| self.transform_one(t.as_ref())).collect()
    }

    /// Transforms a single text.
    pub fn transform_one(&self, text: &str) -> SparseVector {
        let (min_n, max_n) = self.params.ngram_range;
        let dim = self.num_features();
        let text = text.to_lowercase();

        let mut tfs: HashMap<u32, u32> = HashMap::new();
        for ngram in utils::char_ngrams(&text, min_n, max_n) {
            if let Some(&idx) = self.lookup.get(ngram) {
                *tfs.entry(idx).or_insert(0) += 1;
            }
        }
        if tfs.is_empty() {
            return SparseVector::zeros(dim);
        }

        let sublinear = self.params.sublinear_tf;
        let mut row = SparseVector::from_pairs(
            dim,
            tfs.into_iter().map(|(idx, tf)| {
                let tf = f64::from(tf);
                (idx, if sublinear { 1. + tf.ln() } else { tf })
            }),
        );
        if self.params.use_idf {
            row.scale_by(&self.idf);
        }
        row.normalize();
        row
    }

    /// Gets the vocabulary size.
    pub fn num_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Gets the vocabulary, ordered by feature index.
    pub fn vocabulary(&self) -> &[VocabularyEntry] {
        &self.vocabulary
    }

    /// Looks up an n-gram in the vocabulary.
    pub fn get(&self, ngram: &str) -> Option<&VocabularyEntry> {
        self.lookup
            .get(ngram)
            .map(|&idx| &self.vocabulary[idx as usize])
    }

    /// Inverse document frequencies, empty unless the vectorizer uses them.
    pub fn idf(&self) -> &[f64] {
        &self.idf
    }

    pub fn params(&self) -> &VectorizerParams {
        &self.params
    }
}

/// Persisted form of an [`NgramVectorizer`].
#[derive(Decode, Encode)]
pub(crate) struct VectorizerRecord {
    ngram_range: (u32, u32),
    max_features: u64,
    ignore_non_words: bool,
    sublinear_tf: bool,
    use_idf: bool,
    vocabulary: Vec<(String, u64)>,
    idf: Vec<f64>,
}

impl From<&NgramVectorizer> for VectorizerRecord {
    fn from(v: &NgramVectorizer) -> Self {
        let p = &v.params;
        Self {
            ngram_range: (p.ngram_range.0 as u32, p.ngram_range.1 as u32),
            max_features: p.max_features as u64,
            ignore_non_words: p.ignore_non_words,
            sublinear_tf: p.sublinear_tf,
            use_idf: p.use_idf,
            vocabulary: v
                .vocabulary
                .iter()
                .map(|e| (e.ngram.clone(), e.weight))
                .collect(),
            idf: v.idf.clone(),
        }
    }
}

impl TryFrom<VectorizerRecord> for NgramVectorizer {
    type Error = LangidError;

    fn try_from(record: VectorizerRecord) -> Result<Self> {
        let params = VectorizerParams {
            ngram_range: (
                usize::try_from(record.ngram_range.0).map_err(|_| invalid_range())?,
                usize::try_from(record.ngram_range.1).map_err(|_| invalid_range())?,
            ),
            max_features: usize::try_from(record.max_features)
                .map_err(|_| LangidError::invalid_model("max_features overflows usize"))?,
            ignore_non_words: record.ignore_non_words,
            sublinear_tf: record.sublinear_tf,
            use_idf: record.use_idf,
        };
        params
            .validate()
            .map_err(|e| LangidError::invalid_model(e.to_string()))?;
        if record.vocabulary.len() > params.max_features {
            return Err(LangidError::invalid_model(format!(
                "vocabulary size {} exceeds max_features {}",
                record.vocabulary.len(),
                params.max_features
            )));
        }
        let expected_idf = if params.use_idf {
            record.vocabulary.len()
        } else {
            0
        };
        if record.idf.len() != expected_idf {
            return Err(LangidError::invalid_model(format!(
                "expected {} idf weights, found {}",
                expected_idf,
                record.idf.len()
            )));
        }
        let vocabulary = record
            .vocabulary
            .into_iter()
            .enumerate()
            .map(|(index, (ngram, weight))| VocabularyEntry {
                ngram,
                weight,
                index,
            })
            .collect();
        Ok(Self::from_parts(params, vocabulary, record.idf))
    }
}

fn invalid_range() -> LangidError {
    LangidError::invalid_model("ngram_range overflows usize")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ngrams_of(v: &NgramVectorizer) -> Vec<&str> {
        v.vocabulary().iter().map(|e| e.ngram()).collect()
    }

    #[test]
    fn test_fit_ranks_by_frequency() {
        let params = VectorizerParams::new((3, 3), 5).ignore_non_words(false);
        let v = NgramVectorizer::fit(&["aabaa", "aabaa"], params).unwrap();
        assert_eq!(vec!["aab", "aba", "baa"], ngrams_of(&v));
        assert_eq!(3, v.num_features());
        let weights: Vec<_> = v.vocabulary().iter().map(|e| e.weight()).collect();
        assert_eq!(vec![2, 2, 2], weights);
        for (i, e) in v.vocabulary().iter().enumerate() {
            assert_eq!(i, e.index());
        }
    }

    #[test]
    fn test_fit_ties_keep_discovery_order() {
        let params = VectorizerParams::new((3, 3), 5).ignore_non_words(false);
        let v = NgramVectorizer::fit(&["aabaa", "baa"], params).unwrap();
        assert_eq!(vec!["baa", "aab", "aba"], ngrams_of(&v));
        assert_eq!(2, v.get("baa").unwrap().weight());
        assert_eq!(1, v.get("aab").unwrap().weight());
        assert_eq!(1, v.get("aba").unwrap().weight());
    }

    #[test]
    fn test_fit_truncates_to_max_features() {
        let params = VectorizerParams::new((1, 1), 2);
        let v = NgramVectorizer::fit(&["abcabca"], params).unwrap();
        assert_eq!(vec!["a", "b"], ngrams_of(&v));
    }

    #[test]
    fn test_fit_vocabulary_size_below_max_features() {
        let params = VectorizerParams::new((2, 3), 1000);
        let v = NgramVectorizer::fit(&["hello", "help"], params).unwrap();
        // he el ll lo lp hel ell llo elp
        assert_eq!(9, v.num_features());
    }

    #[test]
    fn test_fit_lowercases() {
        let params = VectorizerParams::new((2, 2), 10);
        let v = NgramVectorizer::fit(&["ABab"], params).unwrap();
        assert_eq!(vec!["ab", "ba"], ngrams_of(&v));
        assert_eq!(2, v.get("ab").unwrap().weight());
    }

    #[test]
    fn test_fit_ignore_non_words() {
        let params = VectorizerParams::new((2, 2), 10);
        let v = NgramVectorizer::fit(&["a.. 12__"], params).unwrap();
        assert_eq!(vec!["a."], ngrams_of(&v));

        let params = params.ignore_non_words(false);
        let v = NgramVectorizer::fit(&["a.. 12__"], params).unwrap();
        assert_eq!(7, v.num_features());
        assert!(v.get("..").is_some());
        assert!(v.get("__").is_some());
    }

    #[test]
    fn test_fit_empty_vocabulary() {
        let params = VectorizerParams::new((3, 5), 10);
        let v = NgramVectorizer::fit(&["ab", "...", ""], params).unwrap();
        assert_eq!(0, v.num_features());
        let rows = v.transform(&["abc"]);
        assert_eq!(1, rows.len());
        assert!(rows[0].is_zero());
        assert_eq!(0, rows[0].dim());

        let empty: [&str; 0] = [];
        let v = NgramVectorizer::fit(&empty, params).unwrap();
        assert_eq!(0, v.num_features());
    }

    #[test]
    fn test_fit_invalid_params() {
        let corpus = ["abc"];
        for params in [
            VectorizerParams::new((3, 5), 0),
            VectorizerParams::new((5, 3), 10),
            VectorizerParams::new((0, 3), 10),
        ] {
            let e = NgramVectorizer::fit(&corpus, params).unwrap_err();
            assert!(matches!(e, LangidError::InvalidArgument(_)), "{e}");
        }
    }

    #[test]
    fn test_transform_weights() {
        let params = VectorizerParams::new((1, 1), 10);
        let v = NgramVectorizer::fit(&["ab"], params).unwrap();
        let row = &v.transform(&["aaab"])[0];
        let a = 1. + 3f64.ln();
        let b = 1.;
        let norm = (a * a + b * b).sqrt();
        assert!((row.get(v.get("a").unwrap().index()) - a / norm).abs() < 1e-12);
        assert!((row.get(v.get("b").unwrap().index()) - b / norm).abs() < 1e-12);
    }

    #[test]
    fn test_transform_raw_tf() {
        let params = VectorizerParams::new((1, 1), 10).sublinear_tf(false);
        let v = NgramVectorizer::fit(&["ab"], params).unwrap();
        let row = &v.transform(&["aaab"])[0];
        let norm = 10f64.sqrt();
        assert!((row.get(v.get("a").unwrap().index()) - 3. / norm).abs() < 1e-12);
        assert!((row.get(v.get("b").unwrap().index()) - 1. / norm).abs() < 1e-12);
    }

    #[test]
    fn test_transform_unknown_ngrams() {
        let params = VectorizerParams::new((3, 3), 10);
        let v = NgramVectorizer::fit(&["hallo"], params).unwrap();
        let rows = v.transform(&["xyz", "", "hallo welt"]);
        assert!(rows[0].is_zero());
        assert!(rows[1].is_zero());
        assert_eq!(3, rows[2].nnz());
        assert!(rows.iter().all(|r| r.dim() == 3));
    }

    #[test]
    fn test_transform_norms() {
        let params = VectorizerParams::new((3, 5), 50);
        let corpus = [
            "das ist ein test",
            "grüezi mitenand, wie gahts?",
            "c'est la vie",
        ];
        let v = NgramVectorizer::fit(&corpus, params).unwrap();
        let texts = ["das ist", "la vie est belle", "qwrtz", "tests tests tests"];
        for row in v.transform(&texts) {
            let norm = row.norm();
            assert!(norm == 0.0 || (norm - 1.0).abs() < 1e-9, "{norm}");
        }
    }

    #[test]
    fn test_transform_is_deterministic() {
        let params = VectorizerParams::new((2, 4), 100).use_idf(true);
        let corpus = ["abcabc abc", "bcd cde", "ab ab ab"];
        let v = NgramVectorizer::fit(&corpus, params).unwrap();
        assert_eq!(v.transform(&corpus), v.transform(&corpus));
    }

    #[test]
    fn test_fit_transform() {
        let params = VectorizerParams::new((2, 3), 20);
        let corpus = ["ciao bella", "buongiorno"];
        let (v, rows) = NgramVectorizer::fit_transform(&corpus, params).unwrap();
        assert_eq!(v.transform(&corpus), rows);
    }

    #[test]
    fn test_idf() {
        let params = VectorizerParams::new((1, 1), 10).use_idf(true);
        let v = NgramVectorizer::fit(&["ab", "a"], params).unwrap();
        assert_eq!(vec!["a", "b"], ngrams_of(&v));
        let idf_a = (3f64 / 3.).ln() + 1.;
        let idf_b = (3f64 / 2.).ln() + 1.;
        assert!((v.idf()[0] - idf_a).abs() < 1e-12);
        assert!((v.idf()[1] - idf_b).abs() < 1e-12);

        let row = &v.transform(&["ab"])[0];
        let norm = (idf_a * idf_a + idf_b * idf_b).sqrt();
        assert!((row.get(0) - idf_a / norm).abs() < 1e-12);
        assert!((row.get(1) - idf_b / norm).abs() < 1e-12);
    }

    #[test]
    fn test_no_idf_by_default() {
        let v = NgramVectorizer::fit(&["abc"], VectorizerParams::new((1, 1), 10)).unwrap();
        assert!(v.idf().is_empty());
    }

    #[test]
    fn test_record_round_trip() {
        let params = VectorizerParams::new((2, 3), 20).use_idf(true);
        let corpus = ["servus miteinand", "hoi zäme"];
        let v = NgramVectorizer::fit(&corpus, params).unwrap();
        let record = VectorizerRecord::from(&v);
        let w = NgramVectorizer::try_from(record).unwrap();
        assert_eq!(v.params(), w.params());
        assert_eq!(v.vocabulary(), w.vocabulary());
        assert_eq!(v.transform(&corpus), w.transform(&corpus));
    }

    #[test]
    fn test_record_rejects_inconsistent_idf() {
        let v = NgramVectorizer::fit(&["abc"], VectorizerParams::new((1, 1), 10)).unwrap();
        let mut record = VectorizerRecord::from(&v);
        record.idf = vec![1.0];
        assert!(matches!(
            NgramVectorizer::try_from(record),
            Err(LangidError::InvalidModel(_))
        ));
    }
}
