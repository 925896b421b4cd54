use std::borrow::Borrow;
use std::hash::Hash;

use hashbrown::HashMap;

/// Assigns dense ids to keys in order of first appearance.
pub struct Indexer<K> {
    ids: HashMap<K, usize>,
    keys: Vec<K>,
}

impl<K> Indexer<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            ids: HashMap::new(),
            keys: vec![],
        }
    }

    pub fn get_id<Q>(&mut self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: ?Sized + ToOwned<Owned = K> + Eq + Hash,
    {
        if let Some(&id) = self.ids.get(key) {
            id
        } else {
            let id = self.keys.len();
            let key = key.to_owned();
            self.keys.push(key.clone());
            self.ids.insert(key, id);
            id
        }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn into_keys(self) -> Vec<K> {
        self.keys
    }
}

/// Returns every character n-gram of `text` whose length lies in `min_n..=max_n`.
///
/// N-grams are grouped by length, shortest first, and appear in reading order within a group.
/// Lengths are counted in Unicode scalar values.
pub fn char_ngrams(text: &str, min_n: usize, max_n: usize) -> Vec<&str> {
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(i, _)| i)
        .chain(std::iter::once(text.len()))
        .collect();
    let n_chars = bounds.len() - 1;
    let mut result = vec![];
    for n in min_n.max(1)..=max_n {
        if n > n_chars {
            break;
        }
        result.extend(bounds.windows(n + 1).map(|w| &text[w[0]..w[n]]));
    }
    result
}

/// Checks whether an n-gram contains at least one letter.
#[inline]
pub fn has_letter(ngram: &str) -> bool {
    ngram.chars().any(char::is_alphabetic)
}
