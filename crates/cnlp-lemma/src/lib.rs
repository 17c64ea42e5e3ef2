//! Lemmatization by dictionary lookup with a stemming fallback.
//!
//! Words are looked up verbatim (typically as `word/POS`) in a
//! [`LemmaDictionary`]. Unknown words are split on their first `/`; function
//! words (tags not starting with `A`, `N` or `V`) come back unchanged, content
//! words are handed to a [`Stemmer`].
//!
//! # How it works
//! 1. Return the dictionary value if the full word is present.
//! 2. Split off the tag: `wandelt/V(intrans)` becomes `wandelt` + `V(intrans)`.
//! 3. A non-empty tag outside `A`/`N`/`V` returns the surface form as-is.
//! 4. Otherwise the surface form is stemmed.
//!
//! Each result records where it came from ([`LemmaSource`]).
//!
//! # Example
//! ```rust
//! use cnlp_dict::LemmaDictionary;
//! use cnlp_lemma::{LemmaSource, Lemmatizer};
//!
//! # fn main() -> Result<(), cnlp_dict::DictError> {
//! let dict = LemmaDictionary::build([("lopen/V", "lopen".to_string())])?;
//! let lemmatizer = Lemmatizer::dutch();
//!
//! let hit = lemmatizer.lemmatize("lopen/V", &dict);
//! assert_eq!(hit.text, "lopen");
//! assert_eq!(hit.source, LemmaSource::Dictionary);
//!
//! let function_word = lemmatizer.lemmatize("de/Punc", &dict);
//! assert_eq!(function_word.text, "de");
//! # Ok(()) }
//! ```

use std::borrow::Cow;
use std::fmt;

use cnlp_dict::LemmaDictionary;
use cnlp_types::split_word;
use rust_stemmers::Algorithm;
use thiserror::Error;
use tracing::trace;

/// Tag initials whose words are reduced by the stemmer.
pub const STEMMED_TAGS: [char; 3] = ['A', 'N', 'V'];

/// Reduces a word to its stem, rewriting the buffer.
///
/// Implementations must be deterministic and depend only on the characters of
/// the word.
pub trait Stemmer {
    fn stem_in_place(&self, word: &mut String);
}

impl<F> Stemmer for F
where
    F: Fn(&mut String),
{
    fn stem_in_place(&self, word: &mut String) {
        self(word)
    }
}

#[derive(Debug, Error)]
#[error("unsupported stemmer language: {0}")]
pub struct UnknownLanguage(pub String);

/// Snowball stemmer from the `rust-stemmers` crate.
pub struct SnowballStemmer {
    language: &'static str,
    inner: rust_stemmers::Stemmer,
}

impl SnowballStemmer {
    pub fn dutch() -> Self {
        Self::create("dutch", Algorithm::Dutch)
    }

    /// Pick an algorithm by English name or ISO 639-1 code.
    pub fn for_language(name: &str) -> Result<Self, UnknownLanguage> {
        let (language, algorithm) = match name.trim().to_ascii_lowercase().as_str() {
            "nl" | "dutch" => ("dutch", Algorithm::Dutch),
            "en" | "english" => ("english", Algorithm::English),
            "de" | "german" => ("german", Algorithm::German),
            "fr" | "french" => ("french", Algorithm::French),
            "es" | "spanish" => ("spanish", Algorithm::Spanish),
            "it" | "italian" => ("italian", Algorithm::Italian),
            "pt" | "portuguese" => ("portuguese", Algorithm::Portuguese),
            "da" | "danish" => ("danish", Algorithm::Danish),
            "sv" | "swedish" => ("swedish", Algorithm::Swedish),
            "no" | "norwegian" => ("norwegian", Algorithm::Norwegian),
            "fi" | "finnish" => ("finnish", Algorithm::Finnish),
            _ => return Err(UnknownLanguage(name.to_string())),
        };
        Ok(Self::create(language, algorithm))
    }

    fn create(language: &'static str, algorithm: Algorithm) -> Self {
        Self {
            language,
            inner: rust_stemmers::Stemmer::create(algorithm),
        }
    }

    pub fn language(&self) -> &'static str {
        self.language
    }

    pub fn stem<'a>(&self, word: &'a str) -> Cow<'a, str> {
        self.inner.stem(word)
    }
}

impl Default for SnowballStemmer {
    fn default() -> Self {
        Self::dutch()
    }
}

impl fmt::Debug for SnowballStemmer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowballStemmer")
            .field("language", &self.language)
            .finish()
    }
}

impl Stemmer for SnowballStemmer {
    fn stem_in_place(&self, word: &mut String) {
        let stemmed = self.inner.stem(word.as_str()).into_owned();
        *word = stemmed;
    }
}

/// Where a lemma came from.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum LemmaSource {
    /// Exact dictionary hit.
    Dictionary,
    /// Tagged as something other than an adjective, noun or verb; returned unstemmed.
    FunctionWord,
    /// Produced by the stemmer.
    Stemmed,
}

impl LemmaSource {
    pub fn as_str(self) -> &'static str {
        match self {
            LemmaSource::Dictionary => "dictionary",
            LemmaSource::FunctionWord => "function-word",
            LemmaSource::Stemmed => "stemmed",
        }
    }
}

/// A lemma paired with its provenance.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lemma<'a> {
    pub text: Cow<'a, str>,
    pub source: LemmaSource,
}

impl Lemma<'_> {
    pub fn into_owned(self) -> String {
        self.text.into_owned()
    }
}

/// Dictionary lemmatizer parameterised by its stemming fallback.
#[derive(Debug)]
pub struct Lemmatizer<S = SnowballStemmer> {
    stemmer: S,
}

impl Lemmatizer {
    /// Lemmatizer falling back to the Dutch Snowball stemmer.
    pub fn dutch() -> Self {
        Self::new(SnowballStemmer::dutch())
    }
}

impl Default for Lemmatizer {
    fn default() -> Self {
        Self::dutch()
    }
}

impl<S: Stemmer> Lemmatizer<S> {
    pub fn new(stemmer: S) -> Self {
        Self { stemmer }
    }

    pub fn stemmer(&self) -> &S {
        &self.stemmer
    }

    /// Lemmatize `word`, borrowing from the dictionary or the input where possible.
    pub fn lemmatize<'a>(&self, word: &'a str, dict: &'a LemmaDictionary) -> Lemma<'a> {
        if let Some(lemma) = dict.get(word) {
            return Lemma {
                text: Cow::Borrowed(lemma.as_str()),
                source: LemmaSource::Dictionary,
            };
        }

        let (surface, tag) = split_word(word).unwrap_or((word, ""));
        if let Some(initial) = tag.chars().next()
            && !STEMMED_TAGS.contains(&initial)
        {
            return Lemma {
                text: Cow::Borrowed(surface),
                source: LemmaSource::FunctionWord,
            };
        }

        let mut stem = surface.to_string();
        self.stemmer.stem_in_place(&mut stem);
        trace!("stemmed unknown word {word:?} to {stem:?}");
        Lemma {
            text: Cow::Owned(stem),
            source: LemmaSource::Stemmed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_dict() -> LemmaDictionary {
        let lines = [
            ("syncoperende/V", "syncoperen"),
            ("riviermosselen/N", "riviermossel"),
            ("kaaidraaiden/V", "kaaidraaien"),
            ("Bilbao/N", "Bilbao"),
            ("inweek/V", "inweken"),
            ("lopen/V", "lopen"),
        ];
        LemmaDictionary::build(lines.map(|(k, v)| (k, v.to_string()))).unwrap()
    }

    fn strip_t(word: &mut String) {
        if word.ends_with('t') {
            word.pop();
        }
    }

    #[test]
    fn dictionary_hits_win() {
        let lemmatizer = Lemmatizer::new(strip_t);
        let dict = fixture_dict();
        let lemma = lemmatizer.lemmatize("lopen/V", &dict);
        assert_eq!(lemma.text, "lopen");
        assert_eq!(lemma.source, LemmaSource::Dictionary);
        assert!(matches!(lemma.text, Cow::Borrowed(_)));

        let lemma = lemmatizer.lemmatize("inweek/V", &dict);
        assert_eq!(lemma.into_owned(), "inweken");
    }

    #[test]
    fn function_words_are_not_stemmed() {
        let lemmatizer = Lemmatizer::new(strip_t);
        let dict = LemmaDictionary::build(Vec::<(String, String)>::new()).unwrap();
        for (word, expected) in [("de/Punc", "de"), ("tegen/P", "tegen"), ("dat/Conj(onder)", "dat")] {
            let lemma = lemmatizer.lemmatize(word, &dict);
            assert_eq!(lemma.text, expected);
            assert_eq!(lemma.source, LemmaSource::FunctionWord);
        }
    }

    #[test]
    fn content_words_and_untagged_words_are_stemmed() {
        let lemmatizer = Lemmatizer::new(strip_t);
        let dict = fixture_dict();
        for (word, expected) in [
            ("wandelt/V", "wandel"),
            ("praat/N(soort)", "praa"),
            ("fijnst/Adj", "fijns"),
            ("loopt", "loop"),
            ("zegt/", "zeg"),
        ] {
            let lemma = lemmatizer.lemmatize(word, &dict);
            assert_eq!(lemma.text, expected, "{word}");
            assert_eq!(lemma.source, LemmaSource::Stemmed);
        }
    }

    #[test]
    fn unknown_inflection_falls_back_to_snowball() {
        let lemmatizer = Lemmatizer::dutch();
        let dict = fixture_dict();
        let snowball = SnowballStemmer::dutch();
        for word in ["inweek/N", "boters/N", "wandelt/V"] {
            let (surface, _) = split_word(word).unwrap();
            let lemma = lemmatizer.lemmatize(word, &dict);
            assert_eq!(lemma.text, snowball.stem(surface), "{word}");
        }
        assert_eq!(lemmatizer.lemmatize("tegen/P", &dict).text, "tegen");
    }

    #[test]
    fn snowball_languages() {
        assert_eq!(Lemmatizer::dutch().stemmer().language(), "dutch");
        let english = Lemmatizer::new(SnowballStemmer::for_language("en").unwrap());
        assert_eq!(english.stemmer().language(), "english");
        assert_eq!(SnowballStemmer::for_language("NL").unwrap().language(), "dutch");
        assert_eq!(SnowballStemmer::for_language("english").unwrap().language(), "english");
        let err = SnowballStemmer::for_language("klingon").unwrap_err();
        assert_eq!(err.to_string(), "unsupported stemmer language: klingon");
    }

    #[test]
    fn snowball_stems_in_place_like_stem() {
        let snowball = SnowballStemmer::for_language("en").unwrap();
        let mut word = "running".to_string();
        snowball.stem_in_place(&mut word);
        assert_eq!(word, snowball.stem("running"));
        assert_eq!(word, "run");
    }
}
