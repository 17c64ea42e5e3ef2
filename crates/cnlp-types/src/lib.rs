//! Shared, zero-copy types for composite `word/POS/lemma` tokens.
//!
//! Tagged corpora encode every token as `surface/POS/lemma`, for example
//! `zegt/V(trans,ott,3,ev)/zeggen`. This crate parses that layout into borrowed
//! slices ([`WordPosLemma`]), derives a one-letter coarse [`Category`] from the
//! POS tag, and exposes the four token projections used when counting
//! ([`TransformMode`]).
//!
//! ```rust
//! use cnlp_types::{Category, TransformMode, word_pos_lemma_to_lemma_category};
//!
//! assert_eq!(Category::from_pos_tag("N(eigen,ev,neut)"), Some(Category::ProperNoun));
//! assert_eq!(
//!     word_pos_lemma_to_lemma_category("lopen/V(hulp)/lopen").as_deref(),
//!     Some("lopen/X")
//! );
//! assert_eq!(TransformMode::from_code(2), Some(TransformMode::LemmaOnly));
//! ```

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Separator between the fields of a composite token.
pub const SEPARATOR: char = '/';

/// Why a composite token could not be projected.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// No `/` after the surface form.
    MissingPos,
    /// No `/` between the POS tag and the lemma.
    MissingLemma,
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ParseError::MissingPos => "could not find '/' after the word",
            ParseError::MissingLemma => "could not find second '/' before the lemma",
        })
    }
}

impl Error for ParseError {}

/// Borrowed view of a `word/POS/lemma` token.
///
/// The lemma is everything after the second slash, verbatim.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct WordPosLemma<'a> {
    pub word: &'a str,
    pub pos: &'a str,
    pub lemma: &'a str,
}

impl<'a> WordPosLemma<'a> {
    pub fn parse(token: &'a str) -> Result<Self, ParseError> {
        let (word, rest) = split_word(token)?;
        let (pos, lemma) = rest
            .split_once(SEPARATOR)
            .ok_or(ParseError::MissingLemma)?;
        Ok(Self { word, pos, lemma })
    }

    /// Coarse category of the POS tag.
    ///
    /// An empty tag yields the separator itself, so `x//y` projects to `y//`.
    pub fn category(&self) -> Category {
        Category::from_pos_tag(self.pos).unwrap_or(Category::Other(SEPARATOR))
    }
}

/// Split on the first slash only: `(surface, everything after it)`.
pub fn split_word(token: &str) -> Result<(&str, &str), ParseError> {
    token.split_once(SEPARATOR).ok_or(ParseError::MissingPos)
}

/// One-letter coarse word class derived from a full POS tag.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Category {
    Adjective,
    Adverb,
    Noun,
    ProperNoun,
    Verb,
    Auxiliary,
    Article,
    Numeral,
    Preposition,
    Pronoun,
    Conjunction,
    Interjection,
    Punctuation,
    /// Any other leading character of the tag, kept as-is.
    Other(char),
}

impl Category {
    /// Map a tag such as `V(hulp_of_kopp,ott,3,ev)` onto its category.
    ///
    /// Prefix rules are checked first (`V(hulp` is an auxiliary, `N(eigen` a
    /// proper noun, and so on); otherwise the first character of the tag decides.
    pub fn from_pos_tag(pos: &str) -> Option<Self> {
        const PREFIXES: [(&str, Category); 7] = [
            ("V(hulp", Category::Auxiliary),
            ("N(eigen", Category::ProperNoun),
            ("Adj", Category::Adjective),
            ("Art", Category::Article),
            ("Num", Category::Numeral),
            ("Pron", Category::Pronoun),
            ("Punc", Category::Punctuation),
        ];
        if let Some((_, cat)) = PREFIXES.iter().find(|(prefix, _)| pos.starts_with(prefix)) {
            return Some(*cat);
        }
        pos.chars().next().map(Category::from_char)
    }

    /// Parse a category letter as emitted by [`Category::to_char`].
    pub fn from_char(c: char) -> Self {
        match c {
            'J' => Category::Adjective,
            'A' => Category::Adverb,
            'N' => Category::Noun,
            'E' => Category::ProperNoun,
            'V' => Category::Verb,
            'X' => Category::Auxiliary,
            'R' => Category::Article,
            'M' => Category::Numeral,
            'P' => Category::Preposition,
            'O' => Category::Pronoun,
            'C' => Category::Conjunction,
            'I' => Category::Interjection,
            'U' => Category::Punctuation,
            other => Category::Other(other),
        }
    }

    pub fn to_char(self) -> char {
        match self {
            Category::Adjective => 'J',
            Category::Adverb => 'A',
            Category::Noun => 'N',
            Category::ProperNoun => 'E',
            Category::Verb => 'V',
            Category::Auxiliary => 'X',
            Category::Article => 'R',
            Category::Numeral => 'M',
            Category::Preposition => 'P',
            Category::Pronoun => 'O',
            Category::Conjunction => 'C',
            Category::Interjection => 'I',
            Category::Punctuation => 'U',
            Category::Other(c) => c,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Projection applied to every token before dictionary lookup.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum TransformMode {
    /// Count tokens as they are.
    #[default]
    Identity,
    /// `word/POS/lemma` becomes `lemma/C` with `C` the coarse category.
    LemmaCategory,
    /// `word/POS/lemma` becomes `lemma`.
    LemmaOnly,
    /// `word/POS...` becomes `word`.
    WordOnly,
}

impl TransformMode {
    pub const ALL: [TransformMode; 4] = [
        TransformMode::Identity,
        TransformMode::LemmaCategory,
        TransformMode::LemmaOnly,
        TransformMode::WordOnly,
    ];

    /// Numeric option code used by callers of the counting interface.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(TransformMode::Identity),
            1 => Some(TransformMode::LemmaCategory),
            2 => Some(TransformMode::LemmaOnly),
            3 => Some(TransformMode::WordOnly),
            _ => None,
        }
    }

    pub fn code(self) -> i64 {
        match self {
            TransformMode::Identity => 0,
            TransformMode::LemmaCategory => 1,
            TransformMode::LemmaOnly => 2,
            TransformMode::WordOnly => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TransformMode::Identity => "identity",
            TransformMode::LemmaCategory => "lemma-category",
            TransformMode::LemmaOnly => "lemma",
            TransformMode::WordOnly => "word",
        }
    }

    /// Project `token`, borrowing from it whenever the result is a plain slice.
    pub fn apply(self, token: &str) -> Result<Cow<'_, str>, ParseError> {
        match self {
            TransformMode::Identity => Ok(Cow::Borrowed(token)),
            TransformMode::LemmaCategory => {
                let wpl = WordPosLemma::parse(token)?;
                Ok(Cow::Owned(format!("{}{SEPARATOR}{}", wpl.lemma, wpl.category())))
            }
            TransformMode::LemmaOnly => WordPosLemma::parse(token).map(|wpl| Cow::Borrowed(wpl.lemma)),
            TransformMode::WordOnly => split_word(token).map(|(word, _)| Cow::Borrowed(word)),
        }
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TransformMode {
    type Err = String;

    /// Accepts either the name or the numeric code.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return Self::from_code(code).ok_or_else(|| format!("unknown transform code: {code}"));
        }
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| format!("unknown transform mode: {trimmed}"))
    }
}

/// `word/POS/lemma` to `lemma/C`; `None` if the token is malformed.
pub fn word_pos_lemma_to_lemma_category(token: &str) -> Option<String> {
    TransformMode::LemmaCategory
        .apply(token)
        .ok()
        .map(Cow::into_owned)
}

/// `word/POS/lemma` to `lemma`; `None` if the token is malformed.
pub fn word_pos_lemma_to_lemma(token: &str) -> Option<&str> {
    WordPosLemma::parse(token).ok().map(|wpl| wpl.lemma)
}

/// `word/POS...` to `word`; `None` if there is no slash.
pub fn word_pos_lemma_to_word(token: &str) -> Option<&str> {
    split_word(token).ok().map(|(word, _)| word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_composite_tokens() {
        let wpl = WordPosLemma::parse("zegt/V(trans,ott,3,ev)/zeggen").unwrap();
        assert_eq!(wpl.word, "zegt");
        assert_eq!(wpl.pos, "V(trans,ott,3,ev)");
        assert_eq!(wpl.lemma, "zeggen");

        let nested = WordPosLemma::parse("a/b/c/d").unwrap();
        assert_eq!(nested.lemma, "c/d");

        assert_eq!(WordPosLemma::parse("Directeur"), Err(ParseError::MissingPos));
        assert_eq!(
            WordPosLemma::parse("Directeur/N(soort,ev,neut)"),
            Err(ParseError::MissingLemma)
        );
    }

    #[test]
    fn derives_categories_from_tags() {
        let cases = [
            ("V(hulp_of_kopp,ott,3,ev)", 'X'),
            ("V(trans,ott,3,ev)", 'V'),
            ("N(eigen,ev,neut)", 'E'),
            ("N(soort,ev,neut)", 'N'),
            ("Adj(adv,stell,onverv)", 'J'),
            ("Adv(deel_v)", 'A'),
            ("Art(bep,onzijd,neut)", 'R'),
            ("Num(hoofd,bep,attr,onverv)", 'M'),
            ("Pron(per,1,ev,nom)", 'O'),
            ("Punc(komma)", 'U'),
            ("Prep(voor)", 'P'),
            ("Conj(onder,met_fin)", 'C'),
            ("Int", 'I'),
            ("Misc(vreemd)", 'M'),
        ];
        for (tag, expected) in cases {
            let cat = Category::from_pos_tag(tag).unwrap();
            assert_eq!(cat.to_char(), expected, "tag {tag}");
        }
        assert_eq!(Category::from_pos_tag(""), None);
        assert_eq!(Category::from_pos_tag("Z"), Some(Category::Other('Z')));
    }

    #[test]
    fn lemma_category_projection() {
        assert_eq!(
            word_pos_lemma_to_lemma_category("lopen/V(hulp)/lopen").as_deref(),
            Some("lopen/X")
        );
        assert_eq!(
            word_pos_lemma_to_lemma_category("jan/N(eigen)/Jan").as_deref(),
            Some("Jan/E")
        );
        assert_eq!(
            word_pos_lemma_to_lemma_category("./Punc(punt)/.").as_deref(),
            Some("./U")
        );
        assert_eq!(
            word_pos_lemma_to_lemma_category("Directeur/N(soort,ev,neut)/").as_deref(),
            Some("/N")
        );
    }

    #[test]
    fn empty_tag_projects_to_the_separator() {
        assert_eq!(word_pos_lemma_to_lemma_category("x//y").as_deref(), Some("y//"));
        assert_eq!(word_pos_lemma_to_lemma_category("Directeur//").as_deref(), Some("//"));
        assert_eq!(word_pos_lemma_to_lemma_category("//").as_deref(), Some("//"));
        let wpl = WordPosLemma::parse("x//y").unwrap();
        assert_eq!(wpl.category(), Category::Other(SEPARATOR));
    }

    #[test]
    fn malformed_tokens_yield_nothing() {
        for token in ["Directeur", "Directeur/N(soort,ev,neut)", "/"] {
            assert_eq!(word_pos_lemma_to_lemma_category(token), None, "{token}");
        }
        assert_eq!(word_pos_lemma_to_lemma("kat"), None);
        assert_eq!(word_pos_lemma_to_word("kat"), None);
        assert_eq!(TransformMode::Identity.apply("kat").unwrap(), "kat");
    }

    #[test]
    fn lemma_and_word_projections() {
        let token = "tellende/V(trans,teg_dw,verv_neut)/tellen";
        assert_eq!(word_pos_lemma_to_lemma(token), Some("tellen"));
        assert_eq!(word_pos_lemma_to_word(token), Some("tellende"));
        assert_eq!(word_pos_lemma_to_word("kat/N"), Some("kat"));
        assert!(matches!(
            TransformMode::LemmaOnly.apply(token),
            Ok(Cow::Borrowed("tellen"))
        ));
    }

    #[test]
    fn transform_mode_codes_and_names() {
        for mode in TransformMode::ALL {
            assert_eq!(TransformMode::from_code(mode.code()), Some(mode));
            assert_eq!(mode.name().parse::<TransformMode>(), Ok(mode));
        }
        assert_eq!("1".parse::<TransformMode>(), Ok(TransformMode::LemmaCategory));
        assert_eq!(TransformMode::from_code(4), None);
        assert!("stem".parse::<TransformMode>().is_err());
    }
}
