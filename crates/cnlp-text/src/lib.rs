//! Text preprocessing: tokenizing raw text and counting vocabulary hits.
//!
//! [`tokenize`] inserts spaces around punctuation so that splitting on
//! whitespace yields meaningful tokens, while keeping decimal separators,
//! abbreviations, initials, titles, hyphenated compounds and `z'n` intact.
//! [`count`] and friends split text on spaces and newlines, optionally project
//! every token through a [`TransformMode`], and tally the ids of the tokens
//! found in a [`CountDictionary`](cnlp_dict::CountDictionary).
//!
//! ```rust
//! use cnlp_dict::CountDictionary;
//! use cnlp_text::{CountOptions, count, tokenize};
//!
//! # fn main() -> Result<(), cnlp_dict::DictError> {
//! assert_eq!(tokenize("Zet u dhr. J. van Dijk, 3,5 keer!"), "Zet u dhr. J. van Dijk , 3,5 keer !");
//!
//! let dict = CountDictionary::build([("the", 1), ("cat", 2), ("sat", 3)])?;
//! let freq = count("The cat sat", &dict, CountOptions { lowercase: true, ..Default::default() });
//! assert_eq!(freq.get(1), Some(1));
//! assert_eq!(freq.total(), 3);
//! # Ok(()) }
//! ```

pub mod count;
pub mod tokenizer;

pub use cnlp_types::TransformMode;
pub use count::{
    CountOptions, FrequencyMap, Tokens, count, count_in_place, count_tokens, count_with, tokens,
};
pub use tokenizer::tokenize;
