//! Character-scanning tokenizer.
//!
//! Every character that is not alphanumeric or a space is set apart by single
//! spaces, unless one of the contextual exceptions below keeps it attached to
//! its neighbours. A neighbour that lies outside the text never matches.

/// Titles whose trailing period stays attached (first letter in either case).
const TITLES: [&str; 8] = ["prof", "dhr", "drs", "dr", "ir", "ing", "mw", "mr"];

/// Minimum spare capacity kept in the output buffer.
const MIN_HEADROOM: usize = 10;

/// Separate punctuation from words with single spaces.
///
/// Two consecutive newlines are kept together so paragraph breaks survive.
pub fn tokenize(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let scan = Scanner { chars: &chars };
    let mut out = String::with_capacity(text.len() * 3 / 2);

    for (i, &c) in chars.iter().enumerate() {
        ensure_headroom(&mut out);
        let attached = scan.keeps_attached(i);

        if !attached
            && !out.is_empty()
            && !out.ends_with(' ')
            && !(out.ends_with('\n') && c == '\n')
        {
            out.push(' ');
        }
        out.push(c);
        if !attached
            && let Some(next) = scan.at(i + 1)
            && next != ' '
            && !(next == '\n' && c == '\n')
        {
            out.push(' ');
        }
    }
    out
}

fn ensure_headroom(out: &mut String) {
    if out.capacity() - out.len() < MIN_HEADROOM {
        out.reserve((out.capacity() / 2).max(MIN_HEADROOM));
    }
}

struct Scanner<'a> {
    chars: &'a [char],
}

impl Scanner<'_> {
    fn at(&self, i: usize) -> Option<char> {
        self.chars.get(i).copied()
    }

    fn before(&self, i: usize, n: usize) -> Option<char> {
        i.checked_sub(n).and_then(|j| self.at(j))
    }

    fn keeps_attached(&self, i: usize) -> bool {
        let c = self.chars[i];
        if is_alphanumeric(c) || c == ' ' {
            return true;
        }
        let prev = self.before(i, 1);
        let next = self.at(i + 1);
        match c {
            // decimal and thousands separators
            '.' | ',' if matches(prev, is_digit) && matches(next, is_digit) => true,
            '.' => self.keeps_period(i),
            '-' => matches(prev, is_alphanumeric) && matches(next, is_alphanumeric),
            '\'' => prev == Some('z') && next == Some('n'),
            _ => false,
        }
    }

    /// Periods inside or at the end of abbreviations, after initials and after titles.
    fn keeps_period(&self, i: usize) -> bool {
        if !matches(self.before(i, 1), is_letter) {
            return false;
        }
        let next = self.at(i + 1);
        matches(next, is_letter)
            || (next == Some(' ') && matches(self.at(i + 2), is_lowercase))
            || matches(self.before(i, 2), |c| !is_alphanumeric(c))
            || TITLES.iter().any(|title| self.follows_title(i, title))
    }

    fn follows_title(&self, i: usize, title: &str) -> bool {
        let Some(start) = i.checked_sub(title.len()) else {
            return false;
        };
        if !matches(self.before(start, 1), |c| !is_alphanumeric(c)) {
            return false;
        }
        title
            .chars()
            .zip(&self.chars[start..i])
            .enumerate()
            .all(|(k, (expected, &actual))| {
                if k == 0 {
                    actual.eq_ignore_ascii_case(&expected)
                } else {
                    actual == expected
                }
            })
    }
}

fn matches(c: Option<char>, pred: impl Fn(char) -> bool) -> bool {
    c.is_some_and(pred)
}

fn is_letter(c: char) -> bool {
    c.is_ascii_alphabetic() || (!c.is_ascii() && c.is_alphabetic())
}

fn is_digit(c: char) -> bool {
    c.is_ascii_digit()
}

fn is_alphanumeric(c: char) -> bool {
    c.is_ascii_alphanumeric() || (!c.is_ascii() && c.is_alphanumeric())
}

fn is_lowercase(c: char) -> bool {
    c.is_ascii_lowercase() || (!c.is_ascii() && c.is_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separates_plain_punctuation() {
        assert_eq!(tokenize("Hallo, wereld!"), "Hallo , wereld !");
        assert_eq!(tokenize("(ja)"), "( ja )");
        assert_eq!(tokenize("\"nee\""), "\" nee \"");
        assert_eq!(tokenize(""), "");
        assert_eq!(tokenize("?"), "?");
    }

    #[test]
    fn keeps_number_separators() {
        assert_eq!(tokenize("3,5 en 1.000"), "3,5 en 1.000");
        assert_eq!(tokenize("3, 5"), "3 , 5");
        assert_eq!(tokenize("zo.5"), "zo . 5");
    }

    #[test]
    fn keeps_abbreviation_periods() {
        assert_eq!(tokenize("e.g. dit"), "e.g. dit");
        assert_eq!(tokenize("afl. drie"), "afl. drie");
        assert_eq!(tokenize("etc. Daarna"), "etc . Daarna");
        assert_eq!(tokenize("Einde."), "Einde .");
    }

    #[test]
    fn keeps_initials_but_not_at_text_start() {
        assert_eq!(tokenize("door J. Jansen"), "door J. Jansen");
        assert_eq!(tokenize("J. Jansen"), "J . Jansen");
    }

    #[test]
    fn keeps_title_periods() {
        assert_eq!(tokenize("de Dhr. Jansen"), "de Dhr. Jansen");
        assert_eq!(tokenize("met mr. Jansen"), "met mr. Jansen");
        assert_eq!(tokenize("met Ing. Jansen"), "met Ing. Jansen");
        assert_eq!(tokenize("met ir. Jansen"), "met ir. Jansen");
        assert_eq!(tokenize("met mw. Jansen"), "met mw. Jansen");
        assert_eq!(tokenize("met drs. Jansen"), "met drs. Jansen");
        assert_eq!(tokenize("met irs. Jansen"), "met irs . Jansen");
        assert_eq!(tokenize("met MR. Jansen"), "met MR . Jansen");
        assert_eq!(tokenize("Dhr. Jansen"), "Dhr . Jansen");
    }

    #[test]
    fn hyphens_and_contractions() {
        assert_eq!(tokenize("West-Brabant"), "West-Brabant");
        assert_eq!(tokenize("mond- en klauwzeer"), "mond - en klauwzeer");
        assert_eq!(tokenize("-5"), "- 5");
        assert_eq!(tokenize("z'n boek"), "z'n boek");
        assert_eq!(tokenize("d'r boek"), "d ' r boek");
    }

    #[test]
    fn newlines_are_punctuation_except_paragraph_breaks() {
        assert_eq!(tokenize("een\ntwee"), "een \n twee");
        assert_eq!(tokenize("een\n\ntwee"), "een \n\n twee");
        assert_eq!(tokenize("een.\n\ntwee"), "een . \n\n twee");
    }

    #[test]
    fn keeps_accented_words_whole() {
        assert_eq!(tokenize("café, één"), "café , één");
        assert_eq!(tokenize("«ja»"), "« ja »");
    }

    #[test]
    fn grows_past_initial_capacity() {
        let text = "!".repeat(1000);
        let out = tokenize(&text);
        assert_eq!(out.len(), 1999);
        assert!(out.split(' ').all(|t| t == "!"));
    }
}
