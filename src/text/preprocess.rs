//! Pronunciation cleanup applied before normalization.
//!
//! Expands abbreviations, spells out small numbers and symbols, replaces
//! URLs and email addresses with speakable placeholders, and inserts pause
//! markers after sentence and clause punctuation.

/// Abbreviation expansions, matched case-insensitively on whole words.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("dr", "doctor"),
    ("mr", "mister"),
    ("mrs", "missus"),
    ("ms", "miss"),
    ("prof", "professor"),
    ("st", "street"),
    ("ave", "avenue"),
    ("blvd", "boulevard"),
    ("etc", "etcetera"),
    ("vs", "versus"),
    ("eg", "for example"),
    ("ie", "that is"),
    ("usa", "United States of America"),
    ("uk", "United Kingdom"),
    ("ai", "artificial intelligence"),
    ("api", "application programming interface"),
    ("url", "web address"),
    ("html", "hypertext markup language"),
    ("css", "cascading style sheets"),
    ("js", "javascript"),
];

/// Number words for standalone one- and two-digit numbers.
const NUMBER_WORDS: &[(u32, &str)] = &[
    (0, "zero"),
    (1, "one"),
    (2, "two"),
    (3, "three"),
    (4, "four"),
    (5, "five"),
    (6, "six"),
    (7, "seven"),
    (8, "eight"),
    (9, "nine"),
    (10, "ten"),
    (11, "eleven"),
    (12, "twelve"),
    (13, "thirteen"),
    (14, "fourteen"),
    (15, "fifteen"),
    (16, "sixteen"),
    (17, "seventeen"),
    (18, "eighteen"),
    (19, "nineteen"),
    (20, "twenty"),
    (30, "thirty"),
    (40, "forty"),
    (50, "fifty"),
    (60, "sixty"),
    (70, "seventy"),
    (80, "eighty"),
    (90, "ninety"),
];

/// Symbol-to-word substitutions.
const SPOKEN_SYMBOLS: &[(char, &str)] = &[
    ('&', " and "),
    ('@', " at "),
    ('#', " hashtag "),
    ('$', " dollar "),
    ('%', " percent "),
    ('+', " plus "),
    ('=', " equals "),
    ('<', " less than "),
    ('>', " greater than "),
    ('*', " star "),
    ('|', " pipe "),
    ('\\', " backslash "),
    ('/', " slash "),
];

const COMMON_ENGLISH: &[&str] = &[
    "the", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
];
const COMMON_SPANISH: &[&str] = &[
    "el", "la", "y", "o", "pero", "en", "con", "de", "para", "por",
];
const COMMON_FRENCH: &[&str] = &[
    "le", "la", "et", "ou", "mais", "dans", "sur", "avec", "de", "pour",
];

/// Text preprocessor improving pronunciation of abbreviations, digits,
/// symbols, and web addresses.
#[derive(Debug, Default)]
pub struct TextPreprocessor;

impl TextPreprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Run the full cleanup pipeline.
    ///
    /// URL and email replacement runs before symbol substitution so that
    /// `/` and `@` inside them are still intact when matched.
    pub fn preprocess(&self, text: &str) -> String {
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let expanded = expand_words(&collapsed);
        let delinked = replace_urls_and_emails(&expanded);
        let spoken = replace_symbols(&delinked);
        add_pauses(&spoken)
    }

    /// Guess the text language from common-word counts.
    ///
    /// Recognizes English, Spanish, and French; everything else falls back
    /// to English.
    pub fn detect_language(&self, text: &str) -> &'static str {
        let mut en = 0usize;
        let mut es = 0usize;
        let mut fr = 0usize;
        for word in text.to_lowercase().split_whitespace() {
            if COMMON_ENGLISH.contains(&word) {
                en += 1;
            }
            if COMMON_SPANISH.contains(&word) {
                es += 1;
            }
            if COMMON_FRENCH.contains(&word) {
                fr += 1;
            }
        }
        if en > es && en > fr {
            "en"
        } else if es > en && es > fr {
            "es"
        } else if fr > en && fr > es {
            "fr"
        } else {
            "en"
        }
    }
}

/// Expand abbreviations and spell out small numbers, word by word.
fn expand_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word = String::new();

    let flush = |word: &mut String, out: &mut String| {
        if word.is_empty() {
            return;
        }
        let lower = word.to_lowercase();
        if let Some(&(_, expansion)) = ABBREVIATIONS.iter().find(|(abbr, _)| *abbr == lower) {
            out.push_str(expansion);
        } else if let Some(spelled) = spell_number(word) {
            out.push_str(spelled);
        } else {
            out.push_str(word);
        }
        word.clear();
    };

    for c in text.chars() {
        if c.is_alphanumeric() {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            out.push(c);
        }
    }
    flush(&mut word, &mut out);
    out
}

/// Spell out a standalone one- or two-digit number, if the table covers it.
fn spell_number(word: &str) -> Option<&'static str> {
    if word.is_empty() || word.len() > 2 || !word.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: u32 = word.parse().ok()?;
    NUMBER_WORDS
        .iter()
        .find(|(n, _)| *n == value)
        .map(|(_, name)| *name)
}

/// Replace URLs with "web link" and email addresses with "email address".
fn replace_urls_and_emails(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            if word.starts_with("http://") || word.starts_with("https://") {
                "web link"
            } else if looks_like_email(word) {
                "email address"
            } else {
                word
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn looks_like_email(word: &str) -> bool {
    let Some((local, domain)) = word.split_once('@') else {
        return false;
    };
    if local.is_empty() || !local.chars().all(|c| c.is_alphanumeric() || "._%+-".contains(c)) {
        return false;
    }
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty() && tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic())
}

fn replace_symbols(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match SPOKEN_SYMBOLS.iter().find(|(sym, _)| *sym == c) {
            Some((_, spoken)) => out.push_str(spoken),
            None => out.push(c),
        }
    }
    out
}

/// Insert pause markers: a long pause after sentence punctuation, a short
/// pause after commas.
fn add_pauses(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        out.push(c);
        if matches!(c, '.' | '!' | '?' | ',') && chars.peek().is_some_and(|n| n.is_whitespace()) {
            while chars.peek().is_some_and(|n| n.is_whitespace()) {
                chars.next();
            }
            out.push_str(if c == ',' { " .. " } else { " ... " });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::TextPreprocessor;

    #[test]
    fn expands_abbreviations() {
        let pre = TextPreprocessor::new();
        assert_eq!(
            pre.preprocess("Dr Smith vs Mr Jones"),
            "doctor Smith versus mister Jones"
        );
    }

    #[test]
    fn spells_small_numbers() {
        let pre = TextPreprocessor::new();
        assert_eq!(pre.preprocess("I have 3 cats and 12 dogs"),
            "I have three cats and twelve dogs");
        // Numbers outside the table are kept as digits.
        assert_eq!(pre.preprocess("room 42"), "room 42");
    }

    #[test]
    fn replaces_urls_before_symbols() {
        let pre = TextPreprocessor::new();
        assert_eq!(pre.preprocess("see https://example.com now"), "see web link now");
        assert_eq!(pre.preprocess("mail bob@example.com today"),
            "mail email address today");
    }

    #[test]
    fn speaks_symbols() {
        let pre = TextPreprocessor::new();
        assert_eq!(pre.preprocess("cats & dogs"), "cats  and  dogs");
        assert_eq!(pre.preprocess("50% off"), "fifty percent  off");
    }

    #[test]
    fn inserts_pause_markers() {
        let pre = TextPreprocessor::new();
        assert_eq!(pre.preprocess("Stop. Go"), "Stop. ... Go");
        assert_eq!(pre.preprocess("first, second"), "first, .. second");
    }

    #[test]
    fn detects_language() {
        let pre = TextPreprocessor::new();
        assert_eq!(pre.detect_language("the cat and the dog in the house"), "en");
        assert_eq!(pre.detect_language("el perro y la casa para el gato"), "es");
        assert_eq!(pre.detect_language("le chat et le chien dans la maison"), "fr");
        assert_eq!(pre.detect_language("xyz"), "en");
    }
}
