// WHY: Centralized per-language abbreviation and capitalization rules so the
// boundary classifier and timing calculator never branch on language tags

use std::collections::HashSet;

use super::Language;

/// English abbreviations, lower-cased, final period removed, internal periods kept
pub const ENGLISH_ABBREVIATIONS: &[&str] = &[
    // titles
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "mt", "rev", "gov", "sen",
    "lt", "sgt", "capt", "cmdr", "adm", "maj",
    // months and days, only forms that are not also words or names
    "feb", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec",
    "tue", "tues", "thu", "thur", "thurs", "fri",
    // latin and reference
    "e.g", "i.e", "etc", "vs", "cf", "approx", "viz", "vol", "pp", "ch", "eds",
    "dept", "inc", "ltd", "corp", "bros",
    // places and time
    "u.s", "u.k", "u.s.a", "n.y.c", "l.a", "d.c", "a.m", "p.m",
    // units
    "ft", "lbs", "km", "kg", "cm", "mm", "sq", "hr", "hrs", "deg",
];

/// German abbreviations, same normalization as the English list
pub const GERMAN_ABBREVIATIONS: &[&str] = &[
    // titles and address
    "dr", "prof", "hr", "fr", "str", "nr", "tel", "geb", "gest", "verh",
    // common prose
    "z.b", "bzw", "usw", "etc", "ca", "evtl", "ggf", "vgl", "d.h", "u.a", "u.ä", "o.ä", "s.o", "s.u",
    "bspw", "inkl", "exkl", "zzgl", "sog", "allg", "abs", "abb", "bd", "jh", "jhd", "usf", "u.v.m",
    "z.t", "i.d.r", "m.e", "u.u",
    // numbers and units
    "mio", "mrd", "min", "std", "tsd",
    // months, without "jan" which is also a name
    "feb", "mär", "apr", "jun", "jul", "aug", "sep", "sept", "okt", "nov", "dez",
];

/// Strategy entry for one language
#[derive(Debug, Clone, Copy)]
pub struct LanguageRules {
    pub abbreviations: &'static [&'static str],
    /// Nouns capitalize, so a capital letter says nothing about sentence starts
    pub nouns_capitalize: bool,
}

impl LanguageRules {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => LanguageRules {
                abbreviations: ENGLISH_ABBREVIATIONS,
                nouns_capitalize: false,
            },
            Language::German => LanguageRules {
                abbreviations: GERMAN_ABBREVIATIONS,
                nouns_capitalize: true,
            },
        }
    }
}

/// Abbreviation lookup for one language using HashSet for O(1) membership
#[derive(Debug, Clone)]
pub struct AbbreviationChecker {
    abbreviations: HashSet<&'static str>,
    rules: LanguageRules,
}

impl AbbreviationChecker {
    pub fn new(language: Language) -> Self {
        let rules = LanguageRules::for_language(language);
        Self {
            abbreviations: rules.abbreviations.iter().copied().collect(),
            rules,
        }
    }

    pub fn rules(&self) -> &LanguageRules {
        &self.rules
    }

    /// Check a span's clean text against the abbreviation list (case-insensitive)
    pub fn is_abbreviation(&self, clean_text: &str) -> bool {
        let folded = clean_text.trim_start_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
        self.abbreviations.contains(folded.as_str())
    }

    /// Single alphabetic character, read as an initial ("J. R. Tolkien")
    pub fn is_initial(clean_text: &str) -> bool {
        let mut chars = clean_text.chars();
        matches!((chars.next(), chars.next()), (Some(c), None) if c.is_alphabetic())
    }

    /// Word whose trailing period does not end a sentence
    pub fn suppresses_period(&self, clean_text: &str) -> bool {
        self.is_abbreviation(clean_text) || Self::is_initial(clean_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_abbreviations() {
        let checker = AbbreviationChecker::new(Language::English);
        for word in ["Dr", "mr", "Mrs", "e.g", "U.S", "etc", "p.m"] {
            assert!(checker.is_abbreviation(word), "Should detect {} as abbreviation", word);
        }
        assert!(!checker.is_abbreviation("Hello"));
        assert!(!checker.is_abbreviation("z.B"));
    }

    #[test]
    fn test_german_abbreviations() {
        let checker = AbbreviationChecker::new(Language::German);
        for word in ["z.B", "bzw", "usw", "d.h", "Nr", "Okt"] {
            assert!(checker.is_abbreviation(word), "Should detect {} as abbreviation", word);
        }
        assert!(!checker.is_abbreviation("Haus"));
    }

    #[test]
    fn test_initials() {
        assert!(AbbreviationChecker::is_initial("J"));
        assert!(AbbreviationChecker::is_initial("é"));
        assert!(!AbbreviationChecker::is_initial("7"));
        assert!(!AbbreviationChecker::is_initial("Jo"));
        assert!(!AbbreviationChecker::is_initial(""));
    }

    #[test]
    fn test_ordinary_words_keep_their_period() {
        let english = AbbreviationChecker::new(Language::English);
        for word in ["sat", "sun", "Ed", "wed", "mon", "mar", "al", "co", "est", "gen", "fig", "Jan", "ca"] {
            assert!(!english.suppresses_period(word), "{} should end a sentence", word);
        }

        let german = AbbreviationChecker::new(Language::German);
        for word in ["Buch", "Max", "Jan", "3", "1990"] {
            assert!(!german.suppresses_period(word), "{} should end a sentence", word);
        }
    }

    #[test]
    fn test_capitalization_flags() {
        assert!(!LanguageRules::for_language(Language::English).nouns_capitalize);
        assert!(LanguageRules::for_language(Language::German).nouns_capitalize);
    }
}
