// src/utils/text.rs - Tokenizers and folding shared by the matchers
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold accents and drop anything that is not ASCII afterwards.
pub fn ascii_fold(text: &str) -> String {
    text.nfkd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_ascii())
        .collect()
}

/// Collapse runs of whitespace to single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase, replace every non-alphanumeric character with a space, split.
pub fn alnum_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Lowercase and strip non-alphanumerics without splitting words apart
/// ("Web-Developer" becomes "webdeveloper").
pub fn squash_tokens(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.chars().filter(|c| c.is_alphanumeric()).collect::<String>())
        .filter(|w| !w.is_empty())
        .collect()
}

/// Uppercase the first character, lowercase the rest.
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Title casing: every alphabetic run after a non-letter starts upper.
/// Apostrophes do not break a word ("mayor's" becomes "Mayor's").
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_is_alpha = false;
    for c in text.chars() {
        if c.is_alphabetic() {
            if prev_is_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_is_alpha = true;
        } else {
            out.push(c);
            prev_is_alpha = prev_is_alpha && c == '\'';
        }
    }
    out
}

/// Short words kept lowercase inside a title-cased phrase.
pub const LOWERCASE_CONNECTORS: [&str; 8] = ["of", "and", "in", "on", "at", "for", "the", "per"];

/// [`title_case`] per word, except connectors after the first word stay
/// lowercase ("clerk of courts" becomes "Clerk of Courts").
pub fn smart_title_case(text: &str) -> String {
    text.split_whitespace()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i > 0 && LOWERCASE_CONNECTORS.contains(&lower.as_str()) {
                lower
            } else {
                title_case(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascii_fold() {
        assert_eq!(ascii_fold("José Müller"), "Jose Muller");
        assert_eq!(ascii_fold("plain"), "plain");
    }

    #[test]
    fn test_tokenizers() {
        assert_eq!(alnum_tokens("Senior Web-Developer"), vec!["senior", "web", "developer"]);
        assert_eq!(squash_tokens("Senior Web-Developer"), vec!["senior", "webdeveloper"]);
        assert!(alnum_tokens("  -- ").is_empty());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("public works"), "Public Works");
        assert_eq!(title_case("PARKS & REC"), "Parks & Rec");
        assert_eq!(title_case("mayor's office"), "Mayor's Office");
        assert_eq!(capitalize("hELLO"), "Hello");
        assert_eq!(smart_title_case("CLERK OF COURTS"), "Clerk of Courts");
        assert_eq!(smart_title_case("the  board of education"), "The Board of Education");
    }
}
