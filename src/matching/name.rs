// src/matching/name.rs - Person-name component scoring
use log::debug;
use strsim::jaro_winkler;

use crate::matching::similarity::token_set_ratio;
use crate::models::record::NameFields;
use crate::utils::constants::{
    NAME_FIRST_ONLY_CAP, NAME_FIRST_SHARE, NAME_INCOMPATIBLE_INITIAL_CAP, NAME_INITIAL_LAST_FLOOR,
    NAME_LAST_SHARE, NAME_SHARED_INITIAL_FLOOR, NAME_SWAP_DISCOUNT, NAME_WEAK_BOTH_CAP,
};
use crate::utils::text::{ascii_fold, collapse_whitespace};

/// Given names that refer to the same person. Lowercase, ASCII.
const NICKNAME_GROUPS: &[&[&str]] = &[
    &["robert", "rob", "bob", "bobby", "robbie", "bert"],
    &["william", "will", "bill", "billy", "willie", "liam"],
    &["richard", "rich", "rick", "ricky", "dick"],
    &["james", "jim", "jimmy", "jamie"],
    &["john", "jack", "johnny", "jon"],
    &["jonathan", "jon", "johnny"],
    &["michael", "mike", "mikey", "mick"],
    &["elizabeth", "liz", "lizzie", "beth", "betty", "eliza", "lisa"],
    &["katherine", "catherine", "kathryn", "kate", "kathy", "katie", "cathy", "kat"],
    &["margaret", "maggie", "meg", "peggy", "marge"],
    &["jennifer", "jen", "jenny"],
    &["christopher", "chris", "kit"],
    &["christine", "christina", "chris", "tina"],
    &["charles", "charlie", "chuck", "chas"],
    &["thomas", "tom", "tommy"],
    &["joseph", "joe", "joey"],
    &["daniel", "dan", "danny"],
    &["david", "dave", "davey"],
    &["edward", "ed", "eddie", "ted", "ned"],
    &["anthony", "tony"],
    &["alexander", "alex", "al", "xander"],
    &["alexandra", "alex", "lexi", "sandra"],
    &["patricia", "pat", "patty", "trish", "tricia"],
    &["patrick", "pat", "paddy"],
    &["susan", "sue", "susie", "suzy"],
    &["stephen", "steven", "steve"],
    &["matthew", "matt"],
    &["andrew", "andy", "drew"],
    &["benjamin", "ben", "benny"],
    &["samuel", "sam", "sammy"],
    &["samantha", "sam", "sammy"],
    &["nicholas", "nick", "nicky"],
    &["timothy", "tim", "timmy"],
    &["gregory", "greg"],
    &["kenneth", "ken", "kenny"],
    &["ronald", "ron", "ronnie"],
    &["donald", "don", "donnie"],
    &["deborah", "debra", "deb", "debbie"],
    &["rebecca", "becky", "becca"],
    &["victoria", "vicky", "tori"],
    &["abigail", "abby", "gail"],
    &["jessica", "jess", "jessie"],
    &["frederick", "fred", "freddie"],
    &["lawrence", "larry"],
    &["gerald", "jerry"],
    &["theodore", "ted", "teddy", "theo"],
];

/// Lowercase letters only; accents folded, hyphens and punctuation become spaces.
pub fn clean_component(text: &str) -> String {
    let folded: String = ascii_fold(text)
        .chars()
        .map(|c| if c.is_ascii_alphabetic() { c.to_ascii_lowercase() } else { ' ' })
        .collect();
    collapse_whitespace(&folded)
}

/// Lowercase alphanumeric words of a full name, accents folded.
pub fn clean_full_name(text: &str) -> String {
    let folded: String = ascii_fold(text)
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { ' ' })
        .collect();
    collapse_whitespace(&folded)
}

fn same_nickname_group(a: &str, b: &str) -> bool {
    NICKNAME_GROUPS
        .iter()
        .any(|group| group.contains(&a) && group.contains(&b))
}

/// American Soundex code ("Robert" -> "R163").
pub fn soundex(word: &str) -> Option<String> {
    fn code(c: char) -> Option<char> {
        match c {
            'b' | 'f' | 'p' | 'v' => Some('1'),
            'c' | 'g' | 'j' | 'k' | 'q' | 's' | 'x' | 'z' => Some('2'),
            'd' | 't' => Some('3'),
            'l' => Some('4'),
            'm' | 'n' => Some('5'),
            'r' => Some('6'),
            _ => None,
        }
    }

    let letters: Vec<char> = word
        .chars()
        .filter(|c| c.is_ascii_alphabetic())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    let first = *letters.first()?;

    let mut out = String::with_capacity(4);
    out.push(first.to_ascii_uppercase());
    let mut last = code(first);
    for &c in &letters[1..] {
        let current = code(c);
        match current {
            Some(digit) if current != last => {
                out.push(digit);
                if out.len() == 4 {
                    break;
                }
            }
            _ => {}
        }
        // h and w do not separate equal codes; vowels do
        if c != 'h' && c != 'w' {
            last = current;
        }
    }
    while out.len() < 4 {
        out.push('0');
    }
    Some(out)
}

/// Given-name agreement in [0, 1]. Inputs should already be cleaned.
pub fn compare_first_names(a: &str, b: &str, use_nicknames: bool) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    if use_nicknames && same_nickname_group(a, b) {
        return 0.95;
    }
    let (short, long) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    if short.len() == 1 {
        return if long.starts_with(short) { 0.7 } else { 0.0 };
    }
    jaro_winkler(a, b)
}

/// Family-name agreement in [0, 1]. Shared hyphenated parts and Soundex
/// agreement lift an edit-distance score.
pub fn compare_last_names(a: &str, b: &str) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    if a == b {
        return 1.0;
    }
    let parts_a: Vec<&str> = a.split_whitespace().collect();
    if parts_a.len() > 1 || b.contains(' ') {
        if b.split_whitespace().any(|p| parts_a.contains(&p)) {
            return 0.9;
        }
    }
    let jw = jaro_winkler(a, b);
    if jw >= 0.8 && soundex(a).is_some() && soundex(a) == soundex(b) {
        return jw.max(0.9);
    }
    jw
}

fn initial(text: &str) -> Option<char> {
    text.chars().next()
}

/// Name similarity in [0, 100]: weighted first/last comparison with middle-name
/// adjustments and swap detection, a full-name fallback, then guardrails
/// against partial agreement.
pub fn name_score(a: &NameFields, b: &NameFields) -> f64 {
    let component = |v: &Option<String>| v.as_deref().map(clean_component).unwrap_or_default();
    let (first_a, first_b) = (component(&a.first), component(&b.first));
    let (last_a, last_b) = (component(&a.last), component(&b.last));
    let (middle_a, middle_b) = (component(&a.middle), component(&b.middle));
    let full = |n: &NameFields| n.full.as_deref().map(clean_full_name).unwrap_or_default();
    let (full_a, full_b) = (full(a), full(b));

    let use_components =
        !first_a.is_empty() && !first_b.is_empty() && !last_a.is_empty() && !last_b.is_empty();
    let mut first = 0.0;
    let mut last = 0.0;
    let mut swapped = 0.0;
    let mut base = 0.0;

    if use_components {
        first = compare_first_names(&first_a, &first_b, true);
        last = compare_last_names(&last_a, &last_b);
        base = 100.0 * (NAME_FIRST_SHARE * first + NAME_LAST_SHARE * last);

        match (middle_a.is_empty(), middle_b.is_empty()) {
            (true, true) => {}
            (false, false) if middle_a == middle_b => base += 5.0,
            (false, false) if initial(&middle_a) == initial(&middle_b) => base += 3.0,
            (false, false) => base -= 5.0,
            _ => base -= 2.0,
        }

        if initial(&first_a) == initial(&first_b) && last_a == last_b {
            base = base.max(NAME_INITIAL_LAST_FLOOR);
        }

        swapped = 100.0
            * (NAME_FIRST_SHARE * compare_first_names(&first_a, &last_b, false)
                + NAME_LAST_SHARE * compare_last_names(&last_a, &first_b));
        base = base.max(swapped * NAME_SWAP_DISCOUNT);
    }

    if !full_a.is_empty() && !full_b.is_empty() {
        base = base.max(token_set_ratio(&full_a, &full_b));
    }

    if use_components && swapped < 80.0 {
        if last == 1.0 && first < 0.5 {
            if initial(&first_a) != initial(&first_b) {
                base = base.min(NAME_INCOMPATIBLE_INITIAL_CAP);
            } else {
                base = base.max(NAME_SHARED_INITIAL_FLOOR);
            }
        }
        if first >= 0.95 && last < 0.5 {
            base = base.min(NAME_FIRST_ONLY_CAP);
        }
        if first < 0.65 && last < 0.9 {
            base = base.min(NAME_WEAK_BOTH_CAP);
        }
    }

    debug!(
        "Name score '{}' vs '{}': first {:.2}, last {:.2}, swapped {:.1} -> {:.1}",
        full_a, full_b, first, last, swapped, base
    );
    base.clamp(0.0, 100.0)
}
