// src/matching/email.rs - E-mail address scoring
use std::fmt;

use crate::matching::similarity::ratio;
use crate::models::record::EmailFields;
use crate::utils::constants::{
    EMAIL_ALIAS_SCORE, EMAIL_FUZZY_HIGH_SCORE, EMAIL_FUZZY_MEDIUM_SCORE, EMAIL_SUBSTRING_SCORE,
};

/// Host labels agencies put in front of their mail domain
/// ("jdoe@mail.springfield.gov" reaches the same inbox as "jdoe@springfield.gov").
const MAIL_HOST_LABELS: [&str; 5] = ["mail", "email", "webmail", "exchange", "smtp"];

/// Consumer providers whose local parts ignore dots.
const DOT_INSENSITIVE_DOMAINS: [&str; 1] = ["gmail.com"];

/// The inbox an address delivers to, after alias folding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mailbox {
    pub local: String,
    pub domain: String,
}

impl Mailbox {
    /// Parse and fold an address: case and whitespace ignored, `+tag`
    /// sub-addresses dropped, mail-host labels stripped from the domain,
    /// googlemail folded into gmail. `None` when either side is empty.
    pub fn parse(raw: &str) -> Option<Self> {
        let lowered = raw.trim().to_lowercase();
        let (local, domain) = lowered.rsplit_once('@')?;

        let mut domain = domain.trim_matches('.');
        if domain == "googlemail.com" {
            domain = "gmail.com";
        }
        while let Some((label, rest)) = domain.split_once('.') {
            if MAIL_HOST_LABELS.contains(&label) && rest.contains('.') {
                domain = rest;
            } else {
                break;
            }
        }

        let local = local.split('+').next().unwrap_or_default();
        let local = if DOT_INSENSITIVE_DOMAINS.contains(&domain) {
            local.replace('.', "")
        } else {
            local.to_string()
        };

        if local.is_empty() || domain.is_empty() {
            return None;
        }
        Some(Self {
            local,
            domain: domain.to_string(),
        })
    }

    /// Local part with `.`, `-` and `_` removed, for loose comparison.
    fn base(&self) -> String {
        self.local.chars().filter(|c| !matches!(c, '.' | '-' | '_')).collect()
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.local, self.domain)
    }
}

/// Folded mailbox form of an address, empty when it is not usable.
pub fn normalize_email(email: &str) -> String {
    Mailbox::parse(email).map(|m| m.to_string()).unwrap_or_default()
}

/// Address similarity in [0, 100]. Only addresses on the same (folded)
/// domain can score between 0 and 100.
pub fn email_score(a: &EmailFields, b: &EmailFields) -> f64 {
    if a.normalized.is_empty() || b.normalized.is_empty() {
        return 0.0;
    }
    if a.normalized == b.normalized {
        return 100.0;
    }

    let (mailbox_a, mailbox_b) = match (Mailbox::parse(&a.normalized), Mailbox::parse(&b.normalized)) {
        (Some(ma), Some(mb)) => (ma, mb),
        _ => return 0.0,
    };
    if mailbox_a == mailbox_b {
        return EMAIL_ALIAS_SCORE;
    }
    if mailbox_a.domain != mailbox_b.domain {
        return 0.0;
    }

    let base_a = mailbox_a.base();
    let base_b = mailbox_b.base();
    if base_a.is_empty() || base_b.is_empty() {
        return 0.0;
    }
    if base_a.contains(&base_b) || base_b.contains(&base_a) {
        return EMAIL_SUBSTRING_SCORE;
    }

    let local_ratio = ratio(&base_a, &base_b);
    if local_ratio >= 80.0 {
        EMAIL_FUZZY_HIGH_SCORE
    } else if local_ratio >= 60.0 {
        EMAIL_FUZZY_MEDIUM_SCORE
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(s: &str) -> EmailFields {
        EmailFields::new(s)
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email(" John.Doe+work@GoogleMail.com "), "johndoe@gmail.com");
        assert_eq!(normalize_email("j.doe+x@city.gov"), "j.doe@city.gov");
        assert_eq!(normalize_email("+tag@city.gov"), "");
        assert_eq!(normalize_email("not-an-address"), "");
    }

    #[test]
    fn test_agency_mail_hosts_fold_into_the_domain() {
        assert_eq!(normalize_email("JDoe@mail.springfield.gov"), "jdoe@springfield.gov");
        assert_eq!(normalize_email("jdoe@webmail.mail.springfield.gov"), "jdoe@springfield.gov");
        assert_eq!(normalize_email("jdoe@mail.gov"), "jdoe@mail.gov");
        assert_eq!(
            email_score(&email("jdoe@mail.springfield.gov"), &email("jdoe+permits@springfield.gov")),
            EMAIL_ALIAS_SCORE
        );
        assert_eq!(
            email_score(&email("jdoe@mail.springfield.gov"), &email("john.doe@springfield.gov")),
            EMAIL_FUZZY_MEDIUM_SCORE
        );
    }

    #[test]
    fn test_email_score_bands() {
        assert_eq!(email_score(&email("a@x.org"), &email("A@X.org")), 100.0);
        assert_eq!(email_score(&email("john+work@x.org"), &email("john+home@x.org")), EMAIL_ALIAS_SCORE);
        assert_eq!(email_score(&email("rchen@x.org"), &email("robert.rchen@x.org")), EMAIL_SUBSTRING_SCORE);
        assert_eq!(email_score(&email("jsmith@x.org"), &email("jsmyth@x.org")), EMAIL_FUZZY_HIGH_SCORE);
        assert_eq!(email_score(&email("rchen@x.org"), &email("rchen@y.org")), 0.0);
        assert_eq!(email_score(&email("alice@x.org"), &email("bob@x.org")), 0.0);
        assert_eq!(email_score(&email(""), &email("bob@x.org")), 0.0);
    }
}
