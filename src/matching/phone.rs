// src/matching/phone.rs - Phone number scoring
use crate::models::record::PhoneFields;

fn same(a: &Option<String>, b: &Option<String>) -> bool {
    match (a.as_deref(), b.as_deref()) {
        (Some(a), Some(b)) if !a.is_empty() => a.eq_ignore_ascii_case(b),
        _ => false,
    }
}

/// 100 when the E.164 forms (or, failing that, the pretty forms) agree,
/// otherwise 0. Extensions are ignored.
pub fn phone_score(a: &PhoneFields, b: &PhoneFields) -> f64 {
    if same(&a.e164, &b.e164) || same(&a.pretty, &b.pretty) {
        100.0
    } else {
        0.0
    }
}
