// src/matching/mod.rs

pub mod compare;
pub mod department;
pub mod email;
pub mod engine;
pub mod name;
pub mod phone;
pub mod semantic;
pub mod similarity;
pub mod title;

// Re-export the resolver entry points under their public names
pub use compare::{compare, compare_explained};
pub use department::{
    category as department_category, find_all_matches as find_all_department_matches,
    normalize_department, resolve as resolve_department_with,
    resolve_with_overrides as resolve_department_with_overrides,
    similarity as department_similarity,
};
pub use semantic::semantic_conflict;
pub use title::{
    extract_seniority, find_all_matches as find_all_title_matches, normalize_title,
    resolve as resolve_title_with, resolve_with_overrides as resolve_title_with_overrides,
    similarity as title_similarity,
};
