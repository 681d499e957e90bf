//! Label normalization for ontology classes
//!
//! Ontology documents label their classes in every casing imaginable
//! (`sequence_variant`, `SequenceVariant`, `sequence variant`). Graph keys are
//! always the "lower sentence case" form; display labels use PascalCase.

use once_cell::sync::Lazy;
use regex::Regex;

static WORD_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|\s)([a-zA-Z])").expect("word start pattern is valid"));

/// Normalize a label to lower sentence case.
///
/// # Example
/// ```
/// use biokg_core::ontology::case::to_lower_sentence_case;
///
/// assert_eq!(to_lower_sentence_case("sequence_variant"), "sequence variant");
/// assert_eq!(to_lower_sentence_case("GeneOrGeneProduct"), "gene or gene product");
/// assert_eq!(to_lower_sentence_case("Protein Complex"), "protein complex");
/// assert_eq!(to_lower_sentence_case("hgnc.gene"), "hgnc.gene");
/// ```
pub fn to_lower_sentence_case(s: &str) -> String {
    if s.contains('_') {
        s.replace('_', " ").to_lowercase()
    } else if s.contains(' ') {
        s.to_lowercase()
    } else if s.chars().next().map_or(false, char::is_uppercase) {
        pascal_to_sentence_case(s)
    } else {
        s.to_string()
    }
}

/// Split a PascalCase word at case boundaries and lower-case it.
///
/// Runs of capitals are kept together as an acronym: `RNAProduct` becomes
/// `rna product`, not `r n a product`.
pub fn pascal_to_sentence_case(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).map_or(false, |n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_is_lower) {
                out.push(' ');
            }
        }
        out.extend(c.to_lowercase());
    }

    out
}

/// Convert a sentence-case label to PascalCase for display.
///
/// # Example
/// ```
/// use biokg_core::ontology::case::sentence_to_pascal_case;
///
/// assert_eq!(sentence_to_pascal_case("altered gene product level"), "AlteredGeneProductLevel");
/// ```
pub fn sentence_to_pascal_case(s: &str) -> String {
    WORD_START
        .replace_all(s, |caps: &regex::Captures| caps[1].to_uppercase())
        .into_owned()
}

/// Strip a namespace from an IRI: everything up to the last `#` or `/`.
///
/// Identifiers without a namespace separator are returned unchanged.
pub fn remove_prefix(iri: &str) -> &str {
    match iri.rfind(|c: char| c == '#' || c == '/') {
        Some(pos) if pos + 1 < iri.len() => &iri[pos + 1..],
        _ => iri,
    }
}
