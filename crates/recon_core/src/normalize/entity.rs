//! Legal entity name folding.

/// Long forms mapped onto the short form used for comparison.
const SUFFIX_FORMS: &[(&str, &str)] = &[
    ("incorporated", "inc"),
    ("corporation", "corp"),
    ("limited", "ltd"),
    ("company", "co"),
    ("international", "intl"),
    ("aktiengesellschaft", "ag"),
    ("societe", "sa"),
    ("société", "sa"),
    ("anonyme", "sa"),
];

/// Short legal forms that may precede a folded suffix, as in
/// `International plc`.
const SHORT_FORMS: &[&str] = &[
    "inc", "corp", "ltd", "co", "intl", "ag", "sa", "plc", "llc", "llp", "lp", "gmbh", "nv",
    "bv", "spa", "srl",
];

fn fold_suffix(token: &str) -> Option<&'static str> {
    SUFFIX_FORMS
        .iter()
        .find(|(long, _)| *long == token)
        .map(|(_, short)| *short)
        .or_else(|| SHORT_FORMS.iter().find(|short| **short == token).copied())
}

/// Folds an entity name for fuzzy comparison.
///
/// Lower-cases, removes dots, commas and apostrophes (so `L.L.C.` becomes
/// `llc`), replaces `&` with `and`, turns any other punctuation into a
/// word break and unifies the legal suffixes that end the name
/// (`Incorporated` and `Inc.` both become `inc`). Only the trailing run of
/// legal forms is folded, so `Société Générale` keeps its first word.
/// Returns an empty string when nothing alphanumeric remains.
pub fn normalize_entity_name(raw: &str) -> String {
    let mut spaced = String::with_capacity(raw.len());
    for c in raw.to_lowercase().chars() {
        match c {
            '.' | ',' | '\'' | '’' => {}
            '&' => spaced.push_str(" and "),
            c if c.is_alphanumeric() => spaced.push(c),
            _ => spaced.push(' '),
        }
    }

    let mut tokens: Vec<&str> = spaced.split_whitespace().collect();
    for token in tokens.iter_mut().rev() {
        match fold_suffix(*token) {
            Some(short) => *token = short,
            None => break,
        }
    }
    // "societe anonyme" collapses to a single "sa".
    tokens.dedup_by(|a, b| *a == "sa" && *b == "sa");

    tokens.join(" ")
}
