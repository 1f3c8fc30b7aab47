//! Brand-name variation generation for mention tracking.
//!
//! A tracked brand is matched under its common spellings, not just its
//! configured form: the full lowercased name, the name with corporate
//! suffixes stripped, and a fixed abbreviation table in both
//! directions. Variations shorter than 2 characters are dropped (they
//! would match everywhere).

use tracing::trace;

/// Well-known abbreviation ↔ expansion pairs, lowercase.
const ABBREVIATIONS: &[(&str, &str)] = &[
    ("vw", "volkswagen"),
    ("gm", "general motors"),
    ("ibm", "international business machines"),
    ("hp", "hewlett-packard"),
    ("ms", "microsoft"),
];

/// Corporate suffix tokens stripped from the end of a name, lowercase.
const CORPORATE_SUFFIXES: &[&str] = &[
    "inc",
    "corp",
    "ltd",
    "llc",
    "sa",
    "ag",
    "gmbh",
    "co",
    "company",
    "corporation",
];

/// All lowercase variations a brand should be matched under.
///
/// Order is deterministic: full name first, then the suffix-stripped
/// form, then abbreviation counterparts. Deduped; entries shorter than
/// 2 characters are dropped.
pub fn brand_variations(brand: &str) -> Vec<String> {
    let base = brand.trim().to_lowercase();
    if base.is_empty() {
        return Vec::new();
    }

    let mut candidates = vec![base.clone()];

    // Strip trailing corporate suffixes ("General Motors Company" →
    // "general motors"); punctuation around the token is ignored.
    let mut tokens: Vec<&str> = base.split_whitespace().collect();
    while let Some(last) = tokens.last() {
        let bare = last.trim_matches(|c: char| !c.is_alphanumeric());
        if tokens.len() > 1 && CORPORATE_SUFFIXES.contains(&bare) {
            tokens.pop();
        } else {
            break;
        }
    }
    candidates.push(tokens.join(" "));

    // Abbreviation table, both directions, keyed off every candidate
    // collected so far.
    for i in 0..candidates.len() {
        for (abbr, full) in ABBREVIATIONS {
            if candidates[i] == *abbr {
                candidates.push((*full).to_string());
            } else if candidates[i] == *full {
                candidates.push((*abbr).to_string());
            }
        }
    }

    let mut out: Vec<String> = Vec::new();
    for c in candidates {
        if c.chars().count() >= 2 && !out.contains(&c) {
            out.push(c);
        }
    }

    trace!(brand, ?out, "brand variations");
    out
}
