//! Input validation for item fields and list options.
//!
//! Sort keys use three-tier resolution: exact match → synonym lookup →
//! error with suggestion. Field checks reject what the table would accept
//! but no caller means (blank names, non-numeric prices).

use crate::contract::{COLUMN_ID, COLUMN_NAME, COLUMN_PRICE, COLUMN_QUANTITY};
use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

// ── Valid value sets (O(1) lookups) ──────────────────────────

pub static VALID_SORT_KEYS: LazyLock<HashSet<&str>> = LazyLock::new(|| {
    [COLUMN_ID, COLUMN_NAME, COLUMN_QUANTITY, COLUMN_PRICE]
        .into_iter()
        .collect()
});

// ── Synonym maps (typo recovery) ─────────────────────────────

pub static SORT_SYNONYMS: LazyLock<HashMap<&str, &str>> = LazyLock::new(|| {
    [
        ("qty", COLUMN_QUANTITY),
        ("stock", COLUMN_QUANTITY),
        ("count", COLUMN_QUANTITY),
        ("amount", COLUMN_QUANTITY),
        ("cost", COLUMN_PRICE),
        ("value", COLUMN_PRICE),
        ("title", COLUMN_NAME),
        ("item", COLUMN_NAME),
        ("newest", COLUMN_ID),
        ("added", COLUMN_ID),
    ]
    .into_iter()
    .collect()
});

/// Normalize a sort key via exact match or synonym lookup.
///
/// Returns the canonical column name, or an error with the original input
/// and an optional suggestion.
pub fn normalize_sort_key(input: &str) -> std::result::Result<&'static str, (String, Option<String>)> {
    let lower = input.trim().to_lowercase();

    // Tier 1: exact match
    if let Some(&key) = VALID_SORT_KEYS.get(lower.as_str()) {
        return Ok(key);
    }

    // Tier 2: synonym lookup
    if let Some(&canonical) = SORT_SYNONYMS.get(lower.as_str()) {
        return Ok(canonical);
    }

    // Tier 3: find closest suggestion
    let suggestion = find_closest_match(&lower, &VALID_SORT_KEYS, &SORT_SYNONYMS);
    Err((input.to_string(), suggestion))
}

/// `ORDER BY` body for a sort key.
///
/// Price is stored as text, so it is compared numerically.
///
/// # Errors
///
/// Returns `InvalidArgument` naming the closest valid key.
pub fn sort_order(input: &str, descending: bool) -> Result<String> {
    let key = normalize_sort_key(input).map_err(|(bad, suggestion)| {
        let mut msg = format!("Unknown sort key '{bad}'");
        if let Some(s) = suggestion {
            msg.push_str(&format!(" (did you mean '{s}'?)"));
        }
        Error::InvalidArgument(msg)
    })?;

    let column = if key == COLUMN_PRICE {
        format!("CAST({COLUMN_PRICE} AS REAL)")
    } else {
        key.to_string()
    };
    let direction = if descending { "DESC" } else { "ASC" };
    Ok(format!("{column} {direction}, {COLUMN_ID} ASC"))
}

/// Trimmed item name.
///
/// # Errors
///
/// Returns `InvalidArgument` for a blank name.
pub fn validate_name(input: &str) -> Result<String> {
    let name = input.trim();
    if name.is_empty() {
        return Err(Error::InvalidArgument("Please enter a valid name".to_string()));
    }
    Ok(name.to_string())
}

/// Parse a stock count.
///
/// # Errors
///
/// Returns `InvalidArgument` unless the input is a whole number, and
/// `NegativeQuantity` if it is below zero.
pub fn parse_quantity(input: &str) -> Result<i64> {
    let quantity: i64 = input
        .trim()
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("Please enter a valid quantity: '{input}'")))?;
    if quantity < 0 {
        return Err(Error::NegativeQuantity { quantity });
    }
    Ok(quantity)
}

/// Trimmed price text.
///
/// # Errors
///
/// Returns `InvalidArgument` unless the input is a finite, non-negative number.
pub fn validate_price(input: &str) -> Result<String> {
    let price = input.trim();
    match price.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(price.to_string()),
        _ => Err(Error::InvalidArgument(format!(
            "Please enter a valid price: '{input}'"
        ))),
    }
}

/// Trimmed optional text; blank becomes `None`.
#[must_use]
pub fn non_blank(input: Option<&str>) -> Option<String> {
    input
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

/// Find the closest matching value across valid set and synonyms.
///
/// Ties at the same distance go to the alphabetically first suggestion.
fn find_closest_match(
    input: &str,
    valid: &HashSet<&str>,
    synonyms: &HashMap<&str, &str>,
) -> Option<String> {
    valid
        .iter()
        .chain(synonyms.keys())
        .filter_map(|&v| {
            let dist = levenshtein_distance(input, v);
            // For synonyms, show what it maps to
            let shown = synonyms.get(v).copied().unwrap_or(v);
            (dist <= 2).then_some((dist, shown))
        })
        .min()
        .map(|(_, v)| v.to_string())
}

// ── Levenshtein distance ─────────────────────────────────────

/// Compute the Levenshtein edit distance between two strings.
#[must_use]
pub fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = usize::from(a[i - 1] != b[j - 1]);
            curr[j] = (prev[j] + 1) // deletion
                .min(curr[j - 1] + 1) // insertion
                .min(prev[j - 1] + cost); // substitution
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sort_key() {
        assert_eq!(normalize_sort_key("name"), Ok("name"));
        assert_eq!(normalize_sort_key("QUANTITY"), Ok("quantity"));
        assert_eq!(normalize_sort_key("qty"), Ok("quantity"));
        assert_eq!(normalize_sort_key("stock"), Ok("quantity"));
        assert_eq!(normalize_sort_key("cost"), Ok("price"));
        assert_eq!(normalize_sort_key("title"), Ok("name"));
    }

    #[test]
    fn test_unknown_sort_key_suggests() {
        let (bad, suggestion) = normalize_sort_key("prise").unwrap_err();
        assert_eq!(bad, "prise");
        assert_eq!(suggestion.as_deref(), Some("price"));

        let (_, suggestion) = normalize_sort_key("zzzzzzzz").unwrap_err();
        assert!(suggestion.is_none());
    }

    #[test]
    fn test_tied_suggestion_is_stable() {
        // "cout" is one edit from both "cost" (price) and "count" (quantity).
        for _ in 0..20 {
            let (_, suggestion) = normalize_sort_key("cout").unwrap_err();
            assert_eq!(suggestion.as_deref(), Some("price"));
        }
    }

    #[test]
    fn test_sort_order() {
        assert_eq!(sort_order("qty", true).unwrap(), "quantity DESC, id ASC");
        assert_eq!(
            sort_order("price", false).unwrap(),
            "CAST(price AS REAL) ASC, id ASC"
        );
        let err = sort_order("colour", false).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(ref m) if m.contains("sort key")));
    }

    #[test]
    fn test_validate_name() {
        assert_eq!(validate_name("  Headphones ").unwrap(), "Headphones");
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("45").unwrap(), 45);
        assert_eq!(parse_quantity(" 0 ").unwrap(), 0);
        assert!(matches!(parse_quantity("-2"), Err(Error::NegativeQuantity { quantity: -2 })));
        assert!(matches!(parse_quantity("4.5"), Err(Error::InvalidArgument(_))));
        assert!(matches!(parse_quantity(""), Err(Error::InvalidArgument(_))));
    }

    #[test]
    fn test_validate_price() {
        assert_eq!(validate_price("5").unwrap(), "5");
        assert_eq!(validate_price(" 12.99 ").unwrap(), "12.99");
        assert!(validate_price("").is_err());
        assert!(validate_price("five").is_err());
        assert!(validate_price("-1").is_err());
        assert!(validate_price("NaN").is_err());
    }

    #[test]
    fn test_non_blank() {
        assert_eq!(non_blank(Some(" acme ")), Some("acme".to_string()));
        assert_eq!(non_blank(Some("  ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_levenshtein() {
        assert_eq!(levenshtein_distance("", ""), 0);
        assert_eq!(levenshtein_distance("abc", "abc"), 0);
        assert_eq!(levenshtein_distance("abc", "abd"), 1);
        assert_eq!(levenshtein_distance("kitten", "sitting"), 3);
    }
}
