use once_cell::sync::Lazy;
use regex::{Captures, Regex};

// String literals are matched first and passed through untouched.
static FILTER_REWRITE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?P<literal>'(?:[^']|'')*')",
        r"|(?P<cast>(?i:::(?:character varying|double precision|timestamp without time zone|timestamp with time zone|[a-z_][a-z0-9_]*)(?:\(\d+(?:,\s*\d+)?\))?(?:\[\])?))",
        r"|(?P<not_like>\s*!~~\s*)",
        r"|(?P<like>\s*~~\s*)",
    ))
    .expect("valid filter rewrite regex")
});

static SYNTHETIC_OBJECT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^island_(?:aggregate|pruned|intermediate|cast)_[0-9]+$").expect("valid regex")
});

/// Prefix shared by every planner-generated intermediate object name.
pub const SYNTHETIC_PREFIX: &str = "island_";

/// Removes `::type` cast artifacts and rewrites `~~` / `!~~` as `LIKE` / `NOT LIKE`,
/// the form explain output hands back for relational filters.
pub fn normalize_filter_text(text: &str) -> String {
    FILTER_REWRITE
        .replace_all(text, |caps: &Captures| {
            if let Some(literal) = caps.name("literal") {
                literal.as_str().to_string()
            } else if caps.name("not_like").is_some() {
                " NOT LIKE ".to_string()
            } else if caps.name("like").is_some() {
                " LIKE ".to_string()
            } else {
                String::new()
            }
        })
        .trim()
        .to_string()
}

/// Intermediate results are named `island_<kind>_<n>`; base objects never are.
pub fn is_synthetic_object_name(name: &str) -> bool {
    SYNTHETIC_OBJECT.is_match(name)
}

/// Builds a synthetic name such as `island_pruned_3`.
pub fn synthetic_object_name(kind: &str, ordinal: usize) -> String {
    format!("{SYNTHETIC_PREFIX}{}_{ordinal}", kind.to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use crate::parser::{is_synthetic_object_name, normalize_filter_text, synthetic_object_name};

    #[test]
    pub fn test_normalize_strips_cast_artifacts() {
        assert_eq!(
            normalize_filter_text("(r_name = 'AMERICA'::bpchar)"),
            "(r_name = 'AMERICA')"
        );
        assert_eq!(
            normalize_filter_text("o_orderdate < '1996-01-02'::date AND c_name = 'x'::character varying(25)"),
            "o_orderdate < '1996-01-02' AND c_name = 'x'"
        );
    }

    #[test]
    pub fn test_normalize_converts_like_operators() {
        assert_eq!(normalize_filter_text("p_type ~~ '%BRASS'"), "p_type LIKE '%BRASS'");
        assert_eq!(normalize_filter_text("p_type !~~ '%BRASS'::text"), "p_type NOT LIKE '%BRASS'");
    }

    #[test]
    pub fn test_normalize_leaves_string_literals_alone() {
        assert_eq!(normalize_filter_text("note = 'a~~b'"), "note = 'a~~b'");
        assert_eq!(normalize_filter_text("note = 'a !~~ b'"), "note = 'a !~~ b'");
        assert_eq!(normalize_filter_text("tag = 'x::int'::text"), "tag = 'x::int'");
        assert_eq!(
            normalize_filter_text("name = 'it''s ~~ ok' AND t ~~ 'a~~b'"),
            "name = 'it''s ~~ ok' AND t LIKE 'a~~b'"
        );
    }

    #[test]
    pub fn test_normalize_recognizes_synthetic_names() {
        assert!(is_synthetic_object_name("island_aggregate_1"));
        assert!(is_synthetic_object_name("ISLAND_PRUNED_12"));
        assert!(!is_synthetic_object_name("orders"));
        assert!(!is_synthetic_object_name("island_orders_1"));
        assert_eq!(synthetic_object_name("Pruned", 4), "island_pruned_4");
        assert!(is_synthetic_object_name(&synthetic_object_name("cast", 2)));
    }
}
