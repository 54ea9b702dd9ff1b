use serde::{Deserialize, Serialize};

/// Tolerance applied after an exact (trimmed, case-insensitive) string comparison fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchPolicy {
    /// Drop punctuation before comparing, so `J.P. Morgan` equals `JP Morgan`.
    pub ignore_punctuation: bool,
    /// Collapse runs of internal whitespace to a single space.
    pub collapse_whitespace: bool,
    /// Treat exit reasons that classify to the same known category as matching.
    pub match_exit_reason_aliases: bool,
}

impl Default for MatchPolicy {
    fn default() -> Self {
        Self {
            ignore_punctuation: true,
            collapse_whitespace: true,
            match_exit_reason_aliases: true,
        }
    }
}

impl MatchPolicy {
    /// Exact policy: only the trimmed, case-insensitive comparison can succeed.
    pub const fn strict() -> Self {
        Self {
            ignore_punctuation: false,
            collapse_whitespace: false,
            match_exit_reason_aliases: false,
        }
    }

    pub(crate) fn is_tolerant(&self) -> bool {
        self.ignore_punctuation || self.collapse_whitespace
    }

    pub(crate) fn normalize(&self, value: &str) -> String {
        let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
        let cleaned: String = if self.ignore_punctuation {
            cleaned
                .chars()
                .filter(|ch| !ch.is_ascii_punctuation() && !is_unicode_punctuation(*ch))
                .collect()
        } else {
            cleaned
        };
        let collapsed = if self.collapse_whitespace {
            cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
        } else {
            cleaned.trim().to_string()
        };
        collapsed.to_lowercase()
    }

    /// Equality under this policy's tolerances. A key that normalizes to nothing never matches.
    pub(crate) fn tolerant_eq(&self, claimed: &str, on_record: &str) -> bool {
        if !self.is_tolerant() {
            return false;
        }
        let (claimed, on_record) = (self.normalize(claimed), self.normalize(on_record));
        if claimed.is_empty() || on_record.is_empty() {
            return false;
        }
        // Dropping punctuation can leave spacing behind (`Pvt.Ltd.` vs `Pvt. Ltd.`).
        claimed == on_record
            || (self.ignore_punctuation
                && without_whitespace(&claimed) == without_whitespace(&on_record))
    }
}

fn without_whitespace(value: &str) -> String {
    value.chars().filter(|ch| !ch.is_whitespace()).collect()
}

pub(crate) fn exact_key(value: &str) -> String {
    value.trim().to_lowercase()
}

fn is_unicode_punctuation(ch: char) -> bool {
    matches!(
        ch,
        '\u{2010}'..='\u{2027}' | '\u{00a1}' | '\u{00ab}' | '\u{00b7}' | '\u{00bb}' | '\u{00bf}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_strips_punctuation_and_spacing() {
        let policy = MatchPolicy::default();
        assert_eq!(policy.normalize("  J.P.  Morgan,\tLtd "), "jp morgan ltd");
        assert_eq!(policy.normalize("O\u{2019}Brien"), "obrien");
    }

    #[test]
    fn strict_policy_only_trims_and_lowercases() {
        let policy = MatchPolicy::strict();
        assert!(!policy.is_tolerant());
        assert_eq!(policy.normalize(" J.P. Morgan "), "j.p. morgan");
        assert!(!policy.tolerant_eq("J.P. Morgan", "JP Morgan"));
    }

    #[test]
    fn punctuation_spacing_is_ignored_with_the_punctuation() {
        let policy = MatchPolicy::default();
        assert!(policy.tolerant_eq("Acme Pvt.Ltd.", "Acme Pvt. Ltd."));
        assert!(policy.tolerant_eq("J.P. Morgan", "JP Morgan"));

        let spacing_only = MatchPolicy {
            ignore_punctuation: false,
            ..MatchPolicy::default()
        };
        assert!(!spacing_only.tolerant_eq("Acme Pvt.Ltd.", "Acme Pvt. Ltd."));
        assert!(spacing_only.tolerant_eq("Acme  Pvt. Ltd.", "Acme Pvt. Ltd."));
    }

    #[test]
    fn keys_that_normalize_to_nothing_never_match() {
        let policy = MatchPolicy::default();
        assert!(!policy.tolerant_eq("-", ""));
        assert!(!policy.tolerant_eq("...", "--"));
    }
}
