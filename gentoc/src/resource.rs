//! Resource references and the name matching rule used to look them up.

use crate::extract::DEFAULT_NAMESPACE;
use regex::RegexBuilder;
use std::fmt;

/// A resource named in the mapping file: `user` or `microsoft.graph.security.alert`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    pub name: String,
    pub namespace: String,
}

impl Resource {
    /// Split on the last `.`; a bare name lands in the default namespace.
    pub fn parse(value: &str) -> Self {
        match value.rsplit_once('.') {
            Some((namespace, name)) => Self {
                name: name.to_string(),
                namespace: namespace.to_string(),
            },
            None => Self {
                name: value.to_string(),
                namespace: DEFAULT_NAMESPACE.to_string(),
            },
        }
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.namespace, self.name)
    }
}

/// Compare two resource names.
///
/// Plain case-insensitive equality first. When that fails and both names look
/// like operation signatures (contain `(` and `{`), compare again with single
/// quotes made optional, since parameter placeholders appear both as `'{id}'`
/// and `{id}`.
pub fn names_match(value: &str, compare_to: &str) -> bool {
    if value.to_lowercase() == compare_to.to_lowercase() {
        return true;
    }
    is_signature(value)
        && is_signature(compare_to)
        && (quote_insensitive_match(value, compare_to) || quote_insensitive_match(compare_to, value))
}

fn is_signature(value: &str) -> bool {
    value.contains('(') && value.contains('{')
}

/// Match `value` against `pattern`, where every `'` in `pattern` is optional.
fn quote_insensitive_match(value: &str, pattern: &str) -> bool {
    let pattern = format!("^{}$", regex::escape(pattern).replace('\'', "'?"));
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .is_ok_and(|re| re.is_match(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_gets_default_namespace() {
        let resource = Resource::parse("user");
        assert_eq!(resource.name, "user");
        assert_eq!(resource.namespace, "microsoft.graph");
    }

    #[test]
    fn qualified_name_splits_on_last_dot() {
        let resource = Resource::parse("microsoft.graph.security.alert");
        assert_eq!(resource.name, "alert");
        assert_eq!(resource.namespace, "microsoft.graph.security");
        assert_eq!(resource.to_string(), "microsoft.graph.security.alert");
    }

    #[test]
    fn names_match_ignores_case() {
        assert!(names_match("servicePrincipal", "SERVICEPRINCIPAL"));
        assert!(!names_match("servicePrincipal", "servicePrincipals"));
    }

    #[test]
    fn placeholder_quotes_are_optional() {
        assert!(names_match(
            "getByIds(ids={ids})",
            "getByIds(ids='{ids}')"
        ));
        assert!(names_match(
            "reminderView(StartDateTime='{startDateTime}',EndDateTime='{endDateTime}')",
            "reminderview(StartDateTime={startDateTime},EndDateTime={endDateTime})"
        ));
    }

    #[test]
    fn placeholder_rule_needs_signatures_on_both_sides() {
        assert!(!names_match("user'", "user"));
        assert!(!names_match("get(x='{a}')", "get(x={b})"));
    }

    #[test]
    fn signature_pattern_is_literal() {
        // Dots and other metacharacters do not act as wildcards.
        assert!(!names_match("a.b(x={y})", "aXb(x={y})"));
    }
}
