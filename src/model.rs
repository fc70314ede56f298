//! In-Memory Policy Model
//!
//! Minimal rule collection the adapter loads into and saves from. Rules are
//! grouped by section ("p" permission rules, "g" role-grouping rules) and by
//! policy type tag within a section ("p", "p2", "g", "g2", ...).

use std::collections::BTreeMap;

/// All policy rules registered under one type tag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Assertion {
    /// Ordered positional arguments, one `Vec<String>` per rule.
    pub policy: Vec<Vec<String>>,
}

/// The engine's in-memory rule set.
///
/// Sections are keyed by the first character of the policy type tag, so a
/// "p2" rule lives under section "p" next to plain "p" rules.
#[derive(Debug, Clone, Default)]
pub struct Model {
    sections: BTreeMap<String, BTreeMap<String, Assertion>>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one flat-text rule line ("p, alice, data1, read") into the model.
    ///
    /// Blank lines and lines starting with `#` are ignored, matching the
    /// engine's own CSV policy parser.
    pub fn add_policy_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return;
        }

        let mut tokens = line.split(',').map(str::trim);
        let ptype = match tokens.next() {
            Some(t) if !t.is_empty() => t.to_string(),
            _ => return,
        };
        let rule: Vec<String> = tokens.map(str::to_string).collect();

        let sec = section_of(&ptype);
        self.add_policy(&sec, &ptype, rule);
    }

    /// Append a rule under a section and type tag.
    pub fn add_policy(&mut self, sec: &str, ptype: &str, rule: Vec<String>) {
        self.sections
            .entry(sec.to_string())
            .or_default()
            .entry(ptype.to_string())
            .or_default()
            .policy
            .push(rule);
    }

    /// Get the rules stored under a section and type tag.
    pub fn get_policy(&self, sec: &str, ptype: &str) -> &[Vec<String>] {
        self.sections
            .get(sec)
            .and_then(|s| s.get(ptype))
            .map(|a| a.policy.as_slice())
            .unwrap_or(&[])
    }

    /// Iterate every (ptype, assertion) pair in a section.
    pub fn section(&self, sec: &str) -> impl Iterator<Item = (&str, &Assertion)> {
        self.sections
            .get(sec)
            .into_iter()
            .flat_map(|s| s.iter().map(|(k, v)| (k.as_str(), v)))
    }

    /// Drop every rule while keeping the section structure empty.
    pub fn clear_policy(&mut self) {
        self.sections.clear();
    }

    /// Total number of rules across all sections.
    pub fn rule_count(&self) -> usize {
        self.sections
            .values()
            .flat_map(|s| s.values())
            .map(|a| a.policy.len())
            .sum()
    }
}

/// Section key for a policy type tag ("p2" -> "p").
fn section_of(ptype: &str) -> String {
    ptype.chars().take(1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_policy_line() {
        let mut m = Model::new();
        m.add_policy_line("p, alice, data1, read");
        m.add_policy_line("g, alice, data2_admin");

        assert_eq!(
            m.get_policy("p", "p"),
            &[vec!["alice".to_string(), "data1".to_string(), "read".to_string()]]
        );
        assert_eq!(
            m.get_policy("g", "g"),
            &[vec!["alice".to_string(), "data2_admin".to_string()]]
        );
    }

    #[test]
    fn test_subtyped_ptype_sections() {
        let mut m = Model::new();
        m.add_policy_line("p2, bob, data2, write");

        // "p2" rules live in the "p" section under their own tag
        assert!(m.get_policy("p", "p").is_empty());
        assert_eq!(m.get_policy("p", "p2").len(), 1);
        assert_eq!(m.section("p").count(), 1);
    }

    #[test]
    fn test_blank_and_comment_lines_ignored() {
        let mut m = Model::new();
        m.add_policy_line("");
        m.add_policy_line("   ");
        m.add_policy_line("# p, alice, data1, read");
        assert_eq!(m.rule_count(), 0);
    }

    #[test]
    fn test_clear_policy() {
        let mut m = Model::new();
        m.add_policy_line("p, alice, data1, read");
        m.clear_policy();
        assert_eq!(m.rule_count(), 0);
        assert!(m.get_policy("p", "p").is_empty());
    }

    #[test]
    fn test_whitespace_trimmed() {
        let mut m = Model::new();
        m.add_policy_line("  p ,  alice ,data1,   read ");
        assert_eq!(
            m.get_policy("p", "p"),
            &[vec!["alice".to_string(), "data1".to_string(), "read".to_string()]]
        );
    }
}
