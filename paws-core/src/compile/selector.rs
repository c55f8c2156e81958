//! Stage selection
//!
//! A selector is `group` or `group.subgroup`. A bare group selects every
//! stage of that group; segments past the second are ignored.

use std::fmt;

use crate::domain::pipeline::Stage;

/// Parsed stage selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub group: String,
    pub subgroup: Option<String>,
}

impl Selector {
    pub fn parse(input: &str) -> Self {
        let mut segments = input.split('.');
        let group = segments.next().unwrap_or_default().to_string();
        let subgroup = segments.next().map(str::to_string);
        Self { group, subgroup }
    }

    /// Whether `stage` takes part in a run with this selector
    pub fn matches(&self, stage: &Stage) -> bool {
        stage.group == self.group
            && self
                .subgroup
                .as_ref()
                .is_none_or(|subgroup| *subgroup == stage.subgroup)
    }

    /// Selected stages, in document order
    pub fn select<'a>(&self, stages: &'a [Stage]) -> Vec<&'a Stage> {
        stages.iter().filter(|stage| self.matches(stage)).collect()
    }
}

impl From<&str> for Selector {
    fn from(s: &str) -> Self {
        Selector::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.subgroup {
            Some(subgroup) => write!(f, "{}.{}", self.group, subgroup),
            None => write!(f, "{}", self.group),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage(group: &str, subgroup: &str) -> Stage {
        Stage {
            group: group.to_string(),
            subgroup: subgroup.to_string(),
            ..Default::default()
        }
    }

    fn stages() -> Vec<Stage> {
        vec![
            stage("build", "lint"),
            stage("build", "test"),
            stage("deploy", "staging"),
        ]
    }

    #[test]
    fn test_parse_group_only() {
        let selector = Selector::parse("build");
        assert_eq!(selector.group, "build");
        assert_eq!(selector.subgroup, None);
        assert_eq!(selector.to_string(), "build");
    }

    #[test]
    fn test_parse_group_and_subgroup() {
        let selector = Selector::parse("build.lint");
        assert_eq!(selector.group, "build");
        assert_eq!(selector.subgroup.as_deref(), Some("lint"));
        assert_eq!(selector.to_string(), "build.lint");
    }

    #[test]
    fn test_parse_ignores_extra_segments() {
        let selector = Selector::parse("build.lint.extra");
        assert_eq!(selector, Selector::parse("build.lint"));
    }

    #[test]
    fn test_group_selector_is_subgroup_wildcard() {
        let stages = stages();
        let selected = Selector::parse("build").select(&stages);
        let names: Vec<String> = selected.iter().map(|s| s.qualified_name()).collect();
        assert_eq!(names, vec!["build.lint", "build.test"]);
    }

    #[test]
    fn test_two_segment_selector_is_exact() {
        let stages = stages();
        let selected = Selector::parse("build.test").select(&stages);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].qualified_name(), "build.test");
    }

    #[test]
    fn test_unmatched_selector_selects_nothing() {
        let stages = stages();
        assert!(Selector::parse("release").select(&stages).is_empty());
        assert!(Selector::parse("build.deploy").select(&stages).is_empty());
        assert!(Selector::from("").select(&stages).is_empty());
    }
}
