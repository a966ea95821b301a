//! Plan items and their presentation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ai::ValidationError;

/// What a plan item does to its file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanAction {
    /// Create a new file
    New,
    /// Change an existing file
    Modify,
    /// Delete an existing file
    Remove,
}

impl PlanAction {
    /// All actions, in display order.
    pub const ALL: [Self; 3] = [Self::New, Self::Modify, Self::Remove];

    /// Wire name, as it appears in backend payloads and persisted state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Modify => "modify",
            Self::Remove => "remove",
        }
    }

    /// Verb for user-facing output.
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "Create",
            Self::Modify => "Modify",
            Self::Remove => "Remove",
        }
    }

    /// Single-character marker for compact listings.
    pub fn icon(&self) -> &'static str {
        match self {
            Self::New => "+",
            Self::Modify => "~",
            Self::Remove => "-",
        }
    }
}

impl fmt::Display for PlanAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PlanAction {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownAction(s.to_string()))
    }
}

/// One proposed change to a single file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanItem {
    /// Path relative to the project root
    pub file: String,

    /// What to do with the file
    pub action: PlanAction,

    /// Free-text description of the change
    pub description: String,
}

impl PlanItem {
    /// Create a new plan item.
    pub fn new(
        file: impl Into<String>,
        action: PlanAction,
        description: impl Into<String>,
    ) -> Self {
        Self { file: file.into(), action, description: description.into() }
    }
}

/// Plan item counts by action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    /// Files to create
    pub new: usize,
    /// Files to modify
    pub modify: usize,
    /// Files to remove
    pub remove: usize,
}

impl PlanSummary {
    /// Count the items of a plan.
    pub fn from_items(items: &[PlanItem]) -> Self {
        items.iter().fold(Self::default(), |mut acc, item| {
            match item.action {
                PlanAction::New => acc.new += 1,
                PlanAction::Modify => acc.modify += 1,
                PlanAction::Remove => acc.remove += 1,
            }
            acc
        })
    }

    /// Total item count.
    pub fn total(&self) -> usize {
        self.new + self.modify + self.remove
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} new, {} modify, {} remove", self.new, self.modify, self.remove)
    }
}

/// Render a plan as a Markdown checklist.
pub fn plan_to_markdown(request: &str, items: &[PlanItem]) -> String {
    let mut md = String::from("# Change Plan\n\n");
    md.push_str(&format!("**Request:** {}\n\n", request));
    md.push_str(&format!("**Summary:** {}\n\n", PlanSummary::from_items(items)));

    for action in PlanAction::ALL {
        let group: Vec<_> = items.iter().filter(|i| i.action == action).collect();
        if group.is_empty() {
            continue;
        }

        md.push_str(&format!("## {}\n\n", action.label()));
        for item in group {
            md.push_str(&format!("- [ ] `{}` - {}\n", item.file, item.description));
        }
        md.push('\n');
    }

    md
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parse_is_strict() {
        assert_eq!("new".parse::<PlanAction>().unwrap(), PlanAction::New);
        assert_eq!("remove".parse::<PlanAction>().unwrap(), PlanAction::Remove);
        assert!("create".parse::<PlanAction>().is_err());
        assert!("Modify".parse::<PlanAction>().is_err());
        assert!("".parse::<PlanAction>().is_err());
    }

    #[test]
    fn test_action_serde_names() {
        let item = PlanItem::new("src/a.ts", PlanAction::Modify, "Tweak");
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.contains(r#""action":"modify""#));
    }

    #[test]
    fn test_summary_counts() {
        let items = vec![
            PlanItem::new("a", PlanAction::New, "x"),
            PlanItem::new("b", PlanAction::New, "x"),
            PlanItem::new("c", PlanAction::Remove, "x"),
        ];
        let summary = PlanSummary::from_items(&items);
        assert_eq!(summary, PlanSummary { new: 2, modify: 0, remove: 1 });
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.to_string(), "2 new, 0 modify, 1 remove");
    }

    #[test]
    fn test_plan_to_markdown_groups_by_action() {
        let items = vec![
            PlanItem::new("src/old.ts", PlanAction::Remove, "Drop legacy helper"),
            PlanItem::new("src/auth.ts", PlanAction::New, "Add auth module"),
        ];
        let md = plan_to_markdown("Add login", &items);

        assert!(md.contains("**Request:** Add login"));
        assert!(md.contains("## Create"));
        assert!(md.contains("- [ ] `src/auth.ts` - Add auth module"));
        assert!(!md.contains("## Modify"));
        assert!(md.find("## Create").unwrap() < md.find("## Remove").unwrap());
    }
}
