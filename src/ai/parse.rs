//! Parsing and validating raw backend responses.
//!
//! Both parsers are strict: they either return a non-empty, schema-valid
//! result or a [`ValidationError`] describing why the payload was rejected.
//! Nothing here attempts to repair a malformed item.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::workflow::{PlanAction, PlanItem};

/// Maximum number of clarification questions kept from a response.
pub const MAX_QUESTIONS: usize = 3;

/// Leading list markers: `-`, `*`, `•`, `1.`, `2)`.
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*•]|\d+[.)])\s+").expect("list marker regex is valid"));

/// Why a backend payload was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Response contains no questions")]
    NoQuestions,

    #[error("Response contains no JSON array")]
    NoArray,

    #[error("Malformed plan payload: {0}")]
    Malformed(String),

    #[error("Plan item is not an object")]
    NotAnObject,

    #[error("Plan item is missing a non-empty '{0}'")]
    MissingField(&'static str),

    #[error("Unknown plan action '{0}'")]
    UnknownAction(String),

    #[error("No valid plan items ({rejected} rejected)")]
    NoValidItems { rejected: usize },
}

/// Extract clarification questions from free text.
///
/// Keeps lines containing `?`, strips list markers, and caps the result at
/// [`MAX_QUESTIONS`].
pub fn parse_clarifications(text: &str) -> Result<Vec<String>, ValidationError> {
    let questions: Vec<String> = text
        .lines()
        .filter(|line| line.contains('?'))
        .map(|line| LIST_MARKER.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .take(MAX_QUESTIONS)
        .collect();

    if questions.is_empty() {
        return Err(ValidationError::NoQuestions);
    }
    Ok(questions)
}

/// Extract and validate a plan from free text.
///
/// Invalid elements are dropped; an empty result is an error.
pub fn parse_plan(text: &str) -> Result<Vec<PlanItem>, ValidationError> {
    let stripped = strip_code_fences(text);
    let array = extract_json_array(&stripped).ok_or(ValidationError::NoArray)?;

    let values: Vec<Value> =
        serde_json::from_str(array).map_err(|e| ValidationError::Malformed(e.to_string()))?;

    let mut items = Vec::with_capacity(values.len());
    let mut rejected = 0;

    for value in &values {
        match validate_item(value) {
            Ok(item) => items.push(item),
            Err(e) => {
                rejected += 1;
                tracing::debug!(error = %e, "Dropping invalid plan item");
            }
        }
    }

    if items.is_empty() {
        return Err(ValidationError::NoValidItems { rejected });
    }
    Ok(items)
}

/// Check one element against the plan item schema.
pub fn validate_item(value: &Value) -> Result<PlanItem, ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;

    let field = |name: &'static str| {
        object
            .get(name)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(ValidationError::MissingField(name))
    };

    let file = field("file")?;
    let description = field("description")?;
    let action: PlanAction = field("action")?.parse()?;

    Ok(PlanItem::new(file, action, description))
}

/// Remove Markdown code fence lines (```json, ```).
pub fn strip_code_fences(text: &str) -> String {
    text.lines().filter(|line| !line.trim_start().starts_with("```")).collect::<Vec<_>>().join("\n")
}

/// Find the first top-level `[...]` in `text`.
///
/// Brackets inside JSON strings are ignored. Returns `None` when no array
/// opens or the first one never closes.
pub fn extract_json_array(text: &str) -> Option<&str> {
    let start = text.find('[')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clarifications_keep_question_lines() {
        let text = "Here are my questions:\n\n1. Which provider?\n2) Which roles exist?\n- Any SSO needs?\n* Deadline?\nThanks!";
        let questions = parse_clarifications(text).unwrap();
        assert_eq!(questions, vec!["Which provider?", "Which roles exist?", "Any SSO needs?"]);
    }

    #[test]
    fn test_clarifications_without_questions() {
        assert_eq!(parse_clarifications("I have no questions."), Err(ValidationError::NoQuestions));
        assert_eq!(parse_clarifications(""), Err(ValidationError::NoQuestions));
    }

    #[test]
    fn test_plan_with_fences_and_prose() {
        let text = r#"Sure! Here is the plan:
```json
[
  {"file": "src/auth.ts", "action": "new", "description": "Auth module [core]"},
  {"file": "src/App.tsx", "action": "modify", "description": "Wire provider"}
]
```
Let me know if you need more."#;

        let plan = parse_plan(text).unwrap();
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].description, "Auth module [core]");
        assert_eq!(plan[1].action, PlanAction::Modify);
    }

    #[test]
    fn test_plan_drops_invalid_items() {
        let text = r#"[
            {"file": "a.ts", "action": "new", "description": "ok"},
            {"file": "b.ts", "action": "create", "description": "bad action"},
            {"file": "", "action": "new", "description": "empty file"},
            {"action": "remove", "description": "no file"},
            "not an object"
        ]"#;

        let plan = parse_plan(text).unwrap();
        assert_eq!(plan, vec![PlanItem::new("a.ts", PlanAction::New, "ok")]);
    }

    #[test]
    fn test_plan_all_invalid_is_error() {
        let text = r#"[{"file": "a.ts", "action": "rename", "description": "x"}]"#;
        assert_eq!(parse_plan(text), Err(ValidationError::NoValidItems { rejected: 1 }));
        assert_eq!(parse_plan("[]"), Err(ValidationError::NoValidItems { rejected: 0 }));
    }

    #[test]
    fn test_plan_structural_errors() {
        assert_eq!(parse_plan("no array here"), Err(ValidationError::NoArray));
        assert_eq!(parse_plan("[ {\"file\": \"a\" "), Err(ValidationError::NoArray));
        assert!(matches!(parse_plan("[1, 2,]"), Err(ValidationError::Malformed(_))));
    }

    #[test]
    fn test_extract_ignores_brackets_in_strings() {
        let text = r#"prefix [{"d": "a ] tricky \" [ one"}] suffix [2]"#;
        assert_eq!(extract_json_array(text), Some(r#"[{"d": "a ] tricky \" [ one"}]"#));
    }

    #[test]
    fn test_extract_nested_arrays() {
        assert_eq!(extract_json_array("x [[1], [2]] y"), Some("[[1], [2]]"));
    }

    #[test]
    fn test_validate_item_trims_fields() {
        let item = validate_item(&json!({
            "file": "  src/a.ts ",
            "action": "remove",
            "description": " Old helper "
        }))
        .unwrap();
        assert_eq!(item, PlanItem::new("src/a.ts", PlanAction::Remove, "Old helper"));
    }

    #[test]
    fn test_validate_item_reasons() {
        assert_eq!(validate_item(&json!(42)), Err(ValidationError::NotAnObject));
        assert_eq!(
            validate_item(&json!({"file": "a", "action": "new"})),
            Err(ValidationError::MissingField("description"))
        );
        assert_eq!(
            validate_item(&json!({"file": "a", "action": 3, "description": "d"})),
            Err(ValidationError::MissingField("action"))
        );
    }
}
