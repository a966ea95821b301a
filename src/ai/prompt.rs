//! Prompt construction for the reasoning backend.

use crate::context::ProjectContext;

/// Dependencies listed in a prompt.
pub const MAX_PROMPT_DEPENDENCIES: usize = 20;

/// Key file paths listed in a prompt.
pub const MAX_PROMPT_KEY_FILES: usize = 15;

/// System prompt shared by both requests.
pub const SYSTEM_PROMPT: &str = "You are a senior software engineer helping plan a change to an \
existing codebase. Be concrete and stay within the project's existing stack.";

/// Render the project context block.
pub fn context_section(context: &ProjectContext, excerpt_chars: usize) -> String {
    let mut out = String::from("## Project\n");
    out.push_str(&format!("Type: {}\n", context.project_type));

    if !context.frameworks.is_empty() {
        out.push_str(&format!("Frameworks: {}\n", context.frameworks.join(", ")));
    }
    if !context.languages.is_empty() {
        let languages: Vec<&str> = context.languages.iter().map(String::as_str).collect();
        out.push_str(&format!("Languages: {}\n", languages.join(", ")));
    }
    if !context.dependencies.is_empty() {
        let shown: Vec<&str> = context
            .dependencies
            .iter()
            .take(MAX_PROMPT_DEPENDENCIES)
            .map(String::as_str)
            .collect();
        let hidden = context.dependencies.len().saturating_sub(MAX_PROMPT_DEPENDENCIES);
        out.push_str(&format!("Dependencies: {}", shown.join(", ")));
        if hidden > 0 {
            out.push_str(&format!(" (+{hidden} more)"));
        }
        out.push('\n');
    }

    out.push_str("\n## Structure\n```\n");
    out.push_str(context.structure.trim_end());
    out.push_str("\n```\n");

    if !context.key_files.is_empty() {
        out.push_str("\n## Key files\n");
        for file in context.key_files.iter().take(MAX_PROMPT_KEY_FILES) {
            out.push_str(&format!("- {} ({})\n", file.path, file.language));
        }
    }

    for (path, excerpt) in context.config_excerpts(excerpt_chars) {
        out.push_str(&format!("\n### {path}\n```\n{}\n```\n", excerpt.trim_end()));
    }

    out
}

/// Prompt asking for clarification questions.
pub fn clarification_prompt(
    request: &str,
    context: Option<&ProjectContext>,
    excerpt_chars: usize,
) -> String {
    let mut prompt = String::new();
    if let Some(context) = context {
        prompt.push_str(&context_section(context, excerpt_chars));
        prompt.push('\n');
    }

    prompt.push_str(&format!("## Request\n{request}\n\n"));
    prompt.push_str(
        "Ask up to 3 short clarifying questions that would most change how this request is \
         implemented in this project. Write one question per line, each ending with a question \
         mark. Do not write anything else.",
    );
    prompt
}

/// Prompt asking for a change plan.
pub fn plan_prompt(
    request: &str,
    answers: &[(&str, &str)],
    context: Option<&ProjectContext>,
    excerpt_chars: usize,
) -> String {
    let mut prompt = String::new();
    if let Some(context) = context {
        prompt.push_str(&context_section(context, excerpt_chars));
        prompt.push('\n');
    }

    prompt.push_str(&format!("## Request\n{request}\n"));

    if !answers.is_empty() {
        prompt.push_str("\n## Clarifications\n");
        for (question, answer) in answers {
            prompt.push_str(&format!("Q: {question}\nA: {answer}\n"));
        }
    }

    prompt.push_str(
        "\nList the files to change as a JSON array. Each element must be an object with \
         \"file\" (path relative to the project root), \"action\" (one of \"new\", \"modify\", \
         \"remove\"), and \"description\" (one sentence). Reply with the JSON array only.",
    );
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{FileKind, KeyFile};
    use std::path::PathBuf;

    fn context(dependencies: usize, key_files: usize) -> ProjectContext {
        ProjectContext {
            root: PathBuf::from("/work/app"),
            project_type: "React application".to_string(),
            frameworks: vec!["React".to_string()],
            languages: ["TypeScript".to_string()].into_iter().collect(),
            key_files: (0..key_files)
                .map(|i| KeyFile {
                    path: if i == 0 { "package.json".to_string() } else { format!("src/f{i}.ts") },
                    content: if i == 0 { "{\"name\": \"app\"}".to_string() } else { String::new() },
                    language: if i == 0 { "JSON".to_string() } else { "TypeScript".to_string() },
                    size: 0,
                    kind: if i == 0 { FileKind::Manifest } else { FileKind::Source },
                })
                .collect(),
            dependencies: (0..dependencies).map(|i| format!("dep{i}")).collect(),
            structure: "app/\n└── src/\n".to_string(),
            has_manifest: true,
        }
    }

    #[test]
    fn test_context_section_caps_lists() {
        let section = context_section(&context(25, 20), 600);

        assert!(section.contains("dep19"));
        assert!(!section.contains("dep20"));
        assert!(section.contains("(+5 more)"));
        assert!(section.contains("src/f14.ts"));
        assert!(!section.contains("src/f15.ts"));
        assert!(section.contains("### package.json"));
    }

    #[test]
    fn test_clarification_prompt_without_context() {
        let prompt = clarification_prompt("Add dark mode", None, 600);
        assert!(prompt.starts_with("## Request\nAdd dark mode"));
        assert!(!prompt.contains("## Project"));
    }

    #[test]
    fn test_plan_prompt_includes_answers() {
        let answers = [("Which provider?", "Auth0")];
        let prompt = plan_prompt("Add login", &answers, Some(&context(1, 1)), 600);

        assert!(prompt.contains("Q: Which provider?\nA: Auth0"));
        assert!(prompt.contains("React application"));
        assert!(prompt.contains("\"remove\""));
    }
}
