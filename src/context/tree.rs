//! Directory tree rendering.

use std::fs;
use std::path::Path;

use super::patterns::is_ignored_dir;

/// Dot-directories that still carry project structure worth showing.
const DOT_ALLOW_LIST: &[&str] =
    &[".github", ".vscode", ".devcontainer", ".storybook", ".husky", ".circleci"];

/// Render `root` as an indented tree, at most `max_depth` levels deep.
///
/// Directories are listed before files, both alphabetically. Each directory
/// shows at most `max_entries` children.
pub fn render_tree(root: &Path, max_depth: usize, max_entries: usize) -> String {
    let name = root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| root.display().to_string());

    let mut out = format!("{name}/\n");
    render_dir(root, "", 1, max_depth, max_entries, &mut out);
    out
}

fn render_dir(
    dir: &Path,
    prefix: &str,
    depth: usize,
    max_depth: usize,
    max_entries: usize,
    out: &mut String,
) {
    if depth > max_depth {
        return;
    }

    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::warn!(path = %dir.display(), error = %e, "Skipping unreadable directory");
            return;
        }
    };

    let mut children: Vec<(String, bool)> = entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
            is_visible(&name, is_dir).then_some((name, is_dir))
        })
        .collect();

    children.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let hidden = children.len().saturating_sub(max_entries);
    children.truncate(max_entries);
    let count = children.len();

    for (i, (name, is_dir)) in children.into_iter().enumerate() {
        let last = i + 1 == count && hidden == 0;
        let connector = if last { "└── " } else { "├── " };

        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(&name);
        if is_dir {
            out.push('/');
        }
        out.push('\n');

        if is_dir {
            let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
            render_dir(&dir.join(&name), &child_prefix, depth + 1, max_depth, max_entries, out);
        }
    }

    if hidden > 0 {
        out.push_str(&format!("{prefix}└── … {hidden} more\n"));
    }
}

fn is_visible(name: &str, is_dir: bool) -> bool {
    if is_dir && is_ignored_dir(name) {
        return false;
    }
    if name.starts_with('.') {
        return is_dir && DOT_ALLOW_LIST.contains(&name);
    }
    true
}
