//! Manifest parsing for dependency names.
//!
//! Best-effort: every parser returns a flat list of package names. Callers
//! treat a parse error as "no dependencies from this manifest".

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

/// Parsed package.json structure (only the dependency tables).
#[derive(Debug, Deserialize)]
struct PackageJson {
    /// Dependencies
    #[serde(default)]
    dependencies: BTreeMap<String, serde_json::Value>,

    /// Dev dependencies
    #[serde(default, rename = "devDependencies")]
    dev_dependencies: BTreeMap<String, serde_json::Value>,
}

/// Parsed composer.json structure (only the requirement tables).
#[derive(Debug, Deserialize)]
struct ComposerJson {
    #[serde(default)]
    require: BTreeMap<String, serde_json::Value>,

    #[serde(default, rename = "require-dev")]
    require_dev: BTreeMap<String, serde_json::Value>,
}

/// `gem 'name'` / `gem "name"` lines in a Gemfile.
static GEM_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^\s*gem\s+['"]([^'"]+)['"]"#).expect("gem regex is valid")
});

/// The artifact id of each `<dependency>` element in a pom.xml.
static POM_DEPENDENCY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<dependency>.*?<artifactId>\s*([^<\s]+)\s*</artifactId>")
        .expect("pom dependency regex is valid")
});

/// `group:artifact[:version]` coordinates in a build.gradle.
static GRADLE_COORDINATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"['"]([\w.\-]+):([\w.\-]+)(?::[^'"]*)?['"]"#)
        .expect("gradle coordinate regex is valid")
});

/// Extract dependency names from a manifest, dispatching on its file name.
///
/// Returns `Ok(None)` for file names that are not parseable manifests.
pub fn parse_dependencies(file_name: &str, content: &str) -> anyhow::Result<Option<Vec<String>>> {
    let names = match file_name {
        "package.json" => parse_package_json(content)?,
        "Cargo.toml" => parse_cargo_toml(content)?,
        "requirements.txt" => parse_requirements(content),
        "pyproject.toml" => parse_pyproject(content)?,
        "go.mod" => parse_go_mod(content),
        "Gemfile" => parse_gemfile(content),
        "composer.json" => parse_composer_json(content)?,
        "pom.xml" => parse_pom_xml(content),
        "build.gradle" => parse_build_gradle(content),
        _ => return Ok(None),
    };
    Ok(Some(names))
}

fn parse_package_json(content: &str) -> anyhow::Result<Vec<String>> {
    let package: PackageJson = serde_json::from_str(content)?;
    Ok(package.dependencies.into_keys().chain(package.dev_dependencies.into_keys()).collect())
}

fn parse_cargo_toml(content: &str) -> anyhow::Result<Vec<String>> {
    let doc: toml::Table = toml::from_str(content)?;
    let mut names = Vec::new();

    for section in ["dependencies", "dev-dependencies", "build-dependencies"] {
        if let Some(table) = doc.get(section).and_then(|v| v.as_table()) {
            names.extend(table.keys().cloned());
        }
    }

    // Virtual workspace manifests keep their dependencies here
    if let Some(table) = doc
        .get("workspace")
        .and_then(|w| w.get("dependencies"))
        .and_then(|v| v.as_table())
    {
        names.extend(table.keys().cloned());
    }

    Ok(names)
}

fn parse_requirements(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.starts_with('#') && !l.starts_with('-'))
        .filter_map(requirement_name)
        .collect()
}

fn parse_pyproject(content: &str) -> anyhow::Result<Vec<String>> {
    let doc: toml::Table = toml::from_str(content)?;
    let mut names = Vec::new();

    // PEP 621
    if let Some(deps) =
        doc.get("project").and_then(|p| p.get("dependencies")).and_then(|d| d.as_array())
    {
        names.extend(deps.iter().filter_map(|d| d.as_str()).filter_map(requirement_name));
    }

    // Poetry
    if let Some(deps) = doc
        .get("tool")
        .and_then(|t| t.get("poetry"))
        .and_then(|p| p.get("dependencies"))
        .and_then(|d| d.as_table())
    {
        names.extend(deps.keys().filter(|k| k.as_str() != "python").cloned());
    }

    Ok(names)
}

fn parse_go_mod(content: &str) -> Vec<String> {
    let mut names = Vec::new();
    let mut in_block = false;

    for line in content.lines().map(str::trim) {
        if in_block {
            if line.starts_with(')') {
                in_block = false;
            } else if let Some(module) = line.split_whitespace().next() {
                if !module.starts_with("//") {
                    names.push(module.to_string());
                }
            }
        } else if line.starts_with("require (") || line == "require(" {
            in_block = true;
        } else if let Some(rest) = line.strip_prefix("require ") {
            if let Some(module) = rest.split_whitespace().next() {
                names.push(module.to_string());
            }
        }
    }

    names
}

fn parse_gemfile(content: &str) -> Vec<String> {
    content
        .lines()
        .filter_map(|line| GEM_LINE.captures(line))
        .map(|caps| caps[1].to_string())
        .collect()
}

fn parse_composer_json(content: &str) -> anyhow::Result<Vec<String>> {
    let composer: ComposerJson = serde_json::from_str(content)?;
    Ok(composer
        .require
        .into_keys()
        .chain(composer.require_dev.into_keys())
        .filter(|name| name != "php" && !name.starts_with("ext-"))
        .collect())
}

fn parse_pom_xml(content: &str) -> Vec<String> {
    POM_DEPENDENCY.captures_iter(content).map(|caps| caps[1].to_string()).collect()
}

fn parse_build_gradle(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for caps in GRADLE_COORDINATE.captures_iter(content) {
        let artifact = caps[2].to_string();
        if !names.contains(&artifact) {
            names.push(artifact);
        }
    }
    names
}

/// Package name from a PEP 508 requirement string (`flask>=2.0; python_version>'3'`).
fn requirement_name(spec: &str) -> Option<String> {
    let name: String = spec
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    if name.is_empty() {
        None
    } else {
        Some(name)
    }
}
