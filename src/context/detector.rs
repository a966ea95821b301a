//! Framework, language, and project type detection.

use std::path::Path;

/// Dependency name -> framework label.
const DEPENDENCY_FRAMEWORKS: &[(&str, &str)] = &[
    ("next", "Next.js"),
    ("nuxt", "Nuxt"),
    ("@angular/core", "Angular"),
    ("electron", "Electron"),
    ("react", "React"),
    ("vue", "Vue.js"),
    ("svelte", "Svelte"),
    ("@sveltejs/kit", "SvelteKit"),
    ("@nestjs/core", "NestJS"),
    ("express", "Express"),
    ("fastify", "Fastify"),
    ("vite", "Vite"),
    ("tailwindcss", "Tailwind CSS"),
    ("prisma", "Prisma"),
    ("@prisma/client", "Prisma"),
    ("mongoose", "Mongoose"),
    ("typeorm", "TypeORM"),
    ("jest", "Jest"),
    ("vitest", "Vitest"),
    ("django", "Django"),
    ("Django", "Django"),
    ("fastapi", "FastAPI"),
    ("flask", "Flask"),
    ("Flask", "Flask"),
    ("sqlalchemy", "SQLAlchemy"),
    ("SQLAlchemy", "SQLAlchemy"),
    ("actix-web", "Actix Web"),
    ("axum", "Axum"),
    ("rocket", "Rocket"),
    ("tokio", "Tokio"),
    ("diesel", "Diesel"),
    ("sqlx", "SQLx"),
    ("github.com/gin-gonic/gin", "Gin"),
    ("github.com/labstack/echo/v4", "Echo"),
    ("github.com/gofiber/fiber/v2", "Fiber"),
    ("spring-boot-starter-web", "Spring Boot"),
    ("rails", "Rails"),
    ("laravel/framework", "Laravel"),
];

/// Root-level config file -> framework label.
const CONFIG_FRAMEWORKS: &[(&str, &str)] = &[
    ("next.config.js", "Next.js"),
    ("next.config.mjs", "Next.js"),
    ("next.config.ts", "Next.js"),
    ("nuxt.config.js", "Nuxt"),
    ("nuxt.config.ts", "Nuxt"),
    ("angular.json", "Angular"),
    ("svelte.config.js", "Svelte"),
    ("vite.config.js", "Vite"),
    ("vite.config.ts", "Vite"),
    ("tailwind.config.js", "Tailwind CSS"),
    ("tailwind.config.ts", "Tailwind CSS"),
    ("nest-cli.json", "NestJS"),
    ("manage.py", "Django"),
    ("prisma/schema.prisma", "Prisma"),
];

/// Extension -> language label.
const EXTENSION_LANGUAGES: &[(&str, &str)] = &[
    ("ts", "TypeScript"),
    ("tsx", "TypeScript"),
    ("mts", "TypeScript"),
    ("js", "JavaScript"),
    ("jsx", "JavaScript"),
    ("mjs", "JavaScript"),
    ("cjs", "JavaScript"),
    ("rs", "Rust"),
    ("py", "Python"),
    ("go", "Go"),
    ("java", "Java"),
    ("kt", "Kotlin"),
    ("rb", "Ruby"),
    ("php", "PHP"),
    ("cs", "C#"),
    ("cpp", "C++"),
    ("cc", "C++"),
    ("hpp", "C++"),
    ("c", "C"),
    ("h", "C"),
    ("swift", "Swift"),
    ("vue", "Vue"),
    ("svelte", "Svelte"),
    ("html", "HTML"),
    ("css", "CSS"),
    ("scss", "SCSS"),
    ("sql", "SQL"),
    ("sh", "Shell"),
    ("json", "JSON"),
    ("toml", "TOML"),
    ("yaml", "YAML"),
    ("yml", "YAML"),
    ("md", "Markdown"),
    ("prisma", "Prisma"),
    ("gradle", "Gradle"),
    ("xml", "XML"),
];

/// Files without an extension that still have a well-known format.
const NAMED_LANGUAGES: &[(&str, &str)] =
    &[("Dockerfile", "Dockerfile"), ("Gemfile", "Ruby"), ("Makefile", "Makefile")];

/// Label used for anything not in the lookup tables.
pub const UNKNOWN_LANGUAGE: &str = "Unknown";

/// Classify a file's language by its extension.
pub fn language_for_path(path: &Path) -> &'static str {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if let Some((_, lang)) = NAMED_LANGUAGES.iter().find(|(n, _)| *n == name) {
            return *lang;
        }
    }

    path.extension()
        .and_then(|e| e.to_str())
        .and_then(|ext| EXTENSION_LANGUAGES.iter().find(|(e, _)| *e == ext))
        .map(|(_, lang)| *lang)
        .unwrap_or(UNKNOWN_LANGUAGE)
}

/// Detect frameworks from dependency names and root config files.
///
/// Dependencies are checked first, then config files. Labels are
/// de-duplicated, keeping first-detection order.
pub fn detect_frameworks(dependencies: &[String], root: &Path) -> Vec<String> {
    let mut frameworks: Vec<String> = Vec::new();
    let mut push = |label: &str| {
        if !frameworks.iter().any(|f| f == label) {
            frameworks.push(label.to_string());
        }
    };

    for dep in dependencies {
        if let Some((_, label)) =
            DEPENDENCY_FRAMEWORKS.iter().find(|(name, _)| *name == dep.as_str())
        {
            push(*label);
        }
    }

    for (file, label) in CONFIG_FRAMEWORKS {
        if root.join(file).is_file() {
            push(*label);
        }
    }

    frameworks
}

/// Detected project type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    /// Next.js application
    NextJs,
    /// Nuxt application
    Nuxt,
    /// Angular application
    Angular,
    /// Electron desktop application
    Electron,
    /// SvelteKit application
    SvelteKit,
    /// React application
    React,
    /// Vue.js application
    Vue,
    /// Svelte application
    Svelte,
    /// NestJS API
    NestJs,
    /// Express.js API
    Express,
    /// Fastify API
    Fastify,
    /// Django application
    Django,
    /// FastAPI service
    FastApi,
    /// Flask application
    Flask,
    /// Rust web service (Actix Web, Axum, Rocket)
    RustWeb,
    /// Go web service (Gin, Echo, Fiber)
    GoWeb,
    /// Spring Boot application
    SpringBoot,
    /// Ruby on Rails application
    Rails,
    /// Laravel application
    Laravel,
    /// A manifest exists but no framework matched
    Generic,
    /// Nothing recognizable
    Unknown,
}

/// Cascade order: the first framework present decides the project type.
const TYPE_CASCADE: &[(&str, ProjectType)] = &[
    ("Next.js", ProjectType::NextJs),
    ("Nuxt", ProjectType::Nuxt),
    ("Angular", ProjectType::Angular),
    ("Electron", ProjectType::Electron),
    ("SvelteKit", ProjectType::SvelteKit),
    ("React", ProjectType::React),
    ("Vue.js", ProjectType::Vue),
    ("Svelte", ProjectType::Svelte),
    ("NestJS", ProjectType::NestJs),
    ("Express", ProjectType::Express),
    ("Fastify", ProjectType::Fastify),
    ("Django", ProjectType::Django),
    ("FastAPI", ProjectType::FastApi),
    ("Flask", ProjectType::Flask),
    ("Actix Web", ProjectType::RustWeb),
    ("Axum", ProjectType::RustWeb),
    ("Rocket", ProjectType::RustWeb),
    ("Gin", ProjectType::GoWeb),
    ("Echo", ProjectType::GoWeb),
    ("Fiber", ProjectType::GoWeb),
    ("Spring Boot", ProjectType::SpringBoot),
    ("Rails", ProjectType::Rails),
    ("Laravel", ProjectType::Laravel),
];

impl ProjectType {
    /// Classify from detected frameworks.
    pub fn classify(frameworks: &[String], has_manifest: bool) -> Self {
        TYPE_CASCADE
            .iter()
            .find(|(label, _)| frameworks.iter().any(|f| f.as_str() == *label))
            .map(|(_, ty)| *ty)
            .unwrap_or(if has_manifest { Self::Generic } else { Self::Unknown })
    }

    /// Get display name for the project type.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::NextJs => "Next.js application",
            Self::Nuxt => "Nuxt application",
            Self::Angular => "Angular application",
            Self::Electron => "Electron application",
            Self::SvelteKit => "SvelteKit application",
            Self::React => "React application",
            Self::Vue => "Vue.js application",
            Self::Svelte => "Svelte application",
            Self::NestJs => "NestJS API",
            Self::Express => "Express.js API",
            Self::Fastify => "Fastify API",
            Self::Django => "Django application",
            Self::FastApi => "FastAPI service",
            Self::Flask => "Flask application",
            Self::RustWeb => "Rust web service",
            Self::GoWeb => "Go web service",
            Self::SpringBoot => "Spring Boot application",
            Self::Rails => "Ruby on Rails application",
            Self::Laravel => "Laravel application",
            Self::Generic => "generic project",
            Self::Unknown => "unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn deps(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_language_lookup() {
        assert_eq!(language_for_path(&PathBuf::from("src/app.tsx")), "TypeScript");
        assert_eq!(language_for_path(&PathBuf::from("main.rs")), "Rust");
        assert_eq!(language_for_path(&PathBuf::from("Dockerfile")), "Dockerfile");
        assert_eq!(language_for_path(&PathBuf::from("image.png")), UNKNOWN_LANGUAGE);
        assert_eq!(language_for_path(&PathBuf::from("LICENSE")), UNKNOWN_LANGUAGE);
    }

    #[test]
    fn test_frameworks_from_dependencies_deduplicated() {
        let dir = TempDir::new().unwrap();
        let found = detect_frameworks(&deps(&["react", "prisma", "@prisma/client"]), dir.path());
        assert_eq!(found, vec!["React", "Prisma"]);
    }

    #[test]
    fn test_frameworks_from_config_files() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("next.config.js"), "module.exports = {}").unwrap();
        let found = detect_frameworks(&deps(&["next", "react"]), dir.path());
        // Next.js from the dependency and the config file counts once
        assert_eq!(found, vec!["Next.js", "React"]);
    }

    #[test]
    fn test_project_type_cascade() {
        let fw = deps(&["React", "Next.js"]);
        assert_eq!(ProjectType::classify(&fw, true), ProjectType::NextJs);

        let fw = deps(&["Express", "Jest"]);
        assert_eq!(ProjectType::classify(&fw, true).display_name(), "Express.js API");
    }

    #[test]
    fn test_project_type_fallbacks() {
        assert_eq!(ProjectType::classify(&deps(&["Jest"]), true), ProjectType::Generic);
        assert_eq!(ProjectType::classify(&[], true).display_name(), "generic project");
        assert_eq!(ProjectType::classify(&[], false).display_name(), "unknown");
    }
}
