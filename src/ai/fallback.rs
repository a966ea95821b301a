//! Deterministic suggestions used when the reasoning backend is unavailable.
//!
//! Requests are sorted into one of four buckets by keyword. Each bucket has a
//! fixed set of questions and a fixed plan, so the same request always gets the
//! same answer.

use crate::workflow::{PlanAction, PlanItem};

/// Keyword bucket a request falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestCategory {
    Authentication,
    Api,
    Database,
    Generic,
}

const AUTH_WORDS: &[&str] = &[
    "login", "logout", "signin", "signup", "password", "passwords", "jwt", "session", "sessions",
    "sso", "2fa", "mfa",
];
const AUTH_PHRASES: &[(&str, &str)] = &[("log", "in"), ("sign", "in"), ("sign", "up")];

const API_WORDS: &[&str] = &[
    "api", "apis", "endpoint", "endpoints", "route", "routes", "rest", "graphql", "grpc",
    "webhook", "webhooks",
];

const DATABASE_WORDS: &[&str] = &[
    "database", "databases", "db", "schema", "schemas", "model", "models", "migration",
    "migrations", "sql", "postgres", "postgresql", "mysql", "sqlite", "mongo", "mongodb", "table",
    "tables", "orm", "prisma",
];

impl RequestCategory {
    /// Classify a request. Buckets are checked in order: authentication, API,
    /// database; anything else is generic.
    pub fn classify(request: &str) -> Self {
        let lowered = request.to_lowercase();
        let words: Vec<&str> =
            lowered.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).collect();

        let has_any = |table: &[&str]| words.iter().any(|w| table.iter().any(|t| t == w));

        let auth = words.iter().any(|w| w.contains("auth"))
            || has_any(AUTH_WORDS)
            || words.windows(2).any(|pair| {
                AUTH_PHRASES.iter().any(|(first, second)| *first == pair[0] && *second == pair[1])
            });

        if auth {
            Self::Authentication
        } else if has_any(API_WORDS) {
            Self::Api
        } else if has_any(DATABASE_WORDS) {
            Self::Database
        } else {
            Self::Generic
        }
    }

    /// Short label for logs and status output.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::Api => "api",
            Self::Database => "database",
            Self::Generic => "generic",
        }
    }

    /// The bucket's clarification questions.
    pub fn questions(&self) -> Vec<String> {
        let questions: &[&str] = match self {
            Self::Authentication => &[
                "Which authentication provider should be used (for example Auth0, Firebase, or a custom JWT setup)?",
                "Which sign-in methods do you need: email and password, social logins, or both?",
                "Which routes or pages should require a signed-in user?",
            ],
            Self::Api => &[
                "Which resources should the new endpoints expose?",
                "Should the API follow REST conventions or use GraphQL?",
                "Do the endpoints need authentication or rate limiting?",
            ],
            Self::Database => &[
                "Which database engine does the project use or should it adopt?",
                "Which entities and relationships need to be stored?",
                "Is a migration tool already in place for schema changes?",
            ],
            Self::Generic => &[
                "What should the user be able to do once this change is complete?",
                "Which existing parts of the codebase should this change touch?",
            ],
        };
        questions.iter().map(|q| q.to_string()).collect()
    }

    /// The bucket's plan.
    pub fn plan(&self) -> Vec<PlanItem> {
        use PlanAction::{Modify, New, Remove};

        let items: &[(&str, PlanAction, &str)] = match self {
            Self::Authentication => &[
                (
                    "src/auth/config.ts",
                    New,
                    "Authentication provider configuration (domain, client ID, callback URLs)",
                ),
                (
                    "src/auth/middleware.ts",
                    New,
                    "Middleware that verifies the session and protects private routes",
                ),
                (
                    "src/components/LoginButton.tsx",
                    New,
                    "Login and logout button wired to the authentication provider",
                ),
                (
                    "src/App.tsx",
                    Modify,
                    "Wrap the application in the authentication provider and register protected routes",
                ),
                (".env.example", Modify, "Document the authentication environment variables"),
                (
                    "src/utils/legacyAuth.ts",
                    Remove,
                    "Remove the superseded hand-rolled authentication helper",
                ),
            ],
            Self::Api => &[
                ("src/api/routes.ts", New, "Route definitions for the new endpoints"),
                (
                    "src/api/handlers.ts",
                    New,
                    "Request handlers with input validation and error responses",
                ),
                ("tests/api.test.ts", New, "Integration tests covering the new endpoints"),
                ("src/server.ts", Modify, "Mount the new routes on the server"),
            ],
            Self::Database => &[
                ("src/db/schema.ts", New, "Schema definitions for the new entities"),
                ("src/db/migrations/001_initial.sql", New, "Migration creating the new tables"),
                ("src/db/client.ts", New, "Shared database client and connection handling"),
                ("src/config.ts", Modify, "Add database connection settings"),
            ],
            Self::Generic => &[
                ("src/features/index.ts", New, "Entry point for the new feature"),
                ("tests/feature.test.ts", New, "Tests describing the expected behavior"),
                ("src/index.ts", Modify, "Wire the new feature into the application"),
            ],
        };

        items
            .iter()
            .map(|(file, action, description)| PlanItem::new(*file, *action, *description))
            .collect()
    }
}

/// Fallback clarification questions for `request`.
pub fn fallback_questions(request: &str) -> Vec<String> {
    RequestCategory::classify(request).questions()
}

/// Fallback plan for `request`.
pub fn fallback_plan(request: &str) -> Vec<PlanItem> {
    RequestCategory::classify(request).plan()
}
