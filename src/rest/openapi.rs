//! OpenAPI document for the survey API, served by Swagger UI and printed by
//! `signup openapi`.

use utoipa::OpenApi;

use crate::rest::dto::{CreatedResponse, HealthResponse, StatusResponse, SurveySubmission};
use crate::rest::error::ErrorResponse;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Signup Survey API",
        description = "Stores lead-capture surveys submitted by the signup wizard.",
        license(name = "MIT")
    ),
    paths(
        crate::rest::routes::health::health,
        crate::rest::routes::health::status,
        crate::rest::routes::survey::create,
    ),
    components(schemas(
        SurveySubmission,
        CreatedResponse,
        ErrorResponse,
        HealthResponse,
        StatusResponse,
    )),
    tags(
        (name = "Survey", description = "Survey submission"),
        (name = "Health", description = "Liveness and store status"),
    )
)]
pub struct ApiDoc;

/// Output encoding for [`ApiDoc::render`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    Json,
    Yaml,
}

impl ApiDoc {
    /// Serialize the document, pretty-printed for JSON
    pub fn render(format: DocFormat) -> anyhow::Result<String> {
        let doc = Self::openapi();
        Ok(match format {
            DocFormat::Json => serde_json::to_string_pretty(&doc)?,
            DocFormat::Yaml => serde_yaml::to_string(&doc)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_lists_every_route() {
        let doc = ApiDoc::render(DocFormat::Json).unwrap();
        assert!(doc.contains("Signup Survey API"));
        for path in ["/api/survey", "/api/v1/health", "/api/v1/status"] {
            assert!(doc.contains(path), "missing {path}");
        }
    }

    #[test]
    fn test_submission_schema_is_registered() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.expect("components").schemas;
        assert!(schemas.contains_key("SurveySubmission"));
        assert!(schemas.contains_key("ErrorResponse"));
    }

    #[test]
    fn test_yaml_output() {
        let yaml = ApiDoc::render(DocFormat::Yaml).unwrap();
        assert!(yaml.starts_with("openapi:"));
        assert!(yaml.contains("/api/survey:"));
        assert!(yaml.contains("name: Survey"));
    }
}
