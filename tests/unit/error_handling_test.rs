#[cfg(test)]
mod tests {
    use crate::error::{CatalogError, PlannerError};

    #[test]
    fn test_error_creation() {
        let error = PlannerError::new("Test error", "test_stage");
        assert_eq!(error.message, "Test error");
        assert_eq!(error.stage, "test_stage");
    }

    #[test]
    fn test_error_with_context() {
        let error = PlannerError::new("Test error", "test_stage")
            .with_context("Additional context");
        assert!(error.context.is_some());
        assert_eq!(error.context.unwrap(), "Additional context");
    }

    #[test]
    fn test_error_display() {
        let error = PlannerError::new("Test error", "test_stage")
            .with_context("context")
            .with_source("source");
        let display = format!("{}", error);
        assert_eq!(display, "[test_stage] Test error (context: context) (source: source)");
    }

    #[test]
    fn test_catalog_error_converts_to_catalog_stage() {
        let error: PlannerError = CatalogError::PrerequisiteCycle("w1".into()).into();
        assert_eq!(error.stage, "catalog");
        assert!(error.message.contains("w1"));
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: PlannerError = err.into();
        assert_eq!(error.stage, "json_parse");
        assert_eq!(error.source.as_deref(), Some("serde_json"));
    }
}
