use std::time::Duration;

use windoc::{DocResult, FetchResult, Result, WindocError};

#[test]
fn test_error_display() {
    let err = WindocError::Api {
        status: 503,
        message: "Service Unavailable".to_string(),
    };
    assert!(err.to_string().contains("503"));
    assert!(err.to_string().contains("Service Unavailable"));
}

#[test]
fn test_rate_limited_display() {
    let err = WindocError::RateLimited {
        retry_after: Some(Duration::from_secs(30)),
    };
    assert!(err.to_string().contains("rate limited"));
}

#[test]
fn test_result_alias() {
    fn returns_error() -> Result<()> {
        Err(WindocError::Timeout)
    }
    assert!(returns_error().is_err());
}

#[test]
fn test_json_error_conversion() {
    let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
    let err: WindocError = parse.unwrap_err().into();
    assert!(matches!(err, WindocError::Json(_)));
}

// ============================================================================
// Folding errors into lookup outcomes
// ============================================================================

#[test]
fn errors_become_fetch_errors() {
    let result = FetchResult::from(WindocError::Http("connection reset".into()));
    match result {
        FetchResult::FetchError { reason } => assert!(reason.contains("connection reset")),
        other => panic!("expected FetchError, got {other:?}"),
    }
}

#[test]
fn fetch_outcome_labels() {
    assert_eq!(FetchResult::NotFound.label(), "not_found");
    assert_eq!(FetchResult::error("x").label(), "error");
    assert_eq!(DocResult::Undocumented.label(), "undocumented");
}
