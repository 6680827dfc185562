/*!
 * Tests for error types and conversions
 */

use tmdbdump::dump::FailureStage;
use tmdbdump::errors::{AppError, EntityError, ProviderError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 404,
        message: "Not found".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("404"));
    assert!(display.contains("Not found"));
    assert_eq!(error.status_code(), Some(404));
}

#[test]
fn test_providerError_parseError_shouldHaveNoStatus() {
    let error = ProviderError::ParseError("Invalid JSON".to_string());
    assert!(format!("{}", error).contains("Failed to parse API response"));
    assert_eq!(error.status_code(), None);
}

#[test]
fn test_entityError_atStage_withStatus_shouldKeepStage() {
    let error = EntityError::at_stage(
        FailureStage::Language,
        ProviderError::ApiError {
            status_code: 401,
            message: String::new(),
        },
    );
    assert_eq!(error.stage(), FailureStage::Language);
    assert_eq!(error.detail(), "401");
    assert!(!error.is_exception());
}

#[test]
fn test_entityError_atStage_withConnectionError_shouldBeException() {
    let error = EntityError::at_stage(
        FailureStage::Credits,
        ProviderError::ConnectionError("Host unreachable".to_string()),
    );
    assert_eq!(error.stage(), FailureStage::Exception);
    assert!(error.detail().contains("Host unreachable"));
    assert!(error.is_exception());
}

#[test]
fn test_entityError_fromIoError_shouldBeException() {
    let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Permission denied");
    let error: EntityError = io_error.into();
    assert_eq!(error.stage(), FailureStage::Exception);
    assert!(error.detail().contains("Permission denied"));
}

#[test]
fn test_failureStage_display_shouldMatchLogTags() {
    assert_eq!(FailureStage::Translations.to_string(), "translations");
    assert_eq!(FailureStage::Language.to_string(), "language");
    assert_eq!(FailureStage::Credits.to_string(), "credits");
    assert_eq!(FailureStage::Exception.to_string(), "exception");
}

#[test]
fn test_appError_fromProviderError_shouldWrapCorrectly() {
    let provider_error = ProviderError::ConnectionError("Network down".to_string());
    let app_error: AppError = provider_error.into();
    assert!(format!("{}", app_error).contains("Provider error"));
}

#[test]
fn test_appError_fromIoError_shouldWrapAsFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
    let app_error: AppError = io_error.into();
    let display = format!("{}", app_error);
    assert!(display.contains("File error"));
    assert!(display.contains("File not found"));
}

#[test]
fn test_appError_fromAnyhowError_shouldWrapAsUnknown() {
    let app_error: AppError = anyhow::anyhow!("Something went wrong").into();
    let display = format!("{}", app_error);
    assert!(display.contains("Unknown error"));
    assert!(display.contains("Something went wrong"));
}
