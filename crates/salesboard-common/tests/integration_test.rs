//! Integration tests for salesboard-common

use salesboard_common::{
    GenerationClient, GenerationConfig, Result, SalesBoardError, SpeechClient, SpeechConfig,
};

#[test]
fn test_error_taxonomy_is_exported() {
    fn classify(err: &SalesBoardError) -> bool {
        err.is_fatal_for_upload()
    }

    assert!(classify(&SalesBoardError::ingest("missing column")));
    assert!(classify(&SalesBoardError::cleaning("all rows removed")));
    assert!(!classify(&SalesBoardError::generation("api down")));
}

#[test]
fn test_result_alias() {
    fn pipeline_step() -> Result<u32> {
        Ok(42)
    }
    assert_eq!(pipeline_step().unwrap(), 42);
}

#[tokio::test]
async fn test_clients_construct_from_defaults() {
    let generation = GenerationClient::new(GenerationConfig::default()).unwrap();
    assert!(!generation.is_configured());

    let speech = SpeechClient::new(SpeechConfig::default());
    assert!(speech.is_ok());
}

#[tokio::test]
async fn test_unconfigured_generation_fails_at_request_time() {
    // Absence of the credential must not prevent construction; it fails the
    // first generate call instead.
    let client = GenerationClient::new(GenerationConfig::default()).unwrap();
    let err = client.generate("summary prompt").await.unwrap_err();
    assert!(matches!(err, SalesBoardError::Generation { .. }));
}
