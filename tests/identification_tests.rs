//! End-to-end identification scans against scripted mock backends.

use std::time::Duration;

use facematch::{
    BackendError, Candidate, FaceIdentifier, ImageData, MockCompareBackend, ScorerAdapter,
};

const PROBE: &str = "data:image/jpeg;base64,cHJvYmU=";

fn probe() -> ImageData {
    ImageData::parse(PROBE).unwrap()
}

fn image_uri(tag: &str) -> String {
    format!("data:image/png;base64,{tag}")
}

fn candidate(id: &str, name: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        name: name.to_string(),
        reference_image: Some(image_uri(id)),
    }
}

fn identifier() -> FaceIdentifier<MockCompareBackend, MockCompareBackend> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();

    FaceIdentifier::new(
        ScorerAdapter::new(MockCompareBackend::new(), MockCompareBackend::new())
            .with_backoff(Duration::from_millis(1)),
    )
}

fn transient() -> BackendError {
    BackendError::Transport {
        message: "connection reset".to_string(),
    }
}

fn rate_limited() -> BackendError {
    BackendError::Http {
        status: 429,
        message: "too many requests".to_string(),
    }
}

#[tokio::test]
async fn test_duplicate_candidate_scored_once_first_occurrence_wins() {
    let identifier = identifier();
    let primary = identifier.scorer().primary();
    primary.score_for(&image_uri("p1"), 85.0);
    primary.score_for(&image_uri("p1-dup"), 99.0);

    let mut duplicate = candidate("p1", "Asha (stale row)");
    duplicate.reference_image = Some(image_uri("p1-dup"));

    let pool = vec![candidate("p1", "Asha"), duplicate];
    let result = identifier.identify(&probe(), &pool).await;

    assert!(result.match_found);
    assert_eq!(result.matched_candidate.unwrap().name, "Asha");
    // Only the first occurrence's image was ever compared.
    assert_eq!(primary.compare_calls(), vec![image_uri("p1")]);
}

#[tokio::test]
async fn test_candidate_without_image_never_scored() {
    let identifier = identifier();
    let primary = identifier.scorer().primary();
    primary.score_for(&image_uri("p2"), 90.0);

    let pool = vec![
        Candidate {
            id: "p1".to_string(),
            name: "No Photo".to_string(),
            reference_image: None,
        },
        Candidate {
            id: "p3".to_string(),
            name: "Url Photo".to_string(),
            reference_image: Some("https://example.com/p3.png".to_string()),
        },
        candidate("p2", "Ben"),
    ];

    let result = identifier.identify(&probe(), &pool).await;

    assert_eq!(result.matched_candidate.unwrap().id, "p2");
    assert_eq!(primary.compare_calls(), vec![image_uri("p2")]);
}

#[tokio::test]
async fn test_high_confidence_short_circuit_is_order_sensitive() {
    let identifier = identifier();
    let primary = identifier.scorer().primary();
    primary.score_for(&image_uri("p1"), 80.0);
    primary.score_for(&image_uri("p2"), 96.0);
    primary.score_for(&image_uri("p3"), 99.0);

    let pool = vec![
        candidate("p1", "First"),
        candidate("p2", "Second"),
        candidate("p3", "Third"),
    ];

    let result = identifier.identify(&probe(), &pool).await;

    // First past the threshold wins; p3 is never scored at all.
    assert_eq!(result.matched_candidate.unwrap().id, "p2");
    assert_eq!(
        primary.compare_calls(),
        vec![image_uri("p1"), image_uri("p2")]
    );
}

#[tokio::test]
async fn test_margin_acceptance() {
    let identifier = identifier();
    let primary = identifier.scorer().primary();
    primary.score_for(&image_uri("p1"), 80.0);
    primary.score_for(&image_uri("p2"), 76.0);

    let pool = vec![candidate("p1", "Best"), candidate("p2", "Runner-up")];
    let result = identifier.identify(&probe(), &pool).await;

    assert!(result.match_found);
    assert_eq!(result.matched_candidate.unwrap().id, "p1");
}

#[tokio::test]
async fn test_margin_rejection() {
    let identifier = identifier();
    let primary = identifier.scorer().primary();
    primary.score_for(&image_uri("p1"), 78.0);
    primary.score_for(&image_uri("p2"), 77.0);

    let pool = vec![candidate("p1", "Best"), candidate("p2", "Runner-up")];
    let result = identifier.identify(&probe(), &pool).await;

    assert!(!result.match_found);
    assert!(result.matched_candidate.is_none());
}

#[tokio::test]
async fn test_floor_rejection() {
    let identifier = identifier();
    let primary = identifier.scorer().primary();
    primary.score_for(&image_uri("p1"), 70.0);
    primary.score_for(&image_uri("p2"), 60.0);

    let pool = vec![candidate("p1", "Best"), candidate("p2", "Runner-up")];
    let result = identifier.identify(&probe(), &pool).await;

    assert!(!result.match_found);
}

#[tokio::test]
async fn test_empty_pool_makes_no_backend_calls() {
    let identifier = identifier();

    let result = identifier.identify(&probe(), &[]).await;
    assert!(!result.match_found);

    let unscoreable = vec![Candidate {
        id: "p1".to_string(),
        name: "No Photo".to_string(),
        reference_image: None,
    }];
    let result = identifier.identify(&probe(), &unscoreable).await;
    assert!(!result.match_found);

    assert_eq!(identifier.scorer().primary().compare_count(), 0);
    assert_eq!(identifier.scorer().fallback().compare_count(), 0);
}

#[tokio::test]
async fn test_fallback_score_ranks_candidate() {
    let identifier = identifier();
    let primary = identifier.scorer().primary();
    let fallback = identifier.scorer().fallback();

    // Primary fails twice for p1; fallback answers first try.
    primary.push_outcome(&image_uri("p1"), Err(transient()));
    primary.push_outcome(&image_uri("p1"), Err(transient()));
    fallback.score_for(&image_uri("p1"), 84.0);
    primary.score_for(&image_uri("p2"), 60.0);

    let pool = vec![candidate("p1", "Asha"), candidate("p2", "Ben")];
    let result = identifier.identify(&probe(), &pool).await;

    assert_eq!(result.matched_candidate.unwrap().id, "p1");
    assert_eq!(primary.compare_count(), 3);
    assert_eq!(fallback.compare_count(), 1);
}

#[tokio::test]
async fn test_rate_limited_candidate_skipped_scan_continues() {
    let identifier = identifier();
    let primary = identifier.scorer().primary();
    let fallback = identifier.scorer().fallback();

    primary.push_outcome(&image_uri("p1"), Err(rate_limited()));
    fallback.push_outcome(&image_uri("p1"), Err(rate_limited()));
    primary.score_for(&image_uri("p2"), 82.0);

    let pool = vec![candidate("p1", "Asha"), candidate("p2", "Ben")];
    let result = identifier.identify(&probe(), &pool).await;

    // p1 contributed no score; p2 wins on the floor+margin rule.
    assert_eq!(result.matched_candidate.unwrap().id, "p2");
    assert_eq!(primary.compare_count(), 2);
    assert_eq!(fallback.compare_count(), 1);
}

#[tokio::test]
async fn test_hard_scoring_failure_skips_candidate_only() {
    let identifier = identifier();
    let primary = identifier.scorer().primary();
    let fallback = identifier.scorer().fallback();

    for _ in 0..2 {
        primary.push_outcome(&image_uri("p1"), Err(transient()));
        fallback.push_outcome(&image_uri("p1"), Err(transient()));
    }
    primary.score_for(&image_uri("p2"), 79.0);

    let pool = vec![candidate("p1", "Asha"), candidate("p2", "Ben")];
    let result = identifier.identify(&probe(), &pool).await;

    assert_eq!(result.matched_candidate.unwrap().id, "p2");
}

#[tokio::test]
async fn test_identify_is_idempotent_with_deterministic_backends() {
    let identifier = identifier();
    let primary = identifier.scorer().primary();
    primary.score_for(&image_uri("p1"), 82.0);
    primary.score_for(&image_uri("p2"), 71.0);

    let pool = vec![candidate("p1", "Asha"), candidate("p2", "Ben")];

    let first = identifier.identify(&probe(), &pool).await;
    let second = identifier.identify(&probe(), &pool).await;
    let third = identifier.identify(&probe(), &pool).await;

    assert_eq!(first, second);
    assert_eq!(second, third);
    assert_eq!(first.matched_candidate.as_ref().unwrap().id, "p1");
}

#[tokio::test]
async fn test_verification_backend_never_invoked_by_identify() {
    let identifier = identifier();
    let primary = identifier.scorer().primary();
    // Borderline outcome (floor met, margin not): exactly the case a final
    // verification stage would arbitrate, and it still must not run.
    primary.score_for(&image_uri("p1"), 78.0);
    primary.score_for(&image_uri("p2"), 77.0);

    let pool = vec![candidate("p1", "Asha"), candidate("p2", "Ben")];
    let result = identifier.identify(&probe(), &pool).await;

    assert!(!result.match_found);
    assert_eq!(identifier.scorer().primary().verify_count(), 0);
    assert_eq!(identifier.scorer().fallback().verify_count(), 0);
}

#[tokio::test]
async fn test_result_json_shape_for_application_layer() {
    let identifier = identifier();
    identifier
        .scorer()
        .primary()
        .score_for(&image_uri("p1"), 97.0);

    let pool = vec![candidate("p1", "Asha")];
    let result = identifier.identify(&probe(), &pool).await;

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["matchFound"], true);
    assert_eq!(json["matchedCandidate"]["name"], "Asha");
    assert_eq!(json["matchedCandidate"]["referenceImage"], image_uri("p1"));
}
