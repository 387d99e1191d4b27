use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};
use std::time::Duration;

use reactant_core::{is_retryable, Llm, LlmRequest, LlmResponse, ReactantError, Retrying};

struct Flaky {
    failures_before_success: usize,
    attempts: Arc<AtomicUsize>,
}

impl Flaky {
    fn new(failures_before_success: usize) -> Self {
        Self {
            failures_before_success,
            attempts: Arc::new(AtomicUsize::new(0)),
        }
    }

    fn attempts_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.attempts)
    }
}

#[async_trait::async_trait]
impl Llm for Flaky {
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, ReactantError> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if attempt <= self.failures_before_success {
            return Err(ReactantError::LlmProvider("transient".to_string()));
        }

        Ok(LlmResponse::text(format!("ok:{}", request.prompt)))
    }
}

struct AuthFailer {
    attempts: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl Llm for AuthFailer {
    async fn invoke(&self, _request: LlmRequest) -> Result<LlmResponse, ReactantError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(ReactantError::Authentication("bad key".to_string()))
    }
}

fn fast(llm: impl Llm, max_attempts: usize) -> impl Llm {
    Retrying::new(llm, max_attempts).with_backoff(Duration::from_millis(1), Duration::from_millis(2))
}

#[tokio::test]
async fn retries_until_success() {
    let flaky = Flaky::new(2);
    let attempts = flaky.attempts_counter();
    let output = fast(flaky, 3)
        .invoke(LlmRequest::new("m", "ping"))
        .await
        .unwrap();

    assert_eq!(output.text, "ok:ping");
    assert_eq!(attempts.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn returns_max_retries_exceeded_with_last_error() {
    let flaky = Flaky::new(5);
    let attempts = flaky.attempts_counter();
    let err = fast(flaky, 2)
        .invoke(LlmRequest::new("m", "ping"))
        .await
        .unwrap_err();

    match err {
        ReactantError::MaxRetriesExceeded { max, last } => {
            assert_eq!(max, 2);
            assert!(last.contains("transient"));
        }
        other => panic!("expected MaxRetriesExceeded, got {other:?}"),
    }
    assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn zero_attempts_never_invokes() {
    let flaky = Flaky::new(0);
    let attempts = flaky.attempts_counter();
    let err = fast(flaky, 0)
        .invoke(LlmRequest::new("m", "ping"))
        .await
        .unwrap_err();

    assert!(matches!(err, ReactantError::MaxRetriesExceeded { max: 0, .. }));
    assert_eq!(attempts.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn non_retryable_error_fails_fast() {
    let attempts = Arc::new(AtomicUsize::new(0));
    let err = fast(
        AuthFailer {
            attempts: attempts.clone(),
        },
        3,
    )
    .invoke(LlmRequest::new("m", "ping"))
    .await
    .unwrap_err();

    assert!(matches!(err, ReactantError::Authentication(_)));
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn backoff_doubles_between_attempts() {
    let flaky = Flaky::new(3);
    let started = tokio::time::Instant::now();
    let output = Retrying::new(flaky, 4)
        .with_backoff(Duration::from_millis(100), Duration::from_secs(10))
        .invoke(LlmRequest::new("m", "ping"))
        .await
        .unwrap();

    assert_eq!(output.text, "ok:ping");
    // 100ms + 200ms + 400ms
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(700), "{elapsed:?}");
    assert!(elapsed < Duration::from_millis(800), "{elapsed:?}");
}

#[test]
fn only_transient_classes_are_retryable() {
    assert!(is_retryable(&ReactantError::LlmProvider("x".to_string())));
    assert!(is_retryable(&ReactantError::RateLimited("x".to_string())));
    assert!(is_retryable(&ReactantError::Timeout(Duration::from_secs(1))));
    assert!(!is_retryable(&ReactantError::Authentication("x".to_string())));
    assert!(!is_retryable(&ReactantError::InvalidRequest("x".to_string())));
    assert!(!is_retryable(&ReactantError::InvalidConfig("x".to_string())));
}
