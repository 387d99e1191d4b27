use std::time::Duration;

use crate::{Llm, LlmRequest, LlmResponse, ReactantError};

const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(500);
const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Retries transient model failures with exponential backoff.
pub struct Retrying<L> {
    llm: L,
    max_attempts: usize,
    initial_backoff: Duration,
    max_backoff: Duration,
}

impl<L> Retrying<L> {
    pub fn new(llm: L, max_attempts: usize) -> Self {
        Self {
            llm,
            max_attempts,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
        }
    }

    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    fn backoff_for(&self, attempt: usize) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16) as u32;
        self.initial_backoff
            .saturating_mul(2u32.saturating_pow(exponent))
            .min(self.max_backoff)
    }
}

pub fn is_retryable(error: &ReactantError) -> bool {
    matches!(
        error,
        ReactantError::LlmProvider(_) | ReactantError::RateLimited(_) | ReactantError::Timeout(_)
    )
}

#[async_trait::async_trait]
impl<L> Llm for Retrying<L>
where
    L: Llm,
{
    async fn invoke(&self, request: LlmRequest) -> Result<LlmResponse, ReactantError> {
        if self.max_attempts == 0 {
            return Err(ReactantError::MaxRetriesExceeded {
                max: 0,
                last: "no attempts allowed".to_string(),
            });
        }

        let mut attempt = 1;
        loop {
            let error = match self.llm.invoke(request.clone()).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            if !is_retryable(&error) {
                return Err(error);
            }

            if attempt == self.max_attempts {
                return Err(ReactantError::MaxRetriesExceeded {
                    max: self.max_attempts,
                    last: error.to_string(),
                });
            }

            let backoff = self.backoff_for(attempt);
            tracing::warn!(
                attempt,
                max_attempts = self.max_attempts,
                backoff_ms = backoff.as_millis() as u64,
                error = %error,
                "transient model failure, retrying"
            );
            tokio::time::sleep(backoff).await;
            attempt += 1;
        }
    }
}
