//! First-success combinator over an ordered candidate list
//!
//! Candidates are attempted strictly one after another. The first `Ok` wins;
//! when all fail, only the last error is returned.

use std::fmt::Display;
use std::future::Future;

/// Every candidate failed
#[derive(Debug)]
pub struct Exhausted<E> {
    /// Number of candidates attempted
    pub attempts: usize,
    /// Error of the final attempt, `None` for an empty candidate list
    pub last_error: Option<E>,
}

/// Try `attempt` on each candidate in order until one succeeds.
pub async fn first_success<C, T, E, F, Fut>(
    candidates: impl IntoIterator<Item = C>,
    mut attempt: F,
) -> Result<T, Exhausted<E>>
where
    C: Display,
    E: Display,
    F: FnMut(C) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let mut attempts = 0;
    let mut last_error = None;

    for candidate in candidates {
        attempts += 1;
        let label = candidate.to_string();
        match attempt(candidate).await {
            Ok(value) => {
                tracing::debug!(candidate = %label, attempts, "candidate succeeded");
                return Ok(value);
            }
            Err(err) => {
                tracing::warn!(candidate = %label, error = %err, "candidate failed");
                last_error = Some(err);
            }
        }
    }

    Err(Exhausted {
        attempts,
        last_error,
    })
}
