//! Retry policy applied uniformly to every section task.

use ritra_error::{ConfigError, FailureClass, RitraResult};
use std::time::Duration;

/// Deadline-bounded retry policy.
///
/// Attempts continue until the shared stage deadline unless `max_attempts`
/// sets a ceiling. Backoff is a fixed constant per failure class.
///
/// # Examples
///
/// ```
/// use ritra_core::RetryPolicy;
/// use ritra_error::FailureClass;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .max_attempts(3u32)
///     .per_attempt_timeout(Duration::from_secs(10))
///     .build()
///     .unwrap();
///
/// assert_eq!(*policy.max_attempts(), Some(3));
/// assert_eq!(policy.backoff_for(FailureClass::Transient), Duration::from_secs(2));
/// assert_eq!(policy.backoff_for(FailureClass::Refusal), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_builder::Builder, derive_getters::Getters)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct RetryPolicy {
    /// Optional attempt ceiling; `None` retries until the deadline
    #[builder(setter(strip_option), default)]
    max_attempts: Option<u32>,
    /// Soft timeout raced against each provider call
    #[builder(default = "Duration::from_secs(40)")]
    per_attempt_timeout: Duration,
    /// Wait after a transport failure or soft timeout
    #[builder(default = "Duration::from_secs(2)")]
    backoff_after_transient: Duration,
    /// Wait after a refusal or any other retryable failure
    #[builder(default = "Duration::from_secs(5)")]
    backoff_after_other: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: None,
            per_attempt_timeout: Duration::from_secs(40),
            backoff_after_transient: Duration::from_secs(2),
            backoff_after_other: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    /// Creates a new policy builder.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Backoff to apply after a failure of the given class.
    pub fn backoff_for(&self, class: FailureClass) -> Duration {
        match class {
            FailureClass::Transient => self.backoff_after_transient,
            FailureClass::Refusal | FailureClass::Other => self.backoff_after_other,
        }
    }

    /// True if another attempt is allowed after `attempts_made`.
    pub fn allows_attempt(&self, attempts_made: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempts_made < max)
    }
}

impl RetryPolicyBuilder {
    /// Builds the policy.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a zero attempt ceiling or a zero
    /// per-attempt timeout.
    pub fn build(&self) -> RitraResult<RetryPolicy> {
        let policy = self
            .build_internal()
            .map_err(|e| ConfigError::new(e.to_string()))?;
        if policy.max_attempts == Some(0) {
            return Err(ConfigError::new("max_attempts must be at least 1").into());
        }
        if policy.per_attempt_timeout.is_zero() {
            return Err(ConfigError::new("per-attempt timeout must be non-zero").into());
        }
        Ok(policy)
    }
}
