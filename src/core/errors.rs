/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use super::types::TargetKey;
use miette::Diagnostic;
use thiserror::Error;

/// Signal operation result
pub type SignalResult<T> = Result<T, SignalError>;

/// Errors surfaced by signal dispatch
///
/// Connecting and disconnecting never fail; unreachable targets are pruned
/// silently. Only dispatch itself and pool setup produce errors.
#[derive(Error, Debug, Diagnostic)]
pub enum SignalError {
    #[error("slot {target} failed while handling {signal}")]
    #[diagnostic(
        code(signal::slot_failed),
        help("Synchronous emission stops at the first failing slot. Later slots were not invoked.")
    )]
    SlotFailed {
        signal: String,
        target: TargetKey,
        #[source]
        source: anyhow::Error,
    },

    #[error("dispatch pool unavailable: {0}")]
    #[diagnostic(
        code(signal::runtime_unavailable),
        help("The worker runtime could not be started. Check thread limits of the process.")
    )]
    RuntimeUnavailable(String),

    #[error("dispatch pool already started; configuration must be applied before the first async emission")]
    #[diagnostic(code(signal::already_configured))]
    AlreadyConfigured,
}

impl SignalError {
    /// Short stable label for logs
    pub fn as_label(&self) -> &'static str {
        match self {
            SignalError::SlotFailed { .. } => "slot_failed",
            SignalError::RuntimeUnavailable(_) => "runtime_unavailable",
            SignalError::AlreadyConfigured => "already_configured",
        }
    }

    /// Target that failed, for slot failures
    pub fn target(&self) -> Option<TargetKey> {
        match self {
            SignalError::SlotFailed { target, .. } => Some(*target),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_failed_keeps_source() {
        let err = SignalError::SlotFailed {
            signal: "clicked".to_string(),
            target: TargetKey::Function { addr: 0x40 },
            source: anyhow::anyhow!("boom"),
        };

        assert_eq!(err.as_label(), "slot_failed");
        assert_eq!(err.target(), Some(TargetKey::Function { addr: 0x40 }));
        assert!(err.to_string().contains("clicked"));

        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("boom"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(SignalError::AlreadyConfigured.as_label(), "already_configured");
        assert_eq!(
            SignalError::RuntimeUnavailable("no threads".into()).as_label(),
            "runtime_unavailable"
        );
        assert_eq!(SignalError::AlreadyConfigured.target(), None);
    }
}
