// Unit tests for the error taxonomy

use super::*;
use crate::locator::Descriptor;

fn not_found() -> DrillError {
    DrillError::NotFound {
        target: "Proceed button".to_string(),
        attempted: vec![
            Descriptor::role_with_text("button", "Proceed"),
            Descriptor::css("div._ahef[role=\"button\"]"),
        ],
    }
}

#[test]
fn test_exit_codes() {
    assert_eq!(not_found().exit_code(), 2);
    assert_eq!(
        DrillError::StillBlocked {
            target: "x".to_string(),
            attempts: 30
        }
        .exit_code(),
        3
    );
    assert_eq!(
        DrillError::ActionFailed {
            target: "x".to_string(),
            action: "click".to_string(),
            source: anyhow::anyhow!("boom"),
        }
        .exit_code(),
        4
    );
    assert_eq!(
        DrillError::ValidationBreach {
            input: "123".to_string()
        }
        .exit_code(),
        5
    );
    assert_eq!(DrillError::Engine("gone".to_string()).exit_code(), 6);
    assert_eq!(DrillError::Other(anyhow::anyhow!("misc")).exit_code(), 1);
}

#[test]
fn test_recoverability_split() {
    assert!(not_found().recoverable());
    assert!(
        DrillError::StillBlocked {
            target: "x".to_string(),
            attempts: 1
        }
        .recoverable()
    );
    assert!(
        !DrillError::ActionFailed {
            target: "x".to_string(),
            action: "fill".to_string(),
            source: anyhow::anyhow!("boom"),
        }
        .recoverable()
    );
    assert!(
        !DrillError::ValidationBreach {
            input: "123".to_string()
        }
        .recoverable()
    );
    assert!(!DrillError::Engine("gone".to_string()).recoverable());
}

#[test]
fn test_not_found_lists_attempted_descriptors() {
    let message = not_found().to_string();
    assert!(message.contains("Proceed button"));
    assert!(message.contains("role:button[text=\"Proceed\"]"));
    assert!(message.contains("css:div._ahef[role=\"button\"]"));
}

#[test]
fn test_still_blocked_reports_attempts() {
    let err = DrillError::StillBlocked {
        target: "Proceed button".to_string(),
        attempts: 30,
    };
    let message = err.to_string();
    assert!(message.contains("Proceed button"));
    assert!(message.contains("30"));
}

#[test]
fn test_action_failed_carries_context() {
    let err = DrillError::ActionFailed {
        target: "message input box".to_string(),
        action: "fill with \"kuhentest\"".to_string(),
        source: anyhow::anyhow!("element detached"),
    };
    let message = err.to_string();
    assert!(message.contains("message input box"));
    assert!(message.contains("kuhentest"));
    assert!(message.contains("element detached"));
    assert!(std::error::Error::source(&err).is_some());
}

#[test]
fn test_from_anyhow_is_other() {
    let err: DrillError = anyhow::anyhow!("misc").into();
    assert!(matches!(err, DrillError::Other(_)));
    assert_eq!(err.exit_code(), 1);
}
