//! Read-back checks shared by every scenario.

use crate::error::ScenarioError;
use std::fmt::Debug;

/// Fails with `message` unless `condition` holds.
pub fn ensure(condition: bool, message: impl Into<String>) -> Result<(), ScenarioError> {
    if condition {
        Ok(())
    } else {
        Err(ScenarioError::Verification(message.into()))
    }
}

/// Fails with `message` and both values unless `expected == actual`.
pub fn ensure_eq<T>(message: &str, expected: &T, actual: &T) -> Result<(), ScenarioError>
where
    T: PartialEq + Debug + ?Sized,
{
    if expected == actual {
        Ok(())
    } else {
        Err(ScenarioError::Verification(format!(
            "{message}: expected {expected:?}, found {actual:?}"
        )))
    }
}
