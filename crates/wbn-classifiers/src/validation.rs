//! Structural preconditions checked before any fitting work begins.
use crate::error::WbnError;

/// Fails with `WbnError::InstanceCount` when `data` and `target` differ in length.
pub fn validate<D, T>(data: &[D], target: &[T]) -> Result<(), WbnError> {
    if data.len() != target.len() {
        return Err(WbnError::InstanceCount {
            data: data.len(),
            target: target.len(),
        });
    }
    Ok(())
}
