use crate::foundation::error::{HookreelError, HookreelResult};

/// Marker between hooks in one submitted payload.
pub const BATCH_SEPARATOR: &str = "\n\n";

/// Split a submitted payload into individual hooks.
///
/// Pieces are trimmed and blank ones dropped; order is preserved. A payload with no usable hook
/// fails with [`HookreelError::EmptyInput`].
pub fn split_hooks(payload: &str) -> HookreelResult<Vec<String>> {
    let payload = payload.replace("\r\n", "\n");
    let hooks: Vec<String> = payload
        .trim()
        .split(BATCH_SEPARATOR)
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(str::to_owned)
        .collect();

    if hooks.is_empty() {
        return Err(HookreelError::empty_input("no hooks in payload"));
    }
    Ok(hooks)
}

#[cfg(test)]
#[path = "../../tests/unit/batch/split.rs"]
mod tests;
