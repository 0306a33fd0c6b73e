use super::ports::AuthError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand_core::{OsRng, RngCore};

const STATE_BYTES: usize = 32;

/// Generate an OAuth state value: 32 bytes from the OS CSPRNG, base64url encoded
pub fn generate_state() -> Result<String, AuthError> {
    let mut bytes = [0u8; STATE_BYTES];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| AuthError::StateGeneration(e.to_string()))?;

    Ok(URL_SAFE_NO_PAD.encode(bytes))
}

/// Check the `state` query parameter against the state cookie.
///
/// Both must be present, non-empty and byte-equal.
pub fn validate_state(state: Option<&str>, state_cookie: Option<&str>) -> Result<(), AuthError> {
    match (state, state_cookie) {
        (Some(state), Some(cookie)) if !state.is_empty() && state == cookie => Ok(()),
        _ => Err(AuthError::InvalidState),
    }
}
