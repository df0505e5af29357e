//! Placement identifier generation.

use base64::Engine as _;

/// Random bytes per identifier; 16 bytes encode to 22 URL-safe characters.
const ID_LENGTH_BYTES: usize = 16;

/// Generates a random, URL-safe placement identifier.
///
/// Uses `getrandom` for entropy and encodes the result as URL-safe base64
/// without padding, so the id can be embedded in a query string unescaped.
///
/// # Panics
///
/// Panics if the system random number generator fails.
pub fn generate_placement_id() -> String {
    let mut buffer = [0u8; ID_LENGTH_BYTES];

    getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(buffer)
}
