//! Tracking-link signing and verification.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use url::form_urlencoded;

type HmacSha256 = Hmac<Sha256>;

/// Length of an HMAC-SHA256 tag in bytes.
const SIGNATURE_BYTES: usize = 32;

/// Query parameter carrying the placement identifier.
pub const PLACEMENT_PARAM: &str = "placementId";

/// Query parameter carrying the signature.
pub const SIGNATURE_PARAM: &str = "sig";

/// Signs placement identifiers so tracking links cannot be forged.
///
/// Signatures are HMAC-SHA256 over the raw identifier, keyed by the
/// process-wide signing secret, and rendered as 64 lowercase hex characters.
pub struct LinkSigner {
    secret: Vec<u8>,
    base_url: String,
}

impl LinkSigner {
    /// Creates a signer.
    ///
    /// # Arguments
    ///
    /// - `secret` - HMAC key; links signed under another key never verify
    /// - `base_url` - public origin of the tracking endpoint, e.g. `https://t.example.com`
    pub fn new(secret: impl Into<Vec<u8>>, base_url: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn mac(&self, placement_id: &str) -> HmacSha256 {
        let mut mac =
            HmacSha256::new_from_slice(&self.secret).expect("HMAC accepts any key length");
        mac.update(placement_id.as_bytes());
        mac
    }

    /// Returns the hex signature for `placement_id`.
    pub fn sign(&self, placement_id: &str) -> String {
        hex::encode(self.mac(placement_id).finalize().into_bytes())
    }

    /// Verifies `signature` against `placement_id` in constant time.
    ///
    /// Non-hex input and any length other than 64 hex characters fail. The
    /// tag comparison runs even for malformed input, so a wrong length is not
    /// observable through timing.
    pub fn verify(&self, placement_id: &str, signature: &str) -> bool {
        let mut supplied = [0u8; SIGNATURE_BYTES];
        let well_formed = hex::decode_to_slice(signature, &mut supplied).is_ok();
        let matches = self.mac(placement_id).verify_slice(&supplied).is_ok();

        well_formed & matches
    }

    /// Builds `<base>/c?placementId=<id>&sig=<signature>`.
    pub fn tracking_link(&self, placement_id: &str) -> String {
        let encoded_id: String = form_urlencoded::byte_serialize(placement_id.as_bytes()).collect();
        format!(
            "{}/c?{}={}&{}={}",
            self.base_url,
            PLACEMENT_PARAM,
            encoded_id,
            SIGNATURE_PARAM,
            self.sign(placement_id)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> LinkSigner {
        LinkSigner::new("test-signing-secret", "http://localhost:3000/")
    }

    #[test]
    fn test_sign_is_deterministic_hex() {
        let s = signer();
        let sig = s.sign("placement-1");

        assert_eq!(sig, s.sign("placement-1"));
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_known_vector() {
        let s = LinkSigner::new("default-secret-for-development", "http://localhost:3000");

        assert_eq!(
            s.sign("newsletter-test-1"),
            "3f5c53f5db16c024f3667d6818b862f91cc524739ec1088d69635e1fff72d258"
        );
        assert!(s.verify(
            "newsletter-test-1",
            "3f5c53f5db16c024f3667d6818b862f91cc524739ec1088d69635e1fff72d258"
        ));
    }

    #[test]
    fn test_verify_round_trip() {
        let s = signer();
        for id in ["p1", "a-much-longer-placement-identifier", "ünïcödé", ""] {
            assert!(s.verify(id, &s.sign(id)), "round trip failed for {id:?}");
        }
    }

    #[test]
    fn test_verify_rejects_other_ids_signature() {
        let s = signer();
        assert!(!s.verify("p1", &s.sign("p2")));
    }

    #[test]
    fn test_verify_rejects_other_secret() {
        let other = LinkSigner::new("another-secret", "http://localhost:3000");
        assert!(!signer().verify("p1", &other.sign("p1")));
    }

    #[test]
    fn test_verify_rejects_malformed_signatures() {
        let s = signer();
        let good = s.sign("p1");

        assert!(!s.verify("p1", ""));
        assert!(!s.verify("p1", &good[..63]));
        assert!(!s.verify("p1", &good[..62]));
        assert!(!s.verify("p1", &format!("{good}00")));
        assert!(!s.verify("p1", &format!("zz{}", &good[2..])));
        assert!(!s.verify("p1", "not-a-signature"));
    }

    #[test]
    fn test_verify_rejects_single_flipped_nibble() {
        let s = signer();
        let good = s.sign("p1");
        let flipped_char = if good.starts_with('0') { '1' } else { '0' };
        let bad = format!("{flipped_char}{}", &good[1..]);

        assert!(!s.verify("p1", &bad));
    }

    #[test]
    fn test_tracking_link_format() {
        let s = signer();
        let link = s.tracking_link("placement-1");

        assert_eq!(
            link,
            format!(
                "http://localhost:3000/c?placementId=placement-1&sig={}",
                s.sign("placement-1")
            )
        );
    }

    #[test]
    fn test_tracking_link_escapes_identifier() {
        let link = signer().tracking_link("a b&c");
        assert!(link.starts_with("http://localhost:3000/c?placementId=a+b%26c&sig="));
    }
}
