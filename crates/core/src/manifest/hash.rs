//! Fingerprint checks and deployment digests.

use sha2::{Digest, Sha256};

/// Length of a content fingerprint in hex characters.
pub const FINGERPRINT_LEN: usize = 32;

/// Whether `value` looks like a content fingerprint: 32 lowercase hex characters.
pub fn is_fingerprint(value: &str) -> bool {
    value.len() == FINGERPRINT_LEN
        && value.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Compute a digest identifying a whole deployment.
///
/// Entries must be supplied in a stable order; each pair is hashed as
/// `path\tfingerprint\n`.
pub fn compute_deployment_digest<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut hasher = Sha256::new();
    for (path, fingerprint) in entries {
        hasher.update(path.as_bytes());
        hasher.update(b"\t");
        hasher.update(fingerprint.as_bytes());
        hasher.update(b"\n");
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_accepts_md5_hex() {
        assert!(is_fingerprint("0a78eefc0a6d6d6976d7df767a012fd5"));
    }

    #[test]
    fn test_fingerprint_rejects_uppercase() {
        assert!(!is_fingerprint("0A78EEFC0A6D6D6976D7DF767A012FD5"));
    }

    #[test]
    fn test_fingerprint_rejects_wrong_length() {
        assert!(!is_fingerprint("0a78eefc"));
        assert!(!is_fingerprint(""));
    }

    #[test]
    fn test_digest_stability() {
        let a = compute_deployment_digest([("/", "h0"), ("main.dart.js", "h1")]);
        let b = compute_deployment_digest([("/", "h0"), ("main.dart.js", "h1")]);
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_digest_changes_with_fingerprint() {
        let a = compute_deployment_digest([("main.dart.js", "h1")]);
        let b = compute_deployment_digest([("main.dart.js", "h2")]);
        assert_ne!(a, b);
    }
}
