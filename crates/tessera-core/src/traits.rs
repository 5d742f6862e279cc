// ---------------------------------------------------------------------------
// SignatureVerifier — the injected verification primitive
//
// The engine never implements a signature algorithm. Callers inject
// whichever primitive their deployment uses; `Ed25519Verifier` in
// `crypto` is the default adapter.
// ---------------------------------------------------------------------------

pub trait SignatureVerifier: Send + Sync {
    /// Verify `signature` over `message` under `public_key`.
    ///
    /// Malformed keys or signatures verify as false; this primitive
    /// never panics on hostile input.
    fn verify(&self, public_key: &[u8], message: &[u8], signature: &[u8]) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;

    // Verify the trait object is object-safe
    fn _assert_verifier_object_safe(_: &dyn SignatureVerifier) {}

    struct AlwaysTrue;
    impl SignatureVerifier for AlwaysTrue {
        fn verify(&self, _pk: &[u8], _msg: &[u8], _sig: &[u8]) -> bool {
            true
        }
    }

    #[test]
    fn test_injected_verifier_is_swappable() {
        let verifier: &dyn SignatureVerifier = &AlwaysTrue;
        assert!(verifier.verify(b"", b"msg", b""));
    }
}
