/// Encoded compact document, written on every run that reaches encoding.
pub const ENCODED_ARTIFACT: &str = "encoded.toon";

/// Tree decoded from the pre-existing compact document, written when it
/// does not match the reference.
pub const DECODED_FAIL_ARTIFACT: &str = "decoded_from_compact.json";

/// Tree produced by encode-then-decode, written when it does not match.
pub const ROUNDTRIP_FAIL_ARTIFACT: &str = "roundtrip_fail.json";

pub const DEFAULT_INDENT: usize = 2;
