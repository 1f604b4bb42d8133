// State file framing: [version: u8][wincode payload].
// version 1 = StateRecord { interface, captured_at_ms, state }.

pub(super) const STATE_VERSION: u8 = 1;

pub(super) fn with_version_prefix(version: u8, payload: Vec<u8>) -> Vec<u8> {
    let mut out = Vec::with_capacity(1 + payload.len());
    out.push(version);
    out.extend_from_slice(&payload);
    out
}

/// Version byte and payload, or None for an empty file.
pub(super) fn split_version(bytes: &[u8]) -> Option<(u8, &[u8])> {
    bytes.split_first().map(|(version, payload)| (*version, payload))
}
