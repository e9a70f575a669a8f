//! Identifier generation for traces and spans.
//!
//! Trace and span identifiers are lowercase hex strings of OS-provided
//! random bytes: 8 bytes (16 chars) for a span/segment guid, 16 bytes
//! (32 chars) for a trace id.

use std::fmt::Write as _;

fn random_hex(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    getrandom::fill(&mut buf).expect("OS entropy failed");
    let mut out = String::with_capacity(bytes * 2);
    for byte in buf {
        let _ = write!(out, "{byte:02x}");
    }
    out
}

/// Generates a fresh 16-character span/segment guid.
#[must_use]
pub fn span_id() -> String {
    random_hex(8)
}

/// Generates a fresh 32-character trace id.
#[must_use]
pub fn trace_id() -> String {
    random_hex(16)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_lower_hex(s: &str) -> bool {
        s.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase())
    }

    #[test]
    fn span_ids_are_16_hex_chars() {
        let id = span_id();
        assert_eq!(id.len(), 16);
        assert!(is_lower_hex(&id), "{id}");
    }

    #[test]
    fn trace_ids_are_32_hex_chars() {
        let id = trace_id();
        assert_eq!(id.len(), 32);
        assert!(is_lower_hex(&id), "{id}");
    }

    #[test]
    fn ids_are_not_repeated() {
        assert_ne!(span_id(), span_id());
        assert_ne!(trace_id(), trace_id());
    }
}
