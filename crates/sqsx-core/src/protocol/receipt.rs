//! Receipt handle framing.
//!
//! Layout (all parts concatenated, no separators):
//!
//! ```text
//! LOCATION_MARKER location LOCATION_MARKER KEY_MARKER key KEY_MARKER original-handle
//! ```
//!
//! Parsing is positional: the location sits between the first two location
//! markers, the key between the next two key markers, and everything after
//! the second key marker is the original handle, byte for byte. A location or
//! key containing either marker would make that ambiguous, so embedding
//! rejects them. The original handle may contain anything.

use crate::constants::{KEY_MARKER, LOCATION_MARKER};
use crate::error::{Result, SqsxError};
use crate::protocol::pointer::PayloadPointer;

/// A receipt handle split back into its pointer and transport handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramedHandle {
    pub pointer: PayloadPointer,
    pub original: String,
}

/// True when the handle carries both framing markers.
pub fn is_store_framed(handle: &str) -> bool {
    handle.contains(LOCATION_MARKER) && handle.contains(KEY_MARKER)
}

/// Prefix `handle` with the framed `pointer`.
pub fn embed_pointer(handle: &str, pointer: &PayloadPointer) -> Result<String> {
    for (field, value) in [("location", &pointer.location), ("key", &pointer.key)] {
        if value.contains(LOCATION_MARKER) || value.contains(KEY_MARKER) {
            return Err(SqsxError::InvalidPointer(format!(
                "pointer {field} contains a receipt handle marker: {value}"
            )));
        }
    }

    let mut out = String::with_capacity(
        2 * LOCATION_MARKER.len()
            + 2 * KEY_MARKER.len()
            + pointer.location.len()
            + pointer.key.len()
            + handle.len(),
    );
    out.push_str(LOCATION_MARKER);
    out.push_str(&pointer.location);
    out.push_str(LOCATION_MARKER);
    out.push_str(KEY_MARKER);
    out.push_str(&pointer.key);
    out.push_str(KEY_MARKER);
    out.push_str(handle);
    Ok(out)
}

/// Split a framed handle into pointer and original handle.
pub fn decode_framed(handle: &str) -> Result<FramedHandle> {
    let (location, rest) = between_markers(handle, LOCATION_MARKER)?;
    let (key, original) = between_markers(rest, KEY_MARKER)?;
    Ok(FramedHandle {
        pointer: PayloadPointer::new(location, key),
        original: original.to_string(),
    })
}

/// Original transport handle; unframed handles come back unchanged.
pub fn strip_pointer(handle: &str) -> Result<String> {
    if is_store_framed(handle) {
        Ok(decode_framed(handle)?.original)
    } else {
        Ok(handle.to_string())
    }
}

/// Value between the first and second occurrence of `marker`, plus the tail
/// after the second occurrence. The second search starts right after the
/// first marker, never from the start of the string.
fn between_markers<'a>(s: &'a str, marker: &str) -> Result<(&'a str, &'a str)> {
    let missing = || SqsxError::InvalidPointer(format!("receipt handle is missing marker {marker}"));

    let first = s.find(marker).ok_or_else(missing)?;
    let value_start = first + marker.len();
    let after_first = s.get(value_start..).ok_or_else(missing)?;
    let value_len = after_first.find(marker).ok_or_else(missing)?;

    let value = after_first.get(..value_len).ok_or_else(missing)?;
    let tail = after_first.get(value_len + marker.len()..).ok_or_else(missing)?;
    Ok((value, tail))
}
