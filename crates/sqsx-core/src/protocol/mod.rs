//! Pointer wire formats.
//!
//! A [`pointer::PayloadPointer`] travels in two encodings:
//! - Body form: compact JSON replacing the message body of an offloaded message.
//! - Handle form: delimiter-framed prefix on the receipt handle, so delete and
//!   visibility calls can find the stored payload without re-reading the body.
//!
//! Decoders never panic: a body that is not a pointer or a handle that cannot
//! be parsed is reported as `SqsxError::InvalidPointer`.

pub mod pointer;
pub mod receipt;
