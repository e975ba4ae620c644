//! Decoding uploaded payloads into an in-memory [`crate::types::Table`].
//!
//! Most callers go through [`crate::upload`], which infers the format and decodes in one step.
//! The pieces are available separately:
//!
//! - [`infer_format`] picks a [`TableFormat`] for an upload
//! - [`decode`] decodes a payload with a known format
//! - [`csv`] and `excel` (feature `excel`) hold the format-specific decoders

pub mod csv;
#[cfg(feature = "excel")]
pub mod excel;
pub mod header;
pub mod unified;

pub use unified::{decode, infer_format, TableFormat};
