//! Value codecs for the HKV namespaced store.
//!
//! A codec turns any `serde`-serializable value into a self-contained byte
//! sequence and restores it later. It knows nothing about the container the
//! bytes end up in.
//!
//! # Codecs
//!
//! - [`MessagePackCodec`] -- self-describing binary, the store default; carries
//!   schema-less values and non-finite floats
//! - [`BincodeCodec`] -- compact typed binary; values must be read back as the
//!   type they were written as
//!
//! Both wrap their payload in the same [`envelope`] so a damaged, truncated or
//! foreign byte sequence surfaces as a [`CodecError`] instead of a wrong value.

pub mod codec;
pub mod envelope;
pub mod error;

pub use codec::{BincodeCodec, Codec, MessagePackCodec};
pub use envelope::{peek_format, PayloadFormat};
pub use error::{CodecError, CodecResult};
