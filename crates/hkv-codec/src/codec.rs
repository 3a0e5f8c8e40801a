use bincode::Options;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::envelope::{self, PayloadFormat};
use crate::error::{CodecError, CodecResult};

/// Converts values to framed byte sequences and back.
///
/// Implementations must be pure: no I/O, no shared state. `decode` must reject
/// any byte sequence that was not produced by `encode` of the same codec
/// rather than return a garbage value.
pub trait Codec: Send + Sync {
    /// Payload format written into the envelope.
    fn format(&self) -> PayloadFormat;

    /// Serialize `value` into a sealed envelope.
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>>;

    /// Open an envelope and deserialize its payload.
    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T>;
}

/// Self-describing binary codec backed by `rmp-serde` (MessagePack).
///
/// Structs are written as maps keyed by field name, so values decode through
/// `deserialize_any` as well as into their concrete type: `serde_json::Value`,
/// untagged enums and other schema-less shapes round-trip. Floats are stored
/// bit-exact, including NaN and the infinities. This is the store default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MessagePackCodec;

impl Codec for MessagePackCodec {
    fn format(&self) -> PayloadFormat {
        PayloadFormat::MessagePack
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>> {
        let payload =
            rmp_serde::to_vec_named(value).map_err(|e| CodecError::Serialize(e.to_string()))?;
        envelope::seal(self.format(), &payload)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T> {
        let mut rest = envelope::open(self.format(), bytes)?;
        let value = {
            let mut de = rmp_serde::Deserializer::new(&mut rest);
            T::deserialize(&mut de).map_err(|e| CodecError::Deserialize(e.to_string()))?
        };
        if !rest.is_empty() {
            return Err(CodecError::Deserialize(format!(
                "{} trailing bytes after value",
                rest.len()
            )));
        }
        Ok(value)
    }
}

/// Compact binary codec backed by `bincode`.
///
/// Not self-describing: the type passed to `decode` must match the type that
/// was encoded, and values that only deserialize through `deserialize_any`
/// (`serde_json::Value`, untagged enums) encode fine but never decode. Use
/// [`MessagePackCodec`] for those.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BincodeCodec;

/// Fixed-width integers, and a payload must be consumed exactly.
fn bincode_options() -> impl bincode::Options {
    bincode::DefaultOptions::new()
        .with_fixint_encoding()
        .reject_trailing_bytes()
}

impl Codec for BincodeCodec {
    fn format(&self) -> PayloadFormat {
        PayloadFormat::Bincode
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> CodecResult<Vec<u8>> {
        let payload = bincode_options()
            .serialize(value)
            .map_err(|e| CodecError::Serialize(e.to_string()))?;
        envelope::seal(self.format(), &payload)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> CodecResult<T> {
        let payload = envelope::open(self.format(), bytes)?;
        bincode_options()
            .deserialize(payload)
            .map_err(|e| CodecError::Deserialize(e.to_string()))
    }
}
