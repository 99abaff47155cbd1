use bytes::{Bytes, BytesMut};
use dvsim_core::RoutingVector;
use tokio_util::codec::{Decoder, Encoder, LengthDelimitedCodec};

use crate::error::NetworkError;

/// Length-prefixed JSON framing for [`RoutingVector`] messages.
///
/// The length prefix delimits vector boundaries explicitly, so vectors of
/// any size cross the channel without truncation or concatenation. A frame
/// whose payload fails to parse yields [`NetworkError::Decode`]; the length
/// codec has already consumed the bad frame, so the stream stays usable.
#[derive(Debug)]
pub struct VectorCodec {
    length_codec: LengthDelimitedCodec,
}

impl VectorCodec {
    pub fn new() -> Self {
        Self {
            length_codec: LengthDelimitedCodec::new(),
        }
    }
}

impl Default for VectorCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for VectorCodec {
    type Item = RoutingVector;
    type Error = NetworkError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Self::Item>, Self::Error> {
        let Some(frame) = self.length_codec.decode(src)? else {
            return Ok(None);
        };

        serde_json::from_slice(&frame)
            .map(Some)
            .map_err(NetworkError::Decode)
    }
}

impl Encoder<RoutingVector> for VectorCodec {
    type Error = NetworkError;

    fn encode(&mut self, item: RoutingVector, dst: &mut BytesMut) -> Result<(), Self::Error> {
        let json = serde_json::to_vec(&item).map_err(NetworkError::Encode)?;

        self.length_codec
            .encode(Bytes::from(json), dst)
            .map_err(NetworkError::Io)
    }
}
