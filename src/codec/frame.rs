//! Compact protocol framing
//!
//! ```text
//! ┌──────────────┬──────┬─────────────────┐
//! │ length (u32) │ code │ protobuf body   │
//! │  big-endian  │ (u8) │ (length-1 bytes)│
//! └──────────────┴──────┴─────────────────┘
//! ```
//!
//! `length` covers the code byte and the body.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use prost::Message;

use crate::common::{Error, Result};

const HEADER_LEN: usize = 4;

/// Message codes used for bucket properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MessageCode {
    ErrorResp = 0,
    GetBucketReq = 19,
    GetBucketResp = 20,
    SetBucketReq = 21,
    SetBucketResp = 22,
}

impl MessageCode {
    pub fn from_u8(code: u8) -> Option<Self> {
        match code {
            0 => Some(MessageCode::ErrorResp),
            19 => Some(MessageCode::GetBucketReq),
            20 => Some(MessageCode::GetBucketResp),
            21 => Some(MessageCode::SetBucketReq),
            22 => Some(MessageCode::SetBucketResp),
            _ => None,
        }
    }
}

/// One decoded frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub code: u8,
    pub body: Bytes,
}

impl Frame {
    pub fn message_code(&self) -> Option<MessageCode> {
        MessageCode::from_u8(self.code)
    }

    /// Decode the body as protobuf message `M`
    pub fn decode<M: Message + Default>(&self) -> Result<M> {
        Ok(M::decode(self.body.clone())?)
    }
}

/// Encode `message` into a frame tagged with `code`
pub fn encode_frame<M: Message>(code: MessageCode, message: &M) -> Bytes {
    let body_len = message.encoded_len();
    let mut buf = BytesMut::with_capacity(HEADER_LEN + 1 + body_len);
    buf.put_u32((body_len + 1) as u32);
    buf.put_u8(code as u8);
    buf.put_slice(&message.encode_to_vec());
    buf.freeze()
}

/// Encode a frame that has a code but no body (e.g. a set-bucket reply)
pub fn encode_empty_frame(code: MessageCode) -> Bytes {
    let mut buf = BytesMut::with_capacity(HEADER_LEN + 1);
    buf.put_u32(1);
    buf.put_u8(code as u8);
    buf.freeze()
}

/// Take one frame off the front of `buf`.
///
/// Returns `Ok(None)` and leaves `buf` untouched while the frame is still
/// incomplete.
pub fn decode_frame(buf: &mut BytesMut, max_frame_size: usize) -> Result<Option<Frame>> {
    if buf.len() < HEADER_LEN {
        return Ok(None);
    }

    let len = u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]) as usize;
    if len == 0 {
        return Err(Error::Protocol("zero-length frame".into()));
    }
    if len > max_frame_size {
        return Err(Error::Protocol(format!(
            "frame of {} bytes exceeds limit of {} bytes",
            len, max_frame_size
        )));
    }
    if buf.len() < HEADER_LEN + len {
        return Ok(None);
    }

    buf.advance(HEADER_LEN);
    let mut payload = buf.split_to(len);
    let code = payload.get_u8();
    Ok(Some(Frame {
        code,
        body: payload.freeze(),
    }))
}
