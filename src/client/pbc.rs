//! Compact protocol client for bucket properties
//!
//! One client owns one TCP connection; requests are strictly
//! request/response.

use bytes::BytesMut;
use prost::Message;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::codec::compact::{
    from_compact_record, to_compact_record, RpbErrorResp, RpbGetBucketReq, RpbGetBucketResp,
    RpbSetBucketReq,
};
use crate::codec::frame::{decode_frame, encode_frame, Frame, MessageCode};
use crate::common::{ClientConfig, Error, Result};
use crate::props::BucketProperties;

pub struct PbcClient {
    stream: TcpStream,
    buf: BytesMut,
    timeout: Duration,
    max_frame_size: usize,
}

impl PbcClient {
    pub async fn connect(addr: &str, timeout: Duration, max_frame_size: usize) -> Result<Self> {
        tracing::debug!("Connecting to {}", addr);
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr))
            .await
            .map_err(|_| Error::Timeout(format!("connect to {}", addr)))??;
        stream.set_nodelay(true)?;

        Ok(Self {
            stream,
            buf: BytesMut::with_capacity(4096),
            timeout,
            max_frame_size,
        })
    }

    pub async fn from_config(config: &ClientConfig) -> Result<Self> {
        Self::connect(&config.pbc_addr, config.request_timeout(), config.max_frame_size).await
    }

    /// Fetch `n_val` and `allow_mult`; nothing else is available here
    pub async fn get_bucket_properties(&mut self, bucket: &str) -> Result<BucketProperties> {
        let request = RpbGetBucketReq {
            bucket: bucket.as_bytes().to_vec(),
        };
        let frame = self.call(MessageCode::GetBucketReq, &request).await?;
        expect(&frame, MessageCode::GetBucketResp)?;

        let response: RpbGetBucketResp = frame.decode()?;
        Ok(from_compact_record(&response.props.unwrap_or_default()))
    }

    /// Send `n_val` and `allow_mult`; every other setting is dropped
    pub async fn set_bucket_properties(&mut self, bucket: &str, props: &BucketProperties) -> Result<()> {
        let drops_settings = !props.can_use_compact_protocol()
            || !props.pre_commit_hooks().is_unset()
            || !props.post_commit_hooks().is_unset();
        if drops_settings {
            tracing::warn!(
                "Bucket {}: settings beyond n_val/allow_mult are not sent over the compact protocol",
                bucket
            );
        }
        let request = RpbSetBucketReq {
            bucket: bucket.as_bytes().to_vec(),
            props: Some(to_compact_record(props)),
        };
        let frame = self.call(MessageCode::SetBucketReq, &request).await?;
        expect(&frame, MessageCode::SetBucketResp)
    }

    async fn call<M: Message>(&mut self, code: MessageCode, message: &M) -> Result<Frame> {
        let request = encode_frame(code, message);
        tokio::time::timeout(self.timeout, async {
            self.stream.write_all(&request).await?;
            self.read_frame().await
        })
        .await
        .map_err(|_| Error::Timeout(format!("{:?} request", code)))?
    }

    async fn read_frame(&mut self) -> Result<Frame> {
        loop {
            if let Some(frame) = decode_frame(&mut self.buf, self.max_frame_size)? {
                return Ok(frame);
            }
            if self.stream.read_buf(&mut self.buf).await? == 0 {
                return Err(Error::Protocol("connection closed by server".into()));
            }
        }
    }
}

/// Accept `frame` only if it carries `code`; map error replies to `Error::Server`
fn expect(frame: &Frame, code: MessageCode) -> Result<()> {
    match frame.message_code() {
        Some(actual) if actual == code => Ok(()),
        Some(MessageCode::ErrorResp) => {
            let err: RpbErrorResp = frame.decode()?;
            Err(Error::Server {
                code: err.errcode,
                message: String::from_utf8_lossy(&err.errmsg).into_owned(),
            })
        }
        _ => Err(Error::Protocol(format!(
            "expected message code {}, got {}",
            code as u8, frame.code
        ))),
    }
}
