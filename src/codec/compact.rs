//! Compact (protocol buffers) records
//!
//! The compact protocol only knows about `n_val` and `allow_mult`. Callers
//! check [`BucketProperties::can_use_compact_protocol`] before going this
//! way; anything else set on the properties is dropped here.

use crate::props::BucketProperties;

/// Bucket properties as carried by the compact protocol
#[derive(Clone, PartialEq, prost::Message)]
pub struct RpbBucketProps {
    #[prost(uint32, optional, tag = "1")]
    pub n_val: Option<u32>,
    #[prost(bool, optional, tag = "2")]
    pub allow_mult: Option<bool>,
}

pub type CompactRecord = RpbBucketProps;

#[derive(Clone, PartialEq, prost::Message)]
pub struct RpbGetBucketReq {
    #[prost(bytes = "vec", tag = "1")]
    pub bucket: Vec<u8>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RpbGetBucketResp {
    #[prost(message, optional, tag = "1")]
    pub props: Option<RpbBucketProps>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RpbSetBucketReq {
    #[prost(bytes = "vec", tag = "1")]
    pub bucket: Vec<u8>,
    #[prost(message, optional, tag = "2")]
    pub props: Option<RpbBucketProps>,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct RpbErrorResp {
    #[prost(bytes = "vec", tag = "1")]
    pub errmsg: Vec<u8>,
    #[prost(uint32, tag = "2")]
    pub errcode: u32,
}

/// Build the compact record for `props`, keeping only `n_val` and `allow_mult`.
pub fn to_compact_record(props: &BucketProperties) -> CompactRecord {
    RpbBucketProps {
        n_val: props.replication_factor,
        allow_mult: props.allow_siblings,
    }
}

/// Properties from a compact reply; every other setting stays absent.
pub fn from_compact_record(record: &CompactRecord) -> BucketProperties {
    BucketProperties {
        replication_factor: record.n_val,
        allow_siblings: record.allow_mult,
        ..Default::default()
    }
}
