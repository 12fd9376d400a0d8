//! REST/JSON encoding of bucket properties
//!
//! Bucket properties travel wrapped in a `props` object:
//!
//! ```json
//! {"props": {"n_val": 3, "allow_mult": true, "w": "quorum", "precommit": [{"name": "validate_json"}]}}
//! ```
//!
//! Quorums are bare numbers or bare strings, hooks are `{"name": ..}` or
//! `{"mod": .., "fun": ..}`.

use serde::{Deserialize, Serialize};

use crate::common::utils::media_type_essence;
use crate::common::{Error, Result};
use crate::props::{BucketProperties, CommitHook, HookList, NativeHook, QuorumValue};

pub const JSON_CONTENT_TYPE: &str = "application/json";

/// A REST reply as handed over by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestResponse {
    pub content_type: String,
    pub body: String,
}

impl RestResponse {
    pub fn new(content_type: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            body: body.into(),
        }
    }

    pub fn json(body: impl Into<String>) -> Self {
        Self::new(JSON_CONTENT_TYPE, body)
    }
}

// === Outbound ===

#[derive(Serialize)]
struct OutboundEnvelope<'a> {
    props: OutboundProps<'a>,
}

#[derive(Serialize)]
struct OutboundProps<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    n_val: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    allow_mult: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    last_write_wins: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    r: Option<QuorumValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rw: Option<QuorumValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    dw: Option<QuorumValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    w: Option<QuorumValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend: Option<&'a str>,
    #[serde(skip_serializing_if = "is_unset")]
    precommit: &'a HookList<CommitHook>,
    #[serde(skip_serializing_if = "is_unset")]
    postcommit: &'a HookList<NativeHook>,
}

fn is_unset<H>(list: &&HookList<H>) -> bool {
    list.is_unset()
}

/// Serialize `props` for a REST `PUT`. Absent settings are omitted;
/// cleared hook lists are sent as `[]`.
pub fn to_json(props: &BucketProperties) -> Result<String> {
    let envelope = OutboundEnvelope {
        props: OutboundProps {
            n_val: props.replication_factor,
            allow_mult: props.allow_siblings,
            last_write_wins: props.last_write_wins,
            r: props.read_quorum,
            rw: props.read_write_quorum,
            dw: props.durable_write_quorum,
            w: props.write_quorum,
            backend: props.backend.as_deref(),
            precommit: &props.pre_commit_hooks,
            postcommit: &props.post_commit_hooks,
        },
    };
    serde_json::to_string(&envelope)
        .map_err(|e| Error::Other(format!("Failed to serialize bucket properties: {}", e)))
}

// === Inbound ===

#[derive(Deserialize)]
struct InboundEnvelope {
    props: Option<InboundProps>,
}

#[derive(Deserialize)]
struct InboundProps {
    n_val: Option<u32>,
    allow_mult: Option<bool>,
    last_write_wins: Option<bool>,
    backend: Option<String>,
    r: Option<RawQuorum>,
    rw: Option<RawQuorum>,
    dw: Option<RawQuorum>,
    w: Option<RawQuorum>,
    // null reads like a missing key
    precommit: Option<Vec<serde_json::Value>>,
    postcommit: Option<Vec<serde_json::Value>>,
}

/// Quorum as found on the wire; the JSON type picks the variant
#[derive(Deserialize)]
#[serde(untagged)]
enum RawQuorum {
    Symbolic(String),
    Numeric(serde_json::Number),
}

impl RawQuorum {
    fn into_quorum(self) -> Result<QuorumValue> {
        match self {
            RawQuorum::Symbolic(token) => QuorumValue::from_symbol(&token),
            RawQuorum::Numeric(number) => {
                let n = number
                    .as_u64()
                    .and_then(|n| u32::try_from(n).ok())
                    .ok_or_else(|| Error::InvalidQuorum(format!("{} is out of range", number)))?;
                QuorumValue::from_numeric(n)
            }
        }
    }
}

fn quorum(raw: Option<RawQuorum>) -> Result<Option<QuorumValue>> {
    raw.map(RawQuorum::into_quorum).transpose()
}

/// Parse the reply of a REST `GET` on a bucket.
///
/// Hook arrays that are missing or empty leave the hook list unset.
pub fn parse_from_response(response: &RestResponse) -> Result<BucketProperties> {
    let essence = media_type_essence(&response.content_type);
    if essence != JSON_CONTENT_TYPE {
        return Err(Error::UnexpectedContentType {
            expected: JSON_CONTENT_TYPE.to_string(),
            actual: response.content_type.clone(),
        });
    }

    let envelope: InboundEnvelope = serde_json::from_str(&response.body)?;
    let props = envelope
        .props
        .ok_or_else(|| Error::MalformedResponse("missing \"props\" object".into()))?;

    let pre_commit_hooks = props
        .precommit
        .unwrap_or_default()
        .iter()
        .map(CommitHook::from_record)
        .collect::<Result<Vec<_>>>()?;
    let post_commit_hooks = props
        .postcommit
        .unwrap_or_default()
        .iter()
        .map(NativeHook::from_record)
        .collect::<Result<Vec<_>>>()?;

    Ok(BucketProperties {
        last_write_wins: props.last_write_wins,
        replication_factor: props.n_val,
        allow_siblings: props.allow_mult,
        backend: props.backend,
        read_quorum: quorum(props.r)?,
        read_write_quorum: quorum(props.rw)?,
        durable_write_quorum: quorum(props.dw)?,
        write_quorum: quorum(props.w)?,
        pre_commit_hooks: HookList::from(pre_commit_hooks),
        post_commit_hooks: HookList::from(post_commit_hooks),
    })
}
