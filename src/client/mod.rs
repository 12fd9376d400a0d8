//! Bucket properties client
//!
//! Writes go over the compact protocol whenever the properties fit in a
//! compact record and touch no hook list, and over REST otherwise. Reads use REST only when every
//! setting is wanted.

pub mod pbc;
pub mod rest;

pub use pbc::PbcClient;
pub use rest::RestClient;

use crate::codec::compact::{to_compact_record, CompactRecord};
use crate::codec::rest::to_json;
use crate::common::{ClientConfig, Error, Result};
use crate::props::{BucketProperties, Protocol};

/// Payload chosen for a property write
#[derive(Debug, Clone, PartialEq)]
pub enum WriteRequest {
    Compact(CompactRecord),
    Rich(String),
}

impl WriteRequest {
    pub fn protocol(&self) -> Protocol {
        match self {
            WriteRequest::Compact(_) => Protocol::Compact,
            WriteRequest::Rich(_) => Protocol::Rich,
        }
    }
}

/// Protocol a write of `props` goes over.
///
/// The compact record has no hook fields, so a set or cleared hook list
/// sends the write over the rich protocol even when the selector allows
/// the compact one.
pub fn write_protocol(props: &BucketProperties) -> Protocol {
    let touches_hooks =
        !props.pre_commit_hooks().is_unset() || !props.post_commit_hooks().is_unset();
    if touches_hooks {
        Protocol::Rich
    } else {
        props.protocol()
    }
}

/// Pick the protocol for `props` and build its payload, without any I/O
pub fn plan_set(props: &BucketProperties) -> Result<WriteRequest> {
    match write_protocol(props) {
        Protocol::Compact => Ok(WriteRequest::Compact(to_compact_record(props))),
        Protocol::Rich => Ok(WriteRequest::Rich(to_json(props)?)),
    }
}

pub struct BucketClient {
    config: ClientConfig,
    rest: RestClient,
    // Connected on first compact request
    pbc: Option<PbcClient>,
}

impl BucketClient {
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let rest = RestClient::from_config(&config)?;
        Ok(Self {
            config,
            rest,
            pbc: None,
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Apply `props` to `bucket`, returning the protocol that was used
    pub async fn set_bucket_properties(
        &mut self,
        bucket: &str,
        props: &BucketProperties,
    ) -> Result<Protocol> {
        let protocol = write_protocol(props);
        tracing::debug!("Setting properties of {} over {} protocol", bucket, protocol.as_str());

        match protocol {
            Protocol::Compact => {
                let result = self.pbc().await?.set_bucket_properties(bucket, props).await;
                self.drop_broken_connection(&result);
                result?;
            }
            Protocol::Rich => self.rest.set_bucket_properties(bucket, props).await?,
        }
        Ok(protocol)
    }

    /// Read the properties of `bucket`.
    ///
    /// With `extended` every setting is fetched over REST; otherwise only
    /// `n_val` and `allow_mult` are fetched over the compact protocol.
    pub async fn get_bucket_properties(
        &mut self,
        bucket: &str,
        extended: bool,
    ) -> Result<BucketProperties> {
        if extended {
            return self.rest.get_bucket_properties(bucket).await;
        }
        let result = self.pbc().await?.get_bucket_properties(bucket).await;
        self.drop_broken_connection(&result);
        result
    }

    async fn pbc(&mut self) -> Result<&mut PbcClient> {
        if self.pbc.is_none() {
            self.pbc = Some(PbcClient::from_config(&self.config).await?);
        }
        self.pbc
            .as_mut()
            .ok_or_else(|| Error::Other("compact connection unavailable".into()))
    }

    // The stream may hold half a frame after these; reconnect next time.
    fn drop_broken_connection<T>(&mut self, result: &Result<T>) {
        if let Err(e) = result {
            if matches!(e, Error::Io(_) | Error::Protocol(_) | Error::Timeout(_)) {
                tracing::warn!("Dropping compact connection: {}", e);
                self.pbc = None;
            }
        }
    }
}
