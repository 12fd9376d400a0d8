//! # bucketprops
//!
//! Client-side bucket properties for a distributed key-value store:
//! - Replication (`n_val`), sibling handling (`allow_mult`), last-write-wins
//! - Read/write quorums as replica counts or symbolic policies
//! - Pre- and post-commit hook registrations
//!
//! ## Protocols
//!
//! ```text
//!            BucketProperties
//!                   │
//!      can_use_compact_protocol()?
//!          │                 │
//!         yes                no
//!          │                 │
//! ┌────────▼────────┐ ┌──────▼──────────────┐
//! │ Compact (PBC)   │ │ Rich (REST/JSON)    │
//! │ n_val,          │ │ every setting,      │
//! │ allow_mult only │ │ hooks and quorums   │
//! └─────────────────┘ └─────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```
//! use bucketprops::{BucketProperties, NativeHook, ScriptHook};
//!
//! let mut props = BucketProperties::new();
//! props
//!     .set_replication_factor(3)
//!     .set_allow_siblings(true)
//!     .add_pre_commit_hook(ScriptHook::new("validate_json"))
//!     .add_post_commit_hook(NativeHook::new("audit", "log"));
//! assert!(props.can_use_compact_protocol());
//!
//! props.set_write_quorum("quorum").unwrap();
//! assert!(!props.can_use_compact_protocol());
//!
//! let json = bucketprops::codec::to_json(&props).unwrap();
//! assert!(json.contains(r#""w":"quorum""#));
//! ```
//!
//! ### CLI
//! ```bash
//! bucketprops get users --extended
//! bucketprops set users --n-val 3 --allow-mult true
//! bucketprops set users --w quorum --precommit validate_json --dry-run
//! ```

pub mod client;
pub mod codec;
pub mod common;
pub mod props;

// Re-export commonly used types
pub use client::BucketClient;
pub use common::{ClientConfig, Error, Result};
pub use props::{
    BucketProperties, CommitHook, HookList, NativeHook, Protocol, QuorumPolicy, QuorumValue,
    ScriptHook,
};

/// Current version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build info
pub const BUILD_INFO: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CARGO_PKG_NAME"), ")");
