//! Bucket property model: quorums, commit hooks and the property set

pub mod bucket;
pub mod hook;
pub mod quorum;

pub use bucket::{can_use_compact_protocol, BucketProperties, HookList, Protocol};
pub use hook::{CommitHook, NativeHook, ScriptHook};
pub use quorum::{QuorumPolicy, QuorumValue};
