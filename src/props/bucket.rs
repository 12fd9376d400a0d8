//! Bucket properties
//!
//! [`BucketProperties`] describes a *delta*: every setting is optional and
//! an absent setting is left unchanged by the server. Instances are built
//! empty and filled through the setters, or produced by the codecs from a
//! server reply.

use serde::{Serialize, Serializer};

use super::hook::{CommitHook, NativeHook};
use super::quorum::QuorumValue;
use crate::common::{Error, Result};

/// Wire protocol able to carry a set of bucket properties
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    /// Binary frames; only `n_val` and `allow_mult`
    Compact,
    /// REST/JSON; every setting
    Rich,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Compact => "compact",
            Protocol::Rich => "rich",
        }
    }
}

/// Commit hook list with an explicit "never touched" state.
///
/// `Unset` is not sent at all (hooks stay as they are on the server),
/// `Cleared` is sent as `[]` (all hooks removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookList<H> {
    Unset,
    Cleared,
    Hooks(Vec<H>),
}

impl<H> Default for HookList<H> {
    fn default() -> Self {
        HookList::Unset
    }
}

impl<H> HookList<H> {
    pub fn is_unset(&self) -> bool {
        matches!(self, HookList::Unset)
    }

    /// `None` when unset, otherwise the (possibly empty) hooks in order
    pub fn as_slice(&self) -> Option<&[H]> {
        match self {
            HookList::Unset => None,
            HookList::Cleared => Some(&[]),
            HookList::Hooks(hooks) => Some(hooks),
        }
    }

    pub fn push(&mut self, hook: H) {
        match self {
            HookList::Hooks(hooks) => hooks.push(hook),
            HookList::Unset | HookList::Cleared => *self = HookList::Hooks(vec![hook]),
        }
    }

    pub fn clear(&mut self) {
        *self = HookList::Cleared;
    }
}

/// A non-empty wire list becomes `Hooks`, an empty one stays `Unset`
impl<H> From<Vec<H>> for HookList<H> {
    fn from(hooks: Vec<H>) -> Self {
        if hooks.is_empty() {
            HookList::Unset
        } else {
            HookList::Hooks(hooks)
        }
    }
}

impl<H: Serialize> Serialize for HookList<H> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.as_slice().unwrap_or_default().serialize(serializer)
    }
}

/// Per-bucket storage and consistency settings
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketProperties {
    pub(crate) last_write_wins: Option<bool>,
    pub(crate) replication_factor: Option<u32>,
    pub(crate) allow_siblings: Option<bool>,
    pub(crate) backend: Option<String>,
    pub(crate) read_quorum: Option<QuorumValue>,
    pub(crate) read_write_quorum: Option<QuorumValue>,
    pub(crate) durable_write_quorum: Option<QuorumValue>,
    pub(crate) write_quorum: Option<QuorumValue>,
    pub(crate) pre_commit_hooks: HookList<CommitHook>,
    pub(crate) post_commit_hooks: HookList<NativeHook>,
}

fn quorum<Q>(value: Q) -> Result<QuorumValue>
where
    Q: TryInto<QuorumValue>,
    Error: From<Q::Error>,
{
    Ok(value.try_into()?)
}

impl BucketProperties {
    /// Empty delta: nothing will be changed
    pub fn new() -> Self {
        Self::default()
    }

    // === Setters ===

    pub fn set_last_write_wins(&mut self, value: bool) -> &mut Self {
        self.last_write_wins = Some(value);
        self
    }

    /// Number of replicas (`n_val`)
    pub fn set_replication_factor(&mut self, value: u32) -> &mut Self {
        self.replication_factor = Some(value);
        self
    }

    /// Keep conflicting writes as siblings (`allow_mult`)
    pub fn set_allow_siblings(&mut self, value: bool) -> &mut Self {
        self.allow_siblings = Some(value);
        self
    }

    pub fn set_backend(&mut self, backend: impl Into<String>) -> &mut Self {
        self.backend = Some(backend.into());
        self
    }

    /// Accepts a replica count (`2u32`), a token (`"quorum"`) or a
    /// [`QuorumPolicy`](super::QuorumPolicy). Leaves `self` untouched on error.
    pub fn set_read_quorum<Q>(&mut self, value: Q) -> Result<&mut Self>
    where
        Q: TryInto<QuorumValue>,
        Error: From<Q::Error>,
    {
        self.read_quorum = Some(quorum(value)?);
        Ok(self)
    }

    pub fn set_read_write_quorum<Q>(&mut self, value: Q) -> Result<&mut Self>
    where
        Q: TryInto<QuorumValue>,
        Error: From<Q::Error>,
    {
        self.read_write_quorum = Some(quorum(value)?);
        Ok(self)
    }

    pub fn set_durable_write_quorum<Q>(&mut self, value: Q) -> Result<&mut Self>
    where
        Q: TryInto<QuorumValue>,
        Error: From<Q::Error>,
    {
        self.durable_write_quorum = Some(quorum(value)?);
        Ok(self)
    }

    pub fn set_write_quorum<Q>(&mut self, value: Q) -> Result<&mut Self>
    where
        Q: TryInto<QuorumValue>,
        Error: From<Q::Error>,
    {
        self.write_quorum = Some(quorum(value)?);
        Ok(self)
    }

    pub fn add_pre_commit_hook(&mut self, hook: impl Into<CommitHook>) -> &mut Self {
        self.pre_commit_hooks.push(hook.into());
        self
    }

    /// Post-commit hooks can only be native functions.
    pub fn add_post_commit_hook(&mut self, hook: NativeHook) -> &mut Self {
        self.post_commit_hooks.push(hook);
        self
    }

    /// Remove every pre-commit hook on the server (sent as `[]`)
    pub fn clear_pre_commit_hooks(&mut self) -> &mut Self {
        self.pre_commit_hooks.clear();
        self
    }

    /// Remove every post-commit hook on the server (sent as `[]`)
    pub fn clear_post_commit_hooks(&mut self) -> &mut Self {
        self.post_commit_hooks.clear();
        self
    }

    // === Accessors ===

    pub fn last_write_wins(&self) -> Option<bool> {
        self.last_write_wins
    }

    pub fn replication_factor(&self) -> Option<u32> {
        self.replication_factor
    }

    pub fn allow_siblings(&self) -> Option<bool> {
        self.allow_siblings
    }

    pub fn backend(&self) -> Option<&str> {
        self.backend.as_deref()
    }

    pub fn read_quorum(&self) -> Option<QuorumValue> {
        self.read_quorum
    }

    pub fn read_write_quorum(&self) -> Option<QuorumValue> {
        self.read_write_quorum
    }

    pub fn durable_write_quorum(&self) -> Option<QuorumValue> {
        self.durable_write_quorum
    }

    pub fn write_quorum(&self) -> Option<QuorumValue> {
        self.write_quorum
    }

    pub fn pre_commit_hooks(&self) -> &HookList<CommitHook> {
        &self.pre_commit_hooks
    }

    pub fn post_commit_hooks(&self) -> &HookList<NativeHook> {
        &self.post_commit_hooks
    }

    // === Protocol selection ===

    /// Can the compact protocol carry these properties?
    ///
    /// The compact record only has `n_val` and `allow_mult`; any of
    /// `last_write_wins`, a quorum or `backend` needs the rich protocol.
    pub fn can_use_compact_protocol(&self) -> bool {
        self.last_write_wins.is_none()
            && self.read_quorum.is_none()
            && self.read_write_quorum.is_none()
            && self.durable_write_quorum.is_none()
            && self.write_quorum.is_none()
            && self.backend.is_none()
    }

    pub fn protocol(&self) -> Protocol {
        if self.can_use_compact_protocol() {
            Protocol::Compact
        } else {
            Protocol::Rich
        }
    }
}

/// Free-function form of [`BucketProperties::can_use_compact_protocol`]
pub fn can_use_compact_protocol(props: &BucketProperties) -> bool {
    props.can_use_compact_protocol()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::{QuorumPolicy, ScriptHook};

    #[test]
    fn test_empty_backend_needs_rich_protocol() {
        let mut props = BucketProperties::new();
        props.set_backend("");
        assert!(!props.can_use_compact_protocol());
    }

    #[test]
    fn test_new_is_empty() {
        let props = BucketProperties::new();
        assert_eq!(props.replication_factor(), None);
        assert_eq!(props.backend(), None);
        assert!(props.pre_commit_hooks().is_unset());
        assert!(props.post_commit_hooks().is_unset());
        assert!(props.can_use_compact_protocol());
    }

    #[test]
    fn test_chained_setters() {
        let mut props = BucketProperties::new();
        props
            .set_replication_factor(3)
            .set_allow_siblings(true)
            .set_backend("leveldb")
            .set_last_write_wins(false);
        props
            .set_read_quorum(2u32)
            .unwrap()
            .set_write_quorum("quorum")
            .unwrap()
            .set_durable_write_quorum(QuorumPolicy::One)
            .unwrap();

        assert_eq!(props.replication_factor(), Some(3));
        assert_eq!(props.allow_siblings(), Some(true));
        assert_eq!(props.backend(), Some("leveldb"));
        assert_eq!(props.last_write_wins(), Some(false));
        assert_eq!(props.read_quorum().and_then(|q| q.as_numeric()), Some(2));
        assert_eq!(
            props.write_quorum(),
            Some(QuorumValue::Symbolic(QuorumPolicy::Quorum))
        );
        assert_eq!(
            props.durable_write_quorum(),
            Some(QuorumValue::Symbolic(QuorumPolicy::One))
        );
        assert_eq!(props.read_write_quorum(), None);
    }

    #[test]
    fn test_overwrite() {
        let mut props = BucketProperties::new();
        props.set_replication_factor(3).set_replication_factor(5);
        assert_eq!(props.replication_factor(), Some(5));
    }

    #[test]
    fn test_invalid_quorum_leaves_props_unchanged() {
        let mut props = BucketProperties::new();
        props.set_read_quorum(2u32).unwrap();
        let before = props.clone();

        assert!(matches!(
            props.set_read_quorum(0u32),
            Err(Error::InvalidQuorum(_))
        ));
        assert!(matches!(
            props.set_read_write_quorum("most"),
            Err(Error::InvalidQuorum(_))
        ));
        assert_eq!(props, before);
    }

    #[test]
    fn test_hooks_keep_order_and_duplicates() {
        let mut props = BucketProperties::new();
        props
            .add_pre_commit_hook(ScriptHook::new("validate_json"))
            .add_pre_commit_hook(NativeHook::new("audit", "check"))
            .add_pre_commit_hook(ScriptHook::new("validate_json"));

        let hooks = props.pre_commit_hooks().as_slice().unwrap();
        assert_eq!(hooks.len(), 3);
        assert_eq!(hooks[0], hooks[2]);
        assert_eq!(hooks[1], CommitHook::Native(NativeHook::new("audit", "check")));
    }

    #[test]
    fn test_hook_list_states() {
        let mut list: HookList<NativeHook> = HookList::default();
        assert_eq!(list.as_slice(), None);

        list.clear();
        assert_eq!(list, HookList::Cleared);
        assert_eq!(list.as_slice(), Some(&[][..]));

        list.push(NativeHook::new("m", "f"));
        assert_eq!(list.as_slice().map(|h| h.len()), Some(1));

        list.clear();
        assert_eq!(list, HookList::Cleared);
    }

    #[test]
    fn test_clear_is_not_unset() {
        let mut props = BucketProperties::new();
        props.clear_pre_commit_hooks();
        assert!(!props.pre_commit_hooks().is_unset());
        assert!(props.post_commit_hooks().is_unset());

        props.clear_post_commit_hooks();
        assert_eq!(props.post_commit_hooks(), &HookList::Cleared);
    }

    #[test]
    fn test_compact_protocol_selection() {
        let mut props = BucketProperties::new();
        props.set_replication_factor(3).set_allow_siblings(true);
        props.add_pre_commit_hook(ScriptHook::new("validate_json"));
        assert!(props.can_use_compact_protocol());
        assert_eq!(props.protocol(), Protocol::Compact);

        let mut variants = Vec::new();
        for i in 0..6 {
            let mut p = props.clone();
            match i {
                0 => {
                    p.set_last_write_wins(true);
                }
                1 => {
                    p.set_backend("bitcask");
                }
                2 => {
                    p.set_read_quorum(1u32).unwrap();
                }
                3 => {
                    p.set_read_write_quorum("all").unwrap();
                }
                4 => {
                    p.set_durable_write_quorum(2u32).unwrap();
                }
                _ => {
                    p.set_write_quorum("quorum").unwrap();
                }
            }
            variants.push(p);
        }
        for p in variants {
            assert!(!can_use_compact_protocol(&p), "{:?}", p);
            assert_eq!(p.protocol(), Protocol::Rich);
        }
    }
}
