//! Pre/post-commit hook descriptors
//!
//! A hook is registered either by script name (`{"name": ...}`) or by a
//! native module/function pair (`{"mod": ..., "fun": ...}`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::common::{Error, Result};

/// Hook implemented by a named, registered script
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ScriptHook {
    pub name: String,
}

impl ScriptHook {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Hook implemented by a function in the store's native runtime
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NativeHook {
    #[serde(rename = "mod")]
    pub module: String,
    #[serde(rename = "fun")]
    pub function: String,
}

impl NativeHook {
    pub fn new(module: impl Into<String>, function: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            function: function.into(),
        }
    }

    /// Decode a record that can only hold a native hook.
    pub fn from_record(record: &serde_json::Value) -> Result<Self> {
        let raw = RawHook::from_record(record)?;
        raw.into_native()
    }
}

/// Parses `module:function`
impl FromStr for NativeHook {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once(':') {
            Some((module, function)) if !module.is_empty() && !function.is_empty() => {
                Ok(NativeHook::new(module, function))
            }
            _ => Err(Error::MalformedHook(format!(
                "expected module:function, got {:?}",
                s
            ))),
        }
    }
}

impl fmt::Display for NativeHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.function)
    }
}

/// Any commit hook. Post-commit lists only hold [`NativeHook`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum CommitHook {
    Script(ScriptHook),
    Native(NativeHook),
}

impl CommitHook {
    /// Decode a hook record, trying the script form first and falling back
    /// to the native form.
    pub fn from_record(record: &serde_json::Value) -> Result<Self> {
        RawHook::from_record(record)?.into_commit_hook()
    }
}

/// `module:function` is a native hook, anything else a script name
impl FromStr for CommitHook {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::MalformedHook("empty hook".into()));
        }
        if s.contains(':') {
            s.parse().map(CommitHook::Native)
        } else {
            Ok(CommitHook::Script(ScriptHook::new(s)))
        }
    }
}

impl fmt::Display for CommitHook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommitHook::Script(hook) => f.write_str(&hook.name),
            CommitHook::Native(hook) => write!(f, "{}", hook),
        }
    }
}

impl From<ScriptHook> for CommitHook {
    fn from(hook: ScriptHook) -> Self {
        CommitHook::Script(hook)
    }
}

impl From<NativeHook> for CommitHook {
    fn from(hook: NativeHook) -> Self {
        CommitHook::Native(hook)
    }
}

/// Hook record as found on the wire, before a variant is chosen
#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawHook {
    name: Option<String>,
    #[serde(rename = "mod")]
    module: Option<String>,
    fun: Option<String>,
}

impl RawHook {
    fn from_record(record: &serde_json::Value) -> Result<Self> {
        if !record.is_object() {
            return Err(Error::MalformedHook(format!(
                "hook must be an object, got {}",
                record
            )));
        }
        serde_json::from_value(record.clone())
            .map_err(|e| Error::MalformedHook(format!("{}: {}", e, record)))
    }

    pub(crate) fn into_commit_hook(self) -> Result<CommitHook> {
        match self.name {
            Some(name) => Ok(CommitHook::Script(ScriptHook { name })),
            None => self.into_native().map(CommitHook::Native),
        }
    }

    pub(crate) fn into_native(self) -> Result<NativeHook> {
        match (self.module, self.fun) {
            (Some(module), Some(function)) => Ok(NativeHook { module, function }),
            (None, _) => Err(Error::MalformedHook("missing \"mod\" key".into())),
            (_, None) => Err(Error::MalformedHook("missing \"fun\" key".into())),
        }
    }
}
