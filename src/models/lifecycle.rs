//! Commands, lifecycle phases and the raw keys that name them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level operation being orchestrated
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Command {
    Deploy,
    Remove,
}

impl Command {
    pub const ALL: [Command; 2] = [Command::Deploy, Command::Remove];

    pub fn as_str(&self) -> &'static str {
        match self {
            Command::Deploy => "deploy",
            Command::Remove => "remove",
        }
    }

    /// Capitalised form used inside raw lifecycle keys (`beforeDeploy`)
    fn key_suffix(&self) -> &'static str {
        match self {
            Command::Deploy => "Deploy",
            Command::Remove => "Remove",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Command {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "deploy" => Ok(Command::Deploy),
            "remove" => Ok(Command::Remove),
            other => Err(format!("unknown command: {other}")),
        }
    }
}

/// Position of a hook relative to its command
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Before,
    After,
}

impl Phase {
    pub const ALL: [Phase; 2] = [Phase::Before, Phase::After];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Before => "before",
            Phase::After => "after",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A raw lifecycle key such as `beforeDeploy`, decomposed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LifecycleKey {
    pub command: Command,
    pub phase: Phase,
}

impl LifecycleKey {
    pub fn new(command: Command, phase: Phase) -> Self {
        Self { command, phase }
    }

    /// Every recognised lifecycle key
    pub fn all() -> impl Iterator<Item = LifecycleKey> {
        Command::ALL
            .into_iter()
            .flat_map(|command| Phase::ALL.into_iter().map(move |phase| Self::new(command, phase)))
    }

    /// Parse a raw configuration key; `None` when the key is not a lifecycle key
    pub fn parse(key: &str) -> Option<Self> {
        Self::all().find(|candidate| candidate.to_string() == key)
    }
}

impl fmt::Display for LifecycleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.phase.as_str(), self.command.key_suffix())
    }
}
