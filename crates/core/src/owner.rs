//! Owner references for tasks and uploaded files.
//!
//! A task (or an uploaded file) belongs to exactly one entity out of a closed
//! set of kinds. The reference is stored as an `(owner_kind, owner_id)` column
//! pair and resolved through [`OwnerKind::ALL`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Kinds of entity a task or file can be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    Scenario,
    Area,
    Solar,
    Settings,
    UploadedFile,
}

impl OwnerKind {
    /// Lookup table of every kind and its stored name.
    pub const ALL: [(Self, &'static str); 5] = [
        (Self::Scenario, "scenario"),
        (Self::Area, "area"),
        (Self::Solar, "solar"),
        (Self::Settings, "settings"),
        (Self::UploadedFile, "uploaded_file"),
    ];

    /// Name stored in the `owner_kind` column.
    pub fn as_str(self) -> &'static str {
        Self::ALL
            .iter()
            .find(|(kind, _)| *kind == self)
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }

    /// Table holding rows of this kind.
    pub fn table(self) -> &'static str {
        match self {
            Self::Scenario => "scenarios",
            Self::Area => "areas",
            Self::Solar => "solar",
            Self::Settings => "settings",
            Self::UploadedFile => "uploaded_files",
        }
    }
}

impl FromStr for OwnerKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .find(|(_, name)| *name == s)
            .map(|(kind, _)| *kind)
            .ok_or_else(|| CoreError::Validation(format!("Unknown owner kind '{s}'")))
    }
}

impl fmt::Display for OwnerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved owner reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum TaskOwner {
    Scenario(Uuid),
    Area(Uuid),
    Solar(Uuid),
    Settings(Uuid),
    UploadedFile(Uuid),
}

impl TaskOwner {
    /// Build an owner from its stored column pair.
    pub fn from_parts(kind: &str, id: Uuid) -> Result<Self, CoreError> {
        Ok(Self::new(kind.parse()?, id))
    }

    pub fn new(kind: OwnerKind, id: Uuid) -> Self {
        match kind {
            OwnerKind::Scenario => Self::Scenario(id),
            OwnerKind::Area => Self::Area(id),
            OwnerKind::Solar => Self::Solar(id),
            OwnerKind::Settings => Self::Settings(id),
            OwnerKind::UploadedFile => Self::UploadedFile(id),
        }
    }

    pub fn kind(&self) -> OwnerKind {
        match self {
            Self::Scenario(_) => OwnerKind::Scenario,
            Self::Area(_) => OwnerKind::Area,
            Self::Solar(_) => OwnerKind::Solar,
            Self::Settings(_) => OwnerKind::Settings,
            Self::UploadedFile(_) => OwnerKind::UploadedFile,
        }
    }

    pub fn id(&self) -> Uuid {
        match *self {
            Self::Scenario(id)
            | Self::Area(id)
            | Self::Solar(id)
            | Self::Settings(id)
            | Self::UploadedFile(id) => id,
        }
    }

    /// The same owner with its id replaced.
    pub fn with_id(&self, id: Uuid) -> Self {
        Self::new(self.kind(), id)
    }
}
