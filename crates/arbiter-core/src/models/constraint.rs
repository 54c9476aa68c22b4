use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ConstraintError;

/// Kind of statement a constraint makes about its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConstraintType {
    Requires,
    Recommends,
    Prohibits,
    ConflictsWith,
}

impl ConstraintType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Requires => "requires",
            Self::Recommends => "recommends",
            Self::Prohibits => "prohibits",
            Self::ConflictsWith => "conflicts_with",
        }
    }

    /// Strict parse; no case folding or aliasing.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "requires" => Some(Self::Requires),
            "recommends" => Some(Self::Recommends),
            "prohibits" => Some(Self::Prohibits),
            "conflicts_with" => Some(Self::ConflictsWith),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Constraint strength. Hard beats soft during resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Hard,
    Soft,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hard => "hard",
            Self::Soft => "soft",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "hard" => Some(Self::Hard),
            "soft" => Some(Self::Soft),
            _ => None,
        }
    }

    pub fn is_hard(self) -> bool {
        self == Self::Hard
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A declarative statement contributed by an analysis stage. Never mutated
/// once appended to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub id: String,
    pub source: String,
    pub constraint_type: ConstraintType,
    pub target: String,
    pub value: String,
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impacts: Option<Vec<String>>,
}

impl Constraint {
    pub fn new(
        id: impl Into<String>,
        source: impl Into<String>,
        constraint_type: ConstraintType,
        target: impl Into<String>,
        value: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            constraint_type,
            target: target.into(),
            value: value.into(),
            priority,
            impacts: None,
        }
    }

    pub fn with_impacts(mut self, impacts: Vec<String>) -> Self {
        self.impacts = Some(impacts);
        self
    }

    /// Field-level validation. Enum fields are valid by construction.
    pub fn validate(&self) -> Result<(), ConstraintError> {
        for (field, value) in [
            ("id", &self.id),
            ("source", &self.source),
            ("target", &self.target),
            ("value", &self.value),
        ] {
            if value.trim().is_empty() {
                return Err(ConstraintError::MissingField {
                    id: self.id.clone(),
                    field,
                });
            }
        }
        if let Some(impacts) = &self.impacts {
            if impacts.iter().any(|i| i.trim().is_empty()) {
                return Err(ConstraintError::EmptyImpact {
                    id: self.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Untyped wire form of a constraint as emitted by external analysis stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawConstraint {
    pub id: String,
    pub source: String,
    pub constraint_type: String,
    pub target: String,
    pub value: String,
    pub priority: String,
    pub impacts: Option<Vec<String>>,
}

impl TryFrom<RawConstraint> for Constraint {
    type Error = ConstraintError;

    fn try_from(raw: RawConstraint) -> Result<Self, Self::Error> {
        let priority =
            Priority::parse(&raw.priority).ok_or_else(|| ConstraintError::InvalidPriority {
                id: raw.id.clone(),
                value: raw.priority.clone(),
            })?;
        let constraint_type = ConstraintType::parse(&raw.constraint_type).ok_or_else(|| {
            ConstraintError::InvalidConstraintType {
                id: raw.id.clone(),
                value: raw.constraint_type.clone(),
            }
        })?;
        let constraint = Constraint {
            id: raw.id,
            source: raw.source,
            constraint_type,
            target: raw.target,
            value: raw.value,
            priority,
            impacts: raw.impacts,
        };
        constraint.validate()?;
        Ok(constraint)
    }
}
