/// Validation failures for constraint records. Returned synchronously from
/// `append_constraint`; malformed records are never coerced.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConstraintError {
    #[error("constraint {id:?} is missing required field `{field}`")]
    MissingField { id: String, field: &'static str },

    #[error("constraint {id}: invalid priority {value:?} (expected hard or soft)")]
    InvalidPriority { id: String, value: String },

    #[error(
        "constraint {id}: invalid constraint_type {value:?} \
         (expected requires, recommends, prohibits or conflicts_with)"
    )]
    InvalidConstraintType { id: String, value: String },

    #[error("constraint {id} already declared in this session")]
    DuplicateId { id: String },

    #[error("constraint {id}: impacts contains an empty identifier")]
    EmptyImpact { id: String },
}
