use super::FieldTy;

/// A to-one relation.
#[derive(Debug, Clone)]
pub struct BelongsTo {
    /// Resource type of the related model
    pub target: String,
}

/// A to-many relation.
#[derive(Debug, Clone)]
pub struct HasMany {
    /// Resource type of the related models
    pub target: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

impl From<BelongsTo> for FieldTy {
    fn from(value: BelongsTo) -> Self {
        Self::BelongsTo(value)
    }
}

impl From<HasMany> for FieldTy {
    fn from(value: HasMany) -> Self {
        Self::HasMany(value)
    }
}
