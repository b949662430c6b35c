use super::{BelongsTo, Cardinality, HasMany};
use crate::Codec;

#[derive(Debug, Clone)]
pub struct Field {
    /// The field name
    pub name: FieldName,

    /// Attribute, to-one relation or to-many relation
    pub ty: FieldTy,
}

#[derive(Debug, Clone)]
pub struct FieldName {
    /// Name used by application code.
    pub app_name: String,

    /// Name used on the wire when it differs: the serialized attribute name or
    /// the relationship key.
    pub wire_name: Option<String>,
}

impl FieldName {
    pub fn wire_name(&self) -> &str {
        self.wire_name.as_ref().unwrap_or(&self.app_name)
    }
}

#[derive(Debug, Clone)]
pub enum FieldTy {
    Attribute(Attribute),
    BelongsTo(BelongsTo),
    HasMany(HasMany),
}

#[derive(Debug, Clone, Default)]
pub struct Attribute {
    /// How the value travels on the wire.
    pub codec: Codec,
}

impl Field {
    fn new(name: impl Into<String>, ty: impl Into<FieldTy>) -> Field {
        Field {
            name: FieldName {
                app_name: name.into(),
                wire_name: None,
            },
            ty: ty.into(),
        }
    }

    /// A passthrough attribute.
    pub fn attribute(name: impl Into<String>) -> Field {
        Field::new(name, Attribute::default())
    }

    /// A date attribute.
    pub fn date(name: impl Into<String>) -> Field {
        Field::new(
            name,
            Attribute {
                codec: Codec::Date,
            },
        )
    }

    pub fn belongs_to(name: impl Into<String>, target: impl Into<String>) -> Field {
        Field::new(
            name,
            BelongsTo {
                target: target.into(),
            },
        )
    }

    pub fn has_many(name: impl Into<String>, target: impl Into<String>) -> Field {
        Field::new(
            name,
            HasMany {
                target: target.into(),
            },
        )
    }

    /// Sets the name used on the wire.
    pub fn wire_name(mut self, wire_name: impl Into<String>) -> Field {
        self.name.wire_name = Some(wire_name.into());
        self
    }

    pub fn is_relation(&self) -> bool {
        self.ty.is_relation()
    }

    pub fn codec(&self) -> Option<Codec> {
        match &self.ty {
            FieldTy::Attribute(attribute) => Some(attribute.codec),
            _ => None,
        }
    }

    pub fn cardinality(&self) -> Option<Cardinality> {
        match &self.ty {
            FieldTy::Attribute(_) => None,
            FieldTy::BelongsTo(_) => Some(Cardinality::One),
            FieldTy::HasMany(_) => Some(Cardinality::Many),
        }
    }

    /// If the field is a relation, the resource type it points at.
    pub fn relation_target(&self) -> Option<&str> {
        match &self.ty {
            FieldTy::Attribute(_) => None,
            FieldTy::BelongsTo(belongs_to) => Some(&belongs_to.target),
            FieldTy::HasMany(has_many) => Some(&has_many.target),
        }
    }
}

impl FieldTy {
    pub fn is_relation(&self) -> bool {
        matches!(self, FieldTy::BelongsTo(_) | FieldTy::HasMany(_))
    }
}

impl From<Attribute> for FieldTy {
    fn from(value: Attribute) -> Self {
        Self::Attribute(value)
    }
}
