//! Types for the holder registry.

/// Classification of a described party.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectKind {
    /// Natural person.
    Person,
    /// Legal entity, resident or not.
    Organization,
    /// State, region, municipality or one of their bodies.
    PublicBody,
    /// Groups without a single name: unit holders, bond holders, apartment owners.
    Collective,
    /// Restriction that names no party (public servitude, undefined circle of persons).
    Unnamed,
}

/// A described party.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subject {
    pub kind: SubjectKind,
    /// Display name; for [`SubjectKind::Unnamed`] the restriction text itself.
    pub name: String,
}

impl Subject {
    #[must_use]
    pub fn new(kind: SubjectKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
        }
    }

    /// Whether the subject names a beneficiary.
    #[must_use]
    pub fn is_named(&self) -> bool {
        self.kind != SubjectKind::Unnamed
    }
}
