//! Transient records produced by the adapters and consumed by the
//! ownership and encumbrance normalizers.
//!
//! The same shapes are built from every schema generation (current extract
//! sub-tree, legacy GKN sub-tree, modern EGRN records), which is what lets
//! the normalizers stay schema-agnostic.

use std::fmt;

use serde::Serialize;

use crate::config::{JOINT_OWNERSHIP_CODE, PROPORTIONAL_SHARE_STEM, SHARED_OWNERSHIP_CODE};

/// How a right distributes ownership among its holders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RightKind {
    /// Fractional (shared) ownership.
    Shared,
    /// Joint ownership without shares.
    Joint,
    /// Any other right: sole ownership, lease, trust management, ...
    Other,
}

impl RightKind {
    /// Classify a registry right type code.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code.trim() {
            SHARED_OWNERSHIP_CODE => Self::Shared,
            JOINT_OWNERSHIP_CODE => Self::Joint,
            _ => Self::Other,
        }
    }

    /// Classify a right by its label, for records that carry no code.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let lower = label.to_lowercase();
        if lower.contains("долев") {
            Self::Shared
        } else if lower.contains("совмест") {
            Self::Joint
        } else {
            Self::Other
        }
    }
}

/// A holder's share in shared ownership.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Share {
    /// `numerator/denominator`.
    Fraction { numerator: u64, denominator: u64 },
    /// Anything else the registry wrote, e.g. a share in hectares.
    Text(String),
}

impl Share {
    /// Parse a free-text share.
    ///
    /// Proportional shares ("пропорционально размеру ...") carry no usable
    /// value and yield `None`, as does empty text.
    ///
    /// # Examples
    /// ```
    /// use egrn_extractor::rights::Share;
    ///
    /// assert_eq!(
    ///     Share::parse("1/2"),
    ///     Some(Share::Fraction { numerator: 1, denominator: 2 })
    /// );
    /// assert_eq!(Share::parse("5,2 га"), Some(Share::Text("5,2 га".to_string())));
    /// assert_eq!(Share::parse("пропорционально размеру общей площади"), None);
    /// ```
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() || text.to_lowercase().contains(PROPORTIONAL_SHARE_STEM) {
            return None;
        }

        if let Some((numerator, denominator)) = text.split_once('/') {
            if let Some(share) = Self::from_parts(numerator, denominator) {
                return Some(share);
            }
        }

        Some(Self::Text(text.to_string()))
    }

    /// Build a fraction from separately stored numerator and denominator.
    #[must_use]
    pub fn from_parts(numerator: &str, denominator: &str) -> Option<Self> {
        let numerator = numerator.trim().parse::<u64>().ok()?;
        let denominator = denominator.trim().parse::<u64>().ok()?;
        (denominator > 0).then_some(Self::Fraction {
            numerator,
            denominator,
        })
    }

    /// Denominator of a fractional share.
    #[must_use]
    pub fn denominator(&self) -> Option<u64> {
        match self {
            Self::Fraction { denominator, .. } => Some(*denominator),
            Self::Text(_) => None,
        }
    }

    #[must_use]
    pub fn is_fraction(&self) -> bool {
        matches!(self, Self::Fraction { .. })
    }
}

impl fmt::Display for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fraction {
                numerator,
                denominator,
            } => write!(f, "{numerator}/{denominator}"),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// State registration of a right or restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    /// Free-text registration line as printed in the extract.
    pub name: Option<String>,
    pub number: Option<String>,
    /// Display date (`DD.MM.YYYY`).
    pub date: Option<String>,
}

/// One registered right with its holders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RightRecord {
    pub kind: RightKind,
    pub type_label: String,
    pub share: Option<Share>,
    pub holders: Vec<String>,
    pub registration: Registration,
}

impl RightRecord {
    #[must_use]
    pub fn new(kind: RightKind, type_label: impl Into<String>) -> Self {
        Self {
            kind,
            type_label: type_label.into(),
            share: None,
            holders: Vec::new(),
            registration: Registration::default(),
        }
    }

    #[must_use]
    pub fn with_share(mut self, share: Option<Share>) -> Self {
        self.share = share;
        self
    }

    #[must_use]
    pub fn with_holder(mut self, holder: impl Into<String>) -> Self {
        self.holders.push(holder.into());
        self
    }

    #[must_use]
    pub fn with_holders(mut self, holders: impl IntoIterator<Item = String>) -> Self {
        self.holders.extend(holders);
        self
    }

    #[must_use]
    pub fn with_registration(mut self, registration: Registration) -> Self {
        self.registration = registration;
        self
    }

    /// One-line registration summary for the owner details column.
    ///
    /// `"<type> №<number> от <date>"` when number and date are known,
    /// `"<name>; <number>"` when only a number accompanies the name,
    /// otherwise the free-text name.
    #[must_use]
    pub fn registration_summary(&self) -> Option<String> {
        let registration = &self.registration;
        match (&registration.number, &registration.date, &registration.name) {
            (Some(number), Some(date), _) => {
                Some(format!("{} №{} от {}", self.type_label, number, date))
            }
            (Some(number), None, Some(name)) => Some(format!("{name}; {number}")),
            (_, _, Some(name)) => Some(name.clone()),
            _ => None,
        }
    }
}

/// Validity period of a restriction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validity {
    /// Free-text term ("49 лет", "бессрочно").
    Term(String),
    Between { start: String, end: String },
    /// Start date plus a term instead of an end date.
    Since { start: String, term: String },
    /// Shared-construction (DDU) restriction periods.
    SharedConstruction {
        first_contract: String,
        transfer_deadline: String,
    },
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term(term) => write!(f, "срок действия: {term}"),
            Self::Between { start, end } => write!(f, "срок действия: с {start} по {end}"),
            Self::Since { start, term } => write!(f, "срок действия: с {start} на {term}"),
            Self::SharedConstruction {
                first_contract,
                transfer_deadline,
            } => write!(
                f,
                "дата регистрации первого ДДУ {first_contract}, \
                 срок передачи застройщиком объекта {transfer_deadline}"
            ),
        }
    }
}

/// One restriction or encumbrance on the object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncumbranceRecord {
    pub type_label: String,
    /// Party in whose favour the restriction is registered.
    pub beneficiary: Option<String>,
    /// Share of the object covered by the restriction.
    pub share_note: Option<String>,
    pub validity: Option<Validity>,
    /// Founding documents.
    pub documents: Vec<String>,
    pub registration: Registration,
}

impl EncumbranceRecord {
    #[must_use]
    pub fn new(type_label: impl Into<String>) -> Self {
        Self {
            type_label: type_label.into(),
            beneficiary: None,
            share_note: None,
            validity: None,
            documents: Vec::new(),
            registration: Registration::default(),
        }
    }

    #[must_use]
    pub fn with_beneficiary(mut self, beneficiary: Option<String>) -> Self {
        self.beneficiary = beneficiary;
        self
    }

    #[must_use]
    pub fn with_share_note(mut self, note: Option<String>) -> Self {
        self.share_note = note;
        self
    }

    #[must_use]
    pub fn with_validity(mut self, validity: Option<Validity>) -> Self {
        self.validity = validity;
        self
    }

    #[must_use]
    pub fn with_documents(mut self, documents: Vec<String>) -> Self {
        self.documents = documents;
        self
    }

    #[must_use]
    pub fn with_registration(mut self, registration: Registration) -> Self {
        self.registration = registration;
        self
    }

    /// One-line description for the encumbrance details column.
    #[must_use]
    pub fn detail(&self) -> Option<String> {
        let registration = &self.registration;
        match (&registration.number, &registration.date, &self.validity) {
            (Some(number), Some(date), Some(validity)) => Some(format!(
                "{} №{} от {}, {}",
                self.type_label, number, date, validity
            )),
            (Some(number), Some(date), None) => {
                Some(format!("{} №{} от {}", self.type_label, number, date))
            }
            (_, _, Some(validity)) if self.documents.is_empty() => Some(validity.to_string()),
            (_, _, Some(validity)) => Some(format!("{}, {}", self.documents.join(", "), validity)),
            _ => None,
        }
    }
}
