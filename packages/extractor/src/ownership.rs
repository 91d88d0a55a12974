//! Ownership normalization.
//!
//! Collapses the right records of one object into the single owner string
//! of the normalized record. The function is pure: adapters gather records
//! from the current extract sub-tree and the legacy GKN sub-tree, this module
//! decides which source to use and how to render it.
//!
//! Rendering, in order of precedence:
//!
//! - shared ownership only: per-share listing for one or two holders,
//!   a share/holder summary above that;
//! - shared ownership next to other rights (servitude over shared land):
//!   every share pair, then the other right when it has a single holder;
//! - joint holders next to shared ones follow the shared rendering;
//! - joint ownership: holders after the joint label, other rights appended
//!   when their holders differ;
//! - anything else: `"<type> <holder>"` pairs.
//!
//! When no record exists anywhere the owner falls back to the federal
//! government for forest and water fund land, then (if enabled) to the
//! district administration, then to an empty string.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

use crate::config::{STATE_OWNED_CATEGORIES, STATE_OWNER};
use crate::rights::{RightKind, RightRecord, Share};
use crate::text::{holder_key, non_empty, title_case};

/// Adjective endings of district names and the regex finding each.
#[allow(clippy::expect_used)] // Static regexes that are guaranteed to be valid
static DISTRICT_ADJECTIVES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    ["ий", "ый", "ой"]
        .into_iter()
        .map(|suffix| {
            let pattern = Regex::new(&format!(r"[\w-]+{suffix}")).expect("valid regex");
            (pattern, suffix)
        })
        .collect()
});

/// Object facts the ownership defaults depend on.
#[derive(Debug, Clone, Copy, Default)]
pub struct OwnershipContext<'a> {
    /// Land category label (empty for buildings).
    pub category: &'a str,
    /// District name used by the administrative fallback.
    pub district: &'a str,
    pub admin_fallback: bool,
}

/// Why an owner string was left empty for a human to fill in.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewReason {
    #[error("{shares} free-text shares recorded for {holders} holders")]
    ShareCountMismatch { shares: usize, holders: usize },

    #[error("no fractional share recorded for holder '{holder}'")]
    MissingShare { holder: String },
}

/// Rendered owner string, plus the reason when it needs manual review.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ownership {
    pub summary: String,
    pub review: Option<ReviewReason>,
}

impl Ownership {
    fn rendered(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            review: None,
        }
    }

    fn needs_review(reason: ReviewReason) -> Self {
        Self {
            summary: String::new(),
            review: Some(reason),
        }
    }
}

/// Render the owner of an object.
///
/// `current` records win whenever there is at least one; `legacy` records
/// are only consulted when the current sub-tree holds none.
///
/// # Examples
/// ```
/// use egrn_extractor::ownership::{normalize_ownership, OwnershipContext};
/// use egrn_extractor::rights::{RightKind, RightRecord, Share};
///
/// let current = vec![RightRecord::new(RightKind::Shared, "Долевая собственность")
///     .with_share(Share::parse("1/1"))
///     .with_holder("ИВАНОВ ИВАН ИВАНОВИЧ")];
///
/// let owner = normalize_ownership(&current, &[], &OwnershipContext::default());
/// assert_eq!(owner.summary, "Долевая собственность 1/1 Иванов Иван Иванович");
/// ```
pub fn normalize_ownership(
    current: &[RightRecord],
    legacy: &[RightRecord],
    context: &OwnershipContext<'_>,
) -> Ownership {
    let records = if current.is_empty() { legacy } else { current };
    if records.is_empty() {
        return Ownership::rendered(default_owner(context).unwrap_or_default());
    }

    let shared = of_kind(records, RightKind::Shared);
    let joint = of_kind(records, RightKind::Joint);
    let other = of_kind(records, RightKind::Other);

    if !shared.is_empty() {
        let mut ownership = if other.is_empty() {
            render_shared(&shared)
        } else {
            render_shared_with_others(&shared, &other)
        };
        if !joint.is_empty() && ownership.review.is_none() {
            ownership.summary.push_str(", ");
            ownership.summary.push_str(&render_joint(&joint, &[]));
        }
        ownership
    } else if !joint.is_empty() {
        Ownership::rendered(render_joint(&joint, &other))
    } else {
        Ownership::rendered(render_pairs(&other))
    }
}

/// Owner details: registration summaries of the chosen source joined by `"; "`.
///
/// Returns `None` when neither source has a summary.
pub fn describe_rights(current: &[RightRecord], legacy: &[RightRecord]) -> Option<String> {
    let summarize = |records: &[RightRecord]| {
        records
            .iter()
            .filter_map(RightRecord::registration_summary)
            .collect::<Vec<_>>()
            .join("; ")
    };

    non_empty(summarize(current)).or_else(|| non_empty(summarize(legacy)))
}

/// Owner by law or by configuration when the extract names none.
pub fn default_owner(context: &OwnershipContext<'_>) -> Option<String> {
    if STATE_OWNED_CATEGORIES.contains(&context.category.trim()) {
        return Some(STATE_OWNER.to_string());
    }
    if context.admin_fallback {
        return administration_of(context.district);
    }
    None
}

/// Name of the administration of a district, in the genitive case.
///
/// # Examples
/// ```
/// use egrn_extractor::ownership::administration_of;
///
/// assert_eq!(
///     administration_of("Всеволожский").as_deref(),
///     Some("Администрация Всеволожского района")
/// );
/// assert_eq!(administration_of("Пушкин"), None);
/// ```
pub fn administration_of(district: &str) -> Option<String> {
    DISTRICT_ADJECTIVES.iter().find_map(|(pattern, suffix)| {
        let adjective = pattern.find(district)?;
        let genitive = format!("{} района", adjective.as_str()).replace(suffix, "ого");
        Some(format!("Администрация {genitive}"))
    })
}

fn render_shared(shared: &[&RightRecord]) -> Ownership {
    let label = shared[0].type_label.as_str();
    let holders: Vec<&str> = all_holders(shared);
    let distinct = distinct_holders(shared);
    let shares: Vec<&Share> = shared.iter().filter_map(|r| r.share.as_ref()).collect();

    if shares.is_empty() {
        return Ownership::rendered(match distinct.as_slice() {
            [] => label.to_string(),
            [holder] => format!("{label} {holder}"),
            _ => format!("{label} ({} правообладателей)", distinct.len()),
        });
    }

    let display = |holder: &str| {
        if distinct.len() <= 2 {
            title_case(holder)
        } else {
            holder.to_string()
        }
    };

    let text_shares: Vec<&str> = shares
        .iter()
        .filter_map(|share| match share {
            Share::Text(text) => Some(text.as_str()),
            Share::Fraction { .. } => None,
        })
        .collect();

    if !text_shares.is_empty() {
        if text_shares.len() != holders.len() {
            return Ownership::needs_review(ReviewReason::ShareCountMismatch {
                shares: text_shares.len(),
                holders: holders.len(),
            });
        }
        let pairs: Vec<String> = text_shares
            .iter()
            .zip(&holders)
            .map(|(share, holder)| format!("{share} {}", display(holder)))
            .collect();
        return Ownership::rendered(format!("{label} {}", pairs.join(", ")));
    }

    let max_denominator = shares.iter().filter_map(|s| s.denominator()).max().unwrap_or(0);
    if distinct.is_empty() {
        return Ownership::rendered(label);
    }
    if distinct.len() > 2 {
        return Ownership::rendered(format!(
            "{label} ({max_denominator} долей; {} правообладателей)",
            distinct.len()
        ));
    }

    let mut parts = Vec::with_capacity(distinct.len());
    for holder in &distinct {
        let key = holder_key(holder);
        let share = shared
            .iter()
            .filter(|record| record.holders.iter().any(|h| holder_key(h) == key))
            .find_map(|record| record.share.as_ref().filter(|s| s.is_fraction()));
        match share {
            Some(share) => parts.push(format!("{share} {}", display(holder))),
            None => {
                return Ownership::needs_review(ReviewReason::MissingShare {
                    holder: holder.to_string(),
                })
            }
        }
    }

    Ownership::rendered(match parts.as_slice() {
        [single] => format!("{label} {single}"),
        _ => format!("{label}: {}", parts.join(", ")),
    })
}

fn render_shared_with_others(shared: &[&RightRecord], other: &[&RightRecord]) -> Ownership {
    let fractions: Vec<(&Share, &str)> = shared
        .iter()
        .filter_map(|record| match (&record.share, record.holders.first()) {
            (Some(share), Some(holder)) if share.is_fraction() => Some((share, holder.as_str())),
            _ => None,
        })
        .collect();

    if fractions.is_empty() {
        let all: Vec<&RightRecord> = shared.iter().chain(other).copied().collect();
        return Ownership::rendered(render_pairs(&all));
    }

    let label = shared[0].type_label.as_str();
    if fractions.len() > 2 {
        let max_denominator = fractions
            .iter()
            .filter_map(|(share, _)| share.denominator())
            .max()
            .unwrap_or(0);
        return Ownership::rendered(format!(
            "{label} ({max_denominator} долей; {} правообладателей)",
            distinct_holders(shared).len()
        ));
    }

    let mut parts: Vec<String> = fractions
        .iter()
        .map(|(share, holder)| format!("{label} {share} {}", title_case(holder)))
        .collect();
    let extra: Vec<(&str, &str)> = other
        .iter()
        .copied()
        .flat_map(|record| {
            record
                .holders
                .iter()
                .map(move |holder| (record.type_label.as_str(), holder.as_str()))
        })
        .collect();
    if let [(type_label, holder)] = extra.as_slice() {
        parts.push(format!("{type_label} {holder}"));
    }

    Ownership::rendered(parts.join(", "))
}

fn render_joint(joint: &[&RightRecord], other: &[&RightRecord]) -> String {
    let label = joint[0].type_label.as_str();
    let joint_holders = all_holders(joint);

    let mut rendered = if joint_holders.is_empty() {
        label.to_string()
    } else {
        format!("{label} {}", joint_holders.join(", "))
    };

    if !other.is_empty() {
        let joint_keys: HashSet<String> = joint_holders.iter().map(|h| holder_key(h)).collect();
        let other_keys: HashSet<String> = all_holders(other).iter().map(|h| holder_key(h)).collect();
        if other_keys != joint_keys {
            rendered.push_str(", ");
            rendered.push_str(&render_pairs(other));
        }
    }

    rendered
}

fn render_pairs(records: &[&RightRecord]) -> String {
    let mut parts = Vec::new();
    for record in records {
        if record.holders.is_empty() {
            parts.push(record.type_label.clone());
        }
        for holder in &record.holders {
            parts.push(format!("{} {holder}", record.type_label));
        }
    }
    parts.join(", ")
}

fn of_kind(records: &[RightRecord], kind: RightKind) -> Vec<&RightRecord> {
    records.iter().filter(|record| record.kind == kind).collect()
}

fn all_holders<'r>(records: &[&'r RightRecord]) -> Vec<&'r str> {
    records
        .iter()
        .flat_map(|record| record.holders.iter().map(String::as_str))
        .collect()
}

/// Holders in first-seen order, compared case-insensitively.
fn distinct_holders<'r>(records: &[&'r RightRecord]) -> Vec<&'r str> {
    let mut seen = HashSet::new();
    all_holders(records)
        .into_iter()
        .filter(|holder| seen.insert(holder_key(holder)))
        .collect()
}
