//! Encumbrance normalization.
//!
//! Restrictions registered in favour of a named party are listed as
//! `"<type> <beneficiary>"`; restrictions without a beneficiary (zones,
//! arrests, statutory limits) are collected into a separate summary that
//! closes the string.

use std::collections::HashSet;

use crate::config::NO_DATA;
use crate::rights::EncumbranceRecord;
use crate::text::{holder_key, non_empty, title_case};

/// Render the encumbrances of an object.
///
/// Legacy records are pooled in only when no current record names a
/// beneficiary. `claim` is the free-text claim note of the current extract.
///
/// # Examples
/// ```
/// use egrn_extractor::encumbrance::normalize_encumbrances;
/// use egrn_extractor::rights::EncumbranceRecord;
///
/// let current = vec![
///     EncumbranceRecord::new("Аренда")
///         .with_beneficiary(Some("ПЕТРОВ ПЕТР ПЕТРОВИЧ".to_string())),
///     EncumbranceRecord::new("Охранная зона"),
/// ];
/// assert_eq!(
///     normalize_encumbrances(&current, &[], None),
///     "Аренда Петров Петр Петрович; Охранная зона"
/// );
/// ```
pub fn normalize_encumbrances(
    current: &[EncumbranceRecord],
    legacy: &[EncumbranceRecord],
    claim: Option<&str>,
) -> String {
    let current_named = current.iter().any(|record| record.beneficiary.is_some());
    let pool: Vec<&EncumbranceRecord> = if current_named {
        current.iter().collect()
    } else {
        current.iter().chain(legacy).collect()
    };

    let mut named = Vec::new();
    let mut unnamed: Vec<String> = Vec::new();
    let mut seen = HashSet::new();

    for record in pool {
        match &record.beneficiary {
            Some(beneficiary) => {
                if seen.insert((record.type_label.clone(), holder_key(beneficiary))) {
                    let entry = recase_beneficiary(&format!("{} {beneficiary}", record.type_label));
                    named.push(with_share_note(entry, record));
                }
            }
            None => {
                let entry = with_share_note(record.type_label.clone(), record);
                if !unnamed.contains(&entry) {
                    unnamed.push(entry);
                }
            }
        }
    }

    let mut summary = unnamed.join("; ");
    if let Some(claim) = claim
        .map(str::trim)
        .filter(|claim| !claim.is_empty() && claim.to_lowercase() != NO_DATA)
    {
        if !summary.is_empty() {
            summary.push_str(", ");
        }
        summary.push_str(claim);
    }

    match (named.is_empty(), summary.is_empty()) {
        (true, _) => summary,
        (false, true) => named.join(", "),
        (false, false) => format!("{}; {summary}", named.join(", ")),
    }
}

/// Encumbrance details: per-record descriptions of the chosen source,
/// deduplicated and joined by `"; "`.
pub fn describe_encumbrances(
    current: &[EncumbranceRecord],
    legacy: &[EncumbranceRecord],
) -> Option<String> {
    let describe = |records: &[EncumbranceRecord]| {
        let mut details: Vec<String> = Vec::new();
        for detail in records.iter().filter_map(EncumbranceRecord::detail) {
            if !details.contains(&detail) {
                details.push(detail);
            }
        }
        details.join("; ")
    };

    non_empty(describe(current)).or_else(|| non_empty(describe(legacy)))
}

/// Re-case `"<type> <beneficiary>"`.
///
/// Quoted organization names are left alone. Four tokens look like a type
/// followed by a full personal name and are title-cased as a whole; longer
/// entries get their last three tokens (the personal name) title-cased.
pub fn recase_beneficiary(entry: &str) -> String {
    if entry.contains(['"', '«', '»']) {
        return entry.to_string();
    }

    let tokens: Vec<&str> = entry.split_whitespace().collect();
    match tokens.len() {
        4 => title_case(&tokens.join(" ")),
        n if n > 4 => {
            let (head, name) = tokens.split_at(n - 3);
            format!("{} {}", head.join(" "), title_case(&name.join(" ")))
        }
        _ => entry.to_string(),
    }
}

fn with_share_note(entry: String, record: &EncumbranceRecord) -> String {
    match &record.share_note {
        Some(note) => format!("{entry} ({note})"),
        None => entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rights::{Registration, Validity};

    fn named(label: &str, beneficiary: &str) -> EncumbranceRecord {
        EncumbranceRecord::new(label).with_beneficiary(Some(beneficiary.to_string()))
    }

    #[test]
    fn test_unnamed_restrictions_deduplicated() {
        let current = [
            EncumbranceRecord::new("Охранная зона"),
            EncumbranceRecord::new("Охранная зона"),
            EncumbranceRecord::new("Арест"),
        ];
        assert_eq!(
            normalize_encumbrances(&current, &[], None),
            "Охранная зона; Арест"
        );
    }

    #[test]
    fn test_claim_note_appended_unless_no_data() {
        let current = [EncumbranceRecord::new("Арест")];
        assert_eq!(
            normalize_encumbrances(&current, &[], Some("Заявлено в судебном порядке")),
            "Арест, Заявлено в судебном порядке"
        );
        assert_eq!(
            normalize_encumbrances(&current, &[], Some("данные отсутствуют")),
            "Арест"
        );
        assert_eq!(
            normalize_encumbrances(&[], &[], Some("Заявлено")),
            "Заявлено"
        );
    }

    #[test]
    fn test_share_note_follows_entry() {
        let current = [EncumbranceRecord::new("Ипотека").with_share_note(Some("1/2".to_string()))];
        assert_eq!(normalize_encumbrances(&current, &[], None), "Ипотека (1/2)");
    }

    #[test]
    fn test_named_restrictions_deduplicated_case_insensitively() {
        let current = [
            named("Аренда", "ИВАНОВ ИВАН ИВАНОВИЧ"),
            named("Аренда", "Иванов Иван Иванович"),
            named("Ипотека", "ПАО \"Сбербанк России\""),
        ];
        assert_eq!(
            normalize_encumbrances(&current, &[], None),
            "Аренда Иванов Иван Иванович, Ипотека ПАО \"Сбербанк России\""
        );
    }

    #[test]
    fn test_legacy_pooled_when_current_has_no_beneficiary() {
        let current = [EncumbranceRecord::new("Охранная зона")];
        let legacy = [named("Аренда", "ООО \"Лес\"")];
        assert_eq!(
            normalize_encumbrances(&current, &legacy, None),
            "Аренда ООО \"Лес\"; Охранная зона"
        );

        let current_named = [named("Сервитут", "АО \"Сети\"")];
        assert_eq!(
            normalize_encumbrances(&current_named, &legacy, None),
            "Сервитут АО \"Сети\""
        );
    }

    #[test]
    fn test_recase_beneficiary() {
        assert_eq!(
            recase_beneficiary("Аренда ИВАНОВ ИВАН ИВАНОВИЧ"),
            "Аренда Иванов Иван Иванович"
        );
        assert_eq!(
            recase_beneficiary("Аренда (в том числе, субаренда) ПЕТРОВ ПЕТР ПЕТРОВИЧ"),
            "Аренда (в том числе, субаренда) Петров Петр Петрович"
        );
        assert_eq!(
            recase_beneficiary("Ипотека ООО \"ВЕКТОР\""),
            "Ипотека ООО \"ВЕКТОР\""
        );
        assert_eq!(recase_beneficiary("Аренда ГКУ ЛО"), "Аренда ГКУ ЛО");
    }

    #[test]
    fn test_describe_encumbrances_prefers_current() {
        let current = [EncumbranceRecord::new("Аренда")
            .with_documents(vec!["Договор аренды от 01.01.2010".to_string()])
            .with_validity(Some(Validity::Term("49 лет".to_string())))];
        let legacy = [EncumbranceRecord::new("Аренда").with_registration(Registration {
            number: Some("47-01".to_string()),
            date: Some("02.02.2010".to_string()),
            ..Registration::default()
        })];

        assert_eq!(
            describe_encumbrances(&current, &legacy).as_deref(),
            Some("Договор аренды от 01.01.2010, срок действия: 49 лет")
        );
        assert_eq!(
            describe_encumbrances(&[], &legacy).as_deref(),
            Some("Аренда №47-01 от 02.02.2010")
        );
        assert_eq!(describe_encumbrances(&[], &[]), None);
    }
}
