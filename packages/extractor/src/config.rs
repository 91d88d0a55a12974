//! Configuration constants and per-run settings for the extractor.

use regex::Regex;
use std::sync::LazyLock;

/// Namespace of the cadastral parcel extract (KVZU) v7.
pub const KVZU_NAMESPACE: &str = "urn://x-artefacts-rosreestr-ru/outgoing/kvzu/7.0.1";

/// Namespace of the cadastral parcel passport (KPZU) v6.
pub const KPZU_NAMESPACE: &str = "urn://x-artefacts-rosreestr-ru/outgoing/kpzu/6.0.1";

/// Namespace of the capital construction extract (KVOKS) v3.
pub const KVOKS_NAMESPACE: &str = "urn://x-artefacts-rosreestr-ru/outgoing/kvoks/3.0.1";

/// Namespace of the capital construction passport (KPOKS) v4.
pub const KPOKS_NAMESPACE: &str = "urn://x-artefacts-rosreestr-ru/outgoing/kpoks/4.0.1";

/// Right type code for shared (fractional) ownership.
pub const SHARED_OWNERSHIP_CODE: &str = "001002000000";

/// Right type code for joint ownership.
pub const JOINT_OWNERSHIP_CODE: &str = "001003000000";

/// Display label used for shared ownership in namespaced extracts.
pub const SHARED_OWNERSHIP_LABEL: &str = "Долевая собственность";

/// Display label used for joint ownership in namespaced extracts.
pub const JOINT_OWNERSHIP_LABEL: &str = "Совместная собственность";

/// Land category code meaning "category not established".
pub const UNDEFINED_CATEGORY_CODE: &str = "003008000000";

/// Placeholder for a field the schema family does not carry.
pub const NOT_APPLICABLE: &str = "-";

/// Land categories that are federally owned by law when no right is registered.
pub const STATE_OWNED_CATEGORIES: [&str; 2] = ["Земли лесного фонда", "Земли водного фонда"];

/// Owner rendered for [`STATE_OWNED_CATEGORIES`].
pub const STATE_OWNER: &str = "Собственность РФ";

/// Claim note text meaning "no data".
pub const NO_DATA: &str = "данные отсутствуют";

/// Special-notes sentence introducing the constituents of a composite parcel.
pub const COMPOSITE_PARCEL_MARKER: &str =
    "Кадастровые номера обособленных (условных) участков, входящих в единое землепользование:";

/// Share texts containing this stem describe a proportional share, not a fraction.
pub const PROPORTIONAL_SHARE_STEM: &str = "пропорциональн";

/// Object type label of a land parcel.
pub const LAND_PARCEL_LABEL: &str = "Земельный участок";

/// Object type label of a building, structure, unit or parking space.
pub const CAPITAL_CONSTRUCTION_LABEL: &str = "Объект капитального строительства";

/// Classification table file names.
pub const REGION_TABLE: &str = "region.csv";
pub const STATUS_TABLE: &str = "status.csv";
pub const LAND_CATEGORY_TABLE: &str = "land_category.csv";
pub const PERMITTED_USE_TABLE: &str = "utilization.csv";
pub const RIGHT_TABLE: &str = "right.csv";
pub const ENCUMBRANCE_TABLE: &str = "encumbrance.csv";

/// Field separator of the classification tables.
pub const TABLE_DELIMITER: u8 = b'|';

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
/// Cadastral number: four colon-separated digit groups.
pub static CADASTRAL_NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+:\d+:\d+:\d+").expect("valid regex"));

#[allow(clippy::expect_used)] // Static regex that is guaranteed to be valid
/// District adjective in a readable address ("Всеволожский р-н").
pub static ADDRESS_DISTRICT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\w-]+(?:ий|ый|ой))\s+(?:р-н|район)").expect("valid regex")
});

/// Check whether a string is exactly one cadastral number.
///
/// # Examples
/// ```
/// use egrn_extractor::config::is_cadastral_number;
///
/// assert!(is_cadastral_number("47:07:1044001:2"));
/// assert!(!is_cadastral_number("3"));
/// assert!(!is_cadastral_number("47:07:1044001:2(3)"));
/// ```
pub fn is_cadastral_number(value: &str) -> bool {
    CADASTRAL_NUMBER_PATTERN
        .find(value)
        .is_some_and(|m| m.start() == 0 && m.end() == value.len())
}

/// Settings supplied by the caller for one extraction run.
///
/// Passed by reference to every adapter; nothing in the library reads
/// settings from a global location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSettings {
    /// Name the district administration as owner when no right is registered.
    pub admin_fallback: bool,
}

impl ExtractSettings {
    /// Create settings with every optional behaviour disabled.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the administrative-owner fallback.
    #[must_use]
    pub fn with_admin_fallback(mut self, enabled: bool) -> Self {
        self.admin_fallback = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_disables_admin_fallback() {
        assert!(!ExtractSettings::new().admin_fallback);
        assert!(ExtractSettings::new().with_admin_fallback(true).admin_fallback);
    }

    #[test]
    fn test_cadastral_number_pattern_finds_all() {
        let notes = "Кадастровые номера: 47:07:0000000:1, 47:07:0000000:2.";
        let found: Vec<&str> = CADASTRAL_NUMBER_PATTERN
            .find_iter(notes)
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["47:07:0000000:1", "47:07:0000000:2"]);
    }

    #[test]
    fn test_address_district_pattern() {
        let address = "Ленинградская область, Всеволожский р-н, д. Кудрово";
        let caps = ADDRESS_DISTRICT_PATTERN.captures(address).unwrap();
        assert_eq!(&caps[1], "Всеволожский");
    }
}
