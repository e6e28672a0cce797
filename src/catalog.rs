use std::fmt;

use chrono_tz::{TZ_VARIANTS, Tz};
use rustc_hash::FxHashSet;

use crate::error::{ConvertError, Result};

/// A validated time zone drawn from a [`ZoneCatalog`].
///
/// Construction only ever happens through [`ZoneCatalog::resolve`], so a
/// `ZoneId` in hand means later conversions cannot fail on zone lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneId(Tz);

impl ZoneId {
    /// The canonical IANA identifier, e.g. `"Asia/Ho_Chi_Minh"`.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub(crate) fn tz(&self) -> Tz {
        self.0
    }
}

impl fmt::Display for ZoneId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// An immutable ordered list of zone identifiers the selectors are
/// restricted to.
#[derive(Debug)]
pub struct ZoneCatalog {
    zones: Vec<ZoneId>,
    index: FxHashSet<Tz>,
}

impl ZoneCatalog {
    /// Build a catalog from an externally supplied identifier list,
    /// preserving order and dropping duplicates. Fails on the first unknown
    /// identifier and on an empty list.
    pub fn new<I, S>(ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut zones = Vec::new();
        let mut index = FxHashSet::default();
        for id in ids {
            let raw = id.as_ref();
            let tz: Tz = raw.parse().map_err(|_| ConvertError::InvalidZone {
                name: raw.to_string(),
            })?;
            if index.insert(tz) {
                zones.push(ZoneId(tz));
            }
        }
        if zones.is_empty() {
            return Err(ConvertError::EmptyCatalog);
        }
        Ok(Self { zones, index })
    }

    /// Every zone the bundled tz database knows, in its canonical order.
    pub fn full() -> Self {
        let zones: Vec<ZoneId> = TZ_VARIANTS.iter().copied().map(ZoneId).collect();
        let index = TZ_VARIANTS.iter().copied().collect();
        Self { zones, index }
    }

    pub fn contains(&self, id: &str) -> bool {
        id.parse::<Tz>()
            .map(|tz| self.index.contains(&tz))
            .unwrap_or(false)
    }

    /// The validation boundary for inbound zone-selection strings.
    pub fn resolve(&self, raw: &str) -> Result<ZoneId> {
        let tz: Tz = raw.parse().map_err(|_| ConvertError::InvalidZone {
            name: raw.to_string(),
        })?;
        if !self.index.contains(&tz) {
            return Err(ConvertError::InvalidZone {
                name: raw.to_string(),
            });
        }
        Ok(ZoneId(tz))
    }

    pub fn all(&self) -> &[ZoneId] {
        &self.zones
    }

    /// Case-insensitive substring match over identifiers, in catalog order.
    /// Backs the searchable zone selector.
    pub fn search(&self, fragment: &str) -> Vec<ZoneId> {
        let needle = fragment.to_ascii_lowercase();
        self.zones
            .iter()
            .copied()
            .filter(|zone| zone.name().to_ascii_lowercase().contains(&needle))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_catalog_knows_the_defaults() {
        let catalog = ZoneCatalog::full();
        assert!(catalog.contains("UTC"));
        assert!(catalog.contains("Asia/Ho_Chi_Minh"));
        assert!(catalog.len() > 100);
    }

    #[test]
    fn curated_catalog_preserves_order_and_dedups() {
        let catalog =
            ZoneCatalog::new(["Asia/Tokyo", "UTC", "Asia/Tokyo", "Europe/Paris"]).unwrap();
        let names: Vec<&str> = catalog.all().iter().map(|z| z.name()).collect();
        assert_eq!(names, ["Asia/Tokyo", "UTC", "Europe/Paris"]);
    }

    #[test]
    fn empty_list_is_rejected() {
        let err = ZoneCatalog::new(Vec::<String>::new()).unwrap_err();
        assert!(matches!(err, ConvertError::EmptyCatalog));
    }

    #[test]
    fn unknown_identifier_fails_construction() {
        let err = ZoneCatalog::new(["UTC", "Not/AZone"]).unwrap_err();
        assert!(matches!(err, ConvertError::InvalidZone { name } if name == "Not/AZone"));
    }

    #[test]
    fn resolve_is_gated_by_membership_not_just_parseability() {
        let catalog = ZoneCatalog::new(["UTC"]).unwrap();
        // A real IANA zone, but outside this catalog.
        assert!(catalog.resolve("Asia/Tokyo").is_err());
        assert_eq!(catalog.resolve("UTC").unwrap().name(), "UTC");
    }

    #[test]
    fn search_is_case_insensitive() {
        let catalog = ZoneCatalog::full();
        let hits = catalog.search("ho_chi_minh");
        assert!(hits.iter().any(|z| z.name() == "Asia/Ho_Chi_Minh"));
        assert!(catalog.search("no such zone anywhere").is_empty());
    }
}
