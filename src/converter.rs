use tracing::{debug, warn};

use crate::catalog::{ZoneCatalog, ZoneId};
use crate::civil::CivilDateTime;
use crate::error::Result;
use crate::moment::ZonedMoment;

/// Default zones applied at construction and by [`Converter::reset_to_now`].
/// Injected rather than baked into the state machine.
#[derive(Debug, Clone)]
pub struct ConverterConfig {
    pub default_source_zone: String,
    pub default_target_zone: String,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            default_source_zone: "UTC".to_string(),
            default_target_zone: "Asia/Ho_Chi_Minh".to_string(),
        }
    }
}

/// The source-side reading and the same instant re-expressed in the target
/// zone. Derived on every read, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvertedView {
    pub from: ZonedMoment,
    pub to: ZonedMoment,
}

/// The conversion state machine.
///
/// Holds exactly one zone-anchored reading (`current`, whose zone *is* the
/// source zone) and the target zone. Every mutation either commits a fully
/// valid replacement state or returns an error and leaves the state as it
/// was; nothing here panics.
#[derive(Debug)]
pub struct Converter {
    catalog: ZoneCatalog,
    current: ZonedMoment,
    target_zone: ZoneId,
    default_source: ZoneId,
    default_target: ZoneId,
}

impl Converter {
    /// Validates the configured defaults against the catalog and seeds the
    /// state with the present instant in the default source zone.
    pub fn new(catalog: ZoneCatalog, config: &ConverterConfig) -> Result<Self> {
        let default_source = catalog.resolve(&config.default_source_zone)?;
        let default_target = catalog.resolve(&config.default_target_zone)?;
        let current = ZonedMoment::now_in(default_source)?;
        Ok(Self {
            catalog,
            current,
            target_zone: default_target,
            default_source,
            default_target,
        })
    }

    /// Full bundled catalog, stock defaults.
    pub fn with_defaults() -> Result<Self> {
        Self::new(ZoneCatalog::full(), &ConverterConfig::default())
    }

    pub fn catalog(&self) -> &ZoneCatalog {
        &self.catalog
    }

    pub fn current(&self) -> ZonedMoment {
        self.current
    }

    pub fn source_zone(&self) -> ZoneId {
        self.current.zone()
    }

    pub fn target_zone(&self) -> ZoneId {
        self.target_zone
    }

    /// Reinterpret the current wall-clock reading in a new source zone. The
    /// civil fields keep their numeric values, so the instant moves; this is
    /// "read this wall clock as if it were over there", not a conversion.
    pub fn set_source_zone(&mut self, raw: &str) -> Result<()> {
        let zone = self.gate(raw)?;
        self.current = self.current.relabel(zone);
        debug!(zone = zone.name(), "source zone changed");
        Ok(())
    }

    pub fn set_target_zone(&mut self, raw: &str) -> Result<()> {
        let zone = self.gate(raw)?;
        self.target_zone = zone;
        debug!(zone = zone.name(), "target zone changed");
        Ok(())
    }

    /// Replace the wall-clock reading, keeping the source zone. Out-of-range
    /// fields reject the whole edit; there is no partial update.
    pub fn set_civil_date_time(&mut self, fields: CivilDateTime) -> Result<()> {
        match ZonedMoment::new(fields, self.current.zone()) {
            Ok(updated) => {
                self.current = updated;
                debug!(civil = %fields, "civil fields changed");
                Ok(())
            }
            Err(err) => {
                warn!(%err, "rejected civil edit");
                Err(err)
            }
        }
    }

    /// Exchange the zone roles. The civil fields keep their numeric values
    /// and re-anchor to the old target zone, the same relabeling rule as
    /// [`Converter::set_source_zone`].
    pub fn swap(&mut self) {
        let old_source = self.current.zone();
        self.current = self.current.relabel(self.target_zone);
        self.target_zone = old_source;
        debug!(
            from = self.current.zone().name(),
            to = self.target_zone.name(),
            "zones swapped"
        );
    }

    /// Re-read the clock into the current source zone; both zones stay put.
    pub fn set_to_now(&mut self) -> Result<()> {
        self.current = ZonedMoment::now_in(self.current.zone())?;
        debug!(civil = %self.current.civil(), "reading set to now");
        Ok(())
    }

    /// Back to the configured defaults with a fresh clock reading. On a
    /// clock failure the prior state is retained.
    pub fn reset_to_now(&mut self) -> Result<()> {
        let current = ZonedMoment::now_in(self.default_source)?;
        self.current = current;
        self.target_zone = self.default_target;
        debug!(
            from = self.current.zone().name(),
            to = self.target_zone.name(),
            "reset to defaults"
        );
        Ok(())
    }

    /// What civil time is it, simultaneously, in the target zone. Pure;
    /// recomputed on every call.
    pub fn derive(&self) -> ConvertedView {
        ConvertedView {
            from: self.current,
            to: self.current.same_instant_in(self.target_zone),
        }
    }

    fn gate(&self, raw: &str) -> Result<ZoneId> {
        match self.catalog.resolve(raw) {
            Ok(zone) => Ok(zone),
            Err(err) => {
                warn!(zone = raw, "rejected zone selection");
                Err(err)
            }
        }
    }
}
