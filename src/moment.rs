use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Duration, MappedLocalTime, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;

use crate::catalog::ZoneId;
use crate::civil::CivilDateTime;
use crate::error::{ConvertError, Result};

/// A civil reading anchored to a zone; together they name an instant (up to
/// the documented DST fold).
///
/// The two ways of moving a moment between zones are deliberately separate
/// functions: [`ZonedMoment::relabel`] keeps the civil fields and moves the
/// instant, [`ZonedMoment::same_instant_in`] keeps the instant and moves the
/// civil fields. They are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZonedMoment {
    civil: CivilDateTime,
    zone: ZoneId,
}

impl ZonedMoment {
    /// Anchor a civil reading to a zone. The fields are structurally
    /// validated here; the zone was validated by the catalog.
    pub fn new(civil: CivilDateTime, zone: ZoneId) -> Result<Self> {
        civil.validate()?;
        Ok(Self { civil, zone })
    }

    /// The present instant read from the system clock, expressed in `zone`.
    pub fn now_in(zone: ZoneId) -> Result<Self> {
        let unix = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| ConvertError::ClockUnavailable)?;
        let utc = Utc
            .timestamp_opt(unix.as_secs() as i64, unix.subsec_nanos())
            .single()
            .ok_or(ConvertError::ClockUnavailable)?;
        let local = utc.with_timezone(&zone.tz());
        Ok(Self {
            civil: CivilDateTime::from(local.naive_local()),
            zone,
        })
    }

    pub fn civil(&self) -> CivilDateTime {
        self.civil
    }

    pub fn zone(&self) -> ZoneId {
        self.zone
    }

    /// Reassign the zone without touching the civil fields. The instant
    /// changes: this reinterprets the wall clock reading as if it had been
    /// taken in `zone`, it does not convert anything.
    pub fn relabel(&self, zone: ZoneId) -> Self {
        Self {
            civil: self.civil,
            zone,
        }
    }

    /// Re-express the instant this moment names under `zone`. The point on
    /// the timeline is preserved; the civil fields change instead.
    pub fn same_instant_in(&self, zone: ZoneId) -> Self {
        let converted = self.to_instant().with_timezone(&zone.tz());
        Self {
            civil: CivilDateTime::from(converted.naive_local()),
            zone,
        }
    }

    /// Resolve the civil reading to a concrete point on the timeline.
    pub(crate) fn to_instant(&self) -> DateTime<Tz> {
        // Every constructor validates the civil fields, so the naive form
        // exists.
        let naive = self.civil.to_naive().unwrap_or_default();
        resolve_local(self.zone.tz(), naive)
    }
}

/// Map a wall-clock reading onto the timeline in `tz`.
///
/// Readings that occur twice (clock set back) take the first occurrence.
/// Readings that fall in a DST gap (clock set forward) are pushed ahead by
/// the gap length, by applying the offset in force just before the
/// transition.
fn resolve_local(tz: Tz, naive: NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(&naive) {
        MappedLocalTime::Single(dt) => dt,
        MappedLocalTime::Ambiguous(earlier, _later) => earlier,
        MappedLocalTime::None => {
            // Probe behind the gap for the pre-transition offset. Three
            // hours clears every gap in the tz database.
            let probe = naive - Duration::hours(3);
            let offset_secs = tz
                .from_local_datetime(&probe)
                .earliest()
                .map(|dt| i64::from(dt.offset().fix().local_minus_utc()))
                .unwrap_or(0);
            tz.from_utc_datetime(&(naive - Duration::seconds(offset_secs)))
        }
    }
}
