pub mod catalog;
pub mod civil;
pub mod converter;
pub mod error;
pub mod moment;

pub use catalog::{ZoneCatalog, ZoneId};
pub use civil::CivilDateTime;
pub use converter::{ConvertedView, Converter, ConverterConfig};
pub use error::{ConvertError, Result};
pub use moment::ZonedMoment;
