// src/sensor/identity.rs

use super::exchange::query;
use crate::channel::SerialChannel;
use crate::common::{
    command::Command,
    error::LoadstarError,
    hal_traits::{Delay, SerialLink},
    timing::SettleTimings,
    types::{Classification, QuantityType, SensorFamily},
};
use core::fmt;
use log::{info, warn};

/// What is attached to the port, as worked out from the `MODEL` and `SS1` queries.
///
/// Computed once when the session is built and never changed afterwards.
/// Family and quantity type fully determine the command verbs and units.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorIdentity {
    model: String,
    id: String,
    family: SensorFamily,
    quantity: QuantityType,
    classification: Classification,
    units: String,
    continuous_command: &'static str,
    single_command: &'static str,
}

impl SensorIdentity {
    /// Classifies query responses. `query_units` is only called for DI-100 class
    /// devices; iLoad units follow from the id prefix.
    ///
    /// An empty model or id (silent device) still classifies: it lands on the
    /// iLoad family and the Force default, flagged as `DefaultFallback`.
    pub fn from_responses<F>(model: String, id: String, query_units: F) -> Self
    where
        F: FnOnce() -> String,
    {
        let family = SensorFamily::detect(&model);
        let (quantity, classification) = QuantityType::from_id(family, &id);
        let units = match family {
            SensorFamily::Di100 => query_units(),
            SensorFamily::ILoad => quantity.iload_units().to_string(),
        };

        SensorIdentity {
            model,
            id,
            family,
            quantity,
            classification,
            units,
            continuous_command: family.continuous_command(),
            single_command: family.single_command(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn family(&self) -> SensorFamily {
        self.family
    }

    pub fn quantity(&self) -> QuantityType {
        self.quantity
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    /// True when the quantity is the Force default rather than a recognised prefix.
    pub fn is_unclassified(&self) -> bool {
        self.classification == Classification::DefaultFallback
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn continuous_command(&self) -> &'static str {
        self.continuous_command
    }

    pub fn single_command(&self) -> &'static str {
        self.single_command
    }
}

impl fmt::Display for SensorIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ID: {}, Model: {}, Family: {}, Type: {}, Units: {}",
            self.id, self.model, self.family, self.quantity, self.units
        )
    }
}

/// Opens the channel if needed and queries the device for its identity.
///
/// Fails only if the channel cannot be opened; query failures degrade to
/// empty responses.
pub fn resolve<L, D>(
    channel: &mut SerialChannel<L>,
    delay: &mut D,
    timings: &SettleTimings,
) -> Result<SensorIdentity, LoadstarError<L::Error>>
where
    L: SerialLink,
    D: Delay,
{
    channel.open()?;

    let model = query(channel, delay, timings, &Command::Model);
    let id = query(channel, delay, timings, &Command::SerialId);
    let identity = SensorIdentity::from_responses(model, id, || {
        query(channel, delay, timings, &Command::Units)
    });

    if identity.is_unclassified() {
        warn!(
            "serial id {:?} (model {:?}) has no known type prefix, assuming Force",
            identity.id(),
            identity.model()
        );
    }
    info!("{} on {}", identity, channel.port_name());

    Ok(identity)
}
