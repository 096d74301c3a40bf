// src/common/types.rs

use chrono::{DateTime, Local};
use core::fmt;

// --- Sensor Family ---

/// Protocol dialect spoken by the attached device. Decides the command verbs.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum SensorFamily {
    /// DI-100 / DI-1000 digital indicators.
    Di100,
    /// iLoad capacitive load cells (anything that is not a DI-100 class device).
    ILoad,
}

impl SensorFamily {
    /// Model substring that marks a DI-100 class device. Also matches "DI-1000".
    pub const DI100_MARKER: &'static str = "DI-100";

    /// Classifies a `MODEL` response. Plain case-sensitive substring test;
    /// everything else, including an empty response, is iLoad.
    pub fn detect(model: &str) -> Self {
        if model.contains(Self::DI100_MARKER) {
            SensorFamily::Di100
        } else {
            SensorFamily::ILoad
        }
    }

    /// Command that puts the device into free-running streaming mode.
    pub const fn continuous_command(&self) -> &'static str {
        match self {
            SensorFamily::Di100 => "WC\r",
            SensorFamily::ILoad => "O0W0\r",
        }
    }

    /// Command that requests exactly one frame.
    pub const fn single_command(&self) -> &'static str {
        match self {
            SensorFamily::Di100 => "W\r",
            SensorFamily::ILoad => "O0W1\r",
        }
    }
}

impl fmt::Display for SensorFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorFamily::Di100 => write!(f, "DI-100"),
            SensorFamily::ILoad => write!(f, "iLoad"),
        }
    }
}

// --- Physical Quantity ---

/// Physical quantity reported by the sensor.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum QuantityType {
    Force,
    Temperature,
    Voltage,
    Torque,
    Displacement,
    ForceAndTemperature,
}

/// Whether the serial-id prefix was recognised or the Force default was applied.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Classification {
    /// The id carried a known type prefix.
    Matched,
    /// No prefix matched; quantity defaulted to Force. Also what a silent or
    /// disconnected device ends up as.
    DefaultFallback,
}

impl QuantityType {
    /// Classifies an `SS1` response by its type prefix. The prefix table depends on the family.
    pub fn from_id(family: SensorFamily, id: &str) -> (Self, Classification) {
        let table: &[(&str, QuantityType)] = match family {
            SensorFamily::Di100 => &[
                ("DISP", QuantityType::Displacement),
                ("TEMP", QuantityType::Temperature),
                ("VM", QuantityType::Voltage),
                ("TQ", QuantityType::Torque),
            ],
            SensorFamily::ILoad => &[
                ("FT", QuantityType::ForceAndTemperature),
                ("TEMP", QuantityType::Temperature),
            ],
        };

        table
            .iter()
            .find(|(prefix, _)| id.starts_with(prefix))
            .map(|(_, quantity)| (*quantity, Classification::Matched))
            .unwrap_or((QuantityType::Force, Classification::DefaultFallback))
    }

    /// Units string for an iLoad cell. iLoad devices are never asked for units.
    pub const fn iload_units(&self) -> &'static str {
        match self {
            QuantityType::ForceAndTemperature => "mLB/C",
            QuantityType::Temperature => "C",
            _ => "mLB",
        }
    }
}

impl fmt::Display for QuantityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use QuantityType::*;
        match self {
            Force => write!(f, "Force"),
            Temperature => write!(f, "Temperature"),
            Voltage => write!(f, "Voltage"),
            Torque => write!(f, "Torque"),
            Displacement => write!(f, "Displacement"),
            ForceAndTemperature => write!(f, "Force and Temperature"),
        }
    }
}

// --- Reading ---

/// One streamed value, stamped with the host wall clock when its frame was consumed.
/// Units are those of the session's `SensorIdentity`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Reading {
    pub timestamp: DateTime<Local>,
    pub value: f64,
}

impl Reading {
    pub fn new(timestamp: DateTime<Local>, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Renders `Date : 2022-09-16 at 14:05:09 +02:00, Data: 123.45`.
///
/// The zone is printed as a numeric UTC offset: chrono's `%Z` on `Local` has no
/// zone abbreviation to give, unlike a `z` pattern in Java date formatting.
impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Date : {}, Data: {:?}",
            self.timestamp.format("%Y-%m-%d at %H:%M:%S %Z"),
            self.value
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_family_detection() {
        assert_eq!(SensorFamily::detect("DI-100"), SensorFamily::Di100);
        assert_eq!(SensorFamily::detect("DI-1000 Rev2"), SensorFamily::Di100);
        assert_eq!(SensorFamily::detect("Loadstar DI-100U"), SensorFamily::Di100);
        assert_eq!(SensorFamily::detect("CapLoad-X"), SensorFamily::ILoad);
        assert_eq!(SensorFamily::detect(""), SensorFamily::ILoad);
    }

    #[test]
    fn test_family_detection_is_case_sensitive() {
        assert_eq!(SensorFamily::detect("di-100"), SensorFamily::ILoad);
        assert_eq!(SensorFamily::detect("DI 100"), SensorFamily::ILoad);
    }

    #[test]
    fn test_command_verbs() {
        assert_eq!(SensorFamily::Di100.continuous_command(), "WC\r");
        assert_eq!(SensorFamily::Di100.single_command(), "W\r");
        assert_eq!(SensorFamily::ILoad.continuous_command(), "O0W0\r");
        assert_eq!(SensorFamily::ILoad.single_command(), "O0W1\r");
    }

    #[test]
    fn test_di100_quantity_prefixes() {
        use Classification::*;
        let f = SensorFamily::Di100;
        assert_eq!(QuantityType::from_id(f, "DISP-12"), (QuantityType::Displacement, Matched));
        assert_eq!(QuantityType::from_id(f, "TEMP01"), (QuantityType::Temperature, Matched));
        assert_eq!(QuantityType::from_id(f, "VM-7"), (QuantityType::Voltage, Matched));
        assert_eq!(QuantityType::from_id(f, "TQ-0451"), (QuantityType::Torque, Matched));
        assert_eq!(QuantityType::from_id(f, "LC-0001"), (QuantityType::Force, DefaultFallback));
        // iLoad-only prefix means nothing to a DI-100
        assert_eq!(QuantityType::from_id(f, "FT-99"), (QuantityType::Force, DefaultFallback));
    }

    #[test]
    fn test_iload_quantity_prefixes() {
        use Classification::*;
        let f = SensorFamily::ILoad;
        assert_eq!(QuantityType::from_id(f, "FT-99"), (QuantityType::ForceAndTemperature, Matched));
        assert_eq!(QuantityType::from_id(f, "TEMP-3"), (QuantityType::Temperature, Matched));
        assert_eq!(QuantityType::from_id(f, "TQ-0451"), (QuantityType::Force, DefaultFallback));
        assert_eq!(QuantityType::from_id(f, ""), (QuantityType::Force, DefaultFallback));
    }

    #[test]
    fn test_iload_units() {
        assert_eq!(QuantityType::ForceAndTemperature.iload_units(), "mLB/C");
        assert_eq!(QuantityType::Temperature.iload_units(), "C");
        assert_eq!(QuantityType::Force.iload_units(), "mLB");
    }

    #[test]
    fn test_reading_display() {
        let ts = Local.with_ymd_and_hms(2022, 9, 16, 14, 5, 9).unwrap();
        let text = Reading::new(ts, 123.45).to_string();
        assert!(text.starts_with("Date : 2022-09-16 at 14:05:09 "));
        assert!(text.ends_with(", Data: 123.45"));
        assert!(Reading::new(ts, 5.0).to_string().ends_with("Data: 5.0"));
    }
}
