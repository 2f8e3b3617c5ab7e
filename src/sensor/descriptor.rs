use std::fmt::{Display, Formatter};

use clap::{ValueEnum, builder::PossibleValue};

use crate::coordinator::Section;

#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum Unit {
    #[display("W")]
    Watt,

    #[display("°C")]
    Celsius,

    #[display("V")]
    Volt,

    #[display("A")]
    Ampere,

    #[display("Hz")]
    Hertz,

    #[display("s")]
    Second,
}

impl Unit {
    /// The device reports these units in fixed-point, divide by this to get the real value.
    pub const fn divisor(self) -> Option<f64> {
        match self {
            Self::Hertz => Some(1000.0),
            Self::Celsius | Self::Ampere => Some(10.0),
            Self::Watt | Self::Volt | Self::Second => None,
        }
    }
}

/// Static metadata describing how to read and present one sensor.
#[derive(Debug, PartialEq, Eq)]
pub struct Descriptor {
    /// JSON key in the source section.
    pub key: &'static str,

    pub name: &'static str,
    pub unit: Option<Unit>,
    pub icon: &'static str,
    pub section: Section,
}

macro_rules! sensor_types {
    ($($variant:ident => $key:literal, $name:literal, $unit:expr, $icon:literal, $section:ident;)+) => {
        #[derive(Debug, enumset::EnumSetType)]
        pub enum SensorType {
            $($variant,)+
        }

        impl SensorType {
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            pub const fn descriptor(self) -> &'static Descriptor {
                match self {
                    $(
                        Self::$variant => &Descriptor {
                            key: $key,
                            name: $name,
                            unit: $unit,
                            icon: $icon,
                            section: Section::$section,
                        },
                    )+
                }
            }
        }
    };
}

sensor_types! {
    PowerAct => "power_act", "Actual power", Some(Unit::Watt), "mdi:flash", Data;
    Power => "power", "Power", Some(Unit::Watt), "mdi:flash", Data;
    PowerSolar => "power_solar_act", "Solar power", Some(Unit::Watt), "mdi:solar-power", Data;
    PowerGrid => "power_grid_act", "Grid power", Some(Unit::Watt), "mdi:transmission-tower", Data;
    Surplus => "surplus", "Surplus", Some(Unit::Watt), "mdi:solar-power-variant", Data;
    LoadNominal => "load_nom", "Nominal load", Some(Unit::Watt), "mdi:flash-outline", Data;
    Relay1 => "rel1_out", "Relay 1 output", None, "mdi:electric-switch", Data;
    Temp1 => "temp1", "Temperature 1", Some(Unit::Celsius), "mdi:thermometer", Data;
    Temp2 => "temp2", "Temperature 2", Some(Unit::Celsius), "mdi:thermometer", Data;
    Temp3 => "temp3", "Temperature 3", Some(Unit::Celsius), "mdi:thermometer", Data;
    Temp4 => "temp4", "Temperature 4", Some(Unit::Celsius), "mdi:thermometer", Data;
    TempChip => "tempchip", "Chip temperature", Some(Unit::Celsius), "mdi:chip", Data;
    HotWaterTarget => "ww1target", "Hot water target", Some(Unit::Celsius), "mdi:thermometer-check", Data;
    MainsVoltage => "volt_mains", "Mains voltage", Some(Unit::Volt), "mdi:sine-wave", Data;
    MainsCurrent => "curr_mains", "Mains current", Some(Unit::Ampere), "mdi:current-ac", Data;
    OutputVoltage => "volt_out", "Output voltage", Some(Unit::Volt), "mdi:sine-wave", Data;
    OutputCurrent => "curr_out", "Output current", Some(Unit::Ampere), "mdi:current-ac", Data;
    Frequency => "freq", "Mains frequency", Some(Unit::Hertz), "mdi:sine-wave", Data;
    Status => "status", "Status", None, "mdi:information-outline", Data;
    ScreenMode => "screen_mode_flag", "Operating mode", None, "mdi:monitor", Data;
    BoostActive => "boostactive", "Boost active", None, "mdi:rocket-launch", Data;
    ControlState => "ctrlstate", "Control state", None, "mdi:state-machine", Data;
    ControlErrors => "ctrl_errors", "Control errors", None, "mdi:alert", Data;
    Warnings => "warnings", "Warnings", None, "mdi:alert-outline", Data;
    CloudState => "cloudstate", "Cloud state", None, "mdi:cloud", Data;
    WifiSignal => "wifi_signal", "Wi-Fi signal", None, "mdi:wifi", Data;
    UpdateState => "upd_state", "Update state", None, "mdi:update", Data;
    Meter1State => "m1devstate", "Measurement device 1 state", None, "mdi:gauge", Data;
    Meter2State => "m2devstate", "Measurement device 2 state", None, "mdi:gauge", Data;
    Meter3State => "m3devstate", "Measurement device 3 state", None, "mdi:gauge", Data;
    Meter4State => "m4devstate", "Measurement device 4 state", None, "mdi:gauge", Data;
    Uptime => "uptime", "Uptime", Some(Unit::Second), "mdi:timer-outline", Data;
    LocalTime => "loctime", "Local time", None, "mdi:clock-outline", Data;
    IpAddress => "cur_ip", "IP address", None, "mdi:ip-network", Data;
    Device => "device", "Device", None, "mdi:information", Info;
    SerialNumber => "sn", "Serial number", None, "mdi:barcode", Info;
    FirmwareVersion => "fwversion", "Firmware version", None, "mdi:chip", Info;
    DeviceMode => "devmode", "Device mode", None, "mdi:cog", Setup;
    MaxPower => "maxpwr", "Maximum power", Some(Unit::Watt), "mdi:flash-alert", Setup;
    BoostTarget => "ww1boost", "Boost target temperature", Some(Unit::Celsius), "mdi:thermometer-alert", Setup;
    LatestAcThorFirmware => "ac_thor", "Latest AC•THOR firmware", None, "mdi:cloud-download", Firmware;
    LatestElwa2Firmware => "elwa_2", "Latest ELWA 2 firmware", None, "mdi:cloud-download", Firmware;
    LatestAcElwaFirmware => "ac_elwa_e", "Latest AC ELWA-E firmware", None, "mdi:cloud-download", Firmware;
}

impl SensorType {
    pub const fn key(self) -> &'static str {
        self.descriptor().key
    }

    /// Measurement device states are bitmasks rather than codes.
    pub const fn is_meter_state(self) -> bool {
        matches!(self, Self::Meter1State | Self::Meter2State | Self::Meter3State | Self::Meter4State)
    }
}

impl Display for SensorType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

impl ValueEnum for SensorType {
    fn value_variants<'a>() -> &'a [Self] {
        Self::ALL
    }

    fn to_possible_value(&self) -> Option<PossibleValue> {
        Some(PossibleValue::new(self.key()).help(self.descriptor().name))
    }
}
