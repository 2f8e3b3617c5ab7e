//! Localized meanings of the device's numeric codes.

use crate::sensor::SensorType;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Language {
    #[default]
    German,
    English,
}

/// Status code namespace, derived from the model name in `mypv_dev.jsn`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeviceFamily {
    AcThor,
    AcElwaE,
    Elwa2,
}

impl DeviceFamily {
    pub fn from_model(model: &str) -> Option<Self> {
        match model.trim() {
            "AC•THOR" | "AC THOR" | "AC-THOR" | "AC•THOR 9s" | "AC THOR 9s" | "AC-THOR 9s" => {
                Some(Self::AcThor)
            }
            "AC ELWA-E" | "AC-ELWA-E" => Some(Self::AcElwaE),
            "ELWA 2" | "AC ELWA 2" | "ELWA-2" => Some(Self::Elwa2),
            _ => None,
        }
    }
}

/// Lookup key of a label.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Label {
    /// Generic `status` sensor, the meaning depends on the device.
    Status(DeviceFamily, i64),

    /// Code of a specific sensor.
    Sensor(SensorType, i64),

    /// Error of an external measurement device, numbered from 1.
    MeterError(u8),
}

impl Label {
    /// Decode a measurement device state bitmask, the lowest set bit wins.
    pub const fn from_meter_state(state: i64) -> Option<Self> {
        let mut bit = 0;
        while bit < 4 {
            if state & (1 << bit) != 0 {
                return Some(Self::MeterError(bit + 1));
            }
            bit += 1;
        }
        None
    }

    pub fn text(self, language: Language) -> Option<&'static str> {
        let (german, english) = self.translations()?;
        Some(match language {
            Language::German => german,
            Language::English => english,
        })
    }

    #[expect(clippy::match_same_arms)]
    const fn translations(self) -> Option<(&'static str, &'static str)> {
        use DeviceFamily::{AcElwaE, AcThor, Elwa2};
        use SensorType::{BoostActive, CloudState, Relay1, ScreenMode, UpdateState};

        let translations = match self {
            Self::Status(AcThor, 0) => ("Aus", "Off"),
            Self::Status(AcThor, 1..=8) => ("Gerätestart", "Device start-up"),
            Self::Status(AcThor, 9) => ("Betrieb", "Operation"),
            Self::Status(AcThor, 200) => ("Fehler", "Error"),
            Self::Status(AcThor, 201) => ("Übertemperatur", "Overtemperature"),
            Self::Status(AcThor, 202) => ("Temperaturfühler defekt", "Temperature sensor failure"),
            Self::Status(AcThor, 203) => ("Keine Ansteuerung", "No control signal"),

            Self::Status(AcElwaE | Elwa2, 0) => ("Aus", "Off"),
            Self::Status(AcElwaE | Elwa2, 1) => ("Standby", "Standby"),
            Self::Status(AcElwaE | Elwa2, 2) => ("Heizen", "Heating"),
            Self::Status(AcElwaE | Elwa2, 3) => ("Heizen beendet", "Heating finished"),
            Self::Status(AcElwaE | Elwa2, 4) => ("Warmwassersicherstellung", "Hot water boost"),
            Self::Status(AcElwaE | Elwa2, 5) => ("Maximaltemperatur erreicht", "Maximum temperature reached"),
            Self::Status(AcElwaE | Elwa2, 20..=29) => ("Fehler", "Error"),

            Self::Sensor(ScreenMode, 0) => ("Standby", "Standby"),
            Self::Sensor(ScreenMode, 1) => ("Heizen", "Heating"),
            Self::Sensor(ScreenMode, 2) => ("Warmwassersicherstellung", "Hot water boost"),
            Self::Sensor(ScreenMode, 3) => ("Heizen beendet", "Heating finished"),
            Self::Sensor(ScreenMode, 4) => ("Deaktiviert", "Disabled"),
            Self::Sensor(BoostActive | Relay1, 0) => ("Aus", "Off"),
            Self::Sensor(BoostActive | Relay1, 1) => ("Ein", "On"),
            Self::Sensor(CloudState, 0) => ("Nicht verbunden", "Disconnected"),
            Self::Sensor(CloudState, 1) => ("Verbinde", "Connecting"),
            Self::Sensor(CloudState, 2) => ("Verbunden", "Connected"),
            Self::Sensor(UpdateState, 0) => ("Aktuell", "Up to date"),
            Self::Sensor(UpdateState, 1) => ("Update verfügbar", "Update available"),
            Self::Sensor(UpdateState, 2) => ("Download läuft", "Downloading"),
            Self::Sensor(UpdateState, 3) => ("Installation läuft", "Installing"),

            Self::MeterError(1) => ("Keine Verbindung", "No connection"),
            Self::MeterError(2) => ("Zeitüberschreitung", "Timeout"),
            Self::MeterError(3) => ("Ungültige Daten", "Invalid data"),
            Self::MeterError(4) => ("Falscher Gerätetyp", "Wrong device type"),

            _ => return None,
        };
        Some(translations)
    }
}
