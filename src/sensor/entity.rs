use crate::{
    coordinator::{Fields, Section, Snapshot},
    prelude::*,
    sensor::{
        Descriptor,
        SensorType,
        Unit,
        label::{DeviceFamily, Label, Language},
        value::{State, Value},
    },
};

pub const DOMAIN: &str = "mypv";
pub const MANUFACTURER: &str = "MYPV";

/// Why a sensor value could not be read from the snapshot.
#[derive(Debug, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ExtractError {
    #[display("section `{_0}` is unavailable")]
    SectionUnavailable(#[error(not(source))] Section),

    #[display("`{_0}` is not found in section `{_1}`")]
    KeyNotFound(#[error(not(source))] &'static str, #[error(not(source))] Section),

    #[display("`{_0}` is not an integer")]
    NotInteger(#[error(not(source))] &'static str),

    #[display("`{_0}` is out of range")]
    Overflow(#[error(not(source))] &'static str),
}

/// Device identity, captured once from `mypv_dev.jsn`.
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceIdentity {
    pub serial_number: String,
    pub firmware_version: String,
    pub model: String,
}

impl TryFrom<&Fields> for DeviceIdentity {
    type Error = Error;

    fn try_from(info: &Fields) -> Result<Self> {
        let get = |key: &str| {
            info.get(key)
                .map(|value| Value::from(value).to_string())
                .with_context(|| format!("device info has no `{key}`"))
        };
        Ok(Self { serial_number: get("sn")?, firmware_version: get("fwversion")?, model: get("device")? })
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeviceClass {
    Power,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StateClass {
    Measurement,
}

/// Device registry entry shared by all entities of one device.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceInfo<'a> {
    pub identifier: (&'static str, &'a str),
    pub manufacturer: &'static str,
    pub model: &'a str,
    pub name: &'a str,
    pub sw_version: &'a str,
}

/// One sensor of one device, remembering its last successfully read value.
#[must_use]
pub struct SensorEntity {
    sensor_type: SensorType,
    device_name: String,
    device: DeviceIdentity,
    family: Option<DeviceFamily>,
    language: Language,
    last_value: Option<Value>,
}

impl SensorEntity {
    pub fn new(
        sensor_type: SensorType,
        device_name: impl Into<String>,
        device: DeviceIdentity,
        language: Language,
    ) -> Self {
        let family = DeviceFamily::from_model(&device.model);
        if family.is_none() {
            warn!(model = %device.model, "unknown model, status codes will not be labelled");
        }
        Self { sensor_type, device_name: device_name.into(), device, family, language, last_value: None }
    }

    const fn descriptor(&self) -> &'static Descriptor {
        self.sensor_type.descriptor()
    }

    pub const fn name(&self) -> &'static str {
        self.descriptor().name
    }

    pub fn unique_id(&self) -> String {
        format!("{DOMAIN} {} {}", self.device.serial_number, self.sensor_type)
    }

    pub const fn unit(&self) -> Option<Unit> {
        self.descriptor().unit
    }

    pub const fn icon(&self) -> &'static str {
        self.descriptor().icon
    }

    pub const fn device_class(&self) -> Option<DeviceClass> {
        match self.sensor_type {
            SensorType::Power => Some(DeviceClass::Power),
            _ => None,
        }
    }

    pub const fn state_class(&self) -> Option<StateClass> {
        match self.sensor_type {
            SensorType::Power => Some(StateClass::Measurement),
            _ => None,
        }
    }

    pub fn device_info(&self) -> DeviceInfo<'_> {
        DeviceInfo {
            identifier: (DOMAIN, &self.device.serial_number),
            manufacturer: MANUFACTURER,
            model: &self.device.model,
            name: &self.device_name,
            sw_version: &self.device.firmware_version,
        }
    }

    /// Current state of the sensor.
    ///
    /// Falls back to the last known value when the snapshot does not provide one.
    #[instrument(skip_all, fields(sensor = %self.sensor_type))]
    pub fn value_for(&mut self, snapshot: &Snapshot) -> Option<State> {
        let value = match extract(self.sensor_type, snapshot) {
            Ok(value) => {
                self.last_value = Some(value.clone());
                value
            }
            Err(error @ ExtractError::KeyNotFound(..)) => {
                error!("{error}, you should remove the sensor from the configuration");
                self.last_value.clone()?
            }
            Err(error) => {
                warn!("{error}, using the last known value");
                self.last_value.clone()?
            }
        };
        Some(present(self.sensor_type, value, self.family, self.language))
    }
}

/// Read the raw value, computing the composite ones.
pub fn extract(sensor_type: SensorType, snapshot: &Snapshot) -> Result<Value, ExtractError> {
    let section = sensor_type.descriptor().section;
    let fields = snapshot.get(section).ok_or(ExtractError::SectionUnavailable(section))?;
    let get = |key: &'static str| {
        fields.get(key).map(Value::from).ok_or(ExtractError::KeyNotFound(key, section))
    };
    let get_integer = |key: &'static str| -> Result<i64, ExtractError> {
        get(key)?.to_integer().ok_or(ExtractError::NotInteger(key))
    };

    let value = get(sensor_type.key())?;
    if sensor_type == SensorType::PowerAct {
        // The relay switches the nominal load on top of the regulated power.
        let power = value.to_integer().ok_or(ExtractError::NotInteger(sensor_type.key()))?;
        let power = get_integer("rel1_out")?
            .checked_mul(get_integer("load_nom")?)
            .and_then(|relay_power| relay_power.checked_add(power))
            .ok_or(ExtractError::Overflow(sensor_type.key()))?;
        return Ok(Value::Integer(power));
    }
    Ok(value)
}

/// Scale the fixed-point units and attach the labels.
pub fn present(
    sensor_type: SensorType,
    value: Value,
    family: Option<DeviceFamily>,
    language: Language,
) -> State {
    let is_scaled = sensor_type != SensorType::TempChip;
    if let Some(divisor) = sensor_type.descriptor().unit.and_then(Unit::divisor)
        && is_scaled
    {
        return match value.to_float() {
            Some(value) => State::Value(Value::Float(value / divisor)),
            None => {
                warn!(sensor = %sensor_type, %value, "cannot scale a non-numeric value");
                State::Value(value)
            }
        };
    }

    let code = match value {
        Value::Float(float) if float.fract() != 0.0 => None,
        _ => value.to_integer(),
    };
    let Some(code) = code else {
        return State::Value(value);
    };
    let label = if sensor_type == SensorType::Status {
        family.map(|family| Label::Status(family, code))
    } else if sensor_type.is_meter_state() {
        Label::from_meter_state(code)
    } else {
        Some(Label::Sensor(sensor_type, code))
    };
    match label.and_then(|label| label.text(language)) {
        Some(label) => State::Labelled { value, label },
        None => State::Value(value),
    }
}
