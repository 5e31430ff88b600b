use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

use clap::ValueEnum;

use bacport_client::PresentValue;
use bacport_core::types::ObjectType;
use bacport_datalink::BACNET_IP_PORT;

/// CLI-friendly names for the point types the client speaks.
///
/// Maps kebab-case names to [`ObjectType`] variants for clap parsing.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ObjectTypeArg {
    AnalogInput,
    AnalogValue,
    BinaryInput,
    BinaryValue,
}

impl ObjectTypeArg {
    pub const fn into_object_type(self) -> ObjectType {
        match self {
            Self::AnalogInput => ObjectType::AnalogInput,
            Self::AnalogValue => ObjectType::AnalogValue,
            Self::BinaryInput => ObjectType::BinaryInput,
            Self::BinaryValue => ObjectType::BinaryValue,
        }
    }
}

/// An object coordinate in `TYPE:INSTANCE` form, e.g. `analog-value:2`.
#[derive(Debug, Clone, Copy)]
pub struct ObjectRef {
    pub object_type: ObjectType,
    pub instance: u32,
}

impl FromStr for ObjectRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind, instance)) = s.split_once(':') else {
            return Err(format!("expected TYPE:INSTANCE, got \"{s}\""));
        };
        let kind = ObjectTypeArg::from_str(kind, true)
            .map_err(|_| format!("unknown object type \"{kind}\""))?;
        let instance = instance
            .parse()
            .map_err(|_| format!("bad object instance \"{instance}\""))?;
        Ok(Self {
            object_type: kind.into_object_type(),
            instance,
        })
    }
}

/// Parses `IP[:PORT]`, defaulting to the standard BACnet port.
pub fn parse_endpoint(raw: &str) -> Result<SocketAddr, String> {
    if let Ok(addr) = raw.parse::<SocketAddr>() {
        return Ok(addr);
    }
    raw.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, BACNET_IP_PORT))
        .map_err(|_| format!("bad endpoint \"{raw}\""))
}

/// Parses a commanded value against the point kind: a number for analog
/// points, on/off (or true/false, 1/0, active/inactive) for binary ones.
pub fn parse_value(object_type: ObjectType, raw: &str) -> Result<PresentValue, String> {
    if object_type.is_analog() {
        raw.parse::<f32>()
            .map(PresentValue::Analog)
            .map_err(|_| format!("analog points take a number, got \"{raw}\""))
    } else {
        match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "on" | "active" => Ok(PresentValue::Binary(true)),
            "0" | "false" | "off" | "inactive" => Ok(PresentValue::Binary(false)),
            _ => Err(format!("binary points take on or off, got \"{raw}\"")),
        }
    }
}
