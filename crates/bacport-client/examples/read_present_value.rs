//! Finds a device by instance and reads one object's present value.
//!
//! ```sh
//! cargo run --example read_present_value -- 1234 analog-value 2
//! ```

use bacport_client::{BacnetClient, PresentValue};
use bacport_core::types::ObjectType;

fn parse_object_type(name: &str) -> Option<ObjectType> {
    match name {
        "analog-input" => Some(ObjectType::AnalogInput),
        "analog-value" => Some(ObjectType::AnalogValue),
        "binary-input" => Some(ObjectType::BinaryInput),
        "binary-value" => Some(ObjectType::BinaryValue),
        _ => None,
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let device_instance: u32 = args
        .next()
        .ok_or("usage: read_present_value <device-instance> <object-type> <instance>")?
        .parse()?;
    let object_type = parse_object_type(&args.next().ok_or("missing object type")?)
        .ok_or("object type must be analog-input, analog-value, binary-input or binary-value")?;
    let instance: u32 = args.next().ok_or("missing object instance")?.parse()?;

    let client = BacnetClient::new().await?;
    let Some(device) = client.discover_instance(device_instance).await? else {
        println!("device {device_instance} did not answer");
        return Ok(());
    };
    println!("found {device}");

    let result = client
        .read_present_value(&device, object_type, instance)
        .await?;
    match result.value {
        Some(PresentValue::Analog(v)) => println!("present value: {v}"),
        Some(PresentValue::Binary(v)) => println!("present value: {v}"),
        None => println!("no usable answer from the device"),
    }
    Ok(())
}
