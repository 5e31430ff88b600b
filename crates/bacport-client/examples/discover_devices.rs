//! Sweeps the local network for BACnet devices and prints what answers.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example discover_devices
//! ```

use bacport_client::BacnetClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let client = BacnetClient::new().await?;
    println!("sweeping for devices...");

    let devices = client.discover().await?;
    if devices.is_empty() {
        println!("no devices answered");
        return Ok(());
    }
    for device in &devices {
        println!("  {device}");
    }
    Ok(())
}
