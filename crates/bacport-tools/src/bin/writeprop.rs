use std::net::SocketAddr;

use clap::Parser;

use bacport_client::{BacnetClient, Device, DEFAULT_WRITE_PRIORITY};
use bacport_tools::{parse_endpoint, parse_value, ObjectRef};

#[derive(Parser, Debug)]
#[command(name = "bacnet-writeprop", about = "Command one object's present value")]
struct Args {
    /// Device endpoint, IP with optional port.
    #[arg(long, value_parser = parse_endpoint)]
    addr: SocketAddr,
    /// Object coordinate, e.g. binary-value:5.
    #[arg(long)]
    object: ObjectRef,
    /// Value to write: a number for analog points, on/off for binary.
    #[arg(long)]
    value: String,
    /// Command priority, 1 (highest) to 16.
    #[arg(long, default_value_t = DEFAULT_WRITE_PRIORITY)]
    priority: u8,
    /// Skip the out-of-service fallback; some controllers misbehave on it.
    #[arg(long)]
    no_fallback: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let value = parse_value(args.object.object_type, &args.value)?;
    let client = BacnetClient::new().await?;
    let device = Device::ip(args.addr, 0);

    let acknowledged = if args.no_fallback {
        client
            .write_present_value_no_fallback(
                &device,
                args.object.object_type,
                args.object.instance,
                value,
                args.priority,
            )
            .await?
    } else {
        client
            .write_present_value_with_priority(
                &device,
                args.object.object_type,
                args.object.instance,
                value,
                args.priority,
            )
            .await?
    };

    if acknowledged {
        println!("acknowledged");
    } else {
        eprintln!("no ack from {}", args.addr);
        std::process::exit(1);
    }
    Ok(())
}
