use std::net::SocketAddr;

use clap::Parser;

use bacport_client::{BacnetClient, Device, PresentValue};
use bacport_tools::{parse_endpoint, ObjectRef};

#[derive(Parser, Debug)]
#[command(name = "bacnet-readprop", about = "Read one object's present value")]
struct Args {
    /// Device endpoint, IP with optional port.
    #[arg(long, value_parser = parse_endpoint)]
    addr: SocketAddr,
    /// Object coordinate, e.g. analog-value:2.
    #[arg(long)]
    object: ObjectRef,
    /// Print the result as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let client = BacnetClient::new().await?;
    let device = Device::ip(args.addr, 0);
    let result = client
        .read_present_value(&device, args.object.object_type, args.object.instance)
        .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        if result.value.is_none() {
            std::process::exit(1);
        }
        return Ok(());
    }

    match result.value {
        Some(PresentValue::Analog(v)) => println!("{v}"),
        Some(PresentValue::Binary(v)) => println!("{}", if v { "on" } else { "off" }),
        None => {
            eprintln!("no usable answer from {}", args.addr);
            std::process::exit(1);
        }
    }
    Ok(())
}
