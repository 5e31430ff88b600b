use std::net::SocketAddr;
use std::time::Duration;

use clap::Parser;

use bacport_client::{BacnetClient, ClientConfig};

#[derive(Parser, Debug)]
#[command(
    name = "bacnet-whois",
    about = "Sweep the network for BACnet devices, or look one up by instance"
)]
struct Args {
    /// Look up a single device instance instead of sweeping.
    #[arg(long)]
    instance: Option<u32>,
    /// Seconds to keep waiting after the last reply.
    #[arg(long, default_value_t = 3)]
    timeout_secs: u64,
    /// Broadcast target, for networks where the default subnet broadcast
    /// is wrong.
    #[arg(long)]
    broadcast: Option<SocketAddr>,
    /// Print results as JSON.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let window = Duration::from_secs(args.timeout_secs);
    let config = ClientConfig::default()
        .with_discovery_idle_window(window)
        .with_targeted_budget(window);
    let client = match args.broadcast {
        Some(target) => {
            let transport = bacport_datalink::BacnetIpTransport::bind_to(
                "0.0.0.0:0".parse()?,
                format!("0.0.0.0:{}", target.port()).parse()?,
                target,
            )
            .await?;
            BacnetClient::with_config(transport, config)
        }
        None => BacnetClient::new_with_config(config).await?,
    };

    if let Some(instance) = args.instance {
        match client.discover_instance(instance).await? {
            Some(device) => {
                if args.json {
                    println!("{}", serde_json::to_string_pretty(&device)?);
                } else {
                    println!("{device}");
                }
            }
            None => {
                eprintln!("device {instance} did not answer");
                std::process::exit(1);
            }
        }
        return Ok(());
    }

    let devices = client.discover().await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&devices)?);
    } else if devices.is_empty() {
        println!("no devices answered");
    } else {
        for (i, device) in devices.iter().enumerate() {
            println!("{i}: {device}");
        }
    }
    Ok(())
}
