//! Inventory example: read everything the driver knows about a switch
//!
//! Connects to a Cumulus Linux switch and prints its system facts,
//! interfaces, VLANs, VRFs, bonds and VNIs. Nothing is changed.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example inventory -- --host leaf01 --user cumulus --password CumulusLinux!
//! ```
//!
//! Set `RUST_LOG=debug` to see every command sent to the device.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use cumulus_driver::{DriverBuilder, HostKeyVerification, InterfaceMode, VxlanBinding};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut builder = DriverBuilder::new(&args.host)
        .port(args.port)
        .username(&args.user)
        .timeout(Duration::from_secs(args.timeout));
    if args.insecure {
        builder = builder.host_key_verification(HostKeyVerification::Disabled);
    }
    if let Some(password) = &args.password {
        builder = builder.password(password);
    } else if let Some(key_path) = &args.key {
        builder = builder.private_key(key_path);
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    }

    let mut driver = builder.build()?;
    println!("Connecting to {}:{}...", args.host, args.port);
    driver.open().await?;

    let system = driver.system_info().await?;
    println!(
        "{} ({}), {}",
        system.hostname().unwrap_or("?"),
        system.model().unwrap_or("unknown model"),
        system
            .version()
            .map(|v| format!("Cumulus Linux {}.{}.{}", v.major, v.minor, v.patch))
            .unwrap_or_else(|| "unknown release".to_string())
    );
    println!("EVPN multihoming: {}", system.supports_evpn_mh());

    println!("\nInterfaces:");
    for interface in driver.interface_read(None).await?.into_vec() {
        let detail = match &interface.mode {
            InterfaceMode::Routed(Some(attrs)) => attrs
                .addresses
                .iter()
                .map(|a| a.address.to_string())
                .collect::<Vec<_>>()
                .join(", "),
            InterfaceMode::Aggregated => format!("in {}", interface.parent.as_deref().unwrap_or("?")),
            _ => String::new(),
        };
        println!("  {:<12} {:<10} {}", interface.name, interface.mode.as_str(), detail);
    }

    let vlans: Vec<String> = driver
        .vlan_read(None)
        .await?
        .into_vec()
        .iter()
        .map(|v| v.id.to_string())
        .collect();
    println!("\nVLANs: {}", vlans.join(", "));

    let vrfs: Vec<String> = driver
        .vrf_read(None)
        .await?
        .into_vec()
        .into_iter()
        .map(|v| v.name)
        .collect();
    println!("VRFs: {}", vrfs.join(", "));

    println!("\nBonds:");
    for lag in driver.lag_read(None).await?.into_vec() {
        println!(
            "  {:<10} [{}] esi={}",
            lag.name,
            lag.members.join(", "),
            lag.evpn_esi.as_deref().unwrap_or("-")
        );
    }

    println!("\nVNIs:");
    for vxlan in driver.vxlan_read(None).await?.into_vec() {
        let binding = match &vxlan.binding {
            VxlanBinding::Layer2 { vlan } => format!("vlan {vlan}"),
            VxlanBinding::Layer3 { vrf } => format!("vrf {vrf}"),
        };
        println!("  {:<8} L{} {:<20} rd {}", vxlan.id, vxlan.layer(), binding, vxlan.route_distinguisher);
    }

    driver.close().await?;
    Ok(())
}

/// Simple argument parser (avoiding external dependencies)
struct Args {
    host: String,
    port: u16,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    timeout: u64,
    insecure: bool,
}

impl Args {
    fn parse() -> Self {
        let mut parsed = Self {
            host: "localhost".to_string(),
            port: 22,
            user: "cumulus".to_string(),
            password: None,
            key: None,
            timeout: 30,
            insecure: false,
        };

        let mut args = env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--host" | "-h" => parsed.host = args.next().unwrap_or(parsed.host),
                "--port" | "-p" => {
                    parsed.port = args.next().and_then(|p| p.parse().ok()).unwrap_or(22)
                }
                "--user" | "-u" => parsed.user = args.next().unwrap_or(parsed.user),
                "--password" | "-P" => parsed.password = args.next(),
                "--key" | "-k" => parsed.key = args.next().map(PathBuf::from),
                "--timeout" | "-t" => {
                    parsed.timeout = args.next().and_then(|t| t.parse().ok()).unwrap_or(30)
                }
                "--insecure" => parsed.insecure = true,
                "--help" => {
                    println!(
                        "usage: inventory [--host H] [--port P] [--user U] \
                         (--password PASS | --key PATH) [--timeout SECS] [--insecure]"
                    );
                    std::process::exit(0);
                }
                other => eprintln!("Unknown argument: {other}"),
            }
        }
        parsed
    }
}
