use anyhow::{Context as _, Result};
use circuit_core::fixtures::load_fixtures;
use circuit_visualizer::{Context, router};
use clap::Parser;
use log::info;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: IpAddr,
    #[arg(short, long, env = "CIRCUIT_VISUALIZER_PORT", default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let circuits = load_fixtures()?;
    info!("Loaded {} sample circuits", circuits.len());
    let cx = Context::new(circuits);

    let addr = SocketAddr::new(args.host, args.port);
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to listen on {addr}"))?;
    print_banner(listener.local_addr()?);
    axum::serve(listener, router(cx)).await?;
    Ok(())
}

fn print_banner(addr: SocketAddr) {
    let rule = "=".repeat(50);
    println!("{rule}");
    println!("Circuit Visualizer backend starting...");
    println!("{rule}");
    println!("\nServer running at: http://{addr}");
    println!("\nAvailable endpoints:");
    println!("   GET  /                         - Main web interface");
    println!("   GET  /api/circuits             - List all circuits");
    println!("   GET  /api/circuit/<id>         - Get specific circuit");
    println!("   GET  /api/circuit/<id>/layout  - Row layout of a circuit");
    println!("   POST /api/parse                - Parse pasted model output");
    println!("\nOpen your browser and go to: http://{addr}");
    println!("{rule}");
    println!();
}
