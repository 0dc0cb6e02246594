use clap::{Parser, Subcommand};
use serde::Serialize;

use agrilogix::api::{RouteAPI, ShipmentAPI};
use agrilogix::config::Config;
use agrilogix::engine::Engine;
use agrilogix::entities::NewShipment;
use agrilogix::error::{invalid_state_error, Error};

/// Resolve produce shipment routes against the configured mapping providers
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the route summary between two places
    Route { source: String, destination: String },
    /// Create a shipment and print it with its route data
    Ship {
        /// Where the produce is picked up (e.g. "Farm A")
        #[arg(long)]
        source: String,
        #[arg(long)]
        destination: String,
        #[arg(long)]
        produce_id: String,
        /// ISO-8601 delivery date
        #[arg(long)]
        delivery_date: String,
    },
}

/// Output serialization is a local failure, not a bad provider payload.
fn to_json<T: Serialize>(value: &T) -> Result<String, Error> {
    serde_json::to_string_pretty(value).map_err(|err| {
        tracing::error!(error = %err, "failed to serialize output");
        invalid_state_error()
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let engine = Engine::from_config(&config)?;

    let output = match cli.command {
        Command::Route {
            source,
            destination,
        } => {
            let route = engine.resolve_route(&source, &destination).await;
            to_json(&route)?
        }
        Command::Ship {
            source,
            destination,
            produce_id,
            delivery_date,
        } => {
            let shipment = engine
                .create_shipment(NewShipment {
                    produce_id,
                    source,
                    destination,
                    delivery_date,
                    status: None,
                })
                .await?;
            to_json(&shipment)?
        }
    };

    println!("{}", output);

    Ok(())
}

#[test]
fn unserializable_output_is_invalid_state() {
    use agrilogix::error::INVALID_STATE_ERROR;
    use std::collections::HashMap;

    // JSON object keys must be strings
    let value: HashMap<(i32, i32), i32> = HashMap::from([((1, 2), 3)]);

    assert_eq!(to_json(&value).unwrap_err().code, INVALID_STATE_ERROR);
    assert!(to_json(&vec![1, 2]).is_ok());
}
