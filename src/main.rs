use std::error::Error;
use subnet_planner::config::Config;
use subnet_planner::output::{plan_print, print_outputs};
use subnet_planner::provision::{DryRunClient, StackTemplate};
use subnet_planner::{plan_network, resolve_zones};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Do as little as possible in main.rs as it can't contain any tests
    log4rs::init_file("log4rs.yml", Default::default()).expect("Error initializing log4rs");
    log::info!("#Start main()");

    // Phase 1: external inputs, blocking process and file I/O
    let (config, zones) = tokio::task::spawn_blocking(|| -> Result<_, Box<dyn Error + Send + Sync>> {
        let config = Config::from_env()?;
        let zones = resolve_zones(&config)?;
        Ok((config, zones))
    })
    .await?
    .map_err(|e| e as Box<dyn Error>)?;

    // Phase 2: pure planning
    let network = plan_network(&config, &zones)?;
    let template = StackTemplate::new(&config)?;
    plan_print(&network.plan, &network.assignment)?;

    // Phase 3: declare the stack
    let mut client = DryRunClient::new();
    let outputs = template.apply(&mut client, network.vpc_block(), &network.assignment)?;
    log::info!("Declared {} resources", client.declared().len());
    print_outputs(&outputs)?;

    Ok(())
}
