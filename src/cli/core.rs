use crate::cli;
use crate::cli::args::{Command, OutputFormat};
use chinventory::{Client, ClientBuilder, Result};
use log::info;

/*-------------------------------------------------------------------------------------------------
  Core functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Build the inventory client from CLI arguments
--------------------------------------------------------------------------------------*/

pub fn build_client(args: &cli::Args) -> Result<Client> {
    let mut builder = ClientBuilder::new();

    if let Some(url) = &args.url {
        builder.url(url);
    }
    if let Some(cache_dir) = &args.cache_dir {
        builder.cache_dir(cache_dir);
    }
    if let Some(credentials) = &args.credentials {
        builder.credentials_file(credentials);
    }

    builder.build()
}

/*--------------------------------------------------------------------------------------
  Run the selected command
--------------------------------------------------------------------------------------*/

pub fn run(args: &cli::Args) -> Result<()> {
    let client = build_client(args)?;

    match &args.command {
        Command::Networks { output, csv_file } => {
            let entities = client.network_entities()?;
            cli::log::network_entities(&entities);

            match output {
                OutputFormat::Table => cli::output::entity_table(&entities),
                OutputFormat::Cidr => cli::output::cidrs(&entities),
                OutputFormat::Netmask => cli::output::netmasks(&entities),
                OutputFormat::Json => cli::output::sink_records(&entities)?,
            }

            if let Some(csv_file) = csv_file {
                cli::csv::save(&entities, csv_file)?;
                info!("Saved {} network records to {:?}", entities.len(), csv_file);
            }
        }
        Command::Search { asset } => cli::output::pretty_json(&client.search(*asset)?)?,
        Command::Info { asset_name } => {
            cli::output::pretty_json(&client.object_info(asset_name)?)?
        }
        Command::Available => cli::output::names(&client.available_objects()?),
        Command::RefreshInfo { provider } => {
            let names = client.refresh_object_info(provider.prefix())?;
            info!("Refreshed object info for {} object type(s)", names.len());
            cli::output::names(&names);
        }
        Command::Cache => cli::output::cache_table(&client.cache_status()?),
    }

    Ok(())
}
