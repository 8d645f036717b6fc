use chinventory::AssetType;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/*-------------------------------------------------------------------------------------------------
  Command Line Interface (CLI) Arguments
-------------------------------------------------------------------------------------------------*/

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Query cached CloudHealth inventory and the network CIDRs in use.",
    long_about = None
)]
pub struct Args {
    /// Inventory API base URL [env: CHINVENTORY_URL]
    #[arg(long, global = true)]
    pub url: Option<String>,

    /// Directory holding cached API responses [env: CHINVENTORY_CACHE_DIR]
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// INI file with the API key under [default] [env: CHINVENTORY_CREDENTIALS_FILE]
    #[arg(long, global = true)]
    pub credentials: Option<PathBuf>,

    /// Logging verbosity
    #[command(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the CIDR blocks used by VPCs, subnets, and security group rules
    Networks {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        output: OutputFormat,

        /// Save the network records to a CSV file
        #[arg(long = "csv")]
        csv_file: Option<PathBuf>,
    },

    /// Print the search results for an asset type (e.g. vpc, security-group-rule)
    Search { asset: AssetType },

    /// Print the field description of an object type (e.g. AwsVpc)
    Info { asset_name: String },

    /// List the object types the inventory API can describe
    Available,

    /// Refresh the cached field descriptions of every object type for a provider
    RefreshInfo {
        #[arg(value_enum)]
        provider: Provider,
    },

    /// Show the age and freshness of every cached search
    Cache,
}

/*--------------------------------------------------------------------------------------
  Output Format
--------------------------------------------------------------------------------------*/

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Table of CIDRs and the resources they are attributed to
    Table,
    /// List of CIDRs
    Cidr,
    /// List of networks in network mask format (n.n.n.n m.m.m.m)
    Netmask,
    /// JSON network records
    Json,
}

/*--------------------------------------------------------------------------------------
  Provider
--------------------------------------------------------------------------------------*/

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provider {
    Aws,
    Azure,
}

impl Provider {
    /// Object-name prefix of the provider's object types.
    pub fn prefix(&self) -> &'static str {
        match self {
            Provider::Aws => "aws",
            Provider::Azure => "azure",
        }
    }
}
