//! Cache CloudHealth inventory API responses on disk and derive the deduplicated list of network
//! CIDR blocks (VPCs, subnets, and security group rule ranges) in use across an estate.
//!
//! ```no_run
//! let client = chinventory::ClientBuilder::new().build()?;
//! let entities = client.network_entities()?;
//! for entity in &entities {
//!     println!("{:<20} {:<24} {}", entity.cidr, entity.id, entity.name);
//! }
//! # Ok::<(), chinventory::Error>(())
//! ```

/*-------------------------------------------------------------------------------------------------
  Library Modules
-------------------------------------------------------------------------------------------------*/

mod core;

/*-------------------------------------------------------------------------------------------------
  Library Interface
-------------------------------------------------------------------------------------------------*/

pub use crate::core::assets::{ApiRequest, AssetSpec, AssetType, DAY, HOUR, WEEK};
pub use crate::core::cache::{CacheStatus, ResponseCache};
pub use crate::core::client::{get_network_entities, Client, ClientBuilder};
pub use crate::core::credentials::Credentials;
pub use crate::core::entity::{EntitySource, NetworkEntity, SinkRecord};
pub use crate::core::errors::{Error, Result};
pub use crate::core::extract::{extract, records, split_ip_ranges};
pub use crate::core::fetcher::{ApiFetcher, HttpFetcher};

/*--------------------------------------------------------------------------------------
  Re-exports
--------------------------------------------------------------------------------------*/

pub use ipnetwork;
pub use serde_json;
