/*-------------------------------------------------------------------------------------------------
  Core Modules
-------------------------------------------------------------------------------------------------*/

pub mod assets;
pub mod cache;
pub mod client;
pub mod credentials;
pub mod entity;
pub mod errors;
pub mod extract;
pub mod fetcher;
