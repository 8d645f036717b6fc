use crate::core::assets::{ApiRequest, AssetType, WEEK};
use crate::core::cache::{CacheStatus, ResponseCache};
use crate::core::credentials::Credentials;
use crate::core::entity::NetworkEntity;
use crate::core::errors::{Error, Result};
use crate::core::extract::{extract, records};
use crate::core::fetcher::{ApiFetcher, HttpFetcher};
use log::{info, warn};
use serde_json::Value;
use std::env;
use std::path::{Path, PathBuf};

/*-------------------------------------------------------------------------------------------------
  Simple Interface
-------------------------------------------------------------------------------------------------*/

/// _**Simple library interface**_ builds a [Client] from the environment and default
/// configuration, then returns the network entities derived from the VPC, subnet, and security
/// group rule inventories.
pub fn get_network_entities() -> Result<Vec<NetworkEntity>> {
    Client::new()?.network_entities()
}

/*-------------------------------------------------------------------------------------------------
  Client Builder
-------------------------------------------------------------------------------------------------*/

/// A builder for the [Client] struct.
///
/// ```
/// # let dir = tempfile::tempdir().unwrap();
/// let client = chinventory::ClientBuilder::default()
///     .url("https://chapi.example.com")
///     .cache_dir(dir.path())
///     .credentials(chinventory::Credentials::new("0123456789abcdef"))
///     .build()?;
///
/// assert_eq!(client.cache().cache_dir(), dir.path());
/// # Ok::<(), chinventory::Error>(())
/// ```
///
/// The [ClientBuilder::new] method attempts to source configuration values from environment
/// variables when set and uses default values when the environment variables are not set.
/// [ClientBuilder::default] ignores the environment.
pub struct ClientBuilder {
    url: String,
    cache_dir: PathBuf,
    credentials_file: PathBuf,
    credentials: Option<Credentials>,
    fetcher: Option<Box<dyn ApiFetcher>>,
}

/*--------------------------------------------------------------------------------------
  Client Builder Implementation
--------------------------------------------------------------------------------------*/

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            url: "https://chapi.cloudhealthtech.com".to_string(),
            cache_dir: dirs::cache_dir()
                .map(|cache_dir| cache_dir.join("chinventory"))
                .unwrap_or_else(|| PathBuf::from("ch_cache")),
            credentials_file: Credentials::default_path()
                .unwrap_or_else(|| PathBuf::from(".cloudhealth")), // ${HOME}/.cloudhealth
            credentials: None,
            fetcher: None,
        }
    }
}

impl ClientBuilder {
    /// Create a new [ClientBuilder] reading initial configuration values from
    /// environment variables when set:
    /// - `CHINVENTORY_URL`
    /// - `CHINVENTORY_CACHE_DIR`
    /// - `CHINVENTORY_CREDENTIALS_FILE`
    pub fn new() -> Self {
        let default = ClientBuilder::default();

        Self {
            url: get_env_var("CHINVENTORY_URL", default.url),
            cache_dir: get_env_var("CHINVENTORY_CACHE_DIR", default.cache_dir),
            credentials_file: get_env_var(
                "CHINVENTORY_CREDENTIALS_FILE",
                default.credentials_file,
            ),
            ..default
        }
    }

    /*-------------------------------------------------------------------------
      Setters
    -------------------------------------------------------------------------*/

    /// Set the inventory API base URL; defaults to `https://chapi.cloudhealthtech.com`.
    pub fn url(&mut self, url: &str) -> &mut Self {
        self.url = url.to_string();
        self
    }

    /// Set the directory holding cached API responses; defaults to the platform cache
    /// directory (`~/.cache/chinventory` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(&mut self, cache_dir: P) -> &mut Self {
        self.cache_dir = cache_dir.as_ref().to_path_buf();
        self
    }

    /// Set the INI file the API key is read from; defaults to `${HOME}/.cloudhealth`.
    pub fn credentials_file<P: AsRef<Path>>(&mut self, credentials_file: P) -> &mut Self {
        self.credentials_file = credentials_file.as_ref().to_path_buf();
        self
    }

    /// Use these credentials instead of reading the credentials file.
    pub fn credentials(&mut self, credentials: Credentials) -> &mut Self {
        self.credentials = Some(credentials);
        self
    }

    /// Replace the HTTP fetcher.
    pub fn fetcher(&mut self, fetcher: Box<dyn ApiFetcher>) -> &mut Self {
        self.fetcher = Some(fetcher);
        self
    }

    /*-------------------------------------------------------------------------
      Build Method
    -------------------------------------------------------------------------*/

    /// Build the [Client]; fails when the credentials cannot be loaded.
    pub fn build(&mut self) -> Result<Client> {
        let credentials = match self.credentials.take() {
            Some(credentials) => credentials,
            None => Credentials::from_file(&self.credentials_file)?,
        };
        let fetcher = self
            .fetcher
            .take()
            .unwrap_or_else(|| Box::new(HttpFetcher::new(&self.url)));

        Ok(Client {
            credentials,
            cache: ResponseCache::new(&self.cache_dir),
            fetcher,
        })
    }
}

/*-------------------------------------------------------------------------------------------------
  Client
-------------------------------------------------------------------------------------------------*/

/// Process-wide context for inventory lookups: the credentials, the response cache, and the
/// fetcher called on cache misses.
///
/// ```no_run
/// let client = chinventory::Client::new()?;
/// for entity in client.network_entities()? {
///     println!("{} {}", entity.cidr, entity.name);
/// }
/// # Ok::<(), chinventory::Error>(())
/// ```
pub struct Client {
    credentials: Credentials,
    cache: ResponseCache,
    fetcher: Box<dyn ApiFetcher>,
}

/*--------------------------------------------------------------------------------------
  Client Implementation
--------------------------------------------------------------------------------------*/

impl Client {
    /// Build a client from the environment and default configuration; see [ClientBuilder::new].
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    /*-------------------------------------------------------------------------
      Inventory Lookups
    -------------------------------------------------------------------------*/

    /// Return the cached payload for `request`, fetching it when the cache is
    /// missing or older than `ttl_seconds`.
    pub fn get(&self, request: &ApiRequest, ttl_seconds: u64) -> Result<Value> {
        self.cache
            .get_or_fetch(&request.cache_key(), ttl_seconds, || {
                self.fetcher.fetch(request, &self.credentials)
            })
    }

    /// Search for every asset of `asset_type`, cached for the asset type's TTL.
    pub fn search(&self, asset_type: AssetType) -> Result<Value> {
        self.get(&asset_type.request(), asset_type.spec().ttl_seconds)
    }

    /// Field description of an object type, cached for a week.
    pub fn object_info(&self, asset_name: &str) -> Result<Value> {
        let request = ApiRequest::ObjectInfo {
            asset_name: asset_name.to_string(),
        };
        self.get(&request, WEEK)
    }

    /// Names of the object types the API can describe, cached for a week.
    pub fn available_objects(&self) -> Result<Vec<String>> {
        let payload = self.get(&ApiRequest::Available, WEEK)?;
        object_names(&payload)
    }

    /// Refresh the object info of every available object whose name starts with `prefix`
    /// (case-insensitive), e.g. `aws` or `azure`. Returns the object names.
    pub fn refresh_object_info(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = prefix.to_lowercase();
        let names: Vec<String> = self
            .available_objects()?
            .into_iter()
            .filter(|name| name.to_lowercase().starts_with(&prefix))
            .collect();

        if names.is_empty() {
            warn!("No available objects start with {:?}", prefix);
        }

        for name in &names {
            self.object_info(name)?;
        }

        Ok(names)
    }

    /// Derive the network entities from the VPC, subnet, and security group rule inventories.
    pub fn network_entities(&self) -> Result<Vec<NetworkEntity>> {
        let vpcs = self.search(AssetType::Vpc)?;
        let subnets = self.search(AssetType::VpcSubnet)?;
        let security_group_rules = self.search(AssetType::SecurityGroupRule)?;

        extract(
            records(&vpcs)?,
            records(&subnets)?,
            records(&security_group_rules)?,
        )
    }

    /// Cache status of every asset type's search results.
    pub fn cache_status(&self) -> Result<Vec<(AssetType, Option<CacheStatus>)>> {
        AssetType::all()
            .map(|asset_type| {
                let status = self
                    .cache
                    .status(&asset_type.request().cache_key(), asset_type.spec().ttl_seconds)?;
                Ok((asset_type, status))
            })
            .collect()
    }
}

/*-------------------------------------------------------------------------------------------------
  Helper Functions
-------------------------------------------------------------------------------------------------*/

/// Get and parse an environment variable value or return a default value.
fn get_env_var<T: std::str::FromStr>(env_var: &str, default: T) -> T {
    env::var(env_var)
        .ok()
        .and_then(|value| {
            value
                .parse::<T>()
                .inspect(|_| info!("Using {}: {}", env_var, value))
                .inspect_err(|_| warn!("Invalid {}: {}", env_var, value))
                .ok()
        })
        .unwrap_or(default)
}

/// Object names from the available-objects payload: a list of names or a mapping keyed by name.
fn object_names(payload: &Value) -> Result<Vec<String>> {
    match payload {
        Value::Object(map) => Ok(map.keys().cloned().collect()),
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    Error::MalformedPayload(format!("expected an object name, found {item}"))
                })
            })
            .collect(),
        other => Err(Error::MalformedPayload(format!(
            "expected a list of object names, found {other}"
        ))),
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::log_error;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::env::VarError;
    use std::rc::Rc;
    use tempfile::TempDir;
    use test_log::test;

    /*-------------------------------------------------------------------------
      Test Fetcher
    -------------------------------------------------------------------------*/

    /// Serves canned payloads by cache key and records every request.
    struct TestFetcher {
        payloads: HashMap<String, Value>,
        requests: Rc<RefCell<Vec<String>>>,
    }

    impl ApiFetcher for TestFetcher {
        fn fetch(&self, request: &ApiRequest, credentials: &Credentials) -> Result<Value> {
            assert_eq!(credentials.api_key(), "test-key");
            let key = request.cache_key();
            self.requests.borrow_mut().push(key.clone());
            self.payloads
                .get(&key)
                .cloned()
                .ok_or_else(|| Error::MalformedPayload(format!("no payload for {key}")))
        }
    }

    fn test_client(payloads: Vec<(&str, Value)>) -> (Client, Rc<RefCell<Vec<String>>>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let requests = Rc::new(RefCell::new(Vec::new()));
        let fetcher = TestFetcher {
            payloads: payloads
                .into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
            requests: Rc::clone(&requests),
        };

        let client = ClientBuilder::default()
            .cache_dir(temp_dir.path())
            .credentials(Credentials::new("test-key"))
            .fetcher(Box::new(fetcher))
            .build()
            .unwrap();

        (client, requests, temp_dir)
    }

    fn inventory() -> Vec<(&'static str, Value)> {
        vec![
            (
                "AwsVpc",
                json!([{"vpc_id": "vpc-1", "name": "A", "cidr_block": "10.0.0.0/16"}]),
            ),
            (
                "AwsVpcSubnet",
                json!([
                    {"subnet_id": "sub-1", "name": "B", "cidr_block": "10.0.1.0/24"},
                    {"subnet_id": "sub-2", "name": "dup", "cidr_block": "10.0.0.0/16"},
                ]),
            ),
            (
                "AwsSecurityGroupRule",
                json!([{
                    "ip_ranges": "192.168.0.0/24, All",
                    "from_port": 443,
                    "to_port": 443,
                    "protocol": "tcp",
                    "security_group": {"group_id": "sg-1", "name": "web"},
                }]),
            ),
        ]
    }

    /*-------------------------------------------------------------------------
      Test Environment Variable Configuration
    -------------------------------------------------------------------------*/

    #[test]
    fn test_environment_variable_configuration() {
        let test_env_vars = [
            ("CHINVENTORY_URL", "https://chapi.example.com"),
            ("CHINVENTORY_CACHE_DIR", "./scratch/cache"),
            ("CHINVENTORY_CREDENTIALS_FILE", "./scratch/.cloudhealth"),
        ];

        // Store current environment variables
        let stored_env_vars: Vec<(&str, std::result::Result<String, VarError>)> = test_env_vars
            .iter()
            .map(|(env_var, _)| (*env_var, env::var(env_var)))
            .collect();

        let default = ClientBuilder::default();

        // Unset all environment variables
        test_env_vars
            .iter()
            .for_each(|(env_var, _)| env::remove_var(env_var));

        let builder = ClientBuilder::new();
        assert_eq!(builder.url, default.url);
        assert_eq!(builder.cache_dir, default.cache_dir);
        assert_eq!(builder.credentials_file, default.credentials_file);

        // Set all environment variables
        for (env_var, value) in test_env_vars.iter() {
            env::set_var(env_var, value);
        }

        let builder = ClientBuilder::new();
        assert_eq!(builder.url, "https://chapi.example.com");
        assert_eq!(builder.cache_dir, PathBuf::from("./scratch/cache"));
        assert_eq!(builder.credentials_file, PathBuf::from("./scratch/.cloudhealth"));

        // Reset environment variables
        for (env_var, value) in stored_env_vars {
            match value {
                Ok(value) => env::set_var(env_var, value),
                Err(VarError::NotPresent) => env::remove_var(env_var),
                Err(VarError::NotUnicode(value)) => env::set_var(env_var, value),
            }
        }
    }

    #[test]
    fn test_build_without_credentials_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result = ClientBuilder::default()
            .credentials_file(temp_dir.path().join(".cloudhealth"))
            .build();
        assert!(matches!(result, Err(Error::Configuration(_))));
    }

    /*-------------------------------------------------------------------------
      Test Inventory Lookups
    -------------------------------------------------------------------------*/

    #[test]
    fn test_search_is_cached() {
        let (client, requests, _temp_dir) = test_client(inventory());

        let first = client.search(AssetType::Vpc).inspect_err(log_error).unwrap();
        let second = client.search(AssetType::Vpc).unwrap();

        assert_eq!(first, second);
        assert_eq!(*requests.borrow(), vec!["AwsVpc".to_string()]);
        assert!(client.cache().cache_file("AwsVpc").exists());
    }

    #[test]
    fn test_network_entities() {
        let (client, requests, _temp_dir) = test_client(inventory());

        let entities = client.network_entities().inspect_err(log_error).unwrap();
        let cidrs: Vec<&str> = entities.iter().map(|entity| entity.cidr.as_str()).collect();
        assert_eq!(cidrs, vec!["10.0.0.0/16", "10.0.1.0/24", "192.168.0.0/24"]);
        assert_eq!(&*entities[0].name, "A");
        assert_eq!(entities[2].from_port.as_deref(), Some("443"));

        // A second run is served from the cache and yields the same entities.
        let again = client.network_entities().unwrap();
        assert_eq!(entities, again);
        assert_eq!(requests.borrow().len(), 3);
    }

    #[test]
    fn test_fetch_failure_propagates() {
        let (client, _requests, _temp_dir) = test_client(vec![]);
        let result = client.network_entities();
        assert!(matches!(result, Err(Error::MalformedPayload(_))));
        assert!(!client.cache().cache_file("AwsVpc").exists());
    }

    #[test]
    fn test_refresh_object_info() {
        let (client, requests, _temp_dir) = test_client(vec![
            (
                "AvailableObjects",
                json!(["AwsVpc", "AwsAccount", "AzureSubscription"]),
            ),
            ("AwsVpcInfo", json!({"attributes": []})),
            ("AwsAccountInfo", json!({"attributes": []})),
        ]);

        let names = client.refresh_object_info("AWS").unwrap();
        assert_eq!(names, vec!["AwsVpc".to_string(), "AwsAccount".to_string()]);
        assert_eq!(
            *requests.borrow(),
            vec!["AvailableObjects", "AwsVpcInfo", "AwsAccountInfo"]
        );
        assert!(client.cache().cache_file("AwsVpcInfo").exists());
    }

    #[test]
    fn test_refresh_object_info_rejects_path_like_names() {
        let (client, requests, temp_dir) = test_client(vec![
            ("AvailableObjects", json!(["AwsVpc", "../AwsEscaped"])),
            ("AwsVpcInfo", json!({"attributes": []})),
        ]);

        let result = client.refresh_object_info("");
        assert!(matches!(result, Err(Error::MalformedPayload(_))));
        assert_eq!(*requests.borrow(), vec!["AvailableObjects", "AwsVpcInfo"]);
        assert!(!temp_dir.path().join("../AwsEscapedInfo.json").exists());
        assert!(matches!(
            client.object_info("../AwsEscaped"),
            Err(Error::MalformedPayload(_))
        ));
    }

    #[test]
    fn test_object_names() {
        assert_eq!(
            object_names(&json!(["AwsVpc"])).unwrap(),
            vec!["AwsVpc".to_string()]
        );
        assert_eq!(
            object_names(&json!({"AwsTag": {}})).unwrap(),
            vec!["AwsTag".to_string()]
        );
        assert!(object_names(&json!([1])).is_err());
        assert!(object_names(&json!("AwsVpc")).is_err());
    }

    #[test]
    fn test_cache_status() {
        let (client, _requests, _temp_dir) = test_client(inventory());
        client.search(AssetType::Vpc).unwrap();

        let status = client.cache_status().unwrap();
        assert_eq!(status.len(), AssetType::all().count());
        for (asset_type, status) in status {
            assert_eq!(status.is_some(), asset_type == AssetType::Vpc);
        }
    }
}
