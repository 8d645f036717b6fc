use std::fmt;
use std::str::FromStr;

/*-------------------------------------------------------------------------------------------------
  Cache Times
-------------------------------------------------------------------------------------------------*/

pub const WEEK: u64 = 7 * 24 * 60 * 60;
pub const DAY: u64 = 24 * 60 * 60;
pub const HOUR: u64 = 60 * 60;

/*-------------------------------------------------------------------------------------------------
  Asset Type
-------------------------------------------------------------------------------------------------*/

/// Inventory asset types searched through the inventory API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AssetType {
    SecurityGroup,
    SecurityGroupRule,
    Account,
    VpcSubnet,
    Vpc,
    NatGateway,
    Region,
    ElasticIp,
    CloudFormationStack,
    AvailabilityZone,
    LoadBalancer,
    Image,
    InstanceStatus,
    Tag,
    User,
    AzureSubscription,
}

/// Search parameters and cache time for one asset type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSpec {
    /// Asset name as known to the inventory API (the `name` search parameter).
    pub asset_name: &'static str,

    /// Related objects to embed in each record (the `include` search parameter).
    pub include_filter: &'static str,

    pub ttl_seconds: u64,
}

const fn spec(
    asset_name: &'static str,
    include_filter: &'static str,
    ttl_seconds: u64,
) -> AssetSpec {
    AssetSpec {
        asset_name,
        include_filter,
        ttl_seconds,
    }
}

/// Asset type, CLI tag, and search spec for every asset type, in listing order.
#[rustfmt::skip]
static ASSET_TABLE: [(AssetType, &str, AssetSpec); 16] = [
    (AssetType::SecurityGroup, "security-group", spec("AwsSecurityGroup", "vpc", DAY)),
    (AssetType::SecurityGroupRule, "security-group-rule", spec("AwsSecurityGroupRule", "", DAY)),
    (AssetType::Account, "account", spec("AwsAccount", "", WEEK)),
    (AssetType::VpcSubnet, "vpc-subnet", spec("AwsVpcSubnet", "", DAY)),
    (AssetType::Vpc, "vpc", spec("AwsVpc", "", WEEK)),
    (AssetType::NatGateway, "nat-gateway", spec("AwsNatGateway", "", WEEK)),
    (AssetType::Region, "region", spec("AwsRegion", "", WEEK)),
    (AssetType::ElasticIp, "elastic-ip", spec("AwsElasticIp", "", DAY)),
    (AssetType::CloudFormationStack, "cloudformation-stack", spec("AwsCloudFormationStack", "", DAY)),
    (AssetType::AvailabilityZone, "availability-zone", spec("AwsAvailabilityZone", "", DAY)),
    (AssetType::LoadBalancer, "load-balancer", spec("AwsLoadBalancer", "", HOUR)),
    (AssetType::Image, "image", spec("AwsImage", "", DAY)),
    (AssetType::InstanceStatus, "instance-status", spec("AwsInstanceStatus", "instance", HOUR)),
    (AssetType::Tag, "tag", spec("AwsTag", "", DAY)),
    (AssetType::User, "user", spec("AwsUser", "", DAY)),
    (AssetType::AzureSubscription, "azure-subscription", spec("AzureSubscription", "", DAY)),
];

impl AssetType {
    /// Iterate every asset type in table order.
    pub fn all() -> impl Iterator<Item = AssetType> {
        ASSET_TABLE.iter().map(|(asset_type, _, _)| *asset_type)
    }

    pub fn spec(&self) -> AssetSpec {
        self.entry().2
    }

    pub fn tag(&self) -> &'static str {
        self.entry().1
    }

    /// The search request for this asset type.
    pub fn request(&self) -> ApiRequest {
        let spec = self.spec();
        ApiRequest::Search {
            asset_name: spec.asset_name.to_string(),
            include: spec.include_filter.to_string(),
        }
    }

    fn entry(&self) -> &'static (AssetType, &'static str, AssetSpec) {
        // Every variant has exactly one row in the table.
        &ASSET_TABLE[*self as usize]
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for AssetType {
    type Err = String;

    /// Parse an asset tag (`vpc-subnet`) or API asset name (`AwsVpcSubnet`).
    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        ASSET_TABLE
            .iter()
            .find(|(_, tag, spec)| {
                tag.eq_ignore_ascii_case(value) || spec.asset_name.eq_ignore_ascii_case(value)
            })
            .map(|(asset_type, _, _)| *asset_type)
            .ok_or_else(|| format!("unknown asset type `{value}`"))
    }
}

/*-------------------------------------------------------------------------------------------------
  API Request
-------------------------------------------------------------------------------------------------*/

/// A single inventory API lookup; identifies both the HTTP request and its cache artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiRequest {
    /// List of object names the API can describe.
    Available,

    /// Field description of one object type.
    ObjectInfo { asset_name: String },

    /// Search for every asset of one type.
    Search { asset_name: String, include: String },
}

impl ApiRequest {
    /// URL path relative to the API base URL.
    pub fn path(&self) -> String {
        match self {
            ApiRequest::Available => "api.json".to_string(),
            ApiRequest::ObjectInfo { asset_name } => format!("api/{asset_name}.json"),
            ApiRequest::Search { .. } => "api/search.json".to_string(),
        }
    }

    /// Query parameters, excluding the API key.
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        match self {
            ApiRequest::Available | ApiRequest::ObjectInfo { .. } => vec![],
            ApiRequest::Search {
                asset_name,
                include,
            } => vec![("name", asset_name.as_str()), ("include", include.as_str())],
        }
    }

    pub fn cache_key(&self) -> String {
        match self {
            ApiRequest::Available => "AvailableObjects".to_string(),
            ApiRequest::ObjectInfo { asset_name } => format!("{asset_name}Info"),
            ApiRequest::Search { asset_name, .. } => asset_name.clone(),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
