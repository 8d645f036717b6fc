use ipnetwork::IpNetwork;
use serde::Serialize;
use std::rc::Rc;

/*-------------------------------------------------------------------------------------------------
  Entity Source
-------------------------------------------------------------------------------------------------*/

/// Inventory an entity was extracted from.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EntitySource {
    Vpc,
    Subnet,
    SecurityGroupRule,
}

/*-------------------------------------------------------------------------------------------------
  Network Entity
-------------------------------------------------------------------------------------------------*/

/// A CIDR block in use by the inventory, attributed to the first VPC, subnet, or security group
/// found referencing it.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct NetworkEntity {
    pub source: EntitySource,

    /// VPC, subnet, or security group id.
    pub id: Rc<str>,

    pub name: Rc<str>,

    /// CIDR text exactly as reported by the inventory API.
    pub cidr: String,

    /// Port range and protocol; only set for security group rule entities.
    pub from_port: Option<String>,
    pub to_port: Option<String>,
    pub protocol: Option<String>,
}

impl NetworkEntity {
    pub fn new(source: EntitySource, id: &str, name: &str, cidr: &str) -> Self {
        Self {
            source,
            id: Rc::from(id),
            name: Rc::from(name),
            cidr: cidr.to_string(),
            from_port: None,
            to_port: None,
            protocol: None,
        }
    }

    /// `true` when the entity came from a security group rule.
    pub fn is_rule(&self) -> bool {
        self.source == EntitySource::SecurityGroupRule
    }

    /// Network address part of the CIDR (text before the first `/`).
    pub fn network(&self) -> &str {
        self.cidr
            .split_once('/')
            .map_or(self.cidr.as_str(), |(network, _)| network)
    }

    /// Prefix length part of the CIDR (text after the first `/`); empty when there is none.
    pub fn mask(&self) -> &str {
        self.cidr.split_once('/').map_or("", |(_, mask)| mask)
    }

    /// Parse the CIDR text, when it is a valid IPv4 or IPv6 network.
    pub fn ip_network(&self) -> Option<IpNetwork> {
        self.cidr.parse().ok()
    }
}

/*-------------------------------------------------------------------------------------------------
  Sink Record
-------------------------------------------------------------------------------------------------*/

/// Flat record handed to storage sinks, keyed by `(network, mask)`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct SinkRecord {
    pub network: String,
    pub mask: String,
    pub aws_resource_name: Rc<str>,
    pub aws_id: Rc<str>,
    pub from_port: Option<String>,
    pub to_port: Option<String>,
    pub protocol: Option<String>,
}

impl From<&NetworkEntity> for SinkRecord {
    fn from(entity: &NetworkEntity) -> Self {
        Self {
            network: entity.network().to_string(),
            mask: entity.mask().to_string(),
            aws_resource_name: Rc::clone(&entity.name),
            aws_id: Rc::clone(&entity.id),
            from_port: entity.from_port.clone(),
            to_port: entity.to_port.clone(),
            protocol: entity.protocol.clone(),
        }
    }
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
