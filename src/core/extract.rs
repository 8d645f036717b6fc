use crate::core::entity::{EntitySource, NetworkEntity};
use crate::core::errors::{Error, Result};
use log::{debug, info, trace};
use serde_json::Value;
use std::collections::HashSet;

/*-------------------------------------------------------------------------------------------------
  Network Entity Extraction
-------------------------------------------------------------------------------------------------*/

/// `ip_ranges` values that do not name a network.
const IP_RANGE_SENTINELS: [&str; 2] = ["All", "None"];

/// Derive the CIDR blocks referenced by VPC, subnet, and security group rule records.
///
/// Records are processed VPCs first, then subnets, then security group rules, each in input
/// order. The first record to reference a CIDR supplies its attribution; later references to
/// the same CIDR text are dropped, whatever metadata they carry. CIDRs are compared as plain
/// strings.
///
/// A record missing a required field aborts the whole extraction.
///
/// ```
/// use serde_json::json;
///
/// let vpcs = [json!({"vpc_id": "vpc-1", "name": "A", "cidr_block": "10.0.0.0/16"})];
/// let subnets = [json!({"subnet_id": "sub-1", "name": "B", "cidr_block": "10.0.1.0/24"})];
///
/// let entities = chinventory::extract(&vpcs, &subnets, &[])?;
/// assert_eq!(entities.len(), 2);
/// assert_eq!(entities[0].cidr, "10.0.0.0/16");
/// # Ok::<(), chinventory::Error>(())
/// ```
pub fn extract(
    vpcs: &[Value],
    subnets: &[Value],
    security_group_rules: &[Value],
) -> Result<Vec<NetworkEntity>> {
    let mut entities = EntityList::default();

    for vpc in vpcs {
        let cidr = required_str(vpc, "cidr_block")?;
        let id = required_str(vpc, "vpc_id")?;
        let name = optional_str(vpc, "name")?.unwrap_or_default();
        entities.push(NetworkEntity::new(EntitySource::Vpc, &id, &name, &cidr));
    }

    for subnet in subnets {
        let cidr = required_str(subnet, "cidr_block")?;
        let id = required_str(subnet, "subnet_id")?;
        let name = optional_str(subnet, "name")?.unwrap_or_default();
        entities.push(NetworkEntity::new(EntitySource::Subnet, &id, &name, &cidr));
    }

    for rule in security_group_rules {
        let ip_ranges = required_str(rule, "ip_ranges")?;
        let group_id = required_str(rule, "security_group.group_id")?;
        let group_name = optional_str(rule, "security_group.name")?.unwrap_or_default();
        let from_port = optional_str(rule, "from_port")?;
        let to_port = optional_str(rule, "to_port")?;
        let protocol = optional_str(rule, "protocol")?;

        let template = NetworkEntity {
            from_port,
            to_port,
            protocol,
            ..NetworkEntity::new(EntitySource::SecurityGroupRule, &group_id, &group_name, "")
        };

        for cidr in split_ip_ranges(&ip_ranges) {
            entities.push(NetworkEntity {
                cidr: cidr.to_string(),
                ..template.clone()
            });
        }
    }

    info!(
        "Extracted {} network entities from {} VPC(s), {} subnet(s), and {} security group rule(s)",
        entities.entities.len(),
        vpcs.len(),
        subnets.len(),
        security_group_rules.len()
    );

    Ok(entities.entities)
}

/// Split a security group rule's `ip_ranges` text into CIDR tokens.
///
/// Tokens are separated by whitespace and/or commas; the `All` and `None` sentinels are
/// discarded.
pub fn split_ip_ranges(ip_ranges: &str) -> impl Iterator<Item = &str> {
    ip_ranges
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty() && !IP_RANGE_SENTINELS.contains(token))
}

/// Borrow the list of records in a search payload.
pub fn records(payload: &Value) -> Result<&[Value]> {
    payload
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| Error::MalformedPayload("expected a list of records".to_string()))
}

/*--------------------------------------------------------------------------------------
  First-Seen-Wins Entity List
--------------------------------------------------------------------------------------*/

#[derive(Default)]
struct EntityList {
    seen: HashSet<String>,
    entities: Vec<NetworkEntity>,
}

impl EntityList {
    fn push(&mut self, entity: NetworkEntity) {
        if self.seen.insert(entity.cidr.clone()) {
            trace!("{} -> {} ({})", entity.cidr, entity.id, entity.name);
            self.entities.push(entity);
        } else {
            debug!(
                "Dropping duplicate CIDR {} referenced by {}",
                entity.cidr, entity.id
            );
        }
    }
}

/*--------------------------------------------------------------------------------------
  Record Field Lookups
--------------------------------------------------------------------------------------*/

/// Look up a dot-separated field path (`security_group.group_id`) in a record.
fn lookup<'r>(record: &'r Value, path: &str) -> Result<&'r Value> {
    path.split('.')
        .try_fold(record, |value, field| value.get(field))
        .ok_or_else(|| Error::MissingField(path.to_string()))
}

fn scalar_to_string(value: &Value, path: &str) -> Result<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(string) => Ok(Some(string.clone())),
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Bool(boolean) => Ok(Some(boolean.to_string())),
        Value::Array(_) | Value::Object(_) => Err(Error::MalformedPayload(format!(
            "field `{path}` is not a scalar value"
        ))),
    }
}

/// A field that must be present and non-null.
fn required_str(record: &Value, path: &str) -> Result<String> {
    scalar_to_string(lookup(record, path)?, path)?
        .ok_or_else(|| Error::MissingField(path.to_string()))
}

/// A field that must be present but may be null.
fn optional_str(record: &Value, path: &str) -> Result<Option<String>> {
    scalar_to_string(lookup(record, path)?, path)
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/
