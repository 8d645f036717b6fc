use chinventory::NetworkEntity;
use log::{info, warn};

/*-------------------------------------------------------------------------------------------------
  Logging Functions
-------------------------------------------------------------------------------------------------*/

/*--------------------------------------------------------------------------------------
  Network Entities
--------------------------------------------------------------------------------------*/

pub fn network_entities(entities: &[NetworkEntity]) {
    if entities.is_empty() {
        warn!("No networks found in the VPC, subnet, or security group rule inventories");
        return;
    }

    let count_rules = entities.iter().filter(|entity| entity.is_rule()).count();
    let count_invalid = entities
        .iter()
        .filter(|entity| entity.ip_network().is_none())
        .count();

    info!(
        "Found {} network(s); {} from security group rules",
        entities.len(),
        count_rules
    );

    if count_invalid > 0 {
        warn!("{count_invalid} network(s) are not valid CIDRs");
    };
}
