use chinventory::{NetworkEntity, Result, SinkRecord};
use std::path::Path;

/*-------------------------------------------------------------------------------------------------
  Save Network Records to CSV File
-------------------------------------------------------------------------------------------------*/

/// Write one sink record per entity; the header row comes from the record's field names.
pub fn save(entities: &[NetworkEntity], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;

    for entity in entities {
        writer.serialize(SinkRecord::from(entity))?;
    }

    writer.flush().map_err(csv::Error::from)?;

    Ok(())
}

/*-------------------------------------------------------------------------------------------------
  Unit Tests
-------------------------------------------------------------------------------------------------*/

#[cfg(test)]
mod tests {
    use super::*;
    use chinventory::EntitySource;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_save() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("networks.csv");
        let entities = vec![
            NetworkEntity::new(EntitySource::Vpc, "vpc-1", "A", "10.0.0.0/16"),
            NetworkEntity {
                from_port: Some("22".to_string()),
                to_port: Some("22".to_string()),
                protocol: Some("tcp".to_string()),
                ..NetworkEntity::new(
                    EntitySource::SecurityGroupRule,
                    "sg-1",
                    "ssh",
                    "192.168.1.0/24",
                )
            },
        ];

        save(&entities, &path).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "network,mask,aws_resource_name,aws_id,from_port,to_port,protocol\n\
             10.0.0.0,16,A,vpc-1,,,\n\
             192.168.1.0,24,ssh,sg-1,22,22,tcp\n"
        );
    }
}
