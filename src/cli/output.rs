use chinventory::{AssetType, CacheStatus, NetworkEntity, Result, SinkRecord};
use chrono::Local;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::{NOTHING, UTF8_FULL};
use comfy_table::*;
use log::warn;
use serde_json::Value;

/*-------------------------------------------------------------------------------------------------
  Output Functions
-------------------------------------------------------------------------------------------------*/

fn header(titles: &[&str]) -> Vec<Cell> {
    titles
        .iter()
        .map(|title| {
            Cell::new(title)
                .add_attribute(Attribute::Bold)
                .fg(Color::Green)
        })
        .collect()
}

/*--------------------------------------------------------------------------------------
  Entity Table
--------------------------------------------------------------------------------------*/

pub fn entity_table(entities: &[NetworkEntity]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(header(&["CIDR", "ID", "Name", "Ports", "Protocol"]));

    for entity in entities {
        table.add_row(vec![
            Cell::new(&entity.cidr).add_attribute(Attribute::Bold),
            Cell::new(&entity.id),
            Cell::new(&entity.name),
            Cell::new(port_range(entity)),
            Cell::new(entity.protocol.as_deref().unwrap_or_default()),
        ]);
    }

    // Right-align the CIDR column
    let column = table.column_mut(0).expect("The first column exists");
    column.set_cell_alignment(CellAlignment::Right);

    println!("{table}");

    // Print entity-table summary
    let rule_count = entities.iter().filter(|entity| entity.is_rule()).count();

    let mut summary_table = Table::new();
    summary_table
        .load_preset(NOTHING)
        .set_content_arrangement(ContentArrangement::Dynamic);

    summary_table.add_row(vec![Cell::new(entities.len()), Cell::new("Networks")]);
    summary_table.add_row(vec![
        Cell::new(rule_count),
        Cell::new("From security group rules"),
    ]);

    let summary_numbers_column = summary_table
        .column_mut(0)
        .expect("The first column exists");
    summary_numbers_column.set_cell_alignment(CellAlignment::Right);

    println!("{summary_table}");
}

fn port_range(entity: &NetworkEntity) -> String {
    match (entity.from_port.as_deref(), entity.to_port.as_deref()) {
        (Some(from), Some(to)) if from == to => from.to_string(),
        (Some(from), Some(to)) => format!("{from}-{to}"),
        (Some(port), None) | (None, Some(port)) => port.to_string(),
        (None, None) => String::new(),
    }
}

/*--------------------------------------------------------------------------------------
  CIDRs
--------------------------------------------------------------------------------------*/

pub fn cidrs(entities: &[NetworkEntity]) {
    for entity in entities {
        println!("{}", entity.cidr);
    }
}

/*--------------------------------------------------------------------------------------
  Networks In Netmask Format
--------------------------------------------------------------------------------------*/

pub fn netmasks(entities: &[NetworkEntity]) {
    for entity in entities {
        match entity.ip_network() {
            Some(network) => println!("{} {}", network.network(), network.mask()),
            None => warn!("Skipping {:?} ({}): not a valid CIDR", entity.cidr, entity.id),
        }
    }
}

/*--------------------------------------------------------------------------------------
  JSON
--------------------------------------------------------------------------------------*/

pub fn sink_records(entities: &[NetworkEntity]) -> Result<()> {
    let records: Vec<SinkRecord> = entities.iter().map(SinkRecord::from).collect();
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

pub fn pretty_json(payload: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(payload)?);
    Ok(())
}

/*--------------------------------------------------------------------------------------
  Names
--------------------------------------------------------------------------------------*/

pub fn names(names: &[String]) {
    for name in names {
        println!("{name}");
    }
}

/*--------------------------------------------------------------------------------------
  Cache Table
--------------------------------------------------------------------------------------*/

pub fn cache_table(statuses: &[(AssetType, Option<CacheStatus>)]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);

    table.set_header(header(&["Asset", "Cache File", "Last Modified", "Age", "Status"]));

    for (asset_type, status) in statuses {
        let row = match status {
            Some(status) => vec![
                Cell::new(asset_type),
                Cell::new(status.path.display()),
                Cell::new(
                    status
                        .modified
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M:%S"),
                ),
                Cell::new(format_age(status.age.as_secs())),
                if status.fresh {
                    Cell::new("fresh").fg(Color::Green)
                } else {
                    Cell::new("stale").fg(Color::Yellow)
                },
            ],
            None => vec![
                Cell::new(asset_type),
                Cell::new(""),
                Cell::new(""),
                Cell::new(""),
                Cell::new("missing").fg(Color::Red),
            ],
        };
        table.add_row(row);
    }

    println!("{table}");
}

fn format_age(seconds: u64) -> String {
    match seconds {
        s if s < 60 * 60 => format!("{}m", s / 60),
        s if s < 24 * 60 * 60 => format!("{}h {}m", s / 3600, (s % 3600) / 60),
        s => format!("{}d {}h", s / 86400, (s % 86400) / 3600),
    }
}
