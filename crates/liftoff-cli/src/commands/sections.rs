use anyhow::Result;
use serde::Serialize;

use liftoff_core::{sequence::SectionSequence, AppConfig};

#[derive(Debug, Serialize)]
struct SectionRow<'a> {
    index: usize,
    title: &'a str,
    subtitle: &'a str,
    marker_progress: f64,
    items: Vec<&'a str>,
}

fn rows(sequence: &SectionSequence) -> Vec<SectionRow<'_>> {
    sequence
        .sections()
        .iter()
        .enumerate()
        .map(|(index, section)| SectionRow {
            index,
            title: &section.title,
            subtitle: &section.subtitle,
            marker_progress: sequence.marker_progress(index),
            items: section.items.iter().map(|i| i.label.as_str()).collect(),
        })
        .collect()
}

pub fn run(config: &AppConfig, json: bool) -> Result<()> {
    let sequence = SectionSequence::from_config(&config.sequence)?;
    let rows = rows(&sequence);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    println!("Sections ({}):\n", rows.len());
    for row in &rows {
        println!("  {}. {} - {}", row.index + 1, row.title, row.subtitle);
        println!("    Marker: {:.0}%", row.marker_progress * 100.0);
        if !row.items.is_empty() {
            println!("    Items: {}", row.items.join(", "));
        }
        println!();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_follow_marker_positions() {
        let config = AppConfig::default();
        let sequence = SectionSequence::from_config(&config.sequence).unwrap();
        let rows = rows(&sequence);
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].marker_progress, 0.0);
        assert_eq!(rows[4].marker_progress, 1.0);
        assert_eq!(rows[2].items.len(), 5);
    }

    #[test]
    fn test_json_shape() {
        let config = AppConfig::default();
        let sequence = SectionSequence::from_config(&config.sequence).unwrap();
        let value = serde_json::to_value(rows(&sequence)).unwrap();
        assert_eq!(value[1]["title"], "THE MISSION");
        assert_eq!(value[1]["marker_progress"], 0.25);
    }
}
