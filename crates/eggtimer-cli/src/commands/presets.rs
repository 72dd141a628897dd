use eggtimer_core::{format_mmss, Preset};
use serde::Serialize;

#[derive(Serialize)]
struct PresetRow {
    name: &'static str,
    seconds: u64,
    display: String,
}

pub fn run(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let rows: Vec<PresetRow> = Preset::ALL
        .into_iter()
        .map(|p| PresetRow {
            name: p.name(),
            seconds: p.duration_secs(),
            display: format_mmss(p.duration_secs()),
        })
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        for row in rows {
            println!("{:<8} {}", row.name, row.display);
        }
    }
    Ok(())
}

pub fn format(seconds: u64) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", format_mmss(seconds));
    Ok(())
}
