use airline_boarding::{GateOps, NullAuditSink};
use anyhow::Result;
use std::fs::File;
use std::io::Write;
use tempfile::TempDir;

fn write_file(dir: &TempDir, name: &str, content: &str) -> Result<std::path::PathBuf> {
    let path = dir.path().join(name);
    let mut file = File::create(&path)?;
    file.write_all(content.as_bytes())?;
    Ok(path)
}

#[test]
fn test_seed_board_and_export_manifest() -> Result<()> {
    let dir = TempDir::new()?;
    let flights = write_file(
        &dir,
        "flights.csv",
        "id,origin,destination,departure\nAI101,Delhi,Mumbai,09:30\nAI202,Pune,Goa,13:15\n",
    )?;
    let passengers = write_file(
        &dir,
        "passengers.csv",
        "\
name,age,ticket,seat,flight_id,category,assistance,baggage_kg
Ravi Kumar,30,T1,30C,AI101,economy,none,20
Asha Rao,71,T2,2A,AI101,elderly,wheelchair,12
Meera Iyer,29,T3,1A,AI101,vip,none,7
Dev Patel,45,T4,5C,AI202,business,none,15
",
    )?;

    let mut gate = GateOps::new(NullAuditSink);
    let flight_summary = gate.import_flights(File::open(flights)?)?;
    let passenger_summary = gate.import_passengers(File::open(passengers)?)?;
    assert_eq!(flight_summary.imported, 2);
    assert_eq!(passenger_summary.imported, 4);
    assert!(passenger_summary.rejected.is_empty());

    for ticket in ["T1", "T2", "T3", "T4"] {
        gate.check_in(ticket)?;
    }
    let result = gate.start_boarding("AI101")?;
    assert_eq!(result.sequence, vec!["T3", "T2", "T1"]);

    let assisted: Vec<&str> = gate
        .special_assistance_for_flight("AI101")
        .map(|p| p.ticket.as_str())
        .collect();
    assert_eq!(assisted, vec!["T2"]);
    assert_eq!(gate.waiting_for_flight("AI202").count(), 1);

    let mut manifest = Vec::new();
    assert_eq!(gate.export_manifest("AI101", &mut manifest)?, 3);
    let manifest = String::from_utf8(manifest)?;
    let tickets: Vec<&str> = manifest
        .lines()
        .skip(1)
        .map(|line| line.split(',').nth(1).unwrap_or_default())
        .collect();
    assert_eq!(tickets, vec!["T3", "T2", "T1"]);

    let mut empty = Vec::new();
    assert_eq!(gate.export_manifest("AI202", &mut empty)?, 0);
    Ok(())
}
