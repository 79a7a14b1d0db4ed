use airline_boarding::adapters::audit::AuditFormat;
use airline_boarding::domain::model::{FlightStatus, NewPassenger, PriorityClass};
use airline_boarding::{FileAuditSink, GateError, GateOps, MemoryAuditSink};
use anyhow::Result;
use tempfile::TempDir;

fn passenger(ticket: &str, flight_id: &str, category: &str, assistance: &str) -> NewPassenger {
    NewPassenger {
        name: format!("Traveller {}", ticket),
        age: 42,
        ticket: ticket.to_string(),
        seat: format!("{}A", ticket.len()),
        flight_id: flight_id.to_string(),
        category: category.to_string(),
        assistance: assistance.to_string(),
        baggage_kg: 20,
    }
}

fn gate_with_ai101() -> GateOps<MemoryAuditSink> {
    let mut gate = GateOps::new(MemoryAuditSink::new());
    gate.create_flight("AI101", "Delhi", "Mumbai", "09:30").unwrap();
    gate
}

#[test]
fn test_priority_scenario_orders_vip_business_economy() -> Result<()> {
    let mut gate = gate_with_ai101();
    gate.create_passenger(passenger("T1", "AI101", "4", "none"))?;
    gate.create_passenger(passenger("T2", "AI101", "1", "none"))?;
    gate.create_passenger(passenger("T3", "AI101", "3", "wheelchair"))?;
    for ticket in ["T1", "T2", "T3"] {
        gate.check_in(ticket)?;
    }

    let result = gate.start_boarding("AI101")?;

    assert_eq!(result.sequence, vec!["T2", "T3", "T1"]);
    assert_eq!(result.priority_boarded, 2);
    assert_eq!(result.normal_boarded, 1);
    for p in gate.list_passengers() {
        assert!(p.boarded && p.checked_in);
    }
    Ok(())
}

#[test]
fn test_unknown_flight_is_reported_without_ledger_change() {
    let mut gate = gate_with_ai101();
    gate.create_passenger(passenger("T1", "AI101", "4", "none")).unwrap();
    gate.check_in("T1").unwrap();

    let err = gate.start_boarding("AI999").unwrap_err();

    assert!(matches!(err, GateError::FlightNotFound { .. }));
    assert!(gate.ledger().is_empty());
    assert!(!gate.find_passenger("T1").unwrap().boarded);
}

#[test]
fn test_invalid_category_or_assistance_is_not_added() {
    let mut gate = gate_with_ai101();

    for category in ["0", "5", "first"] {
        let err = gate
            .create_passenger(passenger("T1", "AI101", category, "none"))
            .unwrap_err();
        assert_eq!(
            err.category(),
            airline_boarding::utils::error::ErrorCategory::InvalidInput
        );
    }
    let err = gate
        .create_passenger(passenger("T1", "AI101", "2", "Wheelchair"))
        .unwrap_err();
    assert!(matches!(err, GateError::InvalidAssistance { .. }));

    assert!(gate.list_passengers().is_empty());
    assert!(gate.find_passenger("T1").is_err());
}

#[test]
fn test_boarding_twice_without_new_check_ins() {
    let mut gate = gate_with_ai101();
    gate.create_passenger(passenger("T1", "AI101", "2", "none")).unwrap();
    gate.check_in("T1").unwrap();

    gate.start_boarding("AI101").unwrap();
    let err = gate.start_boarding("AI101").unwrap_err();

    assert!(matches!(err, GateError::NoEligiblePassengers { .. }));
    assert_eq!(gate.boarded_for_flight("AI101").count(), 1);
}

#[test]
fn test_priority_always_precedes_standard_for_many_passengers() {
    let mut gate = gate_with_ai101();
    let categories = ["4", "1", "4", "3", "2", "4", "3", "1", "4", "2", "4", "3"];
    for (i, category) in categories.iter().enumerate() {
        let ticket = format!("P{:02}", i);
        gate.create_passenger(passenger(&ticket, "AI101", category, "none"))
            .unwrap();
        gate.check_in(&ticket).unwrap();
    }

    let result = gate.start_boarding("AI101").unwrap();
    assert_eq!(result.total(), categories.len());

    let priorities: Vec<u8> = result
        .sequence
        .iter()
        .map(|t| gate.find_passenger(t).unwrap().priority)
        .collect();
    let first_standard = priorities.iter().position(|&p| p < 6).unwrap();
    assert!(priorities[..first_standard].iter().all(|&p| p >= 6));
    assert!(priorities[first_standard..].iter().all(|&p| p < 6));
    // 優先區間內依優先級遞減
    assert!(priorities[..first_standard].windows(2).all(|w| w[0] >= w[1]));

    // 一般艙依登記順序
    let standard: Vec<&str> = result.sequence[first_standard..]
        .iter()
        .map(String::as_str)
        .collect();
    assert_eq!(standard, vec!["P00", "P02", "P05", "P08", "P10"]);
}

#[test]
fn test_ledger_queries_only_grow() {
    let mut gate = gate_with_ai101();
    gate.create_flight("AI202", "Pune", "Goa", "11:00").unwrap();
    gate.create_passenger(passenger("T1", "AI101", "4", "none")).unwrap();
    gate.create_passenger(passenger("T2", "AI101", "1", "none")).unwrap();
    gate.create_passenger(passenger("T3", "AI202", "1", "none")).unwrap();

    gate.check_in("T1").unwrap();
    gate.start_boarding("AI101").unwrap();
    let after_first = gate.boarded_for_flight("AI101").count();

    gate.check_in("T3").unwrap();
    gate.start_boarding("AI202").unwrap();
    assert_eq!(gate.boarded_for_flight("AI101").count(), after_first);

    gate.check_in("T2").unwrap();
    gate.start_boarding("AI101").unwrap();
    let tickets: Vec<String> = gate
        .boarded_for_flight("AI101")
        .map(|r| r.passenger.ticket.clone())
        .collect();
    assert_eq!(tickets, vec!["T1", "T2"]);
    assert!(gate
        .boarded_for_flight("AI101")
        .all(|r| r.flight.id == "AI101"));
}

#[test]
fn test_status_change_is_reflected_in_later_records() {
    let mut gate = gate_with_ai101();
    gate.create_passenger(passenger("T1", "AI101", "1", "none")).unwrap();
    gate.create_passenger(passenger("T2", "AI101", "4", "none")).unwrap();
    gate.check_in("T1").unwrap();
    gate.start_boarding("AI101").unwrap();

    gate.set_flight_status("AI101", FlightStatus::Delayed).unwrap();
    gate.check_in("T2").unwrap();
    gate.start_boarding("AI101").unwrap();

    let records: Vec<_> = gate.boarded_for_flight("AI101").collect();
    assert_eq!(records[0].flight.status, FlightStatus::OnTime);
    assert_eq!(records[0].class, PriorityClass::Priority);
    assert_eq!(records[1].flight.status, FlightStatus::Delayed);
    assert_eq!(records[1].class, PriorityClass::Normal);
}

#[test]
fn test_file_audit_sink_records_each_boarding() -> Result<()> {
    let dir = TempDir::new()?;
    let mut gate = GateOps::new(FileAuditSink::new(dir.path(), "boarding", AuditFormat::Text));
    gate.create_flight("AI101", "Delhi", "Mumbai", "09:30")?;
    gate.create_passenger(passenger("T1", "AI101", "4", "none"))?;
    gate.create_passenger(passenger("T2", "AI101", "2", "wheelchair"))?;
    gate.check_in("T1")?;
    gate.check_in("T2")?;

    gate.start_boarding("AI101")?;

    let files = std::fs::read_dir(dir.path())?.collect::<std::io::Result<Vec<_>>>()?;
    assert_eq!(files.len(), 1);
    let content = std::fs::read_to_string(files[0].path())?;
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("Traveller T2 | Age:42 | T2 |"));
    assert!(lines[0].contains("| Delhi->Mumbai | Depart:09:30 | Status:ON_TIME | Priority:8 | Assist:wheelchair |"));
    assert!(lines[1].contains("| T1 |"));
    Ok(())
}

#[test]
fn test_unwritable_audit_sink_does_not_block_boarding() {
    let dir = TempDir::new().unwrap();
    let sink = FileAuditSink::new(dir.path().join("does-not-exist"), "boarding", AuditFormat::Text);
    let mut gate = GateOps::new(sink);
    gate.create_flight("AI101", "Delhi", "Mumbai", "09:30").unwrap();
    gate.create_passenger(passenger("T1", "AI101", "4", "none")).unwrap();
    gate.check_in("T1").unwrap();

    let result = gate.start_boarding("AI101").unwrap();

    assert_eq!(result.sequence, vec!["T1"]);
    assert!(gate.find_passenger("T1").unwrap().boarded);
    assert_eq!(gate.ledger().len(), 1);
}
