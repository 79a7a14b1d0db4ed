use crate::core::flight_registry::FlightRegistry;
use crate::core::passenger_registry::PassengerRegistry;
use crate::domain::model::{BoardingRecord, NewPassenger};
use crate::utils::error::{GateError, Result};
use crate::utils::validation::parse_departure_time;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};

#[derive(Debug, Clone, Deserialize)]
struct FlightRow {
    id: String,
    origin: String,
    destination: String,
    departure: String,
}

#[derive(Debug, Clone, Serialize)]
struct ManifestRow<'a> {
    sequence: usize,
    ticket: &'a str,
    name: &'a str,
    seat: &'a str,
    priority: u8,
    class: String,
    assistance: String,
    boarded_at: String,
}

/// 匯入結果；被拒絕的列附上 CSV 行號 (含標題列) 與原因
#[derive(Debug, Default)]
pub struct ImportSummary {
    pub imported: usize,
    pub rejected: Vec<(usize, String)>,
}

impl ImportSummary {
    fn reject(&mut self, row_index: usize, reason: String) {
        let line = row_index + 2;
        tracing::warn!("⚠️ Roster line {} rejected: {}", line, reason);
        self.rejected.push((line, reason));
    }
}

/// 匯入航班 CSV (`id,origin,destination,departure`)，每列都經過登記簿驗證
pub fn import_flights<R: Read>(reader: R, flights: &mut FlightRegistry) -> Result<ImportSummary> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut summary = ImportSummary::default();

    for (row_index, row) in csv_reader.deserialize::<FlightRow>().enumerate() {
        let created: Result<()> = row.map_err(GateError::from).and_then(|row| {
            let departure = parse_departure_time("departure", &row.departure)?;
            flights
                .create_flight(&row.id, &row.origin, &row.destination, departure)
                .map(|_| ())
        });

        match created {
            Ok(()) => summary.imported += 1,
            Err(e) => summary.reject(row_index, e.to_string()),
        }
    }

    tracing::info!(
        "📥 Imported {} flights ({} rejected)",
        summary.imported,
        summary.rejected.len()
    );
    Ok(summary)
}

/// 匯入旅客 CSV，欄位同 [`NewPassenger`]
pub fn import_passengers<R: Read>(
    reader: R,
    flights: &FlightRegistry,
    passengers: &mut PassengerRegistry,
) -> Result<ImportSummary> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut summary = ImportSummary::default();

    for (row_index, row) in csv_reader.deserialize::<NewPassenger>().enumerate() {
        let created: Result<()> = row
            .map_err(GateError::from)
            .and_then(|fields| passengers.create_passenger(fields, flights).map(|_| ()));

        match created {
            Ok(()) => summary.imported += 1,
            Err(e) => summary.reject(row_index, e.to_string()),
        }
    }

    tracing::info!(
        "📥 Imported {} passengers ({} rejected)",
        summary.imported,
        summary.rejected.len()
    );
    Ok(summary)
}

/// 將登機紀錄依順序寫成 CSV 登機名單，回傳寫入筆數
pub fn write_manifest<'a, W: Write>(
    records: impl Iterator<Item = &'a BoardingRecord>,
    writer: W,
) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let mut written = 0;

    for (position, record) in records.enumerate() {
        csv_writer.serialize(ManifestRow {
            sequence: position + 1,
            ticket: &record.passenger.ticket,
            name: &record.passenger.name,
            seat: &record.passenger.seat,
            priority: record.passenger.priority,
            class: record.class.to_string(),
            assistance: record.passenger.assistance.to_string(),
            boarded_at: record.boarded_at.format("%d-%m-%Y %H:%M:%S").to_string(),
        })?;
        written += 1;
    }

    csv_writer.flush()?;
    Ok(written)
}
