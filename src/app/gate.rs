use crate::adapters::roster::{self, ImportSummary};
use crate::core::flight_registry::FlightRegistry;
use crate::core::ledger::BoardingLedger;
use crate::core::passenger_registry::PassengerRegistry;
use crate::core::scheduler::BoardingScheduler;
use crate::core::{AuditSink, BoardingRecord, BoardingResult, Flight, Passenger};
use crate::domain::model::{FlightStatus, NewPassenger, Operation, Role};
use crate::utils::error::{GateError, Result};
use crate::utils::validation::parse_departure_time;
use std::io::{Read, Write};

/// 閘口作業的進入點：擁有兩個登記簿、登機帳本與稽核輸出
pub struct GateOps<S: AuditSink = Box<dyn AuditSink>> {
    flights: FlightRegistry,
    passengers: PassengerRegistry,
    ledger: BoardingLedger,
    sink: S,
}

impl<S: AuditSink> GateOps<S> {
    pub fn new(sink: S) -> Self {
        Self {
            flights: FlightRegistry::new(),
            passengers: PassengerRegistry::new(),
            ledger: BoardingLedger::new(),
            sink,
        }
    }

    /// 呼叫端已完成登入；這裡只比對角色與操作
    pub fn authorize(&self, role: Role, operation: Operation) -> Result<()> {
        if role.permits(operation) {
            Ok(())
        } else {
            Err(GateError::PermissionDenied {
                role: role.to_string(),
                operation: operation.to_string(),
            })
        }
    }

    pub fn create_flight(
        &mut self,
        id: &str,
        origin: &str,
        destination: &str,
        departure: &str,
    ) -> Result<&Flight> {
        let departure = parse_departure_time("departure", departure)?;
        self.flights.create_flight(id, origin, destination, departure)
    }

    pub fn find_flight(&self, id: &str) -> Result<&Flight> {
        self.flights.find_flight(id)
    }

    pub fn list_flights(&self) -> &[Flight] {
        self.flights.list_all()
    }

    pub fn set_flight_status(&mut self, id: &str, status: FlightStatus) -> Result<()> {
        self.flights.set_status(id, status)
    }

    pub fn create_passenger(&mut self, fields: NewPassenger) -> Result<&Passenger> {
        self.passengers.create_passenger(fields, &self.flights)
    }

    pub fn find_passenger(&self, ticket: &str) -> Result<&Passenger> {
        self.passengers.find_by_ticket(ticket)
    }

    pub fn list_passengers(&self) -> &[Passenger] {
        self.passengers.list_all()
    }

    pub fn check_in(&mut self, ticket: &str) -> Result<&Passenger> {
        self.passengers.check_in(ticket)
    }

    pub fn start_boarding(&mut self, flight_id: &str) -> Result<BoardingResult> {
        BoardingScheduler::new(
            &self.flights,
            &mut self.passengers,
            &mut self.ledger,
            &self.sink,
        )
        .start_boarding(flight_id)
    }

    pub fn waiting_for_flight<'a>(
        &'a self,
        flight_id: &'a str,
    ) -> impl Iterator<Item = &'a Passenger> + 'a {
        self.passengers.waiting_for_flight(flight_id)
    }

    pub fn boarded_for_flight<'a>(
        &'a self,
        flight_id: &'a str,
    ) -> impl Iterator<Item = &'a BoardingRecord> + 'a {
        self.ledger.query_by_flight(flight_id)
    }

    pub fn special_assistance_for_flight<'a>(
        &'a self,
        flight_id: &'a str,
    ) -> impl Iterator<Item = &'a Passenger> + 'a {
        self.passengers.special_assistance_for_flight(flight_id)
    }

    pub fn ledger(&self) -> &BoardingLedger {
        &self.ledger
    }

    pub fn import_flights<R: Read>(&mut self, reader: R) -> Result<ImportSummary> {
        roster::import_flights(reader, &mut self.flights)
    }

    pub fn import_passengers<R: Read>(&mut self, reader: R) -> Result<ImportSummary> {
        roster::import_passengers(reader, &self.flights, &mut self.passengers)
    }

    /// 匯出航班的登機名單 CSV，航班必須存在
    pub fn export_manifest<W: Write>(&self, flight_id: &str, writer: W) -> Result<usize> {
        self.flights.find_flight(flight_id)?;
        roster::write_manifest(self.ledger.query_by_flight(flight_id), writer)
    }
}
