use crate::domain::model::{Flight, FlightStatus};
use crate::utils::error::{GateError, Result};
use crate::utils::validation::{validate_file_safe_token, validate_non_empty_string};
use chrono::NaiveTime;
use std::collections::HashMap;

/// 航班登記簿，依建立順序保存並以航班號索引
#[derive(Debug, Default)]
pub struct FlightRegistry {
    flights: Vec<Flight>,
    index: HashMap<String, usize>,
}

impl FlightRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_flight(
        &mut self,
        id: &str,
        origin: &str,
        destination: &str,
        departure: NaiveTime,
    ) -> Result<&Flight> {
        validate_file_safe_token("flight_id", id)?;
        validate_non_empty_string("origin", origin)?;
        validate_non_empty_string("destination", destination)?;

        if self.index.contains_key(id) {
            return Err(GateError::DuplicateFlight {
                flight_id: id.to_string(),
            });
        }

        let flight = Flight {
            id: id.to_string(),
            origin: origin.trim().to_string(),
            destination: destination.trim().to_string(),
            departure,
            status: FlightStatus::OnTime,
        };

        let position = self.flights.len();
        self.flights.push(flight);
        self.index.insert(id.to_string(), position);
        tracing::info!("✈️ Flight {} registered", id);

        Ok(&self.flights[position])
    }

    pub fn find_flight(&self, id: &str) -> Result<&Flight> {
        self.index
            .get(id)
            .map(|&position| &self.flights[position])
            .ok_or_else(|| GateError::FlightNotFound {
                flight_id: id.to_string(),
            })
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn set_status(&mut self, id: &str, status: FlightStatus) -> Result<()> {
        let position = *self.index.get(id).ok_or_else(|| GateError::FlightNotFound {
            flight_id: id.to_string(),
        })?;

        self.flights[position].status = status;
        tracing::info!("🕒 Flight {} status set to {}", id, status);
        Ok(())
    }

    pub fn list_all(&self) -> &[Flight] {
        &self.flights
    }

    pub fn len(&self) -> usize {
        self.flights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}
