use crate::core::flight_registry::FlightRegistry;
use crate::domain::model::{Assistance, Category, NewPassenger, Passenger};
use crate::utils::error::{GateError, Result};
use crate::utils::validation::{validate_non_empty_string, validate_range, validate_token};
use std::collections::HashMap;

const MAX_AGE: u32 = 130;

/// 旅客登記簿，擁有報到與登機旗標
#[derive(Debug, Default)]
pub struct PassengerRegistry {
    passengers: Vec<Passenger>,
    index: HashMap<String, usize>,
}

impl PassengerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 驗證並建立旅客；任一欄位不合法時不會新增任何資料
    pub fn create_passenger(
        &mut self,
        fields: NewPassenger,
        flights: &FlightRegistry,
    ) -> Result<&Passenger> {
        validate_non_empty_string("name", &fields.name)?;
        validate_token("ticket", &fields.ticket)?;
        validate_token("seat", &fields.seat)?;
        validate_range("age", fields.age, 0, MAX_AGE)?;

        if !flights.contains(&fields.flight_id) {
            return Err(GateError::FlightNotFound {
                flight_id: fields.flight_id,
            });
        }
        if self.index.contains_key(&fields.ticket) {
            return Err(GateError::DuplicateTicket {
                ticket: fields.ticket,
            });
        }

        let category: Category = fields.category.parse()?;
        let assistance: Assistance = fields.assistance.parse()?;

        let passenger = Passenger {
            name: fields.name.trim().to_string(),
            age: fields.age,
            ticket: fields.ticket,
            seat: fields.seat,
            flight_id: fields.flight_id,
            priority: category.priority(),
            assistance,
            baggage_kg: fields.baggage_kg,
            checked_in: false,
            boarded: false,
        };

        tracing::info!(
            "🧳 Passenger {} assigned to flight {} (priority {})",
            passenger.ticket,
            passenger.flight_id,
            passenger.priority
        );

        let position = self.passengers.len();
        self.index.insert(passenger.ticket.clone(), position);
        self.passengers.push(passenger);
        Ok(&self.passengers[position])
    }

    pub fn find_by_ticket(&self, ticket: &str) -> Result<&Passenger> {
        self.position(ticket).map(|position| &self.passengers[position])
    }

    /// 報到只會發生一次，不影響登機狀態
    pub fn check_in(&mut self, ticket: &str) -> Result<&Passenger> {
        let position = self.position(ticket)?;
        let passenger = &mut self.passengers[position];
        if passenger.checked_in {
            return Err(GateError::AlreadyCheckedIn {
                ticket: ticket.to_string(),
            });
        }

        passenger.checked_in = true;
        tracing::info!(
            "✅ Passenger {} checked in for flight {}",
            passenger.ticket,
            passenger.flight_id
        );
        Ok(passenger)
    }

    /// 只由登機流程呼叫；維持 boarded ⇒ checked_in
    pub(crate) fn mark_boarded(&mut self, ticket: &str) -> Result<&Passenger> {
        let position = self.position(ticket)?;
        let passenger = &mut self.passengers[position];
        if !passenger.checked_in {
            return Err(GateError::NotCheckedIn {
                ticket: ticket.to_string(),
            });
        }
        if passenger.boarded {
            return Err(GateError::AlreadyBoarded {
                ticket: ticket.to_string(),
            });
        }

        passenger.boarded = true;
        Ok(passenger)
    }

    pub fn list_all(&self) -> &[Passenger] {
        &self.passengers
    }

    pub fn eligible_for<'a>(&'a self, flight_id: &'a str) -> impl Iterator<Item = &'a Passenger> + 'a {
        self.passengers
            .iter()
            .filter(move |p| p.is_eligible_for(flight_id))
    }

    /// 已報到但尚未登機的旅客
    pub fn waiting_for_flight<'a>(
        &'a self,
        flight_id: &'a str,
    ) -> impl Iterator<Item = &'a Passenger> + 'a {
        self.eligible_for(flight_id)
    }

    pub fn special_assistance_for_flight<'a>(
        &'a self,
        flight_id: &'a str,
    ) -> impl Iterator<Item = &'a Passenger> + 'a {
        self.passengers
            .iter()
            .filter(move |p| p.flight_id == flight_id && p.assistance != Assistance::None)
    }

    pub fn len(&self) -> usize {
        self.passengers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passengers.is_empty()
    }

    fn position(&self, ticket: &str) -> Result<usize> {
        self.index
            .get(ticket)
            .copied()
            .ok_or_else(|| GateError::PassengerNotFound {
                ticket: ticket.to_string(),
            })
    }
}
