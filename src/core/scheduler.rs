use crate::core::flight_registry::FlightRegistry;
use crate::core::ledger::BoardingLedger;
use crate::core::passenger_registry::PassengerRegistry;
use crate::core::priority_queue::PriorityQueue;
use crate::core::standard_queue::StandardQueue;
use crate::domain::model::{BoardingRecord, BoardingResult, Flight, Passenger, PriorityClass};
use crate::domain::ports::AuditSink;
use crate::utils::error::{GateError, Result};
use chrono::Local;

/// 單次登機流程的工作集合，保存的是旅客資料的複本
#[derive(Debug, Default)]
struct BoardingRun {
    priority: PriorityQueue,
    standard: StandardQueue,
}

impl BoardingRun {
    /// 依登記簿順序掃描一次，每位旅客只進入其中一個結構
    fn partition<'a>(eligible: impl Iterator<Item = &'a Passenger>) -> Self {
        let mut run = Self::default();
        for passenger in eligible {
            if passenger.is_priority_class() {
                tracing::debug!(
                    "Routing {} (priority {}) to priority heap",
                    passenger.ticket,
                    passenger.priority
                );
                run.priority.insert(passenger.clone());
            } else {
                tracing::debug!("Routing {} to standard queue", passenger.ticket);
                run.standard.enqueue(passenger.clone());
            }
        }
        run
    }

    fn is_empty(&self) -> bool {
        self.priority.is_empty() && self.standard.is_empty()
    }
}

/// 登機排程器：先清空優先堆，再清空一般佇列
///
/// 借用登記簿與帳本只到這次流程結束為止；寫回登機狀態一律透過票號查詢即時資料。
pub struct BoardingScheduler<'a, S: AuditSink + ?Sized> {
    flights: &'a FlightRegistry,
    passengers: &'a mut PassengerRegistry,
    ledger: &'a mut BoardingLedger,
    sink: &'a S,
}

impl<'a, S: AuditSink + ?Sized> BoardingScheduler<'a, S> {
    pub fn new(
        flights: &'a FlightRegistry,
        passengers: &'a mut PassengerRegistry,
        ledger: &'a mut BoardingLedger,
        sink: &'a S,
    ) -> Self {
        Self {
            flights,
            passengers,
            ledger,
            sink,
        }
    }

    pub fn start_boarding(mut self, flight_id: &str) -> Result<BoardingResult> {
        let flight = self.flights.find_flight(flight_id)?.clone();

        let mut run = BoardingRun::partition(self.passengers.eligible_for(flight_id));
        if run.is_empty() {
            return Err(GateError::NoEligiblePassengers {
                flight_id: flight_id.to_string(),
            });
        }

        tracing::info!(
            "🛫 Boarding flight {} ({} -> {}): {} priority, {} standard",
            flight.id,
            flight.origin,
            flight.destination,
            run.priority.len(),
            run.standard.len()
        );

        let mut result = BoardingResult {
            flight_id: flight.id.clone(),
            ..BoardingResult::default()
        };

        while let Some(snapshot) = run.priority.extract_max() {
            if self.board(&flight, &snapshot, PriorityClass::Priority) {
                result.priority_boarded += 1;
                result.sequence.push(snapshot.ticket);
            }
        }

        while let Some(snapshot) = run.standard.dequeue() {
            if self.board(&flight, &snapshot, PriorityClass::Normal) {
                result.normal_boarded += 1;
                result.sequence.push(snapshot.ticket);
            }
        }

        tracing::info!(
            "🏁 Boarding completed for flight {}: {} boarded",
            flight.id,
            result.total()
        );
        Ok(result)
    }

    /// 更新即時旅客狀態、寫入帳本與稽核；稽核失敗不影響前兩者
    fn board(&mut self, flight: &Flight, snapshot: &Passenger, class: PriorityClass) -> bool {
        let live = match self.passengers.mark_boarded(&snapshot.ticket) {
            Ok(live) => live.clone(),
            Err(e) => {
                tracing::warn!("⚠️ Skipping {}: {}", snapshot.ticket, e);
                return false;
            }
        };

        let record = BoardingRecord {
            passenger: live,
            flight: flight.clone(),
            boarded_at: Local::now(),
            class,
        };

        if let Err(e) = self.sink.append(&record) {
            tracing::warn!(
                "⚠️ Audit sink failed for {}: {}",
                record.passenger.ticket,
                e
            );
        }

        tracing::info!(
            "Boarded ({}) {} seat {}",
            class,
            record.passenger.ticket,
            record.passenger.seat
        );
        self.ledger.append(record);
        true
    }
}
