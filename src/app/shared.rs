use crate::app::gate::GateOps;
use crate::core::{AuditSink, BoardingResult, Flight, Passenger};
use crate::domain::model::NewPassenger;
use crate::utils::error::Result;
use std::sync::Arc;
use tokio::sync::Mutex;

/// 供多個非同步呼叫端共用的閘口
///
/// 所有操作都在同一把鎖內執行完畢，因此同一航班的登機流程不會重疊，
/// 分區與寫回之間也不會有其他呼叫插入。
pub struct SharedGate<S: AuditSink = Box<dyn AuditSink>> {
    inner: Arc<Mutex<GateOps<S>>>,
}

impl<S: AuditSink> Clone for SharedGate<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: AuditSink> SharedGate<S> {
    pub fn new(gate: GateOps<S>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(gate)),
        }
    }

    pub async fn create_flight(
        &self,
        id: &str,
        origin: &str,
        destination: &str,
        departure: &str,
    ) -> Result<Flight> {
        let mut gate = self.inner.lock().await;
        gate.create_flight(id, origin, destination, departure)
            .cloned()
    }

    pub async fn create_passenger(&self, fields: NewPassenger) -> Result<Passenger> {
        let mut gate = self.inner.lock().await;
        gate.create_passenger(fields).cloned()
    }

    pub async fn check_in(&self, ticket: &str) -> Result<Passenger> {
        let mut gate = self.inner.lock().await;
        gate.check_in(ticket).cloned()
    }

    /// 稽核輸出可能是同步檔案寫入，整個登機流程在 blocking 執行緒上執行，
    /// 鎖由該執行緒持有直到流程結束
    pub async fn start_boarding(&self, flight_id: &str) -> Result<BoardingResult>
    where
        S: 'static,
    {
        let mut gate = Arc::clone(&self.inner).lock_owned().await;
        let flight_id = flight_id.to_string();
        tokio::task::spawn_blocking(move || gate.start_boarding(&flight_id)).await?
    }

    pub async fn find_passenger(&self, ticket: &str) -> Result<Passenger> {
        let gate = self.inner.lock().await;
        gate.find_passenger(ticket).cloned()
    }

    /// 依登機順序回傳該航班已登機的票號
    pub async fn boarded_tickets(&self, flight_id: &str) -> Vec<String> {
        let gate = self.inner.lock().await;
        gate.boarded_for_flight(flight_id)
            .map(|record| record.passenger.ticket.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::audit::{AuditFormat, FileAuditSink, NullAuditSink};
    use crate::utils::error::GateError;

    fn passenger(ticket: &str, flight_id: &str, category: &str) -> NewPassenger {
        NewPassenger {
            name: format!("Passenger {}", ticket),
            age: 38,
            ticket: ticket.to_string(),
            seat: "5B".to_string(),
            flight_id: flight_id.to_string(),
            category: category.to_string(),
            assistance: "none".to_string(),
            baggage_kg: 9,
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_runs_board_each_passenger_once() {
        let shared = SharedGate::new(GateOps::new(NullAuditSink));
        shared
            .create_flight("AI101", "Delhi", "Mumbai", "09:30")
            .await
            .unwrap();
        for (i, category) in ["vip", "economy", "business", "elderly", "economy"]
            .iter()
            .enumerate()
        {
            let ticket = format!("T{}", i);
            shared
                .create_passenger(passenger(&ticket, "AI101", category))
                .await
                .unwrap();
            shared.check_in(&ticket).await.unwrap();
        }

        let mut handles = Vec::new();
        for _ in 0..8 {
            let gate = shared.clone();
            handles.push(tokio::spawn(async move { gate.start_boarding("AI101").await }));
        }

        let mut successes = 0;
        let mut idle = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(result) => {
                    successes += 1;
                    assert_eq!(result.total(), 5);
                }
                Err(GateError::NoEligiblePassengers { .. }) => idle += 1,
                Err(other) => panic!("unexpected error: {}", other),
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(idle, 7);

        let mut boarded = shared.boarded_tickets("AI101").await;
        assert_eq!(boarded.len(), 5);
        boarded.sort();
        boarded.dedup();
        assert_eq!(boarded.len(), 5);
    }

    #[tokio::test]
    async fn test_boarding_with_file_sink_writes_audit_lines() {
        let dir = tempfile::TempDir::new().unwrap();
        let sink = FileAuditSink::new(dir.path(), "boarding", AuditFormat::Text);
        let shared = SharedGate::new(GateOps::new(sink));
        shared
            .create_flight("AI101", "Delhi", "Mumbai", "09:30")
            .await
            .unwrap();
        for (ticket, category) in [("E1", "economy"), ("V1", "vip")] {
            shared
                .create_passenger(passenger(ticket, "AI101", category))
                .await
                .unwrap();
            shared.check_in(ticket).await.unwrap();
        }

        let result = shared.start_boarding("AI101").await.unwrap();
        assert_eq!(result.sequence, vec!["V1", "E1"]);

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .collect::<std::io::Result<Vec<_>>>()
            .unwrap();
        assert_eq!(files.len(), 1);
        let content = std::fs::read_to_string(files[0].path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("| V1 |"));
        assert!(lines[1].contains("| E1 |"));

        // 鎖已在 blocking 執行緒結束後釋放
        assert!(shared.find_passenger("E1").await.unwrap().boarded);
    }

    #[tokio::test]
    async fn test_runs_on_different_flights_are_independent() {
        let shared = SharedGate::new(GateOps::new(NullAuditSink));
        for id in ["AI101", "AI202"] {
            shared
                .create_flight(id, "Delhi", "Mumbai", "09:30")
                .await
                .unwrap();
        }
        shared
            .create_passenger(passenger("A1", "AI101", "vip"))
            .await
            .unwrap();
        shared
            .create_passenger(passenger("B1", "AI202", "economy"))
            .await
            .unwrap();
        shared.check_in("A1").await.unwrap();
        shared.check_in("B1").await.unwrap();

        let (first, second) = tokio::join!(
            shared.start_boarding("AI101"),
            shared.start_boarding("AI202")
        );

        assert_eq!(first.unwrap().sequence, vec!["A1"]);
        assert_eq!(second.unwrap().sequence, vec!["B1"]);
        assert!(shared.find_passenger("B1").await.unwrap().boarded);
    }
}
