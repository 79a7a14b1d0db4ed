use crate::adapters::credentials::CredentialStore;
use crate::app::gate::GateOps;
use crate::core::{AuditSink, BoardingRecord, Flight, Passenger};
use crate::domain::model::{Assistance, Category, FlightStatus, NewPassenger, Operation, Role};
use crate::utils::error::{GateError, Result};
use std::fs::File;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

const SEPARATOR: &str = "---------------------------------------";

/// 選單流程：繼續或輸入結束
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// 角色選單驅動的互動介面，輸入輸出可替換以便測試
pub struct ConsoleSession<'a, R: BufRead, W: Write, S: AuditSink> {
    gate: &'a mut GateOps<S>,
    credentials: &'a CredentialStore,
    input: R,
    output: W,
    title: String,
    manifest_dir: PathBuf,
}

impl<'a, R: BufRead, W: Write, S: AuditSink> ConsoleSession<'a, R, W, S> {
    pub fn new(
        gate: &'a mut GateOps<S>,
        credentials: &'a CredentialStore,
        input: R,
        output: W,
    ) -> Self {
        Self {
            gate,
            credentials,
            input,
            output,
            title: "Airline Boarding System".to_string(),
            manifest_dir: PathBuf::from("."),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_manifest_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.manifest_dir = dir.into();
        self
    }

    /// 登入迴圈，選擇離開或輸入結束時返回
    pub fn run(&mut self) -> Result<()> {
        loop {
            writeln!(self.output, "\n=== {} ===", self.title)?;
            writeln!(self.output, "Login as:")?;
            writeln!(self.output, "1. Staff\n2. Gate Agent\n3. Cabin Crew\n4. Exit")?;
            let Some(choice) = self.prompt("Choice: ")? else {
                break;
            };

            let expected = match choice.as_str() {
                "1" => Role::Staff,
                "2" => Role::Agent,
                "3" => Role::Crew,
                "4" => {
                    writeln!(self.output, "Exiting...")?;
                    break;
                }
                _ => {
                    writeln!(self.output, "Invalid.")?;
                    continue;
                }
            };

            let Some(username) = self.prompt("Username: ")? else {
                break;
            };
            let Some(password) = self.prompt("Password: ")? else {
                break;
            };

            let role = match self.credentials.login(&username, &password, expected) {
                Ok(role) => role,
                Err(e) => {
                    tracing::warn!("Login failed for {}: {}", username, e);
                    writeln!(self.output, "{}", e.user_friendly_message())?;
                    continue;
                }
            };
            writeln!(self.output, "Login successful as {}!", role)?;

            let flow = match role {
                Role::Staff => self.staff_menu()?,
                Role::Agent => self.agent_menu()?,
                Role::Crew => self.crew_menu()?,
            };
            if flow == Flow::Quit {
                break;
            }
        }

        self.output.flush()?;
        Ok(())
    }

    fn staff_menu(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.output, "\n--- STAFF MENU ---")?;
            writeln!(
                self.output,
                "1. Add Flight\n2. View Flights\n3. Update Flight Delay/Status\n4. Add Passenger\n5. View Passengers\n6. Exit"
            )?;
            let Some(choice) = self.prompt("Choice: ")? else {
                return Ok(Flow::Quit);
            };

            let operation = match choice.as_str() {
                "1" => Operation::CreateFlight,
                "2" => Operation::ListFlights,
                "3" => Operation::UpdateFlightStatus,
                "4" => Operation::CreatePassenger,
                "5" => Operation::ListPassengers,
                "6" => return Ok(Flow::Continue),
                _ => {
                    writeln!(self.output, "Invalid choice.")?;
                    continue;
                }
            };

            if self.dispatch(Role::Staff, operation)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn agent_menu(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.output, "\n--- AGENT MENU ---")?;
            writeln!(
                self.output,
                "1. Check-In Passenger\n2. Start Boarding for Flight\n3. View Flights\n4. Exit"
            )?;
            let Some(choice) = self.prompt("Choice: ")? else {
                return Ok(Flow::Quit);
            };

            let operation = match choice.as_str() {
                "1" => Operation::CheckIn,
                "2" => Operation::StartBoarding,
                "3" => Operation::ListFlights,
                "4" => return Ok(Flow::Continue),
                _ => {
                    writeln!(self.output, "Invalid choice.")?;
                    continue;
                }
            };

            if self.dispatch(Role::Agent, operation)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    fn crew_menu(&mut self) -> Result<Flow> {
        loop {
            writeln!(self.output, "\n--- CREW MENU ---")?;
            writeln!(
                self.output,
                "1. View Checked-In & Boarded for Flight\n2. View Special Assistance for Flight\n3. Export Boarding Manifest\n4. Exit"
            )?;
            let Some(choice) = self.prompt("Choice: ")? else {
                return Ok(Flow::Quit);
            };

            let operation = match choice.as_str() {
                "1" => Operation::ListWaitingAndBoarded,
                "2" => Operation::ListSpecialAssistance,
                "3" => Operation::ExportManifest,
                "4" => return Ok(Flow::Continue),
                _ => {
                    writeln!(self.output, "Invalid choice.")?;
                    continue;
                }
            };

            if self.dispatch(Role::Crew, operation)? == Flow::Quit {
                return Ok(Flow::Quit);
            }
        }
    }

    /// 執行單一操作；可恢復的錯誤顯示給使用者後回到選單
    fn dispatch(&mut self, role: Role, operation: Operation) -> Result<Flow> {
        let outcome = self.gate.authorize(role, operation).and_then(|_| match operation {
            Operation::CreateFlight => self.add_flight(),
            Operation::ListFlights => self.view_flights().map(|_| Flow::Continue),
            Operation::UpdateFlightStatus => self.update_flight_status(),
            Operation::CreatePassenger => self.add_passenger(),
            Operation::ListPassengers => self.view_passengers().map(|_| Flow::Continue),
            Operation::CheckIn => self.check_in(),
            Operation::StartBoarding => self.start_boarding(),
            Operation::ListWaitingAndBoarded => self.view_waiting_and_boarded(),
            Operation::ListSpecialAssistance => self.view_special_assistance(),
            Operation::ExportManifest => self.export_manifest(),
        });

        match outcome {
            Ok(flow) => Ok(flow),
            Err(e) if e.is_recoverable() => {
                tracing::debug!("{} failed: {}", operation, e);
                writeln!(self.output, "{}", e.user_friendly_message())?;
                Ok(Flow::Continue)
            }
            Err(e) => Err(e),
        }
    }

    fn add_flight(&mut self) -> Result<Flow> {
        writeln!(self.output, "\n--- Add Flight ---")?;
        let Some(id) = self.prompt("Flight No: ")? else {
            return Ok(Flow::Quit);
        };
        if self.gate.find_flight(&id).is_ok() {
            return Err(GateError::DuplicateFlight { flight_id: id });
        }
        let Some(origin) = self.prompt("Source: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(destination) = self.prompt("Destination: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(departure) = self.prompt("Departure Time (HH:MM): ")? else {
            return Ok(Flow::Quit);
        };

        self.gate.create_flight(&id, &origin, &destination, &departure)?;
        writeln!(self.output, "Flight added successfully.")?;
        Ok(Flow::Continue)
    }

    fn view_flights(&mut self) -> Result<()> {
        let flights = self.gate.list_flights();
        if flights.is_empty() {
            writeln!(self.output, "No flights added yet.")?;
            return Ok(());
        }

        writeln!(self.output, "\n=== FLIGHTS ===")?;
        for flight in flights {
            write_flight(&mut self.output, flight)?;
        }
        Ok(())
    }

    fn update_flight_status(&mut self) -> Result<Flow> {
        let Some(id) = self.prompt("Enter Flight No to update: ")? else {
            return Ok(Flow::Quit);
        };
        self.gate.find_flight(&id)?;

        writeln!(self.output, "1. Mark DELAYED\n2. Mark ON_TIME")?;
        let Some(choice) = self.prompt("Choice: ")? else {
            return Ok(Flow::Quit);
        };
        let status = match choice.as_str() {
            "1" => FlightStatus::Delayed,
            "2" => FlightStatus::OnTime,
            other => {
                return Err(GateError::InvalidInput {
                    field: "status".to_string(),
                    value: other.to_string(),
                    reason: "Choose 1 or 2".to_string(),
                })
            }
        };

        self.gate.set_flight_status(&id, status)?;
        writeln!(self.output, "Flight status updated.")?;
        Ok(Flow::Continue)
    }

    fn add_passenger(&mut self) -> Result<Flow> {
        if self.gate.list_flights().is_empty() {
            writeln!(self.output, "Add at least one flight first.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "\n--- Add Passenger ---")?;
        let Some(name) = self.prompt("Full Name: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(age) = self.prompt_number("age", "Age: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(ticket) = self.prompt("Ticket No: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(seat) = self.prompt("Seat No: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(flight_id) = self.prompt("Assign Flight No (existing): ")? else {
            return Ok(Flow::Quit);
        };
        if self.gate.find_flight(&flight_id).is_err() {
            writeln!(self.output, "Flight not found. Add the flight first.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "\nSelect Category:")?;
        writeln!(self.output, "1. VIP\n2. Elderly\n3. Business\n4. Economy")?;
        let Some(category) = self.prompt("Choice: ")? else {
            return Ok(Flow::Quit);
        };
        category.parse::<Category>()?;

        // 直到輸入合法值為止
        let assistance = loop {
            let Some(value) = self.prompt("Special Assistance (none / wheelchair): ")? else {
                return Ok(Flow::Quit);
            };
            match value.parse::<Assistance>() {
                Ok(_) => break value,
                Err(e) => writeln!(self.output, "{}", e.user_friendly_message())?,
            }
        };

        let Some(baggage_kg) = self.prompt_number("baggage", "Baggage Weight (kg): ")? else {
            return Ok(Flow::Quit);
        };

        let passenger = self.gate.create_passenger(NewPassenger {
            name,
            age,
            ticket,
            seat,
            flight_id,
            category,
            assistance,
            baggage_kg,
        })?;
        let flight_id = passenger.flight_id.clone();
        writeln!(
            self.output,
            "\nPassenger added to database and assigned to flight {}.",
            flight_id
        )?;
        Ok(Flow::Continue)
    }

    fn view_passengers(&mut self) -> Result<()> {
        let passengers = self.gate.list_passengers();
        if passengers.is_empty() {
            writeln!(self.output, "No passengers.")?;
            return Ok(());
        }

        writeln!(self.output, "\n=== PASSENGER DATABASE ===")?;
        for (position, p) in passengers.iter().enumerate() {
            writeln!(self.output, "Passenger #{}", position + 1)?;
            writeln!(self.output, "  Name       : {}", p.name)?;
            writeln!(self.output, "  Age        : {}", p.age)?;
            writeln!(self.output, "  Ticket No  : {}", p.ticket)?;
            writeln!(self.output, "  Flight     : {}", p.flight_id)?;
            writeln!(self.output, "  Seat       : {}", p.seat)?;
            writeln!(self.output, "  Priority   : {}", p.priority)?;
            writeln!(self.output, "  Assist     : {}", p.assistance)?;
            writeln!(self.output, "  Baggage(kg): {}", p.baggage_kg)?;
            writeln!(self.output, "  Checked-In : {}", yes_no(p.checked_in))?;
            writeln!(self.output, "  Boarded    : {}", yes_no(p.boarded))?;
            writeln!(self.output, "{}", SEPARATOR)?;
        }
        Ok(())
    }

    fn check_in(&mut self) -> Result<Flow> {
        let Some(ticket) = self.prompt("Enter Ticket No to check-in: ")? else {
            return Ok(Flow::Quit);
        };

        let passenger = self.gate.check_in(&ticket)?;
        let message = format!(
            "Passenger '{}' checked-in for flight {}.",
            passenger.name, passenger.flight_id
        );
        writeln!(self.output, "{}", message)?;
        Ok(Flow::Continue)
    }

    fn start_boarding(&mut self) -> Result<Flow> {
        let Some(flight_id) = self.prompt("Enter Flight No to start boarding: ")? else {
            return Ok(Flow::Quit);
        };

        let before = self.gate.ledger().len();
        let result = self.gate.start_boarding(&flight_id)?;
        let flight = self.gate.find_flight(&flight_id)?;

        writeln!(
            self.output,
            "\n=== Boarding Flight {} : {} -> {} ===",
            flight.id, flight.origin, flight.destination
        )?;
        writeln!(
            self.output,
            "Departure: {} | Status: {}",
            flight.departure_label(),
            flight.status
        )?;
        writeln!(self.output, "{}", SEPARATOR)?;

        for record in &self.gate.ledger().records()[before..] {
            write_boarded(&mut self.output, record)?;
        }

        writeln!(
            self.output,
            "Boarding completed for flight {} ({} priority, {} normal).",
            result.flight_id, result.priority_boarded, result.normal_boarded
        )?;
        Ok(Flow::Continue)
    }

    fn view_waiting_and_boarded(&mut self) -> Result<Flow> {
        let Some(flight_id) = self.prompt("Enter Flight No: ")? else {
            return Ok(Flow::Quit);
        };

        writeln!(
            self.output,
            "\n=== Checked-in & Waiting to Board for {} ===",
            flight_id
        )?;
        let waiting: Vec<&Passenger> = self.gate.waiting_for_flight(&flight_id).collect();
        if waiting.is_empty() {
            writeln!(self.output, "No waiting passengers for flight {}.", flight_id)?;
        }
        for p in waiting {
            writeln!(self.output, "Name   : {}", p.name)?;
            writeln!(self.output, "Age    : {}", p.age)?;
            writeln!(self.output, "Ticket : {}", p.ticket)?;
            writeln!(self.output, "Seat   : {}", p.seat)?;
            writeln!(
                self.output,
                "Priority: {} | Assist: {}",
                p.priority, p.assistance
            )?;
            writeln!(self.output, "{}", SEPARATOR)?;
        }

        writeln!(self.output, "\n=== FINAL BOARDING LIST for {} ===", flight_id)?;
        let boarded: Vec<&BoardingRecord> = self.gate.boarded_for_flight(&flight_id).collect();
        if boarded.is_empty() {
            writeln!(self.output, "No boarded passengers for flight {} yet.", flight_id)?;
        }
        for record in boarded {
            let p = &record.passenger;
            writeln!(self.output, "Name        : {}", p.name)?;
            writeln!(self.output, "Age         : {}", p.age)?;
            writeln!(self.output, "Ticket No   : {}", p.ticket)?;
            writeln!(self.output, "Seat        : {}", p.seat)?;
            writeln!(self.output, "Priority    : {}", p.priority)?;
            writeln!(self.output, "Assistance  : {}", p.assistance)?;
            writeln!(self.output, "{}", SEPARATOR)?;
        }
        Ok(Flow::Continue)
    }

    fn view_special_assistance(&mut self) -> Result<Flow> {
        let Some(flight_id) = self.prompt("Enter Flight No: ")? else {
            return Ok(Flow::Quit);
        };

        writeln!(self.output, "\n--- Special Assistance for {} ---", flight_id)?;
        let assisted: Vec<&Passenger> =
            self.gate.special_assistance_for_flight(&flight_id).collect();
        if assisted.is_empty() {
            writeln!(
                self.output,
                "No special assistance passengers for {}.",
                flight_id
            )?;
        }
        for p in assisted {
            writeln!(
                self.output,
                "Name: {} | Assist: {} | Ticket: {} | Seat: {}",
                p.name, p.assistance, p.ticket, p.seat
            )?;
        }
        Ok(Flow::Continue)
    }

    fn export_manifest(&mut self) -> Result<Flow> {
        let Some(flight_id) = self.prompt("Enter Flight No: ")? else {
            return Ok(Flow::Quit);
        };
        self.gate.find_flight(&flight_id)?;

        let path = self.manifest_dir.join(format!("manifest_{}.csv", flight_id));
        let written = File::create(&path)
            .map_err(GateError::from)
            .and_then(|file| self.gate.export_manifest(&flight_id, file))
            .map_err(|e| manifest_failure(&path, e))?;

        tracing::info!("📄 Manifest for {} written to {}", flight_id, path.display());
        writeln!(
            self.output,
            "Manifest with {} passengers written to {}.",
            written,
            path.display()
        )?;
        Ok(Flow::Continue)
    }

    /// 顯示提示並讀取一行；輸入結束時回傳 `None`
    fn prompt(&mut self, label: &str) -> Result<Option<String>> {
        write!(self.output, "{}", label)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_number(&mut self, field: &str, label: &str) -> Result<Option<u32>> {
        let Some(raw) = self.prompt(label)? else {
            return Ok(None);
        };
        raw.parse::<u32>()
            .map(Some)
            .map_err(|_| GateError::InvalidInput {
                field: field.to_string(),
                value: raw,
                reason: "Expected a non-negative whole number".to_string(),
            })
    }
}

fn write_flight<W: Write>(output: &mut W, flight: &Flight) -> Result<()> {
    writeln!(output, "Flight No  : {}", flight.id)?;
    writeln!(
        output,
        "Route      : {} -> {}",
        flight.origin, flight.destination
    )?;
    writeln!(output, "Dep Time   : {}", flight.departure_label())?;
    writeln!(output, "Status     : {}", flight.status)?;
    writeln!(output, "{}", SEPARATOR)?;
    Ok(())
}

fn write_boarded<W: Write>(output: &mut W, record: &BoardingRecord) -> Result<()> {
    let p = &record.passenger;
    writeln!(output, "Boarded ({})", record.class)?;
    writeln!(output, "  Name   : {}", p.name)?;
    writeln!(output, "  Age    : {}", p.age)?;
    writeln!(output, "  Ticket : {}", p.ticket)?;
    writeln!(output, "  Seat   : {}", p.seat)?;
    writeln!(output, "{}", SEPARATOR)?;
    Ok(())
}

/// 匯出失敗回報為輸入錯誤，操作員可換目錄或航班重試
fn manifest_failure(path: &Path, e: GateError) -> GateError {
    tracing::warn!("⚠️ Manifest export to {} failed: {}", path.display(), e);
    GateError::InvalidInput {
        field: "manifest".to_string(),
        value: path.display().to_string(),
        reason: e.to_string(),
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "YES"
    } else {
        "NO"
    }
}
