use crate::utils::error::{GateError, Result};
use chrono::{DateTime, Local, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 達到此優先級的旅客走優先登機通道
pub const PRIORITY_THRESHOLD: u8 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightStatus {
    OnTime,
    Delayed,
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FlightStatus::OnTime => write!(f, "ON_TIME"),
            FlightStatus::Delayed => write!(f, "DELAYED"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flight {
    pub id: String,
    pub origin: String,
    pub destination: String,
    pub departure: NaiveTime,
    pub status: FlightStatus,
}

impl Flight {
    pub fn departure_label(&self) -> String {
        self.departure.format("%H:%M").to_string()
    }
}

/// 旅客類別，建立時決定優先級且之後不變
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Vip,
    Elderly,
    Business,
    Economy,
}

impl Category {
    /// 選單編號: 1=VIP, 2=Elderly, 3=Business, 4=Economy
    pub fn from_choice(choice: u8) -> Result<Self> {
        match choice {
            1 => Ok(Category::Vip),
            2 => Ok(Category::Elderly),
            3 => Ok(Category::Business),
            4 => Ok(Category::Economy),
            other => Err(GateError::InvalidCategory {
                value: other.to_string(),
            }),
        }
    }

    pub fn priority(self) -> u8 {
        match self {
            Category::Vip => 10,
            Category::Elderly => 8,
            Category::Business => 6,
            Category::Economy => 3,
        }
    }
}

impl FromStr for Category {
    type Err = GateError;

    /// 接受類別名稱或選單編號
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vip" => Ok(Category::Vip),
            "elderly" => Ok(Category::Elderly),
            "business" => Ok(Category::Business),
            "economy" => Ok(Category::Economy),
            "1" => Category::from_choice(1),
            "2" => Category::from_choice(2),
            "3" => Category::from_choice(3),
            "4" => Category::from_choice(4),
            _ => Err(GateError::InvalidCategory {
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Assistance {
    None,
    Wheelchair,
}

impl FromStr for Assistance {
    type Err = GateError;

    /// 僅接受完全相同的 `none` 或 `wheelchair`
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(Assistance::None),
            "wheelchair" => Ok(Assistance::Wheelchair),
            other => Err(GateError::InvalidAssistance {
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Assistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Assistance::None => write!(f, "none"),
            Assistance::Wheelchair => write!(f, "wheelchair"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passenger {
    pub name: String,
    pub age: u32,
    pub ticket: String,
    pub seat: String,
    pub flight_id: String,
    pub priority: u8,
    pub assistance: Assistance,
    pub baggage_kg: u32,
    pub checked_in: bool,
    pub boarded: bool,
}

impl Passenger {
    pub fn is_priority_class(&self) -> bool {
        self.priority >= PRIORITY_THRESHOLD
    }

    pub fn is_eligible_for(&self, flight_id: &str) -> bool {
        self.flight_id == flight_id && self.checked_in && !self.boarded
    }
}

/// 建立旅客時的原始輸入，類別與協助需求尚未驗證
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPassenger {
    pub name: String,
    pub age: u32,
    pub ticket: String,
    pub seat: String,
    pub flight_id: String,
    pub category: String,
    pub assistance: String,
    pub baggage_kg: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriorityClass {
    Priority,
    Normal,
}

impl fmt::Display for PriorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityClass::Priority => write!(f, "PRIORITY"),
            PriorityClass::Normal => write!(f, "NORMAL"),
        }
    }
}

/// 登機紀錄: 旅客快照 + 航班快照 + 時間，寫入後不可變
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardingRecord {
    pub passenger: Passenger,
    pub flight: Flight,
    pub boarded_at: DateTime<Local>,
    pub class: PriorityClass,
}

impl BoardingRecord {
    /// 稽核檔的單行格式，欄位順序固定
    pub fn audit_line(&self) -> String {
        format!(
            "{} | Age:{} | {} | Seat:{} | Flight:{} | {}->{} | Depart:{} | Status:{} | Priority:{} | Assist:{} | Time:{}",
            self.passenger.name,
            self.passenger.age,
            self.passenger.ticket,
            self.passenger.seat,
            self.flight.id,
            self.flight.origin,
            self.flight.destination,
            self.flight.departure_label(),
            self.flight.status,
            self.passenger.priority,
            self.passenger.assistance,
            self.boarded_at.format("%d-%m-%Y %H:%M:%S"),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardingResult {
    pub flight_id: String,
    pub priority_boarded: usize,
    pub normal_boarded: usize,
    pub sequence: Vec<String>,
}

impl BoardingResult {
    pub fn total(&self) -> usize {
        self.priority_boarded + self.normal_boarded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Staff,
    Agent,
    Crew,
}

impl Role {
    pub fn permits(self, operation: Operation) -> bool {
        use Operation::*;
        match self {
            Role::Staff => matches!(
                operation,
                CreateFlight | ListFlights | UpdateFlightStatus | CreatePassenger | ListPassengers
            ),
            Role::Agent => matches!(operation, CheckIn | StartBoarding | ListFlights),
            Role::Crew => matches!(
                operation,
                ListWaitingAndBoarded | ListSpecialAssistance | ExportManifest
            ),
        }
    }
}

impl FromStr for Role {
    type Err = GateError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "STAFF" => Ok(Role::Staff),
            "AGENT" => Ok(Role::Agent),
            "CREW" => Ok(Role::Crew),
            other => Err(GateError::InvalidInput {
                field: "role".to_string(),
                value: other.to_string(),
                reason: "Expected STAFF, AGENT or CREW".to_string(),
            }),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Staff => write!(f, "STAFF"),
            Role::Agent => write!(f, "AGENT"),
            Role::Crew => write!(f, "CREW"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateFlight,
    ListFlights,
    UpdateFlightStatus,
    CreatePassenger,
    ListPassengers,
    CheckIn,
    StartBoarding,
    ListWaitingAndBoarded,
    ListSpecialAssistance,
    ExportManifest,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Operation::CreateFlight => "create flights",
            Operation::ListFlights => "list flights",
            Operation::UpdateFlightStatus => "update flight status",
            Operation::CreatePassenger => "create passengers",
            Operation::ListPassengers => "list passengers",
            Operation::CheckIn => "check in passengers",
            Operation::StartBoarding => "start boarding",
            Operation::ListWaitingAndBoarded => "list waiting and boarded passengers",
            Operation::ListSpecialAssistance => "list special assistance passengers",
            Operation::ExportManifest => "export boarding manifests",
        };
        write!(f, "{}", label)
    }
}
