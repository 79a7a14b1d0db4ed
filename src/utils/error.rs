use thiserror::Error;

#[derive(Error, Debug)]
pub enum GateError {
    #[error("Flight not found: {flight_id}")]
    FlightNotFound { flight_id: String },

    #[error("Passenger not found: {ticket}")]
    PassengerNotFound { ticket: String },

    #[error("Flight already exists: {flight_id}")]
    DuplicateFlight { flight_id: String },

    #[error("Ticket number already registered: {ticket}")]
    DuplicateTicket { ticket: String },

    #[error("Passenger {ticket} is already checked in")]
    AlreadyCheckedIn { ticket: String },

    #[error("Passenger {ticket} is already boarded")]
    AlreadyBoarded { ticket: String },

    #[error("Passenger {ticket} has not checked in")]
    NotCheckedIn { ticket: String },

    #[error("Invalid category choice: {value}")]
    InvalidCategory { value: String },

    #[error("Invalid special assistance value: {value}")]
    InvalidAssistance { value: String },

    #[error("Invalid value for '{field}': {value} ({reason})")]
    InvalidInput {
        field: String,
        value: String,
        reason: String,
    },

    #[error("No checked-in passengers to board for flight {flight_id}")]
    NoEligiblePassengers { flight_id: String },

    #[error("Audit sink unavailable: {reason}")]
    SinkUnavailable { reason: String },

    #[error("Invalid username or password")]
    AuthenticationFailed,

    #[error("Selected role {expected} but credentials belong to {actual}")]
    RoleMismatch { expected: String, actual: String },

    #[error("Role {role} may not {operation}")]
    PermissionDenied { role: String, operation: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    TaskFailed(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, GateError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    NotFound,
    Duplicate,
    StateConflict,
    InvalidInput,
    NoWork,
    Sink,
    Auth,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl GateError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            GateError::FlightNotFound { .. } | GateError::PassengerNotFound { .. } => {
                ErrorCategory::NotFound
            }
            GateError::DuplicateFlight { .. } | GateError::DuplicateTicket { .. } => {
                ErrorCategory::Duplicate
            }
            GateError::AlreadyCheckedIn { .. }
            | GateError::AlreadyBoarded { .. }
            | GateError::NotCheckedIn { .. } => ErrorCategory::StateConflict,
            GateError::InvalidCategory { .. }
            | GateError::InvalidAssistance { .. }
            | GateError::InvalidInput { .. } => ErrorCategory::InvalidInput,
            GateError::NoEligiblePassengers { .. } => ErrorCategory::NoWork,
            GateError::SinkUnavailable { .. } => ErrorCategory::Sink,
            GateError::AuthenticationFailed
            | GateError::RoleMismatch { .. }
            | GateError::PermissionDenied { .. } => ErrorCategory::Auth,
            GateError::ConfigError { .. } | GateError::ConfigValidationError { .. } => {
                ErrorCategory::Configuration
            }
            GateError::IoError(_)
            | GateError::CsvError(_)
            | GateError::SerializationError(_)
            | GateError::TaskFailed(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::NoWork | ErrorCategory::Sink => ErrorSeverity::Low,
            ErrorCategory::NotFound
            | ErrorCategory::Duplicate
            | ErrorCategory::StateConflict
            | ErrorCategory::InvalidInput
            | ErrorCategory::Auth => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 控制台是否可以回到選單繼續操作
    pub fn is_recoverable(&self) -> bool {
        self.severity() <= ErrorSeverity::Medium
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            GateError::FlightNotFound { .. } => {
                "Check the flight number or ask staff to add the flight first".to_string()
            }
            GateError::PassengerNotFound { .. } => {
                "Check the ticket number against the passenger list".to_string()
            }
            GateError::DuplicateFlight { .. } | GateError::DuplicateTicket { .. } => {
                "Use a different identifier; existing records cannot be replaced".to_string()
            }
            GateError::AlreadyCheckedIn { .. } | GateError::AlreadyBoarded { .. } => {
                "No action needed, the passenger state is already recorded".to_string()
            }
            GateError::NotCheckedIn { .. } => {
                "Check the passenger in before boarding".to_string()
            }
            GateError::InvalidCategory { .. } => {
                "Choose 1 (VIP), 2 (Elderly), 3 (Business) or 4 (Economy)".to_string()
            }
            GateError::InvalidAssistance { .. } => "Enter 'none' or 'wheelchair'".to_string(),
            GateError::InvalidInput { field, .. } => format!("Correct the value of '{}'", field),
            GateError::NoEligiblePassengers { .. } => {
                "Check passengers in before starting boarding".to_string()
            }
            GateError::SinkUnavailable { .. } => {
                "Check that the audit directory exists and is writable".to_string()
            }
            GateError::AuthenticationFailed => {
                "Verify the username and password in the credentials file".to_string()
            }
            GateError::RoleMismatch { actual, .. } => {
                format!("Log in through the {} menu", actual)
            }
            GateError::PermissionDenied { .. } => {
                "Log in with a role that is allowed to perform this operation".to_string()
            }
            GateError::ConfigError { .. } | GateError::ConfigValidationError { .. } => {
                "Review the TOML configuration file and command line flags".to_string()
            }
            GateError::IoError(_) => "Check file paths and permissions".to_string(),
            GateError::CsvError(_) => {
                "Check the CSV headers and that every row has all columns".to_string()
            }
            GateError::SerializationError(_) | GateError::TaskFailed(_) => {
                "Report this as a bug".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            GateError::FlightNotFound { .. } => "Flight not found.".to_string(),
            GateError::PassengerNotFound { .. } => "Passenger not found.".to_string(),
            GateError::DuplicateFlight { .. } => "Flight already exists.".to_string(),
            GateError::DuplicateTicket { ticket } => {
                format!("Ticket {} is already registered.", ticket)
            }
            GateError::AlreadyCheckedIn { .. } => "Passenger already checked in.".to_string(),
            GateError::InvalidAssistance { .. } => {
                "Invalid input. Enter 'none' or 'wheelchair'.".to_string()
            }
            GateError::NoEligiblePassengers { flight_id } => {
                format!("No checked-in passengers to board for flight {}.", flight_id)
            }
            GateError::AuthenticationFailed => "Invalid username or password.".to_string(),
            GateError::RoleMismatch { expected, actual } => {
                format!("You selected {} but logged in as {}.", expected, actual)
            }
            other => format!("{}.", other),
        }
    }
}
