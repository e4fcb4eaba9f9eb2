use crate::network::PortId;

/// Errors raised by the port network
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// Port was never allocated, or has already been released
    UnknownPort(PortId),
}

impl std::fmt::Display for NetworkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkError::UnknownPort(port) => write!(f, "Unknown or released port {}", port),
        }
    }
}

impl std::error::Error for NetworkError {}

/// Errors returned by grid mutations
///
/// `OutOfBounds` and `InvalidArgument` are raised before anything is touched.
/// `InvariantViolation` is a defect: propagation may already have rewritten
/// some slots when it surfaces, and no rollback is attempted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// Coordinates outside the grid
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },
    /// Caller handed in something unusable (e.g. a destroyed block)
    InvalidArgument(String),
    /// Routing reached a state the algorithm cannot handle
    InvariantViolation(String),
}

impl std::fmt::Display for GridError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridError::OutOfBounds {
                x,
                y,
                width,
                height,
            } => write!(
                f,
                "Coordinates ({}, {}) outside of {}x{} grid",
                x, y, width, height
            ),
            GridError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
            GridError::InvariantViolation(msg) => write!(f, "Routing invariant violated: {}", msg),
        }
    }
}

impl std::error::Error for GridError {}

impl From<NetworkError> for GridError {
    fn from(e: NetworkError) -> Self {
        GridError::InvariantViolation(e.to_string())
    }
}

/// Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;
