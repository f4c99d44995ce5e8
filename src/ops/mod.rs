pub mod board_ops;
pub mod diagram;
pub mod task_ops;

use uuid::Uuid;

/// Error type for board and task operations
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum OpError {
    #[error("board not found: {0}")]
    BoardNotFound(String),
    #[error("task not found: {0}")]
    TaskNotFound(String),
    #[error("no active board")]
    NoActiveBoard,
    #[error("invalid day: {0} (expected 0-6, Sunday = 0)")]
    InvalidDay(u8),
    #[error("{0} has no tasks to copy")]
    EmptySourceDay(&'static str),
    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Generate an id like `b_k3j9x0q`: a type prefix plus a short random suffix.
/// Uniqueness is probabilistic.
pub fn new_id(prefix: &str) -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}_{}", prefix, &suffix[..7])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_id_has_prefix_and_suffix() {
        let id = new_id("t");
        assert!(id.starts_with("t_"));
        assert_eq!(id.len(), 9);
        assert_ne!(new_id("t"), new_id("t"));
    }
}
