use thiserror::Error;

/// Recoverable failures of [`Manager`][crate::manager::Manager] operations.
///
/// Precondition violations (mixing managers, zero literals, renaming
/// outside the universe) are not represented here: they panic.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SddError {
    /// A literal or variable refers to a variable outside `1..=var_count`.
    #[error("variable {variable} is out of range for a manager with {var_count} variables")]
    VariableOutOfRange { variable: u64, var_count: usize },

    /// The engine could not allocate state for the requested universe.
    #[error("cannot allocate an engine for {var_count} variables")]
    Allocation { var_count: usize },
}
