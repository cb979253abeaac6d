// Module declarations
pub mod error;
pub mod value;
pub mod row;
pub mod session;

// Re-exports for convenience
pub use error::CqlError;
pub use value::Value;
pub use row::Row;
pub use session::SessionState;
