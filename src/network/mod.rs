// Network module - connection abstraction and the CQL native protocol driver

pub mod connection;
pub mod driver;

pub use connection::{Connection, Connector};
pub use driver::{ScyllaConnection, ScyllaConnector};
