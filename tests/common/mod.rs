// In-memory stand-in for a cluster: records every call, serves canned rows
// and fails the statements it is told to fail.
#![allow(dead_code)]

use async_trait::async_trait;
use cqlexec::{Connection, Connector, CqlError, Row};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Bind(String),
    Query(String),
    Command(String),
}

#[derive(Default)]
struct State {
    calls: Vec<Call>,
    connects: usize,
    refuse_connect: bool,
    missing_keyspaces: Vec<String>,
    failing: Vec<String>,
    rows: HashMap<String, Vec<Row>>,
}

#[derive(Clone, Default)]
pub struct FakeCluster {
    state: Arc<Mutex<State>>,
}

impl FakeCluster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_on(self, statement: &str) -> Self {
        self.state.lock().unwrap().failing.push(statement.to_string());
        self
    }

    pub fn without_keyspace(self, keyspace: &str) -> Self {
        self.state.lock().unwrap().missing_keyspaces.push(keyspace.to_string());
        self
    }

    pub fn refusing_connections(self) -> Self {
        self.state.lock().unwrap().refuse_connect = true;
        self
    }

    pub fn with_rows(self, statement: &str, rows: Vec<Row>) -> Self {
        self.state.lock().unwrap().rows.insert(statement.to_string(), rows);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    /// Statements that reached the cluster, without keyspace binds.
    pub fn executed(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Query(s) | Call::Command(s) => Some(s),
                Call::Bind(_) => None,
            })
            .collect()
    }

    pub fn connects(&self) -> usize {
        self.state.lock().unwrap().connects
    }
}

pub struct FakeConnection {
    state: Arc<Mutex<State>>,
}

impl FakeConnection {
    fn check(&self, statement: &str) -> Result<(), CqlError> {
        let state = self.state.lock().unwrap();
        if state.failing.iter().any(|s| s == statement) {
            return Err(CqlError::Execution(format!(
                "line 1:0 no viable alternative at input '{statement}'"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Connector for FakeCluster {
    type Connection = FakeConnection;

    async fn connect(&self) -> Result<FakeConnection, CqlError> {
        let mut state = self.state.lock().unwrap();
        if state.refuse_connect {
            return Err(CqlError::Connection("connection refused".to_string()));
        }
        state.connects += 1;
        Ok(FakeConnection {
            state: Arc::clone(&self.state),
        })
    }
}

#[async_trait]
impl Connection for FakeConnection {
    async fn bind_keyspace(&mut self, keyspace: &str) -> Result<(), CqlError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Bind(keyspace.to_string()));
        if state.missing_keyspaces.iter().any(|k| k == keyspace) {
            return Err(CqlError::Connection(format!("Keyspace '{keyspace}' does not exist")));
        }
        Ok(())
    }

    async fn execute_query(&mut self, statement: &str) -> Result<Vec<Row>, CqlError> {
        self.state.lock().unwrap().calls.push(Call::Query(statement.to_string()));
        self.check(statement)?;
        Ok(self.state.lock().unwrap().rows.get(statement).cloned().unwrap_or_default())
    }

    async fn execute_command(&mut self, statement: &str) -> Result<(), CqlError> {
        self.state.lock().unwrap().calls.push(Call::Command(statement.to_string()));
        self.check(statement)
    }
}
