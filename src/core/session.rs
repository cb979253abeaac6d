/// Client-side session state for one run.
///
/// The cluster never sees `USE` statements; the keyspace recorded here is
/// applied to the connection right before each statement that reaches it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    active_keyspace: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a session already scoped to `keyspace` (`-k` on the command line).
    pub fn with_keyspace(keyspace: Option<&str>) -> Self {
        let mut state = Self::new();
        if let Some(name) = keyspace.map(str::trim).filter(|name| !name.is_empty()) {
            state.set_keyspace(name);
        }
        state
    }

    /// Keyspace names are compared case-insensitively, so they are stored lower-cased.
    pub fn set_keyspace(&mut self, name: &str) {
        self.active_keyspace = Some(name.to_lowercase());
    }

    pub fn current_keyspace(&self) -> Option<&str> {
        self.active_keyspace.as_deref()
    }
}
