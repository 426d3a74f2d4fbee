use periscope_core::{ClientInfo, ConnectionId, Role};

/// Open connections in the order they were accepted.
///
/// Owned by the relay event loop; nothing else mutates it. A linear scan is
/// fine at signaling volumes and keeps roster order stable.
#[derive(Debug, Default)]
pub struct Registry {
    entries: Vec<ClientInfo>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an unregistered entry. Returns `false` if `conn_id` is already present.
    pub fn insert(&mut self, conn_id: ConnectionId) -> bool {
        if self.contains(&conn_id) {
            return false;
        }
        self.entries.push(ClientInfo::new(conn_id));
        true
    }

    /// Last write wins. Returns `false` if `conn_id` is not open.
    pub fn set_role(&mut self, conn_id: &ConnectionId, role: Role) -> bool {
        let Some(entry) = self.entries.iter_mut().find(|e| &e.id == conn_id) else {
            return false;
        };
        entry.role = Some(role);
        true
    }

    pub fn remove(&mut self, conn_id: &ConnectionId) -> Option<ClientInfo> {
        let pos = self.entries.iter().position(|e| &e.id == conn_id)?;
        Some(self.entries.remove(pos))
    }

    pub fn get(&self, conn_id: &ConnectionId) -> Option<&ClientInfo> {
        self.entries.iter().find(|e| &e.id == conn_id)
    }

    pub fn contains(&self, conn_id: &ConnectionId) -> bool {
        self.get(conn_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClientInfo> {
        self.entries.iter()
    }

    pub fn snapshot(&self) -> Vec<ClientInfo> {
        self.entries.clone()
    }
}
