//! Per-IP connection limiting
//!
//! One tracker is shared by the TCP and WebSocket listeners, so a client's
//! connections count against the same limit on either transport.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};

/// Tracks open connections per IP address
///
/// A limit of 0 means unlimited connections are allowed.
#[derive(Debug)]
pub struct ConnectionTracker {
    open: Arc<Mutex<HashMap<IpAddr, usize>>>,
    max_per_ip: usize,
}

impl ConnectionTracker {
    #[must_use]
    pub fn new(max_per_ip: usize) -> Self {
        Self {
            open: Arc::new(Mutex::new(HashMap::new())),
            max_per_ip,
        }
    }

    /// Try to take a connection slot for `ip`
    ///
    /// Returns `None` if the IP is at its limit. The slot is released when
    /// the guard is dropped.
    pub fn try_acquire(&self, ip: IpAddr) -> Option<ConnectionGuard> {
        let mut open = self.open.lock().expect("connection tracker lock");
        let count = open.entry(ip).or_insert(0);

        if self.max_per_ip > 0 && *count >= self.max_per_ip {
            return None;
        }

        *count += 1;
        Some(ConnectionGuard {
            ip,
            open: Arc::clone(&self.open),
        })
    }

    /// Open connections for one IP
    pub fn count(&self, ip: IpAddr) -> usize {
        let open = self.open.lock().expect("connection tracker lock");
        open.get(&ip).copied().unwrap_or(0)
    }
}

/// Releases a connection slot when dropped
#[derive(Debug)]
pub struct ConnectionGuard {
    ip: IpAddr,
    open: Arc<Mutex<HashMap<IpAddr, usize>>>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let mut open = self.open.lock().expect("connection tracker lock");
        if let Some(count) = open.get_mut(&self.ip) {
            *count = count.saturating_sub(1);
            if *count == 0 {
                open.remove(&self.ip);
            }
        }
    }
}
