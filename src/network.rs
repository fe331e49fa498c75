//! Shared view of the host's local IPv4 address.
//!
//! The address is read on every request to `/` and rewritten only when a
//! background probe notices a change, so it sits behind a `std` `RwLock`
//! with a synchronous accessor.
use std::net::{IpAddr, Ipv4Addr, UdpSocket};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const FALLBACK: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

#[derive(Debug, Clone)]
pub struct LocalAddress {
    current: Arc<RwLock<IpAddr>>,
}

impl LocalAddress {
    pub fn new(initial: IpAddr) -> Self {
        Self {
            current: Arc::new(RwLock::new(initial)),
        }
    }

    /// Start from whatever the default probe reports right now
    pub fn detect() -> Self {
        Self::new(probe_local_ipv4())
    }

    pub fn get(&self) -> IpAddr {
        *self.current.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Store `next`, returning the previous address if it changed
    fn update(&self, next: IpAddr) -> Option<IpAddr> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if *current == next {
            return None;
        }
        Some(std::mem::replace(&mut *current, next))
    }

    /// Re-run `probe` every `interval` until the returned guard is dropped
    pub fn spawn_refresh<P>(&self, interval: Duration, probe: P) -> RefreshTask
    where
        P: Fn() -> IpAddr + Send + 'static,
    {
        let handle = self.clone();
        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            // First tick completes immediately; the initial value is already set
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let next = probe();
                match handle.update(next) {
                    Some(previous) => info!("Local IP changed: {} -> {}", previous, next),
                    None => debug!("Local IP unchanged: {}", next),
                }
            }
        });
        RefreshTask { task }
    }
}

/// Owns the background probe loop; dropping it stops the loop
#[derive(Debug)]
pub struct RefreshTask {
    task: JoinHandle<()>,
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Outbound IPv4 address of this host, or 127.0.0.1 when there is no route.
/// Connecting a UDP socket only selects a route; nothing is sent.
pub fn probe_local_ipv4() -> IpAddr {
    let probe = || -> std::io::Result<IpAddr> {
        let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0))?;
        socket.connect((Ipv4Addr::new(8, 8, 8, 8), 80))?;
        Ok(socket.local_addr()?.ip())
    };

    match probe() {
        Ok(ip) if !ip.is_loopback() && !ip.is_unspecified() => ip,
        Ok(_) => FALLBACK,
        Err(e) => {
            debug!("Local IP probe failed, using fallback: {}", e);
            FALLBACK
        }
    }
}
