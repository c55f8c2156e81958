//! Network interface lookup

use if_addrs::get_if_addrs;
use std::net::IpAddr;
use tracing::warn;

use paws_core::compile::InterfaceResolver;

/// [`InterfaceResolver`] backed by the host's interface table
pub struct SystemInterfaces;

impl InterfaceResolver for SystemInterfaces {
    fn addresses(&self, interface: &str) -> Vec<IpAddr> {
        match get_if_addrs() {
            Ok(interfaces) => interfaces
                .into_iter()
                .filter(|iface| iface.name == interface)
                .map(|iface| iface.ip())
                .collect(),
            Err(e) => {
                warn!("Failed to list network interfaces: {}", e);
                Vec::new()
            }
        }
    }
}
