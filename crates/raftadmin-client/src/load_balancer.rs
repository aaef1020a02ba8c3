use std::collections::VecDeque;

/// Round-robin balancer over the addresses a channel considers ready
pub struct LoadBalancer {
    addresses: VecDeque<String>,
}

impl LoadBalancer {
    pub fn new(addresses: Vec<String>) -> Self {
        Self {
            addresses: VecDeque::from(addresses),
        }
    }

    /// Get the next address using round-robin
    pub fn next_address(&mut self) -> Option<String> {
        // Rotate: move first to back, return it
        let address = self.addresses.pop_front()?;
        self.addresses.push_back(address.clone());
        Some(address)
    }

    pub fn addresses(&self) -> Vec<String> {
        self.addresses.iter().cloned().collect()
    }
}
