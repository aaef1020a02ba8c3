//! Target resolution.
//!
//! Turns a target string into the list of candidate addresses a channel may
//! dial. Accepted forms:
//!
//! - `host:port`
//! - `http://host:port`
//! - `multi:///host1:port1,host2:port2` (each entry may carry `http://`)

use raftadmin_common::protocol::error::{AdminError, Result};

const MULTI_SCHEME: &str = "multi:///";
const HTTP_SCHEME: &str = "http://";

/// Resolves `target` into one or more `host:port` addresses, in the order
/// given.
pub fn resolve(target: &str) -> Result<Vec<String>> {
    let target = target.trim();
    if target.is_empty() {
        return Err(AdminError::Resolve("empty target".to_string()));
    }

    match target.strip_prefix(MULTI_SCHEME) {
        Some(group) => {
            let addresses = group
                .split(',')
                .map(str::trim)
                .filter(|entry| !entry.is_empty())
                .map(parse_address)
                .collect::<Result<Vec<_>>>()?;
            if addresses.is_empty() {
                return Err(AdminError::Resolve(format!("{:?} names no addresses", target)));
            }
            Ok(addresses)
        }
        None => Ok(vec![parse_address(target)?]),
    }
}

fn parse_address(entry: &str) -> Result<String> {
    let address = entry
        .strip_prefix(HTTP_SCHEME)
        .unwrap_or(entry)
        .trim_end_matches('/');

    let (host, port) = address
        .rsplit_once(':')
        .ok_or_else(|| AdminError::Resolve(format!("{:?} is missing a port", entry)))?;
    if host.is_empty() || host.contains('/') {
        return Err(AdminError::Resolve(format!("{:?} has no valid host", entry)));
    }
    port.parse::<u16>()
        .map_err(|_| AdminError::Resolve(format!("{:?} has an invalid port", entry)))?;

    Ok(address.to_string())
}
