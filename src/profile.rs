// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use serde_json::Value;

use crate::{Dhcp6cError, ErrorKind};

/// Key/value platform profile.
///
/// Keys are `/` separated paths into nested JSON objects, so
/// `dhcp6c/config/ERouter_DHCPv6/ifName` reads
/// `{"dhcp6c": {"config": {"ERouter_DHCPv6": {"ifName": "erouter0"}}}}`.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct KvpProfile {
    root: Value,
}

impl KvpProfile {
    pub fn from_json(content: &str) -> Result<Self, Dhcp6cError> {
        let root: Value = serde_json::from_str(content)?;
        if !root.is_object() {
            return Err(Dhcp6cError::new(
                ErrorKind::InvalidArgument,
                "KVP profile root should be an object".to_string(),
            ));
        }
        Ok(Self { root })
    }

    pub fn from_file(path: &Path) -> Result<Self, Dhcp6cError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Dhcp6cError::new(
                ErrorKind::InvalidArgument,
                format!("Failed to read profile {}: {e}", path.display()),
            )
        })?;
        log::debug!("Loaded KVP profile {}", path.display());
        Self::from_json(&content)
    }

    fn lookup(&self, key: &str) -> Result<&Value, Dhcp6cError> {
        let pointer = format!("/{}", key.trim_matches('/'));
        self.root.pointer(&pointer).ok_or_else(|| {
            Dhcp6cError::new(
                ErrorKind::NotFound,
                format!("KVP profile has no key {key}"),
            )
        })
    }

    pub fn get_string(&self, key: &str) -> Result<&str, Dhcp6cError> {
        self.lookup(key)?.as_str().ok_or_else(|| {
            Dhcp6cError::new(
                ErrorKind::InvalidArgument,
                format!("KVP profile key {key} is not a string"),
            )
        })
    }
}
