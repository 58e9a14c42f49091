// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::net::Ipv6Addr;
use std::path::Path;

use serde::Deserialize;

use crate::{Dhcp6cClient, Dhcp6cError, Dhcp6cInfo, ErrorKind};

/// The `get_info` accessors of a DHCPv6 client implementation.
pub trait Dhcp6cInfoProvider {
    /// Populate `info` with the status of the `client` instance.
    ///
    /// An absent `info` must fail with [ErrorKind::InvalidArgument] (or
    /// [ErrorKind::Failure] when the failure comes from the implementation)
    /// without side effects.
    fn get_info(
        &self,
        client: Dhcp6cClient,
        info: Option<&mut Dhcp6cInfo>,
    ) -> Result<(), Dhcp6cError>;
}

pub(crate) fn null_info_error(client: Dhcp6cClient) -> Dhcp6cError {
    Dhcp6cError::new(
        ErrorKind::InvalidArgument,
        format!("{}: got NULL info pointer", client.api_name()),
    )
}

/// One DHCPv6 client record as written in a fixture file.
#[derive(Debug, PartialEq, Eq, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Dhcp6cInfoFixture {
    pub ifname: String,
    pub sm_state: i32,
    pub config_attempts: i32,
    pub ip_addr: Option<Ipv6Addr>,
    pub prefix: Option<Ipv6Addr>,
    pub gw: Option<Ipv6Addr>,
    pub dhcp_server: Option<Ipv6Addr>,
    pub t1: u32,
    pub t2: u32,
    pub lease_time: u32,
    pub lease_got_time: u32,
    pub remain_lease_time: u32,
    pub remain_renew_time: u32,
    pub remain_rebind_time: u32,
    pub dns_servers: Vec<Ipv6Addr>,
}

impl Dhcp6cInfoFixture {
    fn fill(&self, info: &mut Dhcp6cInfo) -> Result<(), Dhcp6cError> {
        let mut new_info = Dhcp6cInfo {
            sm_state: self.sm_state,
            config_attempts: self.config_attempts,
            ip_addr: octets_or_zero(self.ip_addr),
            prefix: octets_or_zero(self.prefix),
            gw: octets_or_zero(self.gw),
            dhcp_server: octets_or_zero(self.dhcp_server),
            t1: self.t1,
            t2: self.t2,
            lease_time: self.lease_time,
            lease_got_time: self.lease_got_time,
            remain_lease_time: self.remain_lease_time,
            remain_renew_time: self.remain_renew_time,
            remain_rebind_time: self.remain_rebind_time,
            ..Default::default()
        };
        new_info.set_ifname(&self.ifname)?;
        new_info.set_dns_servers(&self.dns_servers)?;
        *info = new_info;
        Ok(())
    }
}

fn octets_or_zero(addr: Option<Ipv6Addr>) -> [u8; 16] {
    addr.unwrap_or(Ipv6Addr::UNSPECIFIED).octets()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StaticFixtureFile {
    erouter: Option<Dhcp6cInfoFixture>,
    ecm: Option<Dhcp6cInfoFixture>,
}

/// Provider answering from pre-recorded client records, e.g.
///
/// ```json
/// {
///   "erouter": {
///     "ifname": "erouter0",
///     "sm_state": 3,
///     "ip_addr": "2001:db8::10",
///     "t1": 1800,
///     "t2": 2880,
///     "lease_time": 3600,
///     "dns_servers": ["2001:db8::53"]
///   }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticDhcp6cProvider {
    records: HashMap<Dhcp6cClient, Dhcp6cInfoFixture>,
}

impl StaticDhcp6cProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_json(content: &str) -> Result<Self, Dhcp6cError> {
        let file: StaticFixtureFile = serde_json::from_str(content)?;
        let mut ret = Self::new();
        if let Some(r) = file.erouter {
            ret.insert(Dhcp6cClient::ERouter, r);
        }
        if let Some(r) = file.ecm {
            ret.insert(Dhcp6cClient::Ecm, r);
        }
        Ok(ret)
    }

    pub fn from_file(path: &Path) -> Result<Self, Dhcp6cError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Dhcp6cError::new(
                ErrorKind::InvalidArgument,
                format!("Failed to read fixture {}: {e}", path.display()),
            )
        })?;
        Self::from_json(&content)
    }

    pub fn insert(
        &mut self,
        client: Dhcp6cClient,
        record: Dhcp6cInfoFixture,
    ) -> &mut Self {
        self.records.insert(client, record);
        self
    }
}

impl Dhcp6cInfoProvider for StaticDhcp6cProvider {
    fn get_info(
        &self,
        client: Dhcp6cClient,
        info: Option<&mut Dhcp6cInfo>,
    ) -> Result<(), Dhcp6cError> {
        let info = info.ok_or_else(|| null_info_error(client))?;
        let record = self.records.get(&client).ok_or_else(|| {
            Dhcp6cError::new(
                ErrorKind::NotFound,
                format!("No {client} DHCPv6 client record"),
            )
        })?;
        record.fill(info)?;
        log::debug!("{}: filled {client} info", client.api_name());
        Ok(())
    }
}
