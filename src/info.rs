// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv6Addr;

use crate::{Dhcp6cError, ErrorKind, IPV6_ADDR_SIZE};

/// Size of interface name buffer including the trailing NUL.
pub const IFNAME_LENGTH: usize = 64;
pub const MAX_IPV6_ADDR_LIST_SIZE: usize = 4;

pub const STATUS_SUCCESS: i32 = 0;
pub const STATUS_FAILURE: i32 = -1;

/// The DHCPv6 client instances found on the device.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash)]
pub enum Dhcp6cClient {
    /// Router side (eRouter) interface
    ERouter,
    /// Cable modem side (ECM) interface
    Ecm,
}

impl Dhcp6cClient {
    pub fn api_name(&self) -> &'static str {
        match self {
            Self::ERouter => "ert_dhcp6c_get_info",
            Self::Ecm => "ecm_dhcp6c_get_info",
        }
    }

    /// KVP profile key holding the expected interface name.
    pub fn ifname_profile_key(&self) -> &'static str {
        match self {
            Self::ERouter => "dhcp6c/config/ERouter_DHCPv6/ifName",
            Self::Ecm => "dhcp6c/config/ecm_DHCPv6/ifName",
        }
    }
}

impl std::fmt::Display for Dhcp6cClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ERouter => write!(f, "erouter"),
            Self::Ecm => write!(f, "ecm"),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Dhcp6cStatus {
    Success,
    Failure,
}

impl From<Dhcp6cStatus> for i32 {
    fn from(v: Dhcp6cStatus) -> i32 {
        match v {
            Dhcp6cStatus::Success => STATUS_SUCCESS,
            Dhcp6cStatus::Failure => STATUS_FAILURE,
        }
    }
}

impl<T> From<&Result<T, Dhcp6cError>> for Dhcp6cStatus {
    fn from(result: &Result<T, Dhcp6cError>) -> Self {
        if result.is_ok() {
            Self::Success
        } else {
            Self::Failure
        }
    }
}

impl std::fmt::Display for Dhcp6cStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", i32::from(*self))
    }
}

const SM_STATE_INIT: i32 = 0;
const SM_STATE_SOLICIT: i32 = 1;
const SM_STATE_REQUEST: i32 = 2;
const SM_STATE_BOUND: i32 = 3;
const SM_STATE_RENEW: i32 = 4;
const SM_STATE_REBIND: i32 = 5;
const SM_STATE_RELEASE: i32 = 6;

/// State of the DHCPv6 client state machine as reported in
/// [Dhcp6cInfo::sm_state].
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord, Hash, Default)]
pub enum Dhcp6cSmState {
    #[default]
    Init,
    /// Sent `Solicit`, waiting `Advertise`
    Solicit,
    /// Sent `Request`, waiting `Reply`
    Request,
    /// Lease acquired, waiting on T1 timer.
    Bound,
    Renew,
    Rebind,
    Release,
}

impl TryFrom<i32> for Dhcp6cSmState {
    type Error = Dhcp6cError;

    fn try_from(d: i32) -> Result<Self, Self::Error> {
        match d {
            SM_STATE_INIT => Ok(Self::Init),
            SM_STATE_SOLICIT => Ok(Self::Solicit),
            SM_STATE_REQUEST => Ok(Self::Request),
            SM_STATE_BOUND => Ok(Self::Bound),
            SM_STATE_RENEW => Ok(Self::Renew),
            SM_STATE_REBIND => Ok(Self::Rebind),
            SM_STATE_RELEASE => Ok(Self::Release),
            _ => Err(Dhcp6cError::new(
                ErrorKind::InvalidInfo,
                format!("Unknown DHCPv6 client state {d}"),
            )),
        }
    }
}

impl From<Dhcp6cSmState> for i32 {
    fn from(v: Dhcp6cSmState) -> i32 {
        match v {
            Dhcp6cSmState::Init => SM_STATE_INIT,
            Dhcp6cSmState::Solicit => SM_STATE_SOLICIT,
            Dhcp6cSmState::Request => SM_STATE_REQUEST,
            Dhcp6cSmState::Bound => SM_STATE_BOUND,
            Dhcp6cSmState::Renew => SM_STATE_RENEW,
            Dhcp6cSmState::Rebind => SM_STATE_REBIND,
            Dhcp6cSmState::Release => SM_STATE_RELEASE,
        }
    }
}

impl std::fmt::Display for Dhcp6cSmState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Init => "init",
                Self::Solicit => "solicit",
                Self::Request => "request",
                Self::Bound => "bound",
                Self::Renew => "renew",
                Self::Rebind => "rebind",
                Self::Release => "release",
            }
        )
    }
}

/// Status of a DHCPv6 client instance as returned by `get_info`.
///
/// Callers own the record: start from `Dhcp6cInfo::default()` (all zero) and
/// let the provider fill it in place.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct Dhcp6cInfo {
    pub(crate) ifname: String,
    pub sm_state: i32,
    pub config_attempts: i32,
    pub ip_addr: [u8; IPV6_ADDR_SIZE],
    pub prefix: [u8; IPV6_ADDR_SIZE],
    pub gw: [u8; IPV6_ADDR_SIZE],
    pub dhcp_server: [u8; IPV6_ADDR_SIZE],
    pub t1: u32,
    pub t2: u32,
    pub lease_time: u32,
    pub lease_got_time: u32,
    pub remain_lease_time: u32,
    pub remain_renew_time: u32,
    pub remain_rebind_time: u32,
    pub num_of_dns: i32,
    pub dns_addr_list: [[u8; IPV6_ADDR_SIZE]; MAX_IPV6_ADDR_LIST_SIZE],
}

impl Dhcp6cInfo {
    pub fn ifname(&self) -> &str {
        self.ifname.as_str()
    }

    /// Interface name must fit the fixed size buffer with its NUL
    /// terminator and contain no NUL itself.
    pub fn set_ifname(&mut self, ifname: &str) -> Result<(), Dhcp6cError> {
        if ifname.len() >= IFNAME_LENGTH {
            return Err(Dhcp6cError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "Interface name {ifname} exceeds {} bytes",
                    IFNAME_LENGTH - 1
                ),
            ));
        }
        if ifname.contains('\0') {
            return Err(Dhcp6cError::new(
                ErrorKind::InvalidArgument,
                format!("Interface name {ifname:?} contains NUL"),
            ));
        }
        self.ifname = ifname.to_string();
        Ok(())
    }

    /// Store DNS servers, fails when more than [MAX_IPV6_ADDR_LIST_SIZE]
    /// are given.
    pub fn set_dns_servers(
        &mut self,
        servers: &[Ipv6Addr],
    ) -> Result<(), Dhcp6cError> {
        if servers.len() > MAX_IPV6_ADDR_LIST_SIZE {
            return Err(Dhcp6cError::new(
                ErrorKind::InvalidArgument,
                format!(
                    "Got {} DNS servers, at most {} supported",
                    servers.len(),
                    MAX_IPV6_ADDR_LIST_SIZE
                ),
            ));
        }
        self.dns_addr_list = Default::default();
        for (slot, srv) in self.dns_addr_list.iter_mut().zip(servers) {
            *slot = srv.octets();
        }
        self.num_of_dns = servers.len() as i32;
        Ok(())
    }

    pub fn sm_state(&self) -> Result<Dhcp6cSmState, Dhcp6cError> {
        Dhcp6cSmState::try_from(self.sm_state)
    }

    pub fn dns_servers(&self) -> Vec<Ipv6Addr> {
        let count = usize::try_from(self.num_of_dns)
            .unwrap_or_default()
            .min(MAX_IPV6_ADDR_LIST_SIZE);
        self.dns_addr_list[..count]
            .iter()
            .map(|o| Ipv6Addr::from(*o))
            .collect()
    }

    /// Domain sanity check of the reported lease, beyond the plain octet and
    /// sign checks of the L1 suite.
    pub fn sanitize(&self) -> Result<(), Dhcp6cError> {
        let state = self.sm_state()?;

        if self.config_attempts < 0 {
            return Err(invalid_info(format!(
                "Negative config attempts {}",
                self.config_attempts
            )));
        }

        if self.num_of_dns < 0
            || self.num_of_dns as usize > MAX_IPV6_ADDR_LIST_SIZE
        {
            return Err(invalid_info(format!(
                "DNS server count {} outside of 0..={}",
                self.num_of_dns, MAX_IPV6_ADDR_LIST_SIZE
            )));
        }

        if self.t2 != 0 && self.t1 > self.t2 {
            return Err(invalid_info(format!(
                "T1({} secs) bigger than T2({} secs)",
                self.t1, self.t2
            )));
        }

        if self.lease_time != 0 && self.t2 > self.lease_time {
            return Err(invalid_info(format!(
                "T2({} secs) bigger than lease time({} secs)",
                self.t2, self.lease_time
            )));
        }

        if self.lease_time != 0 && self.remain_lease_time > self.lease_time {
            return Err(invalid_info(format!(
                "Remaining lease time({} secs) bigger than lease time({} \
                 secs)",
                self.remain_lease_time, self.lease_time
            )));
        }

        if self.t1 != 0 && self.remain_renew_time > self.t1 {
            return Err(invalid_info(format!(
                "Remaining renew time({} secs) bigger than T1({} secs)",
                self.remain_renew_time, self.t1
            )));
        }

        if self.t2 != 0 && self.remain_rebind_time > self.t2 {
            return Err(invalid_info(format!(
                "Remaining rebind time({} secs) bigger than T2({} secs)",
                self.remain_rebind_time, self.t2
            )));
        }

        if state == Dhcp6cSmState::Bound
            && Ipv6Addr::from(self.ip_addr).is_unspecified()
        {
            return Err(invalid_info(
                "Bound state with all zero IPv6 address".to_string(),
            ));
        }

        for (i, dns) in self
            .dns_addr_list
            .iter()
            .enumerate()
            .skip(self.num_of_dns as usize)
        {
            if !Ipv6Addr::from(*dns).is_unspecified() {
                return Err(invalid_info(format!(
                    "DNS entry {i} set beyond DNS server count {}",
                    self.num_of_dns
                )));
            }
        }
        Ok(())
    }
}

fn invalid_info(msg: String) -> Dhcp6cError {
    Dhcp6cError::new(ErrorKind::InvalidInfo, msg)
}
