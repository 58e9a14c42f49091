// SPDX-License-Identifier: Apache-2.0

//! Binding to the vendor DHCPv6 client HAL.
//!
//! The `ert_dhcp6c_get_info` and `ecm_dhcp6c_get_info` symbols are resolved
//! from the HAL library given at link time, e.g.
//! `RUSTFLAGS="-L /usr/lib -l dhcp6c_hal"`.

use std::ffi::CStr;

use libc::{c_char, c_int, c_uchar, c_uint};

use crate::{
    Dhcp6cClient, Dhcp6cError, Dhcp6cInfo, Dhcp6cInfoProvider, ErrorKind,
    IFNAME_LENGTH, IPV6_ADDR_SIZE, MAX_IPV6_ADDR_LIST_SIZE, STATUS_SUCCESS,
};

/// C layout of `dhcp6cInfo_t`.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct RawDhcp6cInfo {
    pub ifname: [c_char; IFNAME_LENGTH],
    pub sm_state: c_int,
    pub config_attemps: c_int,
    pub ip_addr: [c_uchar; IPV6_ADDR_SIZE],
    pub prefix: [c_uchar; IPV6_ADDR_SIZE],
    pub gw: [c_uchar; IPV6_ADDR_SIZE],
    pub dhcp_server: [c_uchar; IPV6_ADDR_SIZE],
    pub t1: c_uint,
    pub t2: c_uint,
    pub lease_time: c_uint,
    pub lease_got_time: c_uint,
    pub remain_lease_time: c_uint,
    pub remain_renew_time: c_uint,
    pub remain_rebind_time: c_uint,
    pub num_of_dns: c_int,
    pub dns_addr_list: [[c_uchar; IPV6_ADDR_SIZE]; MAX_IPV6_ADDR_LIST_SIZE],
}

impl Default for RawDhcp6cInfo {
    fn default() -> Self {
        Self {
            ifname: [0; IFNAME_LENGTH],
            sm_state: 0,
            config_attemps: 0,
            ip_addr: [0; IPV6_ADDR_SIZE],
            prefix: [0; IPV6_ADDR_SIZE],
            gw: [0; IPV6_ADDR_SIZE],
            dhcp_server: [0; IPV6_ADDR_SIZE],
            t1: 0,
            t2: 0,
            lease_time: 0,
            lease_got_time: 0,
            remain_lease_time: 0,
            remain_renew_time: 0,
            remain_rebind_time: 0,
            num_of_dns: 0,
            dns_addr_list: [[0; IPV6_ADDR_SIZE]; MAX_IPV6_ADDR_LIST_SIZE],
        }
    }
}

impl TryFrom<&RawDhcp6cInfo> for Dhcp6cInfo {
    type Error = Dhcp6cError;

    fn try_from(raw: &RawDhcp6cInfo) -> Result<Self, Self::Error> {
        let ifname_bytes: Vec<u8> =
            raw.ifname.iter().map(|c| *c as u8).collect();
        // HAL might not NUL terminate a full buffer
        let ifname = match CStr::from_bytes_until_nul(&ifname_bytes) {
            Ok(s) => s.to_string_lossy().to_string(),
            Err(_) => {
                return Err(Dhcp6cError::new(
                    ErrorKind::InvalidInfo,
                    "HAL returned interface name without NUL terminator"
                        .to_string(),
                ))
            }
        };
        let mut info = Dhcp6cInfo {
            sm_state: raw.sm_state,
            config_attempts: raw.config_attemps,
            ip_addr: raw.ip_addr,
            prefix: raw.prefix,
            gw: raw.gw,
            dhcp_server: raw.dhcp_server,
            t1: raw.t1,
            t2: raw.t2,
            lease_time: raw.lease_time,
            lease_got_time: raw.lease_got_time,
            remain_lease_time: raw.remain_lease_time,
            remain_renew_time: raw.remain_renew_time,
            remain_rebind_time: raw.remain_rebind_time,
            num_of_dns: raw.num_of_dns,
            dns_addr_list: raw.dns_addr_list,
            ..Default::default()
        };
        info.set_ifname(&ifname)?;
        Ok(info)
    }
}

extern "C" {
    fn ert_dhcp6c_get_info(info: *mut RawDhcp6cInfo) -> c_int;
    fn ecm_dhcp6c_get_info(info: *mut RawDhcp6cInfo) -> c_int;
}

/// Provider calling into the vendor HAL.
///
/// An absent output record is passed down as NULL so the HAL's own argument
/// check is what gets tested.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalDhcp6cProvider;

impl HalDhcp6cProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Dhcp6cInfoProvider for HalDhcp6cProvider {
    fn get_info(
        &self,
        client: Dhcp6cClient,
        info: Option<&mut Dhcp6cInfo>,
    ) -> Result<(), Dhcp6cError> {
        let mut raw = RawDhcp6cInfo::default();
        let ptr: *mut RawDhcp6cInfo = if info.is_some() {
            &mut raw
        } else {
            std::ptr::null_mut()
        };
        // SAFETY: `ptr` is NULL or points to a live, zeroed
        // `RawDhcp6cInfo` owned by this frame.
        let rc = unsafe {
            match client {
                Dhcp6cClient::ERouter => ert_dhcp6c_get_info(ptr),
                Dhcp6cClient::Ecm => ecm_dhcp6c_get_info(ptr),
            }
        };
        log::debug!("{} returned {rc}", client.api_name());
        if rc != STATUS_SUCCESS {
            return Err(Dhcp6cError::new(
                ErrorKind::Failure,
                format!("{} returned {rc}", client.api_name()),
            ));
        }
        match info {
            Some(info) => *info = Dhcp6cInfo::try_from(&raw)?,
            // Reported as is, the L1 negative case flags it
            None => log::warn!(
                "{} returned success for NULL info pointer",
                client.api_name()
            ),
        }
        Ok(())
    }
}
