// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::net::{IpAddr, Ipv6Addr};

use futures::stream::TryStreamExt;
use rtnetlink::{
    packet_route::{
        address::AddressAttribute,
        route::{RouteAddress, RouteAttribute},
    },
    RouteMessageBuilder,
};

use crate::{
    provider::null_info_error, Dhcp6cClient, Dhcp6cError, Dhcp6cInfo,
    Dhcp6cInfoProvider, Dhcp6cSmState, ErrorKind, KvpProfile,
};

// Kernel use 0xFFFFFFFF for `forever` lifetime
const INFINITY_LIFE_TIME: u32 = u32::MAX;

/// Provider reporting what the kernel knows about the DHCPv6 client
/// interfaces: the global IPv6 address with its remaining lifetime, the
/// prefix it belongs to and the default gateway.
#[derive(Debug, Clone, Default)]
pub struct NetlinkDhcp6cProvider {
    ifnames: HashMap<Dhcp6cClient, String>,
}

impl NetlinkDhcp6cProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use interface names stored in the KVP profile, clients without
    /// profile entry are left unset.
    pub fn from_profile(profile: &KvpProfile) -> Self {
        let mut ret = Self::new();
        for client in [Dhcp6cClient::ERouter, Dhcp6cClient::Ecm] {
            match profile.get_string(client.ifname_profile_key()) {
                Ok(ifname) => {
                    ret.set_ifname(client, ifname);
                }
                Err(e) => log::debug!("No interface for {client}: {e}"),
            }
        }
        ret
    }

    pub fn set_ifname(
        &mut self,
        client: Dhcp6cClient,
        ifname: &str,
    ) -> &mut Self {
        self.ifnames.insert(client, ifname.to_string());
        self
    }
}

impl Dhcp6cInfoProvider for NetlinkDhcp6cProvider {
    fn get_info(
        &self,
        client: Dhcp6cClient,
        info: Option<&mut Dhcp6cInfo>,
    ) -> Result<(), Dhcp6cError> {
        let info = info.ok_or_else(|| null_info_error(client))?;
        let iface_name = self.ifnames.get(&client).ok_or_else(|| {
            Dhcp6cError::new(
                ErrorKind::NotFound,
                format!("No interface configured for {client} DHCPv6 client"),
            )
        })?;

        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_io()
            .enable_time()
            .build()?;
        let new_info = rt.block_on(query_iface_info(iface_name))?;
        *info = new_info;
        Ok(())
    }
}

async fn query_iface_info(
    iface_name: &str,
) -> Result<Dhcp6cInfo, Dhcp6cError> {
    let mut info = Dhcp6cInfo::default();
    info.set_ifname(iface_name)?;

    let iface_index = get_iface_index(iface_name).await?;
    if let Some(addr) = get_global_addr(iface_index).await? {
        log::debug!(
            "Found {}/{} on {iface_name}",
            addr.address,
            addr.prefix_len
        );
        info.ip_addr = addr.address.octets();
        info.prefix = mask_prefix(addr.address, addr.prefix_len).octets();
        if addr.valid_lft != INFINITY_LIFE_TIME {
            info.remain_lease_time = addr.valid_lft;
        }
        info.sm_state = Dhcp6cSmState::Bound.into();
    } else {
        log::debug!("No global IPv6 address on {iface_name}");
        info.sm_state = Dhcp6cSmState::Solicit.into();
    }
    if let Some(gw) = get_default_gateway(iface_index).await? {
        info.gw = gw.octets();
    }
    Ok(info)
}

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
struct GlobalAddr {
    address: Ipv6Addr,
    prefix_len: u8,
    valid_lft: u32,
}

async fn get_iface_index(iface_name: &str) -> Result<u32, Dhcp6cError> {
    let (connection, handle, _) = rtnetlink::new_connection()?;

    tokio::spawn(connection);

    let mut links = handle
        .link()
        .get()
        .match_name(iface_name.to_string())
        .execute();

    // Kernel reply ENODEV for unknown interface name
    match links.try_next().await {
        Ok(Some(nl_msg)) => Ok(nl_msg.header.index),
        Ok(None) => Err(iface_not_found(iface_name, None)),
        Err(e) => Err(iface_not_found(iface_name, Some(e))),
    }
}

fn iface_not_found(
    iface_name: &str,
    e: Option<rtnetlink::Error>,
) -> Dhcp6cError {
    Dhcp6cError::new(
        ErrorKind::NotFound,
        match e {
            Some(e) => format!("Interface {iface_name} not found: {e}"),
            None => format!("Interface {iface_name} not found"),
        },
    )
}

async fn get_global_addr(
    iface_index: u32,
) -> Result<Option<GlobalAddr>, Dhcp6cError> {
    let (connection, handle, _) = rtnetlink::new_connection()?;

    tokio::spawn(connection);

    let mut addrs = handle
        .address()
        .get()
        .set_link_index_filter(iface_index)
        .execute();

    while let Some(nl_msg) = addrs.try_next().await? {
        let mut address = None;
        let mut valid_lft = INFINITY_LIFE_TIME;
        for attr in nl_msg.attributes {
            match attr {
                AddressAttribute::Address(IpAddr::V6(ip)) => {
                    address = Some(ip)
                }
                AddressAttribute::CacheInfo(cache) => {
                    valid_lft = cache.ifa_valid
                }
                _ => (),
            }
        }
        if let Some(address) = address.filter(|ip| is_global(*ip)) {
            return Ok(Some(GlobalAddr {
                address,
                prefix_len: nl_msg.header.prefix_len,
                valid_lft,
            }));
        }
    }
    Ok(None)
}

async fn get_default_gateway(
    iface_index: u32,
) -> Result<Option<Ipv6Addr>, Dhcp6cError> {
    let (connection, handle, _) = rtnetlink::new_connection()?;

    tokio::spawn(connection);

    let mut routes = handle
        .route()
        .get(RouteMessageBuilder::<Ipv6Addr>::new().build())
        .execute();

    while let Some(nl_msg) = routes.try_next().await? {
        if nl_msg.header.destination_prefix_length != 0 {
            continue;
        }
        let mut oif = None;
        let mut gateway = None;
        for attr in nl_msg.attributes {
            match attr {
                RouteAttribute::Oif(i) => oif = Some(i),
                RouteAttribute::Gateway(RouteAddress::Inet6(ip)) => {
                    gateway = Some(ip)
                }
                _ => (),
            }
        }
        if oif == Some(iface_index) && gateway.is_some() {
            return Ok(gateway);
        }
    }
    Ok(None)
}

fn is_global(ip: Ipv6Addr) -> bool {
    !(ip.is_unspecified()
        || ip.is_loopback()
        || ip.is_multicast()
        || is_unicast_link_local(ip))
}

// Copy from Rust 1.84 code src/core/net/ip_addr.rs which is licensed under
// "Apache License, Version 2.0" and "MIT license":
// Please check https://www.rust-lang.org/policies/licenses for detail.
const fn is_unicast_link_local(addr: Ipv6Addr) -> bool {
    (addr.segments()[0] & 0xffc0) == 0xfe80
}

fn mask_prefix(addr: Ipv6Addr, prefix_len: u8) -> Ipv6Addr {
    let prefix_len = u32::from(prefix_len.min(128));
    let mask = u128::MAX.checked_shl(128 - prefix_len).unwrap_or(0);
    Ipv6Addr::from(u128::from(addr) & mask)
}
