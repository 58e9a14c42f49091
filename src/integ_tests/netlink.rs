// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv6Addr;

use super::env::{
    init_log, DummyIfaceEnv, TEST_DUMMY_GW, TEST_DUMMY_IP, TEST_DUMMY_PREFIX,
    TEST_DUMMY_VALID_LFT, TEST_NIC_DUMMY,
};
use crate::{
    Dhcp6cClient, Dhcp6cInfo, Dhcp6cInfoProvider, Dhcp6cSmState,
    NetlinkDhcp6cProvider,
};

const TEST_NIC_NOT_EXIST: &str = "d6l1_nonexist";

#[test]
fn test_netlink_unknown_iface() {
    init_log();
    let mut provider = NetlinkDhcp6cProvider::new();
    provider.set_ifname(Dhcp6cClient::Ecm, TEST_NIC_NOT_EXIST);
    let mut info = Dhcp6cInfo {
        t1: 9,
        ..Default::default()
    };
    assert!(provider.get_info(Dhcp6cClient::Ecm, Some(&mut info)).is_err());
    assert_eq!(info.t1, 9);
}

#[test]
fn test_netlink_loopback_has_no_lease() {
    init_log();
    let mut provider = NetlinkDhcp6cProvider::new();
    provider.set_ifname(Dhcp6cClient::Ecm, "lo");
    let mut info = Dhcp6cInfo::default();
    provider
        .get_info(Dhcp6cClient::Ecm, Some(&mut info))
        .unwrap();
    assert_eq!(info.ifname(), "lo");
    assert_eq!(info.sm_state().unwrap(), Dhcp6cSmState::Solicit);
    assert_eq!(Ipv6Addr::from(info.ip_addr), Ipv6Addr::UNSPECIFIED);
    assert_eq!(Ipv6Addr::from(info.prefix), Ipv6Addr::UNSPECIFIED);
    assert_eq!(info.remain_lease_time, 0);
    assert!(info.sanitize().is_ok());
}

#[test]
fn test_netlink_global_address() {
    init_log();
    let Some(env) = DummyIfaceEnv::start() else {
        log::warn!("Skipping test_netlink_global_address");
        return;
    };
    let mut provider = NetlinkDhcp6cProvider::new();
    provider.set_ifname(Dhcp6cClient::ERouter, TEST_NIC_DUMMY);
    let mut info = Dhcp6cInfo::default();
    provider
        .get_info(Dhcp6cClient::ERouter, Some(&mut info))
        .unwrap();

    assert_eq!(info.ifname(), TEST_NIC_DUMMY);
    assert_eq!(info.sm_state().unwrap(), Dhcp6cSmState::Bound);
    assert_eq!(
        Ipv6Addr::from(info.ip_addr),
        TEST_DUMMY_IP.parse::<Ipv6Addr>().unwrap()
    );
    assert_eq!(
        Ipv6Addr::from(info.prefix),
        TEST_DUMMY_PREFIX.parse::<Ipv6Addr>().unwrap()
    );
    assert!(info.remain_lease_time > 0);
    assert!(info.remain_lease_time <= TEST_DUMMY_VALID_LFT);
    if env.has_gateway {
        assert_eq!(
            Ipv6Addr::from(info.gw),
            TEST_DUMMY_GW.parse::<Ipv6Addr>().unwrap()
        );
    }
}
