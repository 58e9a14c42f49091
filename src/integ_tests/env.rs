// SPDX-License-Identifier: Apache-2.0

use std::cell::Cell;
#[cfg(feature = "netlink")]
use std::process::Command;

use crate::{
    Dhcp6cClient, Dhcp6cError, Dhcp6cInfo, Dhcp6cInfoProvider, KvpProfile,
    StaticDhcp6cProvider,
};

pub(crate) const TEST_ERT_IFNAME: &str = "erouter0";
pub(crate) const TEST_ECM_IFNAME: &str = "wan0";

pub(crate) const TEST_PROFILE: &str = r#"{
    "dhcp6c": {
        "config": {
            "ERouter_DHCPv6": {"ifName": "erouter0"},
            "ecm_DHCPv6": {"ifName": "wan0"}
        }
    }
}"#;

pub(crate) const TEST_FIXTURE: &str = r#"{
    "erouter": {
        "ifname": "erouter0",
        "sm_state": 3,
        "config_attempts": 1,
        "ip_addr": "2001:db8:0:1::10",
        "prefix": "2001:db8:0:1::",
        "gw": "fe80::1",
        "dhcp_server": "2001:db8::1",
        "t1": 1800,
        "t2": 2880,
        "lease_time": 3600,
        "lease_got_time": 1700000000,
        "remain_lease_time": 3000,
        "remain_renew_time": 1200,
        "remain_rebind_time": 2280,
        "dns_servers": ["2001:db8::53", "2001:db8::54"]
    },
    "ecm": {
        "ifname": "wan0",
        "sm_state": 1,
        "config_attempts": 4
    }
}"#;

pub(crate) fn init_log() {
    let _ = env_logger::Builder::new()
        .filter(Some("dhcp6c_l1"), log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

pub(crate) fn test_profile() -> KvpProfile {
    KvpProfile::from_json(TEST_PROFILE).expect("Invalid test profile")
}

pub(crate) fn test_provider() -> StaticDhcp6cProvider {
    StaticDhcp6cProvider::from_json(TEST_FIXTURE).expect("Invalid fixture")
}

/// Wrap a provider, counting calls and optionally ignoring NULL output.
pub(crate) struct CountingProvider<P> {
    pub(crate) inner: P,
    pub(crate) accept_null: bool,
    pub(crate) calls: Cell<u32>,
}

impl<P: Dhcp6cInfoProvider> CountingProvider<P> {
    pub(crate) fn new(inner: P) -> Self {
        Self {
            inner,
            accept_null: false,
            calls: Cell::new(0),
        }
    }
}

impl<P: Dhcp6cInfoProvider> Dhcp6cInfoProvider for CountingProvider<P> {
    fn get_info(
        &self,
        client: Dhcp6cClient,
        info: Option<&mut Dhcp6cInfo>,
    ) -> Result<(), Dhcp6cError> {
        self.calls.set(self.calls.get() + 1);
        if info.is_none() && self.accept_null {
            return Ok(());
        }
        self.inner.get_info(client, info)
    }
}

#[cfg(feature = "netlink")]
pub(crate) const TEST_NIC_DUMMY: &str = "d6l1dummy";
#[cfg(feature = "netlink")]
pub(crate) const TEST_DUMMY_IP: &str = "2001:db8:1::10";
#[cfg(feature = "netlink")]
pub(crate) const TEST_DUMMY_PREFIX: &str = "2001:db8:1::";
#[cfg(feature = "netlink")]
pub(crate) const TEST_DUMMY_GW: &str = "2001:db8:1::1";
#[cfg(feature = "netlink")]
pub(crate) const TEST_DUMMY_VALID_LFT: u32 = 3600;

/// Dummy interface holding a global IPv6 address with finite lifetime and
/// a default route through it. Removed on drop.
#[cfg(feature = "netlink")]
#[derive(Debug)]
pub(crate) struct DummyIfaceEnv {
    pub(crate) has_gateway: bool,
}

#[cfg(feature = "netlink")]
impl DummyIfaceEnv {
    /// `None` when the interface cannot be created, e.g. without
    /// CAP_NET_ADMIN.
    pub(crate) fn start() -> Option<Self> {
        run_cmd_ignore_failure(&format!("ip link del {TEST_NIC_DUMMY}"));
        if !run_cmd(&format!("ip link add {TEST_NIC_DUMMY} type dummy")) {
            log::warn!("Cannot create {TEST_NIC_DUMMY}, need root");
            return None;
        }
        // Dropped on early return, which removes the interface again
        let mut env = Self {
            has_gateway: false,
        };
        if !run_cmd(&format!("ip link set {TEST_NIC_DUMMY} up"))
            || !run_cmd(&format!(
                "ip -6 addr add {TEST_DUMMY_IP}/64 dev {TEST_NIC_DUMMY} \
                 valid_lft {TEST_DUMMY_VALID_LFT} preferred_lft 1800 nodad"
            ))
        {
            log::warn!("Cannot assign IPv6 address to {TEST_NIC_DUMMY}");
            return None;
        }
        env.has_gateway = run_cmd(&format!(
            "ip -6 route add default via {TEST_DUMMY_GW} dev {TEST_NIC_DUMMY} \
             metric 4242"
        ));
        Some(env)
    }
}

#[cfg(feature = "netlink")]
impl Drop for DummyIfaceEnv {
    fn drop(&mut self) {
        run_cmd_ignore_failure(&format!("ip link del {TEST_NIC_DUMMY}"));
    }
}

#[cfg(feature = "netlink")]
fn run_cmd(cmd: &str) -> bool {
    let cmds: Vec<&str> = cmd.split_whitespace().collect();
    match Command::new(cmds[0]).args(&cmds[1..]).output() {
        Ok(output) => {
            if !output.status.success() {
                log::debug!(
                    "{cmd}: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                );
            }
            output.status.success()
        }
        Err(e) => {
            log::debug!("failed to execute command {cmd}: {e}");
            false
        }
    }
}

#[cfg(feature = "netlink")]
fn run_cmd_ignore_failure(cmd: &str) {
    let _ = run_cmd(cmd);
}
