// SPDX-License-Identifier: Apache-2.0

mod error;
#[cfg(feature = "ffi")]
mod ffi;
mod info;
mod ipv6;
mod l1;
#[cfg(feature = "netlink")]
mod netlink;
mod profile;
mod provider;
mod suite;


pub use crate::error::{Dhcp6cError, ErrorKind};
#[cfg(feature = "ffi")]
pub use crate::ffi::{HalDhcp6cProvider, RawDhcp6cInfo};
pub use crate::info::{
    Dhcp6cClient, Dhcp6cInfo, Dhcp6cSmState, Dhcp6cStatus, IFNAME_LENGTH,
    MAX_IPV6_ADDR_LIST_SIZE, STATUS_FAILURE, STATUS_SUCCESS,
};
pub use crate::ipv6::{
    ipv6_octets_to_string, is_non_empty_str, validate_ipv6_field,
    IPV6_ADDR_SIZE,
};
pub use crate::l1::{register_hal_tests, L1_SUITE_NAME};
#[cfg(feature = "netlink")]
pub use crate::netlink::NetlinkDhcp6cProvider;
pub use crate::profile::KvpProfile;
pub use crate::provider::{
    Dhcp6cInfoFixture, Dhcp6cInfoProvider, StaticDhcp6cProvider,
};
pub use crate::suite::{
    UtContext, UtEnv, UtReport, UtSuite, UtTestCase, UtTestFn, UtTestResult,
};
