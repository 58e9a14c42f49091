// SPDX-License-Identifier: Apache-2.0

//! Level 1 tests of the DHCPv6 client info API.
//!
//! Each accessor is checked for success with a valid output record and for
//! failure with a NULL one. Every test case owns its record, so the cases do
//! not depend on each other's order.

use crate::{
    is_non_empty_str, validate_ipv6_field, Dhcp6cClient, Dhcp6cError,
    Dhcp6cInfo, Dhcp6cStatus, UtContext, UtSuite,
};

pub const L1_SUITE_NAME: &str = "[L1 dhcp6cApi]";

const TEST_GROUP: u32 = 1;

/// Build the L1 suite with all its test cases registered.
pub fn register_hal_tests() -> Result<UtSuite, Dhcp6cError> {
    let mut suite = UtSuite::new(L1_SUITE_NAME);
    suite
        .add_test(
            "l1_dhcp6cApi_positive1_ert_dhcp6c_get_info",
            TEST_GROUP,
            1,
            test_l1_positive_ert_get_info,
        )?
        .add_test(
            "l1_dhcp6cApi_negative1_ert_dhcp6c_get_info",
            TEST_GROUP,
            2,
            test_l1_negative_ert_get_info,
        )?
        .add_test(
            "l1_dhcp6cApi_positive_1_ecm_dhcp6c_get_info",
            TEST_GROUP,
            3,
            test_l1_positive_ecm_get_info,
        )?
        .add_test(
            "l1_dhcp6cApi_negative_1_ecm_dhcp6c_get_info",
            TEST_GROUP,
            4,
            test_l1_negative_ecm_get_info,
        )?;
    Ok(suite)
}

fn test_l1_positive_ert_get_info(ctx: &mut UtContext<'_>) {
    check_get_info(ctx, Dhcp6cClient::ERouter)
}

fn test_l1_negative_ert_get_info(ctx: &mut UtContext<'_>) {
    check_get_info_null(ctx, Dhcp6cClient::ERouter)
}

fn test_l1_positive_ecm_get_info(ctx: &mut UtContext<'_>) {
    check_get_info(ctx, Dhcp6cClient::Ecm)
}

fn test_l1_negative_ecm_get_info(ctx: &mut UtContext<'_>) {
    check_get_info_null(ctx, Dhcp6cClient::Ecm)
}

fn check_get_info(ctx: &mut UtContext<'_>, client: Dhcp6cClient) {
    let mut info = Dhcp6cInfo::default();

    log::debug!(
        "Invoking {} with info = valid memory address",
        client.api_name()
    );
    let result = ctx.provider().get_info(client, Some(&mut info));
    let status = Dhcp6cStatus::from(&result);
    log::debug!("return status : {status}");
    if let Err(e) = &result {
        log::debug!("{}: {e}", client.api_name());
    }

    log::debug!("Validating ifname...");
    if is_non_empty_str(Some(info.ifname())) {
        log::debug!("info.ifname: {}", info.ifname());
        ctx.assert_kvp_eq_profile_string(
            info.ifname(),
            client.ifname_profile_key(),
        );
    } else {
        log::debug!("ifname is empty string");
        ctx.fail("ifname is empty string");
    }

    log::info!("Validating smState...");
    log::info!("info.sm_state: {}", info.sm_state);
    ctx.assert(info.sm_state >= 0, "sm_state >= 0");

    log::info!("Validating configAttempts...");
    log::info!("info.config_attempts: {}", info.config_attempts);
    ctx.assert(info.config_attempts >= 0, "config_attempts >= 0");

    for (name, field) in [
        ("ipAddr", &info.ip_addr),
        ("prefix", &info.prefix),
        ("gw", &info.gw),
        ("dhcpServer", &info.dhcp_server),
    ] {
        log::debug!("Validating {name}");
        let valid = validate_ipv6_field(Some(field.as_slice()));
        log::debug!("valid: {valid}");
        ctx.assert(valid, &format!("{name} is valid IPv6 address"));
    }

    // Lease timers are unsigned, they are logged for the record.
    for (name, value) in [
        ("t1", info.t1),
        ("t2", info.t2),
        ("leaseTime", info.lease_time),
        ("leaseGotTime", info.lease_got_time),
        ("remainLeaseTime", info.remain_lease_time),
        ("remainRenewTime", info.remain_renew_time),
        ("remainRebindTime", info.remain_rebind_time),
    ] {
        log::debug!("Validating {name}...");
        log::debug!("info.{name}: {value}");
    }

    log::info!("Validating numOfDns...");
    log::info!("info.num_of_dns: {}", info.num_of_dns);
    ctx.assert(info.num_of_dns >= 0, "num_of_dns >= 0");

    log::debug!("dnsAddrList...");
    for (i, dns) in info.dns_addr_list.iter().enumerate() {
        let valid = validate_ipv6_field(Some(dns.as_slice()));
        log::debug!("valid: {valid}");
        ctx.assert(valid, &format!("dnsAddrList[{i}] is valid IPv6 address"));
    }

    if ctx.is_strict() {
        log::debug!("Sanitizing {client} info");
        let sanitized = info.sanitize();
        let desc = match &sanitized {
            Ok(()) => format!("{client} info passes domain checks"),
            Err(e) => format!("{client} info: {e}"),
        };
        ctx.assert(sanitized.is_ok(), &desc);
    }

    ctx.assert_eq(status, Dhcp6cStatus::Success, "get_info status");
}

fn check_get_info_null(ctx: &mut UtContext<'_>, client: Dhcp6cClient) {
    log::debug!("Invoking {} with info = NULL", client.api_name());
    let result = ctx.provider().get_info(client, None);
    let status = Dhcp6cStatus::from(&result);

    log::debug!("Expected Result: {}", Dhcp6cStatus::Failure);
    log::debug!("Actual Result: {status}");
    ctx.assert_eq(status, Dhcp6cStatus::Failure, "get_info status");
}
