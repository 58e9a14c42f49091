// SPDX-License-Identifier: Apache-2.0

use std::net::Ipv6Addr;

use super::env::{
    init_log, test_profile, test_provider, CountingProvider, TEST_ECM_IFNAME,
    TEST_ERT_IFNAME,
};
use crate::{
    register_hal_tests, Dhcp6cClient, Dhcp6cInfo, Dhcp6cInfoFixture,
    Dhcp6cInfoProvider, Dhcp6cSmState, KvpProfile, StaticDhcp6cProvider,
    UtEnv, UtReport, L1_SUITE_NAME,
};

const ERT_POSITIVE: &str = "l1_dhcp6cApi_positive1_ert_dhcp6c_get_info";
const ERT_NEGATIVE: &str = "l1_dhcp6cApi_negative1_ert_dhcp6c_get_info";
const ECM_POSITIVE: &str = "l1_dhcp6cApi_positive_1_ecm_dhcp6c_get_info";
const ECM_NEGATIVE: &str = "l1_dhcp6cApi_negative_1_ecm_dhcp6c_get_info";

fn run_l1(
    provider: &dyn Dhcp6cInfoProvider,
    profile: &KvpProfile,
    strict: bool,
    filter: Option<&str>,
) -> UtReport {
    let suite = register_hal_tests().unwrap();
    let env = UtEnv {
        provider,
        profile,
        strict,
    };
    suite.run(&env, filter)
}

#[test]
fn test_l1_registration() {
    let suite = register_hal_tests().unwrap();
    assert_eq!(suite.name(), L1_SUITE_NAME);
    let tests: Vec<(String, String)> = suite
        .tests()
        .iter()
        .map(|t| (t.id(), t.name.clone()))
        .collect();
    assert_eq!(
        tests,
        vec![
            ("01001".to_string(), ERT_POSITIVE.to_string()),
            ("01002".to_string(), ERT_NEGATIVE.to_string()),
            ("01003".to_string(), ECM_POSITIVE.to_string()),
            ("01004".to_string(), ECM_NEGATIVE.to_string()),
        ]
    );
}

#[test]
fn test_l1_all_pass() {
    init_log();
    let provider = test_provider();
    let report = run_l1(&provider, &test_profile(), true, None);
    println!("{report}");
    assert!(report.is_success());
    assert_eq!(report.results.len(), 4);
    // ifname + sm_state + config_attempts + 4 addresses + num_of_dns
    // + DNS list + domain check + status
    assert_eq!(report.get(ERT_POSITIVE).unwrap().assertions, 14);
    assert_eq!(report.get(ERT_NEGATIVE).unwrap().assertions, 1);
}

#[test]
fn test_l1_strict_check_is_counted() {
    init_log();
    let provider = test_provider();
    let relaxed = run_l1(&provider, &test_profile(), false, Some("ecm"));
    let strict = run_l1(&provider, &test_profile(), true, Some("ecm"));
    assert!(relaxed.is_success());
    assert!(strict.is_success());
    assert_eq!(
        strict.get(ECM_POSITIVE).unwrap().assertions,
        relaxed.get(ECM_POSITIVE).unwrap().assertions + 1
    );
}

#[test]
fn test_l1_filter_negative_ecm() {
    init_log();
    let provider = CountingProvider::new(test_provider());
    let report =
        run_l1(&provider, &test_profile(), false, Some("negative_1_ecm"));
    assert!(report.is_success());
    assert_eq!(report.results.len(), 1);
    assert_eq!(provider.calls.get(), 1);
}

#[test]
fn test_l1_null_accepted_by_provider() {
    init_log();
    let mut provider = CountingProvider::new(test_provider());
    provider.accept_null = true;
    let report = run_l1(&provider, &test_profile(), false, None);
    assert!(!report.is_success());
    assert_eq!(report.failed_count(), 2);
    assert!(!report.get(ERT_NEGATIVE).unwrap().is_success());
    assert!(!report.get(ECM_NEGATIVE).unwrap().is_success());
    assert!(report.get(ERT_POSITIVE).unwrap().is_success());
}

#[test]
fn test_l1_ifname_mismatch_with_profile() {
    init_log();
    let profile = KvpProfile::from_json(
        r#"{"dhcp6c": {"config": {
            "ERouter_DHCPv6": {"ifName": "erouter1"},
            "ecm_DHCPv6": {"ifName": "wan0"}
        }}}"#,
    )
    .unwrap();
    let report = run_l1(&test_provider(), &profile, false, None);
    let result = report.get(ERT_POSITIVE).unwrap();
    assert_eq!(result.failures.len(), 1);
    assert!(result.failures[0].contains("erouter1"));
    assert!(report.get(ECM_POSITIVE).unwrap().is_success());
}

#[test]
fn test_l1_missing_record_fails_cumulatively() {
    init_log();
    let mut provider = StaticDhcp6cProvider::new();
    provider.insert(
        Dhcp6cClient::ERouter,
        Dhcp6cInfoFixture {
            ifname: TEST_ERT_IFNAME.to_string(),
            ..Default::default()
        },
    );
    let report = run_l1(&provider, &test_profile(), false, Some("ecm"));
    let result = report.get(ECM_POSITIVE).unwrap();
    // Empty ifname and failure status, other checks still run
    assert_eq!(result.failures.len(), 2);
    assert_eq!(result.assertions, 13);
    assert!(report.get(ECM_NEGATIVE).unwrap().is_success());
}

#[test]
fn test_l1_strict_mode_catches_bad_timers() {
    init_log();
    let mut provider = test_provider();
    provider.insert(
        Dhcp6cClient::Ecm,
        Dhcp6cInfoFixture {
            ifname: TEST_ECM_IFNAME.to_string(),
            sm_state: Dhcp6cSmState::Renew.into(),
            t1: 5000,
            t2: 100,
            ..Default::default()
        },
    );
    let report = run_l1(&provider, &test_profile(), false, None);
    assert!(report.is_success());

    let report = run_l1(&provider, &test_profile(), true, None);
    assert_eq!(report.failed_count(), 1);
    let result = report.get(ECM_POSITIVE).unwrap();
    assert!(result.failures[0].contains("T1"));
}

#[test]
fn test_get_info_idempotent() {
    init_log();
    let provider = test_provider();
    let mut first = Dhcp6cInfo::default();
    provider
        .get_info(Dhcp6cClient::ERouter, Some(&mut first))
        .unwrap();
    for _ in 0..3 {
        let mut info = Dhcp6cInfo::default();
        provider
            .get_info(Dhcp6cClient::ERouter, Some(&mut info))
            .unwrap();
        assert!(info.sanitize().is_ok());
        assert_eq!(info, first);
    }
    assert_eq!(first.ifname(), TEST_ERT_IFNAME);
    assert_eq!(first.sm_state().unwrap(), Dhcp6cSmState::Bound);
    assert_eq!(
        first.dns_servers(),
        vec![
            "2001:db8::53".parse::<Ipv6Addr>().unwrap(),
            "2001:db8::54".parse::<Ipv6Addr>().unwrap(),
        ]
    );
}
