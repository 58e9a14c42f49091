// SPDX-License-Identifier: Apache-2.0

use std::path::Path;

use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use dhcp6c_l1::{
    register_hal_tests, Dhcp6cError, Dhcp6cInfoProvider, KvpProfile,
    StaticDhcp6cProvider, UtEnv,
};

const APP_NAME: &str = "d6l1";

const SUBCOMMAND_RUN: &str = "run";
const SUBCOMMAND_LIST: &str = "list";
const SUBCOMMAND_VERSION: &str = "version";
const ARG_PROFILE: &str = "profile";
const ARG_FIXTURE: &str = "fixture";
const ARG_NETLINK: &str = "netlink";
const ARG_HAL: &str = "hal";
const ARG_TEST: &str = "test";
const ARG_STRICT: &str = "strict";
const ARG_VERBOSE: &str = "verbose";

fn main() {
    let matches = Command::new(APP_NAME)
        .version(clap::crate_version!())
        .about("Level 1 test suite of DHCPv6 client info API")
        .subcommand_required(true)
        .arg(
            Arg::new(ARG_VERBOSE)
                .help("Show debug log")
                .long(ARG_VERBOSE)
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new(SUBCOMMAND_RUN)
                .alias("r")
                .about("Run the test suite")
                .arg(
                    Arg::new(ARG_PROFILE)
                        .help("KVP profile in JSON")
                        .long(ARG_PROFILE)
                        .short('p')
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new(ARG_FIXTURE)
                        .help("Answer from DHCPv6 client records in JSON")
                        .long(ARG_FIXTURE)
                        .short('f')
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new(ARG_NETLINK)
                        .help("Answer from kernel state of profile interfaces")
                        .long(ARG_NETLINK)
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new(ARG_HAL)
                        .help("Call into vendor HAL library")
                        .long(ARG_HAL)
                        .action(ArgAction::SetTrue),
                )
                .group(
                    ArgGroup::new("provider")
                        .args([ARG_FIXTURE, ARG_NETLINK, ARG_HAL])
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_TEST)
                        .help("Only run tests with name containing this")
                        .long(ARG_TEST)
                        .short('t')
                        .action(ArgAction::Set),
                )
                .arg(
                    Arg::new(ARG_STRICT)
                        .help("Also check lease timers and state domain")
                        .long(ARG_STRICT)
                        .short('s')
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new(SUBCOMMAND_LIST)
                .alias("l")
                .about("List registered tests"),
        )
        .subcommand(
            Command::new(SUBCOMMAND_VERSION)
                .alias("v")
                .about("Show version"),
        )
        .get_matches();

    enable_log(matches.get_flag(ARG_VERBOSE));

    let rc = match matches.subcommand() {
        Some((SUBCOMMAND_RUN, sub_matches)) => match run(sub_matches) {
            Ok(true) => 0,
            Ok(false) => 1,
            Err(e) => {
                eprintln!("{e}");
                2
            }
        },
        Some((SUBCOMMAND_LIST, _)) => match list() {
            Ok(()) => 0,
            Err(e) => {
                eprintln!("{e}");
                2
            }
        },
        Some((SUBCOMMAND_VERSION, _)) => {
            println!("{} {}", APP_NAME, clap::crate_version!());
            0
        }
        _ => 2,
    };
    std::process::exit(rc);
}

fn enable_log(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter(Some("dhcp6c_l1"), level)
        .filter(Some(APP_NAME), level)
        .init();
}

fn list() -> Result<(), Dhcp6cError> {
    let suite = register_hal_tests()?;
    println!("{}", suite.name());
    for test in suite.tests() {
        println!("  [{}] {}", test.id(), test.name);
    }
    Ok(())
}

fn run(matches: &ArgMatches) -> Result<bool, Dhcp6cError> {
    let profile = match matches.get_one::<String>(ARG_PROFILE) {
        Some(path) => KvpProfile::from_file(Path::new(path))?,
        None => KvpProfile::default(),
    };
    let provider = new_provider(matches, &profile)?;
    let suite = register_hal_tests()?;
    let env = UtEnv {
        provider: provider.as_ref(),
        profile: &profile,
        strict: matches.get_flag(ARG_STRICT),
    };
    let report = suite.run(
        &env,
        matches.get_one::<String>(ARG_TEST).map(String::as_str),
    );
    println!("{report}");
    Ok(report.is_success())
}

fn new_provider(
    matches: &ArgMatches,
    profile: &KvpProfile,
) -> Result<Box<dyn Dhcp6cInfoProvider>, Dhcp6cError> {
    if let Some(path) = matches.get_one::<String>(ARG_FIXTURE) {
        return Ok(Box::new(StaticDhcp6cProvider::from_file(Path::new(
            path,
        ))?));
    }
    if matches.get_flag(ARG_NETLINK) {
        return new_netlink_provider(profile);
    }
    new_hal_provider()
}

#[cfg(feature = "netlink")]
fn new_netlink_provider(
    profile: &KvpProfile,
) -> Result<Box<dyn Dhcp6cInfoProvider>, Dhcp6cError> {
    Ok(Box::new(dhcp6c_l1::NetlinkDhcp6cProvider::from_profile(
        profile,
    )))
}

#[cfg(not(feature = "netlink"))]
fn new_netlink_provider(
    _profile: &KvpProfile,
) -> Result<Box<dyn Dhcp6cInfoProvider>, Dhcp6cError> {
    Err(Dhcp6cError::new(
        dhcp6c_l1::ErrorKind::InvalidArgument,
        format!("{APP_NAME} built without netlink feature"),
    ))
}

#[cfg(feature = "ffi")]
fn new_hal_provider() -> Result<Box<dyn Dhcp6cInfoProvider>, Dhcp6cError> {
    Ok(Box::new(dhcp6c_l1::HalDhcp6cProvider::new()))
}

#[cfg(not(feature = "ffi"))]
fn new_hal_provider() -> Result<Box<dyn Dhcp6cInfoProvider>, Dhcp6cError> {
    Err(Dhcp6cError::new(
        dhcp6c_l1::ErrorKind::InvalidArgument,
        format!("{APP_NAME} built without ffi feature"),
    ))
}
