// SPDX-License-Identifier: Apache-2.0

use std::fmt::Debug;

use crate::{Dhcp6cError, Dhcp6cInfoProvider, ErrorKind, KvpProfile};

pub type UtTestFn = fn(&mut UtContext<'_>);

#[derive(Debug, Clone)]
pub struct UtTestCase {
    pub name: String,
    pub group_id: u32,
    pub test_id: u32,
    func: UtTestFn,
}

impl UtTestCase {
    /// Identifier printed as `GGTTT`, e.g. `01004`.
    pub fn id(&self) -> String {
        format!("{:02}{:03}", self.group_id, self.test_id)
    }
}

/// What every test case runs against.
pub struct UtEnv<'a> {
    pub provider: &'a dyn Dhcp6cInfoProvider,
    pub profile: &'a KvpProfile,
    /// Also run domain checks on top of the L1 range checks.
    pub strict: bool,
}

/// Per test case assertion recorder.
///
/// Failed assertions are logged and recorded, the test case keeps running.
pub struct UtContext<'a> {
    env: &'a UtEnv<'a>,
    assertions: usize,
    failures: Vec<String>,
}

impl<'a> UtContext<'a> {
    pub fn new(env: &'a UtEnv<'a>) -> Self {
        Self {
            env,
            assertions: 0,
            failures: Vec::new(),
        }
    }

    pub fn provider(&self) -> &'a dyn Dhcp6cInfoProvider {
        self.env.provider
    }

    pub fn profile(&self) -> &'a KvpProfile {
        self.env.profile
    }

    pub fn is_strict(&self) -> bool {
        self.env.strict
    }

    #[track_caller]
    pub fn assert(&mut self, cond: bool, desc: &str) -> bool {
        self.assertions += 1;
        if !cond {
            let location = std::panic::Location::caller();
            self.record_failure(format!(
                "{}:{}: assertion failed: {desc}",
                location.file(),
                location.line()
            ));
        }
        cond
    }

    #[track_caller]
    pub fn assert_eq<T>(&mut self, actual: T, expected: T, desc: &str) -> bool
    where
        T: PartialEq + Debug,
    {
        let cond = actual == expected;
        if cond {
            self.assertions += 1;
        } else {
            let desc = format!("{desc}: expected {expected:?}, got {actual:?}");
            self.assert(false, &desc);
        }
        cond
    }

    pub fn fail(&mut self, msg: &str) {
        self.assertions += 1;
        self.record_failure(msg.to_string());
    }

    /// Compare `value` with the string stored under `key` in the profile.
    #[track_caller]
    pub fn assert_kvp_eq_profile_string(
        &mut self,
        value: &str,
        key: &str,
    ) -> bool {
        match self.env.profile.get_string(key) {
            Ok(expected) => {
                self.assert_eq(value, expected, &format!("profile {key}"))
            }
            Err(e) => {
                self.fail(&format!("Failed to read profile: {e}"));
                false
            }
        }
    }

    fn record_failure(&mut self, msg: String) {
        log::error!("{msg}");
        self.failures.push(msg);
    }
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct UtTestResult {
    pub name: String,
    pub id: String,
    pub assertions: usize,
    pub failures: Vec<String>,
}

impl UtTestResult {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct UtReport {
    pub suite: String,
    pub results: Vec<UtTestResult>,
}

impl UtReport {
    pub fn is_success(&self) -> bool {
        self.results.iter().all(UtTestResult::is_success)
    }

    pub fn failed_count(&self) -> usize {
        self.results.iter().filter(|r| !r.is_success()).count()
    }

    pub fn get(&self, name: &str) -> Option<&UtTestResult> {
        self.results.iter().find(|r| r.name == name)
    }
}

impl std::fmt::Display for UtReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Suite: {}", self.suite)?;
        for result in &self.results {
            writeln!(
                f,
                "  [{}] {} ... {} ({} asserts)",
                result.id,
                result.name,
                if result.is_success() { "passed" } else { "FAILED" },
                result.assertions
            )?;
            for failure in &result.failures {
                writeln!(f, "      {failure}")?;
            }
        }
        write!(
            f,
            "Run: {} Passed: {} Failed: {}",
            self.results.len(),
            self.results.len() - self.failed_count(),
            self.failed_count()
        )
    }
}

#[derive(Debug, Clone)]
pub struct UtSuite {
    name: String,
    tests: Vec<UtTestCase>,
}

impl UtSuite {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            tests: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn tests(&self) -> &[UtTestCase] {
        self.tests.as_slice()
    }

    pub fn add_test(
        &mut self,
        name: &str,
        group_id: u32,
        test_id: u32,
        func: UtTestFn,
    ) -> Result<&mut Self, Dhcp6cError> {
        if self.tests.iter().any(|t| t.name == name) {
            return Err(Dhcp6cError::new(
                ErrorKind::InvalidArgument,
                format!("Test {name} already registered in {}", self.name),
            ));
        }
        self.tests.push(UtTestCase {
            name: name.to_string(),
            group_id,
            test_id,
            func,
        });
        Ok(self)
    }

    /// Run test cases one by one in registration order. When `filter` is
    /// set, only test cases with name containing it are run.
    pub fn run(&self, env: &UtEnv<'_>, filter: Option<&str>) -> UtReport {
        let mut report = UtReport {
            suite: self.name.clone(),
            results: Vec::new(),
        };
        for test in self
            .tests
            .iter()
            .filter(|t| filter.map(|f| t.name.contains(f)).unwrap_or(true))
        {
            log::info!("In {} [{}]", test.name, test.id());
            let mut ctx = UtContext::new(env);
            (test.func)(&mut ctx);
            log::info!("Out {}", test.name);
            report.results.push(UtTestResult {
                name: test.name.clone(),
                id: test.id(),
                assertions: ctx.assertions,
                failures: ctx.failures,
            });
        }
        report
    }
}
