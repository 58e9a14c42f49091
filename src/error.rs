// SPDX-License-Identifier: Apache-2.0

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[non_exhaustive]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    InvalidInfo,
    /// The DHCPv6 client implementation reported failure.
    Failure,
    Bug,
}

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Dhcp6cError {
    kind: ErrorKind,
    msg: String,
}

impl Dhcp6cError {
    pub fn new(kind: ErrorKind, msg: String) -> Self {
        Self { kind, msg }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn msg(&self) -> &str {
        self.msg.as_str()
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl std::fmt::Display for Dhcp6cError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.msg)
    }
}

impl std::error::Error for Dhcp6cError {}

impl From<std::io::Error> for Dhcp6cError {
    fn from(e: std::io::Error) -> Self {
        Self::new(ErrorKind::Bug, format!("IO error: {}", e))
    }
}

impl From<serde_json::Error> for Dhcp6cError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(ErrorKind::InvalidArgument, format!("JSON error: {}", e))
    }
}

impl From<std::net::AddrParseError> for Dhcp6cError {
    fn from(e: std::net::AddrParseError) -> Self {
        Self::new(
            ErrorKind::InvalidArgument,
            format!("IPv6 address parse error: {}", e),
        )
    }
}

#[cfg(feature = "netlink")]
impl From<rtnetlink::Error> for Dhcp6cError {
    fn from(e: rtnetlink::Error) -> Self {
        Self::new(ErrorKind::Bug, format!("netlink error: {}", e))
    }
}
