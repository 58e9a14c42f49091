// SPDX-License-Identifier: Apache-2.0

use std::fmt::Write;

pub const IPV6_ADDR_SIZE: usize = 16;

/// Render IPv6 octets as colon separated groups of two upper-case hex bytes,
/// e.g. `2001:0DB8:0000:0000:0000:0000:0000:0001`.
pub fn ipv6_octets_to_string(octets: &[u8]) -> String {
    let mut ret = String::with_capacity(octets.len() * 2 + octets.len() / 2);
    for (i, group) in octets.chunks(2).enumerate() {
        if i != 0 {
            ret.push(':');
        }
        for octet in group {
            // Writing to String never fails
            let _ = write!(ret, "{octet:02X}");
        }
    }
    ret
}

/// Check an IPv6 address field returned by the DHCPv6 client.
///
/// Returns false for absent or empty input without touching any element.
/// A `u8` can only hold a valid octet, so the remaining structural check is
/// that the field carries exactly [IPV6_ADDR_SIZE] octets.
pub fn validate_ipv6_field(field: Option<&[u8]>) -> bool {
    let octets = match field {
        Some(o) if !o.is_empty() => o,
        _ => {
            log::debug!("IPv6 field is absent or empty");
            return false;
        }
    };
    log::debug!("{}", ipv6_octets_to_string(octets));
    octets.len() == IPV6_ADDR_SIZE
}

/// Return true when the string is present and not empty.
pub fn is_non_empty_str(data: Option<&str>) -> bool {
    matches!(data, Some(s) if !s.is_empty())
}
