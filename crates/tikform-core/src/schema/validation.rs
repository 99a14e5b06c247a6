// ── Attribute validators ──
//
// Checks applied to configured values before any request reaches the
// router. Failures are reported as diagnostics scoped to the attribute.

use std::fmt;
use std::net::IpAddr;

use serde_json::Value;

use crate::diag::Diagnostic;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Validator {
    /// Integer within `min..=max`.
    IntBetween { min: i64, max: i64 },
    /// IPv4 or IPv6 address literal.
    IsIpAddress,
    /// Exact, case-sensitive member of the set.
    StringInSlice(&'static [&'static str]),
}

impl Validator {
    /// Valid TCP/UDP port numbers.
    pub const PORT: Self = Self::IntBetween { min: 0, max: 65535 };

    pub fn check(&self, name: &str, value: &Value) -> Result<(), Diagnostic> {
        match *self {
            Self::IntBetween { min, max } => {
                let Some(v) = value.as_i64() else {
                    return Err(type_error(name, "integer"));
                };
                if v < min || v > max {
                    return Err(Diagnostic::error(format!(
                        "expected {name} to be in the range ({min} - {max}), got {v}"
                    ))
                    .at(name));
                }
            }
            Self::IsIpAddress => {
                let Some(v) = value.as_str() else {
                    return Err(type_error(name, "string"));
                };
                if v.parse::<IpAddr>().is_err() {
                    return Err(Diagnostic::error(format!(
                        "expected {name} to contain a valid IP, got: {v}"
                    ))
                    .at(name));
                }
            }
            Self::StringInSlice(valid) => {
                let Some(v) = value.as_str() else {
                    return Err(type_error(name, "string"));
                };
                if !valid.contains(&v) {
                    return Err(Diagnostic::error(format!(
                        "expected {name} to be one of [{}], got {v}",
                        valid.join(" ")
                    ))
                    .at(name));
                }
            }
        }
        Ok(())
    }
}

fn type_error(name: &str, expected: &str) -> Diagnostic {
    Diagnostic::error(format!("expected type of {name} to be {expected}")).at(name)
}

impl fmt::Display for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IntBetween { min, max } => write!(f, "{min}..={max}"),
            Self::IsIpAddress => f.write_str("IP address"),
            Self::StringInSlice(valid) => write!(f, "one of {}", valid.join(", ")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    const PROTOCOLS: Validator = Validator::StringInSlice(&["radsec", "udp"]);

    #[test]
    fn ip_validator_accepts_v4_and_v6() {
        for ip in ["10.0.0.1", "0.0.0.0", "255.255.255.255", "::1", "fd00::10", "2001:db8::1"] {
            assert!(Validator::IsIpAddress.check("address", &json!(ip)).is_ok(), "{ip}");
        }
    }

    #[test]
    fn ip_validator_rejects_garbage() {
        for bad in ["999.999.999.999", "not-an-ip", "", "10.0.0", "10.0.0.1/24", "radius.lan"] {
            let err = Validator::IsIpAddress.check("address", &json!(bad)).unwrap_err();
            assert_eq!(err.attribute.as_deref(), Some("address"), "{bad}");
        }
    }

    #[test]
    fn port_bounds_are_inclusive() {
        assert!(Validator::PORT.check("port", &json!(0)).is_ok());
        assert!(Validator::PORT.check("port", &json!(65535)).is_ok());
        assert!(Validator::PORT.check("port", &json!(-1)).is_err());
        assert!(Validator::PORT.check("port", &json!(65536)).is_err());
    }

    #[test]
    fn port_error_text() {
        let err = Validator::PORT.check("accounting_port", &json!(65536)).unwrap_err();
        assert_eq!(
            err.summary,
            "expected accounting_port to be in the range (0 - 65535), got 65536"
        );
    }

    #[test]
    fn string_in_slice_is_exact() {
        assert!(PROTOCOLS.check("protocol", &json!("udp")).is_ok());
        assert!(PROTOCOLS.check("protocol", &json!("radsec")).is_ok());
        assert!(PROTOCOLS.check("protocol", &json!("tcp")).is_err());
        assert!(PROTOCOLS.check("protocol", &json!("UDP")).is_err());
    }

    #[test]
    fn wrong_json_type_is_reported() {
        let err = Validator::PORT.check("port", &json!("3799")).unwrap_err();
        assert_eq!(err.summary, "expected type of port to be integer");
    }
}
