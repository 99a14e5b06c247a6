//! `/radius`: RADIUS servers the router authenticates against.

use crate::schema::{Attribute, DiffSuppress, Identity, ResourceKind, ResourceSchema, Validator};

use super::{KEY_COMMENT, KEY_DISABLED, comment, disabled};

pub const TYPE_NAME: &str = "routeros_radius";
pub const PATH: &str = "/radius";

const PROTOCOLS: &[&str] = &["radsec", "udp"];

pub fn radius() -> ResourceSchema {
    ResourceSchema::new(TYPE_NAME, PATH, ResourceKind::List)
        .identity(Identity::Id)
        .attribute(
            "accounting_backup",
            Attribute::optional_bool()
                .with_default(false)
                .describe("Whether this entry is the backup accounting server."),
        )
        .attribute(
            "accounting_port",
            Attribute::optional_int()
                .with_default(1813)
                .describe("Server port used for accounting.")
                .validate_with(Validator::PORT),
        )
        .attribute(
            "address",
            Attribute::required_string()
                .describe("IPv4 or IPv6 address of the server.")
                .validate_with(Validator::IsIpAddress),
        )
        .attribute(
            "authentication_port",
            Attribute::optional_int()
                .with_default(1812)
                .describe("Server port used for authentication.")
                .validate_with(Validator::PORT),
        )
        .attribute(
            "called_id",
            Attribute::optional_string().describe("Called station identifier."),
        )
        .attribute(
            "certificate",
            Attribute::optional_string()
                .with_default("none")
                .describe("Certificate presented to the server when RadSec is used."),
        )
        .attribute(KEY_COMMENT, comment())
        .attribute(KEY_DISABLED, disabled())
        .attribute(
            "domain",
            Attribute::optional_string()
                .describe("Windows domain passed to servers that validate domains."),
        )
        .attribute(
            "protocol",
            Attribute::optional_string()
                .with_default("udp")
                .describe("Transport used to reach the server.")
                .validate_with(Validator::StringInSlice(PROTOCOLS)),
        )
        .attribute(
            "realm",
            Attribute::optional_string()
                .describe("Explicit realm so users need not supply an ISP domain."),
        )
        .attribute(
            "secret",
            Attribute::optional_string()
                .describe("Shared secret for the server.")
                .sensitive(),
        )
        .attribute(
            "service",
            Attribute::optional_string().describe(
                "Comma-separated router services using this server: hotspot, login, ppp, wireless, dhcp.",
            ),
        )
        .attribute(
            "src_address",
            Attribute::optional_string()
                .describe("Source IPv4/IPv6 address of requests sent to the server.")
                .validate_with(Validator::IsIpAddress),
        )
        .attribute(
            "timeout",
            Attribute::optional_string()
                .with_default("300ms")
                .describe("Time after which a request is resent.")
                .suppress_diff(DiffSuppress::TimeEqual),
        )
}
