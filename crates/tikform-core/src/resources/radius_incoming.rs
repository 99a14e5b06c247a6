//! `/radius/incoming`: listener for CoA and disconnect requests.

use crate::compat::{VRF_KEY, compatible_system_read};
use crate::schema::{Attribute, Identity, ResourceKind, ResourceSchema, Validator};

pub const TYPE_NAME: &str = "routeros_radius_incoming";
pub const PATH: &str = "/radius/incoming";

pub fn radius_incoming() -> ResourceSchema {
    ResourceSchema::new(TYPE_NAME, PATH, ResourceKind::Singleton)
        .identity(Identity::Name)
        .read_adapter(compatible_system_read)
        .attribute(
            "accept",
            Attribute::optional_bool()
                .with_default(false)
                .describe("Whether to accept unsolicited messages."),
        )
        .attribute(
            "port",
            Attribute::optional_int()
                .with_default(3799)
                .describe("Port to listen for requests on.")
                .validate_with(Validator::PORT),
        )
        .attribute(
            VRF_KEY,
            Attribute::optional_string()
                .describe("VRF the listener is bound to. Available from RouterOS 7.4."),
        )
}
