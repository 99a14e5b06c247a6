//! Read compatibility across RouterOS versions.
//!
//! `/radius/incoming` only reports `vrf` on firmware that supports it
//! (7.4+). When the router reports one, an unconfigured `vrf` should plan
//! as `main`, the router's own default; when it doesn't, `vrf` has no
//! default at all so older routers never see a spurious change.
//!
//! The default is recorded on the instance, never on the shared schema,
//! and is recomputed on every read: a later read without `vrf` drops it.

use tracing::debug;

use crate::state::ResourceData;

/// Attribute whose default depends on firmware support.
pub const VRF_KEY: &str = "vrf";

/// Effective default of [`VRF_KEY`] when the router supports it.
pub const VRF_DEFAULT: &str = "main";

/// Post-read adapter for settings menus carrying an optional `vrf`.
pub fn compatible_system_read(data: &mut ResourceData) {
    if data.get_ok(VRF_KEY).is_some() {
        debug!(default = VRF_DEFAULT, "router reports vrf; enabling its default");
        data.set_effective_default(VRF_KEY, VRF_DEFAULT);
    } else {
        data.clear_effective_default(VRF_KEY);
    }
}
