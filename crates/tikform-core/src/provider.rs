// ── Provider facade ──
//
// Entry point for hosts. Resolves type names against the registry and
// drives the lifecycle helpers over one backend.

use tracing::info;

use crate::backend::Backend;
use crate::diag::{Diagnostic, Diagnostics};
use crate::lifecycle;
use crate::plan::{self, Plan, PlanAction};
use crate::resources;
use crate::state::{ResourceConfig, ResourceData};

/// Lifecycle operations against one router.
pub struct Provider<B> {
    backend: B,
}

impl<B: Backend> Provider<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    /// Check a configuration without contacting the router.
    pub fn validate(&self, type_name: &str, config: &ResourceConfig) -> Diagnostics {
        match resources::lookup(type_name) {
            Ok(schema) => plan::validate(schema, config),
            Err(e) => Diagnostics::from(Diagnostic::from(e)),
        }
    }

    /// Plan the transition of `type_name.name` from `prior` to `config`.
    pub fn plan(
        &self,
        type_name: &str,
        name: &str,
        config: &ResourceConfig,
        prior: Option<&ResourceData>,
    ) -> Result<Plan, Diagnostics> {
        let schema = resources::lookup(type_name)
            .map_err(|e| Diagnostics::from(Diagnostic::from(e)))?;
        plan::plan(
            schema,
            &crate::store::address(type_name, name),
            config,
            prior,
        )
    }

    /// Plan the removal of a tracked instance.
    pub fn plan_destroy(
        &self,
        type_name: &str,
        name: &str,
        prior: &ResourceData,
    ) -> Result<Plan, Diagnostics> {
        let schema = resources::lookup(type_name)
            .map_err(|e| Diagnostics::from(Diagnostic::from(e)))?;
        Ok(plan::destroy_plan(
            schema,
            &crate::store::address(type_name, name),
            prior,
        ))
    }

    /// Carry out a plan. The returned state has no id when the instance
    /// no longer exists.
    pub async fn apply(
        &self,
        plan: &Plan,
        prior: Option<ResourceData>,
    ) -> (ResourceData, Diagnostics) {
        let schema = match resources::lookup(plan.type_name) {
            Ok(schema) => schema,
            Err(e) => return (prior.unwrap_or_default(), Diagnostics::from(Diagnostic::from(e))),
        };
        info!(address = %plan.address, action = %plan.action, "applying");
        match plan.action {
            PlanAction::Create => lifecycle::create(&self.backend, schema, &plan.planned).await,
            PlanAction::Update => {
                let mut data = prior.unwrap_or_default();
                let diags = lifecycle::update(&self.backend, schema, &mut data, &plan.planned).await;
                (data, diags)
            }
            PlanAction::NoOp => (prior.unwrap_or_default(), Diagnostics::new()),
            PlanAction::Delete => {
                let mut data = prior.unwrap_or_default();
                let diags = lifecycle::delete(&self.backend, schema, &mut data).await;
                (data, diags)
            }
        }
    }

    /// Re-read an instance from the router.
    pub async fn refresh(&self, type_name: &str, data: &mut ResourceData) -> Diagnostics {
        match resources::lookup(type_name) {
            Ok(schema) => lifecycle::read(&self.backend, schema, data).await,
            Err(e) => Diagnostics::from(Diagnostic::from(e)),
        }
    }

    /// Delete an instance.
    pub async fn destroy(&self, type_name: &str, data: &mut ResourceData) -> Diagnostics {
        match resources::lookup(type_name) {
            Ok(schema) => lifecycle::delete(&self.backend, schema, data).await,
            Err(e) => Diagnostics::from(Diagnostic::from(e)),
        }
    }

    /// Adopt an existing remote instance by id, then read it.
    pub async fn import(&self, type_name: &str, id: &str) -> (ResourceData, Diagnostics) {
        let schema = match resources::lookup(type_name) {
            Ok(schema) => schema,
            Err(e) => return (ResourceData::new(), Diagnostics::from(Diagnostic::from(e))),
        };
        let mut data = lifecycle::import_passthrough(id);
        let mut diags = lifecycle::read(&self.backend, schema, &mut data).await;
        if !diags.has_errors() && !data.exists() {
            diags.push(Diagnostic::error(format!(
                "cannot import non-existent remote object {}/{id}",
                schema.path()
            )));
        }
        (data, diags)
    }
}
