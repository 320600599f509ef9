//! Usage-gated generation pipeline.
//!
//! Flow: gate → generate (normalize + invoke) → persist → bump usage → content.
//!
//! The usage bump is not atomic with the gate read: two concurrent requests
//! from one free user can both be admitted and both write `observed + 1`.

use std::future::Future;

use tracing::{error, info};

use crate::errors::AppError;
use crate::generation::capability::Capability;
use crate::generation::gate::{self, Entitlement};
use crate::identity::Caller;
use crate::models::creation::NewCreation;
use crate::state::AppState;

/// Output of one capability, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// What gets stored in `creations.prompt` (not necessarily the raw input).
    pub prompt: String,
    pub content: String,
    pub publish: bool,
}

impl Generated {
    pub fn new(prompt: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            content: content.into(),
            publish: false,
        }
    }
}

/// Runs `generate` behind the entitlement gate and records the result.
/// Returns the content sent back to the client.
pub async fn run<F, Fut>(
    state: &AppState,
    caller: &Caller,
    capability: Capability,
    generate: F,
) -> Result<String, AppError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<Generated, AppError>>,
{
    let entitlement = gate::admit(
        state.identity.as_ref(),
        caller,
        capability,
        state.config.free_usage_limit,
    )
    .await?;

    let generated = generate().await?;

    record(state, caller, &entitlement, capability, generated).await
}

/// Appends the creation row, then bumps the free-usage counter.
///
/// A failed insert fails the request. A failed usage bump does not: the
/// content is already generated and stored, so the lost increment is logged.
async fn record(
    state: &AppState,
    caller: &Caller,
    entitlement: &Entitlement,
    capability: Capability,
    generated: Generated,
) -> Result<String, AppError> {
    let creation_id = state
        .creations
        .insert(NewCreation {
            user_id: caller.user_id.clone(),
            prompt: generated.prompt,
            content: generated.content.clone(),
            creation_type: capability.creation_type(),
            publish: generated.publish,
        })
        .await?;

    info!(
        user_id = %caller.user_id,
        %creation_id,
        capability = capability.name(),
        "Creation stored"
    );

    if !entitlement.plan.is_premium() {
        let next = entitlement.free_usage.saturating_add(1);
        if let Err(e) = state.identity.set_free_usage(&caller.user_id, next).await {
            error!(
                user_id = %caller.user_id,
                %creation_id,
                "Failed to update free usage to {next}: {e}"
            );
        }
    }

    Ok(generated.content)
}
