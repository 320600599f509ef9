//! Entitlement Gate — decides whether a caller may run a capability.
//!
//! Runs before any provider call. Rejections here never write a creation row
//! and never touch the usage counter, except for the one-time initialization
//! of a missing counter for free callers.

use tracing::info;

use crate::errors::AppError;
use crate::generation::capability::Capability;
use crate::identity::{Caller, IdentityStore, Plan};

/// The caller's plan and the usage count observed at admission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entitlement {
    pub plan: Plan,
    pub free_usage: u32,
}

/// Admits or rejects `caller` for `capability`.
///
/// - premium-only capability + free caller → `PremiumRequired` (identity store untouched)
/// - premium caller → admitted, usage not read
/// - free caller with `free_usage >= limit` → `QuotaExceeded`
pub async fn admit(
    identity: &dyn IdentityStore,
    caller: &Caller,
    capability: Capability,
    free_limit: u32,
) -> Result<Entitlement, AppError> {
    if caller.plan.is_premium() {
        return Ok(Entitlement {
            plan: Plan::Premium,
            free_usage: 0,
        });
    }

    if capability.premium_only() {
        return Err(AppError::PremiumRequired);
    }

    let free_usage = load_free_usage(identity, &caller.user_id).await?;
    if free_usage >= free_limit {
        info!(
            user_id = %caller.user_id,
            free_usage,
            capability = capability.name(),
            "Free usage limit reached"
        );
        return Err(AppError::QuotaExceeded);
    }

    Ok(Entitlement {
        plan: Plan::Free,
        free_usage,
    })
}

/// Reads the counter, initializing it to 0 when the user has none stored.
async fn load_free_usage(identity: &dyn IdentityStore, user_id: &str) -> Result<u32, AppError> {
    match identity.free_usage(user_id).await? {
        Some(usage) => Ok(usage),
        None => {
            initialize_usage(identity, user_id).await?;
            Ok(0)
        }
    }
}

/// Writes the initial counter for a free user.
pub async fn initialize_usage(identity: &dyn IdentityStore, user_id: &str) -> Result<(), AppError> {
    info!(user_id, "Initializing free usage counter");
    identity.set_free_usage(user_id, 0).await?;
    Ok(())
}
