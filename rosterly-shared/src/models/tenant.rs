/// Tenant model and plan/billing enumerations
///
/// A tenant is an isolated customer organization that owns its own users,
/// assignments, and billing plan. Users belong to tenants through the
/// membership model.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tenants (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     name VARCHAR(255) NOT NULL,
///     plan VARCHAR(50) NOT NULL DEFAULT 'free',
///     plan_status VARCHAR(50) NOT NULL DEFAULT 'active',
///     plan_user_id UUID REFERENCES users(id),
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT tenants_plan_check CHECK (
///         plan IN ('free', 'growth', 'enterprise')
///     ),
///     CONSTRAINT tenants_plan_status_check CHECK (
///         plan_status IN ('active', 'cancel_at_period_end', 'error')
///     )
/// );
/// ```
///
/// # Plan ownership
///
/// A tenant on a paid plan designates a single billing-responsible user via
/// `plan_user_id`. While the plan is paid and not winding down, that user
/// must keep admin access and may not be removed from the tenant; the
/// membership services enforce this.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Billing plan tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Free plan, no billing-responsible user
    Free,

    /// Growth plan (paid)
    Growth,

    /// Enterprise plan (paid, custom pricing)
    Enterprise,
}

impl PlanTier {
    /// Converts plan to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Growth => "growth",
            PlanTier::Enterprise => "enterprise",
        }
    }

    /// Parses plan from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "free" => Some(PlanTier::Free),
            "growth" => Some(PlanTier::Growth),
            "enterprise" => Some(PlanTier::Enterprise),
            _ => None,
        }
    }

    /// Whether this tier bills a subscription
    pub fn is_paid(&self) -> bool {
        !matches!(self, PlanTier::Free)
    }
}

/// Subscription lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    /// Subscription is active
    Active,

    /// Subscription was cancelled and runs out at the end of the current
    /// billing period; plan-owner protections are lifted during this window
    CancelAtPeriodEnd,

    /// Payment or provisioning error
    Error,
}

impl PlanStatus {
    /// Converts status to string for database storage
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanStatus::Active => "active",
            PlanStatus::CancelAtPeriodEnd => "cancel_at_period_end",
            PlanStatus::Error => "error",
        }
    }

    /// Parses status from string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(PlanStatus::Active),
            "cancel_at_period_end" => Some(PlanStatus::CancelAtPeriodEnd),
            "error" => Some(PlanStatus::Error),
            _ => None,
        }
    }
}

/// Tenant model representing an organization/account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    /// Unique tenant ID (UUID v4)
    pub id: Uuid,

    /// Organization/account name
    pub name: String,

    /// Current billing plan tier
    pub plan: PlanTier,

    /// Subscription lifecycle status
    pub plan_status: PlanStatus,

    /// User responsible for the paid subscription, if any
    pub plan_user_id: Option<Uuid>,

    /// When the tenant was created
    pub created_at: DateTime<Utc>,

    /// When the tenant was last updated
    pub updated_at: DateTime<Utc>,
}

impl Tenant {
    /// Returns the billing-responsible user while the plan protections apply.
    ///
    /// None when the tenant is on the free tier, has no designated plan
    /// owner, or the subscription is winding down (`cancel_at_period_end`).
    pub fn protected_plan_user(&self) -> Option<Uuid> {
        if !self.plan.is_paid() {
            return None;
        }
        if self.plan_status == PlanStatus::CancelAtPeriodEnd {
            return None;
        }
        self.plan_user_id
    }
}
