//! Core domain entities.
//!
//! These types are the in-memory shape of the platform's workflow, solution,
//! and access-grant rows. They are constructed only by the service-layer
//! mapper; the two enrichment fields on [`Flow`] (`solutions`, `co_owners`)
//! are the only parts reassigned after construction, once per enrichment
//! pass.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::trigger::{derive_trigger, TriggerState, TriggerText};

// ---------------------------------------------------------------------------
// Solution
// ---------------------------------------------------------------------------

/// A deployable grouping a flow can be a member of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Display name.
    pub name: String,
    /// Stable key — the only field membership mutations accept.
    pub unique_name: String,
    pub id: Uuid,
    /// Managed solutions cannot receive new components; immutable once
    /// fetched.
    pub managed: bool,
}

// ---------------------------------------------------------------------------
// Owner
// ---------------------------------------------------------------------------

/// The two principal kinds the platform grants access to. Closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerKind {
    User,
    Team,
}

/// A user or team holding owner-equivalent rights on a flow.
///
/// Identity is `id`; `kind` is derived at mapping time from which of the two
/// join aliases produced a name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub name: String,
    pub id: Uuid,
    pub kind: OwnerKind,
}

// ---------------------------------------------------------------------------
// Flow
// ---------------------------------------------------------------------------

/// A workflow record, plus its enrichment fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flow {
    pub name: String,
    pub id: Uuid,
    /// Display name of the primary owner (distinct from co-owners).
    pub owner_name: String,
    pub owner_id: Uuid,
    pub flow_type: i64,
    pub category: i64,
    pub description: String,
    pub created_by: String,
    /// Human-readable state text from the formatted state column.
    pub state: String,
    /// Solution memberships; empty until an enrichment pass fills it.
    pub solutions: Vec<Solution>,
    /// Co-owners; never contains the primary owner.
    pub co_owners: Vec<Owner>,
    /// Raw serialized definition document. May be absent or invalid; that
    /// only affects the derived trigger text.
    pub definition: Option<String>,
    trigger: TriggerState,
}

impl Flow {
    /// Construct a flow from mapped scalar columns. Enrichment fields start
    /// empty; the trigger text starts uncomputed.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: String,
        id: Uuid,
        owner_name: String,
        owner_id: Uuid,
        flow_type: i64,
        category: i64,
        description: String,
        created_by: String,
        state: String,
        definition: Option<String>,
    ) -> Self {
        Self {
            name,
            id,
            owner_name,
            owner_id,
            flow_type,
            category,
            description,
            created_by,
            state,
            solutions: Vec::new(),
            co_owners: Vec::new(),
            definition,
            trigger: TriggerState::Uncomputed,
        }
    }

    /// Trigger text derived from the definition document.
    ///
    /// Computed at most once per instance; every outcome — a named trigger,
    /// no trigger, unreadable — is cached for the instance's lifetime and
    /// never recomputed, even if `definition` is reassigned afterwards.
    pub fn trigger_text(&mut self) -> TriggerText {
        match &self.trigger {
            TriggerState::Computed(text) => text.clone(),
            TriggerState::Uncomputed => {
                let text = derive_trigger(self.definition.as_deref());
                self.trigger = TriggerState::Computed(text.clone());
                text
            }
        }
    }
}
