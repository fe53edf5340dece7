//! Fixed platform codes for the flow domain.

/// Workflow record `type` code for runnable definitions.
pub const FLOW_TYPE_DEFINITION: i64 = 1;

/// Workflow record `category` code for modern cloud flows.
///
/// Flow listings filter on this together with [`FLOW_TYPE_DEFINITION`]
/// server-side; non-matching workflow records are never returned.
pub const FLOW_CATEGORY_MODERN: i64 = 5;

/// Component-type code identifying a workflow in the solution-component
/// actions. Shared between the add and remove payloads.
pub const WORKFLOW_COMPONENT_TYPE: u32 = 29;

/// Unique name of the platform's default solution. Excluded from every
/// listing, membership, and search read.
pub const DEFAULT_SOLUTION: &str = "Default";

/// Unique name of the "Active" pseudo-solution. Excluded from membership
/// and search reads alongside [`DEFAULT_SOLUTION`].
pub const ACTIVE_SOLUTION: &str = "Active";

/// Fixed page size for flow listings; no further pagination is attempted.
pub const FLOW_PAGE_SIZE: u32 = 50;
