//! `DataSyncService` — the read and mutation operations of the core.

use serde_json::{json, Value};
use tracing::{info, instrument};

use client::{ActionRequest, RemoteDataClient};
use model::codes::{DEFAULT_SOLUTION, WORKFLOW_COMPONENT_TYPE};
use model::{co_owner_access_names, Flow, Owner, OwnerKind, Solution};
use query::SearchKind;

use crate::{mapper, ServiceError};

/// Orchestrates query construction, execution, and mapping against one
/// remote client. Holds no state beyond the client itself.
pub struct DataSyncService<C> {
    client: C,
}

impl<C: RemoteDataClient> DataSyncService<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// The underlying remote client.
    pub fn client(&self) -> &C {
        &self.client
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// List visible solutions matching the managed flag, newest first.
    #[instrument(skip(self))]
    pub async fn list_solutions(&self, managed: bool) -> Result<Vec<Solution>, ServiceError> {
        let rows = self.client.query(&query::solutions_filter(managed)).await?;
        let solutions = mapper::all(&rows, mapper::solution)?;
        // The platform's default solution never appears in listings.
        Ok(solutions
            .into_iter()
            .filter(|solution| solution.unique_name != DEFAULT_SOLUTION)
            .collect())
    }

    /// List flows, optionally restricted to one solution's members.
    #[instrument(skip(self, solution), fields(solution = solution.map(|s| s.name.as_str())))]
    pub async fn list_flows(&self, solution: Option<&Solution>) -> Result<Vec<Flow>, ServiceError> {
        let document = query::flows_by_solution(solution.map(|s| s.id));
        let rows = self.client.fetch(&document).await?;
        let flows = mapper::all(&rows, mapper::flow)?;
        info!(count = flows.len(), "fetched flows");
        Ok(flows)
    }

    /// List the flow's co-owners.
    ///
    /// The primary owner is dropped here, at the data-access boundary, even
    /// when the raw access rows include them.
    #[instrument(skip(self, flow), fields(flow = %flow.id))]
    pub async fn list_co_owners(&self, flow: &Flow) -> Result<Vec<Owner>, ServiceError> {
        let rows = self.client.fetch(&query::co_owners(flow.id)).await?;
        let owners = mapper::all(&rows, mapper::owner)?;
        Ok(owners.into_iter().filter(|owner| owner.id != flow.owner_id).collect())
    }

    /// List the solutions the flow is a member of.
    #[instrument(skip(self, flow), fields(flow = %flow.id))]
    pub async fn list_flow_solutions(&self, flow: &Flow) -> Result<Vec<Solution>, ServiceError> {
        let rows = self.client.fetch(&query::flow_solutions(flow.id)).await?;
        Ok(mapper::all(&rows, mapper::solution)?)
    }

    /// Search users by display name.
    pub async fn search_users(&self, text: &str) -> Result<Vec<Owner>, ServiceError> {
        let rows = self.client.query(&query::search_filter(SearchKind::User, text)).await?;
        Ok(mapper::all(&rows, mapper::user)?)
    }

    /// Search teams by name.
    pub async fn search_teams(&self, text: &str) -> Result<Vec<Owner>, ServiceError> {
        let rows = self.client.query(&query::search_filter(SearchKind::Team, text)).await?;
        Ok(mapper::all(&rows, mapper::team)?)
    }

    /// Search both principal kinds concurrently: all matching users followed
    /// by all matching teams, each sub-list in its original order, no
    /// cross-list de-duplication.
    pub async fn search_users_and_teams(&self, text: &str) -> Result<Vec<Owner>, ServiceError> {
        let (users, teams) = tokio::join!(self.search_users(text), self.search_teams(text));
        let mut principals = users?;
        principals.extend(teams?);
        Ok(principals)
    }

    /// Search unmanaged solutions a flow could be added to.
    pub async fn search_solutions(&self, text: &str) -> Result<Vec<Solution>, ServiceError> {
        let rows = self
            .client
            .query(&query::search_filter(SearchKind::Solution, text))
            .await?;
        let mut solutions = mapper::all(&rows, mapper::solution)?;
        solutions.retain(|solution| solution.unique_name != DEFAULT_SOLUTION);
        Ok(solutions)
    }

    // -----------------------------------------------------------------------
    // Mutations
    //
    // Each builds a fixed-shape payload and invokes the named action. On
    // failure the transport error propagates unchanged; the corresponding
    // read is the caller's refresh.
    // -----------------------------------------------------------------------

    /// Grant the fixed owner-equivalent rights on `flow` to `owner`.
    #[instrument(skip(self, flow, owner), fields(flow = %flow.id, owner = %owner.id))]
    pub async fn grant_co_ownership(&self, flow: &Flow, owner: &Owner) -> Result<(), ServiceError> {
        let parameters = json!({
            "Target": workflow_reference(flow),
            "PrincipalAccess": {
                "AccessMask": co_owner_access_names(),
                "Principal": principal_reference(owner),
            },
        });
        self.client.execute(ActionRequest::action("GrantAccess", parameters)).await?;
        info!("granted co-ownership");
        Ok(())
    }

    /// Revoke `owner`'s access to `flow`.
    #[instrument(skip(self, flow, owner), fields(flow = %flow.id, owner = %owner.id))]
    pub async fn revoke_co_ownership(&self, flow: &Flow, owner: &Owner) -> Result<(), ServiceError> {
        let parameters = json!({
            "Target": workflow_reference(flow),
            "Revokee": principal_reference(owner),
        });
        self.client.execute(ActionRequest::action("RevokeAccess", parameters)).await?;
        info!("revoked co-ownership");
        Ok(())
    }

    /// Add `flow` to `solution`, without pulling in required components.
    #[instrument(skip(self, flow, solution), fields(flow = %flow.id, solution = %solution.unique_name))]
    pub async fn add_solution_membership(
        &self,
        flow: &Flow,
        solution: &Solution,
    ) -> Result<(), ServiceError> {
        let parameters = json!({
            "SolutionUniqueName": solution.unique_name,
            "ComponentType": WORKFLOW_COMPONENT_TYPE,
            "ComponentId": flow.id,
            "AddRequiredComponents": false,
        });
        self.client
            .execute(ActionRequest::action("AddSolutionComponent", parameters))
            .await?;
        info!("added solution membership");
        Ok(())
    }

    /// Remove `flow` from `solution`.
    #[instrument(skip(self, flow, solution), fields(flow = %flow.id, solution = %solution.unique_name))]
    pub async fn remove_solution_membership(
        &self,
        flow: &Flow,
        solution: &Solution,
    ) -> Result<(), ServiceError> {
        let parameters = json!({
            "SolutionUniqueName": solution.unique_name,
            "ComponentType": WORKFLOW_COMPONENT_TYPE,
            "SolutionComponent": { "solutioncomponentid": flow.id },
        });
        self.client
            .execute(ActionRequest::action("RemoveSolutionComponent", parameters))
            .await?;
        info!("removed solution membership");
        Ok(())
    }
}

/// Target reference for the workflow record, tagged with its entity kind.
fn workflow_reference(flow: &Flow) -> Value {
    json!({
        "workflowid": flow.id,
        "@odata.type": "Microsoft.Dynamics.CRM.workflow",
    })
}

/// Principal reference, tagged by the owner's kind.
fn principal_reference(owner: &Owner) -> Value {
    let kind_tag = match owner.kind {
        OwnerKind::User => "Microsoft.Dynamics.CRM.systemuser",
        OwnerKind::Team => "Microsoft.Dynamics.CRM.team",
    };
    json!({
        "ownerid": owner.id,
        "@odata.type": kind_tag,
    })
}
