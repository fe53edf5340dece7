//! Per-flow enrichment: solution memberships and co-owners.
//!
//! Enrichment fans out across all listed flows at once; for each flow the
//! two fetches are themselves issued concurrently and joined before the
//! entity is touched. Results apply independently, as soon as they
//! complete — there is no batching or cross-flow ordering.

use futures::stream::{FuturesUnordered, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use client::RemoteDataClient;
use model::Flow;

use crate::DataSyncService;

/// Run one enrichment pass over `flows`, returning how many were enriched.
///
/// `cancel` is the pass's supersession flag: once cancelled, completions are
/// discarded instead of applied, so a stale pass can never write onto a
/// newer flow list. A flow whose fetches fail is skipped, not fatal to the
/// pass.
pub async fn enrich_flows<C: RemoteDataClient>(
    service: &DataSyncService<C>,
    flows: &mut [Flow],
    cancel: &CancellationToken,
) -> usize {
    // Futures own snapshots of the flows they enrich, so completions can be
    // applied back onto the slice as they arrive.
    let mut pending: FuturesUnordered<_> = flows
        .iter()
        .map(|flow| {
            let flow = flow.clone();
            async move {
                let (solutions, owners) = tokio::join!(
                    service.list_flow_solutions(&flow),
                    service.list_co_owners(&flow),
                );
                (flow.id, solutions, owners)
            }
        })
        .collect();

    let mut applied = 0;
    while let Some((id, solutions, owners)) = pending.next().await {
        if cancel.is_cancelled() {
            debug!(flow = %id, "pass superseded, discarding enrichment result");
            continue;
        }

        let (solutions, owners) = match (solutions, owners) {
            (Ok(solutions), Ok(owners)) => (solutions, owners),
            (Err(error), _) | (_, Err(error)) => {
                warn!(flow = %id, %error, "enrichment fetch failed, skipping flow");
                continue;
            }
        };

        if let Some(flow) = flows.iter_mut().find(|flow| flow.id == id) {
            flow.solutions = solutions;
            flow.co_owners = owners;
            applied += 1;
        }
    }

    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use serde_json::json;
    use uuid::Uuid;

    use client::mock::MockDataClient;
    use client::Row;

    fn fixture_flow(name: &str) -> Flow {
        Flow::new(
            name.into(),
            Uuid::new_v4(),
            "Primary".into(),
            Uuid::new_v4(),
            1,
            5,
            String::new(),
            "Primary".into(),
            "Activated".into(),
            None,
        )
    }

    fn solution_row(name: &str) -> Row {
        json!({
            "friendlyname": name,
            "uniquename": name.to_lowercase(),
            "solutionid": Uuid::new_v4().to_string(),
            "ismanaged": false
        })
        .as_object()
        .unwrap()
        .clone()
    }

    fn owner_row(name: &str) -> Row {
        json!({ "user": name, "principalid": Uuid::new_v4().to_string() })
            .as_object()
            .unwrap()
            .clone()
    }

    /// Rendered-text fragment unique to one flow's co-owner query: its id
    /// condition immediately followed by the access-mask condition.
    fn co_owner_needle(flow: &Flow) -> String {
        format!("value='{}'/><condition attribute='accessrightsmask'", flow.id)
    }

    #[tokio::test]
    async fn enrichment_applies_both_fetches_per_flow() {
        let mut flows = vec![fixture_flow("alpha"), fixture_flow("beta")];

        // Membership rows route on the solution query; co-owner rows on each
        // flow's access query.
        let client = MockDataClient::new()
            .with_rows(co_owner_needle(&flows[0]), vec![owner_row("Ada")])
            .with_rows(co_owner_needle(&flows[1]), vec![owner_row("Grace")])
            .with_rows("<entity name='solution'>", vec![solution_row("Sales")]);
        let service = DataSyncService::new(client);

        let cancel = CancellationToken::new();
        let applied = enrich_flows(&service, &mut flows, &cancel).await;

        assert_eq!(applied, 2);
        assert_eq!(flows[0].co_owners.len(), 1);
        assert_eq!(flows[0].co_owners[0].name, "Ada");
        assert_eq!(flows[1].co_owners[0].name, "Grace");
        assert_eq!(flows[0].solutions.len(), 1);
        assert_eq!(flows[1].solutions.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_pass_applies_nothing() {
        let mut flows = vec![fixture_flow("alpha")];
        let client = MockDataClient::new()
            .with_latency(Duration::from_millis(50))
            .with_rows("<entity name='solution'>", vec![solution_row("Sales")]);
        let service = DataSyncService::new(client);

        let cancel = CancellationToken::new();
        // Supersede the pass before any fetch can resolve.
        cancel.cancel();
        let applied = enrich_flows(&service, &mut flows, &cancel).await;

        assert_eq!(applied, 0);
        assert!(flows[0].solutions.is_empty());
        assert!(flows[0].co_owners.is_empty());
    }

    #[tokio::test]
    async fn one_failing_flow_does_not_sink_the_pass() {
        let mut flows = vec![fixture_flow("alpha"), fixture_flow("broken")];

        // The broken flow's co-owner rows are unmappable (both aliases set).
        let bad_row = json!({
            "user": "Ada",
            "team": "Platform",
            "principalid": Uuid::new_v4().to_string()
        })
        .as_object()
        .unwrap()
        .clone();

        let client = MockDataClient::new()
            .with_rows(co_owner_needle(&flows[0]), vec![owner_row("Ada")])
            .with_rows(co_owner_needle(&flows[1]), vec![bad_row])
            .with_rows("<entity name='solution'>", vec![solution_row("Sales")]);
        let service = DataSyncService::new(client);

        let cancel = CancellationToken::new();
        let applied = enrich_flows(&service, &mut flows, &cancel).await;

        assert_eq!(applied, 1);
        assert_eq!(flows[0].co_owners.len(), 1);
        assert!(flows[1].co_owners.is_empty());
    }
}
