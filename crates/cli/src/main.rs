//! `flowsteward` CLI entry-point.
//!
//! Operator commands over the data-sync core:
//! - `solutions` / `flows` / `co-owners` / `flow-solutions` — reads.
//! - `search-principals` / `search-solutions`               — searches.
//! - `grant` / `revoke`                                     — co-ownership.
//! - `add-to-solution` / `remove-from-solution`             — membership.
//!
//! Mutating commands re-issue the corresponding read afterwards; the core
//! itself never refreshes on its own.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use client::{Connection, HttpDataClient};
use model::{Flow, Owner, OwnerKind, Solution};
use search::SearchDebouncer;
use service::{enrich_flows, DataSyncService};

#[derive(Parser)]
#[command(
    name = "flowsteward",
    about = "Inspect and manage flow ownership and solution membership",
    version
)]
struct Cli {
    /// Environment root URL, e.g. https://org.crm.dynamics.com
    #[arg(long, env = "FLOWSTEWARD_URL")]
    url: String,

    /// Bearer token for the environment.
    #[arg(long, env = "FLOWSTEWARD_TOKEN", hide_env_values = true)]
    token: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List visible solutions.
    Solutions {
        /// List managed solutions instead of unmanaged ones.
        #[arg(long)]
        managed: bool,
    },
    /// List flows, optionally restricted to one solution's members.
    Flows {
        /// Solution id to filter by.
        #[arg(long)]
        solution: Option<Uuid>,
        /// Also fetch memberships, co-owners, and trigger text per flow.
        #[arg(long)]
        detailed: bool,
    },
    /// List a flow's co-owners.
    CoOwners {
        /// Flow id.
        flow: Uuid,
    },
    /// List the solutions a flow belongs to.
    FlowSolutions {
        /// Flow id.
        flow: Uuid,
    },
    /// Search users and teams by name.
    SearchPrincipals {
        /// Search text; omit with --interactive to type queries live.
        text: Option<String>,
        /// Exclude principals already co-owning this flow.
        #[arg(long)]
        flow: Option<Uuid>,
        /// Read queries from stdin, debounced like a search box.
        #[arg(long)]
        interactive: bool,
    },
    /// Search unmanaged solutions a flow could be added to.
    SearchSolutions {
        text: String,
    },
    /// Grant co-ownership of a flow to a user or team.
    Grant {
        flow: Uuid,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        team: Option<String>,
    },
    /// Revoke a user's or team's co-ownership of a flow.
    Revoke {
        flow: Uuid,
        #[arg(long)]
        user: Option<String>,
        #[arg(long)]
        team: Option<String>,
    },
    /// Add a flow to a solution (by unique name or search text).
    AddToSolution {
        flow: Uuid,
        solution: String,
    },
    /// Remove a flow from a solution.
    RemoveFromSolution {
        flow: Uuid,
        solution: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let connection = Connection::new(cli.url, cli.token)?;
    let service = DataSyncService::new(HttpDataClient::new(connection));

    match cli.command {
        Command::Solutions { managed } => {
            print_solutions(&service.list_solutions(managed).await?);
        }
        Command::Flows { solution, detailed } => {
            let selected = match solution {
                Some(id) => Some(find_solution_by_id(&service, id).await?),
                None => None,
            };
            let mut flows = service.list_flows(selected.as_ref()).await?;
            if detailed {
                let cancel = CancellationToken::new();
                enrich_flows(&service, &mut flows, &cancel).await;
            }
            print_flows(&mut flows, detailed);
        }
        Command::CoOwners { flow } => {
            let flow = find_flow(&service, flow).await?;
            print_owners(&service.list_co_owners(&flow).await?);
        }
        Command::FlowSolutions { flow } => {
            let flow = find_flow(&service, flow).await?;
            print_solutions(&service.list_flow_solutions(&flow).await?);
        }
        Command::SearchPrincipals { text, flow, interactive } => {
            let present: Vec<Uuid> = match flow {
                Some(id) => {
                    let flow = find_flow(&service, id).await?;
                    service
                        .list_co_owners(&flow)
                        .await?
                        .into_iter()
                        .map(|owner| owner.id)
                        .collect()
                }
                None => Vec::new(),
            };
            match (text, interactive) {
                (Some(text), false) => search_principals(&service, &text, &present).await?,
                (None, true) => interactive_principal_search(&service, &present).await?,
                _ => bail!("provide a search text, or --interactive without one"),
            }
        }
        Command::SearchSolutions { text } => {
            print_solutions(&service.search_solutions(&text).await?);
        }
        Command::Grant { flow, user, team } => {
            let flow = find_flow(&service, flow).await?;
            let owner = resolve_principal(&service, user, team).await?;
            service.grant_co_ownership(&flow, &owner).await?;
            println!("Granted co-ownership of '{}' to '{}'.", flow.name, owner.name);
            print_owners(&service.list_co_owners(&flow).await?);
        }
        Command::Revoke { flow, user, team } => {
            let flow = find_flow(&service, flow).await?;
            let owner = resolve_principal(&service, user, team).await?;
            service.revoke_co_ownership(&flow, &owner).await?;
            println!("Revoked co-ownership of '{}' from '{}'.", flow.name, owner.name);
            print_owners(&service.list_co_owners(&flow).await?);
        }
        Command::AddToSolution { flow, solution } => {
            let flow = find_flow(&service, flow).await?;
            let solution = resolve_solution(&service, &solution).await?;
            service.add_solution_membership(&flow, &solution).await?;
            println!("Added '{}' to '{}'.", flow.name, solution.name);
            print_solutions(&service.list_flow_solutions(&flow).await?);
        }
        Command::RemoveFromSolution { flow, solution } => {
            let flow = find_flow(&service, flow).await?;
            let solution = resolve_solution(&service, &solution).await?;
            service.remove_solution_membership(&flow, &solution).await?;
            println!("Removed '{}' from '{}'.", flow.name, solution.name);
            print_solutions(&service.list_flow_solutions(&flow).await?);
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Lookup helpers
// ---------------------------------------------------------------------------

async fn find_flow(service: &DataSyncService<HttpDataClient>, id: Uuid) -> Result<Flow> {
    service
        .list_flows(None)
        .await?
        .into_iter()
        .find(|flow| flow.id == id)
        .with_context(|| format!("no flow with id {id} in the listing"))
}

async fn find_solution_by_id(
    service: &DataSyncService<HttpDataClient>,
    id: Uuid,
) -> Result<Solution> {
    for managed in [false, true] {
        if let Some(solution) = service
            .list_solutions(managed)
            .await?
            .into_iter()
            .find(|solution| solution.id == id)
        {
            return Ok(solution);
        }
    }
    bail!("no solution with id {id}")
}

async fn resolve_principal(
    service: &DataSyncService<HttpDataClient>,
    user: Option<String>,
    team: Option<String>,
) -> Result<Owner> {
    let (name, matches) = match (user, team) {
        (Some(name), None) => {
            let matches = service.search_users(&name).await?;
            (name, matches)
        }
        (None, Some(name)) => {
            let matches = service.search_teams(&name).await?;
            (name, matches)
        }
        _ => bail!("specify exactly one of --user or --team"),
    };
    pick_unique(matches, &name, |owner| owner.name.clone())
}

async fn resolve_solution(
    service: &DataSyncService<HttpDataClient>,
    text: &str,
) -> Result<Solution> {
    let matches = service.search_solutions(text).await?;
    pick_unique(matches, text, |solution| solution.unique_name.clone())
}

/// Prefer an exact name match; otherwise accept a single candidate.
fn pick_unique<T>(mut matches: Vec<T>, wanted: &str, name_of: impl Fn(&T) -> String) -> Result<T> {
    if let Some(index) = matches.iter().position(|m| name_of(m) == wanted) {
        return Ok(matches.swap_remove(index));
    }
    match matches.len() {
        0 => bail!("nothing matched '{wanted}'"),
        1 => Ok(matches.remove(0)),
        n => {
            let names: Vec<String> = matches.iter().map(&name_of).collect();
            bail!("'{wanted}' is ambiguous ({n} matches): {}", names.join(", "))
        }
    }
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

async fn search_principals(
    service: &DataSyncService<HttpDataClient>,
    text: &str,
    present: &[Uuid],
) -> Result<()> {
    let results = service.search_users_and_teams(text).await?;
    let results = search::exclude_present(results, present, |owner| owner.id);
    print_owners(&results);
    Ok(())
}

/// Read queries from stdin and dispatch them through the debouncer, the way
/// a search box would. An empty line quits.
async fn interactive_principal_search(
    service: &DataSyncService<HttpDataClient>,
    present: &[Uuid],
) -> Result<()> {
    let (debouncer, mut committed) = SearchDebouncer::with_default_delay();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Type to search (empty line quits):");

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) if !line.trim().is_empty() => debouncer.input(line.trim()),
                _ => break,
            },
            Some(text) = committed.recv() => {
                search_principals(service, &text, present).await?;
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

fn print_solutions(solutions: &[Solution]) {
    if solutions.is_empty() {
        println!("No solutions.");
        return;
    }
    for solution in solutions {
        let managed = if solution.managed { "managed" } else { "unmanaged" };
        println!("{}  {} ({}, {managed})", solution.id, solution.name, solution.unique_name);
    }
}

fn print_owners(owners: &[Owner]) {
    if owners.is_empty() {
        println!("No principals.");
        return;
    }
    for owner in owners {
        let kind = match owner.kind {
            OwnerKind::User => "user",
            OwnerKind::Team => "team",
        };
        println!("{}  {} ({kind})", owner.id, owner.name);
    }
}

fn print_flows(flows: &mut [Flow], detailed: bool) {
    if flows.is_empty() {
        println!("No flows.");
        return;
    }
    for flow in flows {
        println!("{}  {} [{}] owner: {}", flow.id, flow.name, flow.state, flow.owner_name);
        if detailed {
            println!("    trigger:   {}", flow.trigger_text());
            let solutions: Vec<&str> =
                flow.solutions.iter().map(|s| s.name.as_str()).collect();
            println!("    solutions: {}", solutions.join(", "));
            let co_owners: Vec<&str> =
                flow.co_owners.iter().map(|o| o.name.as_str()).collect();
            println!("    co-owners: {}", co_owners.join(", "));
        }
    }
}
