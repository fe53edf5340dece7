//! EntityMapper — raw result rows to domain entities.
//!
//! Pure functions; row order in equals entity order out. Joined foreign-key
//! and enum columns come back twice: the raw value plus a human-readable
//! sibling under `<column>@OData.Community.Display.V1.FormattedValue`.
//! Display fields (owner name, created-by, state) read the sibling, never
//! the raw value.

use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use client::Row;
use model::{Flow, Owner, OwnerKind, Solution};

/// Suffix of the platform-added formatted sibling keys.
pub const FORMATTED_VALUE_SUFFIX: &str = "@OData.Community.Display.V1.FormattedValue";

#[derive(Debug, Error)]
pub enum MapError {
    /// A column the entity cannot exist without is missing or mistyped.
    #[error("row is missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("column '{column}' is not a well-formed identifier: '{value}'")]
    BadIdentifier { column: &'static str, value: String },

    /// An access row where neither or both of the user/team name aliases
    /// carry a value. The join populates exactly one by construction, so
    /// anything else is an error here — never a silent default.
    #[error("owner row populates {populated} of the user/team name aliases, expected exactly 1")]
    AmbiguousOwner { populated: usize },
}

// ---------------------------------------------------------------------------
// Column readers
// ---------------------------------------------------------------------------

fn text<'a>(row: &'a Row, column: &str) -> Option<&'a str> {
    row.get(column).and_then(Value::as_str)
}

fn required_text(row: &Row, column: &'static str) -> Result<String, MapError> {
    text(row, column)
        .map(str::to_owned)
        .ok_or(MapError::MissingColumn(column))
}

fn formatted(row: &Row, column: &str) -> Option<String> {
    text(row, &format!("{column}{FORMATTED_VALUE_SUFFIX}")).map(str::to_owned)
}

fn identifier(row: &Row, column: &'static str) -> Result<Uuid, MapError> {
    let raw = text(row, column).ok_or(MapError::MissingColumn(column))?;
    raw.parse()
        .map_err(|_| MapError::BadIdentifier { column, value: raw.to_owned() })
}

fn number(row: &Row, column: &'static str) -> Result<i64, MapError> {
    row.get(column)
        .and_then(Value::as_i64)
        .ok_or(MapError::MissingColumn(column))
}

// ---------------------------------------------------------------------------
// Entity mappers
// ---------------------------------------------------------------------------

/// Map a solution row.
pub fn solution(row: &Row) -> Result<Solution, MapError> {
    Ok(Solution {
        name: required_text(row, "friendlyname")?,
        unique_name: required_text(row, "uniquename")?,
        id: identifier(row, "solutionid")?,
        managed: row
            .get("ismanaged")
            .and_then(Value::as_bool)
            .ok_or(MapError::MissingColumn("ismanaged"))?,
    })
}

/// Map a workflow row from the flow-listing query.
pub fn flow(row: &Row) -> Result<Flow, MapError> {
    Ok(Flow::new(
        required_text(row, "name")?,
        identifier(row, "workflowid")?,
        formatted(row, "_ownerid_value").unwrap_or_default(),
        identifier(row, "_ownerid_value")?,
        number(row, "type")?,
        number(row, "category")?,
        text(row, "description").unwrap_or_default().to_owned(),
        formatted(row, "_createdby_value").unwrap_or_default(),
        formatted(row, "statecode").unwrap_or_default(),
        text(row, "clientdata").map(str::to_owned),
    ))
}

/// Map an access-grant row from the co-owner query.
///
/// The principal kind comes from which of the two mutually exclusive join
/// aliases produced a name.
pub fn owner(row: &Row) -> Result<Owner, MapError> {
    let user = text(row, "user").filter(|name| !name.is_empty());
    let team = text(row, "team").filter(|name| !name.is_empty());

    let (name, kind) = match (user, team) {
        (Some(user), None) => (user.to_owned(), OwnerKind::User),
        (None, Some(team)) => (team.to_owned(), OwnerKind::Team),
        (None, None) => return Err(MapError::AmbiguousOwner { populated: 0 }),
        (Some(_), Some(_)) => return Err(MapError::AmbiguousOwner { populated: 2 }),
    };

    Ok(Owner { name, id: identifier(row, "principalid")?, kind })
}

/// Map a user row from the principal search.
pub fn user(row: &Row) -> Result<Owner, MapError> {
    Ok(Owner {
        name: required_text(row, "fullname")?,
        id: identifier(row, "systemuserid")?,
        kind: OwnerKind::User,
    })
}

/// Map a team row from the principal search.
pub fn team(row: &Row) -> Result<Owner, MapError> {
    Ok(Owner {
        name: required_text(row, "name")?,
        id: identifier(row, "teamid")?,
        kind: OwnerKind::Team,
    })
}

/// Map every row, preserving order. Total: one bad row fails the batch.
pub fn all<T>(
    rows: &[Row],
    map_one: impl Fn(&Row) -> Result<T, MapError>,
) -> Result<Vec<T>, MapError> {
    rows.iter().map(map_one).collect()
}
