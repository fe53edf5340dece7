//! The fixed joined-query shapes this domain needs.

use uuid::Uuid;

use model::co_owner_access_mask;
use model::codes::{
    ACTIVE_SOLUTION, DEFAULT_SOLUTION, FLOW_CATEGORY_MODERN, FLOW_PAGE_SIZE, FLOW_TYPE_DEFINITION,
};

use crate::fetch::{Condition, EntityBlock, FetchDoc, LinkEntity};

/// Flow listing: workflow records of the fixed type/category pair, by name.
///
/// With a solution id, joins through the solution-membership linking table
/// so only that solution's flows come back; without one, all matching
/// records are returned.
pub fn flows_by_solution(solution_id: Option<Uuid>) -> FetchDoc {
    let mut entity = EntityBlock::new("workflow");
    entity.attributes = vec![
        "category",
        "name",
        "type",
        "ownerid",
        "description",
        "createdby",
        "statecode",
        "workflowid",
        "clientdata",
    ];
    entity.order = Some(("name", false));
    entity.conditions = vec![
        Condition::eq("type", FLOW_TYPE_DEFINITION),
        Condition::eq("category", FLOW_CATEGORY_MODERN),
    ];
    if let Some(id) = solution_id {
        entity.links.push(LinkEntity {
            name: "solutioncomponent",
            from: "objectid",
            to: "workflowid",
            alias: "sc",
            outer: false,
            attributes: Vec::new(),
            conditions: vec![Condition::eq("solutionid", id)],
        });
    }
    FetchDoc { top: Some(FLOW_PAGE_SIZE), entity }
}

/// Co-owner listing: access grants on the flow at exactly the owner mask,
/// outer-joined to users and teams so exactly one of the `user`/`team` name
/// aliases is populated per row.
pub fn co_owners(flow_id: Uuid) -> FetchDoc {
    let mut entity = EntityBlock::new("principalobjectaccess");
    entity.attributes = vec!["objectid", "accessrightsmask", "principalid"];
    entity.conditions = vec![
        Condition::eq("objectid", flow_id),
        Condition::eq("accessrightsmask", co_owner_access_mask()),
    ];
    entity.links = vec![
        LinkEntity {
            name: "systemuser",
            from: "systemuserid",
            to: "principalid",
            alias: "u",
            outer: true,
            attributes: vec![("fullname", Some("user"))],
            conditions: Vec::new(),
        },
        LinkEntity {
            name: "team",
            from: "teamid",
            to: "principalid",
            alias: "t",
            outer: true,
            attributes: vec![("name", Some("team"))],
            conditions: Vec::new(),
        },
    ];
    FetchDoc { top: None, entity }
}

/// Membership listing: solutions the flow belongs to, minus the default and
/// "Active" pseudo-solutions.
pub fn flow_solutions(flow_id: Uuid) -> FetchDoc {
    let mut entity = EntityBlock::new("solution");
    entity.attributes = vec!["friendlyname", "uniquename", "solutionid", "ismanaged"];
    entity.conditions = vec![
        Condition::ne("uniquename", DEFAULT_SOLUTION),
        Condition::ne("uniquename", ACTIVE_SOLUTION),
    ];
    entity.links = vec![LinkEntity {
        name: "solutioncomponent",
        from: "solutionid",
        to: "solutionid",
        alias: "sc",
        outer: false,
        attributes: Vec::new(),
        conditions: vec![Condition::eq("objectid", flow_id)],
    }];
    FetchDoc { top: None, entity }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_listing_is_pinned_to_the_modern_flow_codes() {
        let rendered = flows_by_solution(None).render();
        assert!(rendered.starts_with("<fetch top='50'>"));
        assert!(rendered.contains("<condition attribute='type' operator='eq' value='1'/>"));
        assert!(rendered.contains("<condition attribute='category' operator='eq' value='5'/>"));
        assert!(rendered.contains("<order attribute='name' descending='false'/>"));
        assert!(rendered.contains("<attribute name='clientdata'/>"));
        // No solution selected — no membership join.
        assert!(!rendered.contains("link-entity"));
    }

    #[test]
    fn selecting_a_solution_adds_the_membership_join() {
        let id = Uuid::new_v4();
        let rendered = flows_by_solution(Some(id)).render();
        assert!(rendered
            .contains("<link-entity name='solutioncomponent' from='objectid' to='workflowid'"));
        assert!(rendered.contains(&format!(
            "<condition attribute='solutionid' operator='eq' value='{id}'/>"
        )));
    }

    #[test]
    fn co_owner_query_filters_on_the_shared_access_mask() {
        let rendered = co_owners(Uuid::new_v4()).render();
        assert!(rendered.contains(
            "<condition attribute='accessrightsmask' operator='eq' value='852023'/>"
        ));
        // Both principal kinds joined as outer so either alias may be empty.
        assert!(rendered.contains("name='systemuser'"));
        assert!(rendered.contains("name='team'"));
        assert_eq!(rendered.matches("link-type='outer'").count(), 2);
    }

    #[test]
    fn membership_query_excludes_default_and_active() {
        let rendered = flow_solutions(Uuid::new_v4()).render();
        assert!(rendered
            .contains("<condition attribute='uniquename' operator='ne' value='Default'/>"));
        assert!(rendered
            .contains("<condition attribute='uniquename' operator='ne' value='Active'/>"));
    }
}
