//! Relations command implementation.

use crate::cli::RelationsArgs;
use crate::error::{CliError, Result};
use crate::output::{Formatter, RelationView};
use kindred_domain::traits::{MemberStore, RelationStore};
use kindred_store::SqliteStore;

/// Execute the relations command.
pub fn execute_relations(args: RelationsArgs, store: &SqliteStore, formatter: &Formatter) -> Result<()> {
    let member = store
        .find_member_by_code(&args.code)?
        .ok_or_else(|| CliError::MemberNotFound(args.code.clone()))?;

    let views = relation_views(store, member.id)?;
    println!("{}", formatter.format_relations(&member, &views)?);
    Ok(())
}

/// Edges of `member` paired with the code of the member at the other end
pub fn relation_views(
    store: &SqliteStore,
    member: kindred_domain::MemberId,
) -> Result<Vec<RelationView>> {
    let mut views = Vec::new();
    for edge in store.relations_of(member)? {
        let Some(other) = edge.counterpart(member) else {
            continue;
        };
        views.push(RelationView {
            outgoing: edge.member1 == member,
            other_code: store.member_code(other)?,
            edge,
        });
    }
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindred_domain::{NewMember, RelationType};

    fn add(store: &mut SqliteStore, code: &str) -> kindred_domain::MemberId {
        store
            .upsert_member(NewMember {
                code: code.to_string(),
                first_name: code.to_string(),
                ..Default::default()
            })
            .unwrap()
            .id
    }

    #[test]
    fn test_relation_views_resolve_counterpart_codes() {
        let mut store = SqliteStore::new(":memory:").unwrap();
        let root = add(&mut store, "0");
        let child = add(&mut store, "0.1");
        store.upsert_relation(root, child, RelationType::Parent, None).unwrap();
        store
            .upsert_relation(child, root, RelationType::Children, Some(1))
            .unwrap();

        let views = relation_views(&store, child).unwrap();
        assert_eq!(views.len(), 2);
        assert!(views.iter().all(|v| v.other_code == "0"));

        let outgoing: Vec<_> = views.iter().filter(|v| v.outgoing).collect();
        assert_eq!(outgoing.len(), 1);
        assert_eq!(outgoing[0].edge.relation_type, RelationType::Children);
        assert_eq!(outgoing[0].edge.rank, Some(1));
    }
}
