//! Integration tests for kindred-store
//!
//! These tests verify member upserts, listing, and relation edge idempotence.

use chrono::NaiveDate;
use kindred_domain::traits::{
    MemberLookup, MemberQuery, MemberStore, RelationStore, SortDirection, SortField,
};
use kindred_domain::{
    Address, MemberId, NewMember, RelationType, SocialNetwork, SocialNetworkType, UpsertOutcome,
};
use kindred_store::SqliteStore;

fn member(code: &str, first_name: &str) -> NewMember {
    NewMember {
        code: code.to_string(),
        first_name: first_name.to_string(),
        ..Default::default()
    }
}

fn seeded_store() -> (SqliteStore, MemberId, MemberId) {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let root = store.upsert_member(member("0", "Louis")).unwrap().id;
    let child = store.upsert_member(member("0.1", "Marie")).unwrap().id;
    (store, root, child)
}

#[test]
fn test_store_initialization() {
    let store = SqliteStore::new(":memory:");
    assert!(store.is_ok(), "Store should initialize successfully");
}

#[test]
fn test_upsert_member_creates_then_updates() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let first = store.upsert_member(member("0.1", "Marie")).unwrap();
    assert_eq!(first.outcome, UpsertOutcome::Created);

    let mut changed = member("0.1", "Marie-Anne");
    changed.last_name = Some("Dupont".to_string());
    let second = store.upsert_member(changed).unwrap();
    assert_eq!(second.outcome, UpsertOutcome::Updated);
    assert_eq!(second.id, first.id, "Update should keep the member id");

    let stored = store.get_member(first.id).unwrap().unwrap();
    assert_eq!(stored.data.first_name, "Marie-Anne");
    assert_eq!(stored.data.last_name.as_deref(), Some("Dupont"));
    assert_eq!(store.member_count().unwrap(), 1);
}

#[test]
fn test_member_address_round_trip() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let mut new_member = member("0", "Louis");
    new_member.address = Some(Address {
        street: Some("12 rue des Lilas".to_string()),
        city: Some("Nantes".to_string()),
        ..Default::default()
    });
    let id = store.upsert_member(new_member.clone()).unwrap().id;

    let stored = store.find_member_by_code("0").unwrap().unwrap();
    assert_eq!(stored.id, id);
    assert_eq!(stored.data, new_member);

    let without_address = store.upsert_member(member("0.1", "Marie")).unwrap().id;
    let stored = store.get_member(without_address).unwrap().unwrap();
    assert!(stored.data.address.is_none());
}

#[test]
fn test_find_member_by_code_is_exact() {
    let (store, _, _) = seeded_store();

    assert!(store.find_member_by_code("0.1").unwrap().is_some());
    assert!(store.find_member_by_code("0.10").unwrap().is_none());
    assert!(store.find_member_by_code("0.").unwrap().is_none());
}

#[test]
fn test_member_index_snapshot() {
    let (mut store, root, child) = seeded_store();

    let index = store.member_index().unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(index.find_by_code("0"), Some(root));
    assert_eq!(index.find_by_code("0.1"), Some(child));

    // Later writes do not leak into an existing snapshot
    store.upsert_member(member("0.2", "Paul")).unwrap();
    assert_eq!(index.find_by_code("0.2"), None);
    assert!(store.member_index().unwrap().find_by_code("0.2").is_some());
}

#[test]
fn test_upsert_relation_is_idempotent() {
    let (mut store, root, child) = seeded_store();

    let first = store
        .upsert_relation(child, root, RelationType::Children, Some(1))
        .unwrap();
    assert!(first.is_created());

    let second = store
        .upsert_relation(child, root, RelationType::Children, Some(2))
        .unwrap();
    assert_eq!(second.outcome, UpsertOutcome::Updated);
    assert_eq!(second.id, first.id);

    assert_eq!(store.relation_count().unwrap(), 1);
    let edge = store
        .find_relation(child, root, RelationType::Children)
        .unwrap()
        .unwrap();
    assert_eq!(edge.rank, Some(2), "Rank should reflect the latest upsert");
}

#[test]
fn test_relation_triple_distinguishes_type_and_direction() {
    let (mut store, root, child) = seeded_store();

    store
        .upsert_relation(root, child, RelationType::Parent, None)
        .unwrap();
    store
        .upsert_relation(child, root, RelationType::Children, Some(1))
        .unwrap();
    store
        .upsert_relation(root, child, RelationType::Partner, Some(1))
        .unwrap();

    assert_eq!(store.relation_count().unwrap(), 3);
    assert!(store
        .find_relation(child, root, RelationType::Parent)
        .unwrap()
        .is_none());
}

#[test]
fn test_upsert_relation_can_clear_rank() {
    let (mut store, root, child) = seeded_store();

    store
        .upsert_relation(root, child, RelationType::Parent, Some(4))
        .unwrap();
    store
        .upsert_relation(root, child, RelationType::Parent, None)
        .unwrap();

    let edge = store
        .find_relation(root, child, RelationType::Parent)
        .unwrap()
        .unwrap();
    assert_eq!(edge.rank, None);
}

#[test]
fn test_relations_of_member() {
    let (mut store, root, child) = seeded_store();
    let other = store.upsert_member(member("0.2", "Paul")).unwrap().id;

    store
        .upsert_relation(root, child, RelationType::Parent, None)
        .unwrap();
    store
        .upsert_relation(child, root, RelationType::Children, Some(1))
        .unwrap();
    store
        .upsert_relation(root, other, RelationType::Parent, None)
        .unwrap();

    let child_edges = store.relations_of(child).unwrap();
    assert_eq!(child_edges.len(), 2);
    assert!(child_edges
        .iter()
        .all(|e| e.counterpart(child) == Some(root)));

    assert_eq!(store.relations_of(root).unwrap().len(), 3);
    assert_eq!(store.member_code(other).unwrap(), "0.2");
}

#[test]
fn test_relation_requires_existing_members() {
    let (mut store, root, _) = seeded_store();

    let missing = MemberId::from_value(999);
    let result = store.upsert_relation(root, missing, RelationType::Parent, None);
    assert!(result.is_err(), "Foreign keys should reject unknown members");
    assert_eq!(store.relation_count().unwrap(), 0);
}

#[test]
fn test_list_members_pagination_and_sort() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    for (code, name) in [("0", "Louis"), ("0.1", "Marie"), ("0.2", "Anne"), ("0.3", "Paul")] {
        store.upsert_member(member(code, name)).unwrap();
    }

    let query = MemberQuery {
        page: 2,
        limit: 3,
        ..Default::default()
    };
    let page = store.list_members(&query).unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.total_pages(), 2);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].code(), "0.3");

    let query = MemberQuery {
        sort_by: SortField::FirstName,
        direction: SortDirection::Descending,
        ..Default::default()
    };
    let names: Vec<_> = store
        .list_members(&query)
        .unwrap()
        .items
        .into_iter()
        .map(|m| m.data.first_name)
        .collect();
    assert_eq!(names, vec!["Paul", "Marie", "Louis", "Anne"]);
}

#[test]
fn test_list_members_search() {
    let mut store = SqliteStore::new(":memory:").unwrap();
    let mut louis = member("0", "Louis");
    louis.address = Some(Address {
        city: Some("Angers".to_string()),
        ..Default::default()
    });
    store.upsert_member(louis).unwrap();
    store.upsert_member(member("0.1", "Marie")).unwrap();

    let query = MemberQuery {
        search: Some("anger".to_string()),
        ..Default::default()
    };
    let page = store.list_members(&query).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.items[0].code(), "0");

    let query = MemberQuery {
        search: Some("   ".to_string()),
        ..Default::default()
    };
    assert_eq!(store.list_members(&query).unwrap().total, 2);
}

#[test]
fn test_dates_round_trip_and_sort() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let mut elder = member("0", "Louis");
    elder.birth_date = NaiveDate::from_ymd_opt(1920, 1, 5);
    elder.death_date = NaiveDate::from_ymd_opt(2001, 11, 30);
    store.upsert_member(elder).unwrap();

    let mut younger = member("0.1", "Marie");
    younger.birth_date = NaiveDate::from_ymd_opt(1950, 3, 12);
    store.upsert_member(younger).unwrap();

    let stored = store.find_member_by_code("0").unwrap().unwrap();
    assert_eq!(stored.data.birth_date, NaiveDate::from_ymd_opt(1920, 1, 5));
    assert_eq!(stored.data.death_date, NaiveDate::from_ymd_opt(2001, 11, 30));

    let query = MemberQuery {
        sort_by: SortField::BirthDate,
        direction: SortDirection::Descending,
        ..Default::default()
    };
    let codes: Vec<String> = store
        .list_members(&query)
        .unwrap()
        .items
        .iter()
        .map(|m| m.code().to_string())
        .collect();
    assert_eq!(codes, vec!["0.1", "0"]);

    // Dates are stored as ISO text, so they stay searchable
    let query = MemberQuery {
        search: Some("1950-03".to_string()),
        ..Default::default()
    };
    assert_eq!(store.list_members(&query).unwrap().total, 1);
}

#[test]
fn test_social_networks_are_replaced_on_upsert() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let mut louis = member("0", "Louis");
    louis.social_networks = vec![
        SocialNetwork {
            network_type: SocialNetworkType::Facebook,
            value: "louis.martin".to_string(),
        },
        SocialNetwork {
            network_type: SocialNetworkType::Other("mastodon".to_string()),
            value: "@louis@example.social".to_string(),
        },
    ];
    let id = store.upsert_member(louis.clone()).unwrap().id;

    let stored = store.get_member(id).unwrap().unwrap();
    assert_eq!(stored.data.social_networks, louis.social_networks);

    louis.social_networks = vec![SocialNetwork {
        network_type: SocialNetworkType::Instagram,
        value: "louis_m".to_string(),
    }];
    store.upsert_member(louis.clone()).unwrap();

    let stored = store.find_member_by_code("0").unwrap().unwrap();
    assert_eq!(stored.data.social_networks, louis.social_networks);
}

#[test]
fn test_list_members_search_matches_social_network() {
    let mut store = SqliteStore::new(":memory:").unwrap();

    let mut marie = member("0.1", "Marie");
    marie.social_networks = vec![
        SocialNetwork {
            network_type: SocialNetworkType::LinkedIn,
            value: "marie-durand-genealogy".to_string(),
        },
        SocialNetwork {
            network_type: SocialNetworkType::Facebook,
            value: "marie.genealogy".to_string(),
        },
    ];
    store.upsert_member(marie).unwrap();
    store.upsert_member(member("0", "Louis")).unwrap();

    let query = MemberQuery {
        search: Some("genealogy".to_string()),
        ..Default::default()
    };
    let page = store.list_members(&query).unwrap();

    // Two matching accounts still yield the member once
    assert_eq!(page.total, 1);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].code(), "0.1");
    assert_eq!(page.items[0].data.social_networks.len(), 2);
}

#[test]
fn test_list_members_rejects_zero_limit() {
    let store = SqliteStore::new(":memory:").unwrap();
    let query = MemberQuery {
        limit: 0,
        ..Default::default()
    };
    assert!(store.list_members(&query).is_err());
}

#[test]
fn test_file_backed_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kindred.db");

    {
        let mut store = SqliteStore::new(&path).unwrap();
        let (root, child) = (
            store.upsert_member(member("0", "Louis")).unwrap().id,
            store.upsert_member(member("0.1", "Marie")).unwrap().id,
        );
        store
            .upsert_relation(root, child, RelationType::Parent, None)
            .unwrap();
    }

    let store = SqliteStore::new(&path).unwrap();
    assert_eq!(store.member_count().unwrap(), 2);
    assert_eq!(store.relation_count().unwrap(), 1);
}
