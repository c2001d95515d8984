//! Repository Integration Tests
//!
//! Run against an in-memory SQLite database.

use std::path::Path;
use std::time::Duration;

use crate::domain::{
    BatchItem, BatchList, BatchRequest, BatchSection, DomainError, HistoryQuery, HistorySort,
    ItemFlag, ItemPatch, ListPatch, NewHistoryEntry, NewItem, NewList, NewSection, SectionPatch,
};
use crate::repository::ordering::{self, Scope};
use crate::repository::{
    init_db, BatchRepository, DbState, HistoryRepository, ItemRepository, ListRepository,
    OrderingOperations, Repository, ScopedRepository, SectionRepository, MEMORY_PATH,
};

struct Repos {
    db: DbState,
    lists: ListRepository,
    sections: SectionRepository,
    items: ItemRepository,
    history: HistoryRepository,
    batch: BatchRepository,
}

async fn setup_test_db() -> Repos {
    let db = init_db(Path::new(MEMORY_PATH), Duration::from_secs(5))
        .await
        .expect("Failed to init test DB");
    Repos {
        lists: ListRepository::new(db.clone()),
        sections: SectionRepository::new(db.clone()),
        items: ItemRepository::new(db.clone()),
        history: HistoryRepository::new(db.clone()),
        batch: BatchRepository::new(db.clone()),
        db,
    }
}

async fn count(db: &DbState, table: &'static str) -> i64 {
    db.with_conn(move |conn| {
        let sql = format!("SELECT COUNT(*) FROM {}", table);
        Ok(conn.query_row(&sql, [], |r| r.get(0))?)
    })
    .await
    .unwrap()
}

/// Ids of a scope in display order
async fn orders(db: &DbState, scope: Scope) -> Vec<i64> {
    db.with_conn(move |conn| ordering::ordered_ids(conn, scope))
        .await
        .unwrap()
}

async fn assert_dense(db: &DbState, scope: Scope) {
    let table = match scope {
        Scope::AllLists => "lists",
        Scope::List(_) => "sections",
        Scope::Section(_) => "items",
    };
    let ids = orders(db, scope).await;
    let values: Vec<i64> = db
        .with_conn(move |conn| {
            let mut out = Vec::new();
            for id in ids {
                let sql = format!("SELECT sort_order FROM {} WHERE id = ?1", table);
                out.push(conn.query_row(&sql, [id], |r| r.get(0))?);
            }
            Ok(out)
        })
        .await
        .unwrap();
    let expected: Vec<i64> = (0..values.len() as i64).collect();
    assert_eq!(values, expected, "scope {:?} is not dense", scope);
}

/// A list with `sections` sections of `items` items each
async fn seed(repos: &Repos, name: &str, sections: usize, items: usize) -> (i64, Vec<i64>, Vec<i64>) {
    let list = repos.lists.create(NewList::new(name)).await.unwrap();
    let mut section_ids = Vec::new();
    let mut item_ids = Vec::new();
    for s in 0..sections {
        let section = repos
            .sections
            .create(NewSection::new(list.id, format!("{} section {}", name, s)))
            .await
            .unwrap();
        for i in 0..items {
            let item = repos
                .items
                .create(NewItem::new(section.id, format!("item {}-{}", s, i)))
                .await
                .unwrap();
            item_ids.push(item.id);
        }
        section_ids.push(section.id);
    }
    (list.id, section_ids, item_ids)
}

#[tokio::test]
async fn test_create_list_appends_and_normalizes_icon() {
    let repos = setup_test_db().await;

    let first = repos.lists.create(NewList::with_icon("Groceries", "cart")).await.unwrap();
    let second = repos.lists.create(NewList::new("Hardware")).await.unwrap();

    assert!(first.id > 0);
    assert_eq!(first.icon, "🛒");
    assert_eq!(first.sort_order, 0);
    assert_eq!(second.sort_order, 1);
    assert_eq!(second.icon, "");
}

#[tokio::test]
async fn test_find_list_includes_stats() {
    let repos = setup_test_db().await;
    let (list_id, _, item_ids) = seed(&repos, "Weekly", 2, 2).await;
    repos.items.toggle(item_ids[0], ItemFlag::Completed).await.unwrap();
    repos.items.toggle(item_ids[1], ItemFlag::Uncertain).await.unwrap();

    let list = repos.lists.find_by_id(list_id).await.unwrap().unwrap();
    let stats = list.stats.unwrap();
    assert_eq!(stats.section_count, 2);
    assert_eq!(stats.item_count, 4);
    assert_eq!(stats.completed_count, 1);
    assert_eq!(stats.uncertain_count, 1);
}

#[tokio::test]
async fn test_update_list_partial() {
    let repos = setup_test_db().await;
    let list = repos.lists.create(NewList::with_icon("Party", "cake")).await.unwrap();

    let renamed = repos
        .lists
        .update(
            list.id,
            ListPatch {
                name: Some("Birthday".into()),
                icon: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.name, "Birthday");
    assert_eq!(renamed.icon, "🎂");
    assert!(renamed.updated_at >= list.updated_at);
}

#[tokio::test]
async fn test_update_missing_list_is_not_found() {
    let repos = setup_test_db().await;
    let err = repos.lists.update(99, ListPatch::default()).await.unwrap_err();
    assert_eq!(err, DomainError::NotFound("List 99 not found".into()));
}

#[tokio::test]
async fn test_validation_failure_writes_nothing() {
    let repos = setup_test_db().await;
    let err = repos.lists.create(NewList::new("")).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
    assert_eq!(count(&repos.db, "lists").await, 0);
}

#[tokio::test]
async fn test_section_requires_existing_list() {
    let repos = setup_test_db().await;
    let err = repos.sections.create(NewSection::new(5, "Dairy")).await.unwrap_err();
    assert_eq!(err, DomainError::NotFound("List 5 not found".into()));
}

#[tokio::test]
async fn test_item_create_records_history() {
    let repos = setup_test_db().await;
    let (_, sections, _) = seed(&repos, "Weekly", 1, 0).await;

    let item = repos
        .items
        .create(NewItem::new(sections[0], "Milk").with_description("2%"))
        .await
        .unwrap();
    assert_eq!(item.sort_order, 0);
    assert_eq!(item.description, "2%");

    let history = repos.history.query(HistoryQuery::for_section(sections[0])).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].name, "Milk");
}

#[tokio::test]
async fn test_item_create_in_missing_section_leaves_no_history() {
    let repos = setup_test_db().await;
    let err = repos.items.create(NewItem::new(77, "Milk")).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
    assert_eq!(count(&repos.db, "item_history").await, 0);
}

#[tokio::test]
async fn test_item_update_and_toggle() {
    let repos = setup_test_db().await;
    let (_, _, items) = seed(&repos, "Weekly", 1, 1).await;

    let updated = repos
        .items
        .update(
            items[0],
            ItemPatch {
                description: Some("organic".into()),
                uncertain: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.description, "organic");
    assert!(updated.uncertain);
    assert_eq!(updated.name, "item 0-0");

    let toggled = repos.items.toggle(items[0], ItemFlag::Completed).await.unwrap();
    assert!(toggled.completed);
    let toggled = repos.items.toggle(items[0], ItemFlag::Completed).await.unwrap();
    assert!(!toggled.completed);

    let err = repos.items.toggle(12345, ItemFlag::Uncertain).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));
}

#[tokio::test]
async fn test_section_rename() {
    let repos = setup_test_db().await;
    let (_, sections, _) = seed(&repos, "Weekly", 1, 0).await;
    let section = repos
        .sections
        .update(sections[0], SectionPatch { name: Some("Bakery".into()) })
        .await
        .unwrap();
    assert_eq!(section.name, "Bakery");
}

#[tokio::test]
async fn test_move_up_first_and_down_last_are_noops() {
    let repos = setup_test_db().await;
    let a = repos.lists.create(NewList::new("A")).await.unwrap();
    let b = repos.lists.create(NewList::new("B")).await.unwrap();

    let up = repos.lists.move_up(a.id).await.unwrap();
    assert_eq!(up.swapped_with, None);
    assert_eq!(up.entity.sort_order, 0);
    assert_eq!(up.entity.name, a.name);

    let down = repos.lists.move_down(b.id).await.unwrap();
    assert_eq!(down.swapped_with, None);
    assert_eq!(down.entity.sort_order, 1);

    assert_eq!(orders(&repos.db, Scope::AllLists).await, vec![a.id, b.id]);
}

#[tokio::test]
async fn test_move_swaps_neighbours_in_scope() {
    let repos = setup_test_db().await;
    let (_, sections, items) = seed(&repos, "Weekly", 2, 3).await;

    let moved = repos.items.move_up(items[2]).await.unwrap();
    assert_eq!(moved.swapped_with, Some(items[1]));
    assert_eq!(moved.entity.sort_order, 1);
    assert_eq!(
        orders(&repos.db, Scope::Section(sections[0])).await,
        vec![items[0], items[2], items[1]]
    );
    // The other section is untouched
    assert_eq!(
        orders(&repos.db, Scope::Section(sections[1])).await,
        vec![items[3], items[4], items[5]]
    );

    let moved = repos.sections.move_down(sections[0]).await.unwrap();
    assert_eq!(moved.swapped_with, Some(sections[1]));
}

#[tokio::test]
async fn test_move_missing_entity_is_not_found() {
    let repos = setup_test_db().await;
    let err = repos.sections.move_up(3).await.unwrap_err();
    assert_eq!(err, DomainError::NotFound("Section 3 not found".into()));
}

#[tokio::test]
async fn test_orders_stay_dense_through_mixed_operations() {
    let repos = setup_test_db().await;
    let (first, _, _) = seed(&repos, "One", 0, 0).await;
    let (_, sections, items) = seed(&repos, "Two", 3, 4).await;
    let (third, _, _) = seed(&repos, "Three", 1, 1).await;

    repos.items.delete(items[1]).await.unwrap();
    repos.items.move_down(items[0]).await.unwrap();
    repos.items.move_to_section(items[5], sections[0]).await.unwrap();
    repos.sections.delete(sections[1]).await.unwrap();
    repos.sections.move_up(sections[2]).await.unwrap();
    repos.lists.delete(first).await.unwrap();
    repos.lists.move_up(third).await.unwrap();
    repos
        .items
        .create(NewItem::new(sections[2], "late addition"))
        .await
        .unwrap();

    assert_dense(&repos.db, Scope::AllLists).await;
    for list in repos.lists.list_in_scope(()).await.unwrap() {
        assert_dense(&repos.db, Scope::List(list.id)).await;
        for section in repos.sections.list_in_scope(list.id).await.unwrap() {
            assert_dense(&repos.db, Scope::Section(section.id)).await;
        }
    }
}

#[tokio::test]
async fn test_concurrent_moves_keep_orders_dense() {
    let repos = setup_test_db().await;
    for i in 0..6 {
        repos.lists.create(NewList::new(format!("L{}", i))).await.unwrap();
    }
    let ids = orders(&repos.db, Scope::AllLists).await;

    let mut handles = Vec::new();
    for round in 0..24 {
        let lists = repos.lists.clone();
        let id = ids[round % ids.len()];
        handles.push(tokio::spawn(async move {
            if round % 2 == 0 {
                lists.move_up(id).await
            } else {
                lists.move_down(id).await
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_dense(&repos.db, Scope::AllLists).await;
    let mut after = orders(&repos.db, Scope::AllLists).await;
    after.sort_unstable();
    let mut before = ids.clone();
    before.sort_unstable();
    assert_eq!(after, before);
}

#[tokio::test]
async fn test_move_item_to_other_section() {
    let repos = setup_test_db().await;
    let (_, sections, items) = seed(&repos, "Weekly", 2, 2).await;

    let relocation = repos.items.move_to_section(items[0], sections[1]).await.unwrap();
    assert!(relocation.moved());
    assert_eq!(relocation.from_section_id, sections[0]);
    assert_eq!(relocation.item.section_id, sections[1]);
    assert_eq!(relocation.item.sort_order, 2);

    assert_eq!(orders(&repos.db, Scope::Section(sections[0])).await, vec![items[1]]);
    assert_dense(&repos.db, Scope::Section(sections[0])).await;
    assert_dense(&repos.db, Scope::Section(sections[1])).await;
}

#[tokio::test]
async fn test_move_item_to_same_section_is_noop() {
    let repos = setup_test_db().await;
    let (_, sections, items) = seed(&repos, "Weekly", 1, 2).await;

    let relocation = repos.items.move_to_section(items[0], sections[0]).await.unwrap();
    assert!(!relocation.moved());
    assert_eq!(relocation.item.sort_order, 0);
}

#[tokio::test]
async fn test_move_item_to_missing_section() {
    let repos = setup_test_db().await;
    let (_, _, items) = seed(&repos, "Weekly", 1, 1).await;
    let err = repos.items.move_to_section(items[0], 999).await.unwrap_err();
    assert_eq!(err, DomainError::NotFound("Section 999 not found".into()));
}

#[tokio::test]
async fn test_delete_list_cascades() {
    let repos = setup_test_db().await;
    let list = repos.lists.create(NewList::new("Doomed")).await.unwrap();
    let s1 = repos.sections.create(NewSection::new(list.id, "A")).await.unwrap();
    let s2 = repos.sections.create(NewSection::new(list.id, "B")).await.unwrap();
    for (section, name) in [(s1.id, "x"), (s1.id, "y"), (s2.id, "z")] {
        repos.items.create(NewItem::new(section, name)).await.unwrap();
    }

    let deleted = repos.lists.delete(list.id).await.unwrap();
    assert_eq!(deleted.id, list.id);
    assert_eq!(count(&repos.db, "lists").await, 0);
    assert_eq!(count(&repos.db, "sections").await, 0);
    assert_eq!(count(&repos.db, "items").await, 0);
    assert_eq!(count(&repos.db, "item_history").await, 0);
}

#[tokio::test]
async fn test_delete_section_compacts_siblings() {
    let repos = setup_test_db().await;
    let (list_id, sections, _) = seed(&repos, "Weekly", 3, 1).await;

    repos.sections.delete(sections[0]).await.unwrap();
    let remaining = repos.sections.list_in_scope(list_id).await.unwrap();
    let order: Vec<(i64, i64)> = remaining.iter().map(|s| (s.id, s.sort_order)).collect();
    assert_eq!(order, vec![(sections[1], 0), (sections[2], 1)]);
    assert!(remaining.iter().all(|s| s.items.as_ref().map(Vec::len) == Some(1)));
}

#[tokio::test]
async fn test_batch_new_list() {
    let repos = setup_test_db().await;
    let request = BatchRequest::new_list(BatchList {
        name: "Party".into(),
        icon: Some("gift".into()),
        sections: vec![
            BatchSection::new("Drinks", vec![BatchItem::new("Cola"), BatchItem::new("Juice")]),
            BatchSection::new("Snacks", vec![BatchItem::new("Chips")]),
        ],
    });

    let outcome = repos.batch.create(request).await.unwrap();
    let list = outcome.list.unwrap();
    assert_eq!(list.icon, "🎁");
    assert_eq!(list.stats.unwrap().item_count, 3);
    assert_eq!(outcome.sections.len(), 2);
    assert_eq!(outcome.sections[1].sort_order, 1);
    assert_eq!(outcome.items.len(), 3);
    let drink_orders: Vec<i64> = outcome.sections[0]
        .items
        .as_ref()
        .unwrap()
        .iter()
        .map(|i| i.sort_order)
        .collect();
    assert_eq!(drink_orders, vec![0, 1]);
    assert_eq!(count(&repos.db, "item_history").await, 3);
}

#[tokio::test]
async fn test_batch_rolls_back_on_late_failure() {
    let repos = setup_test_db().await;
    repos
        .db
        .with_conn(|conn| {
            conn.execute_batch(
                "CREATE TRIGGER fail_item BEFORE INSERT ON items
                 WHEN NEW.name = 'Explode'
                 BEGIN SELECT RAISE(ABORT, 'forced failure'); END;",
            )?;
            Ok(())
        })
        .await
        .unwrap();

    let request = BatchRequest::new_list(BatchList {
        name: "Doomed".into(),
        icon: None,
        sections: vec![
            BatchSection::new("A", vec![BatchItem::new("One"), BatchItem::new("Two")]),
            BatchSection::new("B", vec![BatchItem::new("Three"), BatchItem::new("Explode")]),
        ],
    });

    let err = repos.batch.create(request).await.unwrap_err();
    assert!(matches!(err, DomainError::Internal(_)));
    assert_eq!(count(&repos.db, "lists").await, 0);
    assert_eq!(count(&repos.db, "sections").await, 0);
    assert_eq!(count(&repos.db, "items").await, 0);
    assert_eq!(count(&repos.db, "item_history").await, 0);
}

#[tokio::test]
async fn test_batch_add_items_appends_after_existing() {
    let repos = setup_test_db().await;
    let (_, sections, existing) = seed(&repos, "Weekly", 1, 2).await;

    let outcome = repos
        .batch
        .create(BatchRequest::add_items(
            sections[0],
            vec![BatchItem::new("Eggs"), BatchItem::new("Butter")],
        ))
        .await
        .unwrap();

    let new_orders: Vec<i64> = outcome.items.iter().map(|i| i.sort_order).collect();
    assert_eq!(new_orders, vec![2, 3]);

    let all = repos.items.list_in_scope(sections[0]).await.unwrap();
    let names: Vec<&str> = all.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["item 0-0", "item 0-1", "Eggs", "Butter"]);
    assert_eq!(all[0].id, existing[0]);
    assert_dense(&repos.db, Scope::Section(sections[0])).await;
}

#[tokio::test]
async fn test_batch_add_sections_appends_after_existing() {
    let repos = setup_test_db().await;
    let (list_id, _, _) = seed(&repos, "Weekly", 2, 0).await;

    let outcome = repos
        .batch
        .create(BatchRequest::add_sections(
            list_id,
            vec![BatchSection::new(
                "Frozen",
                vec![BatchItem::new("Peas"), BatchItem::new("Ice cream")],
            )],
        ))
        .await
        .unwrap();

    assert!(outcome.list.is_none());
    assert_eq!(outcome.sections[0].sort_order, 2);
    let item_orders: Vec<i64> = outcome.items.iter().map(|i| i.sort_order).collect();
    assert_eq!(item_orders, vec![0, 1]);
}

#[tokio::test]
async fn test_batch_missing_parent_is_not_found() {
    let repos = setup_test_db().await;
    let err = repos
        .batch
        .create(BatchRequest::add_items(42, vec![BatchItem::new("Eggs")]))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::NotFound("Section 42 not found".into()));

    let err = repos
        .batch
        .create(BatchRequest::add_sections(42, vec![BatchSection::new("X", Vec::new())]))
        .await
        .unwrap_err();
    assert_eq!(err, DomainError::NotFound("List 42 not found".into()));
    assert_eq!(count(&repos.db, "sections").await, 0);
}

#[tokio::test]
async fn test_history_dedupes_and_ranks() {
    let repos = setup_test_db().await;
    let (_, sections, _) = seed(&repos, "Weekly", 1, 0).await;
    let section = sections[0];

    for name in ["Milk", "Bread", "Milk", "Cheese", "Bread", "Milk"] {
        repos.items.create(NewItem::new(section, name)).await.unwrap();
    }

    let recent = repos.history.query(HistoryQuery::for_section(section)).await.unwrap();
    let names: Vec<&str> = recent.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Milk", "Bread", "Cheese"]);

    let frequent = repos
        .history
        .query(HistoryQuery {
            sort: HistorySort::Frequent,
            ..HistoryQuery::for_section(section)
        })
        .await
        .unwrap();
    let ranked: Vec<(&str, i64)> = frequent.iter().map(|h| (h.name.as_str(), h.usage_count)).collect();
    assert_eq!(ranked, vec![("Milk", 3), ("Bread", 2), ("Cheese", 1)]);
}

#[tokio::test]
async fn test_history_frequency_ties_follow_insertion_order() {
    let repos = setup_test_db().await;
    let (_, sections, _) = seed(&repos, "Weekly", 1, 0).await;
    for name in ["Apples", "Pears", "Plums"] {
        repos
            .history
            .record(NewHistoryEntry {
                name: name.into(),
                section_id: sections[0],
            })
            .await
            .unwrap();
    }

    let frequent = repos
        .history
        .query(HistoryQuery {
            sort: HistorySort::Frequent,
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<&str> = frequent.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Apples", "Pears", "Plums"]);
}

#[tokio::test]
async fn test_history_prefix_filter_and_deletion() {
    let repos = setup_test_db().await;
    let (_, sections, _) = seed(&repos, "Weekly", 1, 0).await;
    for name in ["Milk", "Mint", "Bread"] {
        repos.items.create(NewItem::new(sections[0], name)).await.unwrap();
    }

    let matches = repos
        .history
        .query(HistoryQuery {
            q: Some("mi".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(matches.len(), 2);

    repos.history.delete(matches[0].id).await.unwrap();
    assert!(repos.history.find_by_id(matches[0].id).await.unwrap().is_none());
    let err = repos.history.delete(matches[0].id).await.unwrap_err();
    assert!(matches!(err, DomainError::NotFound(_)));

    let removed = repos
        .history
        .delete_many(vec![matches[1].id, 9999])
        .await
        .unwrap();
    assert_eq!(removed, 1);
    assert_eq!(count(&repos.db, "item_history").await, 1);
}

#[tokio::test]
async fn test_history_prefix_folds_non_ascii_case() {
    let repos = setup_test_db().await;
    let (_, sections, _) = seed(&repos, "Weekly", 1, 0).await;
    for name in ["Śmietana", "Milk", "ŻUBRÓWKA"] {
        repos.items.create(NewItem::new(sections[0], name)).await.unwrap();
    }

    let search = |q: &str| HistoryQuery {
        q: Some(q.into()),
        ..Default::default()
    };
    let matches = repos.history.query(search("śm")).await.unwrap();
    let names: Vec<&str> = matches.iter().map(|h| h.name.as_str()).collect();
    assert_eq!(names, vec!["Śmietana"]);

    let matches = repos.history.query(search("ŚMIE")).await.unwrap();
    assert_eq!(matches.len(), 1);
    let matches = repos.history.query(search("żubr")).await.unwrap();
    assert_eq!(matches[0].name, "ŻUBRÓWKA");
    let matches = repos.history.query(search("mi")).await.unwrap();
    assert_eq!(matches.len(), 1);
}

#[tokio::test]
async fn test_history_delete_returns_removed_entry() {
    let repos = setup_test_db().await;
    let (_, sections, _) = seed(&repos, "Weekly", 1, 0).await;
    repos.items.create(NewItem::new(sections[0], "Eggs")).await.unwrap();

    let entries = repos.history.query(HistoryQuery::default()).await.unwrap();
    let removed = repos.history.delete(entries[0].id).await.unwrap();
    assert_eq!(removed.name, "Eggs");
    assert_eq!(removed.section_id, sections[0]);
    assert_eq!(count(&repos.db, "item_history").await, 0);
}

#[tokio::test]
async fn test_max_order_tracks_scope() {
    let repos = setup_test_db().await;
    assert_eq!(repos.lists.max_order(Scope::AllLists).await.unwrap(), -1);

    let (list, _, _) = seed(&repos, "Weekly", 2, 0).await;
    repos.lists.create(NewList::new("Hardware")).await.unwrap();
    assert_eq!(repos.lists.max_order(Scope::AllLists).await.unwrap(), 1);
    assert_eq!(repos.sections.max_order(Scope::List(list)).await.unwrap(), 1);
}

#[tokio::test]
async fn test_name_limit_applies_to_trimmed_name() {
    let repos = setup_test_db().await;
    let (_, sections, _) = seed(&repos, "Weekly", 1, 0).await;

    let padded = format!("{} ", "a".repeat(200));
    let item = repos.items.create(NewItem::new(sections[0], padded)).await.unwrap();
    assert_eq!(item.name.chars().count(), 200);

    let updated = repos
        .items
        .update(
            item.id,
            ItemPatch {
                name: Some(format!(" {}  ", "b".repeat(200))),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.name, "b".repeat(200));

    let err = repos
        .items
        .create(NewItem::new(sections[0], "c".repeat(201)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::InvalidInput(_)));
}

#[tokio::test]
async fn test_snapshot_nests_sections_and_items() {
    let repos = setup_test_db().await;
    seed(&repos, "Weekly", 2, 2).await;

    let lists = repos.lists.snapshot().await.unwrap();
    assert_eq!(lists.len(), 1);
    let sections = lists[0].sections.as_ref().unwrap();
    assert_eq!(sections.len(), 2);
    assert_eq!(sections[1].items.as_ref().unwrap().len(), 2);
}
