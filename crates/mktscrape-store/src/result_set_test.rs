use serde::{Deserialize, Serialize};

use super::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Row {
    id: String,
    created_utc: Option<i64>,
    body: String,
    search_term: String,
}

impl Record for Row {
    fn id(&self) -> &str {
        &self.id
    }
    fn search_term(&self) -> &str {
        &self.search_term
    }
    fn timestamp(&self) -> Option<i64> {
        self.created_utc
    }
}

fn row(id: &str, ts: i64, body: &str, term: &str) -> Row {
    Row {
        id: id.to_string(),
        created_utc: Some(ts),
        body: body.to_string(),
        search_term: term.to_string(),
    }
}

fn ids(set: &ResultSet<Row>) -> Vec<&str> {
    set.rows().iter().map(|r| r.id.as_str()).collect()
}

const NOW: i64 = 1_700_000_000;

#[test]
fn merge_into_empty_set_adds_everything() {
    let mut set = ResultSet::default();
    let outcome = set.merge(vec![row("a", 3, "x", "acme"), row("b", 2, "y", "acme")]);
    assert_eq!(
        outcome,
        MergeOutcome {
            fetched: 2,
            added: 2,
            replaced: 0
        }
    );
    assert_eq!(ids(&set), vec!["a", "b"]);
}

#[test]
fn duplicate_id_keeps_most_recent_batch_row() {
    let mut set = ResultSet::from_rows(vec![row("a", 3, "old", "acme"), row("b", 2, "y", "acme")]);
    let outcome = set.merge(vec![row("a", 3, "new", "acme"), row("c", 1, "z", "acme")]);

    assert_eq!(outcome.added, 1);
    assert_eq!(outcome.replaced, 1);
    assert_eq!(ids(&set), vec!["b", "a", "c"]);
    let a: Vec<&Row> = set.rows().iter().filter(|r| r.id == "a").collect();
    assert_eq!(a.len(), 1);
    assert_eq!(a[0].body, "new");
}

#[test]
fn duplicates_inside_one_batch_collapse_to_the_last() {
    let mut set = ResultSet::default();
    set.merge(vec![row("a", 1, "first", "acme"), row("a", 1, "second", "acme")]);
    assert_eq!(set.len(), 1);
    assert_eq!(set.rows()[0].body, "second");
}

#[test]
fn merging_the_same_batch_twice_is_idempotent() {
    let mut set = ResultSet::from_rows(vec![row("a", 5, "x", "acme"), row("b", 4, "y", "acme")]);
    let batch = vec![row("b", 4, "y2", "acme"), row("c", 3, "z", "acme")];

    set.merge(batch.clone());
    let once = set.clone();
    let second = set.merge(batch);

    assert_eq!(set, once);
    assert_eq!(second.added, 0);
    assert_eq!(second.replaced, 2);
}

#[test]
fn from_rows_collapses_stored_duplicates() {
    let set = ResultSet::from_rows(vec![
        row("a", 1, "x", "acme"),
        row("b", 1, "y", "acme"),
        row("a", 1, "z", "acme"),
    ]);
    assert_eq!(ids(&set), vec!["b", "a"]);
}

#[test]
fn bookmark_uses_min_backward_and_max_forward() {
    let set = ResultSet::from_rows(vec![
        row("1", 100, "", "beta"),
        row("2", 200, "", "beta"),
        row("3", 300, "", "beta"),
    ]);
    assert_eq!(
        set.compute_bookmark_at("beta", Direction::Backward, NOW),
        Bookmark::Timestamp(100)
    );
    assert_eq!(
        set.compute_bookmark_at("beta", Direction::Forward, NOW),
        Bookmark::Timestamp(300)
    );
}

#[test]
fn bookmark_for_unseen_variation_is_now() {
    let set = ResultSet::from_rows(vec![
        row("1", 100, "", "beta"),
        row("2", 200, "", "beta"),
        row("3", 300, "", "beta"),
    ]);
    assert_eq!(
        set.compute_bookmark_at("beta co", Direction::Backward, NOW),
        Bookmark::Timestamp(NOW)
    );
}

#[test]
fn bookmark_ignores_rows_without_timestamp() {
    let mut untimed = row("x", 0, "", "beta");
    untimed.created_utc = None;
    let set = ResultSet::from_rows(vec![untimed]);
    assert_eq!(
        set.compute_bookmark_at("beta", Direction::Backward, NOW),
        Bookmark::Timestamp(NOW)
    );
}

#[test]
fn wall_clock_bookmark_is_recent_for_empty_set() {
    let set: ResultSet<Row> = ResultSet::default();
    let before = chrono::Utc::now().timestamp();
    let Bookmark::Timestamp(ts) = set.compute_bookmark("acme", Direction::Backward) else {
        panic!("expected a timestamp bookmark");
    };
    assert!(ts >= before);
}

#[test]
fn backward_bookmark_never_increases_after_merge() {
    let batches = vec![
        vec![row("a", 500, "", "v1"), row("b", 450, "", "v2")],
        vec![row("c", 400, "", "v1"), row("a", 500, "edit", "v1")],
        vec![row("d", 900, "", "v2"), row("e", 50, "", "v1")],
        vec![],
    ];

    let mut set = ResultSet::default();
    for batch in batches {
        let previous: Vec<Bookmark> = ["v1", "v2", "v3"]
            .iter()
            .map(|v| set.compute_bookmark_at(v, Direction::Backward, NOW))
            .collect();
        set.merge(batch);
        for (v, prev) in ["v1", "v2", "v3"].iter().zip(previous) {
            let (Bookmark::Timestamp(after), Bookmark::Timestamp(before)) =
                (set.compute_bookmark_at(v, Direction::Backward, NOW), prev)
            else {
                panic!("expected timestamp bookmarks");
            };
            assert!(after <= before, "bookmark for {v} rose from {before} to {after}");
        }
    }
}

#[test]
fn refetch_under_another_variation_retags_the_row() {
    let mut set = ResultSet::from_rows(vec![
        row("a", 500, "", "acme-records"),
        row("c", 400, "", "acme-records"),
    ]);
    let before = set.compute_bookmark_at("acme-records", Direction::Backward, NOW);

    set.merge(vec![row("c", 400, "", "acme records")]);

    assert_eq!(before, Bookmark::Timestamp(400));
    assert_eq!(set.get("c").map(|r| r.search_term.as_str()), Some("acme records"));
    assert_eq!(
        set.compute_bookmark_at("acme-records", Direction::Backward, NOW),
        Bookmark::Timestamp(500)
    );
    assert_eq!(
        set.compute_bookmark_at("acme records", Direction::Backward, NOW),
        Bookmark::Timestamp(400)
    );
}

#[test]
fn get_finds_rows_by_id() {
    let set = ResultSet::from_rows(vec![row("a", 1, "x", "acme")]);
    assert_eq!(set.get("a").map(|r| r.body.as_str()), Some("x"));
    assert!(set.get("b").is_none());
}
