use super::*;

fn event(id: &str) -> EventId {
    EventId::new(id)
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("temp root");
    let db_path = temp_root.path().join("nested").join("rsvps.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn inserts_and_lists_a_response() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let stored = storage
        .insert_rsvp(&event("event-a"), "Asha", 1)
        .await
        .expect("insert");
    assert!(stored.rsvp_id.0 > 0);
    assert_eq!(stored.name, "Asha");
    assert_eq!(stored.guest_count, Some(1));

    let rows = storage
        .list_rsvps_for_event(&event("event-a"))
        .await
        .expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].rsvp_id, stored.rsvp_id);
    assert_eq!(rows[0].name, "Asha");
    assert_eq!(rows[0].guest_count, Some(1));
    assert_eq!(rows[0].event_id, event("event-a"));
}

#[tokio::test]
async fn lists_newest_first() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let first = storage
        .insert_rsvp(&event("event-a"), "First", 2)
        .await
        .expect("first")
        .rsvp_id;
    let second = storage
        .insert_rsvp(&event("event-a"), "Second", 1)
        .await
        .expect("second")
        .rsvp_id;
    let third = storage
        .insert_rsvp(&event("event-a"), "Third", 3)
        .await
        .expect("third")
        .rsvp_id;

    let rows = storage
        .list_rsvps_for_event(&event("event-a"))
        .await
        .expect("list");
    let ids: Vec<_> = rows.iter().map(|r| r.rsvp_id).collect();
    assert_eq!(ids, vec![third, second, first]);
}

#[tokio::test]
async fn store_assigned_timestamps_are_monotonic_non_decreasing() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .insert_rsvp(&event("event-a"), "Earlier", 1)
        .await
        .expect("insert");
    storage
        .insert_rsvp(&event("event-a"), "Later", 1)
        .await
        .expect("insert");

    let rows = storage
        .list_rsvps_for_event(&event("event-a"))
        .await
        .expect("list");
    assert_eq!(rows.len(), 2);
    // Descending list order, so the later insert comes first.
    assert!(rows[0].submitted_at >= rows[1].submitted_at);
}

#[tokio::test]
async fn listing_is_scoped_to_the_requested_event() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage
        .insert_rsvp(&event("event-a"), "Ours", 2)
        .await
        .expect("insert a");
    storage
        .insert_rsvp(&event("event-b"), "Theirs", 5)
        .await
        .expect("insert b");

    let rows = storage
        .list_rsvps_for_event(&event("event-a"))
        .await
        .expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].name, "Ours");
    assert!(rows.iter().all(|r| r.event_id == event("event-a")));
}

#[tokio::test]
async fn repeated_listing_returns_the_same_rows_in_the_same_order() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    for name in ["One", "Two", "Three"] {
        storage
            .insert_rsvp(&event("event-a"), name, 1)
            .await
            .expect("insert");
    }

    let first = storage
        .list_rsvps_for_event(&event("event-a"))
        .await
        .expect("first list");
    let second = storage
        .list_rsvps_for_event(&event("event-a"))
        .await
        .expect("second list");

    let first_ids: Vec<_> = first.iter().map(|r| r.rsvp_id).collect();
    let second_ids: Vec<_> = second.iter().map(|r| r.rsvp_id).collect();
    assert_eq!(first_ids, second_ids);
}

#[tokio::test]
async fn tolerates_legacy_rows_without_guest_counts() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    sqlx::query(
        "INSERT INTO rsvps (event_id, name, guest_count, submitted_at)
         VALUES (?, ?, NULL, STRFTIME('%Y-%m-%d %H:%M:%f', 'now'))",
    )
    .bind("event-a")
    .bind("Legacy")
    .execute(storage.pool())
    .await
    .expect("raw insert");

    let rows = storage
        .list_rsvps_for_event(&event("event-a"))
        .await
        .expect("list");
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].guest_count, None);
}
