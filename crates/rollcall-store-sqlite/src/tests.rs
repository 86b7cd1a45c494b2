//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, TimeZone, Utc};
use rollcall_core::{entry::NormalizedEntry, store::EntryStore};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn ts(seconds: i64) -> DateTime<Utc> {
  Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap()
}

fn person(cn: &str) -> NormalizedEntry {
  NormalizedEntry {
    dn:           format!("CN={cn},OU=Employees,DC=example,DC=com"),
    display_name: cn.into(),
    title:        "Engineer".into(),
    department:   "Engineering".into(),
    location:     Some("Berlin".into()),
    email:        Some(format!("{}@example.com", cn.to_lowercase())),
    employee_id:  None,
    hire_date:    chrono::NaiveDate::from_ymd_opt(2023, 4, 17),
  }
}

// ─── Upsert ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn apply_inserts_new_entries() {
  let s = store().await;

  s.apply_snapshot(&[person("Ada"), person("Bob")], ts(0))
    .await
    .unwrap();

  assert_eq!(s.count().await.unwrap(), 2);

  let ada = s
    .find_live("CN=Ada,OU=Employees,DC=example,DC=com")
    .await
    .unwrap()
    .expect("ada is live");
  assert_eq!(ada.display_name, "Ada");
  assert_eq!(ada.created_at, ts(0));
  assert_eq!(ada.updated_at, ts(0));
  assert!(!ada.departed);
  assert_eq!(ada.superseded_by, None);
  assert_eq!(ada.hire_date, chrono::NaiveDate::from_ymd_opt(2023, 4, 17));
}

#[tokio::test]
async fn apply_updates_live_row_preserving_identity() {
  let s = store().await;
  s.apply_snapshot(&[person("Ada")], ts(0)).await.unwrap();
  let before = s
    .find_live("CN=Ada,OU=Employees,DC=example,DC=com")
    .await
    .unwrap()
    .unwrap();

  let mut promoted = person("Ada");
  promoted.title = "Staff Engineer".into();
  s.apply_snapshot(&[promoted], ts(60)).await.unwrap();

  let after = s
    .find_live("CN=Ada,OU=Employees,DC=example,DC=com")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(after.entry_id, before.entry_id);
  assert_eq!(after.created_at, ts(0));
  assert_eq!(after.updated_at, ts(60));
  assert_eq!(after.title, "Staff Engineer");
  assert_eq!(s.count().await.unwrap(), 1);
}

#[tokio::test]
async fn find_live_missing_returns_none() {
  let s = store().await;
  let result = s.find_live("CN=Nobody,DC=example,DC=com").await.unwrap();
  assert!(result.is_none());
}

#[tokio::test]
async fn count_starts_at_zero() {
  let s = store().await;
  assert_eq!(s.count().await.unwrap(), 0);
}

// ─── Watermark scans ─────────────────────────────────────────────────────────

#[tokio::test]
async fn fresh_entries_are_the_inserted_rows() {
  let s = store().await;
  s.apply_snapshot(&[person("Ada"), person("Bob")], ts(0))
    .await
    .unwrap();

  let fresh = s.fresh_entries().await.unwrap();
  assert_eq!(fresh.len(), 2);

  // A later refresh advances updated_at past created_at.
  s.apply_snapshot(&[person("Ada"), person("Bob")], ts(60))
    .await
    .unwrap();
  assert!(s.fresh_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn stale_entries_are_the_untouched_rows() {
  let s = store().await;
  s.apply_snapshot(&[person("Ada"), person("Bob"), person("Eve")], ts(0))
    .await
    .unwrap();

  // Only Ada is present in the second run.
  s.apply_snapshot(&[person("Ada")], ts(60)).await.unwrap();

  let stale = s.stale_entries(ts(60)).await.unwrap();
  assert_eq!(stale.len(), 2);
  // Insertion order, for deterministic match resolution downstream.
  assert_eq!(stale[0].display_name, "Bob");
  assert_eq!(stale[1].display_name, "Eve");
}

#[tokio::test]
async fn stale_scan_is_strictly_before_the_watermark() {
  let s = store().await;
  s.apply_snapshot(&[person("Ada")], ts(0)).await.unwrap();

  // A row touched exactly at the watermark is not stale.
  assert!(s.stale_entries(ts(0)).await.unwrap().is_empty());
  assert_eq!(s.stale_entries(ts(1)).await.unwrap().len(), 1);
}

// ─── Tombstones ──────────────────────────────────────────────────────────────

#[tokio::test]
async fn departed_rows_leave_the_live_views() {
  let s = store().await;
  s.apply_snapshot(&[person("Ada"), person("Bob")], ts(0))
    .await
    .unwrap();
  let bob = s
    .find_live("CN=Bob,OU=Employees,DC=example,DC=com")
    .await
    .unwrap()
    .unwrap();

  s.mark_departed(&[bob.entry_id]).await.unwrap();

  assert!(
    s.find_live("CN=Bob,OU=Employees,DC=example,DC=com")
      .await
      .unwrap()
      .is_none()
  );
  assert!(s.stale_entries(ts(600)).await.unwrap().len() == 1);
  assert!(s.fresh_entries().await.unwrap().len() == 1);
  // The row itself is retained.
  assert_eq!(s.count().await.unwrap(), 2);
  let tombstone = s.entry_by_id(bob.entry_id).await.unwrap().unwrap();
  assert!(tombstone.departed);
}

#[tokio::test]
async fn tombstoned_dn_can_be_reused_by_a_new_identity() {
  let s = store().await;
  let dn = "CN=Bob,OU=Employees,DC=example,DC=com";

  s.apply_snapshot(&[person("Bob")], ts(0)).await.unwrap();
  let first = s.find_live(dn).await.unwrap().unwrap();
  s.mark_departed(&[first.entry_id]).await.unwrap();

  // Same dn shows up again: a fresh surrogate identity, not a resurrection.
  s.apply_snapshot(&[person("Bob")], ts(120)).await.unwrap();
  let second = s.find_live(dn).await.unwrap().unwrap();

  assert_ne!(second.entry_id, first.entry_id);
  assert_eq!(second.created_at, ts(120));
  assert_eq!(s.count().await.unwrap(), 2);

  // Departure is monotonic: the old row stays a tombstone.
  let old = s.entry_by_id(first.entry_id).await.unwrap().unwrap();
  assert!(old.departed);
}

// ─── Supersession links ──────────────────────────────────────────────────────

#[tokio::test]
async fn link_superseded_records_the_replacement() {
  let s = store().await;
  s.apply_snapshot(&[person("Jane Old")], ts(0)).await.unwrap();
  let old = s
    .find_live("CN=Jane Old,OU=Employees,DC=example,DC=com")
    .await
    .unwrap()
    .unwrap();
  s.mark_departed(&[old.entry_id]).await.unwrap();

  s.apply_snapshot(&[person("Jane New")], ts(60)).await.unwrap();
  let new = s
    .find_live("CN=Jane New,OU=Employees,DC=example,DC=com")
    .await
    .unwrap()
    .unwrap();

  s.link_superseded(old.entry_id, new.entry_id).await.unwrap();

  let tombstone = s.entry_by_id(old.entry_id).await.unwrap().unwrap();
  assert_eq!(tombstone.superseded_by, Some(new.entry_id));
}

#[tokio::test]
async fn link_superseded_rejects_self_links() {
  let s = store().await;
  let id = Uuid::new_v4();
  let err = s.link_superseded(id, id).await.unwrap_err();
  assert!(matches!(err, crate::Error::SelfSupersession));
}

#[tokio::test]
async fn link_superseded_unknown_entry_errors() {
  let s = store().await;
  let err = s
    .link_superseded(Uuid::new_v4(), Uuid::new_v4())
    .await
    .unwrap_err();
  assert!(matches!(err, crate::Error::EntryNotFound(_)));
}
