use std::sync::Arc;

use dioxus::prelude::WritableExt;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use recall_core::Clock;
use recall_core::model::{OwnerId, SetId, StudySet};
use recall_core::time::fixed_now;
use storage::repository::{
    InMemoryRepository, NewSetRecord, SetRepository, Storage, StorageError,
};

use super::test_harness::{
    DashboardHarness, setup_dashboard_harness, setup_dashboard_harness_with_clock,
    setup_dashboard_harness_with_storage,
};
use crate::notify::{NotificationSink, NoticeKind};

fn record(name: &str, last_used: DateTime<Utc>) -> NewSetRecord {
    NewSetRecord {
        owner: OwnerId::new("tester"),
        name: name.to_owned(),
        context: None,
        created_at: fixed_now(),
        last_used_at: last_used,
    }
}

fn skeleton_count(html: &str) -> usize {
    html.matches("class=\"set-skeleton\"").count()
}

async fn settle(harness: &mut DashboardHarness) {
    harness.drive_async().await;
    harness.drive_async().await;
    harness.drive_async().await;
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_shows_seven_skeletons_until_fetch_lands() {
    let storage = Storage::in_memory();
    storage
        .sets
        .insert_new_set(record("Biology", fixed_now()))
        .await
        .expect("seed set");

    let mut harness = setup_dashboard_harness_with_storage(storage).await;
    harness.rebuild();

    let html = harness.render();
    assert_eq!(skeleton_count(&html), 7, "expected skeletons in {html}");
    assert!(!html.contains("Biology"), "list rendered too early: {html}");

    settle(&mut harness).await;
    let html = harness.render();
    assert_eq!(skeleton_count(&html), 0, "skeletons lingered in {html}");
    assert!(html.contains("Biology"), "missing set in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_orders_by_recency_then_insertion() {
    let storage = Storage::in_memory();
    storage
        .sets
        .insert_new_set(record("Chemistry", fixed_now()))
        .await
        .expect("seed set");
    storage
        .sets
        .insert_new_set(record("Biology", fixed_now()))
        .await
        .expect("seed set");
    storage
        .sets
        .insert_new_set(record("Physics", fixed_now() + Duration::hours(1)))
        .await
        .expect("seed set");

    let mut harness = setup_dashboard_harness_with_storage(storage).await;
    harness.rebuild();
    settle(&mut harness).await;

    let html = harness.render();
    let physics = html.find("Physics").expect("physics rendered");
    let chemistry = html.find("Chemistry").expect("chemistry rendered");
    let biology = html.find("Biology").expect("biology rendered");
    assert!(physics < chemistry, "recency order wrong in {html}");
    assert!(chemistry < biology, "insertion tie-break wrong in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_renders_header_and_create_action_when_empty() {
    let mut harness = setup_dashboard_harness().await;
    harness.rebuild();
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("Your Sets"), "missing header in {html}");
    assert!(html.contains("Create Set"), "missing create action in {html}");
    assert!(!html.contains("set-card"), "unexpected card in {html}");
    assert_eq!(skeleton_count(&html), 0, "skeletons lingered in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_fetch_failure_clears_list_and_notifies_once() {
    let repo = Arc::new(FlakyRepo::default());
    repo.inner
        .insert_new_set(record("Biology", fixed_now()))
        .await
        .expect("seed set");
    let storage = Storage {
        sets: Arc::clone(&repo) as Arc<dyn SetRepository>,
    };

    let mut harness = setup_dashboard_harness_with_storage(storage).await;
    harness.rebuild();
    settle(&mut harness).await;
    assert!(harness.render().contains("Biology"));
    assert!(harness.sink.take_all().is_empty());

    repo.fail_lists.store(true, Ordering::SeqCst);
    harness.handles.fetch().call(());
    settle(&mut harness).await;

    let html = harness.render();
    assert!(!html.contains("Biology"), "stale list retained in {html}");
    assert_eq!(skeleton_count(&html), 0, "loading flag stuck in {html}");
    assert!(!(harness.handles.state().is_loading)());
    let notices = harness.sink.take_all();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].message, "Failed to fetch sets. Please try again.");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_delete_success_notifies_and_refetches() {
    let repo = Arc::new(FlakyRepo::default());
    repo.inner
        .insert_new_set(record("Biology", fixed_now()))
        .await
        .expect("seed set");
    let chem_id = repo
        .inner
        .insert_new_set(record("Chemistry", fixed_now()))
        .await
        .expect("seed set");
    let storage = Storage {
        sets: Arc::clone(&repo) as Arc<dyn SetRepository>,
    };

    let mut harness = setup_dashboard_harness_with_storage(storage).await;
    harness.rebuild();
    settle(&mut harness).await;
    assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1);

    harness.handles.remove().call(chem_id);
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("Biology"), "survivor missing in {html}");
    assert!(!html.contains("Chemistry"), "deleted set rendered in {html}");
    assert_eq!(repo.list_calls.load(Ordering::SeqCst), 2, "expected refetch");

    let notices = harness.sink.take_all();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Success);
    assert_eq!(notices[0].message, "Set deleted successfully");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_delete_failure_keeps_list_and_notifies() {
    let repo = Arc::new(FlakyRepo::default());
    let bio_id = repo
        .inner
        .insert_new_set(record("Biology", fixed_now()))
        .await
        .expect("seed set");
    repo.fail_deletes.store(true, Ordering::SeqCst);
    let storage = Storage {
        sets: Arc::clone(&repo) as Arc<dyn SetRepository>,
    };

    let mut harness = setup_dashboard_harness_with_storage(storage).await;
    harness.rebuild();
    settle(&mut harness).await;

    harness.handles.remove().call(bio_id);
    settle(&mut harness).await;

    let html = harness.render();
    assert!(html.contains("Biology"), "list mutated on failure in {html}");
    assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1, "unexpected refetch");

    let notices = harness.sink.take_all();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].message, "Failed to delete set. Please try again.");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_touch_defers_reorder_until_next_fetch() {
    let storage = Storage::in_memory();
    storage
        .sets
        .insert_new_set(record("Chemistry", fixed_now() + Duration::hours(1)))
        .await
        .expect("seed set");
    let bio_id = storage
        .sets
        .insert_new_set(record("Biology", fixed_now()))
        .await
        .expect("seed set");

    // Service clock ahead of both rows, so a touch wins the ordering.
    let clock = Clock::fixed(fixed_now() + Duration::hours(2));
    let mut harness = setup_dashboard_harness_with_clock(storage, clock).await;
    harness.rebuild();
    settle(&mut harness).await;

    harness.handles.touch().call(bio_id);
    settle(&mut harness).await;

    let html = harness.render();
    let chemistry = html.find("Chemistry").expect("chemistry rendered");
    let biology = html.find("Biology").expect("biology rendered");
    assert!(chemistry < biology, "touch reordered without a fetch: {html}");

    harness.handles.fetch().call(());
    settle(&mut harness).await;

    let html = harness.render();
    let chemistry = html.find("Chemistry").expect("chemistry rendered");
    let biology = html.find("Biology").expect("biology rendered");
    assert!(biology < chemistry, "touch not reflected after fetch: {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_touch_failure_is_silent() {
    let repo = Arc::new(FlakyRepo::default());
    let bio_id = repo
        .inner
        .insert_new_set(record("Biology", fixed_now()))
        .await
        .expect("seed set");
    repo.fail_touches.store(true, Ordering::SeqCst);
    let storage = Storage {
        sets: Arc::clone(&repo) as Arc<dyn SetRepository>,
    };

    let mut harness = setup_dashboard_harness_with_storage(storage).await;
    harness.rebuild();
    settle(&mut harness).await;

    harness.handles.touch().call(bio_id);
    settle(&mut harness).await;

    assert!(harness.render().contains("Biology"));
    assert!(harness.sink.take_all().is_empty(), "touch failure surfaced");
    assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1, "unexpected refetch");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_repeated_fetches_render_single_copy() {
    let storage = Storage::in_memory();
    storage
        .sets
        .insert_new_set(record("Biology", fixed_now()))
        .await
        .expect("seed set");

    let mut harness = setup_dashboard_harness_with_storage(storage).await;
    harness.rebuild();
    settle(&mut harness).await;

    harness.handles.fetch().call(());
    harness.handles.fetch().call(());
    settle(&mut harness).await;

    let html = harness.render();
    assert_eq!(html.matches("Biology").count(), 1, "duplicated set in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_created_set_appears_after_refresh() {
    let mut harness = setup_dashboard_harness().await;
    harness.rebuild();
    settle(&mut harness).await;
    assert!(!harness.render().contains("Geology"));

    harness
        .service
        .create_set(
            harness.owner.clone(),
            "Geology".to_owned(),
            Some("Plate tectonics basics".to_owned()),
        )
        .await
        .expect("create set");

    harness.handles.fetch().call(());
    settle(&mut harness).await;

    assert!(harness.render().contains("Geology"));
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_create_submit_closes_dialog_and_refetches_once() {
    let repo = Arc::new(FlakyRepo::default());
    let storage = Storage {
        sets: Arc::clone(&repo) as Arc<dyn SetRepository>,
    };

    let mut harness = setup_dashboard_harness_with_storage(storage).await;
    harness.rebuild();
    settle(&mut harness).await;
    assert_eq!(repo.list_calls.load(Ordering::SeqCst), 1);

    let mut show_create = harness.handles.state().show_create;
    show_create.set(true);
    harness.drive_async().await;
    assert!(harness.render().contains("Create a new set"));

    harness.form_handles.name().set("Biology".to_string());
    harness
        .form_handles
        .context()
        .set("cell structure".to_string());
    harness.form_handles.submit().call(());
    settle(&mut harness).await;

    let html = harness.render();
    assert!(
        !(harness.handles.state().show_create)(),
        "dialog left open after a successful save"
    );
    assert!(!html.contains("Create a new set"), "dialog rendered in {html}");
    assert!(html.contains("Biology"), "created set missing in {html}");
    assert_eq!(
        repo.list_calls.load(Ordering::SeqCst),
        2,
        "expected exactly one refetch after the save landed"
    );
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_smoke_create_failure_keeps_dialog_without_refetch() {
    let repo = Arc::new(FlakyRepo::default());
    repo.fail_inserts.store(true, Ordering::SeqCst);
    let storage = Storage {
        sets: Arc::clone(&repo) as Arc<dyn SetRepository>,
    };

    let mut harness = setup_dashboard_harness_with_storage(storage).await;
    harness.rebuild();
    settle(&mut harness).await;

    let mut show_create = harness.handles.state().show_create;
    show_create.set(true);
    harness.drive_async().await;

    harness.form_handles.name().set("Biology".to_string());
    harness.form_handles.submit().call(());
    settle(&mut harness).await;

    let html = harness.render();
    assert!(
        (harness.handles.state().show_create)(),
        "dialog closed even though the save failed"
    );
    assert!(
        html.contains("Something went wrong. Please try again."),
        "missing inline error in {html}"
    );
    assert_eq!(
        repo.list_calls.load(Ordering::SeqCst),
        1,
        "failed save must not refetch"
    );
    assert!(harness.sink.take_all().is_empty(), "failed save raised a toast");
}

/// In-memory repository with switchable failures and a list-call counter, for
/// exercising the dashboard's error paths and refetch discipline.
#[derive(Default)]
struct FlakyRepo {
    inner: InMemoryRepository,
    fail_lists: AtomicBool,
    fail_inserts: AtomicBool,
    fail_deletes: AtomicBool,
    fail_touches: AtomicBool,
    list_calls: AtomicU32,
}

#[async_trait]
impl SetRepository for FlakyRepo {
    async fn insert_new_set(&self, set: NewSetRecord) -> Result<SetId, StorageError> {
        if self.fail_inserts.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("insert failed".to_string()));
        }
        self.inner.insert_new_set(set).await
    }

    async fn list_sets(&self, owner: &OwnerId, limit: u32) -> Result<Vec<StudySet>, StorageError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_lists.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("list failed".to_string()));
        }
        self.inner.list_sets(owner, limit).await
    }

    async fn get_set(&self, id: SetId) -> Result<Option<StudySet>, StorageError> {
        self.inner.get_set(id).await
    }

    async fn update_set(&self, set: &StudySet) -> Result<(), StorageError> {
        self.inner.update_set(set).await
    }

    async fn touch_set(&self, id: SetId, at: DateTime<Utc>) -> Result<(), StorageError> {
        if self.fail_touches.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("touch failed".to_string()));
        }
        self.inner.touch_set(id, at).await
    }

    async fn delete_set(&self, id: SetId) -> Result<(), StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Connection("delete failed".to_string()));
        }
        self.inner.delete_set(id).await
    }
}
