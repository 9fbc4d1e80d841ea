//! The list page: typing, settling, location echo and navigation.

mod common;

use std::rc::Rc;
use std::time::Duration;

use uac_query::{ListQueryCodec, MemoryLocation, RawQuery};
use uac_reactive::{DEFAULT_DEBOUNCE, ManualScheduler};
use uac_users::{ListOutcome, MemoryBackend, UserStore, UsersListController};

type Controller = UsersListController<MemoryLocation, MemoryBackend>;

fn mount(query: &str) -> (ManualScheduler, MemoryLocation, Controller) {
    let scheduler = ManualScheduler::new();
    let location = MemoryLocation::from_query_string(query);
    let store = Rc::new(UserStore::new(MemoryBackend::with_users(common::directory())));
    let controller = UsersListController::new(
        store,
        location.clone(),
        ListQueryCodec::default(),
        DEFAULT_DEBOUNCE,
        Rc::new(scheduler.clone()),
    );
    (scheduler, location, controller)
}

fn type_slowly(scheduler: &ManualScheduler, controller: &Controller, text: &str) {
    for end in 1..=text.len() {
        controller.set_search(&text[..end]);
        scheduler.advance(Duration::from_millis(100));
    }
}

#[tokio::test]
async fn mount_restores_state_from_location() {
    let (_scheduler, location, controller) = mount("page=2&limit=2&search=example");

    let query = controller.query();
    assert_eq!((query.page, query.limit, query.search.as_str()), (2, 2, "example"));
    assert_eq!(controller.search_input().get(), "example");
    assert!(controller.needs_refresh());

    assert_eq!(controller.refresh().await, ListOutcome::Loaded);
    let list = controller.store().list();
    assert_eq!(list.total, 5);
    assert_eq!(list.items.len(), 2);
    assert!(!controller.needs_refresh());
    assert_eq!(location.replace_count(), 0);
}

#[tokio::test]
async fn typing_settles_once_and_updates_location() {
    let (scheduler, location, controller) = mount("page=3");
    controller.refresh().await;

    type_slowly(&scheduler, &controller, "ann");
    assert!(controller.is_search_pending());
    assert_eq!(controller.query().search, "");
    assert_eq!(location.replace_count(), 0);

    scheduler.advance(DEFAULT_DEBOUNCE);
    assert!(!controller.is_search_pending());
    assert_eq!(controller.settled_search().get(), "ann");
    assert_eq!(controller.query().page, 1);
    assert_eq!(location.query_string(), "search=ann");
    assert_eq!(location.replace_count(), 1);
    assert!(controller.needs_refresh());

    // The location watcher fires for our own replace.
    assert!(!controller.on_navigate());
    assert_eq!(location.replace_count(), 1);

    assert_eq!(controller.refresh().await, ListOutcome::Loaded);
    let names: Vec<_> = controller
        .store()
        .list()
        .items
        .into_iter()
        .map(|user| user.full_name)
        .collect();
    assert_eq!(names, ["Ann Lee", "Joanna Hall"]);
}

#[tokio::test]
async fn whitespace_only_change_does_not_reset_page() {
    let (scheduler, location, controller) = mount("page=2&search=ann");
    controller.set_search("ann  ");
    scheduler.advance(DEFAULT_DEBOUNCE);

    assert_eq!(controller.query().page, 2);
    assert_eq!(location.replace_count(), 0);
}

#[tokio::test]
async fn external_navigation_feeds_store_and_search_box() {
    let (scheduler, location, controller) = mount("");
    controller.refresh().await;

    location.navigate(RawQuery::from_query_string("search=bob&page=1"));
    assert!(controller.on_navigate());
    assert_eq!(controller.query().search, "bob");
    assert_eq!(controller.search_input().get(), "bob");
    assert!(controller.needs_refresh());

    // The search box catching up must not write back to the location.
    scheduler.advance(DEFAULT_DEBOUNCE);
    assert_eq!(location.replace_count(), 0);

    assert_eq!(controller.refresh().await, ListOutcome::Loaded);
    assert_eq!(controller.store().list().items[0].full_name, "Bob Stone");
}

#[tokio::test]
async fn navigation_to_same_state_needs_no_refetch() {
    let (_scheduler, location, controller) = mount("search=ann");
    controller.refresh().await;

    location.navigate(RawQuery::from_query_string("search=ann&page=1"));
    assert!(!controller.on_navigate());
    assert!(!controller.needs_refresh());
}

#[tokio::test]
async fn set_page_keeps_search() {
    let (_scheduler, location, controller) = mount("search=example&limit=2");
    controller.set_page(3);

    assert_eq!(location.query_string(), "limit=2&page=3&search=example");
    assert_eq!(controller.refresh().await, ListOutcome::Loaded);
    assert_eq!(controller.store().list().items[0].full_name, "Dee Park");
}

#[tokio::test]
async fn dispose_drops_pending_input() {
    let (scheduler, location, mut controller) = mount("");
    controller.set_search("ann");
    controller.dispose();
    scheduler.run_until_idle();

    assert_eq!(controller.query().search, "");
    assert_eq!(location.replace_count(), 0);
}
