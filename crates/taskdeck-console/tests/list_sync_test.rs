/*
[INPUT]:  FakeService with hand-resolved ListTasks calls
[OUTPUT]: Verification of paging, race discard, and cache retention
[POS]:    Integration test layer - task list synchronization
[UPDATE]: When list fetch triggers or apply rules change
*/

mod common;

use common::{
    FakeService, is_list_fetched, mounted_console, pump_until, task, tasks, unavailable,
};
use taskdeck_adapter::TaskStatus;
use taskdeck_console::notify::NotificationLevel;
use taskdeck_console::{StatusFilter, TypeFilter};

#[tokio::test]
async fn test_mount_fetches_first_page_without_status_constraint() {
    let service = FakeService::new();
    let (console, _events) = mounted_console(service.clone());
    service.wait_for_list_calls(1).await;

    let requests = service.list_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].limit, 10);
    assert_eq!(requests[0].offset, 0);
    assert_eq!(requests[0].status, 5);
    assert_eq!(requests[0].task_type, None);
    assert!(console.list().is_loading());
}

#[tokio::test]
async fn test_only_the_latest_filter_response_is_applied() {
    let service = FakeService::new();
    let (mut console, mut events) = mounted_console(service.clone());
    service.wait_for_list_calls(1).await;

    console.set_status_filter(StatusFilter::Only(TaskStatus::Failed));
    console.set_status_filter(StatusFilter::Only(TaskStatus::Running));
    service.wait_for_list_calls(3).await;

    let statuses: Vec<i32> = service.list_requests().iter().map(|r| r.status).collect();
    assert_eq!(statuses, vec![5, 2, 1]);

    service.resolve_list(|r| r.status == 1, Ok(tasks(1..=2, TaskStatus::Running)));
    pump_until(&mut console, &mut events, is_list_fetched).await;
    assert_eq!(console.tasks().len(), 2);
    assert!(!console.list().is_loading());

    service.resolve_list(|r| r.status == 2, Ok(tasks(10..=12, TaskStatus::Failed)));
    pump_until(&mut console, &mut events, is_list_fetched).await;
    service.resolve_list(|r| r.status == 5, Ok(tasks(20..=29, TaskStatus::Queued)));
    pump_until(&mut console, &mut events, is_list_fetched).await;

    assert!(
        console
            .tasks()
            .iter()
            .all(|task| task.task_status() == TaskStatus::Running)
    );
    assert_eq!(console.tasks().len(), 2);
    assert!(!console.view().page().has_more);
}

#[tokio::test]
async fn test_full_page_enables_next_page() {
    let service = FakeService::new();
    let (mut console, mut events) = mounted_console(service.clone());
    service.wait_for_list_calls(1).await;

    service.resolve_list(|_| true, Ok(tasks(1..=10, TaskStatus::Queued)));
    pump_until(&mut console, &mut events, is_list_fetched).await;
    assert!(console.view().page().has_more);

    console.next_page();
    service.wait_for_list_calls(2).await;

    assert_eq!(console.view().page().page, 2);
    let requests = service.list_requests();
    assert_eq!(requests[1].offset, 10);
    assert_eq!(requests[1].limit, 10);
}

#[tokio::test]
async fn test_short_page_blocks_next_page() {
    let service = FakeService::new();
    let (mut console, mut events) = mounted_console(service.clone());
    service.wait_for_list_calls(1).await;

    service.resolve_list(|_| true, Ok(tasks(1..=3, TaskStatus::Queued)));
    pump_until(&mut console, &mut events, is_list_fetched).await;
    assert!(!console.view().page().has_more);

    console.next_page();
    tokio::task::yield_now().await;

    assert_eq!(console.view().page().page, 1);
    assert_eq!(service.list_requests().len(), 1);
}

#[tokio::test]
async fn test_previous_page_on_first_page_issues_nothing() {
    let service = FakeService::new();
    let (mut console, _events) = mounted_console(service.clone());
    service.wait_for_list_calls(1).await;

    console.previous_page();
    tokio::task::yield_now().await;

    assert_eq!(console.view().page().page, 1);
    assert_eq!(service.list_requests().len(), 1);
}

#[tokio::test]
async fn test_filter_change_returns_to_first_page() {
    let service = FakeService::new();
    let (mut console, mut events) = mounted_console(service.clone());
    service.wait_for_list_calls(1).await;
    service.resolve_list(|_| true, Ok(tasks(1..=10, TaskStatus::Queued)));
    pump_until(&mut console, &mut events, is_list_fetched).await;

    console.next_page();
    assert_eq!(console.view().page().page, 2);

    console.set_type_filter(TypeFilter::from("send_email"));
    service.wait_for_list_calls(3).await;

    assert_eq!(console.view().page().page, 1);
    let last = service.list_requests().pop().expect("request");
    assert_eq!(last.offset, 0);
    assert_eq!(last.task_type.as_deref(), Some("send_email"));
}

#[tokio::test]
async fn test_repeated_fetch_of_same_page_is_idempotent() {
    let service = FakeService::new();
    let (mut console, mut events) = mounted_console(service.clone());
    service.wait_for_list_calls(1).await;

    let page = vec![task(1, TaskStatus::Running), task(2, TaskStatus::Failed)];
    service.resolve_list(|_| true, Ok(page.clone()));
    pump_until(&mut console, &mut events, is_list_fetched).await;
    let before = console.tasks().to_vec();

    console.refresh();
    service.wait_for_list_calls(2).await;
    service.resolve_list(|_| true, Ok(page));
    pump_until(&mut console, &mut events, is_list_fetched).await;

    assert_eq!(console.tasks(), before.as_slice());
    assert_eq!(console.view().page().page, 1);
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_page() {
    let service = FakeService::new();
    let (mut console, mut events) = mounted_console(service.clone());
    service.wait_for_list_calls(1).await;
    service.resolve_list(|_| true, Ok(tasks(1..=3, TaskStatus::Succeeded)));
    pump_until(&mut console, &mut events, is_list_fetched).await;

    console.refresh();
    service.wait_for_list_calls(2).await;
    service.resolve_list(|_| true, Err(unavailable("list backend down")));
    pump_until(&mut console, &mut events, is_list_fetched).await;

    assert_eq!(console.tasks().len(), 3);
    assert!(!console.list().is_loading());
    let latest = console.notifications().latest().expect("notification");
    assert_eq!(latest.level, NotificationLevel::Error);
    assert!(latest.message.contains("list backend down"));
}

#[tokio::test]
async fn test_unmount_discards_cache_and_late_results() {
    let service = FakeService::new();
    let (mut console, mut events) = mounted_console(service.clone());
    service.wait_for_list_calls(1).await;
    service.resolve_list(|_| true, Ok(tasks(1..=2, TaskStatus::Queued)));
    pump_until(&mut console, &mut events, is_list_fetched).await;

    console.refresh();
    service.wait_for_list_calls(2).await;
    console.unmount();

    assert!(!console.is_mounted());
    assert!(console.tasks().is_empty());

    console.set_status_filter(StatusFilter::Only(TaskStatus::Failed));
    tokio::task::yield_now().await;
    assert_eq!(service.list_requests().len(), 2);
}
