//! Event service unit tests against the in-memory store.

use std::sync::Arc;

use domain::{
    DomainError, FamilyGroup, GroupId, GroupMember, InviteCode, UserId, MEMBER_SNAPSHOT_CAP,
};
use uuid::Uuid;

use crate::clock::SystemClock;
use crate::error::ApplicationError;
use crate::memory::InMemoryStore;
use crate::repository::FamilyGroupRepository;
use crate::services::{CreateEventRequest, EditEventRequest, EventService, EventServiceDependencies};

fn test_group(code: &str, member_count: usize) -> FamilyGroup {
    FamilyGroup {
        id: GroupId(Uuid::new_v4()),
        unique_code: InviteCode::parse(code).unwrap(),
        name: "The Tests".to_owned(),
        members: (0..member_count)
            .map(|i| GroupMember {
                user_id: UserId(Uuid::new_v4()),
                full_name: format!("Member {i}"),
            })
            .collect(),
        events: Vec::new(),
    }
}

async fn service_with_group(group: FamilyGroup) -> (EventService, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    store.insert_group(group).await;
    let service = EventService::new(EventServiceDependencies {
        group_repository: store.clone(),
        event_repository: store.clone(),
        clock: Arc::new(SystemClock),
    });
    (service, store)
}

fn create_request(code: &str, user_id: UserId) -> CreateEventRequest {
    CreateEventRequest {
        unique_code: code.to_owned(),
        user_id: Uuid::from(user_id),
        title: "Reunion".to_owned(),
        description: "Annual get-together".to_owned(),
        date: "2026-09-01T18:00:00Z".to_owned(),
    }
}

#[tokio::test]
async fn create_snapshots_members_into_interested_list() {
    let group = test_group("FAM-1", 2);
    let members: Vec<UserId> = group.members.iter().map(|m| m.user_id).collect();
    let (service, _) = service_with_group(group).await;

    let event = service
        .create(create_request("FAM-1", members[0]))
        .await
        .unwrap();

    assert_eq!(event.interested.len(), 2);
    for (entry, member) in event.interested.iter().zip(&members) {
        assert_eq!(entry.user_id, Uuid::from(*member));
        assert!(!entry.is_interested);
    }
}

#[tokio::test]
async fn create_appends_summary_to_group() {
    let group = test_group("FAM-1", 2);
    let group_id = group.id;
    let creator = group.members[0].user_id;
    let (service, store) = service_with_group(group).await;

    let event = service
        .create(create_request("FAM-1", creator))
        .await
        .unwrap();

    let stored = store.find_by_id(group_id).await.unwrap().unwrap();
    assert_eq!(stored.events.len(), 1);
    assert_eq!(Uuid::from(stored.events[0].event_id), event.id);
    assert_eq!(stored.events[0].title, "Reunion");
}

#[tokio::test]
async fn create_rejects_group_over_member_cap_without_persisting() {
    let group = test_group("FAM-BIG", MEMBER_SNAPSHOT_CAP + 1);
    let group_id = group.id;
    let creator = group.members[0].user_id;
    let (service, store) = service_with_group(group).await;

    let result = service.create(create_request("FAM-BIG", creator)).await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::GroupTooLarge { .. }))
    ));

    assert!(service.list_all().await.unwrap().is_empty());
    let stored = store.find_by_id(group_id).await.unwrap().unwrap();
    assert!(stored.events.is_empty());
}

#[tokio::test]
async fn create_allows_group_at_exactly_the_cap() {
    let group = test_group("FAM-CAP", MEMBER_SNAPSHOT_CAP);
    let creator = group.members[0].user_id;
    let (service, _) = service_with_group(group).await;

    let event = service
        .create(create_request("FAM-CAP", creator))
        .await
        .unwrap();
    assert_eq!(event.interested.len(), MEMBER_SNAPSHOT_CAP);
}

#[tokio::test]
async fn create_validates_fields_before_touching_the_store() {
    let group = test_group("FAM-1", 1);
    let creator = group.members[0].user_id;
    let (service, _) = service_with_group(group).await;

    // Unknown invite code plus an empty title: validation must win.
    let mut request = create_request("NO-SUCH-CODE", creator);
    request.title = "  ".to_owned();
    let result = service.create(request).await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Validation { ref field, .. })) if field == "title"
    ));

    let mut request = create_request("FAM-1", creator);
    request.date = "not a date".to_owned();
    let result = service.create(request).await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Validation { ref field, .. })) if field == "date"
    ));
}

#[tokio::test]
async fn create_requires_known_code_and_membership() {
    let group = test_group("FAM-1", 1);
    let creator = group.members[0].user_id;
    let (service, _) = service_with_group(group).await;

    let result = service.create(create_request("FAM-2", creator)).await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::GroupNotFound))
    ));

    let stranger = UserId(Uuid::new_v4());
    let result = service.create(create_request("FAM-1", stranger)).await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::NotGroupMember))
    ));
}

#[tokio::test]
async fn edit_is_gated_on_ownership_not_membership() {
    let group = test_group("FAM-1", 2);
    let creator = group.members[0].user_id;
    let other_member = group.members[1].user_id;
    let (service, _) = service_with_group(group).await;

    let event = service
        .create(create_request("FAM-1", creator))
        .await
        .unwrap();

    let result = service
        .edit(EditEventRequest {
            event_id: event.id,
            user_id: Uuid::from(other_member),
            title: Some("New".to_owned()),
            description: None,
            date: None,
        })
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::NotEventOwner))
    ));

    let updated = service
        .edit(EditEventRequest {
            event_id: event.id,
            user_id: Uuid::from(creator),
            title: Some("New".to_owned()),
            description: None,
            date: None,
        })
        .await
        .unwrap();
    assert_eq!(updated.title, "New");
    assert_eq!(updated.description, event.description);
    assert_eq!(updated.date, event.date);
}

#[tokio::test]
async fn edit_keeps_provided_empty_fields_unchanged() {
    let group = test_group("FAM-1", 1);
    let creator = group.members[0].user_id;
    let (service, _) = service_with_group(group).await;

    let event = service
        .create(create_request("FAM-1", creator))
        .await
        .unwrap();

    let updated = service
        .edit(EditEventRequest {
            event_id: event.id,
            user_id: Uuid::from(creator),
            title: Some("".to_owned()),
            description: Some("   ".to_owned()),
            date: Some("".to_owned()),
        })
        .await
        .unwrap();
    assert_eq!(updated.title, event.title);
    assert_eq!(updated.description, event.description);
    assert_eq!(updated.date, event.date);
}

#[tokio::test]
async fn edit_rejects_a_non_empty_unparseable_date() {
    let group = test_group("FAM-1", 1);
    let creator = group.members[0].user_id;
    let (service, _) = service_with_group(group).await;

    let event = service
        .create(create_request("FAM-1", creator))
        .await
        .unwrap();

    let result = service
        .edit(EditEventRequest {
            event_id: event.id,
            user_id: Uuid::from(creator),
            title: None,
            description: None,
            date: Some("next tuesday".to_owned()),
        })
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::Validation { ref field, .. })) if field == "date"
    ));
}

#[tokio::test]
async fn delete_removes_summary_and_record_and_is_not_repeatable() {
    let group = test_group("FAM-1", 1);
    let group_id = group.id;
    let creator = group.members[0].user_id;
    let (service, store) = service_with_group(group).await;

    let event = service
        .create(create_request("FAM-1", creator))
        .await
        .unwrap();

    service
        .delete(event.id, Uuid::from(creator))
        .await
        .unwrap();

    let stored = store.find_by_id(group_id).await.unwrap().unwrap();
    assert!(stored.events.is_empty());

    let page = service
        .list_for_group(Uuid::from(group_id), Uuid::from(creator), 1, 10)
        .await
        .unwrap();
    assert!(page.events.is_empty());

    // Idempotent failure, not a crash.
    let result = service.delete(event.id, Uuid::from(creator)).await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::EventNotFound))
    ));
}

#[tokio::test]
async fn delete_requires_ownership() {
    let group = test_group("FAM-1", 2);
    let creator = group.members[0].user_id;
    let other_member = group.members[1].user_id;
    let (service, _) = service_with_group(group).await;

    let event = service
        .create(create_request("FAM-1", creator))
        .await
        .unwrap();

    let result = service.delete(event.id, Uuid::from(other_member)).await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::NotEventOwner))
    ));
}

#[tokio::test]
async fn list_for_group_paginates_in_natural_order() {
    let group = test_group("FAM-1", 1);
    let group_id = group.id;
    let creator = group.members[0].user_id;
    let (service, _) = service_with_group(group).await;

    for i in 0..5 {
        let mut request = create_request("FAM-1", creator);
        request.title = format!("Event {i}");
        service.create(request).await.unwrap();
    }

    let page = service
        .list_for_group(Uuid::from(group_id), Uuid::from(creator), 2, 2)
        .await
        .unwrap();
    assert_eq!(page.current_page, 2);
    assert_eq!(page.total_pages, 3);
    let titles: Vec<&str> = page.events.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, ["Event 2", "Event 3"]);
}

#[tokio::test]
async fn list_for_group_rejects_strangers_and_unknown_groups() {
    let group = test_group("FAM-1", 1);
    let group_id = group.id;
    let member = group.members[0].user_id;
    let (service, _) = service_with_group(group).await;

    let result = service
        .list_for_group(Uuid::from(group_id), Uuid::new_v4(), 1, 10)
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::NotGroupMember))
    ));

    let result = service
        .list_for_group(Uuid::new_v4(), Uuid::from(member), 1, 10)
        .await;
    assert!(matches!(
        result,
        Err(ApplicationError::Domain(DomainError::GroupNotFound))
    ));
}
