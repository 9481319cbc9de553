mod support;

use reqwest::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use support::{seed_group, spawn_app};

#[tokio::test]
async fn event_lifecycle_create_list_edit_delete() {
    let app = spawn_app().await;
    let (group_id, members) = seed_group(&app, "FAM-CRUD", 2).await;
    let owner_token = app.token(members[0], "Alice");
    let other_token = app.token(members[1], "Bob");

    let response = app
        .client
        .post(app.url("/api/events/create"))
        .bearer_auth(&owner_token)
        .json(&json!({
            "unique_code": "FAM-CRUD",
            "title": "Reunion",
            "description": "Annual get-together",
            "date": "2026-09-12T18:00:00Z",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created: Value = response.json().await.unwrap();
    assert_eq!(created["message"], "Event created successfully");
    assert_eq!(created["full_name"], "Alice");
    assert_eq!(created["event"]["title"], "Reunion");
    let interested = created["event"]["interested"].as_array().unwrap();
    assert_eq!(interested.len(), 2);
    assert!(interested.iter().all(|entry| entry["is_interested"] == false));
    let event_id: Uuid = serde_json::from_value(created["event"]["id"].clone()).unwrap();

    let page: Value = app
        .client
        .get(app.url(&format!("/api/events/family-group/{group_id}")))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["events"].as_array().unwrap().len(), 1);
    assert_eq!(page["total_pages"], 1);
    assert_eq!(page["current_page"], 1);

    // Only the creator may edit.
    let response = app
        .client
        .put(app.url(&format!("/api/events/edit/{event_id}")))
        .bearer_auth(&other_token)
        .json(&json!({ "title": "Hijacked" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "NOT_EVENT_OWNER");

    // Omitted and empty fields keep their stored values.
    let edited: Value = app
        .client
        .put(app.url(&format!("/api/events/edit/{event_id}")))
        .bearer_auth(&owner_token)
        .json(&json!({ "title": "Reunion 2026", "description": "" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(edited["message"], "Event updated successfully");
    assert_eq!(edited["event"]["title"], "Reunion 2026");
    assert_eq!(edited["event"]["description"], "Annual get-together");

    let response = app
        .client
        .delete(app.url(&format!("/api/events/delete/{event_id}")))
        .bearer_auth(&other_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .client
        .delete(app.url(&format!("/api/events/delete/{event_id}")))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Event deleted successfully");

    let page: Value = app
        .client
        .get(app.url(&format!("/api/events/family-group/{group_id}")))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(page["events"].as_array().unwrap().is_empty());

    let response = app
        .client
        .delete(app.url(&format!("/api/events/delete/{event_id}")))
        .bearer_auth(&owner_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_bad_input_before_touching_the_store() {
    let app = spawn_app().await;
    let (_, members) = seed_group(&app, "FAM-VAL", 1).await;
    let token = app.token(members[0], "Alice");

    let cases = [
        json!({ "unique_code": "FAM-VAL", "title": "", "description": "d", "date": "2026-09-12T18:00:00Z" }),
        json!({ "unique_code": "FAM-VAL", "title": "t", "description": "", "date": "2026-09-12T18:00:00Z" }),
        json!({ "unique_code": "FAM-VAL", "title": "t", "description": "d", "date": "next tuesday" }),
    ];
    for payload in cases {
        let response = app
            .client
            .post(app.url("/api/events/create"))
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{payload}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn create_is_scoped_to_known_groups_and_members() {
    let app = spawn_app().await;
    let (_, members) = seed_group(&app, "FAM-SCOPE", 1).await;
    let member_token = app.token(members[0], "Alice");
    let stranger_token = app.token(Uuid::new_v4().into(), "Mallory");

    let payload = json!({
        "unique_code": "FAM-NOPE",
        "title": "t",
        "description": "d",
        "date": "2026-09-12T18:00:00Z",
    });
    let response = app
        .client
        .post(app.url("/api/events/create"))
        .bearer_auth(&member_token)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "GROUP_NOT_FOUND");

    let payload = json!({
        "unique_code": "FAM-SCOPE",
        "title": "t",
        "description": "d",
        "date": "2026-09-12T18:00:00Z",
    });
    let response = app
        .client
        .post(app.url("/api/events/create"))
        .bearer_auth(&stranger_token)
        .json(&payload)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "NOT_GROUP_MEMBER");
}

#[tokio::test]
async fn listing_requires_a_valid_token() {
    let app = spawn_app().await;

    let response = app
        .client
        .get(app.url("/api/events/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .client
        .get(app.url("/api/events/"))
        .bearer_auth("not-a-jwt")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn group_listing_paginates_in_creation_order() {
    let app = spawn_app().await;
    let (group_id, members) = seed_group(&app, "FAM-PAGE", 1).await;
    let token = app.token(members[0], "Alice");

    for i in 0..5 {
        let response = app
            .client
            .post(app.url("/api/events/create"))
            .bearer_auth(&token)
            .json(&json!({
                "unique_code": "FAM-PAGE",
                "title": format!("Event {i}"),
                "description": "d",
                "date": "2026-09-12T18:00:00Z",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let page: Value = app
        .client
        .get(app.url(&format!(
            "/api/events/family-group/{group_id}?page=2&limit=2"
        )))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let titles: Vec<&str> = page["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|event| event["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Event 2", "Event 3"]);
    assert_eq!(page["total_pages"], 3);
    assert_eq!(page["current_page"], 2);
}

#[tokio::test]
async fn malformed_event_id_is_a_bad_request() {
    let app = spawn_app().await;
    let (_, members) = seed_group(&app, "FAM-BADID", 1).await;
    let token = app.token(members[0], "Alice");

    let response = app
        .client
        .delete(app.url("/api/events/delete/not-a-uuid"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
