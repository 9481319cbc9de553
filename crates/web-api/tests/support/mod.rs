//! Shared harness: the full router served on an ephemeral port, backed by
//! the in-memory store.

use std::net::SocketAddr;
use std::sync::Arc;

use application::{
    ChatService, ChatServiceDependencies, Clock, EventService, EventServiceDependencies,
    InMemoryStore, LocalMessageBroadcaster, SystemClock,
};
use config::JwtConfig;
use domain::{FamilyGroup, GroupId, GroupMember, InviteCode, UserId};
use uuid::Uuid;
use web_api::{router, AppState, JwtService};

pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    pub jwt: Arc<JwtService>,
    pub store: Arc<InMemoryStore>,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn token(&self, user_id: UserId, full_name: &str) -> String {
        self.jwt
            .generate_token(Uuid::from(user_id), full_name)
            .unwrap()
    }
}

pub async fn spawn_app() -> TestApp {
    let store = Arc::new(InMemoryStore::new());
    let broadcaster = LocalMessageBroadcaster::new(64);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let event_service = EventService::new(EventServiceDependencies {
        group_repository: store.clone(),
        event_repository: store.clone(),
        clock: clock.clone(),
    });
    let chat_service = ChatService::new(ChatServiceDependencies {
        group_repository: store.clone(),
        clock,
        broadcaster: Arc::new(broadcaster.clone()),
    });

    let jwt = Arc::new(JwtService::new(JwtConfig {
        secret: "integration-test-secret-at-least-32-chars".to_owned(),
        expiration_hours: 1,
    }));

    let state = AppState::new(
        Arc::new(event_service),
        Arc::new(chat_service),
        broadcaster,
        jwt.clone(),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });

    TestApp {
        addr,
        client: reqwest::Client::new(),
        jwt,
        store,
    }
}

pub async fn seed_group(app: &TestApp, code: &str, member_count: usize) -> (GroupId, Vec<UserId>) {
    let members: Vec<UserId> = (0..member_count)
        .map(|_| UserId(Uuid::new_v4()))
        .collect();
    let group = FamilyGroup {
        id: GroupId(Uuid::new_v4()),
        unique_code: InviteCode::parse(code).unwrap(),
        name: format!("Family {code}"),
        members: members
            .iter()
            .enumerate()
            .map(|(i, user_id)| GroupMember {
                user_id: *user_id,
                full_name: format!("Member {i}"),
            })
            .collect(),
        events: Vec::new(),
    };
    let group_id = group.id;
    app.store.insert_group(group).await;
    (group_id, members)
}
