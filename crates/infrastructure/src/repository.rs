use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

use application::repository::{EventRepository, FamilyGroupRepository};
use domain::{
    ChatMessage, Event, EventId, EventSummary, FamilyGroup, GroupId, GroupMember, InterestEntry,
    InviteCode, RepositoryError, UserId,
};

/// Conservative per-operation budget; an expired operation surfaces as a
/// storage error and maps to an internal error at the HTTP boundary.
const STORE_OP_TIMEOUT: Duration = Duration::from_secs(5);

async fn timed<T>(
    fut: impl Future<Output = Result<T, RepositoryError>>,
) -> Result<T, RepositoryError> {
    match tokio::time::timeout(STORE_OP_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => {
            tracing::warn!(timeout = ?STORE_OP_TIMEOUT, "store operation timed out");
            Err(RepositoryError::storage("store operation timed out"))
        }
    }
}

fn map_sqlx_err(err: sqlx::Error) -> RepositoryError {
    tracing::error!(error = %err, "database operation failed");
    RepositoryError::storage(err.to_string())
}

fn invalid_data(message: impl Into<String>) -> RepositoryError {
    RepositoryError::storage(message)
}

#[derive(Debug, FromRow)]
struct GroupRecord {
    id: Uuid,
    unique_code: String,
    name: String,
}

#[derive(Debug, FromRow)]
struct MemberRecord {
    user_id: Uuid,
    full_name: String,
}

#[derive(Debug, FromRow)]
struct SummaryRecord {
    event_id: Uuid,
    user_id: Uuid,
    title: String,
}

#[derive(Debug, FromRow)]
struct MessageRecord {
    author_name: String,
    avatar: String,
    body: String,
    sent_at: OffsetDateTime,
}

impl From<MessageRecord> for ChatMessage {
    fn from(value: MessageRecord) -> Self {
        ChatMessage {
            author_name: value.author_name,
            avatar: value.avatar,
            text: value.body,
            timestamp: value.sent_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct EventRecord {
    id: Uuid,
    family_group_id: Uuid,
    user_id: Uuid,
    title: String,
    description: String,
    date: OffsetDateTime,
    created_at: OffsetDateTime,
}

#[derive(Debug, FromRow)]
struct InterestRecord {
    event_id: Uuid,
    user_id: Uuid,
    is_interested: bool,
}

impl EventRecord {
    fn into_event(self, interested: Vec<InterestEntry>) -> Event {
        Event {
            id: EventId::from(self.id),
            family_group_id: GroupId::from(self.family_group_id),
            user_id: UserId::from(self.user_id),
            title: self.title,
            description: self.description,
            date: self.date,
            interested,
            created_at: self.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgFamilyGroupRepository {
    pool: PgPool,
}

impl PgFamilyGroupRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Assembles the aggregate from its three tables: group row, ordered
/// members, ordered summaries.
async fn load_group(
    pool: &PgPool,
    record: GroupRecord,
) -> Result<FamilyGroup, RepositoryError> {
    let members = sqlx::query_as::<_, MemberRecord>(
        r#"SELECT user_id, full_name FROM family_group_members WHERE group_id = $1 ORDER BY position"#,
    )
    .bind(record.id)
    .fetch_all(pool)
    .await
    .map_err(map_sqlx_err)?;

    let summaries = sqlx::query_as::<_, SummaryRecord>(
        r#"SELECT event_id, user_id, title FROM group_event_summaries WHERE group_id = $1 ORDER BY position"#,
    )
    .bind(record.id)
    .fetch_all(pool)
    .await
    .map_err(map_sqlx_err)?;

    let unique_code = InviteCode::parse(record.unique_code)
        .map_err(|err| invalid_data(err.to_string()))?;

    Ok(FamilyGroup {
        id: GroupId::from(record.id),
        unique_code,
        name: record.name,
        members: members
            .into_iter()
            .map(|member| GroupMember {
                user_id: UserId::from(member.user_id),
                full_name: member.full_name,
            })
            .collect(),
        events: summaries
            .into_iter()
            .map(|summary| EventSummary {
                event_id: EventId::from(summary.event_id),
                user_id: UserId::from(summary.user_id),
                title: summary.title,
            })
            .collect(),
    })
}

#[async_trait]
impl FamilyGroupRepository for PgFamilyGroupRepository {
    async fn find_by_id(&self, id: GroupId) -> Result<Option<FamilyGroup>, RepositoryError> {
        let pool = self.pool.clone();
        timed(async move {
            let record = sqlx::query_as::<_, GroupRecord>(
                r#"SELECT id, unique_code, name FROM family_groups WHERE id = $1"#,
            )
            .bind(Uuid::from(id))
            .fetch_optional(&pool)
            .await
            .map_err(map_sqlx_err)?;

            match record {
                Some(record) => Ok(Some(load_group(&pool, record).await?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn find_by_invite_code(
        &self,
        code: &InviteCode,
    ) -> Result<Option<FamilyGroup>, RepositoryError> {
        let pool = self.pool.clone();
        let code = code.as_str().to_owned();
        timed(async move {
            let record = sqlx::query_as::<_, GroupRecord>(
                r#"SELECT id, unique_code, name FROM family_groups WHERE unique_code = $1"#,
            )
            .bind(code)
            .fetch_optional(&pool)
            .await
            .map_err(map_sqlx_err)?;

            match record {
                Some(record) => Ok(Some(load_group(&pool, record).await?)),
                None => Ok(None),
            }
        })
        .await
    }

    async fn append_message(
        &self,
        id: GroupId,
        message: ChatMessage,
    ) -> Result<Option<ChatMessage>, RepositoryError> {
        let pool = self.pool.clone();
        timed(async move {
            // Single atomic insert; the existence check rides along in the
            // same statement so concurrent appends can never lose updates
            // to a read-modify-write interleaving.
            let record = sqlx::query_as::<_, MessageRecord>(
                r#"
                INSERT INTO group_messages (group_id, author_name, avatar, body, sent_at)
                SELECT $1, $2, $3, $4, $5
                WHERE EXISTS (SELECT 1 FROM family_groups WHERE id = $1)
                RETURNING author_name, avatar, body, sent_at
                "#,
            )
            .bind(Uuid::from(id))
            .bind(message.author_name)
            .bind(message.avatar)
            .bind(message.text)
            .bind(message.timestamp)
            .fetch_optional(&pool)
            .await
            .map_err(map_sqlx_err)?;

            Ok(record.map(ChatMessage::from))
        })
        .await
    }

    async fn list_messages(
        &self,
        id: GroupId,
    ) -> Result<Option<Vec<ChatMessage>>, RepositoryError> {
        let pool = self.pool.clone();
        timed(async move {
            let exists: bool =
                sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM family_groups WHERE id = $1)"#)
                    .bind(Uuid::from(id))
                    .fetch_one(&pool)
                    .await
                    .map_err(map_sqlx_err)?;
            if !exists {
                return Ok(None);
            }

            let records = sqlx::query_as::<_, MessageRecord>(
                r#"SELECT author_name, avatar, body, sent_at FROM group_messages WHERE group_id = $1 ORDER BY id"#,
            )
            .bind(Uuid::from(id))
            .fetch_all(&pool)
            .await
            .map_err(map_sqlx_err)?;

            Ok(Some(records.into_iter().map(ChatMessage::from).collect()))
        })
        .await
    }
}

#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Loads interest snapshots for a batch of event rows in one query.
async fn attach_interest(
    pool: &PgPool,
    records: Vec<EventRecord>,
) -> Result<Vec<Event>, RepositoryError> {
    let ids: Vec<Uuid> = records.iter().map(|record| record.id).collect();
    let interest = sqlx::query_as::<_, InterestRecord>(
        r#"SELECT event_id, user_id, is_interested FROM event_interest WHERE event_id = ANY($1) ORDER BY position"#,
    )
    .bind(&ids)
    .fetch_all(pool)
    .await
    .map_err(map_sqlx_err)?;

    let mut by_event: HashMap<Uuid, Vec<InterestEntry>> = HashMap::new();
    for row in interest {
        by_event.entry(row.event_id).or_default().push(InterestEntry {
            user_id: UserId::from(row.user_id),
            is_interested: row.is_interested,
        });
    }

    Ok(records
        .into_iter()
        .map(|record| {
            let interested = by_event.remove(&record.id).unwrap_or_default();
            record.into_event(interested)
        })
        .collect())
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn create_with_summary(&self, event: Event) -> Result<Event, RepositoryError> {
        let pool = self.pool.clone();
        timed(async move {
            // Record insert and summary append commit or roll back together.
            let mut tx = pool.begin().await.map_err(map_sqlx_err)?;

            sqlx::query(
                r#"
                INSERT INTO events (id, family_group_id, user_id, title, description, date, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(Uuid::from(event.id))
            .bind(Uuid::from(event.family_group_id))
            .bind(Uuid::from(event.user_id))
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .bind(event.created_at)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

            for (position, entry) in event.interested.iter().enumerate() {
                sqlx::query(
                    r#"INSERT INTO event_interest (event_id, user_id, is_interested, position) VALUES ($1, $2, $3, $4)"#,
                )
                .bind(Uuid::from(event.id))
                .bind(Uuid::from(entry.user_id))
                .bind(entry.is_interested)
                .bind(position as i32)
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;
            }

            sqlx::query(
                r#"INSERT INTO group_event_summaries (group_id, event_id, user_id, title) VALUES ($1, $2, $3, $4)"#,
            )
            .bind(Uuid::from(event.family_group_id))
            .bind(Uuid::from(event.id))
            .bind(Uuid::from(event.user_id))
            .bind(&event.title)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

            tx.commit().await.map_err(map_sqlx_err)?;
            Ok(event)
        })
        .await
    }

    async fn find_by_id(&self, id: EventId) -> Result<Option<Event>, RepositoryError> {
        let pool = self.pool.clone();
        timed(async move {
            let record = sqlx::query_as::<_, EventRecord>(
                r#"SELECT id, family_group_id, user_id, title, description, date, created_at FROM events WHERE id = $1"#,
            )
            .bind(Uuid::from(id))
            .fetch_optional(&pool)
            .await
            .map_err(map_sqlx_err)?;

            match record {
                Some(record) => Ok(attach_interest(&pool, vec![record]).await?.pop()),
                None => Ok(None),
            }
        })
        .await
    }

    async fn list_all(&self) -> Result<Vec<Event>, RepositoryError> {
        let pool = self.pool.clone();
        timed(async move {
            let records = sqlx::query_as::<_, EventRecord>(
                r#"SELECT id, family_group_id, user_id, title, description, date, created_at FROM events ORDER BY seq"#,
            )
            .fetch_all(&pool)
            .await
            .map_err(map_sqlx_err)?;

            attach_interest(&pool, records).await
        })
        .await
    }

    async fn list_for_group(
        &self,
        group_id: GroupId,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Event>, RepositoryError> {
        let pool = self.pool.clone();
        timed(async move {
            let records = sqlx::query_as::<_, EventRecord>(
                r#"
                SELECT id, family_group_id, user_id, title, description, date, created_at
                FROM events
                WHERE family_group_id = $1
                ORDER BY seq
                OFFSET $2 LIMIT $3
                "#,
            )
            .bind(Uuid::from(group_id))
            .bind(skip as i64)
            .bind(i64::from(limit))
            .fetch_all(&pool)
            .await
            .map_err(map_sqlx_err)?;

            attach_interest(&pool, records).await
        })
        .await
    }

    async fn count_for_group(&self, group_id: GroupId) -> Result<u64, RepositoryError> {
        let pool = self.pool.clone();
        timed(async move {
            let count: i64 =
                sqlx::query_scalar(r#"SELECT COUNT(*) FROM events WHERE family_group_id = $1"#)
                    .bind(Uuid::from(group_id))
                    .fetch_one(&pool)
                    .await
                    .map_err(map_sqlx_err)?;
            Ok(count as u64)
        })
        .await
    }

    async fn update(&self, event: Event) -> Result<Event, RepositoryError> {
        let pool = self.pool.clone();
        timed(async move {
            let result = sqlx::query(
                r#"UPDATE events SET title = $2, description = $3, date = $4 WHERE id = $1"#,
            )
            .bind(Uuid::from(event.id))
            .bind(&event.title)
            .bind(&event.description)
            .bind(event.date)
            .execute(&pool)
            .await
            .map_err(map_sqlx_err)?;

            if result.rows_affected() == 0 {
                return Err(RepositoryError::NotFound);
            }
            Ok(event)
        })
        .await
    }

    async fn delete_with_summary(
        &self,
        event_id: EventId,
        group_id: GroupId,
    ) -> Result<(), RepositoryError> {
        let pool = self.pool.clone();
        timed(async move {
            let mut tx = pool.begin().await.map_err(map_sqlx_err)?;

            let group_exists: bool =
                sqlx::query_scalar(r#"SELECT EXISTS (SELECT 1 FROM family_groups WHERE id = $1)"#)
                    .bind(Uuid::from(group_id))
                    .fetch_one(&mut *tx)
                    .await
                    .map_err(map_sqlx_err)?;
            if !group_exists {
                return Err(RepositoryError::NotFound);
            }

            // Summary first, record second, one transaction: readers never
            // see a summary pointing at a missing record.
            sqlx::query(
                r#"DELETE FROM group_event_summaries WHERE group_id = $1 AND event_id = $2"#,
            )
            .bind(Uuid::from(group_id))
            .bind(Uuid::from(event_id))
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_err)?;

            sqlx::query(r#"DELETE FROM events WHERE id = $1"#)
                .bind(Uuid::from(event_id))
                .execute(&mut *tx)
                .await
                .map_err(map_sqlx_err)?;

            tx.commit().await.map_err(map_sqlx_err)?;
            Ok(())
        })
        .await
    }
}

pub async fn create_pg_pool(
    database_url: &str,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(STORE_OP_TIMEOUT)
        .connect(database_url)
        .await
}
