//! Relational storage for medical events.
//!
//! Events live in one table keyed by `(subject_key, timestamp)`, mirroring a
//! partition/sort key layout. Filters from `medtrack_core` are translated into
//! column predicates:
//! - subject key: equality
//! - timestamp: `LIKE 'prefix%'` for point queries, `>` for range queries
//! - label: `LIKE '%fragment%'`
//!
//! `LIKE` wildcards in user text are escaped so matching stays literal.

use async_trait::async_trait;
use medtrack_core::{EventFilter, EventRepo, MedicalEvent, TimestampPredicate};
use medtrack_entities::medical_events;
use sea_orm::sea_query::{LikeExpr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, Schema,
};
use tracing::{debug, info};

use crate::convert;

const LIKE_ESCAPE: char = '\\';

/// Make `%` and `_` match literally inside a `LIKE` pattern.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '%' | '_' | LIKE_ESCAPE) {
            escaped.push(LIKE_ESCAPE);
        }
        escaped.push(c);
    }
    escaped
}

pub struct EventStore {
    db: DatabaseConnection,
}

impl EventStore {
    /// Connect using a database URL and pool size.
    pub async fn new(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let mut options = ConnectOptions::new(database_url);
        options.max_connections(max_connections).sqlx_logging(false);
        Self::connect(options).await
    }

    pub async fn connect(options: ConnectOptions) -> anyhow::Result<Self> {
        info!("Connecting to database for EventStore");
        let db = Database::connect(options).await?;
        info!("EventStore initialized");
        Ok(Self { db })
    }

    /// Create the events table if it does not exist yet.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);
        let mut stmt = schema.create_table_from_entity(medical_events::Entity);
        stmt.if_not_exists();

        self.db
            .execute_unprepared(&backend.build(&stmt).to_string())
            .await?;

        info!("Schema ready: medical_events");
        Ok(())
    }
}

#[async_trait]
impl EventRepo for EventStore {
    async fn put(&self, event: &MedicalEvent) -> anyhow::Result<()> {
        let model = convert::active_model_from_event(event);

        medical_events::Entity::insert(model)
            .on_conflict(
                OnConflict::columns([
                    medical_events::Column::SubjectKey,
                    medical_events::Column::Timestamp,
                ])
                .update_columns([
                    medical_events::Column::EventLabel,
                    medical_events::Column::Dosage,
                    medical_events::Column::DurationMinutes,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        info!(
            "Stored event for {} at {}",
            event.subject_key, event.timestamp
        );
        Ok(())
    }

    async fn query(&self, filter: &EventFilter) -> anyhow::Result<Vec<MedicalEvent>> {
        let mut select = medical_events::Entity::find()
            .filter(medical_events::Column::SubjectKey.eq(filter.subject_key.as_str()));

        match &filter.timestamp {
            Some(TimestampPredicate::BeginsWith(prefix)) => {
                let pattern =
                    LikeExpr::new(format!("{}%", escape_like(prefix))).escape(LIKE_ESCAPE);
                select = select.filter(medical_events::Column::Timestamp.like(pattern));
            }
            Some(TimestampPredicate::After(bound)) => {
                select = select.filter(medical_events::Column::Timestamp.gt(bound.as_str()));
            }
            None => {}
        }

        if let Some(fragment) = &filter.label_contains {
            let pattern =
                LikeExpr::new(format!("%{}%", escape_like(fragment))).escape(LIKE_ESCAPE);
            select = select.filter(medical_events::Column::EventLabel.like(pattern));
        }

        let models = select
            .order_by_asc(medical_events::Column::Timestamp)
            .all(&self.db)
            .await?;

        debug!("Query for {} matched {} events", filter.subject_key, models.len());
        Ok(models.into_iter().map(convert::event_from_model).collect())
    }
}
