use crate::models::{ClickEvent, NewClick, NewVisit, VisitEvent};
use crate::storage::EventStore;
use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;

pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self {
            pool: Arc::new(pool),
        })
    }
}

#[async_trait]
impl EventStore for PostgresStore {
    async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS link_clicks (
                id BIGSERIAL PRIMARY KEY,
                link_name TEXT NOT NULL,
                link_url TEXT NOT NULL,
                user_agent TEXT,
                ip_address TEXT,
                referrer TEXT,
                occurred_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_clicks_occurred_at ON link_clicks(occurred_at)",
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS page_visits (
                id BIGSERIAL PRIMARY KEY,
                user_agent TEXT,
                ip_address TEXT,
                referrer TEXT,
                referrer_platform TEXT,
                occurred_at BIGINT NOT NULL
            )
            "#,
        )
        .execute(self.pool.as_ref())
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_visits_occurred_at ON page_visits(occurred_at)",
        )
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn insert_click(&self, click: &NewClick) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO link_clicks (link_name, link_url, user_agent, ip_address, referrer, occurred_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&click.link_name)
        .bind(&click.link_url)
        .bind(&click.user_agent)
        .bind(&click.ip_address)
        .bind(&click.referrer)
        .bind(click.occurred_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn insert_visit(&self, visit: &NewVisit) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO page_visits (user_agent, ip_address, referrer, referrer_platform, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(&visit.user_agent)
        .bind(&visit.ip_address)
        .bind(&visit.referrer)
        .bind(&visit.referrer_platform)
        .bind(visit.occurred_at)
        .execute(self.pool.as_ref())
        .await?;

        Ok(())
    }

    async fn clicks_since(&self, since: i64) -> Result<Vec<ClickEvent>> {
        let clicks = sqlx::query_as::<_, ClickEvent>(
            r#"
            SELECT id, link_name, link_url, user_agent, ip_address, referrer, occurred_at
            FROM link_clicks
            WHERE occurred_at >= $1
            ORDER BY occurred_at ASC, id ASC
            "#,
        )
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(clicks)
    }

    async fn visits_since(&self, since: i64) -> Result<Vec<VisitEvent>> {
        let visits = sqlx::query_as::<_, VisitEvent>(
            r#"
            SELECT id, user_agent, ip_address, referrer, referrer_platform, occurred_at
            FROM page_visits
            WHERE occurred_at >= $1
            ORDER BY occurred_at ASC, id ASC
            "#,
        )
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(visits)
    }

    async fn recent_clicks(&self, since: i64, limit: i64) -> Result<Vec<ClickEvent>> {
        let clicks = sqlx::query_as::<_, ClickEvent>(
            r#"
            SELECT id, link_name, link_url, user_agent, ip_address, referrer, occurred_at
            FROM link_clicks
            WHERE occurred_at >= $1
            ORDER BY occurred_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(since)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(clicks)
    }

    async fn recent_visits(&self, since: i64, limit: i64) -> Result<Vec<VisitEvent>> {
        let visits = sqlx::query_as::<_, VisitEvent>(
            r#"
            SELECT id, user_agent, ip_address, referrer, referrer_platform, occurred_at
            FROM page_visits
            WHERE occurred_at >= $1
            ORDER BY occurred_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(since)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(visits)
    }
}
