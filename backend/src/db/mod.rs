pub mod schema;

use sqlx::AnyPool;
use sqlx::any::AnyPoolOptions;

#[derive(Clone)]
pub struct Db {
    pub pool: AnyPool,
}

impl Db {
    pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<Self> {
        let pool = AnyPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Create the schema if missing and seed the room inventory.
    pub async fn migrate(&self) -> anyhow::Result<()> {
        schema::migrate(&self.pool).await?;
        schema::seed_inventory(&self.pool).await
    }
}
