use sqlx::{QueryBuilder, Result, Sqlite};
use uuid::Uuid;

use crate::model::{Network, NetworkUpdate, NewNetwork};
use crate::Pool;

/// Return the whole network collection, name-ordered.
#[tracing::instrument(skip(db))]
pub async fn select_all(db: &Pool) -> Result<Vec<Network>> {
    sqlx::query_as(
        r#"
        SELECT id, name, description FROM networks ORDER BY name
        "#,
    )
    .fetch_all(db)
    .await
}

#[tracing::instrument(skip(db))]
pub async fn select_by_id(db: &Pool, network_id: &str) -> Result<Option<Network>> {
    sqlx::query_as(
        r#"
        SELECT id, name, description FROM networks WHERE id = ?
        "#,
    )
    .bind(network_id)
    .fetch_optional(db)
    .await
}

#[tracing::instrument(skip(db))]
pub async fn insert_network(db: &Pool, new_network: &NewNetwork) -> Result<Network> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO networks (id, name, description) VALUES (?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new_network.name)
    .bind(&new_network.description)
    .execute(db)
    .await?;

    select_by_id(db, &id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Partially update a network. Returns `None` when no network matches.
#[tracing::instrument(skip(db))]
pub async fn update_network(
    db: &Pool,
    network_id: &str,
    update: &NetworkUpdate,
) -> Result<Option<Network>> {
    let fields = [("name", &update.name), ("description", &update.description)];
    if fields.iter().all(|(_, value)| value.is_none()) {
        return select_by_id(db, network_id).await;
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE networks SET ");
    let mut assignments = query.separated(", ");
    for (column, value) in fields {
        if let Some(value) = value {
            assignments.push(format!("{column} = "));
            assignments.push_bind_unseparated(value.as_str());
        }
    }

    query.push(" WHERE id = ");
    query.push_bind(network_id);

    let result = query.build().execute(db).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    select_by_id(db, network_id).await
}

/// Hard delete. Articles referencing the network keep their id; the listing
/// and aggregation tolerate ids that no longer resolve.
#[tracing::instrument(skip(db))]
pub async fn delete_network(db: &Pool, network_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM networks WHERE id = ?")
        .bind(network_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}
