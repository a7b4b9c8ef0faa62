use sqlx::{QueryBuilder, Result, Sqlite};
use uuid::Uuid;

use crate::model::{Category, CategoryUpdate, NewCategory};
use crate::Pool;

/// Return the whole category collection, name-ordered.
#[tracing::instrument(skip(db))]
pub async fn select_all(db: &Pool) -> Result<Vec<Category>> {
    sqlx::query_as(
        r#"
        SELECT id, name, slug, description, color FROM categories ORDER BY name
        "#,
    )
    .fetch_all(db)
    .await
}

#[tracing::instrument(skip(db))]
pub async fn select_by_id(db: &Pool, category_id: &str) -> Result<Option<Category>> {
    sqlx::query_as(
        r#"
        SELECT id, name, slug, description, color FROM categories WHERE id = ?
        "#,
    )
    .bind(category_id)
    .fetch_optional(db)
    .await
}

/// Insert a category. The slug is UNIQUE; a duplicate surfaces as a database
/// unique-violation error.
#[tracing::instrument(skip(db))]
pub async fn insert_category(db: &Pool, new_category: &NewCategory) -> Result<Category> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO categories (id, name, slug, description, color) VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new_category.name)
    .bind(&new_category.slug)
    .bind(&new_category.description)
    .bind(&new_category.color)
    .execute(db)
    .await?;

    select_by_id(db, &id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Partially update a category. Returns `None` when no category matches.
#[tracing::instrument(skip(db))]
pub async fn update_category(
    db: &Pool,
    category_id: &str,
    update: &CategoryUpdate,
) -> Result<Option<Category>> {
    let fields = [
        ("name", &update.name),
        ("slug", &update.slug),
        ("description", &update.description),
        ("color", &update.color),
    ];
    if fields.iter().all(|(_, value)| value.is_none()) {
        return select_by_id(db, category_id).await;
    }

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE categories SET ");
    let mut assignments = query.separated(", ");
    for (column, value) in fields {
        if let Some(value) = value {
            assignments.push(format!("{column} = "));
            assignments.push_bind_unseparated(value.as_str());
        }
    }

    query.push(" WHERE id = ");
    query.push_bind(category_id);

    let result = query.build().execute(db).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    select_by_id(db, category_id).await
}

/// Hard delete. Callers are expected to check references first; see
/// [`count_article_references`].
#[tracing::instrument(skip(db))]
pub async fn delete_category(db: &Pool, category_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM categories WHERE id = ?")
        .bind(category_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Number of articles still holding this category in their set.
#[tracing::instrument(skip(db))]
pub async fn count_article_references(db: &Pool, category_id: &str) -> Result<u64> {
    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM article_categories WHERE category_id = ?")
            .bind(category_id)
            .fetch_one(db)
            .await?;

    Ok(count as u64)
}
