use std::collections::HashMap;

use chrono::Utc;
use sqlx::{FromRow, QueryBuilder, Result, Sqlite};
use uuid::Uuid;

use crate::model::{
    Article, ArticleFilters, ArticleStatus, ArticleUpdate, ArticleWithCategories, Category,
    NewArticle, PagedResult,
};
use crate::Pool;

const BASE_SELECT: &str = r#"
    SELECT articles.id,
           articles.title,
           articles.content,
           articles.excerpt,
           articles.author,
           articles.network,
           articles.status,
           articles.featured,
           articles.published_at,
           articles.created_at,
           articles.updated_at
    FROM articles
    WHERE 1 = 1
"#;

/// Return a page of articles matching the given filters, newest first.
/// Equal creation timestamps fall back to id order.
#[tracing::instrument(skip(db))]
pub async fn select_page(
    db: &Pool,
    filters: &ArticleFilters,
    page_number: u64,
    page_size: u64,
) -> Result<PagedResult<ArticleWithCategories>> {
    let mut page_query: QueryBuilder<Sqlite> = QueryBuilder::new(BASE_SELECT);
    add_filters(&mut page_query, filters);

    page_query.push(
        r#"
        ORDER BY articles.created_at DESC, articles.id DESC
        "#,
    );

    page_query.push(" LIMIT ");
    page_query.push_bind(page_size as i64);

    page_query.push(" OFFSET ");
    page_query.push_bind((page_number.max(1) as i64 - 1) * page_size as i64);

    let mut count_query: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
        SELECT COUNT(*) AS num_items FROM (
        "#,
    );
    count_query.push(BASE_SELECT);
    add_filters(&mut count_query, filters);
    count_query.push(" ) AS sub_query ");

    let rows: Vec<Article> = page_query.build_query_as().fetch_all(db).await?;
    let total_items = count_query
        .build_query_scalar::<i64>()
        .fetch_optional(db)
        .await?
        .unwrap_or(0) as u64;

    let content = attach_categories(db, rows).await?;

    Ok(PagedResult::new(
        content,
        total_items,
        page_size,
        page_number,
    ))
}

/// Return the whole article collection, newest first, categories expanded.
#[tracing::instrument(skip(db))]
pub async fn select_all(db: &Pool) -> Result<Vec<ArticleWithCategories>> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(BASE_SELECT);
    query.push(" ORDER BY articles.created_at DESC, articles.id DESC ");

    let rows: Vec<Article> = query.build_query_as().fetch_all(db).await?;
    attach_categories(db, rows).await
}

/// Return an optional article with its categories expanded.
#[tracing::instrument(skip(db))]
pub async fn select_by_id(db: &Pool, article_id: &str) -> Result<Option<ArticleWithCategories>> {
    let row: Option<Article> = sqlx::query_as(
        r#"
        SELECT id, title, content, excerpt, author, network, status, featured,
               published_at, created_at, updated_at
        FROM articles
        WHERE id = ?
        "#,
    )
    .bind(article_id)
    .fetch_optional(db)
    .await?;

    match row {
        Some(article) => {
            let categories = select_categories_of_article(db, &article.id).await?;
            Ok(Some(ArticleWithCategories {
                article,
                categories,
            }))
        }
        None => Ok(None),
    }
}

/// Insert an article and its category associations, returning the created
/// article with categories expanded.
#[tracing::instrument(skip(db))]
pub async fn insert_article(db: &Pool, new_article: &NewArticle) -> Result<ArticleWithCategories> {
    let id = Uuid::new_v4().to_string();
    let now = Utc::now();

    let mut transaction = db.begin().await?;

    sqlx::query(
        r#"
        INSERT INTO articles (id, title, content, excerpt, author, network, status, featured,
                              published_at, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, NULL, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new_article.title)
    .bind(&new_article.content)
    .bind(&new_article.excerpt)
    .bind(&new_article.author)
    .bind(&new_article.network)
    .bind(new_article.status)
    .bind(new_article.featured)
    .bind(now)
    .bind(now)
    .execute(&mut *transaction)
    .await?;

    for category_id in &new_article.category_ids {
        sqlx::query(
            r#"
            INSERT INTO article_categories (article_id, category_id) VALUES (?, ?)
            "#,
        )
        .bind(&id)
        .bind(category_id)
        .execute(&mut *transaction)
        .await?;
    }

    transaction.commit().await?;

    select_by_id(db, &id).await?.ok_or(sqlx::Error::RowNotFound)
}

/// Partially update an article. A present `category_ids` replaces the whole
/// association set. Returns `None` when no article matches the id.
#[tracing::instrument(skip(db))]
pub async fn update_article(
    db: &Pool,
    article_id: &str,
    update: &ArticleUpdate,
) -> Result<Option<ArticleWithCategories>> {
    let mut transaction = db.begin().await?;

    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new("UPDATE articles SET updated_at = ");
    query.push_bind(Utc::now());

    if let Some(title) = &update.title {
        query.push(", title = ");
        query.push_bind(title.as_str());
    }
    if let Some(content) = &update.content {
        query.push(", content = ");
        query.push_bind(content.as_str());
    }
    if let Some(excerpt) = &update.excerpt {
        query.push(", excerpt = ");
        query.push_bind(excerpt.as_str());
    }
    if let Some(author) = &update.author {
        query.push(", author = ");
        query.push_bind(author.as_str());
    }
    if let Some(network) = &update.network {
        query.push(", network = ");
        query.push_bind(network.as_str());
    }
    if let Some(status) = update.status {
        query.push(", status = ");
        query.push_bind(status);
    }
    if let Some(featured) = update.featured {
        query.push(", featured = ");
        query.push_bind(featured);
    }
    if let Some(published_at) = update.published_at {
        query.push(", published_at = ");
        query.push_bind(published_at);
    }

    query.push(" WHERE id = ");
    query.push_bind(article_id);

    let result = query.build().execute(&mut *transaction).await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    if let Some(category_ids) = &update.category_ids {
        sqlx::query("DELETE FROM article_categories WHERE article_id = ?")
            .bind(article_id)
            .execute(&mut *transaction)
            .await?;

        for category_id in category_ids {
            sqlx::query("INSERT INTO article_categories (article_id, category_id) VALUES (?, ?)")
                .bind(article_id)
                .bind(category_id)
                .execute(&mut *transaction)
                .await?;
        }
    }

    transaction.commit().await?;

    select_by_id(db, article_id).await
}

/// Hard delete. Association rows go with the article.
#[tracing::instrument(skip(db))]
pub async fn delete_article(db: &Pool, article_id: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM articles WHERE id = ?")
        .bind(article_id)
        .execute(db)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Set the status of every listed article. Unknown ids are skipped.
#[tracing::instrument(skip(db))]
pub async fn set_status_bulk(db: &Pool, ids: &[String], status: ArticleStatus) -> Result<()> {
    let now = Utc::now();
    for id in ids {
        sqlx::query("UPDATE articles SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(now)
            .bind(id)
            .execute(db)
            .await?;
    }

    Ok(())
}

/// The categories of a single article, name-ordered.
#[tracing::instrument(skip(db))]
pub async fn select_categories_of_article(db: &Pool, article_id: &str) -> Result<Vec<Category>> {
    sqlx::query_as(
        r#"
        SELECT categories.id, categories.name, categories.slug, categories.description,
               categories.color
        FROM categories
        JOIN article_categories ON categories.id = article_categories.category_id
        WHERE article_categories.article_id = ?
        ORDER BY categories.name
        "#,
    )
    .bind(article_id)
    .fetch_all(db)
    .await
}

#[derive(Debug, FromRow)]
struct ArticleCategoryRow {
    article_id: String,
    #[sqlx(flatten)]
    category: Category,
}

/// Expand the category set of a batch of article rows with one query.
async fn attach_categories(db: &Pool, rows: Vec<Article>) -> Result<Vec<ArticleWithCategories>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }

    let category_rows: Vec<ArticleCategoryRow> = {
        let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT article_categories.article_id,
                   categories.id,
                   categories.name,
                   categories.slug,
                   categories.description,
                   categories.color
            FROM categories
            JOIN article_categories ON categories.id = article_categories.category_id
            WHERE article_categories.article_id IN (
            "#,
        );
        let mut separated = query.separated(", ");
        for article in &rows {
            separated.push_bind(article.id.as_str());
        }
        query.push(") ORDER BY categories.name");

        query.build_query_as().fetch_all(db).await?
    };

    let mut by_article: HashMap<String, Vec<Category>> = HashMap::new();
    for row in category_rows {
        by_article.entry(row.article_id).or_default().push(row.category);
    }

    Ok(rows
        .into_iter()
        .map(|article| {
            let categories = by_article.remove(&article.id).unwrap_or_default();
            ArticleWithCategories {
                article,
                categories,
            }
        })
        .collect())
}

fn add_filters<'args>(query: &mut QueryBuilder<'args, Sqlite>, filters: &'args ArticleFilters) {
    if let Some(search) = &filters.search {
        if !search.is_empty() {
            let pattern = format!("%{search}%");
            query.push(" AND (articles.title LIKE ");
            query.push_bind(pattern.clone());
            query.push(" OR articles.content LIKE ");
            query.push_bind(pattern);
            query.push(") ");
        }
    }

    if let Some(status) = filters.status {
        query.push(" AND articles.status = ");
        query.push_bind(status);
    }

    if let Some(network) = &filters.network {
        query.push(" AND articles.network = ");
        query.push_bind(network.as_str());
    }

    if let Some(featured) = filters.featured {
        query.push(" AND articles.featured = ");
        query.push_bind(featured);
    }

    if !filters.categories.is_empty() {
        query.push(
            " AND articles.id IN (SELECT article_id FROM article_categories WHERE category_id IN (",
        );
        let mut separated = query.separated(", ");
        for category_id in &filters.categories {
            separated.push_bind(category_id.as_str());
        }
        query.push(")) ");
    }
}
