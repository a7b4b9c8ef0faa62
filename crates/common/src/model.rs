use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// Lifecycle status of an article.
#[derive(sqlx::Type, Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ArticleStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

/// Outcome of a notification send, as recorded in the log.
#[derive(sqlx::Type, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Sent,
    Failed,
}

/// An article row, without its category associations.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    /// Id of the network this article belongs to.
    pub network: String,
    pub status: ArticleStatus,
    pub featured: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An article with its category set expanded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleWithCategories {
    #[serde(flatten)]
    pub article: Article,
    pub categories: Vec<Category>,
}

/// Model for an article to be inserted in the database.
#[derive(Debug)]
pub struct NewArticle {
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub author: String,
    pub network: String,
    pub status: ArticleStatus,
    pub featured: bool,
    pub category_ids: Vec<String>,
}

/// Partial update of an article. `None` fields are left untouched;
/// `category_ids` replaces the whole association set when present.
#[derive(Debug, Default)]
pub struct ArticleUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub author: Option<String>,
    pub network: Option<String>,
    pub status: Option<ArticleStatus>,
    pub featured: Option<bool>,
    pub published_at: Option<DateTime<Utc>>,
    pub category_ids: Option<Vec<String>>,
}

/// Filters applied to the article listing. All present filters are ANDed.
#[derive(Debug, Default)]
pub struct ArticleFilters {
    pub search: Option<String>,
    pub status: Option<ArticleStatus>,
    pub network: Option<String>,
    pub featured: Option<bool>,
    pub categories: Vec<String>,
}

/// A named, colored tag. Many-to-many with articles.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub color: String,
}

#[derive(Debug)]
pub struct NewCategory {
    pub name: String,
    pub slug: String,
    pub description: String,
    pub color: String,
}

#[derive(Debug, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub color: Option<String>,
}

/// A named publishing destination an article belongs to.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Network {
    pub id: String,
    pub name: String,
    pub description: String,
}

#[derive(Debug)]
pub struct NewNetwork {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Default)]
pub struct NetworkUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Log record of one (simulated) email send, tied to one article.
/// Immutable once written.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EmailNotification {
    pub id: String,
    pub article_id: String,
    pub recipients: Json<Vec<String>>,
    pub subject: String,
    pub sent_at: DateTime<Utc>,
    pub status: NotificationStatus,
}

#[derive(Debug)]
pub struct NewNotification {
    pub article_id: String,
    pub recipients: Vec<String>,
    pub subject: String,
}

/// Page of elements
#[derive(Debug)]
pub struct PagedResult<T> {
    /// Actual content.
    pub content: Vec<T>,
    /// Number of the page.
    pub page_number: u64,
    /// Desired size of the page.
    pub page_size: u64,
    /// Total number of pages.
    pub total_pages: u64,
    /// Total number of elements.
    pub total_items: u64,
}

impl<T> PagedResult<T> {
    pub fn new(content: Vec<T>, total_items: u64, page_size: u64, page_number: u64) -> Self {
        PagedResult {
            content,
            page_number,
            page_size,
            total_pages: total_items.div_ceil(page_size.max(1)),
            total_items,
        }
    }
}
