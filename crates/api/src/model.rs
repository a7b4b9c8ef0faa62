use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidateEmail, ValidationError, ValidationErrors};

use common::model::{
    ArticleFilters, ArticleStatus, ArticleUpdate, ArticleWithCategories, Category, CategoryUpdate,
    EmailNotification, NetworkUpdate, NewArticle, NewCategory, NewNetwork, NewNotification,
    Network, PagedResult,
};

/// Standard response envelope: `{ success, data?, message?, errors?, meta? }`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ListMeta>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListMeta {
    pub total: u64,
    pub page: u64,
    pub per_page: u64,
    pub total_pages: u64,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        ApiResponse {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: None,
        }
    }
}

impl<T: Serialize> ApiResponse<Vec<T>> {
    /// Envelope a page: content as `data`, pagination bookkeeping as `meta`.
    pub fn page(page: PagedResult<T>) -> Self {
        let meta = ListMeta {
            total: page.total_items,
            page: page.page_number,
            per_page: page.page_size,
            total_pages: page.total_pages,
        };

        ApiResponse {
            success: true,
            data: Some(page.content),
            message: None,
            errors: None,
            meta: Some(meta),
        }
    }
}

/// Full unfiltered sets for the admin dashboard; notifications capped by the
/// caller.
#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub articles: Vec<ArticleWithCategories>,
    pub categories: Vec<Category>,
    pub networks: Vec<Network>,
    pub notifications: Vec<EmailNotification>,
}

/// Article listing parameters, as sent by the admin client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleQuery {
    pub search: Option<String>,
    pub status: Option<ArticleStatus>,
    pub network: Option<String>,
    pub featured: Option<bool>,
    /// Comma-separated category ids.
    pub categories: Option<String>,
    page: Option<u64>,
    per_page: Option<u64>,
}

impl ArticleQuery {
    pub fn get_page(&self) -> u64 {
        self.page.unwrap_or(1).max(1)
    }

    pub fn get_size(&self) -> u64 {
        self.per_page.unwrap_or(20).max(1)
    }

    pub fn filters(&self) -> ArticleFilters {
        ArticleFilters {
            search: self.search.clone().filter(|search| !search.is_empty()),
            status: self.status,
            network: self.network.clone().filter(|network| !network.is_empty()),
            featured: self.featured,
            categories: self
                .categories
                .as_deref()
                .map(|raw| {
                    raw.split(',')
                        .filter(|token| !token.is_empty())
                        .map(str::to_owned)
                        .collect()
                })
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateArticleRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Content is required"))]
    pub content: String,
    #[validate(length(min = 1, message = "Excerpt is required"))]
    pub excerpt: String,
    #[validate(length(min = 1, message = "Author is required"))]
    pub author: String,
    #[validate(length(min = 1, message = "Network ID is required"))]
    pub network: String,
    #[serde(default)]
    pub status: ArticleStatus,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub category_ids: Vec<String>,
}

impl CreateArticleRequest {
    pub fn into_new_article(self) -> NewArticle {
        NewArticle {
            title: self.title,
            content: self.content,
            excerpt: self.excerpt,
            author: self.author,
            network: self.network,
            status: self.status,
            featured: self.featured,
            category_ids: self.category_ids,
        }
    }
}

/// Partial article update. An absent or null `publishedAt` leaves the stored
/// value untouched; a present `categoryIds` replaces the whole set.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticleRequest {
    #[validate(length(min = 1, max = 200, message = "Title is required"))]
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

impl UpdateArticleRequest {
    pub fn into_update(self) -> ArticleUpdate {
        ArticleUpdate {
            title: self.title,
            content: self.content,
            excerpt: self.excerpt,
            author: self.author,
            network: self.network,
            status: self.status,
            featured: self.featured,
            published_at: self.published_at,
            category_ids: self.category_ids,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct BulkStatusRequest {
    #[validate(length(min = 1, message = "At least one article id is required"))]
    pub ids: Vec<String>,
    pub status: ArticleStatus,
}

/// Bulk-import payload: an array of loosely-typed article-like records.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub articles: Vec<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct ImportReport {
    pub success: u64,
    pub errors: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Slug is required"))]
    pub slug: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(custom(function = "validate_hex_color", message = "Invalid hex color"))]
    pub color: String,
}

impl CreateCategoryRequest {
    pub fn into_new_category(self) -> NewCategory {
        NewCategory {
            name: self.name,
            slug: self.slug,
            description: self.description,
            color: self.color,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_hex_color", message = "Invalid hex color"))]
    pub color: Option<String>,
}

impl UpdateCategoryRequest {
    pub fn into_update(self) -> CategoryUpdate {
        CategoryUpdate {
            name: self.name,
            slug: self.slug,
            description: self.description,
            color: self.color,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateNetworkRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

impl CreateNetworkRequest {
    pub fn into_new_network(self) -> NewNetwork {
        NewNetwork {
            name: self.name,
            description: self.description,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateNetworkRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

impl UpdateNetworkRequest {
    pub fn into_update(self) -> NetworkUpdate {
        NetworkUpdate {
            name: self.name,
            description: self.description,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationRequest {
    #[validate(custom(function = "validate_uuid", message = "articleId must be a valid UUID"))]
    pub article_id: String,
    #[validate(
        length(min = 1, message = "At least one recipient is required"),
        custom(
            function = "validate_recipients",
            message = "Recipients must be valid email addresses"
        )
    )]
    pub recipients: Vec<String>,
    #[validate(length(min = 1, message = "Subject is required"))]
    pub subject: String,
}

impl SendNotificationRequest {
    pub fn into_new_notification(self) -> NewNotification {
        NewNotification {
            article_id: self.article_id,
            recipients: self.recipients,
            subject: self.subject,
        }
    }
}

/// Flatten validation failures into the `field: message` strings of the 400
/// payload.
pub fn validation_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(move |error| match &error.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", error.code),
            })
        })
        .collect();
    messages.sort();

    messages
}

fn validate_hex_color(color: &str) -> Result<(), ValidationError> {
    let digits = color
        .strip_prefix('#')
        .ok_or_else(|| ValidationError::new("hex_color"))?;

    let well_formed = (digits.len() == 3 || digits.len() == 6)
        && digits.chars().all(|c| c.is_ascii_hexdigit());
    if well_formed {
        Ok(())
    } else {
        Err(ValidationError::new("hex_color"))
    }
}

fn validate_uuid(id: &str) -> Result<(), ValidationError> {
    Uuid::parse_str(id)
        .map(|_| ())
        .map_err(|_| ValidationError::new("uuid"))
}

fn validate_recipients(recipients: &[String]) -> Result<(), ValidationError> {
    if recipients.iter().all(|address| address.validate_email()) {
        Ok(())
    } else {
        Err(ValidationError::new("email"))
    }
}
