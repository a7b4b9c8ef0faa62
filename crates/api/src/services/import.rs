use serde_json::Value;

use common::model::{ArticleStatus, Category, Network, NewArticle};
use common::{articles, categories, networks, Pool};

use crate::model::ImportReport;

/// Run the bulk-import flow: map every loose record to a draft article,
/// insert the well-formed ones, report the rest per-record. Partial success
/// is a normal outcome.
#[tracing::instrument(skip(db, records))]
pub async fn import_articles(db: &Pool, records: &[Value]) -> Result<ImportReport, common::DbError> {
    let categories = categories::select_all(db).await?;
    let networks = networks::select_all(db).await?;

    let mut success = 0;
    let mut errors = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let prepared = prepare_article(record, &categories, &networks);

        if let Some(reason) = missing_required_fields(&prepared) {
            errors.push(format!("article {}: {reason}", index + 1));
            continue;
        }

        match articles::insert_article(db, &prepared).await {
            Ok(_) => success += 1,
            Err(error) => errors.push(format!("article {}: {error}", index + 1)),
        }
    }

    tracing::info!(
        "Imported {success} article(s), {} rejected",
        errors.len()
    );

    Ok(ImportReport { success, errors })
}

/// Map one loose record to a draft article. The category resolves by slug or
/// name (first match or none); the network by name or id, falling back to the
/// first known network.
pub fn prepare_article(
    record: &Value,
    categories: &[Category],
    networks: &[Network],
) -> NewArticle {
    let category = record
        .get("category")
        .and_then(Value::as_str)
        .and_then(|wanted| {
            categories
                .iter()
                .find(|category| category.slug == wanted || category.name == wanted)
        });

    let network = record
        .get("network")
        .and_then(Value::as_str)
        .and_then(|wanted| {
            networks
                .iter()
                .find(|network| network.name == wanted || network.id == wanted)
        })
        .or_else(|| networks.first());

    NewArticle {
        title: string_field(record, "title", ""),
        content: string_field(record, "content", ""),
        excerpt: string_field(record, "excerpt", ""),
        author: string_field(record, "author", "Import"),
        network: network.map(|network| network.id.clone()).unwrap_or_default(),
        status: ArticleStatus::Draft,
        featured: false,
        category_ids: category
            .map(|category| vec![category.id.clone()])
            .unwrap_or_default(),
    }
}

fn missing_required_fields(article: &NewArticle) -> Option<String> {
    let mut missing = Vec::new();
    if article.title.is_empty() {
        missing.push("Title is required");
    }
    if article.content.is_empty() {
        missing.push("Content is required");
    }
    if article.excerpt.is_empty() {
        missing.push("Excerpt is required");
    }
    if article.network.is_empty() {
        missing.push("Network ID is required");
    }

    if missing.is_empty() {
        None
    } else {
        Some(missing.join(", "))
    }
}

/// Stringify a loose scalar; empty-ish values fall back to the default.
fn string_field(record: &Value, key: &str, fallback: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_owned(),
        _ => fallback.to_owned(),
    }
}
