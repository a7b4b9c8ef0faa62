use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::model::{ArticleStatus, ArticleWithCategories, Category, Network};

/// Article counts grouped for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_articles: u64,
    pub by_status: StatusBreakdown,
    /// Network name to number of articles referencing it.
    pub by_network: BTreeMap<String, u64>,
    /// Category name to number of articles holding it. An article counts
    /// once per category it belongs to.
    pub by_category: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub struct StatusBreakdown {
    pub draft: u64,
    pub published: u64,
    pub archived: u64,
}

/// Compute the dashboard aggregation from the full unfiltered collections.
/// Every known network and category is present in the output, zero included.
/// Articles referencing an unknown network contribute to no network entry.
pub fn dashboard_stats(
    articles: &[ArticleWithCategories],
    categories: &[Category],
    networks: &[Network],
) -> DashboardStats {
    let mut by_status = StatusBreakdown {
        draft: 0,
        published: 0,
        archived: 0,
    };

    let mut by_network: BTreeMap<String, u64> = networks
        .iter()
        .map(|network| (network.name.clone(), 0))
        .collect();
    let mut by_category: BTreeMap<String, u64> = categories
        .iter()
        .map(|category| (category.name.clone(), 0))
        .collect();

    let network_names: HashMap<&str, &str> = networks
        .iter()
        .map(|network| (network.id.as_str(), network.name.as_str()))
        .collect();

    for entry in articles {
        match entry.article.status {
            ArticleStatus::Draft => by_status.draft += 1,
            ArticleStatus::Published => by_status.published += 1,
            ArticleStatus::Archived => by_status.archived += 1,
        }

        if let Some(name) = network_names.get(entry.article.network.as_str()) {
            *by_network.entry((*name).to_owned()).or_insert(0) += 1;
        }

        for category in &entry.categories {
            *by_category.entry(category.name.clone()).or_insert(0) += 1;
        }
    }

    DashboardStats {
        total_articles: articles.len() as u64,
        by_status,
        by_network,
        by_category,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use speculoos::prelude::*;

    use super::*;
    use crate::model::Article;

    fn network(id: &str, name: &str) -> Network {
        Network {
            id: id.to_owned(),
            name: name.to_owned(),
            description: String::new(),
        }
    }

    fn category(id: &str, name: &str) -> Category {
        Category {
            id: id.to_owned(),
            name: name.to_owned(),
            slug: name.to_lowercase(),
            description: String::new(),
            color: "#000000".to_owned(),
        }
    }

    fn article(
        id: &str,
        status: ArticleStatus,
        network: &str,
        categories: Vec<Category>,
    ) -> ArticleWithCategories {
        let timestamp = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        ArticleWithCategories {
            article: Article {
                id: id.to_owned(),
                title: String::new(),
                content: String::new(),
                excerpt: String::new(),
                author: String::new(),
                network: network.to_owned(),
                status,
                featured: false,
                published_at: None,
                created_at: timestamp,
                updated_at: timestamp,
            },
            categories,
        }
    }

    #[test]
    fn empty_input_still_carries_every_known_key() {
        let networks = vec![network("n1", "Global"), network("n2", "Local")];
        let categories = vec![category("c1", "Tech")];

        let stats = dashboard_stats(&[], &categories, &networks);

        assert_that!(stats.total_articles).is_equal_to(0);
        assert_that!(stats.by_status.draft).is_equal_to(0);
        assert_that!(stats.by_status.published).is_equal_to(0);
        assert_that!(stats.by_status.archived).is_equal_to(0);
        assert_that!(stats.by_network.get("Global")).is_some().is_equal_to(&0);
        assert_that!(stats.by_network.get("Local")).is_some().is_equal_to(&0);
        assert_that!(stats.by_category.get("Tech")).is_some().is_equal_to(&0);
    }

    #[test]
    fn status_counts_sum_to_the_total() {
        let networks = vec![network("n1", "Global")];
        let categories = vec![category("c1", "Tech")];
        let articles = vec![
            article("a1", ArticleStatus::Published, "n1", vec![]),
            article("a2", ArticleStatus::Published, "n1", vec![]),
            article("a3", ArticleStatus::Draft, "n1", vec![]),
            article("a4", ArticleStatus::Archived, "n1", vec![]),
        ];

        let stats = dashboard_stats(&articles, &categories, &networks);

        assert_that!(stats.total_articles).is_equal_to(4);
        let summed =
            stats.by_status.draft + stats.by_status.published + stats.by_status.archived;
        assert_that!(summed).is_equal_to(stats.total_articles);
    }

    #[test]
    fn article_counts_once_per_held_category() {
        let networks = vec![network("n1", "Global")];
        let tech = category("c1", "Tech");
        let science = category("c2", "Science");
        let categories = vec![tech.clone(), science.clone()];

        let articles = vec![
            article(
                "a1",
                ArticleStatus::Published,
                "n1",
                vec![tech.clone(), science.clone()],
            ),
            article("a2", ArticleStatus::Draft, "n1", vec![tech.clone()]),
        ];

        let stats = dashboard_stats(&articles, &categories, &networks);

        assert_that!(stats.by_category.get("Tech")).is_some().is_equal_to(&2);
        assert_that!(stats.by_category.get("Science")).is_some().is_equal_to(&1);
    }

    #[test]
    fn unknown_network_reference_counts_nowhere() {
        let networks = vec![network("n1", "Global")];
        let articles = vec![
            article("a1", ArticleStatus::Published, "n1", vec![]),
            article("a2", ArticleStatus::Published, "gone", vec![]),
        ];

        let stats = dashboard_stats(&articles, &[], &networks);

        assert_that!(stats.by_network.get("Global")).is_some().is_equal_to(&1);
        assert_that!(stats.by_network.len()).is_equal_to(1);
        assert_that!(stats.total_articles).is_equal_to(2);
    }
}
