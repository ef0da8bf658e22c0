//! Read-side views over a listed set of projects: search, category filter, totals and the
//! contributor leaderboard.

use crate::domain::project::ProjectRecord;
use serde::Serialize;
use utoipa::ToSchema;

/// Filter value that matches every category.
pub const ALL_CATEGORIES: &str = "All";
pub const DEFAULT_TOP_CONTRIBUTORS: usize = 5;

/// Case-insensitive substring search over name and description, plus exact category match.
pub fn filter_projects<'a>(
    projects: &'a [ProjectRecord],
    search: Option<&str>,
    category: Option<&str>,
) -> Vec<&'a ProjectRecord> {
    let needle = search.map(|s| s.trim().to_lowercase()).unwrap_or_default();
    let category = category
        .map(str::trim)
        .filter(|c| !c.is_empty() && !c.eq_ignore_ascii_case(ALL_CATEGORIES));

    projects
        .iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.description.to_lowercase().contains(&needle)
        })
        .filter(|p| category.map_or(true, |c| p.category == c))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ContributorEntry {
    pub address: String,
    pub percentage: f64,
    pub project_name: String,
}

/// The `limit` largest allocations across all projects.
pub fn top_contributors(projects: &[ProjectRecord], limit: usize) -> Vec<ContributorEntry> {
    let mut entries: Vec<ContributorEntry> = projects
        .iter()
        .flat_map(|p| {
            p.contributors.iter().map(move |c| ContributorEntry {
                address: c.address.clone(),
                percentage: c.percentage,
                project_name: p.name.clone(),
            })
        })
        .collect();
    entries.sort_by(|a, b| b.percentage.total_cmp(&a.percentage));
    entries.truncate(limit);
    entries
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct RegistryStats {
    pub projects: usize,
    pub contributors: usize,
    pub total_shares: u64,
}

impl RegistryStats {
    pub fn from_projects(projects: &[ProjectRecord]) -> Self {
        Self {
            projects: projects.len(),
            contributors: projects.iter().map(|p| p.contributors.len()).sum(),
            total_shares: projects
                .iter()
                .fold(0u64, |acc, p| acc.saturating_add(p.total_shares)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::Contributor;

    fn project(name: &str, description: &str, category: &str, shares: &[f64]) -> ProjectRecord {
        ProjectRecord {
            id: name.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            encrypted_shares: String::new(),
            total_shares: 1000,
            owner: "0xowner".to_string(),
            timestamp: 0,
            category: category.to_string(),
            contributors: shares
                .iter()
                .enumerate()
                .map(|(i, pct)| Contributor {
                    address: format!("0x{}{}", name, i),
                    encrypted_shares: String::new(),
                    percentage: *pct,
                })
                .collect(),
        }
    }

    #[test]
    fn search_and_category() {
        let projects = vec![
            project("Quantum", "entanglement lab", "Physics", &[]),
            project("Enzymes", "QUANTUM tunnelling in enzymes", "Biotech", &[]),
            project("Primes", "number theory", "Mathematics", &[]),
        ];

        let hits = filter_projects(&projects, Some("quantum"), None);
        assert_eq!(hits.len(), 2);

        let hits = filter_projects(&projects, Some("quantum"), Some("Biotech"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name, "Enzymes");

        assert_eq!(filter_projects(&projects, None, Some("All")).len(), 3);
        assert_eq!(filter_projects(&projects, Some(""), Some("")).len(), 3);
        assert!(filter_projects(&projects, Some("zzz"), None).is_empty());
    }

    #[test]
    fn leaderboard_takes_largest_allocations() {
        let projects = vec![
            project("A", "", "AI", &[10.0, 50.0, 1.0]),
            project("B", "", "AI", &[30.0, 20.0, 40.0]),
        ];
        let top = top_contributors(&projects, DEFAULT_TOP_CONTRIBUTORS);
        let pcts: Vec<f64> = top.iter().map(|e| e.percentage).collect();
        assert_eq!(pcts, vec![50.0, 40.0, 30.0, 20.0, 10.0]);
        assert_eq!(top[0].project_name, "A");
    }

    #[test]
    fn stats_sum_up() {
        let projects = vec![project("A", "", "AI", &[1.0, 2.0]), project("B", "", "AI", &[3.0])];
        let stats = RegistryStats::from_projects(&projects);
        assert_eq!(
            stats,
            RegistryStats {
                projects: 2,
                contributors: 3,
                total_shares: 2000
            }
        );
    }
}
