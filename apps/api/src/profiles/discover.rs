//! Talent discovery: filtering and ranking of public profiles.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::profiles::models::UserProfile;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscoverQuery {
    /// Case-insensitive name substring.
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub year: Option<u8>,
    #[serde(default)]
    pub skill: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoverResponse {
    pub profiles: Vec<UserProfile>,
    /// Every skill name present across all profiles, for the filter menu.
    pub skills: Vec<String>,
}

/// Applies the filters and orders matches by overall rating, best first.
/// Profiles that were never analyzed sort last.
pub fn discover(profiles: Vec<UserProfile>, query: &DiscoverQuery) -> DiscoverResponse {
    let skills = skill_facets(&profiles);

    let needle = query
        .q
        .as_deref()
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());
    let skill = query.skill.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let mut matches: Vec<UserProfile> = profiles
        .into_iter()
        .filter(|p| match &needle {
            Some(needle) => p
                .name
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(needle)),
            None => true,
        })
        .filter(|p| query.year.map_or(true, |year| p.year == Some(year)))
        .filter(|p| skill.map_or(true, |skill| p.has_skill(skill)))
        .map(UserProfile::public)
        .collect();

    matches.sort_by(|a, b| by_rating_desc(a.overall_rating, b.overall_rating));

    DiscoverResponse {
        profiles: matches,
        skills,
    }
}

fn by_rating_desc(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Distinct skill names, case-insensitively deduplicated, sorted.
fn skill_facets(profiles: &[UserProfile]) -> Vec<String> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    for skill in profiles.iter().flat_map(|p| p.skills.iter().flatten()) {
        seen.entry(skill.name.to_lowercase())
            .or_insert_with(|| skill.name.clone());
    }
    seen.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::models::Skill;

    fn profile(uid: &str, name: &str, year: u8, rating: Option<f64>, skills: &[&str]) -> UserProfile {
        UserProfile {
            uid: uid.to_string(),
            name: Some(name.to_string()),
            email: Some(format!("{uid}@college.edu")),
            year: Some(year),
            overall_rating: rating,
            skills: Some(
                skills
                    .iter()
                    .map(|s| Skill {
                        name: s.to_string(),
                        rating: 3,
                        evidence: "repo".to_string(),
                    })
                    .collect(),
            ),
            ..Default::default()
        }
    }

    fn pool() -> Vec<UserProfile> {
        vec![
            profile("a", "Asha Verma", 3, Some(3.5), &["Rust", "SQL"]),
            profile("b", "Bilal Khan", 2, Some(4.5), &["Python", "rust"]),
            profile("c", "Chitra Rao", 3, None, &[]),
            profile("d", "Dev Ashok", 1, Some(2.0), &["Go"]),
        ]
    }

    fn uids(resp: &DiscoverResponse) -> Vec<&str> {
        resp.profiles.iter().map(|p| p.uid.as_str()).collect()
    }

    #[test]
    fn test_orders_by_rating_with_unanalyzed_last() {
        let resp = discover(pool(), &DiscoverQuery::default());
        assert_eq!(uids(&resp), vec!["b", "a", "d", "c"]);
    }

    #[test]
    fn test_name_search_is_case_insensitive_substring() {
        let query = DiscoverQuery {
            q: Some("ASH".to_string()),
            ..Default::default()
        };
        assert_eq!(uids(&discover(pool(), &query)), vec!["a", "d"]);
    }

    #[test]
    fn test_year_and_skill_filters_combine() {
        let query = DiscoverQuery {
            year: Some(3),
            skill: Some("RUST".to_string()),
            ..Default::default()
        };
        assert_eq!(uids(&discover(pool(), &query)), vec!["a"]);
    }

    #[test]
    fn test_facets_cover_all_profiles_and_emails_are_hidden() {
        let query = DiscoverQuery {
            year: Some(1),
            ..Default::default()
        };
        let resp = discover(pool(), &query);
        assert_eq!(resp.skills, vec!["Go", "Python", "Rust", "SQL"]);
        assert!(resp.profiles.iter().all(|p| p.email.is_none()));
    }
}
