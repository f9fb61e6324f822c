use reqwest::Url;
use serde::Deserialize;

/// Number of most-recently-updated repositories considered per user.
pub const MAX_REPOSITORIES: u32 = 20;

const MAX_LOGIN_LEN: usize = 39;

/// The subset of the GitHub repository object we read.
#[derive(Debug, Deserialize)]
pub struct RepositoryRow {
    pub name: String,
    pub description: Option<String>,
}

impl RepositoryRow {
    /// `"name: description"`, or the bare name when there is no description.
    pub fn summary(&self) -> String {
        match self.description.as_deref().map(str::trim) {
            Some(description) if !description.is_empty() => {
                format!("{}: {}", self.name, description)
            }
            _ => self.name.clone(),
        }
    }
}

/// GitHub logins: alphanumerics and single inner hyphens, at most 39 chars.
pub fn is_valid_login(login: &str) -> bool {
    !login.is_empty()
        && login.len() <= MAX_LOGIN_LEN
        && !login.starts_with('-')
        && !login.ends_with('-')
        && !login.contains("--")
        && login.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
}

/// Extracts the login from a profile URL such as `https://github.com/octocat`
/// (trailing path segments are ignored). A bare login is accepted as-is.
pub fn github_username_from_url(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if is_valid_login(input) {
        return Some(input.to_string());
    }

    let url = Url::parse(input)
        .or_else(|_| Url::parse(&format!("https://{input}")))
        .ok()?;
    let host = url.host_str()?.trim_start_matches("www.");
    if host != "github.com" {
        return None;
    }

    let login = url.path_segments()?.find(|s| !s.is_empty())?;
    is_valid_login(login).then(|| login.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_with_description() {
        let row = RepositoryRow {
            name: "foo".to_string(),
            description: Some("A CLI tool in Go".to_string()),
        };
        assert_eq!(row.summary(), "foo: A CLI tool in Go");
    }

    #[test]
    fn test_summary_falls_back_to_name() {
        let none = RepositoryRow {
            name: "foo".to_string(),
            description: None,
        };
        let blank = RepositoryRow {
            name: "bar".to_string(),
            description: Some("  ".to_string()),
        };
        assert_eq!(none.summary(), "foo");
        assert_eq!(blank.summary(), "bar");
    }

    #[test]
    fn test_username_from_profile_urls() {
        assert_eq!(
            github_username_from_url("https://github.com/octocat").as_deref(),
            Some("octocat")
        );
        assert_eq!(
            github_username_from_url("https://www.github.com/octo-cat/?tab=repositories").as_deref(),
            Some("octo-cat")
        );
        assert_eq!(
            github_username_from_url("github.com/octocat/hello-world").as_deref(),
            Some("octocat")
        );
        assert_eq!(github_username_from_url("octocat").as_deref(), Some("octocat"));
    }

    #[test]
    fn test_username_rejects_other_hosts_and_bad_logins() {
        assert_eq!(github_username_from_url("https://gitlab.com/octocat"), None);
        assert_eq!(github_username_from_url("https://github.com/"), None);
        assert_eq!(github_username_from_url(""), None);
        assert!(!is_valid_login("-leading"));
        assert!(!is_valid_login("double--hyphen"));
        assert!(!is_valid_login("../etc"));
        assert!(!is_valid_login(&"a".repeat(40)));
    }
}
