//! Notification fan-out for newly posted projects.
//!
//! Matching rule: the project's category appearing (case-insensitive
//! substring) in a freelancer's category or skills text, OR any
//! comma/whitespace-delimited token of the required-skills string longer
//! than two characters appearing in either field. No scoring; the first
//! qualifying rule sends exactly one notification per freelancer.

use rusqlite::Connection;
use tracing::debug;

use lancer_core::errors::MarketResult;
use lancer_core::types::project::Project;
use lancer_core::types::user::User;
use lancer_storage::queries::{notifications, users};

pub(crate) const KIND_PROJECT_MATCH: &str = "PROJECT_MATCH";

/// Notify every skill/category-matched active freelancer about `project`.
pub(crate) fn notify_matched_freelancers(
    conn: &Connection,
    project: &Project,
) -> MarketResult<usize> {
    let skills_required = project.skills_required.as_deref().unwrap_or("");
    let category = project.category.as_deref().unwrap_or("");
    if skills_required.trim().is_empty() && category.trim().is_empty() {
        return Ok(0);
    }

    let body = format!(
        "\"{}\" budget {} to {}",
        project.title, project.budget_min, project.budget_max
    );

    let mut sent = 0;
    for freelancer in users::list_active_freelancers(conn)? {
        if is_skill_match(&freelancer, skills_required, category) {
            notifications::insert(
                conn,
                freelancer.id,
                "New project matching your skills",
                &body,
                KIND_PROJECT_MATCH,
                Some("/freelancer/browse"),
            )?;
            sent += 1;
        }
    }
    debug!(project = %project.id, sent, "project match fan-out");
    Ok(sent)
}

fn is_skill_match(freelancer: &User, skills_required: &str, category: &str) -> bool {
    let freelancer_skills = freelancer.skills.as_deref().unwrap_or("").to_lowercase();
    let freelancer_category = freelancer.category.as_deref().unwrap_or("").to_lowercase();

    if !category.trim().is_empty() {
        let needle = category.to_lowercase();
        if freelancer_category.contains(&needle) || freelancer_skills.contains(&needle) {
            return true;
        }
    }

    skills_required
        .to_lowercase()
        .split([',', ' ', '\t', '\n'])
        .filter(|token| token.len() > 2)
        .any(|token| freelancer_skills.contains(token) || freelancer_category.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use lancer_core::types::user::Role;
    use lancer_core::{Money, UserId};

    fn freelancer(skills: &str, category: &str) -> User {
        User {
            id: UserId(1),
            username: "f".into(),
            email: "f@example.com".into(),
            role: Role::Freelancer,
            full_name: None,
            skills: Some(skills.to_string()),
            category: Some(category.to_string()),
            location: None,
            hourly_rate: Money::ZERO,
            wallet_balance: Money::ZERO,
            performance_score: 5.0,
            completed_projects: 0,
            is_active: true,
            is_verified: false,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn category_substring_matches_either_field() {
        let f = freelancer("rust, sql", "Web Development");
        assert!(is_skill_match(&f, "", "web"));
        assert!(is_skill_match(&f, "", "SQL"));
        assert!(!is_skill_match(&f, "", "embedded"));
    }

    #[test]
    fn skill_tokens_shorter_than_three_chars_are_ignored() {
        let f = freelancer("go, c", "systems");
        // "go" and "c" are too short to be meaningful tokens.
        assert!(!is_skill_match(&f, "go, c", ""));
        assert!(is_skill_match(&f, "systems programming", ""));
    }

    #[test]
    fn token_split_handles_commas_and_whitespace() {
        let f = freelancer("react typescript", "");
        assert!(is_skill_match(&f, "node,react", ""));
        assert!(is_skill_match(&f, "vue\ttypescript", ""));
    }
}
