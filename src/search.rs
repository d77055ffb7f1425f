use crate::api::User;

/// Derived view of the collection: every user whose name or email contains
/// the case-folded term as a substring. An empty term matches everything.
pub fn filter_users<'a>(users: &'a [User], term: &str) -> Vec<&'a User> {
    let q = term.to_lowercase();
    if q.is_empty() {
        return users.iter().collect();
    }
    users
        .iter()
        .filter(|u| u.name.to_lowercase().contains(&q) || u.email.to_lowercase().contains(&q))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mk_user(id: u64, name: &str, email: &str) -> User {
        User {
            id,
            name: name.to_string(),
            email: email.to_string(),
            ..User::default()
        }
    }

    #[test]
    fn empty_term_yields_full_collection() {
        let users = vec![mk_user(1, "Ana", "ana@x.com"), mk_user(2, "Bo", "bo@y.com")];
        let visible = filter_users(&users, "");
        assert_eq!(visible.len(), 2);
    }

    #[test]
    fn matches_name_case_insensitively() {
        let users = vec![mk_user(1, "Ana", "ana@x.com"), mk_user(2, "Bo", "bo@y.com")];
        let visible = filter_users(&users, "AN");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, 1);
    }

    #[test]
    fn matches_email_when_name_does_not() {
        let users = vec![mk_user(1, "Ana", "ana@x.com"), mk_user(2, "Bo", "bo@y.com")];
        let visible = filter_users(&users, "y.com");
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].name, "Bo");
    }

    #[test]
    fn unmatched_term_yields_nothing() {
        let users = vec![mk_user(1, "Ana", "ana@x.com")];
        assert!(filter_users(&users, "zzz").is_empty());
    }
}
