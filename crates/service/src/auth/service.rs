use std::sync::Arc;

use tracing::{info, instrument};

use super::allow_list::AllowList;
use super::errors::AuthError;

/// Auth business service independent of web framework
#[derive(Clone)]
pub struct AuthService {
    allow_list: Arc<AllowList>,
}

impl AuthService {
    pub fn new(allow_list: Arc<AllowList>) -> Self { Self { allow_list } }

    /// Accept `student_id` iff it is on the allow-list; returns the id back.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AllowList, AuthService};
    /// use std::sync::Arc;
    /// let list: AllowList = ["S1".to_string()].into_iter().collect();
    /// let svc = AuthService::new(Arc::new(list));
    /// assert_eq!(svc.login("S1").unwrap(), "S1");
    /// assert!(svc.login("unknown-id").is_err());
    /// ```
    #[instrument(skip(self))]
    pub fn login(&self, student_id: &str) -> Result<String, AuthError> {
        if !self.allow_list.contains(student_id) {
            info!("login_rejected");
            return Err(AuthError::Unauthorized);
        }
        info!("login_accepted");
        Ok(student_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn svc() -> AuthService {
        let list: AllowList = ["1001", "1002"].into_iter().map(String::from).collect();
        AuthService::new(Arc::new(list))
    }

    #[test]
    fn allow_listed_id_is_accepted() {
        assert_eq!(svc().login("1002").unwrap(), "1002");
    }

    #[test]
    fn unknown_id_is_unauthorized() {
        let err = svc().login("unknown-id").unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
        assert_eq!(err.code(), 1004);
        assert!(matches!(svc().login(""), Err(AuthError::Unauthorized)));
    }
}
