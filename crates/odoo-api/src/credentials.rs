//! Credentials sent with every model call.

use std::fmt;

use odoo_xmlrpc::Value;

/// Database, user id and password, as Odoo's `execute_kw` expects them.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Database name (case sensitive).
    pub database: String,
    /// Database id of the user.
    pub user_id: i64,
    /// Password or API key of the user.
    pub password: String,
}

impl Credentials {
    /// Creates new credentials.
    pub fn new(database: impl Into<String>, user_id: i64, password: impl Into<String>) -> Self {
        Self {
            database: database.into(),
            user_id,
            password: password.into(),
        }
    }

    /// The three leading `execute_kw` parameters.
    pub(crate) fn params(&self) -> [Value; 3] {
        [
            Value::from(&self.database),
            Value::Int(self.user_id),
            Value::from(&self.password),
        ]
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("database", &self.database)
            .field("user_id", &self.user_id)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_order() {
        let credentials = Credentials::new("db", 2, "pw");
        assert_eq!(
            credentials.params(),
            [Value::from("db"), Value::Int(2), Value::from("pw")]
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let credentials = Credentials::new("db", 2, "hunter2");
        assert!(!format!("{credentials:?}").contains("hunter2"));
    }
}
