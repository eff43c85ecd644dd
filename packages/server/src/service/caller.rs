/// Identity of whoever is invoking a service operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Caller {
    Anonymous,
    User { username: String },
}

impl Caller {
    pub fn user(username: impl Into<String>) -> Self {
        Caller::User {
            username: username.into(),
        }
    }

    /// Username of an authenticated caller.
    pub fn username(&self) -> Option<&str> {
        match self {
            Caller::Anonymous => None,
            Caller::User { username } => Some(username),
        }
    }
}
