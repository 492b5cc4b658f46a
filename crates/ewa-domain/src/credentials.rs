use serde::{Deserialize, Serialize};

/// Manager login pair: password plus the mobile number one-time codes go to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManagerCreds {
    pub password: String,
    pub mobile: String,
}

impl ManagerCreds {
    pub fn new(password: impl Into<String>, mobile: impl Into<String>) -> Self {
        Self {
            password: password.into(),
            mobile: mobile.into(),
        }
    }
}
