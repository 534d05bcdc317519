use std::fmt;

/// Bearer credential supplied by the host application.
///
/// The token is never printed; `Debug` is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn token(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Authentication state handed to the client and the engine at construction
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Unauthenticated,
    Authenticated(Credential),
}

impl AuthState {
    pub fn authenticated(token: impl Into<String>) -> Self {
        Self::Authenticated(Credential::new(token))
    }

    /// Blank or missing tokens count as unauthenticated
    pub fn from_token(token: Option<String>) -> Self {
        match token {
            Some(token) if !token.trim().is_empty() => Self::Authenticated(Credential::new(token.trim())),
            _ => Self::Unauthenticated,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }

    pub fn credential(&self) -> Option<&Credential> {
        match self {
            Self::Authenticated(credential) => Some(credential),
            Self::Unauthenticated => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_is_redacted() {
        let auth = AuthState::authenticated("secret-token");
        let printed = format!("{:?}", auth);
        assert!(!printed.contains("secret-token"));
        assert!(printed.contains("***"));
    }

    #[test]
    fn test_blank_token_is_unauthenticated() {
        assert!(!AuthState::from_token(None).is_authenticated());
        assert!(!AuthState::from_token(Some("   ".to_string())).is_authenticated());

        let auth = AuthState::from_token(Some(" abc ".to_string()));
        assert_eq!(auth.credential().map(Credential::token), Some("abc"));
    }
}
