use std::fmt;

use crate::{
    error::SignUpError,
    identity::{Metadata, NewIdentity},
    users::Role,
};

/// A sign-up request.
///
/// # Examples
/// ```
/// use mycel_auth::{accounts::SignUp, users::Role};
///
/// let req = SignUp::new("driver@example.com", "hunter22", "Dana", Role::Driver)
///     .with_phone("+44 20 7946 0018");
/// assert_eq!(req.phone.as_deref(), Some("+44 20 7946 0018"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    pub name: String,
    pub phone: Option<String>,
    pub role: Role,
}

impl SignUp {
    pub fn new<E, P, N>(email: E, password: P, name: N, role: Role) -> Self
    where
        E: Into<String>,
        P: Into<String>,
        N: Into<String>,
    {
        Self {
            email: email.into(),
            password: password.into(),
            name: name.into(),
            phone: None,
            role,
        }
    }

    pub fn with_phone<S: Into<String>>(mut self, phone: S) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub(crate) fn validate(&self) -> Result<(), SignUpError> {
        let email = self.email.trim();
        if email.is_empty() {
            return Err(SignUpError::Invalid("email is required".to_string()));
        }
        if !email.contains('@') {
            return Err(SignUpError::Invalid(format!(
                "{email:?} is not an email address"
            )));
        }
        if self.password.is_empty() {
            return Err(SignUpError::Invalid("password is required".to_string()));
        }
        if self.name.trim().is_empty() {
            return Err(SignUpError::Invalid("name is required".to_string()));
        }
        Ok(())
    }

    pub(crate) fn to_identity(&self) -> NewIdentity {
        NewIdentity::confirmed(
            self.email.trim(),
            self.password.clone(),
            Metadata {
                name: Some(self.name.trim().to_string()),
                phone: self.phone.clone(),
                role: Some(self.role.to_string()),
            },
        )
    }
}

impl fmt::Debug for SignUp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignUp")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("phone", &self.phone)
            .field("role", &self.role)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate() {
        let ok = SignUp::new("a@example.com", "pw", "Ana", Role::Sales);
        assert!(ok.validate().is_ok());

        for req in [
            SignUp::new(" ", "pw", "Ana", Role::Sales),
            SignUp::new("not-an-email", "pw", "Ana", Role::Sales),
            SignUp::new("a@example.com", "", "Ana", Role::Sales),
            SignUp::new("a@example.com", "pw", "  ", Role::Sales),
        ] {
            assert!(matches!(req.validate(), Err(SignUpError::Invalid(_))), "{req:?}");
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let req = SignUp::new("a@example.com", "hunter22", "Ana", Role::Sales);
        let debug = format!("{req:?}");
        assert!(!debug.contains("hunter22"));
        assert!(debug.contains("a@example.com"));
    }

    #[test]
    fn test_to_identity_confirms_email() {
        let req = SignUp::new(" a@example.com ", "pw", "Ana", Role::Customer).with_phone("555");
        let identity = req.to_identity();
        assert!(identity.email_confirm);
        assert_eq!(identity.email, "a@example.com");
        assert_eq!(identity.user_metadata.role.as_deref(), Some("customer"));
        assert_eq!(identity.user_metadata.phone.as_deref(), Some("555"));
    }
}
