use super::validation::{email, optional, required};
use crate::api::{LoginRequest, PasswordChange, ProfileUpdate, RegisterRequest};
use crate::utils::ValidationError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoginForm {
    pub username: Option<String>,
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: None,
            email: email.into(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> Result<LoginRequest, ValidationError> {
        let email = email("email", &self.email)?;
        // passwords are sent as typed
        if self.password.is_empty() {
            return Err(ValidationError::Required("password"));
        }

        Ok(LoginRequest {
            username: optional(self.username.as_deref()),
            email,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub address: String,
    pub password: String,
    pub confirm_password: String,
}

impl RegisterForm {
    pub fn validate(&self) -> Result<RegisterRequest, ValidationError> {
        let name = required("name", &self.name)?;
        let email = email("email", &self.email)?;
        let address = required("address", &self.address)?;
        if self.password.is_empty() {
            return Err(ValidationError::Required("password"));
        }
        if self.password != self.confirm_password {
            return Err(ValidationError::PasswordMismatch);
        }

        Ok(RegisterRequest {
            name,
            email,
            address,
            password: self.password.clone(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub name: String,
    pub email: String,
    pub address: String,
}

impl ProfileForm {
    pub fn validate(&self) -> Result<ProfileUpdate, ValidationError> {
        Ok(ProfileUpdate {
            name: required("name", &self.name)?,
            email: email("email", &self.email)?,
            address: required("address", &self.address)?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PasswordChangeForm {
    pub current: String,
    pub new: String,
}

impl PasswordChangeForm {
    pub fn validate(&self) -> Result<PasswordChange, ValidationError> {
        if self.current.is_empty() {
            return Err(ValidationError::Required("current password"));
        }
        if self.new.is_empty() {
            return Err(ValidationError::Required("new password"));
        }

        Ok(PasswordChange {
            current: self.current.clone(),
            new: self.new.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_login_requires_valid_email_and_password() {
        assert_eq!(
            LoginForm::new("", "secret").validate(),
            Err(ValidationError::Required("email"))
        );
        assert_eq!(
            LoginForm::new("nope", "secret").validate(),
            Err(ValidationError::InvalidEmail)
        );
        assert_eq!(
            LoginForm::new("a@b.com", "").validate(),
            Err(ValidationError::Required("password"))
        );

        let request = LoginForm::new(" a@b.com ", "secret").validate().unwrap();
        assert_eq!(request.email, "a@b.com");
        assert_eq!(request.username, None);
    }

    #[test]
    fn test_register_password_mismatch() {
        let form = RegisterForm {
            name: "Ana".into(),
            email: "ana@example.com".into(),
            address: "Calle 1".into(),
            password: "one".into(),
            confirm_password: "two".into(),
        };
        assert_eq!(form.validate(), Err(ValidationError::PasswordMismatch));

        let ok = RegisterForm {
            confirm_password: "one".into(),
            ..form
        };
        assert_eq!(ok.validate().unwrap().password, "one");
    }

    #[test]
    fn test_password_change_needs_both() {
        let form = PasswordChangeForm {
            current: "old".into(),
            new: String::new(),
        };
        assert_eq!(form.validate(), Err(ValidationError::Required("new password")));
    }
}
