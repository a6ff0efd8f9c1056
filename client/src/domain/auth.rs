//! Authentication inputs: password login, SMS-code login and registration.
//!
//! Constructors validate raw strings before any request is built, so a
//! malformed form never reaches the network.

use thiserror::Error;
use zeroize::Zeroizing;

/// Error returned when authentication inputs are invalid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsValidationError {
    /// Mobile number was missing or blank once trimmed.
    #[error("mobile must not be empty")]
    EmptyMobile,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Verification code was missing or blank once trimmed.
    #[error("verification code must not be empty")]
    EmptyCode,
}

fn normalise_mobile(mobile: &str) -> Result<String, CredentialsValidationError> {
    let trimmed = mobile.trim();
    if trimmed.is_empty() {
        return Err(CredentialsValidationError::EmptyMobile);
    }
    Ok(trimmed.to_owned())
}

fn require_password(password: &str) -> Result<Zeroizing<String>, CredentialsValidationError> {
    if password.is_empty() {
        return Err(CredentialsValidationError::EmptyPassword);
    }
    Ok(Zeroizing::new(password.to_owned()))
}

/// Mobile + password credentials for `/login`.
///
/// ## Invariants
/// - `mobile` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use client::domain::PasswordCredentials;
///
/// let creds = PasswordCredentials::try_from_parts(" 13800000000 ", "secret").unwrap();
/// assert_eq!(creds.mobile(), "13800000000");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordCredentials {
    mobile: String,
    password: Zeroizing<String>,
}

impl PasswordCredentials {
    /// Construct credentials from raw form inputs.
    pub fn try_from_parts(mobile: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            mobile: normalise_mobile(mobile)?,
            password: require_password(password)?,
        })
    }

    /// Normalised mobile number.
    pub fn mobile(&self) -> &str {
        self.mobile.as_str()
    }

    /// Password as entered.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Mobile + SMS verification code credentials for `/login_code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeCredentials {
    mobile: String,
    code: String,
}

impl CodeCredentials {
    /// Construct credentials from raw form inputs; both parts are trimmed.
    pub fn try_from_parts(mobile: &str, code: &str) -> Result<Self, CredentialsValidationError> {
        let mobile = normalise_mobile(mobile)?;
        let code = code.trim();
        if code.is_empty() {
            return Err(CredentialsValidationError::EmptyCode);
        }
        Ok(Self {
            mobile,
            code: code.to_owned(),
        })
    }

    /// Normalised mobile number.
    pub fn mobile(&self) -> &str {
        self.mobile.as_str()
    }

    /// Verification code.
    pub fn code(&self) -> &str {
        self.code.as_str()
    }
}

/// Account registration form.
///
/// Only mobile and password are mandatory; the remaining fields are sent as
/// empty or zero values when not supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    mobile: String,
    password: Zeroizing<String>,
    pub username: String,
    pub real_name: String,
    pub age: i32,
    pub gender: i32,
    pub avatar: String,
    pub email: String,
}

impl Registration {
    /// Start a registration from the mandatory fields.
    pub fn try_new(mobile: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        Ok(Self {
            mobile: normalise_mobile(mobile)?,
            password: require_password(password)?,
            username: String::new(),
            real_name: String::new(),
            age: 0,
            gender: 0,
            avatar: String::new(),
            email: String::new(),
        })
    }

    /// Normalised mobile number.
    pub fn mobile(&self) -> &str {
        self.mobile.as_str()
    }

    /// Password as entered.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for credential validation.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyMobile)]
    #[case("   ", "pw", CredentialsValidationError::EmptyMobile)]
    #[case("13800000000", "", CredentialsValidationError::EmptyPassword)]
    fn invalid_password_credentials(
        #[case] mobile: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = PasswordCredentials::try_from_parts(mobile, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[test]
    fn password_whitespace_is_preserved() {
        let creds = PasswordCredentials::try_from_parts("13800000000", " pw ").expect("valid");
        assert_eq!(creds.password(), " pw ");
    }

    #[rstest]
    #[case(" 13800000000 ", " 123456 ", Ok(("13800000000", "123456")))]
    #[case("13800000000", "  ", Err(CredentialsValidationError::EmptyCode))]
    #[case("", "123456", Err(CredentialsValidationError::EmptyMobile))]
    fn code_credentials_trim_both_parts(
        #[case] mobile: &str,
        #[case] code: &str,
        #[case] expected: Result<(&str, &str), CredentialsValidationError>,
    ) {
        let parsed = CodeCredentials::try_from_parts(mobile, code);
        let actual = parsed
            .as_ref()
            .map(|creds| (creds.mobile(), creds.code()))
            .map_err(Clone::clone);
        assert_eq!(actual, expected);
    }

    #[test]
    fn registration_defaults_optional_fields() {
        let registration = Registration::try_new("13800000000", "pw").expect("valid");
        assert_eq!(registration.mobile(), "13800000000");
        assert!(registration.username.is_empty());
        assert_eq!(registration.age, 0);
    }
}
