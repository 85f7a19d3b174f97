//! User data model.
//!
//! A user is identified by their email address. Phone and location are
//! optional; alerts are only sent to users that have a phone, and only users
//! with a stored point take part in SOS proximity searches.

use std::fmt;

use crate::domain::GeoPoint;

/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 254;
/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 64;
/// Maximum allowed length for a phone number.
pub const PHONE_MAX: usize = 32;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyEmail,
    InvalidEmail,
    EmailTooLong { max: usize },
    EmptyPhone,
    PhoneTooLong { max: usize },
    PhoneInvalidCharacters,
    EmptyDisplayName,
    DisplayNameTooLong { max: usize },
    EmptyPasswordHash,
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::EmptyPhone => write!(f, "phone number must not be empty"),
            Self::PhoneTooLong { max } => {
                write!(f, "phone number must be at most {max} characters")
            }
            Self::PhoneInvalidCharacters => write!(
                f,
                "phone number may only contain digits, spaces, dashes, parentheses and a leading +",
            ),
            Self::EmptyDisplayName => write!(f, "display name must not be empty"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "display name must be at most {max} characters")
            }
            Self::EmptyPasswordHash => write!(f, "password hash must not be empty"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Normalised (trimmed, lower-cased) email address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Email(String);

impl Email {
    /// Validate and normalise an email address.
    ///
    /// # Examples
    /// ```
    /// use medcycle::domain::Email;
    ///
    /// let email = Email::new("  Asha@Example.COM ").expect("valid email");
    /// assert_eq!(email.as_ref(), "asha@example.com");
    /// ```
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let normalised = raw.as_ref().trim().to_lowercase();
        if normalised.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if normalised.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if normalised.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        match normalised.split_once('@') {
            Some((local, domain))
                if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
            {
                Ok(Self(normalised))
            }
            _ => Err(UserValidationError::InvalidEmail),
        }
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Phone number used as the messaging destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyPhone);
        }
        if trimmed.chars().count() > PHONE_MAX {
            return Err(UserValidationError::PhoneTooLong { max: PHONE_MAX });
        }
        let body = trimmed.strip_prefix('+').unwrap_or(trimmed);
        let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')');
        if !body.chars().all(allowed) || !body.chars().any(|c| c.is_ascii_digit()) {
            return Err(UserValidationError::PhoneInvalidCharacters);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human readable display name for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyDisplayName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Opaque credential hash (PHC string).
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    pub fn new(phc: impl Into<String>) -> Result<Self, UserValidationError> {
        let phc = phc.into();
        if phc.trim().is_empty() {
            return Err(UserValidationError::EmptyPasswordHash);
        }
        Ok(Self(phc))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Fields required to build a [`User`].
#[derive(Debug, Clone)]
pub struct UserDraft {
    pub email: Email,
    pub password_hash: PasswordHash,
    pub display_name: Option<DisplayName>,
    pub phone: Option<PhoneNumber>,
    pub location: Option<GeoPoint>,
}

/// Registered application user.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    email: Email,
    password_hash: PasswordHash,
    display_name: Option<DisplayName>,
    phone: Option<PhoneNumber>,
    location: Option<GeoPoint>,
}

impl User {
    pub fn new(draft: UserDraft) -> Self {
        let UserDraft {
            email,
            password_hash,
            display_name,
            phone,
            location,
        } = draft;
        Self {
            email,
            password_hash,
            display_name,
            phone,
            location,
        }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn display_name(&self) -> Option<&DisplayName> {
        self.display_name.as_ref()
    }

    pub fn phone(&self) -> Option<&PhoneNumber> {
        self.phone.as_ref()
    }

    pub fn location(&self) -> Option<GeoPoint> {
        self.location
    }

    /// Name shown to other users: the display name, else the email.
    pub fn public_name(&self) -> &str {
        self.display_name
            .as_ref()
            .map_or_else(|| self.email.as_ref(), AsRef::as_ref)
    }
}
