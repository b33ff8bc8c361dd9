//! User data model.
//!
//! Constructors validate raw inputs so handlers can reject bad payloads before
//! talking to a port. The password is an opaque secret: it is zeroised on drop
//! and redacted from `Debug` output.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use zeroize::Zeroizing;

use super::{PokemonDetail, PokemonId};

/// Maximum allowed length for a display name.
pub const DISPLAY_NAME_MAX: usize = 100;
/// Maximum allowed length for an email address.
pub const EMAIL_MAX: usize = 200;
/// Minimum allowed length for a password.
pub const PASSWORD_MIN: usize = 6;
/// Maximum allowed length for a password.
pub const PASSWORD_MAX: usize = 200;

/// Validation errors returned by the user constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    InvalidId,
    EmptyName,
    NameTooLong { max: usize },
    EmptyEmail,
    EmailTooLong { max: usize },
    InvalidEmail,
    PasswordTooShort { min: usize },
    PasswordTooLong { max: usize },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidId => write!(f, "user id must be a positive integer"),
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::NameTooLong { max } => write!(f, "name must be at most {max} characters"),
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::InvalidEmail => write!(f, "email must be a valid email address"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
            Self::PasswordTooLong { max } => {
                write!(f, "password must be at most {max} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Store-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UserId(i32);

impl UserId {
    /// Validate and wrap a raw identifier.
    pub fn new(value: i32) -> Result<Self, UserValidationError> {
        if value <= 0 {
            return Err(UserValidationError::InvalidId);
        }
        Ok(Self(value))
    }

    /// Raw identifier value.
    #[must_use]
    pub fn get(self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Human readable name of the trainer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    /// Trim and validate a display name.
    pub fn new(name: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyName);
        }
        if trimmed.chars().count() > DISPLAY_NAME_MAX {
            return Err(UserValidationError::NameTooLong {
                max: DISPLAY_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wrap a name read back from storage without re-validating it.
    #[must_use]
    pub fn from_stored(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

impl AsRef<str> for DisplayName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        // Shape check only; deliverability is not verified.
        let pattern = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";
        Regex::new(pattern).unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// Email address used as the user's uniqueness key.
///
/// # Examples
/// ```
/// use trainer_roster::domain::EmailAddress;
///
/// let email = EmailAddress::new(" ash@pallet.town ").expect("valid email");
/// assert_eq!(email.as_ref(), "ash@pallet.town");
/// assert!(EmailAddress::new("not-an-email").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Trim and validate an email address.
    pub fn new(email: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = email.as_ref().trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::EmptyEmail);
        }
        if trimmed.chars().count() > EMAIL_MAX {
            return Err(UserValidationError::EmailTooLong { max: EMAIL_MAX });
        }
        if !email_regex().is_match(trimmed) {
            return Err(UserValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Wrap an address read back from storage without re-validating it.
    ///
    /// Rows written by earlier schema revisions may predate the shape check.
    #[must_use]
    pub fn from_stored(email: impl Into<String>) -> Self {
        Self(email.into())
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

/// Opaque user secret.
///
/// Whitespace is preserved so stored credentials match what the caller sent.
#[derive(Clone, PartialEq, Eq)]
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate password length.
    pub fn new(password: impl Into<String>) -> Result<Self, UserValidationError> {
        let password = Zeroizing::new(password.into());
        let length = password.chars().count();
        if length < PASSWORD_MIN {
            return Err(UserValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }
        if length > PASSWORD_MAX {
            return Err(UserValidationError::PasswordTooLong { max: PASSWORD_MAX });
        }
        Ok(Self(password))
    }

    /// Wrap a stored credential as-is; length rules apply to new input only.
    #[must_use]
    pub fn from_stored(password: impl Into<String>) -> Self {
        Self(Zeroizing::new(password.into()))
    }

    /// Expose the secret for persistence adapters.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Validated input for registering a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: DisplayName,
    /// Unique email address.
    pub email: EmailAddress,
    /// Secret credential.
    pub password: Password,
    /// Associated Pokemon.
    pub pokemon_ids: Vec<PokemonId>,
}

/// Stored user record.
///
/// ## Invariants
/// - `pokemon_ids` is never "absent"; stores normalise missing arrays to an
///   empty vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    name: DisplayName,
    email: EmailAddress,
    password: Password,
    pokemon_ids: Vec<PokemonId>,
}

impl User {
    /// Assemble a stored record from its identifier and validated fields.
    #[must_use]
    pub fn new(id: UserId, fields: NewUser) -> Self {
        let NewUser {
            name,
            email,
            password,
            pokemon_ids,
        } = fields;
        Self {
            id,
            name,
            email,
            password,
            pokemon_ids,
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Email address.
    #[must_use]
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// Secret credential.
    #[must_use]
    pub fn password(&self) -> &Password {
        &self.password
    }

    /// Associated Pokemon identifiers.
    #[must_use]
    pub fn pokemon_ids(&self) -> &[PokemonId] {
        &self.pokemon_ids
    }

    /// Return a copy of this record with every field present in `patch`
    /// replaced wholesale.
    ///
    /// # Examples
    /// ```
    /// use trainer_roster::domain::{
    ///     DisplayName, EmailAddress, NewUser, Password, User, UserId, UserPatch,
    /// };
    ///
    /// let user = User::new(
    ///     UserId::new(1).expect("id"),
    ///     NewUser {
    ///         name: DisplayName::new("Ash").expect("name"),
    ///         email: EmailAddress::new("ash@pallet.town").expect("email"),
    ///         password: Password::new("pikachu").expect("password"),
    ///         pokemon_ids: Vec::new(),
    ///     },
    /// );
    /// let patch = UserPatch {
    ///     name: Some(DisplayName::new("Red").expect("name")),
    ///     ..UserPatch::default()
    /// };
    /// let updated = user.clone().merged(patch);
    /// assert_eq!(updated.name().as_ref(), "Red");
    /// assert_eq!(updated.email(), user.email());
    /// ```
    #[must_use]
    pub fn merged(self, patch: UserPatch) -> Self {
        let UserPatch {
            name,
            email,
            password,
            pokemon_ids,
        } = patch;
        Self {
            id: self.id,
            name: name.unwrap_or(self.name),
            email: email.unwrap_or(self.email),
            password: password.unwrap_or(self.password),
            pokemon_ids: pokemon_ids.unwrap_or(self.pokemon_ids),
        }
    }
}

/// Partial update where `Some` replaces the stored field and `None` keeps it.
///
/// The Pokemon ID list is replaced as a whole, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement display name.
    pub name: Option<DisplayName>,
    /// Replacement email.
    pub email: Option<EmailAddress>,
    /// Replacement password.
    pub password: Option<Password>,
    /// Replacement Pokemon ID list.
    pub pokemon_ids: Option<Vec<PokemonId>>,
}

impl UserPatch {
    /// Whether the patch carries no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.password.is_none()
            && self.pokemon_ids.is_none()
    }
}

/// Read model combining a user's public fields with resolved catalog details.
///
/// `pokemon_details` is `None` when enrichment was not attempted (the create
/// path) and `Some` on read paths, holding only the lookups that succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserView {
    /// Identifier.
    pub id: UserId,
    /// Display name.
    pub name: DisplayName,
    /// Email address.
    pub email: EmailAddress,
    /// Stored Pokemon identifiers.
    pub pokemon_ids: Vec<PokemonId>,
    /// Resolved catalog details.
    pub pokemon_details: Option<Vec<PokemonDetail>>,
}

impl UserView {
    /// Attach resolved catalog details.
    #[must_use]
    pub fn with_details(mut self, details: Vec<PokemonDetail>) -> Self {
        self.pokemon_details = Some(details);
        self
    }
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            pokemon_ids: user.pokemon_ids.clone(),
            pokemon_details: None,
        }
    }
}
