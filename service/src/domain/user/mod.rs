//! [`User`] definitions.

pub mod session;

use std::sync::LazyLock;

#[cfg(doc)]
use common::DateTime;
use common::{unit, DateTimeOf};
use derive_more::{AsRef, Display, From, FromStr, Into};
#[cfg(feature = "postgres")]
use postgres_types::{FromSql, ToSql};
use regex::Regex;
use secrecy::{zeroize::Zeroize, CloneableSecret};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use xxhash_rust::xxh3;

pub use self::session::Session;

/// Authentication identity a [`Client`] may sign in as.
///
/// Contact information lives on the [`Client`] itself.
///
/// [`Client`]: crate::domain::Client
#[derive(Clone, Debug, From)]
pub struct User {
    /// ID of this [`User`]
    pub id: Id,

    /// [`Name`] of this [`User`].
    pub name: Name,

    /// [`Login`] of this [`User`].
    pub login: Login,

    /// [`PasswordHash`] of this [`User`].
    pub password_hash: PasswordHash,

    /// [`DateTime`] when this [`User`] was created.
    pub created_at: CreationDateTime,
}

/// ID of a [`User`].
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    From,
    FromStr,
    Hash,
    Into,
    PartialEq,
    Serialize,
)]
#[cfg_attr(feature = "postgres", derive(ToSql, FromSql), postgres(transparent))]
pub struct Id(Uuid);

impl Id {
    /// Creates a new random [`Id`].
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Name of a [`User`].
#[derive(AsRef, Clone, Debug, Display, Eq, PartialEq)]
#[as_ref(str, String)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Name(String);

impl Name {
    /// Creates a new [`Name`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `name` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Creates a new [`Name`] if the given `name` is valid.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Option<Self> {
        let name = name.into();
        Self::check(&name).then_some(Self(name))
    }

    /// Checks whether the given `name` is a valid [`Name`].
    fn check(name: impl AsRef<str>) -> bool {
        let name = name.as_ref();
        name.trim() == name && !name.is_empty() && name.len() <= 512
    }
}

impl FromStr for Name {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Name`")
    }
}

/// Login of a [`User`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct Login(String);

impl Login {
    /// Creates a new [`Login`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `login` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(login: impl Into<String>) -> Self {
        Self(login.into())
    }

    /// Creates a new [`Login`] if the given `login` is valid.
    #[must_use]
    pub fn new(login: impl Into<String>) -> Option<Self> {
        let login = login.into();
        Self::check(&login).then_some(Self(login))
    }

    /// Checks whether the given `login` is a valid [`Login`].
    fn check(login: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Login`] invariants:
        /// - Must not be empty;
        /// - Must not start/end with whitespace;
        /// - Must not contain consecutive whitespace;
        /// - Must not contain control characters;
        /// - Must not contain special characters;
        /// - Must be between 1 and 20 characters long.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^\S[\p{L}\p{N}]{0,98}\S$").expect("valid regex")
        });

        REGEX.is_match(login.as_ref())
    }
}

impl FromStr for Login {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Login`")
    }
}

/// Password of a [`User`].
#[derive(Clone, Debug, Display, Eq, From, PartialEq)]
#[from(&str, String)]
pub struct Password(String);

impl Password {
    /// Creates a new [`Password`].
    ///
    /// # Safety
    ///
    /// The caller must ensure that the given `password` matches the format.
    #[expect(unsafe_code, reason = "bypass")]
    #[must_use]
    pub unsafe fn new_unchecked(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// Creates a new [`Password`] if the given `password` is valid.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Option<Self> {
        let password = password.into();
        Self::check(&password).then_some(Self(password))
    }

    /// Checks whether the given `password` is a valid [`Password`].
    fn check(password: impl AsRef<str>) -> bool {
        let password = password.as_ref();
        password.len() > 1 && password.len() <= 128
    }
}

impl FromStr for Password {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid `Password`")
    }
}

impl CloneableSecret for Password {}
impl Zeroize for Password {
    fn zeroize(&mut self) {
        self.0.zeroize();
    }
}

/// Password hash of a [`User`].
#[derive(Clone, Debug, Display, Eq, PartialEq)]
#[cfg_attr(feature = "postgres", derive(FromSql, ToSql), postgres(transparent))]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Creates a new [`PasswordHash`] from the given [`Password`].
    #[must_use]
    pub fn new(password: &Password) -> Self {
        // TODO: Use `argon2` or any other secure hashing algorithm.
        Self(format!("{:032x}", xxh3::xxh3_128(password.0.as_bytes())))
    }
}

/// [`DateTime`] when a [`User`] was created.
pub type CreationDateTime = DateTimeOf<(User, unit::Creation)>;
