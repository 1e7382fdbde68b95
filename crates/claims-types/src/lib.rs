//! # Claims Types
//!
//! Small value types shared by the claims crates:
//! - [`NonEmptyText`] for inputs that must carry content (emails, tokens)
//! - [`TriState`] and [`Gender`], the coded values the backend stores as integers
//! - [`Coerced`], a value that is either coded or kept verbatim when coercion did not apply

use serde::ser::{Serialize, Serializer};

/// Errors that can occur when creating validated text types.
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    /// The input text was empty or contained only whitespace
    #[error("Text cannot be empty")]
    Empty,
}

/// A string type that guarantees non-empty content.
///
/// This type wraps a `String` and ensures it contains at least one non-whitespace character.
/// The input is trimmed of leading and trailing whitespace during construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonEmptyText(String);

impl NonEmptyText {
    /// Creates a new `NonEmptyText` from the given input.
    ///
    /// The input is trimmed of leading and trailing whitespace. If the trimmed
    /// result is empty, an error is returned.
    ///
    /// # Arguments
    ///
    /// * `input` - Any type that can be converted to a string reference
    ///
    /// # Returns
    ///
    /// Returns `Ok(NonEmptyText)` if the trimmed input is non-empty,
    /// or `Err(TextError::Empty)` if it's empty or contains only whitespace.
    pub fn new(input: impl AsRef<str>) -> Result<Self, TextError> {
        let trimmed = input.as_ref().trim();
        if trimmed.is_empty() {
            return Err(TextError::Empty);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the inner string as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NonEmptyText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for NonEmptyText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Serialize for NonEmptyText {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> serde::Deserialize<'de> for NonEmptyText {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NonEmptyText::new(&s).map_err(serde::de::Error::custom)
    }
}

/// A yes/no flag that may also be absent.
///
/// On the wire `Yes` is `1`, `No` is `2` and `Absent` is `null`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TriState {
    Yes,
    No,
    #[default]
    Absent,
}

impl TriState {
    /// Wire code, or `None` for `Absent`.
    pub fn code(self) -> Option<u8> {
        match self {
            TriState::Yes => Some(1),
            TriState::No => Some(2),
            TriState::Absent => None,
        }
    }

    /// Inverse of [`TriState::code`].
    ///
    /// # Arguments
    ///
    /// * `code` - Integer as stored by the backend
    ///
    /// # Returns
    ///
    /// `Yes` for `1`, `No` for `2`, and `Absent` for anything else.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => TriState::Yes,
            2 => TriState::No,
            _ => TriState::Absent,
        }
    }

    /// Text that coerces back to this value.
    pub fn as_text(self) -> &'static str {
        match self {
            TriState::Yes => "Yes",
            TriState::No => "No",
            TriState::Absent => "",
        }
    }
}

impl Serialize for TriState {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self.code() {
            Some(code) => serializer.serialize_u8(code),
            None => serializer.serialize_none(),
        }
    }
}

/// Coded gender as stored by the backend (`1` male, `2` female).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Wire code: `1` for male, `2` for female.
    pub fn code(self) -> u8 {
        match self {
            Gender::Male => 1,
            Gender::Female => 2,
        }
    }

    /// Inverse of [`Gender::code`].
    ///
    /// # Arguments
    ///
    /// * `code` - Integer as stored by the backend
    ///
    /// # Returns
    ///
    /// `Some(Gender)` for `1` or `2`, `None` for any other code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Gender::Male),
            2 => Some(Gender::Female),
            _ => None,
        }
    }

    /// Text that coerces back to this value, as shown in the claim form.
    pub fn as_text(self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
        }
    }
}

impl Serialize for Gender {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

/// A field value after best-effort coercion.
///
/// `Coded` holds the coerced value; `Verbatim` keeps the (trimmed) input when it
/// could not be coerced. Serialises as the inner value or as a plain string.
#[derive(Clone, Debug, PartialEq)]
pub enum Coerced<T> {
    Coded(T),
    Verbatim(String),
}

impl<T> Coerced<T> {
    /// The coded value, or `None` if the input was kept verbatim.
    pub fn coded(&self) -> Option<&T> {
        match self {
            Coerced::Coded(value) => Some(value),
            Coerced::Verbatim(_) => None,
        }
    }
}

impl<T: Serialize> Serialize for Coerced<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Coerced::Coded(value) => value.serialize(serializer),
            Coerced::Verbatim(raw) => serializer.serialize_str(raw),
        }
    }
}
