use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::error::{AppError, ErrorKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NameError {
    #[error("Please enter your name to start.")]
    Empty,
}

impl From<NameError> for AppError {
    fn from(e: NameError) -> Self {
        AppError::new(ErrorKind::Validation, e.to_string())
    }
}

/// A user's display name: trimmed, never empty.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First character, upper-cased, for the avatar badge.
    pub fn initial(&self) -> String {
        self.0
            .chars()
            .next()
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }
}

impl TryFrom<String> for DisplayName {
    type Error = NameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DisplayName> for String {
    fn from(name: DisplayName) -> Self {
        name.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// Names are personal data; keep them out of logs.
impl fmt::Debug for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DisplayName({} chars)", self.0.chars().count())
    }
}

/// The registration screen's input buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub name: String,
}

impl RegistrationForm {
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Mirrors the disabled state of the register button.
    pub fn can_submit(&self) -> bool {
        !self.name.trim().is_empty()
    }

    pub fn submit(&self) -> Result<DisplayName, NameError> {
        DisplayName::parse(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trims_surrounding_whitespace() {
        let name = DisplayName::parse("  Sopheap \n").unwrap();
        assert_eq!(name.as_str(), "Sopheap");
    }

    #[test]
    fn parse_rejects_blank_names() {
        assert_eq!(DisplayName::parse(""), Err(NameError::Empty));
        assert_eq!(DisplayName::parse("   \t"), Err(NameError::Empty));
    }

    #[test]
    fn initial_is_uppercased() {
        assert_eq!(DisplayName::parse("bopha").unwrap().initial(), "B");
    }

    #[test]
    fn debug_output_hides_the_name() {
        let name = DisplayName::parse("Visoth").unwrap();
        assert!(!format!("{name:?}").contains("Visoth"));
    }

    #[test]
    fn form_tracks_submit_availability() {
        let mut form = RegistrationForm::default();
        assert!(!form.can_submit());
        form.set_name("   ");
        assert!(!form.can_submit());
        assert!(form.submit().is_err());
        form.set_name(" Sambath ");
        assert!(form.can_submit());
        assert_eq!(form.submit().unwrap().as_str(), "Sambath");
    }

    #[test]
    fn deserializing_enforces_validation() {
        assert!(serde_json::from_str::<DisplayName>("\"  \"").is_err());
        let name: DisplayName = serde_json::from_str("\" Bopha \"").unwrap();
        assert_eq!(name.as_str(), "Bopha");
    }
}
