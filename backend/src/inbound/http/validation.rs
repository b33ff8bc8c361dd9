//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure renders as `invalid_request` with `details.field` naming the
//! offending JSON field and `details.code` a stable machine-readable reason.

use serde_json::json;

use crate::domain::{
    DisplayName, EmailAddress, Error, Password, PokemonId, UserId, UserValidationError,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    Empty,
    TooLong,
    TooShort,
    InvalidEmail,
    InvalidId,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::Empty => "empty",
            Self::TooLong => "too_long",
            Self::TooShort => "too_short",
            Self::InvalidEmail => "invalid_email",
            Self::InvalidId => "invalid_id",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) const NAME: FieldName = FieldName::new("name");
pub(crate) const EMAIL: FieldName = FieldName::new("email");
pub(crate) const PASSWORD: FieldName = FieldName::new("password");
pub(crate) const POKEMON_IDS: FieldName = FieldName::new("pokemonIds");
pub(crate) const ID: FieldName = FieldName::new("id");

fn field_error(field: FieldName, code: ValidationCode, message: impl Into<String>) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {name}"),
    )
}

/// Render a domain validation failure against the field it was raised for.
pub(crate) fn user_validation_error(field: FieldName, error: UserValidationError) -> Error {
    let code = match error {
        UserValidationError::EmptyName | UserValidationError::EmptyEmail => ValidationCode::Empty,
        UserValidationError::NameTooLong { .. }
        | UserValidationError::EmailTooLong { .. }
        | UserValidationError::PasswordTooLong { .. } => ValidationCode::TooLong,
        UserValidationError::PasswordTooShort { .. } => ValidationCode::TooShort,
        UserValidationError::InvalidEmail => ValidationCode::InvalidEmail,
        UserValidationError::InvalidId => ValidationCode::InvalidId,
    };
    field_error(field, code, error.to_string())
}

pub(crate) fn parse_user_id(raw: i32) -> Result<UserId, Error> {
    UserId::new(raw).map_err(|err| user_validation_error(ID, err))
}

pub(crate) fn parse_name(raw: &str) -> Result<DisplayName, Error> {
    DisplayName::new(raw).map_err(|err| user_validation_error(NAME, err))
}

pub(crate) fn parse_email(raw: &str) -> Result<EmailAddress, Error> {
    EmailAddress::new(raw).map_err(|err| user_validation_error(EMAIL, err))
}

pub(crate) fn parse_password(raw: String) -> Result<Password, Error> {
    Password::new(raw).map_err(|err| user_validation_error(PASSWORD, err))
}

/// Validate every identifier, reporting the index of the first bad entry.
pub(crate) fn parse_pokemon_ids(values: Vec<i64>) -> Result<Vec<PokemonId>, Error> {
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            PokemonId::try_from(value).map_err(|err| {
                Error::invalid_request(err.to_string()).with_details(json!({
                    "field": POKEMON_IDS.as_str(),
                    "index": index,
                    "value": value,
                    "code": ValidationCode::InvalidId.as_str(),
                }))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for validation error rendering.
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    fn detail<'a>(error: &'a Error, key: &str) -> Option<&'a str> {
        error.details().and_then(|value| value.get(key)?.as_str())
    }

    #[rstest]
    #[case::blank_name(parse_name("   ").expect_err("blank"), "name", "empty")]
    #[case::bad_email(parse_email("ash").expect_err("no @"), "email", "invalid_email")]
    #[case::short_password(
        parse_password("12345".to_owned()).expect_err("short"),
        "password",
        "too_short"
    )]
    #[case::zero_id(parse_user_id(0).expect_err("zero"), "id", "invalid_id")]
    #[case::missing(missing_field_error(EMAIL), "email", "missing_field")]
    fn failures_name_field_and_code(
        #[case] error: Error,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
        assert_eq!(detail(&error, "field"), Some(field));
        assert_eq!(detail(&error, "code"), Some(code));
    }

    #[rstest]
    fn long_names_are_too_long() {
        let error = parse_name(&"n".repeat(101)).expect_err("too long");
        assert_eq!(detail(&error, "code"), Some("too_long"));
    }

    #[rstest]
    fn pokemon_id_errors_report_the_index() {
        let error = parse_pokemon_ids(vec![1, 25, -4]).expect_err("negative id");

        assert_eq!(detail(&error, "field"), Some("pokemonIds"));
        let details = error.details().expect("details present");
        assert_eq!(details["index"], 2);
        assert_eq!(details["value"], -4);
    }

    #[rstest]
    fn pokemon_ids_accept_positive_values() {
        let ids = parse_pokemon_ids(vec![1, 25, 150]).expect("valid ids");
        assert_eq!(ids.len(), 3);
    }
}
