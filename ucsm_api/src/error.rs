use std::fmt::{Debug, Display, Write};
use std::{borrow::Cow, panic::Location};

use serde::{ser::SerializeStruct, Deserialize, Serialize};
use strum_macros::IntoStaticStr;

use crate::config::boot_order::BootOrderError;

/// A parent organization or managed object could not be found.
#[derive(Debug, Eq, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum NotFoundError {
    #[error("org '{dn}' does not exist")]
    Org { dn: String },
    #[error("Boot Policy '{dn}' does not exist")]
    BootPolicy { dn: String },
    #[error("Managed object '{dn}' does not exist")]
    ManagedObject { dn: String },
}

/// A required argument was not supplied.
#[derive(Debug, Eq, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum MissingArgumentError {
    #[error("Required parameter '{0}' missing")]
    Parameter(String),
    #[error("Required parameter {} missing.", quote_alternatives(.0))]
    OneOf(Vec<String>),
    #[error("missing 1 required positional argument: '{0}'")]
    Positional(String),
}

impl MissingArgumentError {
    /// Shorthand for `OneOf` over static parameter names.
    pub fn one_of(names: &[&str]) -> Self {
        Self::OneOf(names.iter().map(|n| n.to_string()).collect())
    }
}

/// Renders `['a', 'b', 'c']` as `'a', 'b' or 'c'`.
fn quote_alternatives(names: &[String]) -> String {
    let quoted: Vec<String> = names.iter().map(|n| format!("'{n}'")).collect();
    match quoted.split_last() {
        Some((last, rest)) if !rest.is_empty() => format!("{} or {}", rest.join(", "), last),
        Some((last, _)) => last.clone(),
        None => String::new(),
    }
}

/// The target object is in a mode that does not allow the operation.
#[derive(Debug, Eq, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum ModeMismatchError {
    #[error("boot mode should be equal to 'uefi' to configure boot security")]
    BootSecurity,
}

/// The input names something this crate does not know about.
#[derive(Debug, Eq, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownError {
    #[error("Invalid Device {0}")]
    Device(String),
}

/// A backend call failed.
#[derive(Debug, Eq, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum BackendError {
    #[error("Failed to query '{dn}'")]
    QueryDn { dn: String },
    #[error("Failed to query children of '{dn}'")]
    QueryChildren { dn: String },
    #[error("Failed to query hierarchy of '{dn}'")]
    QueryHierarchy { dn: String },
    #[error("Failed to stage creation of '{dn}'")]
    AddMo { dn: String },
    #[error("Failed to stage update of '{dn}'")]
    SetMo { dn: String },
    #[error("Failed to stage removal of '{dn}'")]
    RemoveMo { dn: String },
    #[error("Failed to commit pending changes")]
    Commit,
}

#[derive(Debug, Eq, thiserror::Error, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum InternalError {
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Each variant of `ErrorKind` corresponds to a different category of error.
#[derive(Debug, Eq, thiserror::Error, IntoStaticStr, PartialEq)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    /// A parent org or the target object is missing.
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    /// The device list violates a boot order rule.
    #[error(transparent)]
    InvariantViolation(#[from] BootOrderError),

    /// A required argument is missing.
    #[error(transparent)]
    MissingArgument(#[from] MissingArgumentError),

    /// The target object is in the wrong mode for the operation.
    #[error(transparent)]
    ModeMismatch(#[from] ModeMismatchError),

    /// Unrecognized input.
    #[error(transparent)]
    Unknown(#[from] UnknownError),

    /// The backend failed. The cause is attached to the error.
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A bug was encountered.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

#[derive(Debug)]
struct OperationErrorInner {
    caller: Cow<'static, str>,
    kind: ErrorKind,
    location: &'static Location<'static>,
    source: Option<anyhow::Error>,
    context: Vec<(Cow<'static, str>, &'static Location<'static>)>,
}

/// The single error type returned by every operation. It carries the name of
/// the operation that failed (`caller`) and the categorized reason.
///
/// Displays as `<caller> failed, error: <message>`.
pub struct OperationError(Box<OperationErrorInner>);

impl OperationError {
    #[track_caller]
    pub fn new(caller: impl Into<Cow<'static, str>>, kind: impl Into<ErrorKind>) -> Self {
        OperationError(Box::new(OperationErrorInner {
            caller: caller.into(),
            kind: kind.into(),
            location: Location::caller(),
            source: None,
            context: Vec::new(),
        }))
    }

    #[track_caller]
    pub fn internal(caller: impl Into<Cow<'static, str>>, body: impl Into<String>) -> Self {
        Self::new(caller, InternalError::Internal(body.into()))
    }

    /// Name of the operation that failed.
    pub fn caller(&self) -> &str {
        &self.0.caller
    }

    /// Returns a reference to the inner ErrorKind.
    pub fn kind(&self) -> &ErrorKind {
        &self.0.kind
    }

    /// The human-readable reason, without the caller.
    pub fn message(&self) -> String {
        self.0.kind.to_string()
    }
}

pub trait ReportError<T, K> {
    /// Convert this error into a structured OperationError.
    fn structured(
        self,
        caller: impl Into<Cow<'static, str>>,
        kind: K,
    ) -> Result<T, OperationError>;
}

impl<T, K> ReportError<T, K> for Option<T>
where
    K: Into<ErrorKind>,
{
    #[track_caller]
    fn structured(
        self,
        caller: impl Into<Cow<'static, str>>,
        kind: K,
    ) -> Result<T, OperationError> {
        match self {
            Some(t) => Ok(t),
            None => Err(OperationError(Box::new(OperationErrorInner {
                caller: caller.into(),
                kind: kind.into(),
                location: Location::caller(),
                source: None,
                context: Vec::new(),
            }))),
        }
    }
}

impl<T, E, K> ReportError<T, K> for Result<T, E>
where
    E: Into<anyhow::Error>,
    K: Into<ErrorKind>,
{
    #[track_caller]
    fn structured(
        self,
        caller: impl Into<Cow<'static, str>>,
        kind: K,
    ) -> Result<T, OperationError> {
        match self {
            Ok(o) => Ok(o),
            Err(e) => Err(OperationError(Box::new(OperationErrorInner {
                caller: caller.into(),
                kind: kind.into(),
                location: Location::caller(),
                source: Some(e.into()),
                context: Vec::new(),
            }))),
        }
    }
}

pub trait OperationResultExt<T> {
    /// Attach a context message to the error.
    fn message(self, context: impl Into<Cow<'static, str>>) -> Result<T, OperationError>;
}

impl<T> OperationResultExt<T> for Result<T, OperationError> {
    #[track_caller]
    fn message(mut self, context: impl Into<Cow<'static, str>>) -> Result<T, OperationError> {
        if let Err(ref mut e) = self {
            e.0.context.push((context.into(), Location::caller()));
        }
        self
    }
}

impl Serialize for OperationError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("operation-error", 6)?;
        state.serialize_field("caller", &self.0.caller)?;
        state.serialize_field("message", &self.0.kind.to_string())?;
        match self.0.kind {
            ErrorKind::NotFound(ref e) => state.serialize_field("error", e)?,
            ErrorKind::InvariantViolation(ref e) => state.serialize_field("error", e)?,
            ErrorKind::MissingArgument(ref e) => state.serialize_field("error", e)?,
            ErrorKind::ModeMismatch(ref e) => state.serialize_field("error", e)?,
            ErrorKind::Unknown(ref e) => state.serialize_field("error", e)?,
            ErrorKind::Backend(ref e) => state.serialize_field("error", e)?,
            ErrorKind::Internal(ref e) => state.serialize_field("error", e)?,
        }
        state.serialize_field("category", <&str>::from(&self.0.kind))?;
        state.serialize_field(
            "location",
            &format!("{}:{}", self.0.location.file(), self.0.location.line()),
        )?;
        match self.0.source {
            Some(ref e) => state.serialize_field("cause", &Some(format!("{:?}", e)))?,
            None => state.serialize_field("cause", &None::<String>)?,
        }
        state.end()
    }
}

impl Display for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed, error: {}", self.0.caller, self.0.kind)
    }
}

impl Debug for OperationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} at {}:{}",
            self,
            self.0.location.file(),
            self.0.location.line()
        )?;

        if !self.0.context.is_empty() {
            writeln!(f, "\n\nContext:")?;
            for (i, (context, location)) in self.0.context.iter().enumerate() {
                for (j, line) in context.split('\n').enumerate() {
                    if j == 0 {
                        write!(f, "{: >5}: ", i)?;
                    } else {
                        f.write_str("\n       ")?;
                    }
                    f.write_str(line)?;
                }
                writeln!(f, " at {}:{}", location.file(), location.line())?;
            }
        }

        if let Some(ref source) = self.0.source {
            writeln!(f, "\n\nCaused by:")?;
            let mut index = 0;
            let mut source: Option<&dyn std::error::Error> = Some(source.as_ref());
            while let Some(e) = source {
                for (i, line) in e.to_string().split('\n').enumerate() {
                    if i == 0 {
                        write!(f, "{: >5}: ", index)?;
                    } else {
                        f.write_str("\n       ")?;
                    }
                    f.write_str(line)?;
                }
                f.write_char('\n')?;
                source = e.source();
                index += 1;
            }
        }
        Ok(())
    }
}

impl std::error::Error for OperationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        let source: &(dyn std::error::Error + 'static) = self.0.source.as_ref()?.as_ref();
        Some(source)
    }
}
