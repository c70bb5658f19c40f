//! Contact form state and submission

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// One of the contact form's fields
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Name,
    Email,
    Message,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Email, FormField::Message];

    pub fn name(self) -> &'static str {
        match self {
            FormField::Name => "name",
            FormField::Email => "email",
            FormField::Message => "message",
        }
    }
}

impl FromStr for FormField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(FormField::Name),
            "email" => Ok(FormField::Email),
            "message" => Ok(FormField::Message),
            other => Err(format!("unknown form field '{other}'")),
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// In-progress contact form input; never persisted
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FormDraft {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl FormDraft {
    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Name => self.name = value,
            FormField::Email => self.email = value,
            FormField::Message => self.message = value,
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Email => &self.email,
            FormField::Message => &self.message,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.email.is_empty() && self.message.is_empty()
    }

    /// Take the current values, leaving the draft empty
    pub fn take(&mut self) -> FormSubmission {
        let draft = std::mem::take(self);
        FormSubmission {
            name: draft.name,
            email: draft.email,
            message: draft.message,
        }
    }
}

/// What gets handed to the [`SubmissionSink`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSubmission {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    #[error("submission rejected: {0}")]
    Rejected(String),

    #[error("submission transport unavailable")]
    Unavailable,
}

/// Delivery collaborator for contact form submissions
pub trait SubmissionSink {
    fn submit(&self, submission: &FormSubmission) -> Result<(), SubmitError>;
}

/// Keeps submissions in memory (headless sessions and tests)
#[derive(Debug, Default)]
pub struct MemorySink {
    submissions: RefCell<Vec<FormSubmission>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submissions(&self) -> Vec<FormSubmission> {
        self.submissions.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.submissions.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.borrow().is_empty()
    }
}

impl SubmissionSink for MemorySink {
    fn submit(&self, submission: &FormSubmission) -> Result<(), SubmitError> {
        self.submissions.borrow_mut().push(submission.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_take_clears() {
        let mut draft = FormDraft::default();
        draft.set(FormField::Name, "Ada");
        draft.set(FormField::Email, "a@x.com");
        draft.set(FormField::Message, "Hello");
        assert_eq!(draft.get(FormField::Email), "a@x.com");

        let submission = draft.take();
        assert_eq!(submission.name, "Ada");
        assert_eq!(submission.message, "Hello");
        assert!(draft.is_empty());
    }

    #[test]
    fn test_field_parse() {
        assert_eq!("email".parse::<FormField>(), Ok(FormField::Email));
        assert!("phone".parse::<FormField>().is_err());
    }

    #[test]
    fn test_memory_sink() {
        let sink = MemorySink::new();
        let submission = FormSubmission {
            name: "Ada".into(),
            email: "a@x.com".into(),
            message: "Hello".into(),
        };
        sink.submit(&submission).unwrap();
        assert_eq!(sink.submissions(), vec![submission]);
    }
}
