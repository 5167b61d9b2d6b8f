//! User guidance attached to each error kind

use crate::classify::ErrorKind;

/// What to tell the user about a failed check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guidance {
    pub title: &'static str,

    /// Fixed explanation. `None` for generic failures, which show the raw message.
    pub message: Option<&'static str>,

    pub suggestion: &'static str,
}

impl Guidance {
    pub fn for_kind(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::Network => Self {
                title: "Connection Error",
                message: Some("Unable to reach the server. Please check your internet connection."),
                suggestion: "Make sure you are connected to the internet and try again.",
            },
            ErrorKind::Validation => Self {
                title: "Invalid URL",
                message: Some("The URL you entered is not valid."),
                suggestion: "Please enter a valid URL starting with http:// or https://",
            },
            ErrorKind::Server => Self {
                title: "Server Error",
                message: Some("The server encountered an error processing your request."),
                suggestion: "Please try again in a few moments.",
            },
            ErrorKind::Timeout => Self {
                title: "Request Timeout",
                message: Some("The request took too long to complete."),
                suggestion: "The website may be slow or unavailable. Try again or check another URL.",
            },
            ErrorKind::Generic => Self {
                title: "Something Went Wrong",
                message: None,
                suggestion: "Please try again or contact support if the problem persists.",
            },
        }
    }

    /// The explanation to display, falling back to the raw failure text
    pub fn explain<'a>(&'a self, raw: &'a str) -> &'a str {
        match self.message {
            Some(message) => message,
            None if raw.is_empty() => "An unexpected error occurred.",
            None => raw,
        }
    }
}
