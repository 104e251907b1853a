use std::fmt;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Variant {
    Success,
    Error,
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Success => write!(f, "success"),
            Variant::Error => write!(f, "error"),
        }
    }
}

/// A toast-style message shown to the user.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub variant: Variant,
}

impl Notification {
    pub fn success(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            variant: Variant::Success,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            variant: Variant::Error,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.variant, self.title, self.message)
    }
}
