use crate::domain::model::MarkerClass;
use crate::utils::error::{MarkerError, Result};

/// The substitutable slot inside a marker template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    /// `{DD/MM/YYYY}`, stands for a strict `DD/MM/YYYY` date.
    Date,
    /// `{name}`, stands for a section or tag name.
    Name,
}

impl Placeholder {
    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::Date => "{DD/MM/YYYY}",
            Placeholder::Name => "{name}",
        }
    }
}

/// A marker template split around its placeholder.
///
/// `:::date {DD/MM/YYYY}` becomes `before = ":::date "`, `after = ""`.
/// Both literal sides are kept verbatim; escaping is the matcher's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    placeholder: Placeholder,
    before: String,
    after: String,
}

impl Template {
    pub fn parse(class: MarkerClass, raw: &str, placeholder: Placeholder) -> Result<Self> {
        let token = placeholder.token();
        let reason = match raw.matches(token).count() {
            1 => None,
            0 => Some(format!("missing placeholder {}", token)),
            n => Some(format!("placeholder {} appears {} times", token, n)),
        };
        if let Some(reason) = reason {
            return Err(MarkerError::TemplateError {
                class: class.to_string(),
                template: raw.to_string(),
                reason,
            });
        }

        let (before, after) = raw.split_once(token).ok_or_else(|| MarkerError::TemplateError {
            class: class.to_string(),
            template: raw.to_string(),
            reason: format!("missing placeholder {}", token),
        })?;

        Ok(Self {
            placeholder,
            before: before.to_string(),
            after: after.to_string(),
        })
    }

    pub fn placeholder(&self) -> Placeholder {
        self.placeholder
    }

    pub fn before(&self) -> &str {
        &self.before
    }

    pub fn after(&self) -> &str {
        &self.after
    }

    /// True when the template is nothing but its placeholder.
    pub fn is_bare(&self) -> bool {
        self.before.is_empty() && self.after.is_empty()
    }

    /// Fills the placeholder with `payload`.
    pub fn render(&self, payload: &str) -> String {
        let mut out = String::with_capacity(self.before.len() + payload.len() + self.after.len());
        out.push_str(&self.before);
        out.push_str(payload);
        out.push_str(&self.after);
        out
    }
}
