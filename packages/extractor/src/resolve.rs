//! Ordered fallback chains for field resolution.
//!
//! Every adapter field that can come from more than one place is described
//! by a [`FieldChain`]: the field name plus the sources to try, in order.
//! Keeping the order in data makes it auditable and testable per field.

/// One source attempt: returns `None` when the source has nothing to offer.
pub type Attempt<S, T> = fn(&S) -> Option<T>;

/// Ordered list of source attempts for one field.
pub struct FieldChain<S, T> {
    field: &'static str,
    attempts: Vec<(&'static str, Attempt<S, T>)>,
}

impl<S, T> FieldChain<S, T> {
    /// Start an empty chain for `field`.
    #[must_use]
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            attempts: Vec::new(),
        }
    }

    /// Append a source attempt.
    #[must_use]
    pub fn then(mut self, source: &'static str, attempt: Attempt<S, T>) -> Self {
        self.attempts.push((source, attempt));
        self
    }

    #[must_use]
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Source labels in resolution order.
    #[must_use]
    pub fn sources(&self) -> Vec<&'static str> {
        self.attempts.iter().map(|(source, _)| *source).collect()
    }

    /// First value any source yields.
    pub fn resolve(&self, subject: &S) -> Option<T> {
        for (source, attempt) in &self.attempts {
            if let Some(value) = attempt(subject) {
                tracing::trace!(field = self.field, source, "field resolved");
                return Some(value);
            }
        }
        tracing::trace!(field = self.field, "no source matched, using default");
        None
    }

    /// First value any source yields, or `default`.
    pub fn resolve_or(&self, subject: &S, default: T) -> T {
        self.resolve(subject).unwrap_or(default)
    }
}

impl<S, T: Default> FieldChain<S, T> {
    /// First value any source yields, or `T::default()` (empty string, empty list).
    pub fn resolve_or_default(&self, subject: &S) -> T {
        self.resolve(subject).unwrap_or_default()
    }
}
