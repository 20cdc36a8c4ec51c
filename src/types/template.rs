//! URL template types resolved from an OpenSearch description document.

use std::ops::Deref;

/// Content type used when a caller does not ask for one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/atom+xml";

/// A single `Url` element from a description document.
///
/// `content_type` is the element's `type` attribute (empty when the document
/// omits it, so it never matches a requested type).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    content_type: String,
    template: String,
}

impl TemplateEntry {
    pub fn new(content_type: impl Into<String>, template: impl Into<String>) -> Self {
        Self {
            content_type: content_type.into(),
            template: template.into(),
        }
    }

    /// MIME type advertised for this template (e.g. `application/atom+xml`).
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// URL template, placeholders intact.
    pub fn template(&self) -> &str {
        &self.template
    }
}

/// Ordered URL templates in document order.
///
/// Produced only by a successful description parse, so a set handed out by
/// the cache is never empty. Callers receive it as `Arc<TemplateSet>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSet {
    entries: Vec<TemplateEntry>,
}

impl TemplateSet {
    /// Wrap parsed entries. Returns `None` for an empty list.
    pub fn new(entries: Vec<TemplateEntry>) -> Option<Self> {
        if entries.is_empty() {
            None
        } else {
            Some(Self { entries })
        }
    }

    /// First entry whose content type equals `content_type` exactly.
    pub fn find(&self, content_type: &str) -> Option<&TemplateEntry> {
        self.entries
            .iter()
            .find(|entry| entry.content_type == content_type)
    }

    pub fn entries(&self) -> &[TemplateEntry] {
        &self.entries
    }
}

impl Deref for TemplateSet {
    type Target = [TemplateEntry];

    fn deref(&self) -> &Self::Target {
        &self.entries
    }
}

impl<'a> IntoIterator for &'a TemplateSet {
    type Item = &'a TemplateEntry;
    type IntoIter = std::slice::Iter<'a, TemplateEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
