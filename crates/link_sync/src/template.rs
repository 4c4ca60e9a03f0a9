//! Query-string templates with positional substitution slots.
//!
//! A template such as `call?obj=7&arg0&arg1` is split on the separator into
//! literal segments. Every segment is followed by one slot: the slots sit
//! immediately before each separator and before the end of the string, so the
//! example has three of them. Filling the template interleaves the segments
//! with the supplied values.

/// A parsed template borrowing its segments from the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryTemplate<'src> {
    segments: Vec<&'src str>,
    separator: char,
}

impl<'src> QueryTemplate<'src> {
    pub fn parse(template: &'src str, separator: char) -> Self {
        Self {
            segments: template.split(separator).collect(),
            separator,
        }
    }

    /// Number of substitution points: one per separator plus end-of-string.
    pub fn slot_count(&self) -> usize {
        self.segments.len()
    }

    /// Render the template, placing `values[i]` into slot `i`.
    ///
    /// Slots without a value stay empty; values beyond the last slot are
    /// ignored.
    pub fn fill<S: AsRef<str>>(&self, values: &[S]) -> String {
        let literal_len: usize = self.segments.iter().map(|seg| seg.len() + 1).sum();
        let value_len: usize = values.iter().map(|val| val.as_ref().len()).sum();
        let mut out = String::with_capacity(literal_len + value_len);
        let mut cursor = values.iter();
        let last = self.segments.len().saturating_sub(1);
        for (index, segment) in self.segments.iter().enumerate() {
            out.push_str(segment);
            if let Some(value) = cursor.next() {
                out.push_str(value.as_ref());
            }
            if index < last {
                out.push(self.separator);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_sit_before_separators_and_end() {
        let template = QueryTemplate::parse("call?obj=7&arg0&arg1", '&');
        assert_eq!(template.slot_count(), 3);
        assert_eq!(
            template.fill(&["", "=x", "=y"]),
            "call?obj=7&arg0=x&arg1=y"
        );
    }

    #[test]
    fn missing_values_render_empty() {
        let template = QueryTemplate::parse("page?&", '&');
        assert_eq!(template.fill(&[""]), "page?&");
        assert_eq!(template.fill::<&str>(&[]), "page?&");
    }

    #[test]
    fn surplus_values_are_ignored() {
        let template = QueryTemplate::parse("go", '&');
        assert_eq!(template.slot_count(), 1);
        assert_eq!(template.fill(&["=a", "=b", "=c"]), "go=a");
    }

    #[test]
    fn empty_template_has_one_trailing_slot() {
        let template = QueryTemplate::parse("", '&');
        assert_eq!(template.slot_count(), 1);
        assert_eq!(template.fill(&["", "=a"]), "");
        assert_eq!(template.fill(&["=a"]), "=a");
    }

    #[test]
    fn adjacent_separators_each_get_a_slot() {
        let template = QueryTemplate::parse("&&", '&');
        assert_eq!(template.slot_count(), 3);
        assert_eq!(template.fill(&["1", "2", "3"]), "1&2&3");
    }

    #[test]
    fn separator_is_configurable() {
        let template = QueryTemplate::parse("a;b", ';');
        assert_eq!(template.fill(&["=1", "=2"]), "a=1;b=2");
    }
}
