use alloc::string::String;

use crate::introspect::PropertyDescriptor;
use crate::rules::RuleSet;

/// The state of one step of the traversal.
#[derive(Clone, Copy)]
pub(crate) struct Frame<'f> {
    /// Dotted path of output names from the root value.
    pub path: &'f str,
    /// Rules inherited from enclosing objects.
    pub active: Option<&'f RuleSet>,
    /// The property the current value was read from.
    pub referring: Option<&'f PropertyDescriptor>,
    /// Number of enclosing lists, maps and objects.
    pub depth: usize,
}

impl Frame<'static> {
    pub const ROOT: Self = Frame {
        path: "",
        active: None,
        referring: None,
        depth: 0,
    };
}

impl<'f> Frame<'f> {
    /// The path of a child named `segment`.
    pub fn child_path(&self, segment: &str) -> String {
        if self.path.is_empty() {
            String::from(segment)
        } else {
            let mut path = String::with_capacity(self.path.len() + 1 + segment.len());
            path.push_str(self.path);
            path.push('.');
            path.push_str(segment);
            path
        }
    }

    /// The prefix to match the properties of an object against when the
    /// inherited rules apply.
    pub fn prefix(&self) -> String {
        if self.path.is_empty() {
            String::new()
        } else {
            self.child_path("")
        }
    }

    /// A frame for a value nested in the current one, such as a list
    /// element, keeping the path.
    #[inline]
    pub fn nested(self) -> Frame<'f> {
        Frame {
            depth: self.depth + 1,
            ..self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths_and_prefixes() {
        assert_eq!(Frame::ROOT.child_path("a"), "a");
        assert_eq!(Frame::ROOT.prefix(), "");

        let frame = Frame {
            path: "a.b",
            ..Frame::ROOT
        };
        assert_eq!(frame.child_path("c"), "a.b.c");
        assert_eq!(frame.prefix(), "a.b.");
        assert_eq!(frame.nested().depth, 1);
        assert_eq!(frame.nested().path, "a.b");
    }
}
