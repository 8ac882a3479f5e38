//! Validation pass over the query tree.
//!
//! Every node implements [`Validate`]. A pass never mutates the tree and
//! never stops at the first problem: each node appends its own violations
//! and recurses into its children, extending the path as it goes
//! (`LinkEntities[0].Filter.Conditions[3].Operator`).

use crate::error::ErrorKind;
use crate::error::ValidationError;
use crate::xml::is_xml_char;

/// A node that can check its own rules and those of its children.
pub trait Validate {
    /// Appends every violation found in this node to `errors`, with paths
    /// rooted at `path`.
    fn validate_into(&self, path: &str, errors: &mut Vec<ValidationError>);

    /// Validates this node as a root, returning every violation.
    fn validation_errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        self.validate_into("", &mut errors);
        errors
    }
}

/// Joins a parent path and a member name.
pub(crate) fn member_path(parent: &str, member: &str) -> String {
    if parent.is_empty() {
        member.to_string()
    } else {
        format!("{parent}.{member}")
    }
}

/// Validates each item of a list under `parent.name[i]`.
pub(crate) fn validate_list<'a, T, I>(
    items: I,
    parent: &str,
    name: &str,
    errors: &mut Vec<ValidationError>,
) where
    T: Validate + 'a,
    I: IntoIterator<Item = &'a T>,
{
    let base = member_path(parent, name);
    for (i, item) in items.into_iter().enumerate() {
        item.validate_into(&format!("{base}[{i}]"), errors);
    }
}

/// Records a violation on `parent.member`.
pub(crate) fn report(
    errors: &mut Vec<ValidationError>,
    parent: &str,
    member: &str,
    kind: ErrorKind,
    message: impl Into<String>,
) {
    errors.push(ValidationError::new(member_path(parent, member), kind, message));
}

/// Reports `parent.member` if `value` holds a character XML cannot carry.
pub(crate) fn check_xml_chars(
    errors: &mut Vec<ValidationError>,
    parent: &str,
    member: &str,
    value: &str,
) {
    if let Some(c) = value.chars().find(|c| !is_xml_char(*c)) {
        report(
            errors,
            parent,
            member,
            ErrorKind::InvalidCharacter,
            format!("{member} contains U+{:04X}, which is not allowed in XML", u32::from(c)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Leaf(bool);

    impl Validate for Leaf {
        fn validate_into(&self, path: &str, errors: &mut Vec<ValidationError>) {
            if !self.0 {
                report(errors, path, "Flag", ErrorKind::InvalidRange, "flag is off");
            }
        }
    }

    #[test]
    fn test_member_path() {
        assert_eq!(member_path("", "Top"), "Top");
        assert_eq!(member_path("Filter", "Conditions[2]"), "Filter.Conditions[2]");
    }

    #[test]
    fn test_validate_list_prefixes_index() {
        let leaves = [Leaf(true), Leaf(false), Leaf(false)];
        let mut errors = Vec::new();
        validate_list(&leaves, "Filter", "Items", &mut errors);

        let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
        assert_eq!(paths, ["Filter.Items[1].Flag", "Filter.Items[2].Flag"]);
    }

    #[test]
    fn test_check_xml_chars() {
        let mut errors = Vec::new();
        check_xml_chars(&mut errors, "", "Name", "tab\tand\nnew line");
        check_xml_chars(&mut errors, "Filter", "Value", "bell\u{7}");
        check_xml_chars(&mut errors, "", "Alias", "\u{FFFF}");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].path, "Filter.Value");
        assert_eq!(errors[0].kind, ErrorKind::InvalidCharacter);
        assert_eq!(errors[0].message, "Value contains U+0007, which is not allowed in XML");
        assert_eq!(errors[1].path, "Alias");
    }

    #[test]
    fn test_root_validation() {
        assert_eq!(Leaf(false).validation_errors()[0].path, "Flag");
        assert!(Leaf(true).validation_errors().is_empty());
    }
}
