//! The per-client rename rule for the designated list file

use crate::settings::FolderStructure;

/// Maps a template file name to the name of its copy
///
/// Exactly one original name is rewritten; every other name passes through.
/// The rule only looks at the name, never at the file's position in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameRule {
    original_name: String,
    replacement: String,
}

impl RenameRule {
    /// Rename files called `original_name` to `replacement`
    pub fn new(original_name: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            replacement: replacement.into(),
        }
    }

    /// Build the rule for one organization: `<organization><user_list_suffix>`
    #[must_use]
    pub fn for_organization(organization: &str, structure: &FolderStructure) -> Self {
        Self::new(
            structure.user_list_original_name.clone(),
            format!("{organization}{}", structure.user_list_suffix),
        )
    }

    /// Whether `name` is the designated list file
    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        name == self.original_name
    }

    /// Target name for a file originally called `name`
    #[must_use]
    pub fn apply<'a>(&'a self, name: &'a str) -> &'a str {
        if self.matches(name) {
            &self.replacement
        } else {
            name
        }
    }

    #[must_use]
    pub fn original_name(&self) -> &str {
        &self.original_name
    }

    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.replacement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn structure() -> FolderStructure {
        FolderStructure {
            main_folder_suffix: " - Client Folder".into(),
            user_list_original_name: "Authorized Users.xlsx".into(),
            user_list_suffix: " - Authorized Users.xlsx".into(),
        }
    }

    #[test]
    fn test_designated_file_is_renamed() {
        let rule = RenameRule::for_organization("Acme", &structure());
        assert_eq!(
            rule.apply("Authorized Users.xlsx"),
            "Acme - Authorized Users.xlsx"
        );
    }

    #[test]
    fn test_other_files_pass_through() {
        let rule = RenameRule::for_organization("Acme", &structure());
        assert_eq!(rule.apply("ReadMe.txt"), "ReadMe.txt");
        // Exact match only
        assert_eq!(
            rule.apply("authorized users.xlsx"),
            "authorized users.xlsx"
        );
        assert_eq!(
            rule.apply("Authorized Users.xlsx.bak"),
            "Authorized Users.xlsx.bak"
        );
    }

    #[test]
    fn test_rule_is_applied_once() {
        let rule = RenameRule::new("list.xlsx", "list.xlsx.copy");
        let once = rule.apply("list.xlsx");
        assert_eq!(once, "list.xlsx.copy");
        assert_eq!(rule.apply(once), "list.xlsx.copy");
    }
}
