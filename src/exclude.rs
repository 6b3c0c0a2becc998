use abst_fs::AbstPath;
use regex::Regex;
use thiserror::Error;

/// Directory, relative to a synced folder, that holds the tool's own state.
/// Never part of a tree
pub const STATE_DIR: &str = ".merkle-sync";

/// Paths to leave out of a tree. Rules are regular expressions matched
/// against the relative path; directories are matched with a trailing `/`
#[derive(Debug, Default)]
pub struct ExcludeList {
    list: Vec<Regex>,
}
#[derive(Error, Debug)]
pub enum ExcludeListError {
    #[error("Exclude List Error: Failed to parse rule to regex\nrule: {rule}\nreason: {err}")]
    UnparsableRule { rule: String, err: regex::Error },
}
fn unparerr<S: std::string::ToString>(rule: S) -> impl Fn(regex::Error) -> ExcludeListError {
    move |err: regex::Error| -> ExcludeListError {
        ExcludeListError::UnparsableRule {
            rule: rule.to_string(),
            err,
        }
    }
}
impl ExcludeList {
    pub fn from(rules: &[String]) -> Result<ExcludeList, ExcludeListError> {
        ExcludeList::default().join(rules)
    }
    pub fn join(self, rules: &[String]) -> Result<ExcludeList, ExcludeListError> {
        let mut list = self.list;
        for rule in rules {
            let rgx = Regex::new(rule).map_err(unparerr(rule))?;
            list.push(rgx);
        }
        Ok(ExcludeList { list })
    }
    pub fn len(&self) -> usize {
        self.list.len()
    }
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn should_exclude(&self, path: &AbstPath, is_dir: bool) -> bool {
        if path.into_iter().next().map(String::as_str) == Some(STATE_DIR) {
            return true;
        }

        let mut path_as_string = path.to_string();
        if is_dir {
            path_as_string.push('/');
        }
        self.list
            .iter()
            .any(|rule| rule.is_match(path_as_string.as_str()))
    }
}
