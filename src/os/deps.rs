// src/os/deps.rs

use crate::error::DisplayError;

/// Checks that every executable in `dependencies` resolves on `PATH`.
///
/// All lookups are attempted so the caller can report every missing tool at
/// once. Returns `true` only when the error list is empty.
pub fn has_dependencies<I, S>(dependencies: I) -> (bool, Vec<DisplayError>)
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let errors: Vec<DisplayError> = dependencies
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref();
            match which::which(name) {
                Ok(path) => {
                    log::trace!("Resolved dependency {} to {}", name, path.display());
                    None
                }
                Err(source) => Some(DisplayError::MissingDependency {
                    name: name.to_string(),
                    source,
                }),
            }
        })
        .collect();

    (errors.is_empty(), errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_log::test]
    fn resolves_common_tools() {
        let (ok, errors) = has_dependencies(["sh", "true"]);
        assert!(ok, "unexpected errors: {:?}", errors);
        assert!(errors.is_empty());
    }

    #[test_log::test]
    fn reports_every_missing_tool() {
        let (ok, errors) = has_dependencies([
            "xdisplay-missing-one",
            "sh",
            "xdisplay-missing-two",
        ]);
        assert!(!ok);
        let names: Vec<&str> = errors
            .iter()
            .map(|e| match e {
                DisplayError::MissingDependency { name, .. } => name.as_str(),
                other => panic!("unexpected error {:?}", other),
            })
            .collect();
        assert_eq!(names, ["xdisplay-missing-one", "xdisplay-missing-two"]);
    }

    #[test_log::test]
    fn empty_list_is_satisfied() {
        let (ok, errors) = has_dependencies(Vec::<String>::new());
        assert!(ok);
        assert!(errors.is_empty());
    }
}
