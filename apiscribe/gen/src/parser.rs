//! Path template parsing.
//!
//! Extracts placeholder names from path templates that use `{param}` syntax.

/// Extracts parameter names from a path template.
///
/// ## Examples
///
/// ```
/// use apiscribe_gen::parser::extract_path_params;
///
/// assert_eq!(extract_path_params("/items"), vec![] as Vec<&str>);
/// assert_eq!(extract_path_params("/items/{id}"), vec!["id"]);
/// assert_eq!(
///     extract_path_params("/stores/{store_id}/items/{item_id}"),
///     vec!["store_id", "item_id"]
/// );
/// ```
pub fn extract_path_params(path: &str) -> Vec<&str> {
    let mut params = Vec::new();
    let mut start = None;

    for (idx, c) in path.char_indices() {
        match c {
            '{' => start = Some(idx + 1),
            '}' => {
                if let Some(begin) = start.take() {
                    let param = &path[begin..idx];
                    if !param.is_empty() {
                        params.push(param);
                    }
                }
            }
            _ => {}
        }
    }

    params
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_no_params() {
        assert_eq!(extract_path_params("/items"), Vec::<&str>::new());
        assert_eq!(extract_path_params("/"), Vec::<&str>::new());
    }

    #[test]
    fn extract_single_param() {
        assert_eq!(extract_path_params("/{id}"), vec!["id"]);
        assert_eq!(extract_path_params("/users/{user_id}/posts"), vec!["user_id"]);
    }

    #[test]
    fn extract_consecutive_params() {
        assert_eq!(extract_path_params("/{a}/{b}"), vec!["a", "b"]);
    }

    #[test]
    fn placeholder_at_start_of_path_is_found() {
        // a placeholder opening at index 0 must not be mistaken for "no open brace"
        assert_eq!(extract_path_params("{tenant}/items"), vec!["tenant"]);
    }

    #[test]
    fn empty_and_unclosed_placeholders_are_ignored() {
        assert_eq!(extract_path_params("/items/{}"), Vec::<&str>::new());
        assert_eq!(extract_path_params("/items/{id"), Vec::<&str>::new());
    }
}
