/// Session state read by the prompt renderer.
///
/// The dispatcher owns and mutates this as the user navigates between
/// modules; the I/O layer only ever borrows it immutably.
///
/// Note: fields are public so a dispatcher (or a test) can build one directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    /// Name of the active configuration context, e.g. `eth0`.
    pub current_node: String,
    /// How deep the session is nested. [`Status::ROOT_DEPTH`] means root.
    pub module_depth: usize,
    /// Privileged mode. Selects the `#` delimiter instead of `>`.
    pub login: bool,
}

impl Status {
    /// Depth value of the root context.
    pub const ROOT_DEPTH: usize = 0;

    /// Fresh session at the root context, not logged in.
    pub fn new() -> Self {
        Self {
            current_node: String::new(),
            module_depth: Self::ROOT_DEPTH,
            login: false,
        }
    }

    pub fn is_root(&self) -> bool {
        self.module_depth == Self::ROOT_DEPTH
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use crate::status::Status;

    #[test]
    fn test_new_status_is_root() {
        let status = Status::new();
        assert!(status.is_root());
        assert!(!status.login);
        assert_eq!(status.current_node, "");
    }

    #[test]
    fn test_nested_status_is_not_root() {
        let status = Status {
            current_node: "eth0".to_string(),
            module_depth: 1,
            login: false,
        };
        assert!(!status.is_root());
    }
}
