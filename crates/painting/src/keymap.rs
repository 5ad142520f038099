//! Keyboard bindings

use crate::tool::Tool;

/// What a bound key does
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    SelectTool(Tool),
    Clear,
    Undo,
    Redo,
    /// Turn the overlay off
    Deactivate,
}

/// Key bindings, matched against DOM `KeyboardEvent.key` exactly
pub const KEY_BINDINGS: &[(&str, KeyAction)] = &[
    ("d", KeyAction::SelectTool(Tool::Freehand)),
    ("f", KeyAction::SelectTool(Tool::Line)),
    ("a", KeyAction::SelectTool(Tool::Arrow)),
    ("s", KeyAction::SelectTool(Tool::Rectangle)),
    ("h", KeyAction::SelectTool(Tool::Highlighter)),
    ("c", KeyAction::Clear),
    ("u", KeyAction::Undo),
    ("r", KeyAction::Redo),
    ("Escape", KeyAction::Deactivate),
];

/// Look up the action bound to a key
pub fn action_for_key(key: &str) -> Option<KeyAction> {
    KEY_BINDINGS
        .iter()
        .find(|(bound, _)| *bound == key)
        .map(|(_, action)| *action)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_tool_has_a_key() {
        for tool in Tool::ALL {
            assert!(
                KEY_BINDINGS
                    .iter()
                    .any(|(_, action)| *action == KeyAction::SelectTool(tool)),
                "{tool:?} has no binding"
            );
        }
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<&str> = KEY_BINDINGS.iter().map(|(key, _)| *key).collect();
        assert_eq!(keys.len(), KEY_BINDINGS.len());
    }

    #[test]
    fn test_lookup() {
        assert_eq!(action_for_key("s"), Some(KeyAction::SelectTool(Tool::Rectangle)));
        assert_eq!(action_for_key("u"), Some(KeyAction::Undo));
        assert_eq!(action_for_key("Escape"), Some(KeyAction::Deactivate));
    }

    #[test]
    fn test_unbound_keys() {
        assert_eq!(action_for_key("x"), None);
        assert_eq!(action_for_key("D"), None);
        assert_eq!(action_for_key("Esc"), None);
        assert_eq!(action_for_key(""), None);
    }

    #[test]
    fn test_key_hint_matches_display_name() {
        for (key, action) in KEY_BINDINGS {
            if let KeyAction::SelectTool(tool) = action {
                assert!(tool.display_name().ends_with(&format!("({key})")));
            }
        }
    }
}
