//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s. Lives in Rust
//! so the WASM bridge and native callers share one table.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Edit ──
    Copy,
    Cut,
    Paste,
    Delete,
    SelectAll,

    // ── Z-order ──
    SendBackward,
    BringForward,
    SendToBack,
    BringToFront,

    // ── Mode ──
    ToggleEditing,
    /// Drop the active drawing tool and return to select.
    ResetTool,
}

impl ShortcutAction {
    pub fn name(self) -> &'static str {
        match self {
            ShortcutAction::Copy => "copy",
            ShortcutAction::Cut => "cut",
            ShortcutAction::Paste => "paste",
            ShortcutAction::Delete => "delete",
            ShortcutAction::SelectAll => "selectAll",
            ShortcutAction::SendBackward => "sendBackward",
            ShortcutAction::BringForward => "bringForward",
            ShortcutAction::SendToBack => "sendToBack",
            ShortcutAction::BringToFront => "bringToFront",
            ShortcutAction::ToggleEditing => "toggleEditing",
            ShortcutAction::ResetTool => "resetTool",
        }
    }
}

/// Resolves key events into shortcut actions.
///
/// On macOS `meta` is ⌘; elsewhere `ctrl` plays the same role.
pub struct ShortcutMap;

impl ShortcutMap {
    /// `key` is the `KeyboardEvent.key` value (e.g. `"c"`, `"Delete"`).
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        if cmd && shift {
            return match key {
                "[" | "{" => Some(ShortcutAction::SendBackward),
                "]" | "}" => Some(ShortcutAction::BringForward),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "c" | "C" => Some(ShortcutAction::Copy),
                "x" | "X" => Some(ShortcutAction::Cut),
                "v" | "V" => Some(ShortcutAction::Paste),
                "a" | "A" => Some(ShortcutAction::SelectAll),
                "[" => Some(ShortcutAction::SendToBack),
                "]" => Some(ShortcutAction::BringToFront),
                _ => None,
            };
        }

        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::ResetTool),
            "e" | "E" => Some(ShortcutAction::ToggleEditing),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clipboard_keys() {
        // Cmd+C
        assert_eq!(
            ShortcutMap::resolve("c", false, false, false, true),
            Some(ShortcutAction::Copy)
        );
        // Ctrl+V
        assert_eq!(
            ShortcutMap::resolve("v", true, false, false, false),
            Some(ShortcutAction::Paste)
        );
        assert_eq!(
            ShortcutMap::resolve("X", true, false, false, false),
            Some(ShortcutAction::Cut)
        );
        // bare "c" is not copy
        assert_eq!(ShortcutMap::resolve("c", false, false, false, false), None);
    }

    #[test]
    fn delete_and_escape() {
        assert_eq!(
            ShortcutMap::resolve("Backspace", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Delete", false, false, false, false),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", false, false, false, false),
            Some(ShortcutAction::ResetTool)
        );
    }

    #[test]
    fn z_order_keys() {
        assert_eq!(
            ShortcutMap::resolve("]", true, false, false, false),
            Some(ShortcutAction::BringToFront)
        );
        assert_eq!(
            ShortcutMap::resolve("[", false, false, false, true),
            Some(ShortcutAction::SendToBack)
        );
        assert_eq!(
            ShortcutMap::resolve("{", false, true, false, true),
            Some(ShortcutAction::SendBackward)
        );
    }

    #[test]
    fn editing_toggle() {
        assert_eq!(
            ShortcutMap::resolve("e", false, false, false, false),
            Some(ShortcutAction::ToggleEditing)
        );
        assert_eq!(ShortcutMap::resolve("e", true, false, false, false), None);
    }
}
