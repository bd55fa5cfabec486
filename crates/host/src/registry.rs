use threadpilot_core::domain::Tone;
use tracing::info;

use crate::menu::{CodeBlockAction, EditorAction, PostMenuAction};

/// Post type the bot stamps on its responses; the host renders it with the
/// rate/stop/regenerate controls.
pub const BOT_POST_TYPE: &str = "custom_llmbot";

/// Key of the admin-console custom setting panel.
pub const ADMIN_SETTING_KEY: &str = "Config";

/// Extension points the host exposes to the plugin at load time.
///
/// The host owns every registry; the plugin only receives this capability and
/// wires its surfaces in, so nothing here reaches for a global binding.
pub trait ExtensionHost {
    fn register_post_type_renderer(&mut self, post_type: &str);
    fn register_post_menu_action(&mut self, action: PostMenuAction);
    fn register_editor_action(&mut self, action: EditorAction);
    fn register_code_block_action(&mut self, action: CodeBlockAction);
    fn register_admin_setting(&mut self, setting_key: &str);
}

/// One-shot load-time entry point. Argument wiring only: every surface is
/// registered exactly once, and the host decides where each one appears.
pub fn register_plugin(host: &mut dyn ExtensionHost) {
    host.register_post_type_renderer(BOT_POST_TYPE);

    for action in PostMenuAction::ALL {
        host.register_post_menu_action(action);
    }

    host.register_editor_action(EditorAction::Simplify);
    for tone in Tone::ALL {
        host.register_editor_action(EditorAction::ChangeTone(tone));
    }
    host.register_editor_action(EditorAction::AskAiToEdit);

    for action in CodeBlockAction::ALL {
        host.register_code_block_action(action);
    }

    host.register_admin_setting(ADMIN_SETTING_KEY);

    info!(event_name = "host.registry.registered", "plugin surfaces registered");
}
