//! Host-facing glue: menu actions and extension-point wiring.
//!
//! The concrete chat client owns rendering, menu placement, and the plugin
//! lifecycle. This crate gives it two capabilities instead of reaching for
//! any global binding:
//!
//! - `MenuDispatcher` - maps one user interaction to exactly one action
//!   client call, navigating to the bot direct-message conversation first
//!   where the interaction calls for it
//! - `ExtensionHost` - abstract registry the one-shot [`register_plugin`]
//!   entry point wires every surface into

pub mod menu;
pub mod registry;

pub use menu::{
    CodeBlockAction, EditorAction, MenuDispatcher, MenuError, NavigationError, Navigator,
    PostMenuAction,
};
pub use registry::{register_plugin, ExtensionHost, ADMIN_SETTING_KEY, BOT_POST_TYPE};
