//! macOS-specific helpers.

use cocoa::appkit::{NSApp, NSApplication, NSMenu};
use cocoa::base::{id, nil};

/// Installs an empty main menu if the application has none.
///
/// The WebView's host view forwards `keyDown:` to
/// `NSApp.mainMenu.performKeyEquivalent(_)` and dereferences a `nil` menu, so
/// arrow-key navigation in the tree would crash without one. Must be called
/// before the WebView is built.
pub fn ensure_main_menu() {
    unsafe {
        let app = NSApp();
        let current: id = app.mainMenu();
        if current == nil {
            app.setMainMenu_(NSMenu::new(nil));
        }
    }
}
