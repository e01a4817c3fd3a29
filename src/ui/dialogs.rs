use rfd::{MessageButtons, MessageDialog, MessageLevel};
use tracing::debug;

/// Show a blocking warning dialog with a single OK button
pub fn alert(message: &str) {
    debug!("Alert: {}", message);

    MessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title("Sample Rater")
        .set_description(message)
        .set_buttons(MessageButtons::Ok)
        .show();
}
