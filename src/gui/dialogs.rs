//! Native dialogs, run through `Command::perform` so the UI thread never blocks

use rfd::{AsyncFileDialog, AsyncMessageDialog, MessageButtons, MessageDialogResult, MessageLevel};
use std::path::PathBuf;

/// Yes/No question; true when the user picked Yes
pub async fn confirm(title: String, description: String) -> bool {
    let answer = AsyncMessageDialog::new()
        .set_level(MessageLevel::Warning)
        .set_title(&title)
        .set_description(&description)
        .set_buttons(MessageButtons::YesNo)
        .show()
        .await;
    matches!(answer, MessageDialogResult::Yes)
}

pub async fn info(title: String, description: String) {
    notify(MessageLevel::Info, title, description).await;
}

pub async fn warning(title: String, description: String) {
    notify(MessageLevel::Warning, title, description).await;
}

pub async fn error(title: String, description: String) {
    notify(MessageLevel::Error, title, description).await;
}

async fn notify(level: MessageLevel, title: String, description: String) {
    AsyncMessageDialog::new()
        .set_level(level)
        .set_title(&title)
        .set_description(&description)
        .set_buttons(MessageButtons::Ok)
        .show()
        .await;
}

/// Folder picker opened at `start`
pub async fn pick_folder(start: PathBuf) -> Option<PathBuf> {
    AsyncFileDialog::new()
        .set_title("Select Download Location")
        .set_directory(&start)
        .pick_folder()
        .await
        .map(|handle| handle.path().to_path_buf())
}
