//! The guide behind `setup-google-drive`.
use std::io::Write;

use tracing::{info, warn};

use crate::{
    config::UploaderConfig,
    lib::{browser::BrowserLauncher, console::Console},
};

/// What the guide found and did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupReport {
    pub browser_opened: bool,
    pub marker_present: bool,
}

/// Print the setup walkthrough, open the console and check the marker file.
///
/// Never fails: a missing marker is reported, not an error.
pub fn run_setup_guide<W: Write>(
    config: &UploaderConfig,
    browser: &dyn BrowserLauncher,
    console: &mut Console<W>,
) -> SetupReport {
    let setup = &config.setup;
    let marker_name = setup
        .marker_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| setup.marker_file.display().to_string());

    console.line(format!(
        "Google Drive API Setup for {}",
        config.product_name
    ));
    console.rule();

    console.blank();
    console.line("Step-by-step instructions:");
    for (index, step) in [
        "Go to Google Cloud Console",
        "Create a new project or select existing one",
        "Enable Google Drive API",
        "Create a Service Account",
        "Download the JSON key file",
        "Share your Drive folder with the service account",
    ]
    .iter()
    .enumerate()
    {
        console.line(format!("{}. {step}", index + 1));
    }

    let browser_opened = if setup.open_browser {
        console.blank();
        console.line("Let me open the Google Cloud Console for you...");
        match browser.open(&setup.console_url) {
            Ok(()) => true,
            Err(err) => {
                warn!(
                    target: "apk_drive_upload::setup",
                    url = %setup.console_url,
                    reason = %err,
                    "Could not open a browser"
                );
                false
            }
        }
    } else {
        false
    };

    console.blank();
    console.line("Follow these steps:");

    section(
        console,
        "1) Create/Select Project:",
        &[
            format!("Go to {}", setup.console_url),
            "Create a new project or select an existing one".into(),
        ],
    );
    section(
        console,
        "2) Enable Google Drive API:",
        &[
            "Go to 'APIs & Services' > 'Library'".into(),
            "Search for 'Google Drive API'".into(),
            "Click on it and press 'Enable'".into(),
        ],
    );
    section(
        console,
        "3) Create Service Account:",
        &[
            "Go to 'APIs & Services' > 'Credentials'".into(),
            "Click 'Create Credentials' > 'Service Account'".into(),
            format!("Name: '{}-upload'", config.product_name.to_lowercase()),
            "Description: 'Upload APKs to Google Drive'".into(),
            "Click 'Create and Continue'".into(),
            "Skip role assignment (click 'Continue')".into(),
            "Click 'Done'".into(),
        ],
    );
    section(
        console,
        "4) Download JSON Key:",
        &[
            "Click on the service account you just created".into(),
            "Go to 'Keys' tab".into(),
            "Click 'Add Key' > 'Create new key'".into(),
            "Choose 'JSON' format".into(),
            "Download the file".into(),
            format!("Rename it to '{marker_name}'"),
            "Place it in your project root directory".into(),
        ],
    );
    section(
        console,
        "5) Share Drive Folder:",
        &[
            "Go to your Google Drive folder:".into(),
            config.drive.folder_url(),
            "Right-click the folder > 'Share'".into(),
            "Add the service account email (from the JSON file)".into(),
            "Give it 'Editor' access".into(),
            "Click 'Send'".into(),
        ],
    );
    section(
        console,
        "6) Test the setup:",
        &["Run: upload-to-drive".into()],
    );

    console.blank();
    console.rule();
    console.line("Setup complete! Your APKs will be automatically uploaded to Google Drive.");

    let marker_present = setup.marker_file.exists();
    console.blank();
    if marker_present {
        console.line("Service account file found! You're ready to upload.");
    } else {
        console.line("Service account file not found. Please complete the setup steps above.");
    }
    info!(
        target: "apk_drive_upload::setup",
        marker = %setup.marker_file.display(),
        marker_present,
        browser_opened,
        "Setup guide finished"
    );

    SetupReport {
        browser_opened,
        marker_present,
    }
}

fn section<W: Write>(console: &mut Console<W>, title: &str, items: &[String]) {
    console.blank();
    console.line(title);
    for item in items {
        console.line(format!("   - {item}"));
    }
}
