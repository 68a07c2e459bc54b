//! Desktop notifications for new releases.
//!
//! Delivery is best effort: the poller logs a failed notification and moves
//! on.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::process::Command;

use crate::error::NotifyError;

pub const NEW_RELEASE_TITLE: &str = "New Release!";

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError>;
}

/// Sends notifications through the platform's notification command
/// (`notify-send`, `osascript` or PowerShell).
#[derive(Debug, Clone)]
pub struct DesktopNotifier {
    app_name: String,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
        }
    }

    fn command(&self, title: &str, message: &str) -> Command {
        if cfg!(target_os = "macos") {
            let mut cmd = Command::new("osascript");
            cmd.arg("-e").arg(format!(
                "display notification {} with title {}",
                applescript_string(message),
                applescript_string(title)
            ));
            cmd
        } else if cfg!(target_os = "windows") {
            let mut cmd = Command::new("powershell");
            cmd.args(["-NoProfile", "-Command"]).arg(format!(
                "[reflection.assembly]::loadwithpartialname('System.Windows.Forms') | Out-Null; \
                 $n = New-Object System.Windows.Forms.NotifyIcon; \
                 $n.Icon = [System.Drawing.SystemIcons]::Information; \
                 $n.Visible = $true; \
                 $n.ShowBalloonTip(5000, '{}', '{}', 'Info')",
                powershell_string(title),
                powershell_string(message)
            ));
            cmd
        } else {
            let mut cmd = Command::new("notify-send");
            cmd.args(["-a", self.app_name.as_str(), title, message]);
            cmd
        }
    }
}

impl Default for DesktopNotifier {
    fn default() -> Self {
        Self::new(env!("CARGO_PKG_NAME"))
    }
}

#[async_trait]
impl Notifier for DesktopNotifier {
    async fn notify(&self, title: &str, message: &str) -> Result<(), NotifyError> {
        let output = self
            .command(title, message)
            .output()
            .await
            .map_err(|e| NotifyError::Spawn(Arc::new(e)))?;

        if output.status.success() {
            Ok(())
        } else {
            Err(NotifyError::Failed(output.status.to_string()))
        }
    }
}

fn applescript_string(raw: &str) -> String {
    format!("\"{}\"", raw.replace('\\', "\\\\").replace('"', "\\\""))
}

fn powershell_string(raw: &str) -> String {
    raw.replace('\'', "''")
}
