use clap::Subcommand;
use timeflow_core::{Config, NotificationPermission};

#[derive(Subcommand)]
pub enum PermissionAction {
    /// Show the current notification permission
    Status,
    /// Allow system notifications on completion
    Grant,
    /// Refuse system notifications; the sound cue still plays
    Deny,
    /// Forget the answer
    Reset,
}

pub fn run(action: PermissionAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = Config::load()?;
    let permission = match action {
        PermissionAction::Status => {
            println!("{}", config.notifications.permission);
            return Ok(());
        }
        PermissionAction::Grant => NotificationPermission::Granted,
        PermissionAction::Deny => NotificationPermission::Denied,
        PermissionAction::Reset => NotificationPermission::Default,
    };
    config.notifications.permission = permission;
    config.save()?;
    tracing::info!(%permission, "notification permission updated");
    println!("{permission}");
    Ok(())
}
