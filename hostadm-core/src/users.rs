use crate::error::MaintError;
use nix::unistd::Uid;
use std::process::Command;
use tracing::info;

/// Wraps the account database commands. All mutating operations require
/// effective root and a pre-existence check through `id`.
pub struct UserManager;

impl UserManager {
    pub fn new() -> Self {
        Self
    }

    /// Whether the current effective user is root.
    pub fn effective_root(&self) -> bool {
        Uid::effective().is_root()
    }

    /// Existence check against the account database; `id` exits non-zero
    /// for unknown names.
    pub fn user_exists(&self, username: &str) -> Result<bool, MaintError> {
        let output = Command::new("id").arg(username).output()?;
        Ok(output.status.success())
    }

    pub fn add_user(&self, username: &str) -> Result<(), MaintError> {
        let username = validated(username)?;
        self.require_root()?;
        if self.user_exists(username)? {
            return Err(MaintError::UserExists(username.to_string()));
        }
        run_checked("useradd", &["-m", username])?;
        info!(username, "account created");
        Ok(())
    }

    pub fn remove_user(&self, username: &str) -> Result<(), MaintError> {
        let username = validated(username)?;
        self.require_root()?;
        if !self.user_exists(username)? {
            return Err(MaintError::MissingUser(username.to_string()));
        }
        run_checked("userdel", &["-r", username])?;
        info!(username, "account removed");
        Ok(())
    }

    /// Change a password by handing the terminal to `passwd`; its exit
    /// status decides success.
    pub fn set_password(&self, username: &str) -> Result<(), MaintError> {
        let username = validated(username)?;
        self.require_root()?;
        if !self.user_exists(username)? {
            return Err(MaintError::MissingUser(username.to_string()));
        }
        let status = Command::new("passwd").arg(username).status()?;
        if !status.success() {
            return Err(MaintError::CommandFailed {
                command: "passwd".to_string(),
                status,
                stderr: String::new(),
            });
        }
        info!(username, "password changed");
        Ok(())
    }

    fn require_root(&self) -> Result<(), MaintError> {
        if self.effective_root() {
            Ok(())
        } else {
            Err(MaintError::PermissionDenied)
        }
    }
}

impl Default for UserManager {
    fn default() -> Self {
        Self::new()
    }
}

fn validated(username: &str) -> Result<&str, MaintError> {
    let username = username.trim();
    if username.is_empty() {
        return Err(MaintError::InvalidInput(
            "username must not be empty".to_string(),
        ));
    }
    Ok(username)
}

/// Run an account command, surfacing stderr on non-zero exit.
fn run_checked(program: &str, args: &[&str]) -> Result<(), MaintError> {
    let output = Command::new(program).args(args).output()?;
    if !output.status.success() {
        return Err(MaintError::CommandFailed {
            command: program.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }
    Ok(())
}
