use super::non_blank;
use crate::error::{FriendbookError, Result};
use crate::model::User;
use crate::network::Network;

/// `local@domain.tld`: one `@`, a non-empty local part, and a dotted domain whose
/// labels are non-empty. No whitespace anywhere.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|l| !l.is_empty())
}

pub fn register(
    network: &mut Network,
    username: &str,
    email: &str,
    password: &str,
    gender: &str,
) -> Result<()> {
    let username = non_blank(username, "Username")?;
    let email = email.trim();
    if !is_valid_email(email) {
        return Err(FriendbookError::InvalidEmail(email.to_string()));
    }
    non_blank(password, "Password")?;

    network.insert_user(User::new(username, email, password, gender.trim()))?;
    tracing::info!("registered user {}", username);
    Ok(())
}

/// Returns the username that owns `email` when `password` matches.
pub fn authenticate(network: &Network, email: &str, password: &str) -> Result<String> {
    match network.user_by_email(email.trim()) {
        Some(user) if user.check_password(password) => Ok(user.username().to_string()),
        _ => Err(FriendbookError::InvalidCredentials),
    }
}

/// Sets a new password for the account behind `email`. The security answer is only
/// required to be present.
pub fn reset_password(
    network: &mut Network,
    email: &str,
    security_answer: &str,
    new_password: &str,
) -> Result<()> {
    non_blank(security_answer, "Security answer")?;
    non_blank(new_password, "Password")?;
    let username = network
        .user_by_email(email.trim())
        .map(|u| u.username().to_string())
        .ok_or_else(|| FriendbookError::UserNotFound(email.to_string()))?;

    network.require_user_mut(&username)?.set_password(new_password);
    tracing::info!("password reset for {}", username);
    Ok(())
}

pub fn change_password(network: &mut Network, actor: &str, old: &str, new: &str) -> Result<()> {
    non_blank(new, "Password")?;
    let user = network.require_user_mut(actor)?;
    if !user.change_password(old, new) {
        return Err(FriendbookError::InvalidCredentials);
    }
    tracing::info!("password changed for {}", actor);
    Ok(())
}
