//! Password hashing for statically configured accounts.

use clap::Args;

use adminhub_auth::password::PasswordHasher;
use adminhub_core::error::AppError;

/// Arguments for hash-password
#[derive(Debug, Args)]
pub struct HashPasswordArgs {
    /// Read the password from this argument instead of prompting
    #[arg(long)]
    pub password: Option<String>,
}

/// Prompt for a password and print its Argon2id PHC string.
pub fn execute(args: &HashPasswordArgs) -> Result<(), AppError> {
    let password = match &args.password {
        Some(p) => p.clone(),
        None => dialoguer::Password::new()
            .with_prompt("Password")
            .with_confirmation("Confirm password", "Passwords do not match")
            .interact()
            .map_err(|e| AppError::internal(format!("Input error: {e}")))?,
    };

    if password.is_empty() {
        return Err(AppError::validation("Password must not be empty"));
    }

    let hash = PasswordHasher::new().hash_password(&password)?;
    println!("{hash}");
    Ok(())
}
