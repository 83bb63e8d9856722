//! Profile commands.

use foody_client::ProfileApi;
use foody_core::ProfileUpdate;

use super::{CliError, auth::print_user, portal};

/// Show the current profile.
pub async fn show() -> Result<(), CliError> {
    let (_, client) = portal()?;
    let user = ProfileApi::new(client).get().await?;
    print_user(&user);
    Ok(())
}

/// Apply a partial profile update and show the result.
pub async fn update(update: ProfileUpdate) -> Result<(), CliError> {
    if update.is_empty() {
        tracing::info!("Nothing to update");
        return Ok(());
    }

    let (_, client) = portal()?;
    let user = ProfileApi::new(client).update(&update).await?;
    tracing::info!("Profile saved");
    print_user(&user);
    Ok(())
}
