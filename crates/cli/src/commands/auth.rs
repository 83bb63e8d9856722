//! Session commands: login, register, logout, whoami.

use foody_client::AuthApi;
use foody_core::{RegisterRequest, User};

use super::{CliError, portal};

/// Log in and store the issued tokens.
pub async fn login(email: &str, password: &str) -> Result<(), CliError> {
    let (_, client) = portal()?;
    let auth = AuthApi::new(client);

    let session = auth.login(email, password).await?;
    tracing::info!("Logged in");
    print_user(&session.user);
    Ok(())
}

/// Register an account and store the issued tokens.
pub async fn register(request: RegisterRequest) -> Result<(), CliError> {
    let (_, client) = portal()?;
    let auth = AuthApi::new(client);

    let session = auth.register(&request).await?;
    tracing::info!("Account created");
    print_user(&session.user);
    Ok(())
}

/// Drop the session. The server is notified best-effort; the local tokens
/// are cleared regardless.
pub async fn logout() -> Result<(), CliError> {
    let (_, client) = portal()?;
    AuthApi::new(client).logout().await?;
    tracing::info!("Logged out");
    Ok(())
}

/// Show the currently authenticated user.
pub async fn whoami() -> Result<(), CliError> {
    let (_, client) = portal()?;
    let user = AuthApi::new(client).me().await?;
    print_user(&user);
    Ok(())
}

pub(crate) fn print_user(user: &User) {
    tracing::info!("  Email: {}", user.email);
    if let Some(name) = &user.name {
        tracing::info!("  Name: {name}");
    }
    if let Some(city) = &user.city {
        tracing::info!("  City: {city}");
    }
    if let Some(address) = &user.address {
        tracing::info!("  Address: {address}");
    }
    if let (Some(lat), Some(lng)) = (user.lat, user.lng) {
        tracing::info!("  Coordinates: {lat}, {lng}");
    }
}
