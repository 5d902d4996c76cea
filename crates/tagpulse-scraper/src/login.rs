//! Authenticated session setup.

use rand::rngs::StdRng;
use tagpulse_core::{Credentials, PipelineConfig};

use crate::access::{first_present, settle, wait_for_any, ContentAccess};
use crate::error::ScraperError;
use crate::selectors;

const DISMISS_LABEL: &str = "not now";
const DISMISS_ROUNDS: usize = 2;

/// Make sure the session is logged in.
///
/// Visiting the login page while already authenticated redirects away from
/// it, in which case nothing else happens.
///
/// # Errors
///
/// Returns [`ScraperError::Login`] if a credential field is missing or the
/// home page never appears, or any navigation error.
pub async fn ensure_session(
    access: &dyn ContentAccess,
    credentials: &Credentials,
    config: &PipelineConfig,
    rng: &mut StdRng,
) -> Result<(), ScraperError> {
    access.navigate(&selectors::login_url()).await?;
    settle(&config.settle, rng).await;

    let location = access.current_location().await?;
    if !location.contains(selectors::LOGIN_PATH) {
        tracing::info!(location = %location, "session already authenticated");
        return Ok(());
    }

    let username_field = first_present(access, selectors::USERNAME_FIELDS, config.element_timeout)
        .await
        .ok_or_else(|| ScraperError::Login("username field not found".to_string()))?;
    access
        .type_text(username_field, &credentials.username)
        .await?;
    settle(&config.settle, rng).await;

    let password_field = first_present(access, selectors::PASSWORD_FIELDS, config.element_timeout)
        .await
        .ok_or_else(|| ScraperError::Login("password field not found".to_string()))?;
    access
        .type_text(password_field, &credentials.password)
        .await?;
    access.press_key(password_field, "Enter").await?;
    tracing::info!(username = %credentials.username, "credentials submitted");

    let marker = wait_for_any(access, selectors::LOGGED_IN_MARKERS, config.login_timeout)
        .await
        .map_err(|e| ScraperError::Login(format!("home page did not load: {e}")))?;
    tracing::info!(marker, "login confirmed");

    dismiss_prompts(access, config, rng).await;
    Ok(())
}

/// Click away "Not now" prompts (save login info, notifications). Failures
/// are ignored.
async fn dismiss_prompts(access: &dyn ContentAccess, config: &PipelineConfig, rng: &mut StdRng) {
    for _ in 0..DISMISS_ROUNDS {
        settle(&config.settle, rng).await;
        let buttons = match access.find_all(selectors::BUTTON).await {
            Ok(buttons) => buttons,
            Err(e) => {
                tracing::debug!(error = %e, "prompt lookup failed");
                return;
            }
        };
        let mut target = None;
        for button in buttons {
            match access.text(button).await {
                Ok(text) if text.trim().eq_ignore_ascii_case(DISMISS_LABEL) => {
                    target = Some(button);
                    break;
                }
                Ok(_) => {}
                Err(e) => tracing::debug!(error = %e, "button text unreadable"),
            }
        }
        let Some(button) = target else {
            return;
        };
        match access.click_element(button).await {
            Ok(()) => tracing::debug!("dismissed prompt"),
            Err(e) => tracing::debug!(error = %e, "prompt dismissal failed"),
        }
    }
}
