use uuid::Uuid;

use crate::{
    AppState,
    error::{AppError, Result},
    ui::{ClickEvent, Effect},
};

/// Resumes the page session `existing` if it is still cached, otherwise
/// starts a new one. Returns the session id and the effects that paint the
/// current state onto a fresh page.
pub async fn load_page(state: &AppState, existing: Option<Uuid>) -> (Uuid, Vec<Effect>) {
    if let Some(id) = existing
        && let Some(shared) = state.cache.local.get_ui_session(&id).await
    {
        let mut ui_state = shared.lock().await;
        let effects = ui_state.restore_effects();
        ui_state.apply(&effects);
        tracing::debug!(ui_session = %id, "UI session resumed");
        return (id, effects);
    }

    let (id, shared) = state.cache.local.create_ui_session().await;
    let effects = shared.lock().await.restore_effects();
    tracing::debug!(ui_session = %id, "UI session created");
    (id, effects)
}

pub async fn click(state: &AppState, session: Uuid, event: ClickEvent) -> Result<Vec<Effect>> {
    let shared = state
        .cache
        .local
        .get_ui_session(&session)
        .await
        .ok_or(AppError::UiSessionNotFound)?;

    let mut ui_state = shared.lock().await;
    let effects = state.ui_controller.dispatch(&mut ui_state, &event)?;

    tracing::debug!(
        ui_session = %session,
        control = %event.control,
        effects = effects.len(),
        "Click dispatched"
    );
    Ok(effects)
}

pub async fn image_loaded(state: &AppState, session: Uuid, generation: u64) -> Result<bool> {
    let shared = state
        .cache
        .local
        .get_ui_session(&session)
        .await
        .ok_or(AppError::UiSessionNotFound)?;

    let mut ui_state = shared.lock().await;
    let draw = state
        .ui_controller
        .complete_image_load(&mut ui_state, generation);

    if !draw {
        tracing::debug!(
            ui_session = %session,
            generation,
            latest = ui_state.generation,
            "Dropped stale image load"
        );
    }
    Ok(draw)
}
