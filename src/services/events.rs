use crate::error::ApiError;
use crate::models::{Event, EventFields, User};
use crate::store::TicketStore;

use super::authz::{authorize, Decision, EventAction};

// Порядок проверок общий для обеих мутаций: сначала существование,
// потом права, чтобы "не найдено" и "запрещено" не смешивались.

pub async fn update_event(
    store: &dyn TicketStore,
    event_id: &str,
    fields: EventFields,
    acting_user: &User,
) -> Result<Event, ApiError> {
    let event = store
        .find_event(event_id)
        .await?
        .ok_or(ApiError::EventNotFound)?;

    // Удаленное событие для редактирования не существует
    if event.is_deleted {
        return Err(ApiError::EventNotFound);
    }

    if authorize(acting_user, &event, EventAction::Edit) == Decision::Forbidden {
        return Err(ApiError::Forbidden);
    }

    store
        .update_event(event_id, &fields)
        .await?
        .ok_or(ApiError::EventNotFound)
}

pub async fn soft_delete_event(
    store: &dyn TicketStore,
    event_id: &str,
    acting_user: &User,
) -> Result<(), ApiError> {
    let event = store
        .find_event(event_id)
        .await?
        .ok_or(ApiError::EventNotFound)?;

    if authorize(acting_user, &event, EventAction::Delete) == Decision::Forbidden {
        return Err(ApiError::Forbidden);
    }

    // Повторное удаление уже удаленного события проходит как no-op
    if !store.soft_delete_event(event_id).await? {
        return Err(ApiError::EventNotFound);
    }
    Ok(())
}
