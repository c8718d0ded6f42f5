use crate::models::{Event, Role, User};

// Мутации события. Правило для обоих действий сейчас одно, но точка
// различения оставлена в сигнатуре.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventAction {
    Edit,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Forbidden,
}

// Единая точка RBAC + владение: ADMIN может все, иначе только владелец.
// Вызывается строго после проверки существования события, чтобы 404 и 403
// оставались различимыми исходами.
pub fn authorize(user: &User, event: &Event, _action: EventAction) -> Decision {
    if user.role == Role::Admin || event.organizer_id == user.id {
        Decision::Allow
    } else {
        Decision::Forbidden
    }
}
