use serde::{Deserialize, Serialize};

// Роли приложения. В БД хранятся как TEXT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    User,
    Organizer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "USER",
            Role::Organizer => "ORGANIZER",
            Role::Admin => "ADMIN",
        }
    }

    // Неизвестное значение в колонке считаем обычным пользователем
    pub fn parse(s: &str) -> Role {
        match s {
            "ADMIN" => Role::Admin,
            "ORGANIZER" => Role::Organizer,
            _ => Role::User,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub role: Role,
}
