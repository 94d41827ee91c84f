use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub project_type: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl Project {
    pub fn new(id: &str, name: &str) -> Project {
        return Project {
            id: id.to_string(),
            name: name.to_string(),
            project_type: "roblox_game".to_string(),
            user_id: "".to_string(),
            created_at: "".to_string(),
            updated_at: "".to_string(),
        };
    }
}
