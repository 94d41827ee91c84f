#[cfg(test)]
#[path = "message_test.rs"]
mod tests;
use serde_derive::Deserialize;
use serde_derive::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    System,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    pub language: String,
    pub code: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub project_id: String,
    pub role: Role,
    pub content: String,
    #[serde(default)]
    pub created_at: String,
}

impl Message {
    pub fn new(role: Role, project_id: &str, content: &str) -> Message {
        return Message {
            id: "".to_string(),
            project_id: project_id.to_string(),
            role,
            content: content.to_string(),
            created_at: "".to_string(),
        };
    }

    /// Extracts fenced code blocks from the message content. Untagged fences
    /// default to Lua, matching what the assistant is prompted to produce.
    pub fn codeblocks(&self) -> Vec<CodeBlock> {
        let mut codeblocks: Vec<CodeBlock> = vec![];
        let mut current_block: Vec<&str> = vec![];
        let mut current_language = "".to_string();
        let mut in_codeblock = false;

        for line in self.content.split('\n') {
            let trimmed = line.trim();
            if trimmed.starts_with("```") {
                if in_codeblock {
                    codeblocks.push(CodeBlock {
                        language: current_language.to_string(),
                        code: current_block.join("\n"),
                    });
                    current_block = vec![];
                    in_codeblock = false;
                } else {
                    current_language = trimmed.trim_start_matches("```").trim().to_string();
                    if current_language.is_empty() {
                        current_language = "lua".to_string();
                    }
                    in_codeblock = true;
                }
                continue;
            }

            if in_codeblock {
                current_block.push(line);
            }
        }

        return codeblocks;
    }
}
