use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Tool {
    pub fn new(name: &str, category: &str, description: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            category: category.to_string(),
            description: description.map(str::to_string),
        }
    }

    /// Case-insensitive containment over name, category and description.
    /// `query` must already be lower-cased.
    pub fn matches_query(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
            || self.category.to_lowercase().contains(query)
            || self
                .description
                .as_deref()
                .is_some_and(|description| description.to_lowercase().contains(query))
    }

    pub fn display_name(&self) -> String {
        format_tool_name(&self.name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    tools: Vec<Tool>,
}

impl Catalog {
    pub fn new(tools: Vec<Tool>) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Distinct categories in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for tool in &self.tools {
            if !seen.contains(&tool.category.as_str()) {
                seen.push(tool.category.as_str());
            }
        }
        seen
    }

    pub fn sample() -> Self {
        Self::new(vec![
            Tool::new("send_email", "email", Some("Send an email to someone")),
            Tool::new("search_emails", "email", Some("Search through your emails")),
            Tool::new("create_event", "calendar", Some("Create a calendar event")),
            Tool::new("list_events", "calendar", Some("List upcoming events")),
            Tool::new("create_todo", "todos", Some("Create a new todo item")),
            Tool::new("search_web", "search", Some("Search the web")),
            Tool::new("get_weather", "weather", Some("Get current weather")),
            Tool::new("send_notification", "notifications", Some("Send a notification")),
        ])
    }
}

/// `send_email` -> `Send Email`.
pub fn format_tool_name(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
