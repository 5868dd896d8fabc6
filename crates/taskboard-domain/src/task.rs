use chrono::{DateTime, NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

const RANDOM_SUFFIX_LEN: usize = 9;

/// Opaque task identifier, immutable for the lifetime of the task.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// `task-<unix millis>-<random suffix>`; unique with overwhelming
    /// probability, never checked for collisions.
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis();
        let random = Uuid::new_v4().simple().to_string();
        Self(format!("task-{}-{}", millis, &random[..RANDOM_SUFFIX_LEN]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [Self::Todo, Self::InProgress, Self::Done];

    /// The column identifier used in storage and drop targets.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in-progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a column identifier", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(format!("unknown priority '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub status: TaskStatus,
    #[serde(deserialize_with = "created_at_from_stored")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "priority_from_stored"
    )]
    pub priority: Option<TaskPriority>,
}

/// RFC 3339, or a timestamp without offset which is read as UTC.
fn created_at_from_stored<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(d)?;
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|e| {
            <D::Error as serde::de::Error>::custom(format!("invalid createdAt '{}': {}", raw, e))
        })
}

fn priority_from_stored<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<TaskPriority>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(d)? else {
        return Ok(None);
    };
    match raw.parse() {
        Ok(priority) => Ok(Some(priority)),
        Err(e) => {
            tracing::warn!("Dropping stored priority: {}", e);
            Ok(None)
        }
    }
}

impl Task {
    /// Builds a fresh task. Title and description are stored trimmed and the
    /// timestamp is kept at millisecond precision, the resolution it is
    /// persisted with.
    pub fn new(id: TaskId, status: TaskStatus, title: &str, description: &str) -> Self {
        Self {
            id,
            title: title.trim().to_string(),
            description: description.trim().to_string(),
            status,
            created_at: Utc::now().trunc_subsecs(3),
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: Option<TaskPriority>) -> Self {
        self.priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generated_ids_have_time_and_random_parts() {
        let id = TaskId::generate();
        let parts: Vec<&str> = id.as_str().splitn(3, '-').collect();
        assert_eq!(parts[0], "task");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 9);
        assert_ne!(TaskId::generate(), TaskId::generate());
    }

    #[test]
    fn test_status_parsing() {
        assert_eq!("todo".parse::<TaskStatus>(), Ok(TaskStatus::Todo));
        assert_eq!("in-progress".parse::<TaskStatus>(), Ok(TaskStatus::InProgress));
        assert_eq!("done".parse::<TaskStatus>(), Ok(TaskStatus::Done));
        assert!("Done".parse::<TaskStatus>().is_err());
        assert!("archived".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn test_task_json_layout() {
        let mut task = Task::new(TaskId::new("task-1"), TaskStatus::InProgress, " Ship ", "");
        task.created_at = "2024-05-01T10:00:00.123Z".parse().unwrap();

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "task-1",
                "title": "Ship",
                "description": "",
                "status": "in-progress",
                "createdAt": "2024-05-01T10:00:00.123Z",
            })
        );

        let with_priority = task.with_priority(Some(TaskPriority::High));
        let value = serde_json::to_value(&with_priority).unwrap();
        assert_eq!(value["priority"], "high");
    }

    #[test]
    fn test_created_at_survives_round_trip() {
        let task = Task::new(TaskId::generate(), TaskStatus::Todo, "Write spec", "");
        let text = serde_json::to_string(&task).unwrap();
        let back: Task = serde_json::from_str(&text).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_stored_fields_decode_leniently() {
        let naive: Task = serde_json::from_value(json!({
            "id": "task-1",
            "title": "Legacy",
            "status": "todo",
            "createdAt": "2024-05-01T10:00:00.250",
        }))
        .unwrap();
        assert_eq!(naive.created_at, "2024-05-01T10:00:00.250Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(naive.description, "");

        let offset: Task = serde_json::from_value(json!({
            "id": "task-2",
            "title": "Offset",
            "status": "done",
            "createdAt": "2024-05-01T12:00:00+02:00",
            "priority": "urgent",
        }))
        .unwrap();
        assert_eq!(offset.created_at, "2024-05-01T10:00:00Z".parse::<DateTime<Utc>>().unwrap());
        assert_eq!(offset.priority, None);

        let garbage = serde_json::from_value::<Task>(json!({
            "id": "task-3",
            "title": "Bad",
            "status": "todo",
            "createdAt": "yesterday",
        }));
        assert!(garbage.is_err());
    }
}
