// src/directory/notification.rs
//! Transient, dismissible user notifications

use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Level::Success => "success",
            Level::Info => "info",
            Level::Error => "error",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: Uuid,
    pub level: Level,
    pub text: String,
}

#[derive(Debug, Default)]
pub struct Notifications {
    queue: Vec<Notification>,
}

impl Notifications {
    pub fn push(&mut self, level: Level, text: impl Into<String>) -> Uuid {
        let id = Uuid::new_v4();
        self.queue.push(Notification {
            id,
            level,
            text: text.into(),
        });
        id
    }

    pub fn success(&mut self, text: impl Into<String>) -> Uuid {
        self.push(Level::Success, text)
    }

    pub fn info(&mut self, text: impl Into<String>) -> Uuid {
        self.push(Level::Info, text)
    }

    pub fn error(&mut self, text: impl Into<String>) -> Uuid {
        self.push(Level::Error, text)
    }

    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let before = self.queue.len();
        self.queue.retain(|n| n.id != id);
        self.queue.len() != before
    }

    pub fn pending(&self) -> &[Notification] {
        &self.queue
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.queue)
    }

    pub fn last(&self) -> Option<&Notification> {
        self.queue.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismiss_by_id() {
        let mut notes = Notifications::default();
        let a = notes.info("Loading employees...");
        let b = notes.error("Fetch error: reset");

        assert!(notes.dismiss(a));
        assert!(!notes.dismiss(a));
        assert_eq!(notes.pending().len(), 1);
        assert_eq!(notes.last().unwrap().id, b);
        assert_eq!(notes.drain().len(), 1);
        assert!(notes.pending().is_empty());
    }
}
