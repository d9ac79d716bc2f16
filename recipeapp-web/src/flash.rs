//! Transient flash notifications.

use serde::Deserialize;
use std::time::Duration;
use tokio::time::Instant;

/// How long a flash message stays on screen.
pub const FLASH_TTL: Duration = Duration::from_secs(5);

const BASE_CLASSES: &str = "fixed top-20 right-4 p-4 rounded-lg shadow-lg z-50";

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashKind {
    #[default]
    Info,
    Success,
    Warning,
    Error,
}

impl FlashKind {
    /// Unknown names fall back to `Info`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "success" => FlashKind::Success,
            "warning" => FlashKind::Warning,
            "error" => FlashKind::Error,
            _ => FlashKind::Info,
        }
    }

    fn color_classes(&self) -> &'static str {
        match self {
            FlashKind::Info => "bg-blue-500 text-white",
            FlashKind::Success => "bg-green-500 text-white",
            FlashKind::Warning => "bg-yellow-500 text-white",
            FlashKind::Error => "bg-red-500 text-white",
        }
    }

    /// Full class attribute for the notification element.
    pub fn classes(&self) -> String {
        format!("{} {}", BASE_CLASSES, self.color_classes())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub id: u64,
    pub text: String,
    pub kind: FlashKind,
    pub shown_at: Instant,
}

impl Flash {
    pub fn expires_at(&self) -> Instant {
        self.shown_at + FLASH_TTL
    }
}

/// Flash messages currently on screen, oldest first.
#[derive(Debug, Default)]
pub struct FlashBoard {
    messages: Vec<Flash>,
    next_id: u64,
}

impl FlashBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn show(&mut self, text: impl Into<String>, kind: FlashKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(Flash {
            id,
            text: text.into(),
            kind,
            shown_at: Instant::now(),
        });
        id
    }

    /// Drop messages whose time is up.
    pub fn expire(&mut self, now: Instant) -> usize {
        let before = self.messages.len();
        self.messages.retain(|flash| flash.expires_at() > now);
        before - self.messages.len()
    }

    /// Messages still visible now.
    pub fn visible(&mut self) -> &[Flash] {
        self.expire(Instant::now());
        &self.messages
    }

    /// Dismiss a message early.
    pub fn dismiss(&mut self, id: u64) -> bool {
        let before = self.messages.len();
        self.messages.retain(|flash| flash.id != id);
        before != self.messages.len()
    }
}
