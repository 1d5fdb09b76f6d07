//! Process-wide shared logger.
//!
//! Every notification writes its delivery line through the same instance.
//! Lines go to the `log` facade and a bounded in-memory tail that callers
//! can read back.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{SecondsFormat, Utc};
use log::info;
use once_cell::sync::Lazy;

use crate::config::get_registry_config;

static GLOBAL_LOGGER: Lazy<Logger> = Lazy::new(|| Logger::with_capacity(get_registry_config().log_capacity()));

pub struct Logger {
    capacity: usize,
    lines: Mutex<VecDeque<String>>,
}

impl Logger {
    /// The shared instance. Built on first call; every later call returns
    /// the same reference.
    #[inline]
    pub fn instance() -> &'static Logger {
        &GLOBAL_LOGGER
    }

    fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            lines: Mutex::new(VecDeque::with_capacity(capacity)),
        }
    }

    /// Timestamps `message`, emits it at info level and keeps it in the tail.
    /// Returns the stamped line.
    pub fn log(&self, message: &str) -> String {
        let line = format!("[{}] {}", Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true), message);
        info!(target: "entity_registry", "{}", line);

        // A poisoned tail only loses history; the line was already emitted.
        if let Ok(mut tail) = self.lines.lock() {
            if tail.len() == self.capacity {
                tail.pop_front();
            }
            tail.push_back(line.clone());
        }

        line
    }

    /// Most recent lines, oldest first.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(tail) => tail.iter().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.lines.lock().map(|tail| tail.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
