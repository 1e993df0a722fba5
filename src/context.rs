use std::fmt;
use std::fmt::{Display, Formatter};
use std::time::Instant;

use log::{debug, info};

/// Names the query being computed and times it.
///
/// A default context is silent: its messages go to the debug level and it
/// does not report the duration when dropped.
pub struct CallContext {
    query: String,
    start_time: Instant,
}

impl Default for CallContext {
    fn default() -> CallContext {
        CallContext {
            query: String::new(),
            start_time: Instant::now(),
        }
    }
}

impl CallContext {
    pub fn new(query: &str) -> Self {
        let context = CallContext {
            query: query.to_string(),
            start_time: Instant::now(),
        };
        info!("-> [{}]", context.query);
        context
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn log_message(&self, message: &str) {
        if self.query.is_empty() {
            debug!("{message}");
        } else {
            info!("   [{}] {message}", self.query);
        }
    }
}

impl Drop for CallContext {
    fn drop(&mut self) {
        if self.query.is_empty() {
            return;
        }
        let call_duration = self.start_time.elapsed().as_millis();
        info!("<- [{}] (took {} ms)", self.query, call_duration);
    }
}

impl Display for CallContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.query)
    }
}
