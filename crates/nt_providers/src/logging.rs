use std::collections::VecDeque;

/// Thin wrapper over `tracing` that tags every line with a stack of prefixes,
/// e.g. `[gnews] returned 7 results`.
#[derive(Debug, Clone, Default)]
pub struct Logger {
    prefixes: VecDeque<String>,
}

impl Logger {
    pub fn new() -> Self {
        Self {
            prefixes: VecDeque::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: String) -> Self {
        self.prefixes.push_back(prefix);
        self
    }

    fn render(&self, message: &str) -> String {
        let prefix = self.prefixes.iter().map(|p| format!("{} ", p)).collect::<String>();
        format!("{}{}", prefix, message)
    }

    pub fn info(&self, message: &str) {
        tracing::info!("{}", self.render(message));
    }

    pub fn warn(&self, message: &str) {
        tracing::warn!("{}", self.render(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefixes_are_rendered_in_order() {
        let log = Logger::new()
            .with_prefix("[verify]".to_string())
            .with_prefix("[gnews]".to_string());
        assert_eq!(log.render("done"), "[verify] [gnews] done");
        assert_eq!(Logger::new().render("bare"), "bare");
    }
}
