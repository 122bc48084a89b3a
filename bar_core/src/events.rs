/// In-memory log of one-line scheduler events.
///
/// Labels are dot-separated (`npc.state 1 waiting_first`) so a host can
/// filter by prefix before dumping the run to JSON.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    entries: Vec<String>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, line: String) {
        self.entries.push(line);
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count of entries whose label starts with `prefix`.
    pub fn count_matching(&self, prefix: &str) -> usize {
        self.entries
            .iter()
            .filter(|line| line.starts_with(prefix))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::EventLog;

    #[test]
    fn count_matching_filters_by_prefix() {
        let mut log = EventLog::new();
        log.push("pool.acquire 0 1".to_string());
        log.push("pool.release 0".to_string());
        log.push("pool.acquire 2 1".to_string());
        assert_eq!(log.count_matching("pool.acquire"), 2);
        assert_eq!(log.count_matching("timer."), 0);
        assert_eq!(log.len(), 3);
    }
}
