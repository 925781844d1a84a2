/// Source of transaction ids for an import. Injected so imports are
/// reproducible in tests.
pub trait IdGenerator {
    fn next_id(&mut self) -> String;
}

/// `{prefix}-1`, `{prefix}-2`, ...
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
