use chrono::{DateTime, Local};

/// Where the pod list fetch currently stands
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RefreshStatus {
    Idle,
    Fetching,
    /// Last fetch failed; rows from the previous success stay on screen
    Failed(String),
}

/// Serializes pod refreshes
///
/// At most one fetch is in flight. Requests made while one is running
/// coalesce into a single follow-up fetch started on completion.
#[derive(Debug)]
pub struct RefreshGate {
    status: RefreshStatus,
    pending: bool,
    last_success: Option<DateTime<Local>>,
}

impl Default for RefreshGate {
    fn default() -> Self {
        Self::new()
    }
}

impl RefreshGate {
    pub fn new() -> Self {
        Self {
            status: RefreshStatus::Idle,
            pending: false,
            last_success: None,
        }
    }

    pub fn status(&self) -> &RefreshStatus {
        &self.status
    }

    pub fn is_fetching(&self) -> bool {
        self.status == RefreshStatus::Fetching
    }

    pub fn has_pending(&self) -> bool {
        self.pending
    }

    pub fn last_success(&self) -> Option<DateTime<Local>> {
        self.last_success
    }

    /// Ask for a refresh. Returns true when the caller should start a fetch now.
    pub fn request(&mut self) -> bool {
        if self.is_fetching() {
            self.pending = true;
            return false;
        }
        self.status = RefreshStatus::Fetching;
        true
    }

    /// Record a successful fetch. Returns true when a coalesced fetch should start.
    pub fn succeed(&mut self) -> bool {
        self.last_success = Some(Local::now());
        self.status = RefreshStatus::Idle;
        self.take_pending()
    }

    /// Record a failed fetch. Returns true when a coalesced fetch should start.
    pub fn fail(&mut self, error: String) -> bool {
        self.status = RefreshStatus::Failed(error);
        self.take_pending()
    }

    fn take_pending(&mut self) -> bool {
        if std::mem::take(&mut self.pending) {
            self.status = RefreshStatus::Fetching;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_request_starts_fetch() {
        let mut gate = RefreshGate::new();
        assert!(gate.request());
        assert!(gate.is_fetching());
    }

    #[test]
    fn overlapping_requests_coalesce_into_one_follow_up() {
        let mut gate = RefreshGate::new();
        assert!(gate.request());
        assert!(!gate.request());
        assert!(!gate.request());
        assert!(gate.has_pending());

        // Completion starts exactly one follow-up
        assert!(gate.succeed());
        assert!(gate.is_fetching());
        assert!(!gate.has_pending());

        assert!(!gate.succeed());
        assert_eq!(gate.status(), &RefreshStatus::Idle);
    }

    #[test]
    fn failure_is_distinguishable_from_success() {
        let mut gate = RefreshGate::new();
        gate.request();
        assert!(!gate.fail("exit 1".into()));
        assert_eq!(gate.status(), &RefreshStatus::Failed("exit 1".into()));
        assert!(gate.last_success().is_none());

        assert!(gate.request());
        assert!(!gate.succeed());
        assert_eq!(gate.status(), &RefreshStatus::Idle);
        assert!(gate.last_success().is_some());
    }

    #[test]
    fn pending_request_survives_failure() {
        let mut gate = RefreshGate::new();
        gate.request();
        gate.request();
        assert!(gate.fail("boom".into()));
        assert!(gate.is_fetching());
    }
}
