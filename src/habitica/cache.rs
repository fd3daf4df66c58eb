//! Query keys for cached Habitica fetches.

/// A logical query against the task API. Each variant owns one cache slot;
/// the shape leaves room for the other Habitica task kinds (habits, todos).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskQuery {
  /// The user's daily tasks.
  Dailies,
}

impl TaskQuery {
  pub fn cache_key(self) -> &'static str {
    match self {
      Self::Dailies => "dailies",
    }
  }

  /// The list endpoint for this query. Habitica spells the type "dailys".
  pub fn endpoint(self) -> &'static str {
    match self {
      Self::Dailies => "/tasks/user?type=dailys",
    }
  }

  pub fn description(self) -> &'static str {
    match self {
      Self::Dailies => "daily tasks",
    }
  }
}
