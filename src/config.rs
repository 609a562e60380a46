use std::env;

/// Block-placement search strategy, selected by `ALLOCATOR_ALGORITHM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Policy {
  FirstFit,
  BestFit,
  WorstFit,
}

/// Reads `ALLOCATOR_ALGORITHM`. Unset defaults to [`Policy::FirstFit`];
/// an unrecognized value yields `None`, which the caller treats as
/// placement exhaustion (forcing region expansion) rather than silently
/// falling back to first-fit.
///
/// Deliberately re-read on every call rather than cached, so the policy
/// can change mid-process without re-linking.
pub(crate) fn algorithm() -> Option<Policy> {
  match env::var("ALLOCATOR_ALGORITHM") {
    Ok(v) => match v.as_str() {
      "first_fit" => Some(Policy::FirstFit),
      "best_fit" => Some(Policy::BestFit),
      "worst_fit" => Some(Policy::WorstFit),
      _ => None,
    },
    Err(_) => Some(Policy::FirstFit),
  }
}

/// `true` iff `ALLOCATOR_SCRIBBLE` is exactly `"1"`.
pub(crate) fn scribble_enabled() -> bool {
  matches!(env::var("ALLOCATOR_SCRIBBLE"), Ok(v) if v == "1")
}
