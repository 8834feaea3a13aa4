use super::*;

#[test]
fn test_enter_leave_pairs() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(4);
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    assert_eq!(guard.depth(), 2);
    assert!(guard.is_visiting(&1));
    guard.leave(2);
    guard.leave(1);
    assert_eq!(guard.depth(), 0);
    assert!(!guard.is_active());
}

#[test]
fn test_reentering_a_key_is_a_cycle() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(4);
    assert!(guard.enter(7).is_entered());
    let result = guard.enter(7);
    assert!(result.is_cycle());
    assert!(result.is_denied());
    assert_eq!(guard.depth(), 1);
    guard.leave(7);
}

#[test]
fn test_depth_limit() {
    let mut guard: RecursionGuard<u32> =
        RecursionGuard::with_profile(RecursionProfile::Custom { max_depth: 2 });
    assert!(guard.enter(1).is_entered());
    assert!(guard.enter(2).is_entered());
    assert_eq!(guard.enter(3), RecursionResult::DepthExceeded);
    assert!(guard.is_exceeded());
    guard.leave(2);
    guard.leave(1);
    // Exceeding is sticky, entering works again.
    assert!(guard.is_exceeded());
    assert!(guard.enter(3).is_entered());
    guard.leave(3);
}

#[test]
fn test_denied_entry_leaves_guard_unchanged() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(1);
    assert!(guard.enter(5).is_entered());
    assert_eq!(guard.enter(5), RecursionResult::Cycle);
    assert_eq!(guard.enter(6), RecursionResult::DepthExceeded);
    assert_eq!(guard.depth(), 1);
    assert!(!guard.is_visiting(&6));
    guard.leave(5);
    assert!(!guard.is_active());
}

#[test]
fn test_profiles() {
    assert_eq!(
        RecursionProfile::CallContext.max_depth(),
        tyinfer_common::limits::MAX_CALL_CONTEXT_DEPTH
    );
    assert_eq!(
        RecursionProfile::CallEvaluation.max_depth(),
        tyinfer_common::limits::MAX_CALL_EVALUATION_DEPTH
    );
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "active entries")]
fn test_drop_with_active_entries_panics() {
    let mut guard: RecursionGuard<u32> = RecursionGuard::new(2);
    let _ = guard.enter(1);
}
