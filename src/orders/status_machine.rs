use crate::orders::models::OrderStatus;

/// Order status transition rules
///
/// `pending` is the entry state. `completed`, `failed` and `expired` are
/// terminal. The webhook drives `pending → processing`; only the unified
/// complete operation drives `processing → completed`.
pub struct StatusMachine;

impl StatusMachine {
    /// Check if a status transition is valid
    ///
    /// # Valid Transitions
    /// - Pending → Processing (payment confirmed by the gateway webhook)
    /// - Pending → Failed (gateway reported failure)
    /// - Pending → Expired (payment window elapsed)
    /// - Processing → Completed (fulfillment finished)
    /// - Processing → Failed (fulfillment abandoned)
    /// - Any status → itself (idempotent no-op)
    pub fn is_valid_transition(from: OrderStatus, to: OrderStatus) -> bool {
        // Same status is always valid (idempotent)
        if from == to {
            return true;
        }

        match (from, to) {
            (OrderStatus::Pending, OrderStatus::Processing) => true,
            (OrderStatus::Pending, OrderStatus::Failed) => true,
            (OrderStatus::Pending, OrderStatus::Expired) => true,

            (OrderStatus::Processing, OrderStatus::Completed) => true,
            (OrderStatus::Processing, OrderStatus::Failed) => true,

            // Terminal states allow no transitions (same-status handled above)
            (OrderStatus::Completed, _) => false,
            (OrderStatus::Failed, _) => false,
            (OrderStatus::Expired, _) => false,

            _ => false,
        }
    }

    /// Attempt to transition from one status to another
    pub fn transition(from: OrderStatus, to: OrderStatus) -> Result<OrderStatus, String> {
        if Self::is_valid_transition(from, to) {
            Ok(to)
        } else {
            Err(format!("Invalid status transition from {} to {}", from, to))
        }
    }

    /// Whether a status admits no further transitions
    pub fn is_terminal(status: OrderStatus) -> bool {
        matches!(
            status,
            OrderStatus::Completed | OrderStatus::Failed | OrderStatus::Expired
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_to_processing() {
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Processing
        ));
    }

    #[test]
    fn test_pending_to_failed() {
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Failed
        ));
    }

    #[test]
    fn test_pending_to_expired() {
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Expired
        ));
    }

    #[test]
    fn test_processing_to_completed() {
        assert!(StatusMachine::is_valid_transition(
            OrderStatus::Processing,
            OrderStatus::Completed
        ));
    }

    #[test]
    fn test_pending_cannot_skip_to_completed() {
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Pending,
            OrderStatus::Completed
        ));
    }

    #[test]
    fn test_processing_cannot_go_back_to_pending() {
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Processing,
            OrderStatus::Pending
        ));
    }

    #[test]
    fn test_completed_is_terminal() {
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Completed,
            OrderStatus::Processing
        ));
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Completed,
            OrderStatus::Failed
        ));
    }

    #[test]
    fn test_expired_is_terminal() {
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Expired,
            OrderStatus::Pending
        ));
        assert!(!StatusMachine::is_valid_transition(
            OrderStatus::Expired,
            OrderStatus::Completed
        ));
    }

    #[test]
    fn test_transition_valid() {
        let result = StatusMachine::transition(OrderStatus::Pending, OrderStatus::Processing);
        assert_eq!(result.unwrap(), OrderStatus::Processing);
    }

    #[test]
    fn test_transition_invalid() {
        let result = StatusMachine::transition(OrderStatus::Pending, OrderStatus::Completed);
        assert!(result.unwrap_err().contains("Invalid status transition"));
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    fn order_status_strategy() -> impl Strategy<Value = OrderStatus> {
        prop_oneof![
            Just(OrderStatus::Pending),
            Just(OrderStatus::Processing),
            Just(OrderStatus::Completed),
            Just(OrderStatus::Failed),
            Just(OrderStatus::Expired),
        ]
    }

    /// Same-status transitions are always valid, making replayed webhook and
    /// completion calls no-ops rather than errors
    #[test]
    fn prop_same_status_is_valid() {
        proptest!(|(status in order_status_strategy())| {
            prop_assert!(StatusMachine::is_valid_transition(status, status));
        });
    }

    /// Terminal states admit no outgoing transition
    #[test]
    fn prop_terminal_states_are_terminal() {
        proptest!(|(
            from in order_status_strategy(),
            to in order_status_strategy()
        )| {
            if StatusMachine::is_terminal(from) && from != to {
                prop_assert!(!StatusMachine::is_valid_transition(from, to));
            }
        });
    }

    /// `transition` agrees with `is_valid_transition`
    #[test]
    fn prop_transition_consistency() {
        proptest!(|(
            from in order_status_strategy(),
            to in order_status_strategy()
        )| {
            let is_valid = StatusMachine::is_valid_transition(from, to);
            let result = StatusMachine::transition(from, to);
            if is_valid {
                prop_assert_eq!(result.unwrap(), to);
            } else {
                prop_assert!(result.is_err());
            }
        });
    }

    /// Completion is only reachable through processing
    #[test]
    fn prop_completed_only_from_processing() {
        proptest!(|(from in order_status_strategy())| {
            if from != OrderStatus::Processing && from != OrderStatus::Completed {
                prop_assert!(!StatusMachine::is_valid_transition(from, OrderStatus::Completed));
            }
        });
    }
}
