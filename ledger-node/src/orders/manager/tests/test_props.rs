use super::*;
use proptest::prelude::*;

fn status_strategy() -> impl Strategy<Value = OrderStatus> {
    prop::sample::select(OrderStatus::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Any request sequence: accepted iff the edge exists, stored status
    /// follows the accepted edges, one event per accepted edge.
    #[test]
    fn prop_status_sequence_follows_table(requests in prop::collection::vec(status_strategy(), 0..10)) {
        let (manager, _clock) = create_test_manager();
        let table = manager.transitions().clone();
        let order = manager.create_order(new_order("P1", "u1")).unwrap();

        let mut expected = OrderStatus::Pending;
        let mut accepted = 0usize;
        for to in requests {
            let result = manager.update_order_status(&order.id, to, "");
            if table.allows(expected, to) {
                prop_assert!(result.is_ok());
                expected = to;
                accepted += 1;
            } else {
                let is_invalid_transition = matches!(result, Err(ContractError::InvalidTransition { .. }));
                prop_assert!(is_invalid_transition);
            }
            prop_assert_eq!(manager.get_order(&order.id).unwrap().status, expected);
        }

        prop_assert_eq!(manager.get_order_events(&order.id).unwrap().len(), 1 + accepted);
        let by_status = manager.get_orders_by_user_and_status("u1", expected).unwrap();
        prop_assert_eq!(by_status.len(), 1);
        prop_assert_eq!(manager.get_orders_by_user("u1").unwrap().len(), 1);
    }
}
