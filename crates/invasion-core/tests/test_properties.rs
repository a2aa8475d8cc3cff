use invasion_core::prelude::*;
use invasion_logic::config::AgentConfig;
use invasion_logic::currency::Currency;
use invasion_logic::geometry::{Arena, Vec2};
use invasion_logic::kinds::CollectibleKind;
use proptest::prelude::*;

fn item(value: u32) -> CargoItem {
    CargoItem {
        kind: CollectibleKind::Normal,
        currency: Currency::Meat,
        value,
    }
}

prop_compose! {
    fn arb_input()(
        up in any::<bool>(),
        down in any::<bool>(),
        left in any::<bool>(),
        right in any::<bool>()
    ) -> MoveInput {
        MoveInput { up, down, left, right }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn test_cargo_never_exceeds_max(
        max_cargo in 0u32..8,
        values in prop::collection::vec(1u32..4, 0..20)
    ) {
        let config = AgentConfig { max_cargo, ..AgentConfig::default() };
        let mut agent = Agent::new(Vec2::ZERO, &config);
        for value in values {
            let was_full = agent.is_full();
            let before = agent.cargo().to_vec();
            let accepted = agent.consume(item(value));
            prop_assert_eq!(accepted, !was_full);
            if !accepted {
                prop_assert_eq!(agent.cargo(), before.as_slice());
            }
            prop_assert!(agent.cargo_count() <= max_cargo);
        }
    }

    #[test]
    fn test_agent_stays_inside_arena(
        inputs in prop::collection::vec(arb_input(), 1..60),
        dt in 0.0f32..0.5
    ) {
        let arena = Arena::default();
        let mut agent = Agent::new(arena.center(), &AgentConfig::default());
        let half = agent.size() / 2.0;
        for input in &inputs {
            agent.update(dt, input, &arena);
            prop_assert!(arena.contains(&agent.position, half));
        }
    }

    #[test]
    fn test_return_to_base_on_empty_is_noop(x in 0.0f32..1000.0, y in 0.0f32..700.0) {
        let mut agent = Agent::new(Vec2::new(x, y), &AgentConfig::default());
        prop_assert!(agent.return_to_base().is_empty());
        prop_assert_eq!(agent.cargo_count(), 0);
        prop_assert_eq!(agent.position, Vec2::new(x, y));
    }
}
