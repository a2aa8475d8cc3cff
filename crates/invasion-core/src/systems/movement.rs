//! Movement system - advances the player entity

use invasion_logic::geometry::Arena;

use crate::components::{Agent, MoveInput};

/// Move the agent by keyboard intent, or toward its pointer target when no
/// key is held.
pub fn agent_movement_system(agent: &mut Agent, input: &MoveInput, arena: &Arena, delta_seconds: f32) {
    let had_target = agent.pointer_target().is_some();
    agent.update(delta_seconds, input, arena);
    if had_target && agent.pointer_target().is_none() && input.is_idle() {
        log::debug!(
            "Agent reached pointer target at ({:.1}, {:.1})",
            agent.position.x,
            agent.position.y
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use invasion_logic::config::AgentConfig;
    use invasion_logic::geometry::Vec2;

    #[test]
    fn test_idle_agent_stays_put() {
        let arena = Arena::default();
        let mut agent = Agent::new(Vec2::new(300.0, 300.0), &AgentConfig::default());
        agent_movement_system(&mut agent, &MoveInput::NONE, &arena, 1.0);
        assert_eq!(agent.position, Vec2::new(300.0, 300.0));
        assert_eq!(agent.velocity, Vec2::ZERO);
    }

    #[test]
    fn test_agent_cannot_leave_arena() {
        let arena = Arena::new(200.0, 200.0);
        let mut agent = Agent::new(Vec2::new(180.0, 100.0), &AgentConfig::default());
        let input = MoveInput {
            right: true,
            ..MoveInput::NONE
        };
        for _ in 0..10 {
            agent_movement_system(&mut agent, &input, &arena, 0.1);
        }
        assert_eq!(agent.position.x, 190.0);
    }
}
