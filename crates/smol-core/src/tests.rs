#[cfg(test)]
mod tests {
    use crate::commands::MovementCommand;
    use crate::enums::*;
    use crate::error::SimError;
    use crate::events::SimEvent;
    use crate::state::WorldSnapshot;
    use crate::types::{EntityId, Lifetime, Point, SimTime};

    #[test]
    fn test_direction_right_is_unit_x() {
        let v = Direction::Right.unit_vector();
        assert_eq!(v, Point::new(1.0, 0.0));
        assert_eq!(Direction::Up.unit_vector(), Point::new(0.0, -1.0));
    }

    #[test]
    fn test_diagonals_are_normalized() {
        for dir in [
            Direction::UpLeft,
            Direction::UpRight,
            Direction::DownLeft,
            Direction::DownRight,
        ] {
            let len = dir.unit_vector().length();
            assert!((len - 1.0).abs() < 1e-12, "{dir:?} has length {len}");
        }
    }

    /// Commands arrive from the UI side as tagged JSON.
    #[test]
    fn test_movement_command_from_json() {
        let cmd = MovementCommand::from_json(r#"{"type":"Direction","direction":"Left"}"#).unwrap();
        assert_eq!(cmd, MovementCommand::direction(Direction::Left));

        let cmd = MovementCommand::from_json(r#"{"type":"MoveTo","target":[10.0,20.0]}"#).unwrap();
        assert_eq!(cmd, MovementCommand::move_to(Point::new(10.0, 20.0)));
    }

    #[test]
    fn test_unknown_command_shape_is_malformed() {
        let err = MovementCommand::from_json(r#"{"type":"Teleport","x":1}"#).unwrap_err();
        assert!(matches!(err, SimError::MalformedCommand(_)));

        let err = MovementCommand::from_json("not json").unwrap_err();
        assert!(matches!(err, SimError::MalformedCommand(_)));
    }

    #[test]
    fn test_non_finite_target_is_malformed() {
        let cmd = MovementCommand::move_to(Point::new(f64::NAN, 0.0));
        assert!(matches!(cmd.validate(), Err(SimError::MalformedCommand(_))));
        assert!(MovementCommand::direction(Direction::Down).validate().is_ok());
    }

    #[test]
    fn test_invalid_state_message() {
        let err = SimError::InvalidState {
            action: "stop",
            state: LoopState::Paused,
        };
        assert_eq!(err.to_string(), "cannot stop while Paused");
    }

    #[test]
    fn test_entity_id_display_splits_bits() {
        let id = EntityId((3u64 << 32) | 7);
        assert_eq!(id.index(), 7);
        assert_eq!(id.generation(), 3);
        assert_eq!(id.to_string(), "E7g3");
    }

    #[test]
    fn test_sim_time_advance() {
        let mut time = SimTime::default();
        for _ in 0..60 {
            time.advance(1.0 / 60.0);
        }
        assert_eq!(time.tick, 60);
        assert!((time.elapsed_secs - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_lifetime_runs_out() {
        let mut lifetime = Lifetime::new(2);
        assert!(!lifetime.tick_down());
        assert!(lifetime.tick_down());
        assert!(lifetime.tick_down());
    }

    /// Snapshots are forwarded to hosts as JSON; events keep their tag.
    #[test]
    fn test_snapshot_serializes_events_tagged() {
        let snapshot = WorldSnapshot {
            events: vec![SimEvent::Died {
                entity: EntityId(1),
            }],
            ..Default::default()
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains(r#""type":"Died""#));
        let back: WorldSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snapshot);
    }
}
