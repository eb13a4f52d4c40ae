//! Properties of the scroll integrator that must hold for any input sequence

use proptest::prelude::*;
use sheen_animation::{ScrollConfig, ScrollPhysicsEngine};

const VIEWPORT: f32 = 900.0;

fn engine() -> ScrollPhysicsEngine {
    let mut engine =
        ScrollPhysicsEngine::new(ScrollConfig::default(), VIEWPORT, vec![0.0, 900.0, 1800.0])
            .expect("default config is valid");
    engine.enable();
    engine
}

#[derive(Debug, Clone)]
enum Event {
    Wheel(f32),
    Tick,
}

fn event() -> impl Strategy<Value = Event> {
    prop_oneof![
        (-5000.0f32..5000.0).prop_map(Event::Wheel),
        Just(Event::Tick),
    ]
}

proptest! {
    #[test]
    fn position_never_negative(events in prop::collection::vec(event(), 1..400)) {
        let mut engine = engine();
        for event in events {
            match event {
                Event::Wheel(delta) => engine.on_input(delta),
                Event::Tick => {
                    engine.tick();
                }
            }
            prop_assert!(engine.position() >= 0.0);
        }
    }

    #[test]
    fn pending_delta_bounded(events in prop::collection::vec(event(), 1..400)) {
        let mut engine = engine();
        let limit = VIEWPORT / 3.0 + 1e-3;
        for event in events {
            match event {
                Event::Wheel(delta) => engine.on_input(delta),
                Event::Tick => {
                    engine.tick();
                }
            }
            prop_assert!(engine.state().pending_delta.abs() <= limit);
        }
    }

    #[test]
    fn disabled_engine_is_inert(events in prop::collection::vec(event(), 1..200)) {
        let mut engine = engine();
        engine.on_input(400.0);
        engine.tick();
        engine.disable();
        let frozen = *engine.state();
        for event in events {
            match event {
                Event::Wheel(delta) => engine.on_input(delta),
                Event::Tick => {
                    prop_assert!(!engine.tick());
                }
            }
        }
        prop_assert_eq!(*engine.state(), frozen);
    }

    #[test]
    fn staged_input_never_moves_position(delta in -5000.0f32..5000.0, start in 0.0f32..3000.0) {
        let mut engine = engine();
        engine.set_position(start);
        engine.on_input(delta);
        prop_assert_eq!(engine.position(), start);
    }
}
