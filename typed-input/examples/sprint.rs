//! Typed actions walkthrough
//!
//! Registers a few player actions against an in-process asset, subscribes to
//! their events and drives some input through the simulated framework.
//!
//! Usage:
//!   cargo run --example sprint
//!   RUST_LOG=trace cargo run --example sprint

use typed_input::simulated::{AssetDefinition, InputAsset, MapDefinition, ValueType};
use typed_input::{Callback, DeviceId, DeviceInfo, InputActions, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PlayerAction {
    Sprint,
    Move,
}

fn main() {
    env_logger::init();

    let asset = InputAsset::from_definition(
        AssetDefinition::new()
            .with_name("Demo")
            .with_device(DeviceInfo::new(1, "Keyboard", "Keyboard"))
            .with_device(DeviceInfo::new(2, "Gamepad 1", "Gamepad"))
            .with_map(
                MapDefinition::new("Player")
                    .with_action("Sprint", ValueType::Button)
                    .with_action("Move", ValueType::Axis2d),
            ),
    )
    .expect("demo asset is valid");

    let actions = InputActions::new(asset.clone());
    actions.register_action("Player", PlayerAction::Sprint);
    actions.register_action("Player", PlayerAction::Move);

    let on_sprint = Callback::new(|context| {
        println!("{:>9} Sprint via {} ({})", context.kind.to_string(), context.control, context.device);
    });
    let _started = actions.register_started(PlayerAction::Sprint, &on_sprint).scoped();
    let mut performed = actions.register_performed(PlayerAction::Sprint, &on_sprint);

    let sprint = asset.action("Player", "Sprint").expect("Sprint exists");
    let movement = asset.action("Player", "Move").expect("Move exists");

    sprint.press(DeviceId(1), "leftShift");
    println!("is_pressed(Sprint) = {}", actions.is_pressed(PlayerAction::Sprint));

    movement.set_value(DeviceId(2), "leftStick", Vec2::new(0.5, 0.5).into());
    println!("read_value(Move) = {:?}", actions.read_value::<Vec2>(PlayerAction::Move));

    asset.end_frame();
    sprint.release(DeviceId(1), "leftShift");

    println!("-- disabled");
    actions.disable();
    sprint.press(DeviceId(1), "leftShift");
    println!("is_pressed(Sprint) = {}", actions.is_pressed(PlayerAction::Sprint));

    println!("-- performed handle disposed, re-enabled");
    performed.dispose();
    actions.enable();
    sprint.release(DeviceId(1), "leftShift");
    sprint.press(DeviceId(1), "leftShift");

    println!("subscriptions left: {}", actions.subscription_count());
}
