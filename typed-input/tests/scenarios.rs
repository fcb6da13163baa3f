// End-to-end scenarios over the simulated input framework
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use typed_input::simulated::InputAsset;
use typed_input::{Callback, DeviceId, EventKind, InputActions, InstanceOptions, Vec2};

const KEYBOARD: DeviceId = DeviceId(1);
const PAD_A: DeviceId = DeviceId(10);
const PAD_B: DeviceId = DeviceId(11);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum PlayerAction {
    Sprint,
    Jump,
    Move,
}

fn asset() -> InputAsset {
    InputAsset::from_toml_str(
        r#"
        name = "Controls"

        [[devices]]
        id = 1
        name = "Keyboard"
        class = "Keyboard"

        [[devices]]
        id = 10
        name = "Gamepad A"
        class = "Gamepad"

        [[devices]]
        id = 11
        name = "Gamepad B"
        class = "Gamepad"

        [[maps]]
        name = "Player"

        [[maps.actions]]
        name = "Sprint"

        [[maps.actions]]
        name = "Jump"

        [[maps.actions]]
        name = "Move"
        type = "axis2d"
        "#,
    )
    .unwrap()
}

fn counting_callback() -> (Callback, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let seen = Rc::clone(&calls);
    (Callback::new(move |_| seen.set(seen.get() + 1)), calls)
}

#[test]
fn sprint_callback_respects_global_flag_and_disposal() {
    let asset = asset();
    let sprint = asset.action("Player", "Sprint").unwrap();
    let actions = InputActions::new(asset.clone());
    assert!(actions.register_action("Player", PlayerAction::Sprint));

    let (callback, calls) = counting_callback();
    let mut subscription = actions.register_performed(PlayerAction::Sprint, &callback);

    sprint.fire(EventKind::Performed, KEYBOARD, "leftShift");
    assert_eq!(calls.get(), 1);

    actions.disable();
    sprint.fire(EventKind::Performed, KEYBOARD, "leftShift");
    assert_eq!(calls.get(), 1);

    subscription.dispose();
    actions.enable();
    sprint.fire(EventKind::Performed, KEYBOARD, "leftShift");
    assert_eq!(calls.get(), 1);
}

#[test]
fn two_instances_filter_by_device() {
    let asset = asset();
    let jump = asset.action("Player", "Jump").unwrap();

    let player_a = InputActions::for_device(asset.clone(), PAD_A);
    let player_b = InputActions::with_options(asset.clone(), InstanceOptions::new().with_device(PAD_B));
    player_a.register_action("Player", PlayerAction::Jump);
    player_b.register_action("Player", PlayerAction::Jump);

    let (callback_a, calls_a) = counting_callback();
    let (callback_b, calls_b) = counting_callback();
    let _a = player_a.register_performed(PlayerAction::Jump, &callback_a).scoped();
    let _b = player_b.register_performed(PlayerAction::Jump, &callback_b).scoped();

    jump.press(PAD_A, "buttonSouth");
    assert_eq!(calls_a.get(), 1);
    assert_eq!(calls_b.get(), 0);

    // State queries are filtered the same way
    assert!(player_a.is_pressed(PlayerAction::Jump));
    assert!(!player_b.is_pressed(PlayerAction::Jump));
    assert!(player_a.was_pressed_this_frame(PlayerAction::Jump));
    assert!(!player_b.was_pressed_this_frame(PlayerAction::Jump));
}

#[test]
fn per_device_instances_share_one_asset() {
    let asset = asset();
    let movement = asset.action("Player", "Move").unwrap();

    let players = InputActions::per_device(asset.clone(), "Gamepad");
    assert_eq!(players.len(), 2);

    let log: Rc<RefCell<Vec<(String, DeviceId)>>> = Rc::new(RefCell::new(Vec::new()));
    let mut guards = Vec::new();
    for (device, actions) in &players {
        assert_eq!(actions.device_filter(), Some(device.id));
        actions.register_action("Player", PlayerAction::Move);

        let log = Rc::clone(&log);
        let name = device.name.clone();
        let callback = Callback::new(move |context| log.borrow_mut().push((name.clone(), context.device)));
        guards.push(actions.register_performed(PlayerAction::Move, &callback).scoped());
    }

    movement.set_value(PAD_B, "leftStick", Vec2::new(0.0, 1.0).into());
    assert_eq!(*log.borrow(), vec![("Gamepad B".to_string(), PAD_B)]);

    let (_, player_a) = &players[0];
    let (_, player_b) = &players[1];
    assert_eq!(player_a.read_value::<Vec2>(PlayerAction::Move), Vec2::ZERO);
    assert_eq!(player_b.read_value::<Vec2>(PlayerAction::Move), Vec2::new(0.0, 1.0));
}

#[test]
fn guard_unsubscribes_at_scope_exit() {
    let asset = asset();
    let jump = asset.action("Player", "Jump").unwrap();
    let actions = InputActions::new(asset.clone());
    actions.register_action("Player", PlayerAction::Jump);
    let (callback, calls) = counting_callback();

    {
        let _guard = actions.register_started(PlayerAction::Jump, &callback).scoped();
        assert_eq!(actions.subscription_count(), 1);
        jump.press(KEYBOARD, "space");
    }

    assert_eq!(actions.subscription_count(), 0);
    jump.release(KEYBOARD, "space");
    jump.press(KEYBOARD, "space");
    assert_eq!(calls.get(), 1);
}

#[test]
fn disabled_native_action_raises_nothing() {
    let asset = asset();
    let jump = asset.action("Player", "Jump").unwrap();
    let actions = InputActions::new(asset.clone());
    actions.register_action("Player", PlayerAction::Jump);
    let (callback, calls) = counting_callback();
    let _guard = actions.register_performed(PlayerAction::Jump, &callback).scoped();

    actions.disable_action(PlayerAction::Jump);
    jump.press(KEYBOARD, "space");
    assert_eq!(calls.get(), 0);
    assert!(!actions.is_pressed(PlayerAction::Jump));

    actions.enable_action(PlayerAction::Jump);
    jump.press(KEYBOARD, "space");
    assert_eq!(calls.get(), 1);
}

#[test]
fn teardown_survives_outstanding_handles() {
    let asset = asset();
    let sprint = asset.action("Player", "Sprint").unwrap();
    let actions = InputActions::new(asset.clone());
    actions.register_action("Player", PlayerAction::Sprint);

    let (callback, calls) = counting_callback();
    let mut started = actions.register_started(PlayerAction::Sprint, &callback);
    let guard = actions.register_canceled(PlayerAction::Sprint, &callback).scoped();

    actions.dispose();
    started.dispose();
    drop(guard);

    actions.enable();
    sprint.press(KEYBOARD, "leftShift");
    sprint.release(KEYBOARD, "leftShift");
    assert_eq!(calls.get(), 0);
    assert_eq!(sprint.listener_count(EventKind::Started), 0);
    assert_eq!(sprint.listener_count(EventKind::Canceled), 0);
}

#[test]
fn instances_sharing_an_asset_keep_their_own_listeners() {
    let asset = asset();
    let jump = asset.action("Player", "Jump").unwrap();
    let player_b = InputActions::new(asset.clone());
    player_b.register_action("Player", PlayerAction::Jump);
    let (callback_b, calls_b) = counting_callback();
    let _b = player_b.register_performed(PlayerAction::Jump, &callback_b).scoped();

    {
        let player_a = InputActions::new(asset.clone());
        player_a.register_action("Player", PlayerAction::Jump);
        let (callback_a, calls_a) = counting_callback();
        let mut a = player_a.register_performed(PlayerAction::Jump, &callback_a);
        let _a_started = player_a.register_started(PlayerAction::Jump, &callback_a).scoped();

        jump.fire(EventKind::Performed, KEYBOARD, "space");
        assert_eq!((calls_a.get(), calls_b.get()), (1, 1));

        // Disposing A's subscription leaves B's listener in place
        a.dispose();
        jump.fire(EventKind::Performed, KEYBOARD, "space");
        assert_eq!((calls_a.get(), calls_b.get()), (1, 2));

        // So does tearing A down
        player_a.dispose();
        jump.fire(EventKind::Performed, KEYBOARD, "space");
        assert_eq!(calls_b.get(), 3);
    }

    // And dropping it
    {
        let player_c = InputActions::new(asset.clone());
        player_c.register_action("Player", PlayerAction::Jump);
        let (callback_c, _) = counting_callback();
        let _c = player_c.register_performed(PlayerAction::Jump, &callback_c).scoped();
        assert_eq!(jump.listener_count(EventKind::Performed), 2);
    }

    jump.fire(EventKind::Performed, KEYBOARD, "space");
    assert_eq!(calls_b.get(), 4);
    assert_eq!(player_b.subscription_count(), 1);
    assert_eq!(jump.listener_count(EventKind::Performed), 1);
}
