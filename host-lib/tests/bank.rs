//! Several switches behind one controller


mod common;


use std::thread;

use host_lib::{
    Config,
    PortMap,
    PortState,
    Recorder,
    Route,
    RouteTarget,
    SettleTime,
    SwitchBank,
    ValidationError,
    bank::BankInitError,
    protocol::pin::Pin,
    switch::SwitchError,
};

use self::common::{
    Result,
    assert_break_before_make,
    init_logger,
    three_ports,
    two_ports,
};


fn bank() -> Result<SwitchBank<Recorder>> {
    init_logger();

    let mut bank = SwitchBank::new(Recorder::new());
    bank.add_switch("a", &three_ports(), SettleTime::default(), false)?;
    bank.add_switch(
        "b",
        &PortMap::new()
            .with_port("X", Pin(11), Pin(12))
            .with_port("Y", Pin(13), Pin(14)),
        SettleTime::default(),
        false,
    )?;

    Ok(bank)
}


#[test]
fn it_should_build_switches_from_configuration() -> Result {
    init_logger();

    let config = Config::parse(r#"
        settle_time = 0.005
        reset       = true

        [switches]
        sw1 = "sw1"

        [switches.aux]
        A = [1, 2]
        B = [3, 4]
    "#)?;
    let bank = SwitchBank::from_config(&config, Recorder::new())?;

    assert_eq!(bank.switch_names().collect::<Vec<_>>(), vec!["aux", "sw1"]);
    assert_eq!(bank.route("aux")?, Route::NoConnection);
    assert_eq!(bank.route("sw1")?, Route::NoConnection);
    assert_eq!(bank.settle_time("sw1")?.as_secs_f64(), 0.005);

    // One pulse per distinct reset pin
    let pulsed = bank.into_outputs().pulsed_pins();
    assert_eq!(pulsed, vec![Pin(1), Pin(3), Pin(26)]);

    Ok(())
}

#[test]
fn it_should_not_touch_pins_if_the_configuration_is_invalid() -> Result {
    init_logger();

    let config = Config::parse(r#"
        [switches]
        good = "sw0"
        nope = "sw5"
    "#)?;
    let result = SwitchBank::from_config(&config, Recorder::new());

    match result {
        Err(BankInitError::Validation(ValidationError::UnknownPreset(name))) => {
            assert_eq!(name, "sw5");
        }
        Err(err) => {
            panic!("unexpected error: {:?}", err);
        }
        Ok(_) => {
            panic!("invalid preset accepted");
        }
    }

    Ok(())
}

#[test]
fn it_should_address_switches_by_name() -> Result {
    let bank = bank()?;

    bank.set_route("a", &RouteTarget::port("B"))?;
    bank.set_route("b", &RouteTarget::port("Y"))?;

    assert_eq!(bank.route("a")?, Route::Port("B".into()));
    assert_eq!(bank.route("b")?, Route::Port("Y".into()));
    assert_eq!(bank.port_state("b", "X")?, PortState::Disconnected);

    bank.set_port("b", "X", true)?;
    assert_eq!(bank.route("b")?, Route::Ambiguous);

    assert_eq!(
        bank.route("c"),
        Err(ValidationError::UnknownSwitch("c".into())),
    );
    assert_eq!(
        bank.port_state("a", "Y"),
        Err(ValidationError::UnknownPort("Y".into())),
    );

    Ok(())
}

#[test]
fn it_should_reject_duplicate_switch_names() -> Result {
    let mut bank = bank()?;

    let result = bank.add_switch("a", &two_ports(), SettleTime::default(), false);
    assert!(result.is_err());
    assert_eq!(bank.switch_names().count(), 2);

    Ok(())
}

#[test]
fn it_should_keep_the_settle_time_if_the_new_one_is_invalid() -> Result {
    let bank = bank()?;

    bank.set_settle_time("a", 0.1)?;
    assert_eq!(bank.settle_time("a")?.as_secs_f64(), 0.1);

    assert_eq!(
        bank.set_settle_time("a", 3.0),
        Err(ValidationError::SettleTimeOutOfRange(3.0)),
    );
    assert_eq!(
        bank.set_settle_time("a", 0.0),
        Err(ValidationError::SettleTimeOutOfRange(0.0)),
    );
    assert_eq!(bank.settle_time("a")?.as_secs_f64(), 0.1);

    // Other switches are not affected
    assert_eq!(bank.settle_time("b")?, SettleTime::default());

    Ok(())
}

#[test]
fn it_should_serialize_route_changes_per_switch() -> Result {
    let bank = bank()?;
    bank.with_outputs(|outputs| outputs.clear());

    thread::scope(|scope| {
        for worker in 0 .. 4 {
            let bank = &bank;
            scope.spawn(move || {
                let targets_a = ["A", "B", "C", "Disconnected"];
                let targets_b = ["X", "Y", "Disconnected"];

                for i in 0 .. 25 {
                    let target = targets_a[(worker + i) % targets_a.len()];
                    bank.set_route("a", &target.into()).unwrap();

                    let target = targets_b[(worker + i) % targets_b.len()];
                    bank.set_route("b", &target.into()).unwrap();
                }
            });
        }
    });

    let pulsed = bank.with_outputs(|outputs| outputs.pulsed_pins());
    assert_break_before_make(&three_ports(), &pulsed);
    assert_break_before_make(
        &PortMap::new()
            .with_port("X", Pin(11), Pin(12))
            .with_port("Y", Pin(13), Pin(14)),
        &pulsed,
    );

    for switch in &["a", "b"] {
        match bank.route(switch)? {
            Route::Port(_) | Route::NoConnection => {}
            route => panic!("{}: inconsistent route {}", switch, route),
        }
    }

    Ok(())
}

#[test]
fn it_should_reject_switches_that_reuse_pins_of_another_switch() -> Result {
    let mut bank = bank()?;
    bank.with_outputs(|outputs| outputs.clear());

    let result = bank.add_switch(
        "c",
        &PortMap::new().with_port("Z", Pin(20), Pin(2)),
        SettleTime::default(),
        true,
    );

    match result {
        Err(SwitchError::Validation(
            ValidationError::PinInUse { switch, pin }
        )) => {
            assert_eq!(switch, "a");
            assert_eq!(pin, Pin(2));
        }
        result => panic!("unexpected result: {:?}", result),
    }
    assert_eq!(bank.switch_names().count(), 2);
    assert!(bank.with_outputs(|outputs| outputs.trace().is_empty()));

    // The other switches keep tracking their own pulses only
    bank.set_route("a", &RouteTarget::port("A"))?;
    assert_eq!(bank.route("a")?, Route::Port("A".into()));

    Ok(())
}

#[test]
fn it_should_reject_configurations_with_overlapping_switches() -> Result {
    init_logger();

    let config = Config::parse(r#"
        [switches.a]
        A = [1, 2]

        [switches.b]
        X = [3, 2]
    "#)?;
    let result = SwitchBank::from_config(&config, Recorder::new());

    match result {
        Err(BankInitError::Validation(ValidationError::PinInUse { pin, .. })) => {
            assert_eq!(pin, Pin(2));
        }
        Err(err) => {
            panic!("unexpected error: {:?}", err);
        }
        Ok(_) => {
            panic!("overlapping switches accepted");
        }
    }

    Ok(())
}

#[test]
fn it_should_reject_configurations_with_shared_set_pins() -> Result {
    init_logger();

    let config = Config::parse(r#"
        [switches.a]
        A = [1, 2]
        B = [3, 2]
    "#)?;
    let result = SwitchBank::from_config(&config, Recorder::new());

    assert!(matches!(
        result,
        Err(BankInitError::Validation(ValidationError::SetPinShared { .. }))
    ));

    Ok(())
}

#[test]
fn it_should_change_routes_with_a_one_off_pulse_length() -> Result {
    let bank = bank()?;
    bank.with_outputs(|outputs| outputs.clear());

    let settle_time = SettleTime::from_secs_f64(0.25)?;
    bank.set_route_for("b", &RouteTarget::port("X"), settle_time)?;

    assert_eq!(bank.route("b")?, Route::Port("X".into()));
    let pulses = bank.with_outputs(|outputs| outputs.pulses());
    assert_eq!(pulses.len(), 2);
    for pulse in pulses {
        assert_eq!(pulse.duration.as_millis(), 250);
    }
    assert_eq!(bank.settle_time("b")?, SettleTime::default());

    Ok(())
}
