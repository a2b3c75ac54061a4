use proptest::prelude::*;
use upcount::{Counter, Device, PinVector, pins};

fn running(ui_in: u8, uio_in: u8) -> PinVector {
    PinVector {
        rst_n: true,
        ena: true,
        ui_in,
        uio_in,
    }
}

/// Brings a fresh counter to `prior` (or leaves it undefined).
fn counter_at(prior: Option<u8>) -> Counter {
    let mut counter = Counter::new();
    if let Some(v) = prior {
        counter.on_rising_edge(&running(1 << pins::LOAD, v));
    }
    counter
}

#[test]
fn test_register_undefined_until_reset() {
    let mut dev = Device::new();
    assert_eq!(dev.observe().uo_out, None);

    // Counting and holding keep it undefined
    dev.modify(|p| {
        p.rst_n = true;
        p.ui_in = 1 << pins::EN;
    });
    dev.tick_n(3);
    assert_eq!(dev.observe().uo_out, None);

    dev.modify(|p| p.rst_n = false);
    dev.tick();
    assert_eq!(dev.observe().uo_out, Some(0));
}

#[test]
fn test_apply_reset() {
    let mut counter = counter_at(Some(0x5A));
    counter.apply_reset();
    assert_eq!(counter.register(), Some(0));
}

#[test]
fn test_load_then_count() {
    let mut dev = Device::new();
    dev.modify(|p| p.ui_in = 1 << pins::OE);
    dev.tick();
    assert_eq!(dev.observe().uo_out, Some(0)); // held in reset

    dev.modify(|p| {
        p.rst_n = true;
        p.uio_in = 0xF0;
        p.set_bit(pins::LOAD, true);
    });
    dev.tick();
    assert_eq!(dev.observe().uo_out, Some(0xF0));

    dev.modify(|p| {
        p.set_bit(pins::LOAD, false);
        p.set_bit(pins::EN, true);
    });
    dev.tick_n(3);
    assert_eq!(dev.observe().uo_out, Some(0xF3));

    // Hold
    dev.modify(|p| p.set_bit(pins::EN, false));
    dev.tick_n(5);
    assert_eq!(dev.observe().uo_out, Some(0xF3));
}

#[test]
fn test_wraparound() {
    let mut counter = counter_at(Some(0xFE));
    let en = running(1 << pins::EN, 0);
    counter.on_rising_edge(&en);
    assert_eq!(counter.register(), Some(0xFF));
    counter.on_rising_edge(&en);
    assert_eq!(counter.register(), Some(0x00));
    counter.on_rising_edge(&en);
    assert_eq!(counter.register(), Some(0x01));
}

#[test]
fn test_load_wins_over_enable() {
    let mut counter = counter_at(Some(0x10));
    counter.on_rising_edge(&running((1 << pins::LOAD) | (1 << pins::EN), 0x80));
    assert_eq!(counter.register(), Some(0x80));
}

#[test]
fn test_observe_has_no_side_effects() {
    let counter = counter_at(Some(0x33));
    let vector = running(1 << pins::OE, 0);
    let first = counter.observe(&vector);
    assert_eq!(counter.observe(&vector), first);
    assert_eq!(counter.register(), Some(0x33));
}

#[test]
fn test_ena_does_not_gate_the_model() {
    let mut counter = counter_at(Some(7));
    let mut vector = running(1 << pins::EN, 0);
    vector.ena = false;
    counter.on_rising_edge(&vector);
    assert_eq!(counter.register(), Some(8));
}

proptest! {
    #[test]
    fn load_sets_register(prior in any::<Option<u8>>(), value in any::<u8>(), ui in any::<u8>()) {
        let mut counter = counter_at(prior);
        counter.on_rising_edge(&running(ui | (1 << pins::LOAD), value));
        prop_assert_eq!(counter.register(), Some(value));
    }

    #[test]
    fn enable_increments_modulo_256(start in any::<u8>(), edges in 0u32..600) {
        let mut counter = counter_at(Some(start));
        let vector = running(1 << pins::EN, 0xAA);
        for _ in 0..edges {
            counter.on_rising_edge(&vector);
        }
        prop_assert_eq!(counter.register(), Some(start.wrapping_add((edges % 256) as u8)));
    }

    #[test]
    fn output_enable_mask_follows_oe(prior in any::<Option<u8>>(), ui in any::<u8>(), uio in any::<u8>(), rst_n in any::<bool>()) {
        let counter = counter_at(prior);
        let vector = PinVector { rst_n, ena: true, ui_in: ui, uio_in: uio };
        let expected = if ui & (1 << pins::OE) != 0 { 0xFF } else { 0x00 };
        let obs = counter.observe(&vector);
        prop_assert_eq!(obs.uio_oe, expected);
        prop_assert_eq!(obs.uo_out, prior);
    }

    #[test]
    fn reset_clears_register(prior in any::<Option<u8>>(), ui in any::<u8>(), uio in any::<u8>()) {
        let mut counter = counter_at(prior);
        counter.on_rising_edge(&PinVector { rst_n: false, ena: true, ui_in: ui, uio_in: uio });
        prop_assert_eq!(counter.register(), Some(0));
    }
}
