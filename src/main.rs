// Nixie clock firmware, shows the DS3231 time on the six tube shield

#![no_std]
#![no_main]

use panic_rtt_core::{self, rtt_init_print, rprintln};

use cortex_m_rt::entry;
use stm32f1xx_hal as hal;
use hal::{
    pac,
    i2c::{BlockingI2c, DutyCycle, Mode as Mode_i2c},
    spi::*,
    prelude::*
};

use ds323x::{Ds323x, Rtcc, Timelike};

use nixie_shield::{helpers::ms_to_cycles, time_digits, AntiPoison, NixieShield};

mod compat;
mod cycle_counter;

const CLOCK_MHZ: u32 = 72;

const ANTI_POISON_INTERVAL_MS: u64 = 10 * 60 * 1000; // 10 Minutes between anti poison routines

#[entry]
fn main() -> ! {
    rtt_init_print!();

    let mut cp = cortex_m::Peripherals::take().unwrap(); // Core peripherals
    let dp = pac::Peripherals::take().unwrap(); // Device peripherals

    // Take ownership over the raw flash and rcc devices and convert them into the corresponding HAL structs
    let mut flash = dp.FLASH.constrain();
    let rcc = dp.RCC.constrain();

    // Freeze the configuration of all the clocks in the system and store the frozen frequencies in `clocks`
    let clocks = rcc.cfgr
        // External oscillator
        .use_hse(8.MHz())

        // Bus and core clocks
        .hclk(CLOCK_MHZ.MHz())
        .sysclk(CLOCK_MHZ.MHz())

        // Peripheral clocks
        .pclk1(12.MHz())
        .pclk2(12.MHz())
    .freeze(&mut flash.acr);

    let mut delay = cp.SYST.delay(&clocks);

    // Enable cycle counter
    cp.DCB.enable_trace();
    cp.DWT.enable_cycle_counter();

    let mut gpioa = dp.GPIOA.split();
    let mut gpiob = dp.GPIOB.split();



    // Construct rtc using i2c bus
    let scl = gpiob.pb10.into_alternate_open_drain(&mut gpiob.crh);
    let sda = gpiob.pb11.into_alternate_open_drain(&mut gpiob.crh);

    let i2c = BlockingI2c::i2c2(
        dp.I2C2,
        (scl, sda),
        Mode_i2c::Fast {
            frequency: 400.kHz(),
            duty_cycle: DutyCycle::Ratio16to9,
        },
        clocks,
        1000,
        10,
        1000,
        1000,
    );

    let mut rtc = Ds323x::new_ds3231(i2c);



    // Construct nixies using spi bus
    let spi_pins = (
        gpiob.pb13.into_alternate_push_pull(&mut gpiob.crh), // Clock
        NoMiso, // Miso, the shift register chain has no data out
        gpiob.pb15.into_alternate_push_pull(&mut gpiob.crh) // Mosi
    );

    let spi_mode = Mode {
        polarity: Polarity::IdleLow,
        phase: Phase::CaptureOnFirstTransition,
    };

    let spi = Spi::spi2(dp.SPI2, spi_pins, spi_mode, 100.kHz(), clocks);

    let mut nixies = NixieShield::new(
        compat::Bus(spi),
        compat::Line(gpiob.pb14.into_push_pull_output(&mut gpiob.crh)), // High voltage enable
        compat::Line(gpiob.pb12.into_push_pull_output(&mut gpiob.crh)), // Latch enable
        compat::Line(gpiob.pb1.into_push_pull_output(&mut gpiob.crl)), // Neon dots
    )
    .unwrap();

    // Shift a blank frame out before the supply comes up so the tubes don't show register garbage
    nixies.commit().unwrap();
    rprintln!("nixie clock started");



    let mut cycle_counter = cycle_counter::Counter::new();

    let on_switch_pin = gpioa.pa6.into_pull_down_input(&mut gpioa.crl);

    let anti_poison = AntiPoison::default();
    let mut last_second = None; // Second shown on the tubes, None forces a redraw

    // How many clock cyclces have to be elapsed before the anti-poison routine starts
    let mut activate_anti_posion_cycles = ms_to_cycles(ANTI_POISON_INTERVAL_MS, CLOCK_MHZ as u64);

    loop {
        let cycles = cycle_counter.update();

        if on_switch_pin.is_high() { // Only do nixie stuff when the on switch is high
            if !nixies.high_voltage() {
                if let Err(e) = nixies.set_high_voltage(true) {
                    rprintln!("hv enable failed: {}", e);
                }
            }

            // When the cycle count exceeds activate_anti_posion_cycles then start the anti-poison routine
            if cycles > activate_anti_posion_cycles {
                rprintln!("anti poison: {} commits", anti_poison.commits());
                if let Err(e) = anti_poison.run(&mut nixies, &mut compat::Delay(&mut delay)) {
                    rprintln!("anti poison aborted: {}", e);
                }

                last_second = None;
                activate_anti_posion_cycles = cycle_counter.update() + ms_to_cycles(ANTI_POISON_INTERVAL_MS, CLOCK_MHZ as u64); // Reset timer
            }

            // Read time from rtc
            match rtc.time() {
                Ok(time) => {
                    let second = time.second();

                    // Only shift new data when the displayed time changes
                    if last_second != Some(second) {
                        let shown = nixies
                            .set_digits(&time_digits(time.hour(), time.minute(), second))
                            .and_then(|_| nixies.set_indicator_lamp(second % 2 == 0))
                            .and_then(|_| nixies.commit());

                        match shown {
                            Ok(()) => last_second = Some(second),
                            Err(e) => rprintln!("display update failed: {}", e),
                        }
                    }
                }
                Err(e) => rprintln!("rtc read failed: {:?}", e),
            }
        } else if nixies.high_voltage() {
            // Tubes off, blank the registers so they come back clean
            nixies.blank();
            let off = nixies
                .set_indicator_lamp(false)
                .and_then(|_| nixies.commit())
                .and_then(|_| nixies.set_high_voltage(false));

            if let Err(e) = off {
                rprintln!("turn off failed: {}", e);
            }
            last_second = None;
        }

        delay.delay_ms(1u32);
    }
}
