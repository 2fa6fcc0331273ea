//! Handsfree Line Bridge Main Application
//!
//! Entry point for the STM32G474-based line bridge firmware.
//! Initializes hardware, spawns the audio and heartbeat tasks and runs the
//! controller scheduler.

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::info;
use embassy_executor::Spawner;
use embassy_stm32::dac::DacChannel;
use embassy_stm32::dma::NoDma;
use embassy_stm32::gpio::{Input, Level, Output, Pull, Speed};
use embassy_stm32::peripherals::{DAC1, PA0};
use embassy_stm32::usart::{self, BufferedUart};
use embassy_stm32::{bind_interrupts, peripherals};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hf_line_bridge::dsp::SoftwareCodec;
use hf_line_bridge::hal::adc::AudioAdc;
use hf_line_bridge::hal::dac::{AudioDac, DacSample};
use hf_line_bridge::hal::gpio::{HookPolarity, PinSlic};
use hf_line_bridge::prelude::*;

// Bind interrupt handlers
bind_interrupts!(struct Irqs {
    USART1 => usart::BufferedInterruptHandler<peripherals::USART1>;
});

/// Codec shared between the audio task and the line machine
type SharedCodec = Mutex<CriticalSectionRawMutex, RefCell<SoftwareCodec>>;

static CODEC: StaticCell<SharedCodec> = StaticCell::new();
static RADIO_TX_BUF: StaticCell<[u8; RADIO_TX_BUFFER_SIZE]> = StaticCell::new();
static RADIO_RX_BUF: StaticCell<[u8; RADIO_RX_BUFFER_SIZE]> = StaticCell::new();

/// Line machine's view of the shared codec
struct CodecHandle(&'static SharedCodec);

impl AudioCapability for CodecHandle {
    fn tone_energy(&mut self, channel: usize) -> f32 {
        self.0.lock(|codec| codec.borrow_mut().tone_energy(channel))
    }

    fn set_oscillator(&mut self, index: usize, frequency: f32, amplitude: f32) {
        self.0
            .lock(|codec| codec.borrow_mut().set_oscillator(index, frequency, amplitude));
    }
}

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("HF Line Bridge Firmware v{}", env!("CARGO_PKG_VERSION"));

    // Initialize STM32G474 peripherals with default clock configuration
    let config = embassy_stm32::Config::default();
    let p = embassy_stm32::init(config);

    info!("Peripherals initialized");

    // Status LED (PA5 on Nucleo boards)
    let led = Output::new(p.PA5, Level::Low, Speed::Low);

    // SLIC: PB0 = SHK, PB1 = F/R, PB2 = RM
    let slic = PinSlic::new(
        Input::new(p.PB0, Pull::Down),
        Output::new(p.PB1, Level::Low, Speed::Low),
        Output::new(p.PB2, Level::Low, Speed::Low),
        HookPolarity::ActiveHigh,
    );

    // Radio module UART: PA9 = TX, PA10 = RX
    let mut uart_config = usart::Config::default();
    uart_config.baudrate = RADIO_UART_BAUD;
    let uart = BufferedUart::new(
        p.USART1,
        Irqs,
        p.PA10,
        p.PA9,
        RADIO_TX_BUF.init([0; RADIO_TX_BUFFER_SIZE]),
        RADIO_RX_BUF.init([0; RADIO_RX_BUFFER_SIZE]),
        uart_config,
    )
    .unwrap();

    info!("USART1 initialized at {} baud", RADIO_UART_BAUD);

    // Line audio: PA0 = ADC1_IN1, PA4 = DAC1_OUT1
    let codec: &'static SharedCodec = CODEC.init(Mutex::new(RefCell::new(SoftwareCodec::default())));
    let adc = AudioAdc::new(p.ADC1);
    let dac = AudioDac::new(DacChannel::new(p.DAC1, NoDma, p.PA4));

    // Spawn background tasks
    spawner.spawn(heartbeat_task(led)).unwrap();
    spawner.spawn(audio_task(adc, p.PA0, dac, codec)).unwrap();

    // Pairing index lives in RAM only; it restarts at device 0 after a power cycle
    let store = MemoryConfigStore::new(0);
    let now = Millis::from_u64(Instant::now().as_millis());
    let mut controller = Controller::new(uart, slic, CodecHandle(codec), store, now);

    info!("Tasks spawned, entering scheduler loop");

    let mut ticker = Ticker::every(Duration::from_millis(1));
    loop {
        controller.poll(Millis::from_u64(Instant::now().as_millis()));
        ticker.next().await;
    }
}

/// Audio task - one ADC sample in, one DAC sample out at the codec rate
#[embassy_executor::task]
async fn audio_task(
    mut adc: AudioAdc<'static>,
    mut input: PA0,
    mut dac: AudioDac<'static, DAC1>,
    codec: &'static SharedCodec,
) {
    let mut ticker = Ticker::every(Duration::from_hz(u64::from(AUDIO_SAMPLE_RATE)));
    loop {
        let sample = adc.read(&mut input).as_audio_sample();
        let out = codec.lock(|codec| codec.borrow_mut().process(sample));
        dac.write(DacSample::from_audio(out));
        ticker.next().await;
    }
}

/// Heartbeat task - blinks LED to show system is running
#[embassy_executor::task]
async fn heartbeat_task(mut led: Output<'static>) {
    loop {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(900)).await;
    }
}
