#![no_std]
// TtyCon - Serial Console Firmware
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.
#![no_main]

//! STM32F407 image: heartbeat LED on PA1 and a line-editing console on
//! USART2 (PA2 TX / PA3 RX, AF7), SysTick at 1 kHz, core at 168 MHz from an
//! 8 MHz HSE.

use core::convert::Infallible;
use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;
use cortex_m_rt::{entry, exception};
use panic_halt as _;
use ttycon_core::config::{BAUD_RATE, HEARTBEAT_INTERVAL_MS, TICK_HZ};
use ttycon_core::{ByteTransport, Console, Heartbeat, Indicator, Ticks};

const SYSCLK_HZ: u32 = 168_000_000;
// APB1 runs at SYSCLK / 4.
const APB1_HZ: u32 = SYSCLK_HZ / 4;

// RCC
const RCC_BASE: u32 = 0x4002_3800;
const RCC_CR: u32 = RCC_BASE;
const RCC_PLLCFGR: u32 = RCC_BASE + 0x04;
const RCC_CFGR: u32 = RCC_BASE + 0x08;
const RCC_AHB1ENR: u32 = RCC_BASE + 0x30;
const RCC_APB1ENR: u32 = RCC_BASE + 0x40;

const RCC_CR_HSEON: u32 = 1 << 16;
const RCC_CR_HSERDY: u32 = 1 << 17;
const RCC_CR_PLLON: u32 = 1 << 24;
const RCC_CR_PLLRDY: u32 = 1 << 25;
const RCC_AHB1ENR_GPIOAEN: u32 = 1 << 0;
const RCC_APB1ENR_USART2EN: u32 = 1 << 17;

// PLL: 8 MHz / M(8) * N(336) / P(2) = 168 MHz, 48 MHz on Q(7).
const PLL_M: u32 = 8;
const PLL_N: u32 = 336;
const PLL_Q: u32 = 7;
const PLLCFGR_SRC_HSE: u32 = 1 << 22;

// CFGR: AHB /1, APB1 /4, APB2 /2, SYSCLK from PLL.
const CFGR_PPRE1_DIV4: u32 = 0b101 << 10;
const CFGR_PPRE2_DIV2: u32 = 0b100 << 13;
const CFGR_SW_PLL: u32 = 0b10;
const CFGR_SWS_MASK: u32 = 0b11 << 2;
const CFGR_SWS_PLL: u32 = 0b10 << 2;

// Flash: 5 wait states at 168 MHz / 3.3 V, prefetch and caches on.
const FLASH_ACR: u32 = 0x4002_3C00;
const FLASH_ACR_CONFIG: u32 = 5 | (1 << 8) | (1 << 9) | (1 << 10);

// GPIOA
const GPIOA_BASE: u32 = 0x4002_0000;
const GPIOA_MODER: u32 = GPIOA_BASE;
const GPIOA_ODR: u32 = GPIOA_BASE + 0x14;
const GPIOA_BSRR: u32 = GPIOA_BASE + 0x18;
const GPIOA_AFRL: u32 = GPIOA_BASE + 0x20;

const LED_PIN: u32 = 1;
const TX_PIN: u32 = 2;
const RX_PIN: u32 = 3;
const AF7_USART: u32 = 7;

// USART2
const USART2_BASE: u32 = 0x4000_4400;
const USART2_SR: u32 = USART2_BASE;
const USART2_DR: u32 = USART2_BASE + 0x04;
const USART2_BRR: u32 = USART2_BASE + 0x08;
const USART2_CR1: u32 = USART2_BASE + 0x0C;
const USART2_CR2: u32 = USART2_BASE + 0x10;
const USART2_CR3: u32 = USART2_BASE + 0x14;

const SR_RXNE: u32 = 1 << 5;
const SR_TXE: u32 = 1 << 7;
const CR1_RE: u32 = 1 << 2;
const CR1_TE: u32 = 1 << 3;
const CR1_UE: u32 = 1 << 13;

static TICKS: Ticks = Ticks::new();

#[exception]
fn SysTick() {
    TICKS.tick();
}

fn read_u32(addr: u32) -> u32 {
    unsafe { core::ptr::read_volatile(addr as *const u32) }
}

fn write_u32(addr: u32, value: u32) {
    unsafe {
        core::ptr::write_volatile(addr as *mut u32, value);
    }
}

fn modify_u32(addr: u32, clear: u32, set: u32) {
    let value = read_u32(addr);
    write_u32(addr, (value & !clear) | set);
}

fn clock_setup() {
    modify_u32(RCC_CR, 0, RCC_CR_HSEON);
    while read_u32(RCC_CR) & RCC_CR_HSERDY == 0 {}

    write_u32(
        RCC_PLLCFGR,
        PLL_M | (PLL_N << 6) | PLLCFGR_SRC_HSE | (PLL_Q << 24),
    );
    modify_u32(RCC_CR, 0, RCC_CR_PLLON);
    while read_u32(RCC_CR) & RCC_CR_PLLRDY == 0 {}

    write_u32(FLASH_ACR, FLASH_ACR_CONFIG);
    write_u32(RCC_CFGR, CFGR_PPRE1_DIV4 | CFGR_PPRE2_DIV2);
    modify_u32(RCC_CFGR, 0b11, CFGR_SW_PLL);
    while read_u32(RCC_CFGR) & CFGR_SWS_MASK != CFGR_SWS_PLL {}

    modify_u32(RCC_AHB1ENR, 0, RCC_AHB1ENR_GPIOAEN);
    modify_u32(RCC_APB1ENR, 0, RCC_APB1ENR_USART2EN);
}

fn systick_setup(syst: &mut SYST) {
    // 1 ms interrupt rate.
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(SYSCLK_HZ / TICK_HZ - 1);
    syst.clear_current();
    syst.enable_counter();
    // this done last
    syst.enable_interrupt();
}

fn gpio_setup() {
    let mode_mask = |pin: u32| 0b11 << (pin * 2);
    modify_u32(
        GPIOA_MODER,
        mode_mask(LED_PIN) | mode_mask(TX_PIN) | mode_mask(RX_PIN),
        (0b01 << (LED_PIN * 2)) | (0b10 << (TX_PIN * 2)) | (0b10 << (RX_PIN * 2)),
    );
    modify_u32(
        GPIOA_AFRL,
        (0xF << (TX_PIN * 4)) | (0xF << (RX_PIN * 4)),
        (AF7_USART << (TX_PIN * 4)) | (AF7_USART << (RX_PIN * 4)),
    );
}

fn usart_setup() {
    // 8N1, no flow control.
    write_u32(USART2_CR2, 0);
    write_u32(USART2_CR3, 0);
    write_u32(USART2_BRR, (APB1_HZ + BAUD_RATE / 2) / BAUD_RATE);
    write_u32(USART2_CR1, CR1_TE | CR1_RE);
    // Finally enable the USART.
    modify_u32(USART2_CR1, 0, CR1_UE);
}

/// USART2 in polled blocking mode.
struct Usart2;

impl ByteTransport for Usart2 {
    type Error = Infallible;

    fn send_blocking(&mut self, byte: u8) -> Result<(), Infallible> {
        while read_u32(USART2_SR) & SR_TXE == 0 {}
        write_u32(USART2_DR, byte as u32);
        Ok(())
    }

    fn recv_blocking(&mut self) -> Result<u8, Infallible> {
        while read_u32(USART2_SR) & SR_RXNE == 0 {}
        Ok((read_u32(USART2_DR) & 0xFF) as u8)
    }
}

/// Heartbeat LED on PA1.
struct StatusLed;

impl Indicator for StatusLed {
    fn set_high(&mut self) {
        write_u32(GPIOA_BSRR, 1 << LED_PIN);
    }

    fn toggle(&mut self) {
        let odr = read_u32(GPIOA_ODR);
        write_u32(GPIOA_ODR, odr ^ (1 << LED_PIN));
    }
}

#[entry]
fn main() -> ! {
    clock_setup();
    let mut cp = cortex_m::Peripherals::take().unwrap();
    systick_setup(&mut cp.SYST);
    gpio_setup();
    usart_setup();

    let mut console: Console<Usart2> = Console::new(Usart2);
    let mut heartbeat = Heartbeat::new(StatusLed, HEARTBEAT_INTERVAL_MS);

    loop {
        // Only a transport error turns into fmt::Error and Usart2 has none.
        // A lost status line is dropped; the next beat prints a fresh one.
        if heartbeat
            .beat(&TICKS, &mut console, cortex_m::asm::wfi)
            .is_err()
        {
            continue;
        }
    }
}
